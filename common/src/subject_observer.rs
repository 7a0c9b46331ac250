use std::{
    any::Any,
    collections::HashMap,
    panic::{self, AssertUnwindSafe},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use log::{trace, warn};

use crate::{DeliveryFailure, NotifyReport, ObserverError, UpdateResult};

pub trait Observer<S: ?Sized, E>: Send + Sync {
    fn update(&self, source: &S, event: &E) -> UpdateResult;
}

pub type SharedObserver<S, E> = Arc<dyn Observer<S, E>>;
pub type SharedObservers<S, E> = Vec<SharedObserver<S, E>>;

/// Observers are registered under an event type and only hear about that type.
pub trait Subject<E> {
    fn register_observer(&self, event_type: &str, observer: SharedObserver<Self, E>);
    /// Returns `false` when nothing matched; that is not an error.
    fn unregister_observer(&self, event_type: &str, observer: SharedObserver<Self, E>) -> bool;
    fn notify_observers(&self, event_type: &str, event: E) -> NotifyReport;
}

/// Event type to observers mapping, guarded by a single lock.
///
/// Lists keep registration order and may hold the same observer several times.
/// Observers are compared by pointer identity.
pub struct ObserverRegistry<S: ?Sized, E> {
    observers: Mutex<HashMap<String, SharedObservers<S, E>>>,
}

impl<S: ?Sized, E> Default for ObserverRegistry<S, E> {
    fn default() -> Self {
        Self {
            observers: Mutex::new(HashMap::new()),
        }
    }
}

impl<S: ?Sized, E> ObserverRegistry<S, E> {
    pub fn attach(&self, event_type: &str, observer: SharedObserver<S, E>) {
        let mut observers = self.lock();
        let registered = observers.entry(event_type.to_owned()).or_default();
        registered.push(observer);
        trace!(
            "Attached observer to '{event_type}' ({} registered)",
            registered.len()
        );
    }

    pub fn detach(&self, event_type: &str, observer: &SharedObserver<S, E>) -> bool {
        let mut observers = self.lock();
        let Some(registered) = observers.get_mut(event_type) else {
            return false;
        };
        let Some(position) = registered.iter().position(|obs| Arc::ptr_eq(obs, observer)) else {
            return false;
        };

        registered.remove(position);
        if registered.is_empty() {
            observers.remove(event_type);
        }
        trace!("Detached observer #{position} from '{event_type}'");
        true
    }

    /// Copy of the observers currently registered for `event_type`.
    /// The lock is released on return, later changes do not affect the copy.
    pub fn snapshot(&self, event_type: &str) -> SharedObservers<S, E> {
        self.lock().get(event_type).cloned().unwrap_or_default()
    }

    pub fn count(&self, event_type: &str) -> usize {
        self.lock().get(event_type).map_or(0, Vec::len)
    }

    pub fn event_types(&self) -> Vec<String> {
        let mut event_types = self.lock().keys().cloned().collect::<Vec<_>>();
        event_types.sort();
        event_types
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, SharedObservers<S, E>>> {
        self.observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Calls every observer in order. A failing or panicking observer is recorded
/// in the report and does not prevent delivery to the following ones.
pub fn deliver<S: ?Sized, E>(
    source: &S,
    observers: &[SharedObserver<S, E>],
    event: &E,
) -> NotifyReport {
    observers
        .iter()
        .enumerate()
        .fold(NotifyReport::default(), |mut report, (position, observer)| {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| observer.update(source, event)))
                .unwrap_or_else(|payload| Err(ObserverError::Panicked(panic_message(&*payload))));

            match outcome {
                Ok(()) => report.delivered += 1,
                Err(error) => {
                    warn!("Observer #{position} failed: {error}");
                    report.failures.push(DeliveryFailure { position, error });
                }
            }
            report
        })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|message| message.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_string())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use common_test::CallLog;
    use mockall::mock;

    use crate::{DeliveryFailure, NotifyReport, ObserverError, UpdateResult};

    use super::{deliver, Observer, ObserverRegistry, SharedObserver};

    struct Source;

    struct Recording {
        label: &'static str,
        log: CallLog,
    }

    impl Observer<Source, String> for Recording {
        fn update(&self, _: &Source, event: &String) -> UpdateResult {
            self.log.record(self.label, event);
            Ok(())
        }
    }

    struct Rejecting;

    impl Observer<Source, String> for Rejecting {
        fn update(&self, _: &Source, event: &String) -> UpdateResult {
            Err(ObserverError::Rejected(format!("no room for {event}")))
        }
    }

    struct Panicking;

    impl Observer<Source, String> for Panicking {
        fn update(&self, _: &Source, _: &String) -> UpdateResult {
            panic!("observer exploded")
        }
    }

    mock! {
        TestObserver {}

        impl Observer<Source, String> for TestObserver {
            fn update(&self, source: &Source, event: &String) -> UpdateResult;
        }
    }

    fn recording(label: &'static str, log: &CallLog) -> SharedObserver<Source, String> {
        Arc::new(Recording {
            label,
            log: log.clone(),
        })
    }

    #[test]
    fn test_registry_attach_keeps_registration_order() {
        // Given
        let log = CallLog::new();
        let registry = ObserverRegistry::<Source, String>::default();
        let a = recording("a", &log);
        let b = recording("b", &log);

        // When
        registry.attach("prepare", b.clone());
        registry.attach("prepare", a.clone());
        registry.attach("prepare", b.clone());

        // Then
        let snapshot = registry.snapshot("prepare");
        assert_eq!(3, snapshot.len());
        assert!(Arc::ptr_eq(&snapshot[0], &b));
        assert!(Arc::ptr_eq(&snapshot[1], &a));
        assert!(Arc::ptr_eq(&snapshot[2], &b));
        assert_eq!(0, registry.count("arrange"), "Should not fan out to other keys");
    }

    #[test]
    fn test_registry_detach_removes_first_occurrence_only() {
        // Given
        let log = CallLog::new();
        let registry = ObserverRegistry::<Source, String>::default();
        let a = recording("a", &log);
        let b = recording("b", &log);
        registry.attach("prepare", a.clone());
        registry.attach("prepare", b.clone());
        registry.attach("prepare", a.clone());

        // When
        let result = registry.detach("prepare", &a);

        // Then
        assert!(result);
        let snapshot = registry.snapshot("prepare");
        assert_eq!(2, snapshot.len());
        assert!(Arc::ptr_eq(&snapshot[0], &b));
        assert!(Arc::ptr_eq(&snapshot[1], &a), "Later duplicate should stay");
    }

    #[test]
    fn test_registry_detach_unknown_is_noop() {
        // Given
        let log = CallLog::new();
        let registry = ObserverRegistry::<Source, String>::default();
        let a = recording("a", &log);
        let stranger = recording("a", &log);
        registry.attach("prepare", a.clone());

        // When
        let unknown_type = registry.detach("settle", &a);
        let unknown_observer = registry.detach("prepare", &stranger);

        // Then
        assert!(!unknown_type);
        assert!(
            !unknown_observer,
            "Should match by identity, not by content"
        );
        assert_eq!(1, registry.count("prepare"));
    }

    #[test]
    fn test_registry_detach_last_observer_drops_event_type() {
        // Given
        let log = CallLog::new();
        let registry = ObserverRegistry::<Source, String>::default();
        let a = recording("a", &log);
        registry.attach("prepare", a.clone());
        registry.attach("settle", a.clone());

        // When
        registry.detach("prepare", &a);

        // Then
        assert_eq!(vec!["settle".to_string()], registry.event_types());
    }

    #[test]
    fn test_registry_snapshot_is_detached_from_later_changes() {
        // Given
        let log = CallLog::new();
        let registry = ObserverRegistry::<Source, String>::default();
        let a = recording("a", &log);
        registry.attach("prepare", a.clone());

        // When
        let snapshot = registry.snapshot("prepare");
        registry.attach("prepare", a.clone());
        registry.detach("prepare", &a);
        registry.detach("prepare", &a);

        // Then
        assert_eq!(1, snapshot.len());
        assert_eq!(0, registry.count("prepare"));
        assert!(registry.snapshot("prepare").is_empty());
    }

    #[test]
    fn test_deliver_calls_each_observer_once() {
        // Given
        let mut mock = MockTestObserver::new();
        mock.expect_update()
            .withf(|_, event| event == "123456")
            .times(1)
            .returning(|_, _| Ok(()));
        let observers: Vec<SharedObserver<Source, String>> = vec![Arc::new(mock)];

        // When
        let report = deliver(&Source, &observers, &"123456".to_string());

        // Then
        assert_eq!(1, report.delivered);
        assert!(report.is_success());
    }

    #[test]
    fn test_deliver_without_observers_is_noop() {
        // When
        let report = deliver::<Source, String>(&Source, &[], &"1".to_string());

        // Then
        assert_eq!(NotifyReport::default(), report);
    }

    #[test]
    fn test_deliver_isolates_failing_observers() {
        // Given
        let log = CallLog::new();
        let observers: Vec<SharedObserver<Source, String>> = vec![
            recording("first", &log),
            Arc::new(Rejecting),
            Arc::new(Panicking),
            recording("last", &log),
        ];

        // When
        let report = deliver(&Source, &observers, &"42".to_string());

        // Then
        assert_eq!(
            vec!["first", "last"],
            log.observers(),
            "Should keep delivering after a failure"
        );
        assert_eq!(2, report.delivered);
        assert_eq!(
            vec![
                DeliveryFailure {
                    position: 1,
                    error: ObserverError::Rejected("no room for 42".to_string()),
                },
                DeliveryFailure {
                    position: 2,
                    error: ObserverError::Panicked("observer exploded".to_string()),
                },
            ],
            report.failures
        );
    }
}
