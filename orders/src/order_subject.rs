use common::{
    subject_observer::{deliver, ObserverRegistry, SharedObserver, Subject},
    NotifyReport,
};
use log::{debug, trace};

use crate::{OrderEvent, OrderStage};

pub type OrderObserver = SharedObserver<OrderSubject, OrderEvent>;

/// Dispatches order status changes to the observers registered for that status.
///
/// Notification copies the observer list and releases the lock before calling
/// anyone, so observers may attach, detach or notify from inside `update`.
/// Changes made while a notification runs apply to the next one.
#[derive(Default)]
pub struct OrderSubject {
    observers: ObserverRegistry<Self, OrderEvent>,
}

impl Subject<OrderEvent> for OrderSubject {
    fn register_observer(&self, event_type: &str, observer: OrderObserver) {
        self.observers.attach(event_type, observer);
    }

    fn unregister_observer(&self, event_type: &str, observer: OrderObserver) -> bool {
        self.observers.detach(event_type, &observer)
    }

    fn notify_observers(&self, event_type: &str, event: OrderEvent) -> NotifyReport {
        let observers = self.observers.snapshot(event_type);
        if observers.is_empty() {
            trace!(
                "No observer for '{event_type}', order {} not dispatched",
                event.order_id
            );
            return NotifyReport::default();
        }

        debug!(
            "Notifying {} observer(s) of '{event_type}' for order {}",
            observers.len(),
            event.order_id
        );
        deliver(self, &observers, &event)
    }
}

impl OrderSubject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&self, observer: OrderObserver, event_type: &str) {
        self.register_observer(event_type, observer);
    }

    pub fn detach(&self, observer: OrderObserver, event_type: &str) -> bool {
        self.unregister_observer(event_type, observer)
    }

    pub fn notify(&self, order_id: &str, status: &str) -> NotifyReport {
        self.notify_observers(status, OrderEvent::new(order_id, status))
    }

    pub fn notify_stage(&self, order_id: &str, stage: OrderStage) -> NotifyReport {
        self.notify(order_id, stage.as_ref())
    }

    pub fn observer_count(&self, event_type: &str) -> usize {
        self.observers.count(event_type)
    }

    pub fn event_types(&self) -> Vec<String> {
        self.observers.event_types()
    }
}
