mod notify_result;
pub mod subject_observer;

pub use notify_result::{DeliveryFailure, NotifyReport, ObserverError, UpdateResult};
