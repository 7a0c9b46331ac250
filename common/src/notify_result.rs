use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ObserverError {
    #[error("Observer rejected the notification: {0}")]
    Rejected(String),
    #[error("Observer panicked: {0}")]
    Panicked(String),
}

pub type UpdateResult = Result<(), ObserverError>;

/// An observer that did not handle a notification, by its position in the delivery order.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryFailure {
    pub position: usize,
    pub error: ObserverError,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct NotifyReport {
    pub delivered: usize,
    pub failures: Vec<DeliveryFailure>,
}

impl NotifyReport {
    pub fn attempted(&self) -> usize {
        self.delivered + self.failures.len()
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}
