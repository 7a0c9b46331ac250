use common::{subject_observer::Observer, UpdateResult};
use log::info;
use orders::{OrderEvent, OrderSubject};
use serde::Deserialize;
use strum::{Display, EnumIter};

/// Downstream systems interested in order status changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Display, EnumIter)]
#[serde(rename_all = "lowercase")]
pub enum SystemKind {
    #[strum(to_string = "Warehouse System")]
    Warehouse,
    #[strum(to_string = "Logistics System")]
    Logistics,
    #[strum(to_string = "Finance System")]
    Finance,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemObserver {
    name: String,
}

impl SystemObserver {
    pub fn new(name: impl Into<String>) -> Self {
        SystemObserver { name: name.into() }
    }

    pub fn warehouse() -> Self {
        Self::from(SystemKind::Warehouse)
    }

    pub fn logistics() -> Self {
        Self::from(SystemKind::Logistics)
    }

    pub fn finance() -> Self {
        Self::from(SystemKind::Finance)
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl From<SystemKind> for SystemObserver {
    fn from(kind: SystemKind) -> Self {
        SystemObserver::new(kind.to_string())
    }
}

impl Observer<OrderSubject, OrderEvent> for SystemObserver {
    fn update(&self, _: &OrderSubject, event: &OrderEvent) -> UpdateResult {
        info!(
            "Observer {} received order notification: Order ID {}",
            self.name, event.order_id
        );
        Ok(())
    }
}
