use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Passed to observers on every notification; the subject does not keep it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderEvent {
    pub order_id: String,
    pub status: String,
}

impl OrderEvent {
    pub fn new(order_id: impl Into<String>, status: impl Into<String>) -> Self {
        OrderEvent {
            order_id: order_id.into(),
            status: status.into(),
        }
    }
}

/// Well-known order statuses used as event types.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OrderStage {
    Prepare,
    Arrange,
    Settle,
}
