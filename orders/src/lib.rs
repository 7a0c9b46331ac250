mod order_event;
mod order_subject;

pub use order_event::{OrderEvent, OrderStage};
pub use order_subject::{OrderObserver, OrderSubject};
