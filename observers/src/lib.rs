pub mod system_observer;

pub use system_observer::{SystemKind, SystemObserver};
