use env_logger::Env;
use log::SetLoggerError;

/// `RUST_LOG` wins over `default_filter` when set.
pub fn init(default_filter: &str) -> Result<(), SetLoggerError> {
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).try_init()
}
