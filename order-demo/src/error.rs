use config::ConfigError;
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Unable to load configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ValidationErrors),
    #[error("Unable to reach metrics sink: {0}")]
    Gateway(#[from] std::io::Error),
}
