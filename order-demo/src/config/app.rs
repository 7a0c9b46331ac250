use config::{builder::DefaultState, Config, ConfigBuilder, Environment, File, FileFormat};
use observers::SystemKind;
use orders::OrderStage;
use serde::Deserialize;
use validator::Validate;

use crate::error::AppError;

const DEFAULT_CONFIG: &str = include_str!("../../resources/config/default.toml");
const DEFAULT_CONFIG_PREFIX: &str = "APP";

/// One observer attached under one stage.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Subscription {
    pub system: SystemKind,
    pub stage: OrderStage,
}

#[derive(Debug, Deserialize, Clone, Validate)]
pub struct AppConfig {
    #[validate(length(min = 1))]
    pub order_id: String,
    pub log_level: String,
    pub statsd_enabled: bool,
    pub statsd_host: String,
    pub statsd_port: u16,
    pub subscriptions: Vec<Subscription>,
    #[validate(length(min = 1))]
    pub notifications: Vec<OrderStage>,
}

impl AppConfig {
    /// Embedded defaults overridden by `APP_*` environment variables.
    pub fn new() -> Result<Self, AppError> {
        Self::load(default_builder().add_source(Environment::with_prefix(DEFAULT_CONFIG_PREFIX)))
    }

    /// Embedded defaults only.
    #[cfg(test)]
    pub fn defaults() -> Result<Self, AppError> {
        Self::load(default_builder())
    }

    fn load(builder: ConfigBuilder<DefaultState>) -> Result<Self, AppError> {
        let app_config: AppConfig = builder.build()?.try_deserialize()?;
        app_config.validate()?;
        Ok(app_config)
    }
}

fn default_builder() -> ConfigBuilder<DefaultState> {
    Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
}
