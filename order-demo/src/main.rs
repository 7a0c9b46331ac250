mod config;
mod driver;
mod error;

use log::info;

use crate::config::app::AppConfig;

fn main() -> anyhow::Result<()> {
    let app_config = AppConfig::new()?;
    crate::config::log::init(&app_config.log_level)?;

    info!("Dispatching order {}", app_config.order_id);
    let reports = driver::run(&app_config)?;

    let failures = reports
        .iter()
        .map(|(_, report)| report.failures.len())
        .sum::<usize>();
    info!(
        "Order {} done: {} notification(s), {} failure(s)",
        app_config.order_id,
        reports.len(),
        failures
    );
    Ok(())
}
