use std::{collections::HashSet, sync::Arc};

use common::NotifyReport;
use log::{debug, info, warn};
use observers::SystemObserver;
use orders::{OrderStage, OrderSubject};
use orders_ext::gateways::StatsdGateway;

use crate::{config::app::AppConfig, error::AppError};

pub fn wire(subject: &OrderSubject, config: &AppConfig) -> Result<(), AppError> {
    for subscription in &config.subscriptions {
        debug!(
            "Attaching {} to '{}'",
            subscription.system, subscription.stage
        );
        subject.attach(
            Arc::new(SystemObserver::from(subscription.system)),
            subscription.stage.as_ref(),
        );
    }

    if config.statsd_enabled {
        let gateway = Arc::new(StatsdGateway::new((
            config.statsd_host.as_str(),
            config.statsd_port,
        ))?);
        let stages = config.notifications.iter().collect::<HashSet<_>>();
        for stage in stages {
            subject.attach(gateway.clone(), stage.as_ref());
        }
        debug!(
            "Sending metrics to {}:{}",
            config.statsd_host, config.statsd_port
        );
    }
    Ok(())
}

/// Attaches the configured observers, then fires every configured notification in order.
pub fn run(config: &AppConfig) -> Result<Vec<(OrderStage, NotifyReport)>, AppError> {
    let subject = OrderSubject::new();
    wire(&subject, config)?;

    let reports = config
        .notifications
        .iter()
        .map(|&stage| {
            let report = subject.notify_stage(&config.order_id, stage);
            if report.is_success() {
                info!(
                    "Order {} '{stage}': {} observer(s) notified",
                    config.order_id, report.delivered
                );
            } else {
                warn!(
                    "Order {} '{stage}': {} of {} observer(s) failed",
                    config.order_id,
                    report.failures.len(),
                    report.attempted()
                );
            }
            (stage, report)
        })
        .collect();
    Ok(reports)
}
