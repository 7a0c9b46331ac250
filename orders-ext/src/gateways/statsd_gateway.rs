use std::{fmt::Debug, io::Error, net::ToSocketAddrs};

use common::{subject_observer::Observer, UpdateResult};
use dipstick::{Input, InputScope, Statsd};
use log::trace;
use orders::{OrderEvent, OrderSubject};

use crate::gateways::{NOTIFICATIONS, ORDER_PROXY};

/// Counts order notifications, overall and per status, on a StatsD sink.
pub struct StatsdGateway {}

impl StatsdGateway {
    pub fn new<A>(address: A) -> Result<Self, Error>
    where
        A: ToSocketAddrs + Debug + Clone,
    {
        let statsd_scope = Statsd::send_to(address)?.metrics();
        ORDER_PROXY.target(statsd_scope);

        Ok(StatsdGateway {})
    }

    fn status_metric(status: &str) -> String {
        format!("status.{status}")
    }
}

impl Observer<OrderSubject, OrderEvent> for StatsdGateway {
    fn update(&self, _: &OrderSubject, event: &OrderEvent) -> UpdateResult {
        trace!(
            "Counting '{}' notification for order {}",
            event.status,
            event.order_id
        );
        NOTIFICATIONS.count(1);
        ORDER_PROXY
            .counter(&Self::status_metric(&event.status))
            .count(1);
        Ok(())
    }
}
