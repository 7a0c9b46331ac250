mod statsd_gateway;

pub use statsd_gateway::StatsdGateway;

use dipstick::*;

metrics! {
    ORDER_PROXY: Proxy = "Orders_Proxy" => {
        NOTIFICATIONS: Counter = "notifications";
    }
}
