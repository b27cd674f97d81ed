//! Hub and subscriber statistics

pub mod metrics;

pub(crate) use metrics::HubMetrics;
pub use metrics::{HubStats, SubscriberStats};
