//! Hub configuration

use std::time::Duration;

/// Hub configuration options
#[derive(Debug, Clone)]
pub struct HubConfig {
    /// Frames that may wait in one subscriber's outbound queue.
    /// A publish that finds the queue full cancels that subscriber.
    /// Zero is treated as 1.
    pub outbound_capacity: usize,

    /// Upper bound on a single transport write
    pub write_timeout: Duration,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            outbound_capacity: 64,
            write_timeout: Duration::from_secs(10),
        }
    }
}

impl HubConfig {
    /// Set the per-subscriber queue capacity (minimum 1)
    pub fn outbound_capacity(mut self, capacity: usize) -> Self {
        self.outbound_capacity = capacity.max(1);
        self
    }

    /// Set the transport write timeout
    pub fn write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = timeout;
        self
    }
}
