//! Configuration options for the Snaplist client

use std::time::Duration;

/// Configuration options for the Snaplist client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Per-request timeout; requests exceeding it fail with `Error::Timeout`
    pub request_timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl ClientOptions {
    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Duration) -> Self {
        self.request_timeout = value;
        self
    }
}
