//! Gateway runtime configuration and state

use std::time::Duration;

/// Configuration shared by all handlers.
///
/// The pacing delays exist purely to reduce upstream rate-limit pressure
/// between sequential items. They are a placeholder policy with no
/// relation to actual rate-limit headers, so they are configurable and
/// zeroed in tests.
#[derive(Debug, Clone)]
pub struct GatewayState {
    /// Server-side fallback key; a request-body key takes precedence.
    pub server_api_key: Option<String>,
    /// Delay between items in bulk (buffered) mode.
    pub bulk_pacing: Duration,
    /// Delay between items in streaming mode, shorter since progress is
    /// visible to the caller throughout.
    pub stream_pacing: Duration,
}

impl GatewayState {
    pub fn new(server_api_key: Option<String>) -> Self {
        Self {
            server_api_key,
            bulk_pacing: Duration::from_millis(1000),
            stream_pacing: Duration::from_millis(500),
        }
    }
}
