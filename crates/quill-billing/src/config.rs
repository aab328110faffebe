//! Billing configuration.

use std::time::Duration;

/// Configuration for the billing client and license synchronizer.
#[derive(Debug, Clone)]
pub struct BillingConfig {
    /// Base URL of the billing service, without a trailing slash.
    pub base_url: String,
    /// Value sent in the `x-api-key` header on every request.
    pub api_key: String,
    /// How long a synced license counts as fresh. While the cached
    /// record is younger than this, resync serves it without an
    /// outbound call.
    pub freshness_window: Duration,
    /// The billable seat count reported to billing never drops below
    /// this floor.
    pub seat_floor: i64,
    /// Timeout for outbound billing requests.
    pub request_timeout: Duration,
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            api_key: String::new(),
            freshness_window: Duration::from_secs(3600),
            seat_floor: 12,
            request_timeout: Duration::from_secs(30),
        }
    }
}
