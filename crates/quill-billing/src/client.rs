//! Outbound client for the billing service.

use chrono::{DateTime, Utc};
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::config::BillingConfig;
use crate::error::BillingError;

/// Subscription state for one workspace as reported by the billing
/// service. Fields the service omits deserialize to the documented
/// defaults rather than failing the sync.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LicensePayload {
    pub is_cancelled: bool,
    #[serde(default = "default_free_seats")]
    pub free_seats: i64,
    pub purchased_seats: i64,
    pub current_period_end_date: Option<DateTime<Utc>>,
    /// Billing interval; persisted as `recurring_interval`.
    pub interval: Option<String>,
    pub plan: Option<String>,
    pub is_offline_payment: bool,
    pub trial_end_date: Option<DateTime<Utc>>,
    pub has_activated_free_trial: bool,
    pub has_added_payment_method: bool,
    pub subscription: Option<String>,
}

impl Default for LicensePayload {
    fn default() -> Self {
        Self {
            is_cancelled: false,
            free_seats: default_free_seats(),
            purchased_seats: 0,
            current_period_end_date: None,
            interval: None,
            plan: None,
            is_offline_payment: false,
            trial_end_date: None,
            has_activated_free_trial: false,
            has_added_payment_method: false,
            subscription: None,
        }
    }
}

fn default_free_seats() -> i64 {
    12
}

/// Capability to fetch the authoritative license state of a
/// workspace. The license service is generic over this so tests swap
/// the HTTP transport for a scripted client.
pub trait BillingClient: Send + Sync {
    fn fetch_workspace_license(
        &self,
        workspace_id: Uuid,
        workspace_slug: &str,
        free_seats: i64,
    ) -> impl Future<Output = Result<LicensePayload, BillingError>> + Send;
}

#[derive(Debug, Serialize)]
struct FetchLicenseRequest<'a> {
    workspace_slug: &'a str,
    free_seats: i64,
}

/// reqwest-backed [`BillingClient`].
#[derive(Clone)]
pub struct HttpBillingClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpBillingClient {
    /// Builds the client from configuration.
    pub fn new(config: &BillingConfig) -> Result<Self, BillingError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| BillingError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }
}

impl BillingClient for HttpBillingClient {
    async fn fetch_workspace_license(
        &self,
        workspace_id: Uuid,
        workspace_slug: &str,
        free_seats: i64,
    ) -> Result<LicensePayload, BillingError> {
        let url = format!(
            "{}/api/products/workspace-products/{}/",
            self.base_url, workspace_id
        );
        debug!(%url, workspace_slug, free_seats, "Fetching workspace license");

        let response = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .header("x-api-key", &self.api_key)
            .json(&FetchLicenseRequest {
                workspace_slug,
                free_seats,
            })
            .send()
            .await
            .map_err(|e| BillingError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BillingError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<LicensePayload>()
            .await
            .map_err(|e| BillingError::Decode(e.to_string()))
    }
}
