//! Workspace license model - the local cache of the billing
//! authority's subscription state for a workspace.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Cached subscription state for one workspace. At most one license
/// row exists per workspace; the billing service is the source of
/// truth and this record is refreshed from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceLicense {
    /// Unique identifier.
    pub id: Uuid,
    /// Workspace this license belongs to.
    pub workspace_id: Uuid,
    /// Whether the subscription has been cancelled.
    pub is_cancelled: bool,
    /// Seats included before any purchase.
    pub free_seats: i64,
    /// Seats bought on top of the free allowance.
    pub purchased_seats: i64,
    /// Product plan identifier, e.g. `PRO`.
    pub plan: Option<String>,
    /// Billing interval, e.g. `month` or `year`.
    pub recurring_interval: Option<String>,
    /// End of the current billing period.
    pub current_period_end_date: Option<DateTime<Utc>>,
    /// Whether the subscription is settled outside the payment rails.
    pub is_offline_payment: bool,
    /// End of the trial period, if one is running.
    pub trial_end_date: Option<DateTime<Utc>>,
    /// Whether the workspace has ever started a free trial.
    pub has_activated_free_trial: bool,
    /// Whether a payment method is on file.
    pub has_added_payment_method: bool,
    /// Upstream subscription identifier.
    pub subscription: Option<String>,
    /// When this record was last refreshed from billing. Never moves
    /// backwards.
    pub last_synced_at: DateTime<Utc>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a license record after a successful fetch from
/// billing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateWorkspaceLicense {
    pub workspace_id: Uuid,
    pub is_cancelled: bool,
    pub free_seats: i64,
    pub purchased_seats: i64,
    pub plan: Option<String>,
    pub recurring_interval: Option<String>,
    pub current_period_end_date: Option<DateTime<Utc>>,
    pub is_offline_payment: bool,
    pub trial_end_date: Option<DateTime<Utc>>,
    pub has_activated_free_trial: bool,
    pub has_added_payment_method: bool,
    pub subscription: Option<String>,
    pub last_synced_at: DateTime<Utc>,
}

/// Refreshed state written over an existing license record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncedLicenseUpdate {
    pub is_cancelled: bool,
    pub free_seats: i64,
    pub purchased_seats: i64,
    pub plan: Option<String>,
    pub recurring_interval: Option<String>,
    pub current_period_end_date: Option<DateTime<Utc>>,
    pub is_offline_payment: bool,
    pub trial_end_date: Option<DateTime<Utc>>,
    pub has_activated_free_trial: bool,
    pub has_added_payment_method: bool,
    pub subscription: Option<String>,
    pub last_synced_at: DateTime<Utc>,
}
