//! License synchronization service.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use quill_core::error::Result;
use quill_core::models::{CreateWorkspaceLicense, SyncedLicenseUpdate, WorkspaceLicense};
use quill_core::repository::{LicenseRepository, MemberRepository, WorkspaceRepository};

use crate::client::{BillingClient, LicensePayload};
use crate::config::BillingConfig;

/// Caller-facing license view. The shape is identical whether the
/// cache was fresh, refreshed, or created by the call that produced
/// it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LicenseSnapshot {
    pub is_cancelled: bool,
    pub purchased_seats: i64,
    pub free_seats: i64,
    pub current_period_end_date: Option<DateTime<Utc>>,
    pub interval: Option<String>,
    /// Plan identifier; billing calls this the product.
    pub product: Option<String>,
    pub is_offline_payment: bool,
    pub trial_end_date: Option<DateTime<Utc>>,
    pub has_activated_free_trial: bool,
    pub has_added_payment_method: bool,
    pub subscription: Option<String>,
}

impl LicenseSnapshot {
    fn from_license(license: &WorkspaceLicense) -> Self {
        Self {
            is_cancelled: license.is_cancelled,
            purchased_seats: license.purchased_seats,
            free_seats: license.free_seats,
            current_period_end_date: license.current_period_end_date,
            interval: license.recurring_interval.clone(),
            product: license.plan.clone(),
            is_offline_payment: license.is_offline_payment,
            trial_end_date: license.trial_end_date,
            has_activated_free_trial: license.has_activated_free_trial,
            has_added_payment_method: license.has_added_payment_method,
            subscription: license.subscription.clone(),
        }
    }
}

/// License service, generic over the repositories and the billing
/// client.
pub struct LicenseService<W, M, L, B>
where
    W: WorkspaceRepository,
    M: MemberRepository,
    L: LicenseRepository,
    B: BillingClient,
{
    workspaces: W,
    members: M,
    licenses: L,
    billing: B,
    config: BillingConfig,
}

impl<W, M, L, B> LicenseService<W, M, L, B>
where
    W: WorkspaceRepository,
    M: MemberRepository,
    L: LicenseRepository,
    B: BillingClient,
{
    /// Creates a new license service.
    pub fn new(workspaces: W, members: M, licenses: L, billing: B, config: BillingConfig) -> Self {
        Self {
            workspaces,
            members,
            licenses,
            billing,
            config,
        }
    }

    /// Returns the current license of a workspace, refreshing the
    /// local cache from the billing service when it is stale, missing,
    /// or `force` is set.
    pub async fn resync(&self, workspace_slug: &str, force: bool) -> Result<LicenseSnapshot> {
        // 1. Resolve the workspace.
        let workspace = self.workspaces.get_by_slug(workspace_slug).await?;

        // 2. Serve from the cache while it is inside the freshness
        //    window.
        let cached = self.licenses.get_by_workspace(workspace.id).await?;
        if let Some(license) = &cached {
            if !force && !self.is_stale(license) {
                debug!(slug = workspace_slug, "License cache fresh, serving locally");
                return Ok(LicenseSnapshot::from_license(license));
            }
        }

        // 3. One outbound fetch, reporting the floored billable seat
        //    count.
        let billable = self.members.count_billable(workspace.id).await?;
        let seats = billable.max(self.config.seat_floor);
        let payload = self
            .billing
            .fetch_workspace_license(workspace.id, &workspace.slug, seats)
            .await?;

        // 4. Merge the payload over the cache. The timestamp moves
        //    forward only on success; failures above left the old
        //    record untouched.
        let now = Utc::now();
        let license = match cached {
            Some(_) => {
                self.licenses
                    .update_synced(workspace.id, synced_update(&payload, now))
                    .await?
            }
            None => {
                self.licenses
                    .create(new_license(workspace.id, &payload, now))
                    .await?
            }
        };

        info!(slug = workspace_slug, forced = force, "Workspace license synchronized");
        Ok(LicenseSnapshot::from_license(&license))
    }

    fn is_stale(&self, license: &WorkspaceLicense) -> bool {
        let age = Utc::now().signed_duration_since(license.last_synced_at);
        age.num_seconds() > self.config.freshness_window.as_secs() as i64
    }
}

fn synced_update(payload: &LicensePayload, now: DateTime<Utc>) -> SyncedLicenseUpdate {
    SyncedLicenseUpdate {
        is_cancelled: payload.is_cancelled,
        free_seats: payload.free_seats,
        purchased_seats: payload.purchased_seats,
        plan: payload.plan.clone(),
        recurring_interval: payload.interval.clone(),
        current_period_end_date: payload.current_period_end_date,
        is_offline_payment: payload.is_offline_payment,
        trial_end_date: payload.trial_end_date,
        has_activated_free_trial: payload.has_activated_free_trial,
        has_added_payment_method: payload.has_added_payment_method,
        subscription: payload.subscription.clone(),
        last_synced_at: now,
    }
}

fn new_license(
    workspace_id: Uuid,
    payload: &LicensePayload,
    now: DateTime<Utc>,
) -> CreateWorkspaceLicense {
    CreateWorkspaceLicense {
        workspace_id,
        is_cancelled: payload.is_cancelled,
        free_seats: payload.free_seats,
        purchased_seats: payload.purchased_seats,
        plan: payload.plan.clone(),
        recurring_interval: payload.interval.clone(),
        current_period_end_date: payload.current_period_end_date,
        is_offline_payment: payload.is_offline_payment,
        trial_end_date: payload.trial_end_date,
        has_activated_free_trial: payload.has_activated_free_trial,
        has_added_payment_method: payload.has_added_payment_method,
        subscription: payload.subscription.clone(),
        last_synced_at: now,
    }
}
