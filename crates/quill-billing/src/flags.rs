//! Feature-flag gating for payment-gated surfaces.
//!
//! Flag evaluation is a capability handed to callers rather than
//! process-wide state: handlers receive a [`FlagClient`] and consult
//! it per request, so tests and single-tenant deployments can wire a
//! fixed answer.

use uuid::Uuid;

use quill_core::error::{Error, Result};

/// Payment-gated features known to this service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureFlag {
    /// Workspace-level pages.
    WorkspacePages,
    /// The active-cycles dashboard.
    ActiveCycles,
}

impl FeatureFlag {
    /// Evaluation key sent to the flag backend.
    pub fn key(self) -> &'static str {
        match self {
            FeatureFlag::WorkspacePages => "WORKSPACE_PAGES",
            FeatureFlag::ActiveCycles => "ACTIVE_CYCLES",
        }
    }
}

/// Capability to evaluate a feature flag for a user in a workspace.
pub trait FlagClient: Send + Sync {
    /// Returns whether the flag is enabled; `default_value` applies
    /// when the flag backend has no answer.
    fn evaluate(
        &self,
        flag: FeatureFlag,
        user_id: Uuid,
        workspace_slug: &str,
        default_value: bool,
    ) -> impl Future<Output = bool> + Send;
}

/// Passes when the flag is enabled for the user, rejects with a
/// payment-required error otherwise.
pub async fn require_flag<F: FlagClient>(
    flags: &F,
    flag: FeatureFlag,
    user_id: Uuid,
    workspace_slug: &str,
) -> Result<()> {
    if flags.evaluate(flag, user_id, workspace_slug, false).await {
        Ok(())
    } else {
        Err(Error::PaymentRequired {
            flag: flag.key().to_string(),
        })
    }
}

/// Flag client with one fixed answer for every flag.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticFlagClient {
    pub enabled: bool,
}

impl FlagClient for StaticFlagClient {
    async fn evaluate(
        &self,
        _flag: FeatureFlag,
        _user_id: Uuid,
        _workspace_slug: &str,
        default_value: bool,
    ) -> bool {
        self.enabled || default_value
    }
}
