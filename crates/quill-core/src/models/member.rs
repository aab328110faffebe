//! Workspace membership model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Workspace role, ordered by privilege. The discriminants are the
/// ranks persisted by the store and must not be renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    Guest = 5,
    Member = 10,
    Admin = 15,
    Owner = 20,
}

impl Role {
    /// Numeric rank as persisted.
    pub fn as_rank(self) -> i64 {
        self as i64
    }

    /// Parses a persisted rank back into a role.
    pub fn from_rank(rank: i64) -> Option<Role> {
        match rank {
            5 => Some(Role::Guest),
            10 => Some(Role::Member),
            15 => Some(Role::Admin),
            20 => Some(Role::Owner),
            _ => None,
        }
    }

    /// Whether this role may manage pages owned by other members.
    pub fn is_admin_or_above(self) -> bool {
        self >= Role::Admin
    }
}

/// A user's membership in a workspace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceMember {
    /// Unique identifier of the membership row.
    pub id: Uuid,
    /// Workspace this membership belongs to.
    pub workspace_id: Uuid,
    /// Member user id.
    pub user_id: Uuid,
    /// Role held within the workspace.
    pub role: Role,
    /// Deactivated memberships keep history but grant nothing.
    pub is_active: bool,
    /// Bot members act for integrations and never occupy a billable seat.
    pub is_bot: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Input for adding a member to a workspace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMember {
    pub workspace_id: Uuid,
    pub user_id: Uuid,
    pub role: Role,
    pub is_bot: bool,
}
