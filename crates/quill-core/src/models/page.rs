//! Page model.
//!
//! Pages form a forest inside a workspace through a nullable parent
//! pointer. Archival state applies to whole subtrees at once: when a
//! page is archived, every descendant carries the same `archived_at`
//! timestamp.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default rich-text body of a freshly created page.
pub const EMPTY_DESCRIPTION_HTML: &str = "<p></p>";

/// Visibility of a page within its workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageAccess {
    /// Visible to every workspace member.
    Public = 0,
    /// Visible to the owner only.
    Private = 1,
}

impl PageAccess {
    /// Numeric code as persisted.
    pub fn as_code(self) -> i64 {
        self as i64
    }

    /// Parses a persisted code back into an access level.
    pub fn from_code(code: i64) -> Option<PageAccess> {
        match code {
            0 => Some(PageAccess::Public),
            1 => Some(PageAccess::Private),
            _ => None,
        }
    }
}

/// A page in a workspace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Unique identifier.
    pub id: Uuid,
    /// Workspace this page belongs to.
    pub workspace_id: Uuid,
    /// Parent page, `None` for roots. The parent chain is acyclic.
    pub parent_id: Option<Uuid>,
    /// Page title.
    pub name: String,
    /// User id of the page owner.
    pub owned_by: Uuid,
    /// Visibility level.
    pub access: PageAccess,
    /// Locked pages reject content edits until unlocked.
    pub is_locked: bool,
    /// `None` while the page is live. Set for an entire subtree when
    /// an ancestor is archived.
    pub archived_at: Option<DateTime<Utc>>,
    /// Rich-text body.
    pub description_html: String,
    /// Collaborative-editor binary state, if the page has one.
    pub description_binary: Option<Vec<u8>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Page {
    /// Whether the page is currently archived.
    pub fn is_archived(&self) -> bool {
        self.archived_at.is_some()
    }
}

/// Input for creating a new page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePage {
    pub workspace_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub name: String,
    pub owned_by: Uuid,
    pub access: PageAccess,
    /// Body to start with; defaults to [`EMPTY_DESCRIPTION_HTML`].
    pub description_html: Option<String>,
}

/// Fields of a page that can be updated. `None` leaves a field
/// untouched; `parent_id` uses a nested option so a page can be moved
/// to the root level.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePage {
    pub name: Option<String>,
    pub parent_id: Option<Option<Uuid>>,
    pub access: Option<PageAccess>,
    pub description_html: Option<String>,
}
