//! Repository trait definitions for data access abstraction.
//!
//! Services are generic over these traits so the storage engine can be
//! swapped without touching business logic. All operations are async
//! and return [`crate::Result`].

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{
    CreateMember, CreatePage, CreateWorkspace, CreateWorkspaceLicense, Page, SyncedLicenseUpdate,
    UpdatePage, Workspace, WorkspaceLicense, WorkspaceMember,
};

// ---------------------------------------------------------------------------
// Workspace repository
// ---------------------------------------------------------------------------

/// Persistence operations for workspaces.
pub trait WorkspaceRepository: Send + Sync {
    /// Creates a new workspace. Fails if the slug is taken.
    fn create(&self, input: CreateWorkspace) -> impl Future<Output = Result<Workspace>> + Send;

    /// Fetches a workspace by id.
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = Result<Workspace>> + Send;

    /// Fetches a workspace by slug.
    fn get_by_slug(&self, slug: &str) -> impl Future<Output = Result<Workspace>> + Send;
}

// ---------------------------------------------------------------------------
// Member repository
// ---------------------------------------------------------------------------

/// Persistence operations for workspace memberships.
pub trait MemberRepository: Send + Sync {
    /// Adds a member to a workspace. Fails if the user already has a
    /// membership there.
    fn add(&self, input: CreateMember) -> impl Future<Output = Result<WorkspaceMember>> + Send;

    /// Fetches the membership of `user_id` in `workspace_id`, if any.
    fn get(
        &self,
        workspace_id: Uuid,
        user_id: Uuid,
    ) -> impl Future<Output = Result<Option<WorkspaceMember>>> + Send;

    /// Counts active, non-bot members. This is the billable seat count
    /// reported to the billing service.
    fn count_billable(&self, workspace_id: Uuid) -> impl Future<Output = Result<i64>> + Send;
}

// ---------------------------------------------------------------------------
// Page repository
// ---------------------------------------------------------------------------

/// Persistence operations for pages, including the subtree-wide
/// archival transitions.
pub trait PageRepository: Send + Sync {
    /// Creates a new page.
    fn create(&self, input: CreatePage) -> impl Future<Output = Result<Page>> + Send;

    /// Fetches a page by id within a workspace.
    fn get(&self, workspace_id: Uuid, id: Uuid) -> impl Future<Output = Result<Page>> + Send;

    /// Applies a partial update to a page.
    fn update(
        &self,
        workspace_id: Uuid,
        id: Uuid,
        input: UpdatePage,
    ) -> impl Future<Output = Result<Page>> + Send;

    /// Lists root pages of a workspace visible to `viewer`: public
    /// pages plus the viewer's own private ones.
    fn list_roots(
        &self,
        workspace_id: Uuid,
        viewer: Uuid,
    ) -> impl Future<Output = Result<Vec<Page>>> + Send;

    /// Sets `archived_at` on the page and every descendant in one
    /// statement. Passing `None` clears the subtree instead. Returns
    /// the number of pages touched.
    fn set_subtree_archived(
        &self,
        id: Uuid,
        archived_at: Option<DateTime<Utc>>,
    ) -> impl Future<Output = Result<u64>> + Send;

    /// Restores the page and its descendants. If the page's parent is
    /// itself archived the link is severed first, making the page a
    /// root. Both steps happen in one transaction. Returns the number
    /// of pages restored.
    fn unarchive_subtree(&self, id: Uuid) -> impl Future<Output = Result<u64>> + Send;

    /// Deletes the page after re-pointing its direct children to the
    /// root level, atomically. Returns the number of orphaned children.
    fn delete_and_orphan(&self, id: Uuid) -> impl Future<Output = Result<u64>> + Send;

    /// Sets or clears the lock flag.
    fn set_locked(
        &self,
        workspace_id: Uuid,
        id: Uuid,
        locked: bool,
    ) -> impl Future<Output = Result<Page>> + Send;

    /// Replaces the binary description state and its HTML rendering.
    fn set_description(
        &self,
        workspace_id: Uuid,
        id: Uuid,
        binary: Vec<u8>,
        html: String,
    ) -> impl Future<Output = Result<Page>> + Send;
}

// ---------------------------------------------------------------------------
// License repository
// ---------------------------------------------------------------------------

/// Persistence operations for the per-workspace license cache.
pub trait LicenseRepository: Send + Sync {
    /// Fetches the license record of a workspace, if one exists.
    fn get_by_workspace(
        &self,
        workspace_id: Uuid,
    ) -> impl Future<Output = Result<Option<WorkspaceLicense>>> + Send;

    /// Creates the license record for a workspace.
    fn create(
        &self,
        input: CreateWorkspaceLicense,
    ) -> impl Future<Output = Result<WorkspaceLicense>> + Send;

    /// Overwrites the synced fields of an existing license record.
    fn update_synced(
        &self,
        workspace_id: Uuid,
        input: SyncedLicenseUpdate,
    ) -> impl Future<Output = Result<WorkspaceLicense>> + Send;
}
