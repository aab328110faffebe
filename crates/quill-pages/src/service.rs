//! Page service implementation.
//!
//! All operations are workspace-scoped and take the acting user
//! explicitly. Archive, restore, delete, and the lock toggles share
//! one authorization rule: the actor must own the page or hold an
//! admin role in the workspace.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use quill_core::error::Result;
use quill_core::models::{CreatePage, Page, PageAccess, UpdatePage, WorkspaceMember};
use quill_core::repository::{MemberRepository, PageRepository};

use crate::error::PageError;

/// Input for creating a page.
#[derive(Debug, Clone)]
pub struct CreatePageInput {
    pub parent_id: Option<Uuid>,
    pub name: String,
    pub access: PageAccess,
    pub description_html: Option<String>,
}

/// Input for updating page fields. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdatePageInput {
    pub name: Option<String>,
    pub parent_id: Option<Option<Uuid>>,
    pub access: Option<PageAccess>,
    pub description_html: Option<String>,
}

/// Page service, generic over the page and membership repositories.
pub struct PageService<P, M>
where
    P: PageRepository,
    M: MemberRepository,
{
    pages: P,
    members: M,
}

impl<P, M> PageService<P, M>
where
    P: PageRepository,
    M: MemberRepository,
{
    /// Creates a new page service.
    pub fn new(pages: P, members: M) -> Self {
        Self { pages, members }
    }

    /// Creates a page owned by the acting user.
    pub async fn create(
        &self,
        workspace_id: Uuid,
        actor: Uuid,
        input: CreatePageInput,
    ) -> Result<Page> {
        // 1. The actor needs an active membership.
        self.require_membership(workspace_id, actor).await?;

        // 2. A parent, when given, must exist in the same workspace.
        if let Some(parent_id) = input.parent_id {
            self.pages.get(workspace_id, parent_id).await?;
        }

        // 3. Persist with the actor as owner.
        let page = self
            .pages
            .create(CreatePage {
                workspace_id,
                parent_id: input.parent_id,
                name: input.name,
                owned_by: actor,
                access: input.access,
                description_html: input.description_html,
            })
            .await?;

        info!(page_id = %page.id, workspace_id = %workspace_id, "Page created");
        Ok(page)
    }

    /// Fetches a single page. Private pages resolve only for their
    /// owner; everyone else sees not-found rather than a hint that the
    /// page exists.
    pub async fn retrieve(&self, workspace_id: Uuid, page_id: Uuid, actor: Uuid) -> Result<Page> {
        self.require_membership(workspace_id, actor).await?;
        let page = self.pages.get(workspace_id, page_id).await?;

        if page.access == PageAccess::Private && page.owned_by != actor {
            return Err(quill_core::Error::NotFound {
                entity: "page".to_string(),
                id: page_id.to_string(),
            });
        }
        Ok(page)
    }

    /// Lists root pages visible to the actor.
    pub async fn list(&self, workspace_id: Uuid, actor: Uuid) -> Result<Vec<Page>> {
        self.require_membership(workspace_id, actor).await?;
        self.pages.list_roots(workspace_id, actor).await
    }

    /// Applies a partial update to a page.
    pub async fn update(
        &self,
        workspace_id: Uuid,
        page_id: Uuid,
        actor: Uuid,
        input: UpdatePageInput,
    ) -> Result<Page> {
        self.require_membership(workspace_id, actor).await?;

        // 1. Locked pages reject every edit.
        let page = self.pages.get(workspace_id, page_id).await?;
        if page.is_locked {
            return Err(PageError::Locked.into());
        }

        // 2. Visibility changes are reserved for the owner.
        if let Some(access) = input.access {
            if access != page.access && page.owned_by != actor {
                return Err(PageError::AccessChangeForbidden.into());
            }
        }

        // 3. A new parent must exist in the same workspace.
        if let Some(Some(parent_id)) = input.parent_id {
            self.pages.get(workspace_id, parent_id).await?;
        }

        self.pages
            .update(
                workspace_id,
                page_id,
                UpdatePage {
                    name: input.name,
                    parent_id: input.parent_id,
                    access: input.access,
                    description_html: input.description_html,
                },
            )
            .await
    }

    /// Archives a page together with every descendant. The whole
    /// subtree receives one shared timestamp, which is returned.
    pub async fn archive(
        &self,
        workspace_id: Uuid,
        page_id: Uuid,
        actor: Uuid,
    ) -> Result<DateTime<Utc>> {
        // 1. Resolve the page within the workspace.
        let page = self.pages.get(workspace_id, page_id).await?;

        // 2. Owner-or-admin check.
        self.authorize_manage(&page, actor, "archive").await?;

        // 3. Stamp the subtree in one statement.
        let archived_at = Utc::now();
        let affected = self
            .pages
            .set_subtree_archived(page_id, Some(archived_at))
            .await?;

        info!(page_id = %page_id, pages = affected, "Page subtree archived");
        Ok(archived_at)
    }

    /// Restores a page together with every descendant. When the
    /// page's parent is itself archived, the page detaches and comes
    /// back as a root.
    pub async fn unarchive(&self, workspace_id: Uuid, page_id: Uuid, actor: Uuid) -> Result<()> {
        let page = self.pages.get(workspace_id, page_id).await?;
        self.authorize_manage(&page, actor, "unarchive").await?;

        let affected = self.pages.unarchive_subtree(page_id).await?;
        info!(page_id = %page_id, pages = affected, "Page subtree restored");
        Ok(())
    }

    /// Permanently deletes an archived page. Direct children survive
    /// and are promoted to roots.
    pub async fn delete(&self, workspace_id: Uuid, page_id: Uuid, actor: Uuid) -> Result<()> {
        let page = self.pages.get(workspace_id, page_id).await?;
        self.authorize_manage(&page, actor, "delete").await?;

        // Only archived pages can be deleted.
        if !page.is_archived() {
            return Err(PageError::NotArchived.into());
        }

        let orphaned = self.pages.delete_and_orphan(page_id).await?;
        info!(page_id = %page_id, orphaned, "Page deleted");
        Ok(())
    }

    /// Locks a page against content edits.
    pub async fn lock(&self, workspace_id: Uuid, page_id: Uuid, actor: Uuid) -> Result<Page> {
        let page = self.pages.get(workspace_id, page_id).await?;
        self.authorize_manage(&page, actor, "lock").await?;
        self.pages.set_locked(workspace_id, page_id, true).await
    }

    /// Unlocks a page.
    pub async fn unlock(&self, workspace_id: Uuid, page_id: Uuid, actor: Uuid) -> Result<Page> {
        let page = self.pages.get(workspace_id, page_id).await?;
        self.authorize_manage(&page, actor, "unlock").await?;
        self.pages.set_locked(workspace_id, page_id, false).await
    }

    /// Returns the binary description state of a page, subject to the
    /// same visibility rules as [`Self::retrieve`].
    pub async fn description(
        &self,
        workspace_id: Uuid,
        page_id: Uuid,
        actor: Uuid,
    ) -> Result<Option<Vec<u8>>> {
        let page = self.retrieve(workspace_id, page_id, actor).await?;
        Ok(page.description_binary)
    }

    /// Replaces the description of a page. The binary editor state
    /// arrives base64-encoded together with its HTML rendering.
    pub async fn update_description(
        &self,
        workspace_id: Uuid,
        page_id: Uuid,
        actor: Uuid,
        payload_base64: &str,
        html: String,
    ) -> Result<Page> {
        self.require_membership(workspace_id, actor).await?;

        let page = self.pages.get(workspace_id, page_id).await?;
        if page.is_locked {
            return Err(PageError::Locked.into());
        }

        let binary = BASE64
            .decode(payload_base64)
            .map_err(|e| PageError::InvalidPayload(e.to_string()))?;

        debug!(page_id = %page_id, bytes = binary.len(), "Updating page description");
        self.pages
            .set_description(workspace_id, page_id, binary, html)
            .await
    }

    /// Resolves the actor's active membership or rejects.
    async fn require_membership(&self, workspace_id: Uuid, actor: Uuid) -> Result<WorkspaceMember> {
        match self.members.get(workspace_id, actor).await? {
            Some(member) if member.is_active => Ok(member),
            _ => Err(PageError::NotAMember.into()),
        }
    }

    /// Owner-or-admin rule shared by archive, unarchive, delete, and
    /// the lock toggles.
    async fn authorize_manage(&self, page: &Page, actor: Uuid, action: &'static str) -> Result<()> {
        let member = self.require_membership(page.workspace_id, actor).await?;

        if page.owned_by == actor || member.role.is_admin_or_above() {
            return Ok(());
        }
        debug!(page_id = %page.id, actor = %actor, action, "Page management denied");
        Err(PageError::NotOwnerOrAdmin { action }.into())
    }
}
