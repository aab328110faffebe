//! Integration tests for the page repository, covering the
//! recursive subtree transitions.

use chrono::Utc;
use uuid::Uuid;

use quill_core::Error;
use quill_core::models::{CreatePage, CreateWorkspace, Page, PageAccess, UpdatePage};
use quill_core::repository::{PageRepository, WorkspaceRepository};
use quill_db::repository::{LibsqlPageRepository, LibsqlWorkspaceRepository};
use quill_db::{DbConfig, DbManager, run_migrations};

async fn setup() -> (LibsqlPageRepository, Uuid) {
    let manager = DbManager::connect(&DbConfig::in_memory()).await.unwrap();
    run_migrations(&manager.connection()).await.unwrap();

    let workspaces = LibsqlWorkspaceRepository::new(manager.connection());
    let workspace = workspaces
        .create(CreateWorkspace {
            slug: "acme".to_string(),
            name: "Acme".to_string(),
        })
        .await
        .unwrap();

    (LibsqlPageRepository::new(manager.connection()), workspace.id)
}

async fn seed_page(
    pages: &LibsqlPageRepository,
    workspace_id: Uuid,
    parent_id: Option<Uuid>,
    name: &str,
    owned_by: Uuid,
) -> Page {
    pages
        .create(CreatePage {
            workspace_id,
            parent_id,
            name: name.to_string(),
            owned_by,
            access: PageAccess::Public,
            description_html: None,
        })
        .await
        .unwrap()
}

#[tokio::test]
async fn create_applies_defaults() {
    let (pages, workspace_id) = setup().await;
    let owner = Uuid::new_v4();

    let page = seed_page(&pages, workspace_id, None, "Handbook", owner).await;

    assert_eq!(page.description_html, "<p></p>");
    assert!(page.parent_id.is_none());
    assert!(page.archived_at.is_none());
    assert!(!page.is_locked);
    assert!(page.description_binary.is_none());
}

#[tokio::test]
async fn get_is_workspace_scoped() {
    let (pages, workspace_id) = setup().await;
    let page = seed_page(&pages, workspace_id, None, "Handbook", Uuid::new_v4()).await;

    let err = pages.get(Uuid::new_v4(), page.id).await.unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
}

#[tokio::test]
async fn update_moves_page_to_root() {
    let (pages, workspace_id) = setup().await;
    let owner = Uuid::new_v4();
    let root = seed_page(&pages, workspace_id, None, "Root", owner).await;
    let child = seed_page(&pages, workspace_id, Some(root.id), "Child", owner).await;

    let updated = pages
        .update(
            workspace_id,
            child.id,
            UpdatePage {
                name: Some("Promoted".to_string()),
                parent_id: Some(None),
                ..UpdatePage::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "Promoted");
    assert!(updated.parent_id.is_none());
}

#[tokio::test]
async fn update_with_no_fields_is_a_no_op() {
    let (pages, workspace_id) = setup().await;
    let page = seed_page(&pages, workspace_id, None, "Handbook", Uuid::new_v4()).await;

    let updated = pages
        .update(workspace_id, page.id, UpdatePage::default())
        .await
        .unwrap();
    assert_eq!(updated.name, "Handbook");
    assert_eq!(updated.updated_at, page.updated_at);
}

#[tokio::test]
async fn list_roots_respects_visibility() {
    let (pages, workspace_id) = setup().await;
    let owner = Uuid::new_v4();
    let viewer = Uuid::new_v4();

    let public_root = seed_page(&pages, workspace_id, None, "Public", owner).await;
    seed_page(&pages, workspace_id, Some(public_root.id), "Child", owner).await;
    pages
        .create(CreatePage {
            workspace_id,
            parent_id: None,
            name: "Owner secret".to_string(),
            owned_by: owner,
            access: PageAccess::Private,
            description_html: None,
        })
        .await
        .unwrap();
    pages
        .create(CreatePage {
            workspace_id,
            parent_id: None,
            name: "Viewer secret".to_string(),
            owned_by: viewer,
            access: PageAccess::Private,
            description_html: None,
        })
        .await
        .unwrap();

    let visible = pages.list_roots(workspace_id, viewer).await.unwrap();
    let names: Vec<&str> = visible.iter().map(|p| p.name.as_str()).collect();

    // Public roots and the viewer's own private root; no children, no
    // foreign private pages.
    assert_eq!(visible.len(), 2);
    assert!(names.contains(&"Public"));
    assert!(names.contains(&"Viewer secret"));
}

#[tokio::test]
async fn archive_stamps_whole_subtree_with_one_timestamp() {
    let (pages, workspace_id) = setup().await;
    let owner = Uuid::new_v4();

    let root = seed_page(&pages, workspace_id, None, "Root", owner).await;
    let child = seed_page(&pages, workspace_id, Some(root.id), "Child", owner).await;
    let grandchild = seed_page(&pages, workspace_id, Some(child.id), "Grandchild", owner).await;
    let bystander = seed_page(&pages, workspace_id, None, "Bystander", owner).await;

    let stamp = Utc::now();
    let affected = pages
        .set_subtree_archived(root.id, Some(stamp))
        .await
        .unwrap();
    assert_eq!(affected, 3);

    for id in [root.id, child.id, grandchild.id] {
        let page = pages.get(workspace_id, id).await.unwrap();
        assert_eq!(page.archived_at, Some(stamp));
    }
    let untouched = pages.get(workspace_id, bystander.id).await.unwrap();
    assert!(untouched.archived_at.is_none());
}

#[tokio::test]
async fn archive_mid_tree_leaves_ancestors_alone() {
    let (pages, workspace_id) = setup().await;
    let owner = Uuid::new_v4();

    let root = seed_page(&pages, workspace_id, None, "Root", owner).await;
    let mid = seed_page(&pages, workspace_id, Some(root.id), "Mid", owner).await;
    let leaf = seed_page(&pages, workspace_id, Some(mid.id), "Leaf", owner).await;

    let affected = pages
        .set_subtree_archived(mid.id, Some(Utc::now()))
        .await
        .unwrap();
    assert_eq!(affected, 2);

    assert!(pages.get(workspace_id, root.id).await.unwrap().archived_at.is_none());
    assert!(pages.get(workspace_id, mid.id).await.unwrap().archived_at.is_some());
    assert!(pages.get(workspace_id, leaf.id).await.unwrap().archived_at.is_some());
}

#[tokio::test]
async fn archive_handles_deep_chains() {
    let (pages, workspace_id) = setup().await;
    let owner = Uuid::new_v4();

    let root = seed_page(&pages, workspace_id, None, "Depth 0", owner).await;
    let mut parent = root.id;
    for depth in 1..32 {
        let page = seed_page(
            &pages,
            workspace_id,
            Some(parent),
            &format!("Depth {depth}"),
            owner,
        )
        .await;
        parent = page.id;
    }

    let affected = pages
        .set_subtree_archived(root.id, Some(Utc::now()))
        .await
        .unwrap();
    assert_eq!(affected, 32);
}

#[tokio::test]
async fn unarchive_restores_descendants() {
    let (pages, workspace_id) = setup().await;
    let owner = Uuid::new_v4();

    let root = seed_page(&pages, workspace_id, None, "Root", owner).await;
    let child = seed_page(&pages, workspace_id, Some(root.id), "Child", owner).await;

    pages
        .set_subtree_archived(root.id, Some(Utc::now()))
        .await
        .unwrap();
    let affected = pages.unarchive_subtree(root.id).await.unwrap();
    assert_eq!(affected, 2);

    let root = pages.get(workspace_id, root.id).await.unwrap();
    let child = pages.get(workspace_id, child.id).await.unwrap();
    assert!(root.archived_at.is_none());
    assert!(child.archived_at.is_none());
    // The root's parent linkage is untouched.
    assert_eq!(child.parent_id, Some(root.id));
}

#[tokio::test]
async fn unarchive_under_archived_parent_detaches_to_root() {
    let (pages, workspace_id) = setup().await;
    let owner = Uuid::new_v4();

    let parent = seed_page(&pages, workspace_id, None, "Parent", owner).await;
    let child = seed_page(&pages, workspace_id, Some(parent.id), "Child", owner).await;

    pages
        .set_subtree_archived(parent.id, Some(Utc::now()))
        .await
        .unwrap();
    pages.unarchive_subtree(child.id).await.unwrap();

    let child = pages.get(workspace_id, child.id).await.unwrap();
    assert!(child.archived_at.is_none());
    assert!(child.parent_id.is_none());

    // The parent stays archived.
    let parent = pages.get(workspace_id, parent.id).await.unwrap();
    assert!(parent.archived_at.is_some());
}

#[tokio::test]
async fn unarchive_under_live_parent_keeps_the_link() {
    let (pages, workspace_id) = setup().await;
    let owner = Uuid::new_v4();

    let parent = seed_page(&pages, workspace_id, None, "Parent", owner).await;
    let child = seed_page(&pages, workspace_id, Some(parent.id), "Child", owner).await;

    pages
        .set_subtree_archived(child.id, Some(Utc::now()))
        .await
        .unwrap();
    pages.unarchive_subtree(child.id).await.unwrap();

    let child = pages.get(workspace_id, child.id).await.unwrap();
    assert!(child.archived_at.is_none());
    assert_eq!(child.parent_id, Some(parent.id));
}

#[tokio::test]
async fn delete_orphans_direct_children() {
    let (pages, workspace_id) = setup().await;
    let owner = Uuid::new_v4();

    let parent = seed_page(&pages, workspace_id, None, "Parent", owner).await;
    let child_a = seed_page(&pages, workspace_id, Some(parent.id), "A", owner).await;
    let child_b = seed_page(&pages, workspace_id, Some(parent.id), "B", owner).await;
    let grandchild = seed_page(&pages, workspace_id, Some(child_a.id), "A1", owner).await;

    let orphaned = pages.delete_and_orphan(parent.id).await.unwrap();
    assert_eq!(orphaned, 2);

    let err = pages.get(workspace_id, parent.id).await.unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));

    // Direct children are promoted to roots; deeper levels keep their
    // links.
    assert!(pages.get(workspace_id, child_a.id).await.unwrap().parent_id.is_none());
    assert!(pages.get(workspace_id, child_b.id).await.unwrap().parent_id.is_none());
    assert_eq!(
        pages.get(workspace_id, grandchild.id).await.unwrap().parent_id,
        Some(child_a.id)
    );
}

#[tokio::test]
async fn lock_round_trip() {
    let (pages, workspace_id) = setup().await;
    let page = seed_page(&pages, workspace_id, None, "Handbook", Uuid::new_v4()).await;

    let locked = pages.set_locked(workspace_id, page.id, true).await.unwrap();
    assert!(locked.is_locked);

    let unlocked = pages.set_locked(workspace_id, page.id, false).await.unwrap();
    assert!(!unlocked.is_locked);
}

#[tokio::test]
async fn set_description_stores_binary_state() {
    let (pages, workspace_id) = setup().await;
    let page = seed_page(&pages, workspace_id, None, "Handbook", Uuid::new_v4()).await;

    let binary = vec![0x01, 0x02, 0xff, 0x00, 0x7f];
    let updated = pages
        .set_description(
            workspace_id,
            page.id,
            binary.clone(),
            "<p>hello</p>".to_string(),
        )
        .await
        .unwrap();

    assert_eq!(updated.description_binary.as_deref(), Some(binary.as_slice()));
    assert_eq!(updated.description_html, "<p>hello</p>");
}
