//! Integration tests for the workspace and membership repositories.

use uuid::Uuid;

use quill_core::Error;
use quill_core::models::{CreateMember, CreateWorkspace, Role};
use quill_core::repository::{MemberRepository, WorkspaceRepository};
use quill_db::repository::{LibsqlMemberRepository, LibsqlWorkspaceRepository};
use quill_db::{DbConfig, DbManager, run_migrations};

async fn setup() -> (DbManager, LibsqlWorkspaceRepository, LibsqlMemberRepository) {
    let manager = DbManager::connect(&DbConfig::in_memory()).await.unwrap();
    run_migrations(&manager.connection()).await.unwrap();

    let workspaces = LibsqlWorkspaceRepository::new(manager.connection());
    let members = LibsqlMemberRepository::new(manager.connection());
    (manager, workspaces, members)
}

#[tokio::test]
async fn create_and_fetch_workspace() {
    let (_manager, workspaces, _members) = setup().await;

    let created = workspaces
        .create(CreateWorkspace {
            slug: "acme-inc".to_string(),
            name: "Acme Inc".to_string(),
        })
        .await
        .unwrap();

    let by_id = workspaces.get_by_id(created.id).await.unwrap();
    assert_eq!(by_id.slug, "acme-inc");
    assert_eq!(by_id.name, "Acme Inc");

    let by_slug = workspaces.get_by_slug("acme-inc").await.unwrap();
    assert_eq!(by_slug.id, created.id);
}

#[tokio::test]
async fn duplicate_slug_is_rejected() {
    let (_manager, workspaces, _members) = setup().await;

    workspaces
        .create(CreateWorkspace {
            slug: "acme".to_string(),
            name: "Acme".to_string(),
        })
        .await
        .unwrap();

    let result = workspaces
        .create(CreateWorkspace {
            slug: "acme".to_string(),
            name: "Other Acme".to_string(),
        })
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn unknown_workspace_is_not_found() {
    let (_manager, workspaces, _members) = setup().await;

    let err = workspaces.get_by_slug("missing").await.unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));

    let err = workspaces.get_by_id(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
}

#[tokio::test]
async fn add_and_fetch_member() {
    let (_manager, workspaces, members) = setup().await;

    let workspace = workspaces
        .create(CreateWorkspace {
            slug: "acme".to_string(),
            name: "Acme".to_string(),
        })
        .await
        .unwrap();
    let user_id = Uuid::new_v4();

    let member = members
        .add(CreateMember {
            workspace_id: workspace.id,
            user_id,
            role: Role::Admin,
            is_bot: false,
        })
        .await
        .unwrap();
    assert_eq!(member.role, Role::Admin);
    assert!(member.is_active);
    assert!(!member.is_bot);

    let fetched = members.get(workspace.id, user_id).await.unwrap().unwrap();
    assert_eq!(fetched.id, member.id);

    // A user without a membership resolves to None.
    let absent = members.get(workspace.id, Uuid::new_v4()).await.unwrap();
    assert!(absent.is_none());
}

#[tokio::test]
async fn member_is_unique_per_workspace() {
    let (_manager, workspaces, members) = setup().await;

    let workspace = workspaces
        .create(CreateWorkspace {
            slug: "acme".to_string(),
            name: "Acme".to_string(),
        })
        .await
        .unwrap();
    let user_id = Uuid::new_v4();

    members
        .add(CreateMember {
            workspace_id: workspace.id,
            user_id,
            role: Role::Member,
            is_bot: false,
        })
        .await
        .unwrap();

    let result = members
        .add(CreateMember {
            workspace_id: workspace.id,
            user_id,
            role: Role::Guest,
            is_bot: false,
        })
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn count_billable_excludes_bots_and_inactive() {
    let (manager, workspaces, members) = setup().await;

    let workspace = workspaces
        .create(CreateWorkspace {
            slug: "acme".to_string(),
            name: "Acme".to_string(),
        })
        .await
        .unwrap();

    for role in [Role::Owner, Role::Admin, Role::Member] {
        members
            .add(CreateMember {
                workspace_id: workspace.id,
                user_id: Uuid::new_v4(),
                role,
                is_bot: false,
            })
            .await
            .unwrap();
    }
    let bot = members
        .add(CreateMember {
            workspace_id: workspace.id,
            user_id: Uuid::new_v4(),
            role: Role::Member,
            is_bot: true,
        })
        .await
        .unwrap();
    let deactivated = members
        .add(CreateMember {
            workspace_id: workspace.id,
            user_id: Uuid::new_v4(),
            role: Role::Guest,
            is_bot: false,
        })
        .await
        .unwrap();
    manager
        .connection()
        .execute(
            "UPDATE workspace_members SET is_active = 0 WHERE id = ?1",
            libsql::params![deactivated.id.to_string()],
        )
        .await
        .unwrap();

    assert!(bot.is_bot);
    assert_eq!(members.count_billable(workspace.id).await.unwrap(), 3);
}
