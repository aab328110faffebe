//! Integration tests for schema migrations.

use quill_db::{DbConfig, DbManager, run_migrations};

async fn setup() -> DbManager {
    DbManager::connect(&DbConfig::in_memory()).await.unwrap()
}

#[tokio::test]
async fn migrations_apply_cleanly() {
    let manager = setup().await;
    let conn = manager.connection();

    run_migrations(&conn).await.unwrap();

    // All four tables exist afterwards.
    let mut rows = conn
        .query(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' \
             AND name IN ('workspaces', 'workspace_members', 'pages', 'workspace_licenses')",
            (),
        )
        .await
        .unwrap();
    let row = rows.next().await.unwrap().unwrap();
    assert_eq!(row.get::<i64>(0).unwrap(), 4);
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let manager = setup().await;
    let conn = manager.connection();

    run_migrations(&conn).await.unwrap();
    run_migrations(&conn).await.unwrap();

    // Version 1 was recorded exactly once.
    let mut rows = conn
        .query("SELECT COUNT(*) FROM _migration WHERE version = 1", ())
        .await
        .unwrap();
    let row = rows.next().await.unwrap().unwrap();
    assert_eq!(row.get::<i64>(0).unwrap(), 1);
}
