//! Schema definitions and the migration runner.
//!
//! Storage conventions: UUIDs are TEXT, timestamps are RFC 3339 TEXT,
//! booleans are INTEGER 0/1. Applied versions are tracked in the
//! `_migration` table and each migration runs at most once.

use libsql::Connection;
use tracing::info;

use crate::error::DbError;

const MIGRATION_TABLE_DDL: &str = "\
CREATE TABLE IF NOT EXISTS _migration (
    version INTEGER NOT NULL UNIQUE,
    name TEXT NOT NULL,
    applied_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);
";

/// Schema version 1: workspaces, memberships, pages, licenses.
///
/// `pages.parent_id` is the self-referencing pointer the recursive
/// subtree statements walk; it gets its own index. Licenses are
/// one-per-workspace, enforced by the UNIQUE constraint.
const SCHEMA_V1: &str = "\
CREATE TABLE IF NOT EXISTS workspaces (
    id TEXT PRIMARY KEY,
    slug TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS workspace_members (
    id TEXT PRIMARY KEY,
    workspace_id TEXT NOT NULL REFERENCES workspaces(id),
    user_id TEXT NOT NULL,
    role INTEGER NOT NULL,
    is_active INTEGER NOT NULL DEFAULT 1,
    is_bot INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    UNIQUE (workspace_id, user_id)
);

CREATE INDEX IF NOT EXISTS idx_members_workspace ON workspace_members(workspace_id);

CREATE TABLE IF NOT EXISTS pages (
    id TEXT PRIMARY KEY,
    workspace_id TEXT NOT NULL REFERENCES workspaces(id),
    parent_id TEXT REFERENCES pages(id),
    name TEXT NOT NULL,
    owned_by TEXT NOT NULL,
    access INTEGER NOT NULL DEFAULT 0,
    is_locked INTEGER NOT NULL DEFAULT 0,
    archived_at TEXT,
    description_html TEXT NOT NULL DEFAULT '<p></p>',
    description_binary BLOB,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_pages_workspace ON pages(workspace_id);
CREATE INDEX IF NOT EXISTS idx_pages_parent ON pages(parent_id);

CREATE TABLE IF NOT EXISTS workspace_licenses (
    id TEXT PRIMARY KEY,
    workspace_id TEXT NOT NULL UNIQUE REFERENCES workspaces(id),
    is_cancelled INTEGER NOT NULL DEFAULT 0,
    free_seats INTEGER NOT NULL DEFAULT 12,
    purchased_seats INTEGER NOT NULL DEFAULT 0,
    plan TEXT,
    recurring_interval TEXT,
    current_period_end_date TEXT,
    is_offline_payment INTEGER NOT NULL DEFAULT 0,
    trial_end_date TEXT,
    has_activated_free_trial INTEGER NOT NULL DEFAULT 0,
    has_added_payment_method INTEGER NOT NULL DEFAULT 0,
    subscription TEXT,
    last_synced_at TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
";

/// A single database migration.
struct Migration {
    version: i64,
    name: &'static str,
    sql: &'static str,
}

/// All known migrations, in order.
static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

/// Runs all pending migrations.
pub async fn run_migrations(conn: &Connection) -> Result<(), DbError> {
    conn.execute_batch(MIGRATION_TABLE_DDL)
        .await
        .map_err(|e| DbError::Migration(format!("creating _migration table: {e}")))?;

    for migration in MIGRATIONS {
        let mut rows = conn
            .query(
                "SELECT version FROM _migration WHERE version = ?1",
                libsql::params![migration.version],
            )
            .await?;
        if rows.next().await?.is_some() {
            continue;
        }

        info!(
            version = migration.version,
            name = migration.name,
            "Applying migration"
        );

        conn.execute_batch(migration.sql)
            .await
            .map_err(|e| DbError::Migration(format!("{}: {e}", migration.name)))?;
        conn.execute(
            "INSERT INTO _migration (version, name) VALUES (?1, ?2)",
            libsql::params![migration.version, migration.name],
        )
        .await?;
    }

    Ok(())
}
