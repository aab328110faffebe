//! Workspace repository implementation.

use chrono::Utc;
use libsql::Connection;
use uuid::Uuid;

use quill_core::error::Result;
use quill_core::models::{CreateWorkspace, Workspace};
use quill_core::repository::WorkspaceRepository;

use crate::error::DbError;
use crate::repository::{parse_ts, parse_uuid, to_ts};

const WORKSPACE_COLUMNS: &str = "id, slug, name, created_at, updated_at";

/// libsql-backed workspace repository.
#[derive(Clone)]
pub struct LibsqlWorkspaceRepository {
    conn: Connection,
}

impl LibsqlWorkspaceRepository {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    async fn find_one(&self, where_clause: &str, param: String) -> Result<Option<Workspace>> {
        let sql = format!("SELECT {WORKSPACE_COLUMNS} FROM workspaces WHERE {where_clause}");
        let mut rows = self
            .conn
            .query(&sql, libsql::params![param])
            .await
            .map_err(DbError::from)?;

        match rows.next().await.map_err(DbError::from)? {
            Some(row) => Ok(Some(row_to_workspace(&row)?)),
            None => Ok(None),
        }
    }
}

impl WorkspaceRepository for LibsqlWorkspaceRepository {
    async fn create(&self, input: CreateWorkspace) -> Result<Workspace> {
        let id = Uuid::new_v4();
        let now = to_ts(&Utc::now());

        self.conn
            .execute(
                "INSERT INTO workspaces (id, slug, name, created_at, updated_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                libsql::params![id.to_string(), input.slug, input.name, now.clone(), now],
            )
            .await
            .map_err(DbError::from)?;

        self.get_by_id(id).await
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Workspace> {
        self.find_one("id = ?1", id.to_string())
            .await?
            .ok_or_else(|| {
                DbError::NotFound {
                    entity: "workspace".to_string(),
                    id: id.to_string(),
                }
                .into()
            })
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Workspace> {
        self.find_one("slug = ?1", slug.to_string())
            .await?
            .ok_or_else(|| {
                DbError::NotFound {
                    entity: "workspace".to_string(),
                    id: format!("slug={slug}"),
                }
                .into()
            })
    }
}

fn row_to_workspace(row: &libsql::Row) -> std::result::Result<Workspace, DbError> {
    Ok(Workspace {
        id: parse_uuid(&row.get::<String>(0)?, "workspace id")?,
        slug: row.get::<String>(1)?,
        name: row.get::<String>(2)?,
        created_at: parse_ts(&row.get::<String>(3)?)?,
        updated_at: parse_ts(&row.get::<String>(4)?)?,
    })
}
