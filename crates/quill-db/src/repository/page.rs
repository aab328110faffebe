//! Page repository implementation.
//!
//! The subtree operations are the heart of this module. Rather than
//! walking the tree in application code, archive and restore run one
//! recursive-CTE UPDATE that collects the page and all transitive
//! children and stamps them in a single statement.

use chrono::{DateTime, Utc};
use libsql::Connection;
use uuid::Uuid;

use quill_core::error::Result;
use quill_core::models::page::EMPTY_DESCRIPTION_HTML;
use quill_core::models::{CreatePage, Page, PageAccess, UpdatePage};
use quill_core::repository::PageRepository;

use crate::error::DbError;
use crate::repository::{parse_ts, parse_uuid, to_ts};

const PAGE_COLUMNS: &str = "id, workspace_id, parent_id, name, owned_by, access, is_locked, \
                            archived_at, description_html, description_binary, created_at, updated_at";

/// Stamps `archived_at` over a page and all of its descendants. Bound
/// as (?1 = page id, ?2 = timestamp or NULL). The CTE walks the
/// parent pointers downwards; running it as one statement keeps the
/// transition atomic under SQLite's writer lock.
const SUBTREE_ARCHIVE_SQL: &str = "\
WITH RECURSIVE descendants AS (
    SELECT id FROM pages WHERE id = ?1
    UNION ALL
    SELECT p.id FROM pages p JOIN descendants d ON p.parent_id = d.id
)
UPDATE pages SET archived_at = ?2 WHERE id IN (SELECT id FROM descendants)";

/// libsql-backed page repository.
#[derive(Clone)]
pub struct LibsqlPageRepository {
    conn: Connection,
}

impl LibsqlPageRepository {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }
}

impl PageRepository for LibsqlPageRepository {
    async fn create(&self, input: CreatePage) -> Result<Page> {
        let id = Uuid::new_v4();
        let now = to_ts(&Utc::now());
        let description_html = input
            .description_html
            .unwrap_or_else(|| EMPTY_DESCRIPTION_HTML.to_string());

        self.conn
            .execute(
                "INSERT INTO pages \
                 (id, workspace_id, parent_id, name, owned_by, access, is_locked, \
                  archived_at, description_html, description_binary, created_at, updated_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, NULL, ?7, NULL, ?8, ?9)",
                libsql::params![
                    id.to_string(),
                    input.workspace_id.to_string(),
                    input.parent_id.map(|p| p.to_string()),
                    input.name,
                    input.owned_by.to_string(),
                    input.access.as_code(),
                    description_html,
                    now.clone(),
                    now
                ],
            )
            .await
            .map_err(DbError::from)?;

        self.get(input.workspace_id, id).await
    }

    async fn get(&self, workspace_id: Uuid, id: Uuid) -> Result<Page> {
        let sql = format!("SELECT {PAGE_COLUMNS} FROM pages WHERE id = ?1 AND workspace_id = ?2");
        let mut rows = self
            .conn
            .query(
                &sql,
                libsql::params![id.to_string(), workspace_id.to_string()],
            )
            .await
            .map_err(DbError::from)?;

        match rows.next().await.map_err(DbError::from)? {
            Some(row) => Ok(row_to_page(&row)?),
            None => Err(DbError::NotFound {
                entity: "page".to_string(),
                id: id.to_string(),
            }
            .into()),
        }
    }

    async fn update(&self, workspace_id: Uuid, id: Uuid, input: UpdatePage) -> Result<Page> {
        // Build the SET clause from the provided fields only.
        let mut sets: Vec<&str> = Vec::new();
        let mut params: Vec<(String, libsql::Value)> = Vec::new();

        if let Some(name) = input.name {
            sets.push("name = :name");
            params.push((":name".to_string(), libsql::Value::Text(name)));
        }
        if let Some(parent_id) = input.parent_id {
            sets.push("parent_id = :parent_id");
            let value = match parent_id {
                Some(p) => libsql::Value::Text(p.to_string()),
                None => libsql::Value::Null,
            };
            params.push((":parent_id".to_string(), value));
        }
        if let Some(access) = input.access {
            sets.push("access = :access");
            params.push((":access".to_string(), libsql::Value::Integer(access.as_code())));
        }
        if let Some(html) = input.description_html {
            sets.push("description_html = :html");
            params.push((":html".to_string(), libsql::Value::Text(html)));
        }

        if !sets.is_empty() {
            sets.push("updated_at = :updated_at");
            params.push((
                ":updated_at".to_string(),
                libsql::Value::Text(to_ts(&Utc::now())),
            ));
            params.push((":id".to_string(), libsql::Value::Text(id.to_string())));
            params.push((
                ":workspace_id".to_string(),
                libsql::Value::Text(workspace_id.to_string()),
            ));

            let sql = format!(
                "UPDATE pages SET {} WHERE id = :id AND workspace_id = :workspace_id",
                sets.join(", ")
            );
            let affected = self.conn.execute(&sql, params).await.map_err(DbError::from)?;
            if affected == 0 {
                return Err(DbError::NotFound {
                    entity: "page".to_string(),
                    id: id.to_string(),
                }
                .into());
            }
        }

        self.get(workspace_id, id).await
    }

    async fn list_roots(&self, workspace_id: Uuid, viewer: Uuid) -> Result<Vec<Page>> {
        let sql = format!(
            "SELECT {PAGE_COLUMNS} FROM pages \
             WHERE workspace_id = ?1 AND parent_id IS NULL \
               AND (owned_by = ?2 OR access = 0) \
             ORDER BY created_at DESC"
        );
        let mut rows = self
            .conn
            .query(
                &sql,
                libsql::params![workspace_id.to_string(), viewer.to_string()],
            )
            .await
            .map_err(DbError::from)?;

        let mut pages = Vec::new();
        while let Some(row) = rows.next().await.map_err(DbError::from)? {
            pages.push(row_to_page(&row)?);
        }
        Ok(pages)
    }

    async fn set_subtree_archived(
        &self,
        id: Uuid,
        archived_at: Option<DateTime<Utc>>,
    ) -> Result<u64> {
        let affected = self
            .conn
            .execute(
                SUBTREE_ARCHIVE_SQL,
                libsql::params![id.to_string(), archived_at.map(|ts| to_ts(&ts))],
            )
            .await
            .map_err(DbError::from)?;
        Ok(affected)
    }

    async fn unarchive_subtree(&self, id: Uuid) -> Result<u64> {
        let id_text = id.to_string();
        let tx = self.conn.transaction().await.map_err(DbError::from)?;

        // Sever the link to an archived parent, otherwise the page
        // would resurface underneath a still-hidden ancestor.
        tx.execute(
            "UPDATE pages SET parent_id = NULL \
             WHERE id = ?1 AND parent_id IN (SELECT id FROM pages WHERE archived_at IS NOT NULL)",
            libsql::params![id_text.clone()],
        )
        .await
        .map_err(DbError::from)?;

        let affected = tx
            .execute(
                SUBTREE_ARCHIVE_SQL,
                libsql::params![id_text, Option::<String>::None],
            )
            .await
            .map_err(DbError::from)?;

        tx.commit().await.map_err(DbError::from)?;
        Ok(affected)
    }

    async fn delete_and_orphan(&self, id: Uuid) -> Result<u64> {
        let id_text = id.to_string();
        let tx = self.conn.transaction().await.map_err(DbError::from)?;

        // Direct children survive and move to the root level.
        let orphaned = tx
            .execute(
                "UPDATE pages SET parent_id = NULL WHERE parent_id = ?1",
                libsql::params![id_text.clone()],
            )
            .await
            .map_err(DbError::from)?;

        tx.execute(
            "DELETE FROM pages WHERE id = ?1",
            libsql::params![id_text],
        )
        .await
        .map_err(DbError::from)?;

        tx.commit().await.map_err(DbError::from)?;
        Ok(orphaned)
    }

    async fn set_locked(&self, workspace_id: Uuid, id: Uuid, locked: bool) -> Result<Page> {
        let affected = self
            .conn
            .execute(
                "UPDATE pages SET is_locked = ?1, updated_at = ?2 \
                 WHERE id = ?3 AND workspace_id = ?4",
                libsql::params![
                    locked,
                    to_ts(&Utc::now()),
                    id.to_string(),
                    workspace_id.to_string()
                ],
            )
            .await
            .map_err(DbError::from)?;
        if affected == 0 {
            return Err(DbError::NotFound {
                entity: "page".to_string(),
                id: id.to_string(),
            }
            .into());
        }

        self.get(workspace_id, id).await
    }

    async fn set_description(
        &self,
        workspace_id: Uuid,
        id: Uuid,
        binary: Vec<u8>,
        html: String,
    ) -> Result<Page> {
        let affected = self
            .conn
            .execute(
                "UPDATE pages SET description_binary = ?1, description_html = ?2, updated_at = ?3 \
                 WHERE id = ?4 AND workspace_id = ?5",
                libsql::params![
                    binary,
                    html,
                    to_ts(&Utc::now()),
                    id.to_string(),
                    workspace_id.to_string()
                ],
            )
            .await
            .map_err(DbError::from)?;
        if affected == 0 {
            return Err(DbError::NotFound {
                entity: "page".to_string(),
                id: id.to_string(),
            }
            .into());
        }

        self.get(workspace_id, id).await
    }
}

fn row_to_page(row: &libsql::Row) -> std::result::Result<Page, DbError> {
    let access_code = row.get::<i64>(5)?;
    Ok(Page {
        id: parse_uuid(&row.get::<String>(0)?, "page id")?,
        workspace_id: parse_uuid(&row.get::<String>(1)?, "workspace id")?,
        parent_id: row
            .get::<Option<String>>(2)?
            .map(|raw| parse_uuid(&raw, "parent id"))
            .transpose()?,
        name: row.get::<String>(3)?,
        owned_by: parse_uuid(&row.get::<String>(4)?, "owner id")?,
        access: PageAccess::from_code(access_code)
            .ok_or_else(|| DbError::Decode(format!("unknown page access code: {access_code}")))?,
        is_locked: row.get::<i64>(6)? != 0,
        archived_at: row
            .get::<Option<String>>(7)?
            .map(|raw| parse_ts(&raw))
            .transpose()?,
        description_html: row.get::<String>(8)?,
        description_binary: row.get::<Option<Vec<u8>>>(9)?,
        created_at: parse_ts(&row.get::<String>(10)?)?,
        updated_at: parse_ts(&row.get::<String>(11)?)?,
    })
}
