//! Workspace membership repository implementation.

use chrono::Utc;
use libsql::Connection;
use uuid::Uuid;

use quill_core::error::Result;
use quill_core::models::{CreateMember, Role, WorkspaceMember};
use quill_core::repository::MemberRepository;

use crate::error::DbError;
use crate::repository::{parse_ts, parse_uuid, to_ts};

const MEMBER_COLUMNS: &str = "id, workspace_id, user_id, role, is_active, is_bot, created_at";

/// libsql-backed membership repository.
#[derive(Clone)]
pub struct LibsqlMemberRepository {
    conn: Connection,
}

impl LibsqlMemberRepository {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }
}

impl MemberRepository for LibsqlMemberRepository {
    async fn add(&self, input: CreateMember) -> Result<WorkspaceMember> {
        let id = Uuid::new_v4();
        let now = to_ts(&Utc::now());

        self.conn
            .execute(
                "INSERT INTO workspace_members \
                 (id, workspace_id, user_id, role, is_active, is_bot, created_at) \
                 VALUES (?1, ?2, ?3, ?4, 1, ?5, ?6)",
                libsql::params![
                    id.to_string(),
                    input.workspace_id.to_string(),
                    input.user_id.to_string(),
                    input.role.as_rank(),
                    input.is_bot,
                    now
                ],
            )
            .await
            .map_err(DbError::from)?;

        self.get(input.workspace_id, input.user_id)
            .await?
            .ok_or_else(|| {
                DbError::NotFound {
                    entity: "workspace_member".to_string(),
                    id: id.to_string(),
                }
                .into()
            })
    }

    async fn get(&self, workspace_id: Uuid, user_id: Uuid) -> Result<Option<WorkspaceMember>> {
        let sql = format!(
            "SELECT {MEMBER_COLUMNS} FROM workspace_members \
             WHERE workspace_id = ?1 AND user_id = ?2"
        );
        let mut rows = self
            .conn
            .query(
                &sql,
                libsql::params![workspace_id.to_string(), user_id.to_string()],
            )
            .await
            .map_err(DbError::from)?;

        match rows.next().await.map_err(DbError::from)? {
            Some(row) => Ok(Some(row_to_member(&row)?)),
            None => Ok(None),
        }
    }

    async fn count_billable(&self, workspace_id: Uuid) -> Result<i64> {
        let mut rows = self
            .conn
            .query(
                "SELECT COUNT(*) FROM workspace_members \
                 WHERE workspace_id = ?1 AND is_active = 1 AND is_bot = 0",
                libsql::params![workspace_id.to_string()],
            )
            .await
            .map_err(DbError::from)?;

        let row = rows.next().await.map_err(DbError::from)?.ok_or_else(|| {
            DbError::Decode("COUNT(*) returned no row".to_string())
        })?;
        Ok(row.get::<i64>(0).map_err(DbError::from)?)
    }
}

fn row_to_member(row: &libsql::Row) -> std::result::Result<WorkspaceMember, DbError> {
    let rank = row.get::<i64>(3)?;
    Ok(WorkspaceMember {
        id: parse_uuid(&row.get::<String>(0)?, "membership id")?,
        workspace_id: parse_uuid(&row.get::<String>(1)?, "workspace id")?,
        user_id: parse_uuid(&row.get::<String>(2)?, "user id")?,
        role: Role::from_rank(rank)
            .ok_or_else(|| DbError::Decode(format!("unknown role rank: {rank}")))?,
        is_active: row.get::<i64>(4)? != 0,
        is_bot: row.get::<i64>(5)? != 0,
        created_at: parse_ts(&row.get::<String>(6)?)?,
    })
}
