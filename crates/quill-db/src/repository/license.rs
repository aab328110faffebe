//! Workspace license repository implementation.

use chrono::Utc;
use libsql::Connection;
use uuid::Uuid;

use quill_core::error::Result;
use quill_core::models::{CreateWorkspaceLicense, SyncedLicenseUpdate, WorkspaceLicense};
use quill_core::repository::LicenseRepository;

use crate::error::DbError;
use crate::repository::{parse_ts, parse_uuid, to_ts};

const LICENSE_COLUMNS: &str = "id, workspace_id, is_cancelled, free_seats, purchased_seats, \
                               plan, recurring_interval, current_period_end_date, \
                               is_offline_payment, trial_end_date, has_activated_free_trial, \
                               has_added_payment_method, subscription, last_synced_at, \
                               created_at, updated_at";

/// libsql-backed license repository. One row per workspace, enforced
/// by the schema.
#[derive(Clone)]
pub struct LibsqlLicenseRepository {
    conn: Connection,
}

impl LibsqlLicenseRepository {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }
}

impl LicenseRepository for LibsqlLicenseRepository {
    async fn get_by_workspace(&self, workspace_id: Uuid) -> Result<Option<WorkspaceLicense>> {
        let sql = format!("SELECT {LICENSE_COLUMNS} FROM workspace_licenses WHERE workspace_id = ?1");
        let mut rows = self
            .conn
            .query(&sql, libsql::params![workspace_id.to_string()])
            .await
            .map_err(DbError::from)?;

        match rows.next().await.map_err(DbError::from)? {
            Some(row) => Ok(Some(row_to_license(&row)?)),
            None => Ok(None),
        }
    }

    async fn create(&self, input: CreateWorkspaceLicense) -> Result<WorkspaceLicense> {
        let id = Uuid::new_v4();
        let now = to_ts(&Utc::now());

        self.conn
            .execute(
                "INSERT INTO workspace_licenses \
                 (id, workspace_id, is_cancelled, free_seats, purchased_seats, plan, \
                  recurring_interval, current_period_end_date, is_offline_payment, \
                  trial_end_date, has_activated_free_trial, has_added_payment_method, \
                  subscription, last_synced_at, created_at, updated_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
                libsql::params![
                    id.to_string(),
                    input.workspace_id.to_string(),
                    input.is_cancelled,
                    input.free_seats,
                    input.purchased_seats,
                    input.plan,
                    input.recurring_interval,
                    input.current_period_end_date.map(|ts| to_ts(&ts)),
                    input.is_offline_payment,
                    input.trial_end_date.map(|ts| to_ts(&ts)),
                    input.has_activated_free_trial,
                    input.has_added_payment_method,
                    input.subscription,
                    to_ts(&input.last_synced_at),
                    now.clone(),
                    now
                ],
            )
            .await
            .map_err(DbError::from)?;

        self.get_by_workspace(input.workspace_id)
            .await?
            .ok_or_else(|| {
                DbError::NotFound {
                    entity: "workspace_license".to_string(),
                    id: input.workspace_id.to_string(),
                }
                .into()
            })
    }

    async fn update_synced(
        &self,
        workspace_id: Uuid,
        input: SyncedLicenseUpdate,
    ) -> Result<WorkspaceLicense> {
        let affected = self
            .conn
            .execute(
                "UPDATE workspace_licenses SET \
                 is_cancelled = ?1, free_seats = ?2, purchased_seats = ?3, plan = ?4, \
                 recurring_interval = ?5, current_period_end_date = ?6, \
                 is_offline_payment = ?7, trial_end_date = ?8, \
                 has_activated_free_trial = ?9, has_added_payment_method = ?10, \
                 subscription = ?11, last_synced_at = ?12, updated_at = ?13 \
                 WHERE workspace_id = ?14",
                libsql::params![
                    input.is_cancelled,
                    input.free_seats,
                    input.purchased_seats,
                    input.plan,
                    input.recurring_interval,
                    input.current_period_end_date.map(|ts| to_ts(&ts)),
                    input.is_offline_payment,
                    input.trial_end_date.map(|ts| to_ts(&ts)),
                    input.has_activated_free_trial,
                    input.has_added_payment_method,
                    input.subscription,
                    to_ts(&input.last_synced_at),
                    to_ts(&Utc::now()),
                    workspace_id.to_string()
                ],
            )
            .await
            .map_err(DbError::from)?;
        if affected == 0 {
            return Err(DbError::NotFound {
                entity: "workspace_license".to_string(),
                id: workspace_id.to_string(),
            }
            .into());
        }

        self.get_by_workspace(workspace_id).await?.ok_or_else(|| {
            DbError::NotFound {
                entity: "workspace_license".to_string(),
                id: workspace_id.to_string(),
            }
            .into()
        })
    }
}

fn row_to_license(row: &libsql::Row) -> std::result::Result<WorkspaceLicense, DbError> {
    Ok(WorkspaceLicense {
        id: parse_uuid(&row.get::<String>(0)?, "license id")?,
        workspace_id: parse_uuid(&row.get::<String>(1)?, "workspace id")?,
        is_cancelled: row.get::<i64>(2)? != 0,
        free_seats: row.get::<i64>(3)?,
        purchased_seats: row.get::<i64>(4)?,
        plan: row.get::<Option<String>>(5)?,
        recurring_interval: row.get::<Option<String>>(6)?,
        current_period_end_date: row
            .get::<Option<String>>(7)?
            .map(|raw| parse_ts(&raw))
            .transpose()?,
        is_offline_payment: row.get::<i64>(8)? != 0,
        trial_end_date: row
            .get::<Option<String>>(9)?
            .map(|raw| parse_ts(&raw))
            .transpose()?,
        has_activated_free_trial: row.get::<i64>(10)? != 0,
        has_added_payment_method: row.get::<i64>(11)? != 0,
        subscription: row.get::<Option<String>>(12)?,
        last_synced_at: parse_ts(&row.get::<String>(13)?)?,
        created_at: parse_ts(&row.get::<String>(14)?)?,
        updated_at: parse_ts(&row.get::<String>(15)?)?,
    })
}
