//! libsql repository implementations.

mod license;
mod member;
mod page;
mod workspace;

pub use license::LibsqlLicenseRepository;
pub use member::LibsqlMemberRepository;
pub use page::LibsqlPageRepository;
pub use workspace::LibsqlWorkspaceRepository;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::DbError;

/// Formats a timestamp for storage.
pub(crate) fn to_ts(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339()
}

/// Parses a stored timestamp.
pub(crate) fn parse_ts(raw: &str) -> Result<DateTime<Utc>, DbError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| DbError::Decode(format!("invalid timestamp {raw:?}: {e}")))
}

/// Parses a stored UUID, naming the column on failure.
pub(crate) fn parse_uuid(raw: &str, column: &str) -> Result<Uuid, DbError> {
    Uuid::parse_str(raw).map_err(|e| DbError::Decode(format!("invalid {column} UUID {raw:?}: {e}")))
}
