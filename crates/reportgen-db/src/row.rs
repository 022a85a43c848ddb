use chrono::{DateTime, Utc};
use jiff::Timestamp;
use sqlx::FromRow;
use uuid::Uuid;

use reportgen_core::models::report::Report;

use crate::error::DbError;

/// Column-for-column image of a `reports` row.
#[derive(Debug, FromRow)]
pub(crate) struct ReportRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub report_type: String,
    pub output_file_path: Option<String>,
    pub download_url: Option<String>,
    pub download_url_expires_at: Option<DateTime<Utc>>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub failed_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl TryFrom<ReportRow> for Report {
    type Error = DbError;

    fn try_from(row: ReportRow) -> Result<Self, Self::Error> {
        Ok(Report {
            id: row.id,
            user_id: row.user_id,
            report_type: row.report_type,
            output_path: row.output_file_path,
            download_url: row.download_url,
            download_url_expires_at: row.download_url_expires_at.map(to_jiff).transpose()?,
            error_message: row.error_message,
            created_at: to_jiff(row.created_at)?,
            started_at: row.started_at.map(to_jiff).transpose()?,
            failed_at: row.failed_at.map(to_jiff).transpose()?,
            completed_at: row.completed_at.map(to_jiff).transpose()?,
        })
    }
}

// Postgres `timestamptz` has microsecond precision, so that is the exchange unit.
fn to_jiff(ts: DateTime<Utc>) -> Result<Timestamp, DbError> {
    Timestamp::from_microsecond(ts.timestamp_micros()).map_err(|e| DbError::Timestamp(e.to_string()))
}

pub(crate) fn to_chrono(ts: Timestamp) -> Result<DateTime<Utc>, DbError> {
    DateTime::from_timestamp_micros(ts.as_microsecond())
        .ok_or_else(|| DbError::Timestamp(ts.to_string()))
}

pub(crate) fn to_chrono_opt(ts: Option<Timestamp>) -> Result<Option<DateTime<Utc>>, DbError> {
    ts.map(to_chrono).transpose()
}
