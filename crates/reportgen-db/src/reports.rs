use jiff::Timestamp;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use reportgen_core::models::report::Report;

use crate::error::DbError;
use crate::row::{ReportRow, to_chrono, to_chrono_opt};

/// Insert a new report in the `requested` state.
pub async fn create_report(
    pool: &PgPool,
    user_id: Uuid,
    report_type: &str,
) -> Result<Report, DbError> {
    let row = sqlx::query_as::<_, ReportRow>(
        "INSERT INTO reports (user_id, report_type) VALUES ($1, $2) RETURNING *",
    )
    .bind(user_id)
    .bind(report_type)
    .fetch_one(pool)
    .await?;

    row.try_into()
}

/// Fetch a report by its `(user_id, id)` primary key.
pub async fn get_report_by_key(
    pool: &PgPool,
    user_id: Uuid,
    report_id: Uuid,
) -> Result<Report, DbError> {
    let row = sqlx::query_as::<_, ReportRow>(
        "SELECT * FROM reports WHERE user_id = $1 AND id = $2",
    )
    .bind(user_id)
    .bind(report_id)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound { user_id, report_id })?;

    row.try_into()
}

/// Atomically mark a report as started, but only if nobody has yet.
///
/// Returns the claimed row, or `None` when `started_at` was already set (or
/// the row does not exist). A single conditional `UPDATE` gives
/// at-most-one-claim per report even under concurrent redelivery.
pub async fn claim_report(
    pool: &PgPool,
    user_id: Uuid,
    report_id: Uuid,
    started_at: Timestamp,
) -> Result<Option<Report>, DbError> {
    let row = sqlx::query_as::<_, ReportRow>(
        r#"
        UPDATE reports
        SET started_at = $3
        WHERE user_id = $1 AND id = $2 AND started_at IS NULL
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(report_id)
    .bind(to_chrono(started_at)?)
    .fetch_optional(pool)
    .await?;

    debug!(%user_id, %report_id, claimed = row.is_some(), "claim attempted");
    row.map(Report::try_from).transpose()
}

/// Replace every mutable column of a report, keyed by `(user_id, id)`.
pub async fn update_report(pool: &PgPool, report: &Report) -> Result<Report, DbError> {
    let row = sqlx::query_as::<_, ReportRow>(
        r#"
        UPDATE reports
        SET report_type = $1,
            output_file_path = $2,
            download_url = $3,
            download_url_expires_at = $4,
            error_message = $5,
            started_at = $6,
            failed_at = $7,
            completed_at = $8
        WHERE user_id = $9 AND id = $10
        RETURNING *
        "#,
    )
    .bind(&report.report_type)
    .bind(&report.output_path)
    .bind(&report.download_url)
    .bind(to_chrono_opt(report.download_url_expires_at)?)
    .bind(&report.error_message)
    .bind(to_chrono_opt(report.started_at)?)
    .bind(to_chrono_opt(report.failed_at)?)
    .bind(to_chrono_opt(report.completed_at)?)
    .bind(report.user_id)
    .bind(report.id)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound {
        user_id: report.user_id,
        report_id: report.id,
    })?;

    row.try_into()
}
