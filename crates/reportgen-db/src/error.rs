use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("report not found: {user_id}/{report_id}")]
    NotFound { user_id: Uuid, report_id: Uuid },

    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("timestamp out of range: {0}")]
    Timestamp(String),
}
