use thiserror::Error;
use uuid::Uuid;

use reportgen_compendium::error::SourceError;
use reportgen_core::error::CoreError;
use reportgen_db::error::DbError;
use reportgen_export::error::ExportError;
use reportgen_queue::error::QueueError;
use reportgen_storage::error::StorageError;

/// Why a single report build did not complete.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("report not found: {user_id}/{report_id}")]
    NotFound { user_id: Uuid, report_id: Uuid },

    #[error("failed to get monsters from api: {0}")]
    Source(#[from] SourceError),

    #[error("no monsters found")]
    EmptyDataset,

    #[error("failed to render report: {0}")]
    Export(#[from] ExportError),

    #[error("failed to upload artifact: {0}")]
    Storage(#[from] StorageError),

    #[error("failed to persist report: {0}")]
    Persistence(DbError),
}

impl From<DbError> for BuildError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound { user_id, report_id } => BuildError::NotFound { user_id, report_id },
            other => BuildError::Persistence(other),
        }
    }
}

impl BuildError {
    /// Failures of an external network dependency, worth retrying through
    /// queue redelivery.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            BuildError::Source(_) | BuildError::Storage(_) | BuildError::EmptyDataset
        )
    }
}

/// Why a queue message could not be processed. The message is left on the
/// queue in every case.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("message body is empty")]
    EmptyBody,

    #[error("malformed job payload: {0}")]
    MalformedPayload(String),

    #[error(transparent)]
    Build(#[from] BuildError),
}

impl ProcessError {
    /// Whether redelivery has a chance of succeeding.
    pub fn is_transient(&self) -> bool {
        match self {
            ProcessError::Build(e) => e.is_transient(),
            _ => false,
        }
    }
}

impl From<CoreError> for ProcessError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::EmptyBody => ProcessError::EmptyBody,
            other => ProcessError::MalformedPayload(other.to_string()),
        }
    }
}

#[derive(Debug, Error)]
pub enum PoolError {
    #[error("failed to resolve queue {name}: {source}")]
    QueueUrl {
        name: String,
        #[source]
        source: QueueError,
    },

    #[error("max concurrency must be at least 1")]
    NoWorkers,

    #[error("max concurrency {requested} exceeds the limit of {max}")]
    TooManyWorkers { requested: usize, max: usize },
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("failed to create report: {0}")]
    Persistence(#[from] DbError),

    #[error("failed to encode job: {0}")]
    Encode(#[from] CoreError),

    #[error("failed to enqueue job: {0}")]
    Queue(#[from] QueueError),
}
