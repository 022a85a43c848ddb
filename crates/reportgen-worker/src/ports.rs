//! Capability interfaces the pipeline depends on.
//!
//! Each external collaborator is reduced to the handful of operations the
//! builder and pool actually call, so both can run against in-memory fakes.
//! Methods return boxed futures for dyn compatibility.

use std::future::Future;
use std::pin::Pin;

use jiff::Timestamp;
use uuid::Uuid;

use reportgen_compendium::error::SourceError;
use reportgen_core::models::monster::Monster;
use reportgen_core::models::report::Report;
use reportgen_db::error::DbError;
use reportgen_queue::error::QueueError;
use reportgen_queue::messages::QueueMessage;
use reportgen_storage::error::StorageError;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Persistence for report rows.
pub trait ReportRepository: Send + Sync {
    fn create<'a>(
        &'a self,
        user_id: Uuid,
        report_type: &'a str,
    ) -> BoxFuture<'a, Result<Report, DbError>>;

    /// Fails with `DbError::NotFound` when no row matches.
    fn get_by_key(&self, user_id: Uuid, report_id: Uuid) -> BoxFuture<'_, Result<Report, DbError>>;

    /// Set `started_at` only if it is currently null, as one atomic step.
    /// `None` means another attempt got there first.
    fn claim(
        &self,
        user_id: Uuid,
        report_id: Uuid,
        started_at: Timestamp,
    ) -> BoxFuture<'_, Result<Option<Report>, DbError>>;

    /// Full-row replace keyed by `(user_id, id)`.
    fn update<'a>(&'a self, report: &'a Report) -> BoxFuture<'a, Result<Report, DbError>>;
}

/// Read-only source of the records rendered into a report.
pub trait RecordSource: Send + Sync {
    fn fetch_monsters(&self) -> BoxFuture<'_, Result<Vec<Monster>, SourceError>>;
}

/// Key-addressed blob store with overwrite semantics.
pub trait ArtifactStore: Send + Sync {
    fn put_object<'a>(
        &'a self,
        key: &'a str,
        body: Vec<u8>,
        content_type: Option<&'a str>,
        content_encoding: Option<&'a str>,
    ) -> BoxFuture<'a, Result<(), StorageError>>;
}

/// At-least-once message queue with visibility-timeout redelivery.
pub trait JobQueue: Send + Sync {
    fn queue_url<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<String, QueueError>>;

    fn receive<'a>(
        &'a self,
        queue_url: &'a str,
        max_messages: usize,
    ) -> BoxFuture<'a, Result<Vec<QueueMessage>, QueueError>>;

    fn delete<'a>(
        &'a self,
        queue_url: &'a str,
        receipt_handle: &'a str,
    ) -> BoxFuture<'a, Result<(), QueueError>>;

    fn send<'a>(&'a self, queue_url: &'a str, body: &'a str)
    -> BoxFuture<'a, Result<String, QueueError>>;
}
