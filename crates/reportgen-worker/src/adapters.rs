//! Port implementations over the real collaborators: PostgreSQL, S3, SQS and
//! the compendium HTTP API.

use jiff::Timestamp;
use sqlx::PgPool;
use uuid::Uuid;

use reportgen_compendium::client::CompendiumClient;
use reportgen_compendium::error::SourceError;
use reportgen_core::models::monster::Monster;
use reportgen_core::models::report::Report;
use reportgen_db::error::DbError;
use reportgen_db::reports;
use reportgen_queue::error::QueueError;
use reportgen_queue::messages::{self, QueueMessage};
use reportgen_storage::error::StorageError;
use reportgen_storage::objects;

use crate::ports::{ArtifactStore, BoxFuture, JobQueue, RecordSource, ReportRepository};

pub struct PgReportRepository {
    pool: PgPool,
}

impl PgReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl ReportRepository for PgReportRepository {
    fn create<'a>(
        &'a self,
        user_id: Uuid,
        report_type: &'a str,
    ) -> BoxFuture<'a, Result<Report, DbError>> {
        Box::pin(reports::create_report(&self.pool, user_id, report_type))
    }

    fn get_by_key(&self, user_id: Uuid, report_id: Uuid) -> BoxFuture<'_, Result<Report, DbError>> {
        Box::pin(reports::get_report_by_key(&self.pool, user_id, report_id))
    }

    fn claim(
        &self,
        user_id: Uuid,
        report_id: Uuid,
        started_at: Timestamp,
    ) -> BoxFuture<'_, Result<Option<Report>, DbError>> {
        Box::pin(reports::claim_report(&self.pool, user_id, report_id, started_at))
    }

    fn update<'a>(&'a self, report: &'a Report) -> BoxFuture<'a, Result<Report, DbError>> {
        Box::pin(reports::update_report(&self.pool, report))
    }
}

pub struct S3ArtifactStore {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3ArtifactStore {
    pub fn new(client: aws_sdk_s3::Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }
}

impl ArtifactStore for S3ArtifactStore {
    fn put_object<'a>(
        &'a self,
        key: &'a str,
        body: Vec<u8>,
        content_type: Option<&'a str>,
        content_encoding: Option<&'a str>,
    ) -> BoxFuture<'a, Result<(), StorageError>> {
        Box::pin(objects::put_object(
            &self.client,
            &self.bucket,
            key,
            body,
            content_type,
            content_encoding,
        ))
    }
}

pub struct SqsJobQueue {
    client: aws_sdk_sqs::Client,
}

impl SqsJobQueue {
    pub fn new(client: aws_sdk_sqs::Client) -> Self {
        Self { client }
    }
}

impl JobQueue for SqsJobQueue {
    fn queue_url<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<String, QueueError>> {
        Box::pin(messages::queue_url(&self.client, name))
    }

    fn receive<'a>(
        &'a self,
        queue_url: &'a str,
        max_messages: usize,
    ) -> BoxFuture<'a, Result<Vec<QueueMessage>, QueueError>> {
        Box::pin(messages::receive_messages(&self.client, queue_url, max_messages))
    }

    fn delete<'a>(
        &'a self,
        queue_url: &'a str,
        receipt_handle: &'a str,
    ) -> BoxFuture<'a, Result<(), QueueError>> {
        Box::pin(messages::delete_message(&self.client, queue_url, receipt_handle))
    }

    fn send<'a>(
        &'a self,
        queue_url: &'a str,
        body: &'a str,
    ) -> BoxFuture<'a, Result<String, QueueError>> {
        Box::pin(messages::send_message(&self.client, queue_url, body))
    }
}

pub struct CompendiumSource {
    client: CompendiumClient,
}

impl CompendiumSource {
    pub fn new(client: CompendiumClient) -> Self {
        Self { client }
    }
}

impl RecordSource for CompendiumSource {
    fn fetch_monsters(&self) -> BoxFuture<'_, Result<Vec<Monster>, SourceError>> {
        Box::pin(self.client.get_monsters())
    }
}
