#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use jiff::Timestamp;
use uuid::Uuid;

use reportgen_compendium::error::SourceError;
use reportgen_core::models::monster::Monster;
use reportgen_core::models::report::Report;
use reportgen_db::error::DbError;
use reportgen_queue::error::QueueError;
use reportgen_queue::messages::QueueMessage;
use reportgen_storage::error::StorageError;
use reportgen_worker::builder::ReportBuilder;
use reportgen_worker::ports::{ArtifactStore, BoxFuture, JobQueue, RecordSource, ReportRepository};

pub fn bokoblin() -> Monster {
    Monster {
        name: "Bokoblin".to_string(),
        id: 1,
        category: "monsters".to_string(),
        common_locations: vec!["Field".to_string()],
        drops: vec!["Horn".to_string()],
        dlc: false,
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// Report store
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct InMemoryReports {
    rows: Mutex<HashMap<(Uuid, Uuid), Report>>,
    pub fail_updates: AtomicBool,
    pub fail_creates: AtomicBool,
    /// Make every claim lose, as if another worker claimed between load and claim.
    pub steal_claims: AtomicBool,
    pub updates: AtomicUsize,
    pub claims: AtomicUsize,
}

impl InMemoryReports {
    pub fn insert(&self, report: Report) {
        self.rows
            .lock()
            .unwrap()
            .insert((report.user_id, report.id), report);
    }

    pub fn requested(&self) -> Report {
        let report = Report::new(Uuid::new_v4(), "monsters");
        self.insert(report.clone());
        report
    }

    pub fn get(&self, user_id: Uuid, report_id: Uuid) -> Option<Report> {
        self.rows.lock().unwrap().get(&(user_id, report_id)).cloned()
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

impl ReportRepository for InMemoryReports {
    fn create<'a>(
        &'a self,
        user_id: Uuid,
        report_type: &'a str,
    ) -> BoxFuture<'a, Result<Report, DbError>> {
        Box::pin(async move {
            if self.fail_creates.load(Ordering::SeqCst) {
                return Err(DbError::Sqlx(sqlx::Error::PoolTimedOut));
            }
            let report = Report::new(user_id, report_type);
            self.insert(report.clone());
            Ok(report)
        })
    }

    fn get_by_key(&self, user_id: Uuid, report_id: Uuid) -> BoxFuture<'_, Result<Report, DbError>> {
        Box::pin(async move {
            self.get(user_id, report_id)
                .ok_or(DbError::NotFound { user_id, report_id })
        })
    }

    fn claim(
        &self,
        user_id: Uuid,
        report_id: Uuid,
        started_at: Timestamp,
    ) -> BoxFuture<'_, Result<Option<Report>, DbError>> {
        Box::pin(async move {
            self.claims.fetch_add(1, Ordering::SeqCst);
            let mut rows = self.rows.lock().unwrap();
            let Some(row) = rows.get_mut(&(user_id, report_id)) else {
                return Ok(None);
            };
            if self.steal_claims.load(Ordering::SeqCst) {
                row.mark_started(started_at);
                return Ok(None);
            }
            if row.started_at.is_some() {
                return Ok(None);
            }
            row.mark_started(started_at);
            Ok(Some(row.clone()))
        })
    }

    fn update<'a>(&'a self, report: &'a Report) -> BoxFuture<'a, Result<Report, DbError>> {
        Box::pin(async move {
            self.updates.fetch_add(1, Ordering::SeqCst);
            if self.fail_updates.load(Ordering::SeqCst) {
                return Err(DbError::Sqlx(sqlx::Error::PoolTimedOut));
            }
            let mut rows = self.rows.lock().unwrap();
            let key = (report.user_id, report.id);
            if !rows.contains_key(&key) {
                return Err(DbError::NotFound {
                    user_id: report.user_id,
                    report_id: report.id,
                });
            }
            rows.insert(key, report.clone());
            Ok(report.clone())
        })
    }
}

// ---------------------------------------------------------------------------
// Data source
// ---------------------------------------------------------------------------

/// Returns a fixed set of records, optionally slowly, counting concurrent calls.
pub struct FakeSource {
    records: Mutex<Vec<Monster>>,
    delay: Duration,
    pub fail: AtomicBool,
    pub calls: AtomicUsize,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

impl FakeSource {
    pub fn new(records: Vec<Monster>) -> Self {
        Self::with_delay(records, Duration::ZERO)
    }

    pub fn with_delay(records: Vec<Monster>, delay: Duration) -> Self {
        Self {
            records: Mutex::new(records),
            delay,
            fail: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }
}

impl RecordSource for FakeSource {
    fn fetch_monsters(&self) -> BoxFuture<'_, Result<Vec<Monster>, SourceError>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);

            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            if self.fail.load(Ordering::SeqCst) {
                return Err(SourceError::Request("connection reset".to_string()));
            }
            Ok(self.records.lock().unwrap().clone())
        })
    }
}

// ---------------------------------------------------------------------------
// Artifact store
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeArtifacts {
    objects: Mutex<HashMap<String, Vec<u8>>>,
    pub fail: AtomicBool,
    pub puts: AtomicUsize,
}

impl FakeArtifacts {
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.lock().unwrap().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.objects.lock().unwrap().len()
    }
}

impl ArtifactStore for FakeArtifacts {
    fn put_object<'a>(
        &'a self,
        key: &'a str,
        body: Vec<u8>,
        _content_type: Option<&'a str>,
        _content_encoding: Option<&'a str>,
    ) -> BoxFuture<'a, Result<(), StorageError>> {
        Box::pin(async move {
            self.puts.fetch_add(1, Ordering::SeqCst);
            if self.fail.load(Ordering::SeqCst) {
                return Err(StorageError::PutObject {
                    key: key.to_string(),
                    message: "service unavailable".to_string(),
                });
            }
            self.objects.lock().unwrap().insert(key.to_string(), body);
            Ok(())
        })
    }
}

// ---------------------------------------------------------------------------
// Queue
// ---------------------------------------------------------------------------

pub const QUEUE_NAME: &str = "reports";
pub const QUEUE_URL: &str = "http://sqs.local/000000000000/reports";

/// Hands out pending messages in batches; an empty poll waits briefly, like a
/// long poll that times out.
#[derive(Default)]
pub struct FakeQueue {
    pending: Mutex<VecDeque<QueueMessage>>,
    deleted: Mutex<Vec<String>>,
    sent: Mutex<Vec<String>>,
    pub fail_sends: AtomicBool,
    pub receives: AtomicUsize,
    pub largest_batch_requested: AtomicUsize,
    next_id: AtomicUsize,
}

impl FakeQueue {
    pub fn push_body(&self, body: Option<String>) -> String {
        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        let receipt = format!("receipt-{n}");
        self.pending.lock().unwrap().push_back(QueueMessage {
            message_id: Some(format!("msg-{n}")),
            body,
            receipt_handle: Some(receipt.clone()),
        });
        receipt
    }

    pub fn push_job(&self, user_id: Uuid, report_id: Uuid) -> String {
        self.push_body(Some(format!(
            r#"{{"userId":"{user_id}","reportId":"{report_id}"}}"#
        )))
    }

    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }

    pub fn pending(&self) -> usize {
        self.pending.lock().unwrap().len()
    }
}

impl JobQueue for FakeQueue {
    fn queue_url<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<String, QueueError>> {
        Box::pin(async move {
            if name == QUEUE_NAME {
                Ok(QUEUE_URL.to_string())
            } else {
                Err(QueueError::QueueNotFound {
                    name: name.to_string(),
                })
            }
        })
    }

    fn receive<'a>(
        &'a self,
        _queue_url: &'a str,
        max_messages: usize,
    ) -> BoxFuture<'a, Result<Vec<QueueMessage>, QueueError>> {
        Box::pin(async move {
            self.receives.fetch_add(1, Ordering::SeqCst);
            self.largest_batch_requested
                .fetch_max(max_messages, Ordering::SeqCst);

            let batch: Vec<QueueMessage> = {
                let mut pending = self.pending.lock().unwrap();
                let n = max_messages.min(pending.len());
                pending.drain(..n).collect()
            };
            if batch.is_empty() {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
            Ok(batch)
        })
    }

    fn delete<'a>(
        &'a self,
        _queue_url: &'a str,
        receipt_handle: &'a str,
    ) -> BoxFuture<'a, Result<(), QueueError>> {
        Box::pin(async move {
            self.deleted
                .lock()
                .unwrap()
                .push(receipt_handle.to_string());
            Ok(())
        })
    }

    fn send<'a>(
        &'a self,
        _queue_url: &'a str,
        body: &'a str,
    ) -> BoxFuture<'a, Result<String, QueueError>> {
        Box::pin(async move {
            if self.fail_sends.load(Ordering::SeqCst) {
                return Err(QueueError::Send("access denied".to_string()));
            }
            self.sent.lock().unwrap().push(body.to_string());
            Ok(format!("msg-{}", self.next_id.fetch_add(1, Ordering::SeqCst)))
        })
    }
}

// ---------------------------------------------------------------------------
// Wiring
// ---------------------------------------------------------------------------

pub struct Harness {
    pub reports: Arc<InMemoryReports>,
    pub source: Arc<FakeSource>,
    pub artifacts: Arc<FakeArtifacts>,
    pub builder: Arc<ReportBuilder>,
}

impl Harness {
    pub fn new(source: FakeSource) -> Self {
        let reports = Arc::new(InMemoryReports::default());
        let source = Arc::new(source);
        let artifacts = Arc::new(FakeArtifacts::default());
        let builder = Arc::new(ReportBuilder::new(
            reports.clone(),
            source.clone(),
            artifacts.clone(),
        ));
        Self {
            reports,
            source,
            artifacts,
            builder,
        }
    }
}

/// Poll `cond` until it holds or the timeout elapses.
pub async fn wait_until<F: Fn() -> bool>(timeout: Duration, cond: F) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if cond() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    cond()
}
