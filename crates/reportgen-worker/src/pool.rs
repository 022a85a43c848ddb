use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use reportgen_core::models::job::JobDescriptor;
use reportgen_core::models::report::Report;
use reportgen_queue::messages::QueueMessage;

use crate::builder::ReportBuilder;
use crate::error::{PoolError, ProcessError};
use crate::ports::JobQueue;

/// Upper bound on `max_concurrency`. Keeps the channel capacity, the receive
/// batch arithmetic and the database pool size in range.
pub const MAX_CONCURRENCY: usize = 256;

/// Pause after a failed receive before polling again.
const RECEIVE_BACKOFF: Duration = Duration::from_secs(1);

type SharedReceiver = Arc<Mutex<mpsc::Receiver<QueueMessage>>>;

/// Counters kept across the life of a pool.
#[derive(Debug, Default)]
pub struct PoolStats {
    received: AtomicU64,
    succeeded: AtomicU64,
    failed: AtomicU64,
    acknowledged: AtomicU64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStatsSnapshot {
    pub received: u64,
    pub succeeded: u64,
    pub failed: u64,
    pub acknowledged: u64,
}

impl PoolStats {
    pub fn snapshot(&self) -> PoolStatsSnapshot {
        PoolStatsSnapshot {
            received: self.received.load(Ordering::Relaxed),
            succeeded: self.succeeded.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            acknowledged: self.acknowledged.load(Ordering::Relaxed),
        }
    }
}

/// Bounded pool of report builders fed from the job queue.
///
/// One receiver loop long-polls the queue and pushes messages onto a channel
/// whose capacity equals the number of workers, so once every worker is busy
/// and the channel is full the receiver stops polling. A message is deleted
/// only after its build succeeds; anything else is left for the queue to
/// redeliver when its visibility timeout lapses.
pub struct WorkerPool {
    queue: Arc<dyn JobQueue>,
    builder: Arc<ReportBuilder>,
    queue_name: String,
    max_concurrency: usize,
    stats: Arc<PoolStats>,
}

impl WorkerPool {
    pub fn new(
        queue: Arc<dyn JobQueue>,
        builder: Arc<ReportBuilder>,
        queue_name: impl Into<String>,
        max_concurrency: usize,
    ) -> Self {
        Self {
            queue,
            builder,
            queue_name: queue_name.into(),
            max_concurrency,
            stats: Arc::new(PoolStats::default()),
        }
    }

    pub fn stats(&self) -> PoolStatsSnapshot {
        self.stats.snapshot()
    }

    /// Run until `cancel` fires.
    ///
    /// Fails fast if the queue cannot be resolved. On cancellation the
    /// receiver stops polling, idle workers exit, and in-flight builds run to
    /// completion before this returns. Messages still sitting in the channel
    /// are abandoned and reappear on the queue after their visibility timeout.
    pub async fn start(&self, cancel: CancellationToken) -> Result<(), PoolError> {
        if self.max_concurrency == 0 {
            return Err(PoolError::NoWorkers);
        }
        if self.max_concurrency > MAX_CONCURRENCY {
            return Err(PoolError::TooManyWorkers {
                requested: self.max_concurrency,
                max: MAX_CONCURRENCY,
            });
        }

        let queue_url = self
            .queue
            .queue_url(&self.queue_name)
            .await
            .map_err(|source| PoolError::QueueUrl {
                name: self.queue_name.clone(),
                source,
            })?;

        info!(
            queue = %self.queue_name,
            queue_url = %queue_url,
            max_concurrency = self.max_concurrency,
            "starting worker pool"
        );

        let (tx, rx) = mpsc::channel(self.max_concurrency);
        let rx: SharedReceiver = Arc::new(Mutex::new(rx));

        let mut workers = JoinSet::new();
        for id in 0..self.max_concurrency {
            let worker = Worker {
                id,
                queue: Arc::clone(&self.queue),
                builder: Arc::clone(&self.builder),
                queue_url: queue_url.clone(),
                stats: Arc::clone(&self.stats),
            };
            workers.spawn(worker.run(Arc::clone(&rx), cancel.clone()));
        }

        self.receive_loop(&queue_url, tx, &cancel).await;

        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                error!(error = %e, "worker task panicked");
            }
        }

        let stats = self.stats();
        info!(
            received = stats.received,
            succeeded = stats.succeeded,
            failed = stats.failed,
            acknowledged = stats.acknowledged,
            "worker pool stopped"
        );
        Ok(())
    }

    async fn receive_loop(
        &self,
        queue_url: &str,
        tx: mpsc::Sender<QueueMessage>,
        cancel: &CancellationToken,
    ) {
        let batch_size = self.max_concurrency + 1;

        loop {
            let received = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                res = self.queue.receive(queue_url, batch_size) => res,
            };

            let messages = match received {
                Ok(messages) => messages,
                Err(e) => {
                    error!(error = %e, "failed to receive messages");
                    tokio::select! {
                        _ = cancel.cancelled() => break,
                        _ = tokio::time::sleep(RECEIVE_BACKOFF) => continue,
                    }
                }
            };

            self.stats
                .received
                .fetch_add(messages.len() as u64, Ordering::Relaxed);

            for message in messages {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => {
                        info!("receiver stopped with messages pending, leaving them for redelivery");
                        return;
                    }
                    sent = tx.send(message) => {
                        if sent.is_err() {
                            warn!("all workers exited, stopping receiver");
                            return;
                        }
                    }
                }
            }
        }

        info!("receiver stopped");
    }
}

struct Worker {
    id: usize,
    queue: Arc<dyn JobQueue>,
    builder: Arc<ReportBuilder>,
    queue_url: String,
    stats: Arc<PoolStats>,
}

impl Worker {
    async fn run(self, rx: SharedReceiver, cancel: CancellationToken) {
        info!(worker_id = self.id, "worker started");

        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                message = async { rx.lock().await.recv().await } => message,
            };

            let Some(message) = next else { break };
            self.handle(message).await;
        }

        info!(worker_id = self.id, "worker stopped");
    }

    async fn handle(&self, message: QueueMessage) {
        let message_id = message.message_id.as_deref().unwrap_or_default();
        info!(worker_id = self.id, message_id, "processing message");

        if let Err(e) = self.process(&message).await {
            self.stats.failed.fetch_add(1, Ordering::Relaxed);
            error!(
                worker_id = self.id,
                message_id,
                transient = e.is_transient(),
                error = %e,
                "failed to process message"
            );
            return;
        }
        self.stats.succeeded.fetch_add(1, Ordering::Relaxed);

        let Some(receipt_handle) = message.receipt_handle.as_deref() else {
            warn!(worker_id = self.id, message_id, "message has no receipt handle, cannot delete");
            return;
        };

        match self.queue.delete(&self.queue_url, receipt_handle).await {
            Ok(()) => {
                self.stats.acknowledged.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => {
                error!(worker_id = self.id, message_id, error = %e, "failed to delete message");
            }
        }
    }

    async fn process(&self, message: &QueueMessage) -> Result<Report, ProcessError> {
        let job = JobDescriptor::from_body(message.body.as_deref())?;
        let report = self.builder.build(job.user_id, job.report_id).await?;
        Ok(report)
    }
}
