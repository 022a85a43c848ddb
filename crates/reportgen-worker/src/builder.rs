use std::sync::Arc;

use jiff::Timestamp;
use tracing::{error, info, warn};
use uuid::Uuid;

use reportgen_core::models::report::Report;
use reportgen_core::s3_keys;
use reportgen_export::artifact::{self, CONTENT_ENCODING, CONTENT_TYPE};

use crate::error::BuildError;
use crate::ports::{ArtifactStore, RecordSource, ReportRepository};

/// Error message recorded when a build is dropped before it could commit.
const INTERRUPTED: &str = "report build interrupted before completion";

/// Turns one job descriptor into a stored artifact and a terminal report.
///
/// Safe to call repeatedly for the same report: only the caller that wins the
/// atomic claim on `started_at` runs the pipeline, every other call returns
/// the report as loaded.
pub struct ReportBuilder {
    reports: Arc<dyn ReportRepository>,
    source: Arc<dyn RecordSource>,
    artifacts: Arc<dyn ArtifactStore>,
}

impl ReportBuilder {
    pub fn new(
        reports: Arc<dyn ReportRepository>,
        source: Arc<dyn RecordSource>,
        artifacts: Arc<dyn ArtifactStore>,
    ) -> Self {
        Self {
            reports,
            source,
            artifacts,
        }
    }

    pub async fn build(&self, user_id: Uuid, report_id: Uuid) -> Result<Report, BuildError> {
        let report = self.reports.get_by_key(user_id, report_id).await?;

        if report.started_at.is_some() {
            info!(%user_id, %report_id, status = %report.status(), "report already started, skipping");
            return Ok(report);
        }

        let Some(claimed) = self
            .reports
            .claim(user_id, report_id, Timestamp::now())
            .await?
        else {
            info!(%user_id, %report_id, "report claimed by another attempt, skipping");
            return Ok(report);
        };

        let mut finalizer = Finalizer::new(Arc::clone(&self.reports), claimed);
        let outcome = self.run_pipeline(finalizer.report_mut()).await;
        finalizer.commit(outcome.as_ref().err()).await;
        outcome?;

        let report = finalizer.report().clone();
        info!(
            %user_id,
            %report_id,
            path = report.output_path.as_deref().unwrap_or_default(),
            "successfully generated report"
        );
        Ok(report)
    }

    /// Fetch, render, upload. Only touches the in-memory report; persisting it
    /// is left to the [`Finalizer`].
    async fn run_pipeline(&self, report: &mut Report) -> Result<(), BuildError> {
        let monsters = self.source.fetch_monsters().await?;
        if monsters.is_empty() {
            return Err(BuildError::EmptyDataset);
        }

        let body = artifact::render_monsters(&monsters)?;

        let key = s3_keys::report_artifact(report.user_id, report.id);
        self.artifacts
            .put_object(&key, body, Some(CONTENT_TYPE), Some(CONTENT_ENCODING))
            .await?;

        report.mark_completed(key, Timestamp::now());
        Ok(())
    }
}

/// Commits a claimed report's final state exactly once.
///
/// `commit` is the normal path. If the owning future is dropped before that
/// (task aborted, runtime shutting down), `Drop` hands the write to a spawned
/// task so the report does not stay `processing` forever.
struct Finalizer {
    reports: Arc<dyn ReportRepository>,
    report: Report,
    committed: bool,
}

impl Finalizer {
    fn new(reports: Arc<dyn ReportRepository>, report: Report) -> Self {
        Self {
            reports,
            report,
            committed: false,
        }
    }

    fn report(&self) -> &Report {
        &self.report
    }

    fn report_mut(&mut self) -> &mut Report {
        &mut self.report
    }

    /// Record the failure (if any) and persist. A persistence error is logged
    /// and swallowed; it never replaces the pipeline's own outcome.
    async fn commit(&mut self, failure: Option<&BuildError>) {
        if let Some(err) = failure {
            warn!(
                user_id = %self.report.user_id,
                report_id = %self.report.id,
                error = %err,
                "report build failed"
            );
            self.report.mark_failed(err.to_string(), Timestamp::now());
        }

        match self.reports.update(&self.report).await {
            Ok(saved) => self.report = saved,
            Err(e) => error!(
                user_id = %self.report.user_id,
                report_id = %self.report.id,
                error = %e,
                "failed to update report"
            ),
        }
        self.committed = true;
    }
}

impl Drop for Finalizer {
    fn drop(&mut self) {
        if self.committed {
            return;
        }

        let mut report = self.report.clone();
        if !report.status().is_terminal() {
            report.mark_failed(INTERRUPTED, Timestamp::now());
        }

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            error!(report_id = %report.id, "no runtime to persist interrupted report");
            return;
        };

        let reports = Arc::clone(&self.reports);
        handle.spawn(async move {
            if let Err(e) = reports.update(&report).await {
                error!(report_id = %report.id, error = %e, "failed to update interrupted report");
            }
        });
    }
}
