use tracing::{error, info};
use uuid::Uuid;

use reportgen_core::models::job::JobDescriptor;
use reportgen_core::models::report::Report;

use crate::error::SubmitError;
use crate::ports::{JobQueue, ReportRepository};

/// Request a report: create its row in the `requested` state and enqueue the
/// job descriptor that points at it.
///
/// If enqueueing fails the row is left behind in `requested`; it is harmless
/// and the caller gets the queue error.
pub async fn request_report(
    reports: &dyn ReportRepository,
    queue: &dyn JobQueue,
    queue_url: &str,
    user_id: Uuid,
    report_type: &str,
) -> Result<Report, SubmitError> {
    let report_type = report_type.trim();
    if report_type.is_empty() {
        return Err(SubmitError::InvalidRequest("reportType is required".to_string()));
    }

    let report = reports.create(user_id, report_type).await?;
    let body = JobDescriptor::new(report.user_id, report.id).to_body()?;

    match queue.send(queue_url, &body).await {
        Ok(message_id) => {
            info!(%user_id, report_id = %report.id, message_id, "report requested");
            Ok(report)
        }
        Err(e) => {
            error!(%user_id, report_id = %report.id, error = %e, "failed to enqueue report job");
            Err(e.into())
        }
    }
}
