use std::fmt;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A requested report and the outcome of building it.
///
/// `(user_id, id)` is the primary key. At most one of `completed_at` and
/// `failed_at` is ever set, and either one implies `started_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: Uuid,
    pub user_id: Uuid,
    pub report_type: String,
    pub output_path: Option<String>,
    pub download_url: Option<String>,
    pub download_url_expires_at: Option<Timestamp>,
    pub error_message: Option<String>,
    pub created_at: Timestamp,
    pub started_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
    pub failed_at: Option<Timestamp>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Requested,
    Processing,
    Completed,
    Failed,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Requested => "requested",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Report {
    /// A freshly requested report, not yet picked up by a worker.
    pub fn new(user_id: Uuid, report_type: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            report_type: report_type.into(),
            output_path: None,
            download_url: None,
            download_url_expires_at: None,
            error_message: None,
            created_at: Timestamp::now(),
            started_at: None,
            completed_at: None,
            failed_at: None,
        }
    }

    pub fn is_done(&self) -> bool {
        self.completed_at.is_some() || self.failed_at.is_some()
    }

    pub fn status(&self) -> ReportStatus {
        if self.started_at.is_none() {
            ReportStatus::Requested
        } else if self.completed_at.is_some() {
            ReportStatus::Completed
        } else if self.failed_at.is_some() {
            ReportStatus::Failed
        } else {
            ReportStatus::Processing
        }
    }

    pub fn mark_started(&mut self, at: Timestamp) {
        self.started_at = Some(at);
    }

    pub fn mark_completed(&mut self, output_path: impl Into<String>, at: Timestamp) {
        self.output_path = Some(output_path.into());
        self.completed_at = Some(at);
        self.failed_at = None;
        self.error_message = None;
    }

    /// Record a failed attempt. Clears any success fields so the report never
    /// carries both terminal timestamps.
    pub fn mark_failed(&mut self, error_message: impl Into<String>, at: Timestamp) {
        self.started_at.get_or_insert(at);
        self.failed_at = Some(at);
        self.error_message = Some(error_message.into());
        self.completed_at = None;
        self.output_path = None;
    }

    pub fn view(&self) -> ReportView {
        ReportView {
            report: self.clone(),
            status: self.status(),
        }
    }
}

/// Read-side projection of a report, with its derived status inlined.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportView {
    #[serde(flatten)]
    pub report: Report,
    pub status: ReportStatus,
}
