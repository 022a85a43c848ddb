use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;

/// Queue payload placed on the job queue when a report is requested.
///
/// Only carries the identity needed to look up the report row; the row itself
/// is the source of truth for report state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDescriptor {
    pub user_id: Uuid,
    pub report_id: Uuid,
}

impl JobDescriptor {
    pub fn new(user_id: Uuid, report_id: Uuid) -> Self {
        Self { user_id, report_id }
    }

    /// Parse a queue message body. Unknown fields are ignored.
    pub fn from_body(body: Option<&str>) -> Result<Self, CoreError> {
        match body {
            None => Err(CoreError::EmptyBody),
            Some(b) if b.trim().is_empty() => Err(CoreError::EmptyBody),
            Some(b) => Ok(serde_json::from_str(b)?),
        }
    }

    pub fn to_body(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string(self)?)
    }
}
