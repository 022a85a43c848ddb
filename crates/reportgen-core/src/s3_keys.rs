//! S3 key/path conventions.
//!
//! Pure string functions with no AWS SDK dependency. A report's artifact key is
//! derived only from its identity, so a rebuilt report overwrites the object a
//! previous attempt may have left behind.

use uuid::Uuid;

pub fn report_artifact(user_id: Uuid, report_id: Uuid) -> String {
    format!("users/{user_id}/report/{report_id}.csv")
}
