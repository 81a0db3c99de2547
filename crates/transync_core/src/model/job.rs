//! Vendor job ledger record.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for one vendor submission.
pub type JobId = Uuid;

/// Lifecycle of a vendor submission as recorded by the host.
///
/// The status engine only ever observes `InProgress`; the other states are
/// written by the host when the vendor reports back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    InProgress,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "in_progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

/// One dispatched vendor job for a `(group, locale)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: JobId,
    pub group_key: String,
    /// Lowercase host locale the job translates into.
    ///
    /// May equal the parent's locale when the whole group is being processed.
    pub target_locale: String,
    pub status: JobStatus,
}

impl JobRecord {
    /// Creates a fresh in-progress job with a generated id.
    pub fn in_progress(group_key: impl Into<String>, target_locale: impl AsRef<str>) -> Self {
        Self {
            id: Uuid::new_v4(),
            group_key: group_key.into(),
            target_locale: crate::model::item::normalize_locale(target_locale.as_ref()),
            status: JobStatus::InProgress,
        }
    }
}
