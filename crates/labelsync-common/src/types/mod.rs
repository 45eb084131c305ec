//! Types that flow through the transfer pipeline

use serde::{Deserialize, Serialize};

/// One unit of transfer: a remote resource to fetch or a local file to upload.
///
/// Work items are produced by a work source and consumed exactly once by the
/// executor. The sequence number is not part of the item; it is assigned when
/// the item is admitted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkItem {
    /// URL to fetch, or local path to upload
    pub source_ref: String,

    /// Grouping key (label or relative directory) used for container dedup
    pub namespace: String,

    /// Target file name or object-key leaf
    pub destination_name: String,
}

impl WorkItem {
    pub fn new(
        source_ref: impl Into<String>,
        namespace: impl Into<String>,
        destination_name: impl Into<String>,
    ) -> Self {
        Self {
            source_ref: source_ref.into(),
            namespace: namespace.into(),
            destination_name: destination_name.into(),
        }
    }
}

/// Terminal state of one admitted work item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "lowercase")]
pub enum OutcomeKind {
    /// The body was transferred
    Succeeded,
    /// The destination already existed; nothing was transferred
    Skipped,
    /// Some step failed; the reason is human-readable
    Failed(String),
}

impl OutcomeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeKind::Succeeded => "succeeded",
            OutcomeKind::Skipped => "skipped",
            OutcomeKind::Failed(_) => "failed",
        }
    }
}

impl std::fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutcomeKind::Failed(reason) => write!(f, "failed: {}", reason),
            other => f.write_str(other.as_str()),
        }
    }
}

/// Outcome reported exactly once per admitted work item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferOutcome {
    /// Admission sequence number, starting at 1
    pub sequence: u64,

    /// Destination identifier (local path or object key)
    pub target: String,

    pub kind: OutcomeKind,
}

impl TransferOutcome {
    pub fn is_succeeded(&self) -> bool {
        matches!(self.kind, OutcomeKind::Succeeded)
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self.kind, OutcomeKind::Skipped)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.kind, OutcomeKind::Failed(_))
    }
}
