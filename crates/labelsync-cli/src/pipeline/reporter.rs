//! Per-item outcome reporting
//!
//! The reporter hands out admission sequence numbers and turns each
//! operation result into exactly one structured diagnostic. It is a side
//! channel: nothing in the transfer protocol reads back from it.

use crate::error::TransferError;
use crate::transfer::Disposition;
use indicatif::ProgressBar;
use labelsync_common::{OutcomeKind, TransferOutcome, WorkItem};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use tracing::{debug, info, warn};

/// Totals for one pipeline run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub admitted: u64,
    pub succeeded: u64,
    pub skipped: u64,
    pub failed: u64,
}

impl RunSummary {
    /// Items that reached a terminal outcome
    pub fn finished(&self) -> u64 {
        self.succeeded + self.skipped + self.failed
    }
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} item(s): {} transferred, {} skipped, {} failed",
            self.admitted, self.succeeded, self.skipped, self.failed
        )
    }
}

pub struct ProgressReporter {
    sequence: AtomicU64,
    succeeded: AtomicU64,
    skipped: AtomicU64,
    failed: AtomicU64,
    bar: ProgressBar,
    recorded: Option<Mutex<Vec<TransferOutcome>>>,
}

impl ProgressReporter {
    pub fn new(bar: ProgressBar) -> Self {
        Self {
            sequence: AtomicU64::new(0),
            succeeded: AtomicU64::new(0),
            skipped: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            bar,
            recorded: None,
        }
    }

    /// Reporter without a visible progress bar
    pub fn hidden() -> Self {
        Self::new(crate::progress::hidden())
    }

    /// Keep every outcome in memory; see [`ProgressReporter::outcomes`]
    pub fn recording(mut self) -> Self {
        self.recorded = Some(Mutex::new(Vec::new()));
        self
    }

    /// Assign the next sequence number (starting at 1) to an admitted item
    pub fn admit(&self, item: &WorkItem) -> u64 {
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(sequence, source = %item.source_ref, namespace = %item.namespace, "Admitted");
        sequence
    }

    /// Emit the outcome of one admitted item
    pub fn report(
        &self,
        sequence: u64,
        target: String,
        result: Result<Disposition, TransferError>,
    ) -> OutcomeKind {
        let kind = match result {
            Ok(Disposition::Transferred) => {
                self.succeeded.fetch_add(1, Ordering::SeqCst);
                info!(sequence, destination = %target, "Transferred");
                OutcomeKind::Succeeded
            },
            Ok(Disposition::AlreadyPresent) => {
                self.skipped.fetch_add(1, Ordering::SeqCst);
                info!(sequence, destination = %target, "Skipped, already exists");
                OutcomeKind::Skipped
            },
            Err(e) => {
                self.failed.fetch_add(1, Ordering::SeqCst);
                warn!(sequence, destination = %target, error = %e, "Transfer failed");
                OutcomeKind::Failed(e.to_string())
            },
        };

        self.bar.inc(1);
        if let Some(recorded) = &self.recorded {
            let mut outcomes = recorded.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            outcomes.push(TransferOutcome {
                sequence,
                target,
                kind: kind.clone(),
            });
        }
        kind
    }

    /// Count an item whose task died without reporting
    pub fn report_lost(&self, reason: &str) {
        self.failed.fetch_add(1, Ordering::SeqCst);
        self.bar.inc(1);
        warn!(error = reason, "Transfer task aborted");
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            admitted: self.sequence.load(Ordering::SeqCst),
            succeeded: self.succeeded.load(Ordering::SeqCst),
            skipped: self.skipped.load(Ordering::SeqCst),
            failed: self.failed.load(Ordering::SeqCst),
        }
    }

    /// Recorded outcomes in admission order; empty unless [`recording`] was set
    ///
    /// [`recording`]: ProgressReporter::recording
    pub fn outcomes(&self) -> Vec<TransferOutcome> {
        let Some(recorded) = &self.recorded else {
            return Vec::new();
        };
        let mut outcomes = recorded
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();
        outcomes.sort_by_key(|o| o.sequence);
        outcomes
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn item(name: &str) -> WorkItem {
        WorkItem::new(format!("http://host/{}.jpg", name), "cats", name)
    }

    #[test]
    fn test_sequence_starts_at_one_and_increases() {
        let reporter = ProgressReporter::hidden();
        assert_eq!(reporter.admit(&item("a")), 1);
        assert_eq!(reporter.admit(&item("b")), 2);
        assert_eq!(reporter.admit(&item("c")), 3);
        assert_eq!(reporter.summary().admitted, 3);
    }

    #[test]
    fn test_report_counts_each_kind() {
        let reporter = ProgressReporter::hidden().recording();
        for name in ["a", "b", "c"] {
            reporter.admit(&item(name));
        }

        reporter.report(3, "out/cats/c.jpg".into(), Err(TransferError::Fetch("404".into())));
        reporter.report(1, "out/cats/a.jpg".into(), Ok(Disposition::Transferred));
        reporter.report(2, "out/cats/b.jpg".into(), Ok(Disposition::AlreadyPresent));

        let summary = reporter.summary();
        assert_eq!(
            summary,
            RunSummary {
                admitted: 3,
                succeeded: 1,
                skipped: 1,
                failed: 1
            }
        );
        assert_eq!(summary.finished(), 3);

        let outcomes = reporter.outcomes();
        assert_eq!(
            outcomes.iter().map(|o| o.sequence).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert_eq!(outcomes[2].kind, OutcomeKind::Failed("http: 404".to_string()));
    }

    #[test]
    fn test_outcomes_empty_without_recording() {
        let reporter = ProgressReporter::hidden();
        reporter.admit(&item("a"));
        reporter.report(1, "out/cats/a.jpg".into(), Ok(Disposition::Transferred));
        assert!(reporter.outcomes().is_empty());
    }

    #[test]
    fn test_summary_display() {
        let summary = RunSummary {
            admitted: 5,
            succeeded: 3,
            skipped: 2,
            failed: 0,
        };
        assert_eq!(summary.to_string(), "5 item(s): 3 transferred, 2 skipped, 0 failed");
    }
}
