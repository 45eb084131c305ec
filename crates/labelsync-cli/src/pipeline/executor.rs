//! Admission-gated executor
//!
//! The synchronous work source runs on a blocking thread and streams items
//! into an unbounded channel. The dispatcher takes items in source order,
//! acquires one gate permit per item, numbers it and spawns the operation
//! into a [`JoinSet`]. The permit moves into the task and is released when
//! the task ends, whatever its outcome.
//!
//! Every exit path (exhausted source, fatal source error, cancellation)
//! joins all admitted tasks before returning.

use crate::error::{CliError, Result, TransferError};
use crate::pipeline::reporter::{ProgressReporter, RunSummary};
use crate::source::WorkSource;
use crate::transfer::{Disposition, TransferOperation};
use labelsync_common::WorkItem;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::{JoinError, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

#[derive(Debug, Clone)]
pub struct BoundedExecutor {
    capacity: usize,
    timeout: Option<Duration>,
    cancel: CancellationToken,
}

impl BoundedExecutor {
    /// Create an executor admitting at most `capacity` concurrent operations
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(CliError::config("parallel must be at least 1"));
        }
        Ok(Self {
            capacity,
            timeout: None,
            cancel: CancellationToken::new(),
        })
    }

    /// Per-operation deadline; `None` disables it
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Run `operation` once for every item `source` yields.
    ///
    /// Item failures are reported and counted; they never fail the run.
    /// Returns the source's error if it breaks mid-stream, or
    /// [`CliError::Cancelled`] if the token fired, in both cases only after
    /// every admitted operation has finished.
    pub async fn run<S>(
        &self,
        source: S,
        operation: Arc<dyn TransferOperation>,
        reporter: Arc<ProgressReporter>,
    ) -> Result<RunSummary>
    where
        S: WorkSource,
    {
        info!(capacity = self.capacity, timeout = ?self.timeout, "Starting transfer run");

        let (tx, mut rx) = mpsc::unbounded_channel::<Result<WorkItem>>();
        let producer = tokio::task::spawn_blocking(move || {
            for next in source {
                let fatal = next.is_err();
                if tx.send(next).is_err() || fatal {
                    break;
                }
            }
        });

        let gate = Arc::new(Semaphore::new(self.capacity));
        let mut tasks = JoinSet::new();
        let mut fatal = None;
        let mut cancelled = false;

        loop {
            let next = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    cancelled = true;
                    break;
                }
                next = rx.recv() => next,
            };

            let item = match next {
                Some(Ok(item)) => item,
                Some(Err(e)) => {
                    error!(error = %e, "Work source failed, no further items will be admitted");
                    fatal = Some(e);
                    break;
                },
                None => break,
            };

            let permit = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    cancelled = true;
                    break;
                }
                permit = gate.clone().acquire_owned() => match permit {
                    Ok(permit) => permit,
                    Err(_) => break,
                },
            };

            let sequence = reporter.admit(&item);
            let operation = operation.clone();
            let task_reporter = reporter.clone();
            let cancel = self.cancel.clone();
            let timeout = self.timeout;

            tasks.spawn(async move {
                let _permit = permit;
                let target = operation.destination(&item);
                let result = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => Err(TransferError::Cancelled),
                    result = with_deadline(timeout, operation.execute(&item, &target)) => result,
                };
                task_reporter.report(sequence, target, result);
            });

            while let Some(joined) = tasks.try_join_next() {
                reap(joined, &reporter);
            }
        }

        drop(rx);
        debug!(in_flight = tasks.len(), "Waiting for admitted transfers");
        while let Some(joined) = tasks.join_next().await {
            reap(joined, &reporter);
        }
        producer
            .await
            .map_err(|e| CliError::Internal(format!("work source thread: {}", e)))?;

        let summary = reporter.summary();
        info!(
            admitted = summary.admitted,
            succeeded = summary.succeeded,
            skipped = summary.skipped,
            failed = summary.failed,
            "Transfer run finished"
        );

        if let Some(e) = fatal {
            return Err(e);
        }
        if cancelled {
            return Err(CliError::Cancelled);
        }
        Ok(summary)
    }
}

async fn with_deadline<F>(
    timeout: Option<Duration>,
    operation: F,
) -> std::result::Result<Disposition, TransferError>
where
    F: Future<Output = std::result::Result<Disposition, TransferError>>,
{
    match timeout {
        Some(limit) => tokio::time::timeout(limit, operation)
            .await
            .unwrap_or(Err(TransferError::TimedOut(limit))),
        None => operation.await,
    }
}

fn reap(joined: std::result::Result<(), JoinError>, reporter: &ProgressReporter) {
    if let Err(e) = joined {
        reporter.report_lost(&e.to_string());
    }
}
