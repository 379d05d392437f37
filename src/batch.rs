//! Batch operation coordinator.
//!
//! `Coordinator::start` launches one task per target (uncapped; the working
//! set is user-selected and the work is disk/network-bound) and streams
//! `BatchEvent`s back to the single-threaded event loop. Each unit reports
//! `TargetPending` before invoking the executor and exactly one terminal
//! `TargetDone` after; the unit that brings the completed count up to the
//! total also emits the one `BatchFinished` summary.
//!
//! The completed counter and append-only result log are the only state
//! shared between units. They live behind one mutex, held only for the
//! read-modify-write and the event sends, never across an executor call.
//!
//! Remove batches are all-or-nothing at admission: if any target is missing
//! the whole batch is rejected before any unit starts. Once admitted,
//! targets succeed or fail independently. There is no cancellation or
//! timeout for in-flight units.

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

use crate::error::{AppError, Result};
use crate::git::VcsExecutor;
use crate::models::{BatchEvent, BatchSummary, OpKind, OpResult};

/// State for one admitted batch, shared by its worker units.
struct BatchRun {
    kind: OpKind,
    total: usize,
    state: Mutex<BatchState>,
}

#[derive(Default)]
struct BatchState {
    completed: usize,
    results: Vec<OpResult>,
}

pub struct Coordinator<E> {
    executor: Arc<E>,
}

impl<E: VcsExecutor> Coordinator<E> {
    pub fn new(executor: Arc<E>) -> Self {
        Self { executor }
    }

    /// Admit and launch a batch. Events stream to `events`; this returns as
    /// soon as all units are spawned.
    ///
    /// Rejection (empty target set, or a missing target in a remove batch)
    /// happens before anything runs: no events are sent and the executor is
    /// never invoked.
    pub fn start(
        &self,
        kind: OpKind,
        targets: Vec<String>,
        events: UnboundedSender<BatchEvent>,
    ) -> Result<()> {
        if targets.is_empty() {
            return Err(AppError::InvalidTarget("no targets selected".to_string()));
        }

        if kind == OpKind::Remove {
            for target in &targets {
                if !self.executor.target_exists(target) {
                    warn!(target, "remove batch rejected, target missing");
                    return Err(AppError::NotFound(target.clone()));
                }
            }
        }

        let run = Arc::new(BatchRun {
            kind,
            total: targets.len(),
            state: Mutex::new(BatchState::default()),
        });
        debug!(kind = %kind, total = run.total, "batch admitted");

        for target in targets {
            let executor = Arc::clone(&self.executor);
            let run = Arc::clone(&run);
            let events = events.clone();

            tokio::spawn(async move {
                // Unit-local sequencing: Pending always precedes the
                // terminal outcome for this target.
                let _ = events.send(BatchEvent::TargetPending {
                    target: target.clone(),
                });

                let result = run_target(executor.as_ref(), run.kind, target).await;

                let mut state = run.state.lock().expect("batch state lock poisoned");
                state.completed += 1;
                state.results.push(result.clone());
                let summary = (state.completed == run.total).then(|| summarize(&state.results));

                let _ = events.send(BatchEvent::TargetDone { result });
                if let Some(summary) = summary {
                    debug!(succeeded = summary.succeeded, failed = summary.failed, "batch finished");
                    let _ = events.send(BatchEvent::BatchFinished { summary });
                }
            });
        }

        Ok(())
    }

    /// Run a single operation to completion and return its outcome
    /// directly, bypassing the streaming path. Used by the non-interactive
    /// single-clone and single-update commands.
    pub async fn run_single(&self, kind: OpKind, target: String) -> OpResult {
        run_target(self.executor.as_ref(), kind, target).await
    }
}

async fn run_target<E: VcsExecutor>(executor: &E, kind: OpKind, target: String) -> OpResult {
    let out = executor.run_op(kind, &target).await;

    if out.success {
        let message = match kind {
            OpKind::Clone => "Cloned successfully",
            OpKind::Update => "Updated successfully",
            OpKind::Remove => "Removed successfully",
        };
        OpResult {
            target,
            success: true,
            message: message.to_string(),
        }
    } else {
        let raw = out.error.unwrap_or_else(|| "Unknown error occurred".to_string());
        OpResult {
            target,
            success: false,
            message: classify_error(&raw),
        }
    }
}

fn summarize(results: &[OpResult]) -> BatchSummary {
    let succeeded = results.iter().filter(|r| r.success).count();
    BatchSummary {
        succeeded,
        failed: results.len() - succeeded,
    }
}

/// Map a raw git error onto a fixed vocabulary of common causes, falling
/// back to the raw message.
pub fn classify_error(raw: &str) -> String {
    if raw.contains("not a git repository") {
        "Not a git repository".to_string()
    } else if raw.contains("no such file or directory") || raw.contains("No such file or directory")
    {
        "Repository path not found".to_string()
    } else if raw.contains("Connection") || raw.contains("network") || raw.contains("Could not resolve")
    {
        "Network error - check connection".to_string()
    } else if raw.contains("Permission denied") {
        "Permission denied - check credentials".to_string()
    } else if raw.contains("Authentication failed") {
        "Authentication failed".to_string()
    } else {
        raw.to_string()
    }
}
