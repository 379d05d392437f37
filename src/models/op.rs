//! Batch operation types.
//!
//! - `OpKind`: which git operation a batch runs
//! - `OpStatus`: per-node lifecycle shown on tree rows
//! - `BatchEvent`: messages delivered from worker units to the event loop
//! - `OpResult` / `BatchSummary`: aggregation records

use std::fmt;

/// The operation a batch executes against each target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    Clone,
    Update,
    Remove,
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpKind::Clone => write!(f, "clone"),
            OpKind::Update => write!(f, "update"),
            OpKind::Remove => write!(f, "remove"),
        }
    }
}

/// Lifecycle status of an operation against a single tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpStatus {
    #[default]
    None,
    Pending,
    Success,
    Failed,
}

/// Terminal outcome for one target within a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpResult {
    pub target: String,
    pub success: bool,
    pub message: String,
}

/// Final tally for a finished batch. `succeeded + failed` always equals
/// the batch's target count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failed: usize,
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.failed == 0 {
            write!(f, "All {} operations completed successfully", self.succeeded)
        } else {
            write!(f, "Completed: {} succeeded, {} failed", self.succeeded, self.failed)
        }
    }
}

/// Message sent from a batch worker unit back into the event loop.
///
/// For every target, `TargetPending` is sent before its `TargetDone`;
/// no ordering holds between different targets. Exactly one
/// `BatchFinished` ends the batch.
#[derive(Debug, Clone)]
pub enum BatchEvent {
    TargetPending { target: String },
    TargetDone { result: OpResult },
    BatchFinished { summary: BatchSummary },
}
