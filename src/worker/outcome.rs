//! Worker lifecycle states and terminal outcomes.

use crate::error::Error;

use std::fmt;
use std::sync::Arc;

/// Terminal result of a worker, set exactly once.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// The whole range was written.
    Succeeded,
    /// The range could not be delivered.
    Failed(Arc<Error>),
    /// The worker observed a cancellation request and stopped.
    Cancelled,
}

impl Outcome {
    /// Whether the worker delivered its whole range.
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Succeeded)
    }

    /// Whether the worker failed.
    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }

    /// Whether the worker stopped on cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Outcome::Cancelled)
    }

    /// The failure cause, if any.
    pub fn error(&self) -> Option<&Error> {
        match self {
            Outcome::Failed(e) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Succeeded => write!(f, "succeeded"),
            Outcome::Failed(e) => write!(f, "failed: {}", e),
            Outcome::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Lifecycle of a worker.
///
/// `Created -> Running -> {Succeeded | Failed | Cancelled}`; the last three
/// are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// Range and shared primitives are bound, no file yet.
    Created,
    /// The worker has been handed the output file and launched.
    Running,
    /// Terminal: the range was written.
    Succeeded,
    /// Terminal: the range could not be delivered.
    Failed,
    /// Terminal: the worker stopped on cancellation.
    Cancelled,
}

impl WorkerState {
    /// Whether no further transitions can happen.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, WorkerState::Created | WorkerState::Running)
    }
}

impl From<&Outcome> for WorkerState {
    fn from(outcome: &Outcome) -> Self {
        match outcome {
            Outcome::Succeeded => WorkerState::Succeeded,
            Outcome::Failed(_) => WorkerState::Failed,
            Outcome::Cancelled => WorkerState::Cancelled,
        }
    }
}
