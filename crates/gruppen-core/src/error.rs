use std::{error::Error as StdError, sync::Arc};

use thiserror::Error;

/// Outcome of a single task that did not produce a value.
#[derive(Error, Debug, Clone)]
pub enum TaskError {
    #[error("task failed: {reason}")]
    Fail { reason: String },
    #[error("task canceled")]
    Canceled,
    #[error("task panicked: {reason}")]
    Panicked { reason: String },
    #[error(transparent)]
    Source(Arc<dyn StdError + Send + Sync>),
}

impl TaskError {
    pub fn fail(reason: impl Into<String>) -> Self {
        TaskError::Fail {
            reason: reason.into(),
        }
    }

    /// Wrap an arbitrary error so it surfaces unchanged from the executor.
    pub fn from_source<E>(err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        TaskError::Source(Arc::new(err))
    }

    #[inline]
    pub fn is_canceled(&self) -> bool {
        matches!(self, TaskError::Canceled)
    }

    /// Short symbolic identifier, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            TaskError::Fail { .. } => "fail",
            TaskError::Canceled => "canceled",
            TaskError::Panicked { .. } => "panicked",
            TaskError::Source(_) => "source",
        }
    }
}

impl PartialEq for TaskError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (TaskError::Fail { reason: a }, TaskError::Fail { reason: b }) => a == b,
            (TaskError::Canceled, TaskError::Canceled) => true,
            (TaskError::Panicked { reason: a }, TaskError::Panicked { reason: b }) => a == b,
            (TaskError::Source(a), TaskError::Source(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatherError {
    #[error("invalid concurrency limit: {limit} (must be >= 1)")]
    InvalidLimit { limit: usize },
    #[error(transparent)]
    Task(#[from] TaskError),
    #[error("{missing} result slot(s) left empty without a recorded error")]
    Incomplete { missing: usize },
}

impl GatherError {
    /// Returns the task error this failure carries, if any.
    pub fn into_task_error(self) -> Option<TaskError> {
        match self {
            GatherError::Task(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_canceled(&self) -> bool {
        matches!(self, GatherError::Task(TaskError::Canceled))
    }
}
