use std::io;
use std::time::Duration;

use thiserror::Error;

/// Failures surfaced by the batcher itself.
///
/// Per-job processing failures are not represented here; they travel inside
/// [`crate::JobResult`] and never abort batching.
#[derive(Debug, Error)]
pub enum BatcherError {
    #[error("batch size must be a positive integer, got {0}")]
    InvalidBatchSize(usize),

    #[error("batch interval must be a positive duration, got {0:?}")]
    InvalidBatchInterval(Duration),

    #[error("invalid value {value:?} for environment variable {var}")]
    InvalidEnv { var: &'static str, value: String },

    #[error("batcher has not been started")]
    NotStarted,

    #[error("batcher is already running")]
    AlreadyStarted,

    #[error("batcher has already been shut down")]
    AlreadyShutDown,

    #[error("batcher is stopped and no longer accepts jobs")]
    Stopped,

    #[error("ticker thread panicked before shutdown")]
    TickerPanicked,

    #[error("failed to spawn ticker thread")]
    Spawn(#[source] io::Error),

    #[error("job result was dropped before it was delivered")]
    ResultDropped,
}

impl BatcherError {
    /// Whether this error stems from invalid configuration rather than misuse
    /// of a live batcher.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            BatcherError::InvalidBatchSize(_)
                | BatcherError::InvalidBatchInterval(_)
                | BatcherError::InvalidEnv { .. }
        )
    }
}

impl From<microbatch_runtime::EnvValueError> for BatcherError {
    fn from(err: microbatch_runtime::EnvValueError) -> Self {
        BatcherError::InvalidEnv {
            var: err.var,
            value: err.value,
        }
    }
}

/// Per-job failure reported by the processing function.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct JobError {
    message: String,
}

impl JobError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
