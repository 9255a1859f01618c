mod batcher;
mod buffer;
mod config;
mod error;
mod executor;
mod job;
mod processor;
mod stats;
mod trigger;

pub use batcher::{LifecycleState, MicroBatcher};
pub use buffer::JobBuffer;
pub use config::BatcherConfig;
pub use error::{BatcherError, JobError};
pub use job::{Completion, JobId, JobResult, Ticket, WaitError};
pub use processor::BatchProcessor;
pub use stats::{BatcherStats, DispatchCause};
