use std::fmt;
use std::time::Duration;

use crossbeam::channel::{Receiver, RecvTimeoutError, Sender};

use crate::error::{BatcherError, JobError};

/// Identity handed out on submission, unique per batcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JobId(pub u64);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "job#{}", self.0)
    }
}

/// Outcome of a single job: a value, an error, or (rarely) both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobResult<R> {
    pub value: Option<R>,
    pub error: Option<JobError>,
}

impl<R> JobResult<R> {
    pub fn ok(value: R) -> Self {
        Self {
            value: Some(value),
            error: None,
        }
    }

    pub fn err(error: JobError) -> Self {
        Self {
            value: None,
            error: Some(error),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Collapse into a `Result`. An error wins over a value when both are set.
    pub fn into_result(self) -> Result<Option<R>, JobError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.value),
        }
    }
}

/// A result published on the batcher's results stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion<R> {
    pub id: JobId,
    pub result: JobResult<R>,
}

/// A job as it sits in the buffer, together with where its result goes.
pub(crate) struct Envelope<J, R> {
    pub id: JobId,
    pub job: J,
    pub reply: Option<Sender<JobResult<R>>>,
}

/// Handle returned by `submit_tracked`, resolved once the job's batch has
/// gone through the processing function.
#[derive(Debug)]
pub struct Ticket<R> {
    id: JobId,
    rx: Receiver<JobResult<R>>,
}

impl<R> Ticket<R> {
    pub(crate) fn new(id: JobId, rx: Receiver<JobResult<R>>) -> Self {
        Self { id, rx }
    }

    pub fn id(&self) -> JobId {
        self.id
    }

    /// Block until the result is available.
    pub fn wait(self) -> Result<JobResult<R>, BatcherError> {
        self.rx.recv().map_err(|_| BatcherError::ResultDropped)
    }

    /// Block for at most `timeout`. On timeout the ticket is handed back.
    pub fn wait_timeout(self, timeout: Duration) -> Result<JobResult<R>, WaitError<R>> {
        match self.rx.recv_timeout(timeout) {
            Ok(result) => Ok(result),
            Err(RecvTimeoutError::Timeout) => Err(WaitError::Timeout(self)),
            Err(RecvTimeoutError::Disconnected) => Err(WaitError::Dropped),
        }
    }

    /// Non-blocking check.
    pub fn try_result(&self) -> Option<JobResult<R>> {
        self.rx.try_recv().ok()
    }
}

#[derive(Debug)]
pub enum WaitError<R> {
    Timeout(Ticket<R>),
    Dropped,
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
