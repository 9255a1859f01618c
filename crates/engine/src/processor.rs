use crate::job::JobResult;

/// The caller-supplied function a batch is handed to.
///
/// Implementations must return exactly one result per job, in batch order.
/// Anything else is treated as a failure of the whole batch.
pub trait BatchProcessor<J, R>: Send + Sync {
    fn process(&self, batch: Vec<J>) -> Vec<JobResult<R>>;
}

impl<J, R, F> BatchProcessor<J, R> for F
where
    F: Fn(Vec<J>) -> Vec<JobResult<R>> + Send + Sync,
{
    fn process(&self, batch: Vec<J>) -> Vec<JobResult<R>> {
        self(batch)
    }
}
