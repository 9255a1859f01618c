use std::thread;
use std::time::Duration;

use microbatch_engine::{JobError, JobResult};

/// Synthetic downstream operation: a fixed cost per call, regardless of how
/// many jobs the call carries. This is what makes batching pay off.
#[derive(Debug, Clone, Copy)]
pub struct Workload {
    pub call_cost: Duration,
    /// Fail every job whose number is a multiple of this.
    pub fail_every: Option<u64>,
}

impl Workload {
    pub fn process(&self, jobs: Vec<u64>) -> Vec<JobResult<String>> {
        if !self.call_cost.is_zero() {
            thread::sleep(self.call_cost);
        }

        jobs.into_iter()
            .map(|job| match self.fail_every {
                Some(n) if n > 0 && job % n == 0 => {
                    JobResult::err(JobError::new(format!("job {job} rejected by workload")))
                }
                _ => JobResult::ok(format!("finished{job}")),
            })
            .collect()
    }

    pub fn into_processor(
        self,
    ) -> impl Fn(Vec<u64>) -> Vec<JobResult<String>> + Send + Sync + 'static {
        move |jobs| self.process(jobs)
    }
}

#[cfg(test)]
#[path = "workload_tests.rs"]
mod tests;
