use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Which trigger caused a dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DispatchCause {
    /// A submitter found the buffer full.
    Size,
    /// The periodic ticker fired.
    Timer,
    /// An explicit `drain()` call.
    Manual,
    /// The final flush during shutdown.
    Shutdown,
}

impl fmt::Display for DispatchCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DispatchCause::Size => "size",
            DispatchCause::Timer => "timer",
            DispatchCause::Manual => "manual",
            DispatchCause::Shutdown => "shutdown",
        };
        f.write_str(name)
    }
}

/// Point-in-time copy of the batcher counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatcherStats {
    /// Jobs accepted into the buffer.
    pub submitted: u64,
    /// Invocations of the processing function.
    pub batches: u64,
    /// Jobs handed to the processing function.
    pub processed: u64,
    /// Jobs whose result carried an error.
    pub failed: u64,
    pub size_triggered: u64,
    pub timer_triggered: u64,
    pub manual_triggered: u64,
    pub shutdown_triggered: u64,
}

impl BatcherStats {
    /// Average jobs per dispatched batch.
    pub fn mean_batch_len(&self) -> f64 {
        if self.batches == 0 {
            0.0
        } else {
            self.processed as f64 / self.batches as f64
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct Counters {
    submitted: AtomicU64,
    batches: AtomicU64,
    processed: AtomicU64,
    failed: AtomicU64,
    size_triggered: AtomicU64,
    timer_triggered: AtomicU64,
    manual_triggered: AtomicU64,
    shutdown_triggered: AtomicU64,
}

impl Counters {
    pub fn record_submit(&self) {
        self.submitted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_batch(&self, cause: DispatchCause, len: usize, failed: usize) {
        self.batches.fetch_add(1, Ordering::Relaxed);
        self.processed.fetch_add(len as u64, Ordering::Relaxed);
        self.failed.fetch_add(failed as u64, Ordering::Relaxed);

        let per_cause = match cause {
            DispatchCause::Size => &self.size_triggered,
            DispatchCause::Timer => &self.timer_triggered,
            DispatchCause::Manual => &self.manual_triggered,
            DispatchCause::Shutdown => &self.shutdown_triggered,
        };
        per_cause.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> BatcherStats {
        BatcherStats {
            submitted: self.submitted.load(Ordering::Relaxed),
            batches: self.batches.load(Ordering::Relaxed),
            processed: self.processed.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            size_triggered: self.size_triggered.load(Ordering::Relaxed),
            timer_triggered: self.timer_triggered.load(Ordering::Relaxed),
            manual_triggered: self.manual_triggered.load(Ordering::Relaxed),
            shutdown_triggered: self.shutdown_triggered.load(Ordering::Relaxed),
        }
    }
}
