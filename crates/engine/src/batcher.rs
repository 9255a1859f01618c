use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;

use crossbeam::channel::{self, Receiver, Sender};
use log::{debug, info, warn};

use crate::buffer::JobBuffer;
use crate::config::BatcherConfig;
use crate::error::BatcherError;
use crate::executor::BatchExecutor;
use crate::job::{Completion, Envelope, JobId, JobResult, Ticket};
use crate::processor::BatchProcessor;
use crate::stats::{BatcherStats, DispatchCause};
use crate::trigger::Ticker;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Constructed, ticker not yet running. Submissions are accepted.
    Created,
    Running,
    /// Shutdown requested: the ticker is being stopped, submissions are still
    /// accepted and will be part of the final flush.
    ShuttingDown,
    /// Terminal. The buffer has been flushed and new jobs are rejected.
    Stopped,
}

/// State reachable from both submitters and the ticker thread.
struct Shared<J, R> {
    buffer: JobBuffer<Envelope<J, R>>,
    executor: BatchExecutor<J, R>,
}

impl<J, R> Shared<J, R> {
    fn dispatch(&self, cause: DispatchCause) -> usize {
        self.executor.drain_and_dispatch(&self.buffer, cause)
    }
}

/// Accumulates submitted jobs into batches and hands each batch to a
/// [`BatchProcessor`].
///
/// A batch is dispatched when a submitter finds the buffer full (inline, on
/// the submitter's thread) or when the periodic ticker fires, whichever comes
/// first. Dispatches are serialized, so the processing function never runs
/// concurrently with itself.
///
/// The processing function must not submit to the batcher that invoked it.
pub struct MicroBatcher<J, R> {
    config: BatcherConfig,
    shared: Arc<Shared<J, R>>,
    /// Submitters hold a read guard for the whole of `submit`, so moving to
    /// `Stopped` under the write guard guarantees nobody is mid-insert.
    state: RwLock<LifecycleState>,
    ticker: Mutex<Option<Ticker>>,
    next_id: AtomicU64,
}

impl<J, R> MicroBatcher<J, R>
where
    J: Send + 'static,
    R: Send + 'static,
{
    pub fn new<P>(processor: P, config: BatcherConfig) -> Result<Self, BatcherError>
    where
        P: BatchProcessor<J, R> + 'static,
    {
        config.validate()?;

        Ok(Self {
            config,
            shared: Arc::new(Shared {
                buffer: JobBuffer::new(config.batch_size),
                executor: BatchExecutor::new(Box::new(processor), config.batch_size),
            }),
            state: RwLock::new(LifecycleState::Created),
            ticker: Mutex::new(None),
            next_id: AtomicU64::new(0),
        })
    }

    pub fn create<P>(
        processor: P,
        batch_size: usize,
        batch_interval: Duration,
    ) -> Result<Self, BatcherError>
    where
        P: BatchProcessor<J, R> + 'static,
    {
        Self::new(processor, BatcherConfig::new(batch_size, batch_interval)?)
    }

    /// Spawn the ticker thread. Only valid from `Created`.
    pub fn start(&self) -> Result<(), BatcherError> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        match *state {
            LifecycleState::Created => {}
            LifecycleState::Running => return Err(BatcherError::AlreadyStarted),
            LifecycleState::ShuttingDown | LifecycleState::Stopped => {
                return Err(BatcherError::AlreadyShutDown);
            }
        }

        let shared = Arc::clone(&self.shared);
        let ticker = Ticker::spawn(self.config.batch_interval, move || {
            shared.dispatch(DispatchCause::Timer);
        })
        .map_err(BatcherError::Spawn)?;

        *self.ticker.lock().unwrap_or_else(PoisonError::into_inner) = Some(ticker);
        *state = LifecycleState::Running;

        info!(
            "[batcher] started: batch_size={}, batch_interval={:?}",
            self.config.batch_size, self.config.batch_interval
        );
        Ok(())
    }
}

impl<J, R> MicroBatcher<J, R> {
    /// Enqueue a job. Its result goes to the [`results`](Self::results)
    /// stream, keyed by the returned id.
    ///
    /// Returns immediately unless the buffer is full, in which case the
    /// current contents are dispatched on this thread first.
    pub fn submit(&self, job: J) -> Result<JobId, BatcherError> {
        self.enqueue(job, None)
    }

    /// Enqueue a job and get a ticket resolving to this job's own result.
    pub fn submit_tracked(&self, job: J) -> Result<Ticket<R>, BatcherError> {
        let (tx, rx) = channel::bounded(1);
        let id = self.enqueue(job, Some(tx))?;
        Ok(Ticket::new(id, rx))
    }

    fn enqueue(
        &self,
        job: J,
        reply: Option<Sender<JobResult<R>>>,
    ) -> Result<JobId, BatcherError> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        if *state == LifecycleState::Stopped {
            return Err(BatcherError::Stopped);
        }

        let id = JobId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut envelope = Envelope { id, job, reply };

        // Other submitters may refill the buffer between our dispatch and
        // retry, so keep going until the insert lands.
        while let Err(rejected) = self.shared.buffer.offer(envelope) {
            envelope = rejected;
            debug!("[batcher] buffer full on {id}, dispatching inline");
            self.shared.dispatch(DispatchCause::Size);
        }

        self.shared.executor.record_submit();
        Ok(id)
    }

    /// Dispatch whatever is currently buffered, up to one batch. Returns the
    /// number of jobs dispatched; an empty buffer is a no-op.
    pub fn drain(&self) -> usize {
        self.shared.dispatch(DispatchCause::Manual)
    }

    /// Stop the ticker, flush every buffered job, and reject new jobs.
    ///
    /// Blocks until the ticker thread has exited and the final flush is done.
    /// Fails with `NotStarted` before `start`, and with `AlreadyShutDown` on
    /// a second call.
    pub fn shutdown(&self) -> Result<(), BatcherError> {
        {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            match *state {
                LifecycleState::Running => *state = LifecycleState::ShuttingDown,
                LifecycleState::Created => return Err(BatcherError::NotStarted),
                LifecycleState::ShuttingDown | LifecycleState::Stopped => {
                    return Err(BatcherError::AlreadyShutDown);
                }
            }
        }
        info!("[batcher] shutting down");

        let ticker = self
            .ticker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        let ticker_result = match ticker {
            Some(ticker) => ticker.stop(),
            None => Ok(()),
        };

        let flushed = {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            *state = LifecycleState::Stopped;
            self.flush()
        };

        info!("[batcher] stopped, flushed {flushed} jobs");

        if ticker_result.is_err() {
            warn!("[batcher] ticker thread panicked");
            return Err(BatcherError::TickerPanicked);
        }
        Ok(())
    }

    /// Dispatch until the buffer reports empty.
    fn flush(&self) -> usize {
        let mut total = 0;
        loop {
            let n = self.shared.dispatch(DispatchCause::Shutdown);
            if n == 0 {
                return total;
            }
            total += n;
        }
    }

    /// Stream of results for jobs submitted with [`submit`](Self::submit).
    ///
    /// Single consumer: each call replaces the previous subscriber, whose
    /// receiver disconnects. Results produced while nobody is subscribed,
    /// or after the receiver is dropped, are only logged.
    pub fn results(&self) -> Receiver<Completion<R>> {
        self.shared.executor.subscribe()
    }

    pub fn state(&self) -> LifecycleState {
        *self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Jobs currently waiting in the buffer.
    pub fn pending(&self) -> usize {
        self.shared.buffer.len()
    }

    /// Whether the processing function is running right now.
    pub fn is_processing(&self) -> bool {
        self.shared.executor.is_processing()
    }

    pub fn stats(&self) -> BatcherStats {
        self.shared.executor.stats()
    }

    pub fn config(&self) -> &BatcherConfig {
        &self.config
    }
}

impl<J, R> Drop for MicroBatcher<J, R> {
    fn drop(&mut self) {
        match self.state() {
            LifecycleState::Running => {
                if let Err(err) = self.shutdown() {
                    warn!("[batcher] shutdown on drop failed: {err}");
                }
            }
            LifecycleState::Created if !self.shared.buffer.is_empty() => {
                warn!(
                    "[batcher] dropped before start with {} pending jobs, flushing",
                    self.pending()
                );
                self.flush();
            }
            _ => {}
        }
    }
}

#[cfg(test)]
#[path = "batcher_tests.rs"]
mod tests;
