use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Instant;

use crossbeam::channel::{self, Receiver, Sender};
use log::{debug, error, warn};

use crate::buffer::JobBuffer;
use crate::error::JobError;
use crate::job::{Completion, Envelope, JobId, JobResult};
use crate::processor::BatchProcessor;
use crate::stats::{BatcherStats, Counters, DispatchCause};

/// Results stream for jobs submitted without a ticket.
///
/// Holds only the sending half, and only while a subscriber exists. A new
/// subscription replaces the previous one; a dropped receiver clears the
/// slot on the next publish, so nothing queues up unread.
struct ResultStream<R> {
    subscriber: Mutex<Option<Sender<Completion<R>>>>,
}

impl<R> ResultStream<R> {
    fn new() -> Self {
        Self {
            subscriber: Mutex::new(None),
        }
    }

    fn subscribe(&self) -> Receiver<Completion<R>> {
        let (tx, rx) = channel::unbounded();
        *self.subscriber.lock().unwrap_or_else(PoisonError::into_inner) = Some(tx);
        rx
    }

    fn publish(&self, id: JobId, result: JobResult<R>) {
        let mut slot = self.subscriber.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(tx) = slot.as_ref() else {
            return;
        };
        if tx.send(Completion { id, result }).is_err() {
            debug!("[results] subscriber went away, dropping stream");
            *slot = None;
        }
    }

    #[cfg(test)]
    fn is_subscribed(&self) -> bool {
        self.subscriber
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

/// Drains ready batches and hands them to the processing function, one batch
/// at a time.
pub(crate) struct BatchExecutor<J, R> {
    processor: Box<dyn BatchProcessor<J, R>>,
    batch_size: usize,
    /// Held for the whole collect-and-process cycle so the size trigger and
    /// the time trigger never drain the buffer at the same time.
    drain_lock: Mutex<()>,
    processing: AtomicBool,
    counters: Counters,
    results: ResultStream<R>,
}

impl<J, R> BatchExecutor<J, R> {
    pub fn new(processor: Box<dyn BatchProcessor<J, R>>, batch_size: usize) -> Self {
        Self {
            processor,
            batch_size,
            drain_lock: Mutex::new(()),
            processing: AtomicBool::new(false),
            counters: Counters::default(),
            results: ResultStream::new(),
        }
    }

    /// Collect up to `batch_size` jobs and, if any were collected, process
    /// them as one batch. Returns the number of jobs dispatched.
    pub fn drain_and_dispatch(
        &self,
        buffer: &JobBuffer<Envelope<J, R>>,
        cause: DispatchCause,
    ) -> usize {
        let _guard = self
            .drain_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let envelopes = buffer.take_up_to(self.batch_size);
        if envelopes.is_empty() {
            return 0;
        }

        let len = envelopes.len();
        let mut routes = Vec::with_capacity(len);
        let mut jobs = Vec::with_capacity(len);
        for envelope in envelopes {
            routes.push((envelope.id, envelope.reply));
            jobs.push(envelope.job);
        }

        debug!("[dispatch] cause={cause} jobs={len}");
        let started = Instant::now();

        self.processing.store(true, Ordering::Release);
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.processor.process(jobs)));
        self.processing.store(false, Ordering::Release);

        let results = match outcome {
            Ok(results) if results.len() == len => results,
            Ok(results) => {
                error!(
                    "[dispatch] processor returned {} results for {len} jobs; failing batch",
                    results.len()
                );
                failed_batch(
                    len,
                    format!(
                        "processor returned {} results for a batch of {len}",
                        results.len()
                    ),
                )
            }
            Err(payload) => {
                let msg = panic_message(payload.as_ref());
                error!("[dispatch] processor panicked: {msg}; failing batch of {len}");
                failed_batch(len, format!("processor panicked: {msg}"))
            }
        };

        let mut failed = 0;
        for ((id, reply), result) in routes.into_iter().zip(results) {
            if let Some(err) = &result.error {
                failed += 1;
                warn!("[dispatch] {id} failed: {err}");
            }
            match reply {
                // A dropped ticket just means nobody is waiting.
                Some(tx) => {
                    let _ = tx.send(result);
                }
                None => self.results.publish(id, result),
            }
        }

        self.counters.record_batch(cause, len, failed);
        debug!(
            "[dispatch] cause={cause} jobs={len} failed={failed} took={:?}",
            started.elapsed()
        );

        len
    }

    pub fn is_processing(&self) -> bool {
        self.processing.load(Ordering::Acquire)
    }

    pub fn subscribe(&self) -> Receiver<Completion<R>> {
        self.results.subscribe()
    }

    pub fn record_submit(&self) {
        self.counters.record_submit();
    }

    pub fn stats(&self) -> BatcherStats {
        self.counters.snapshot()
    }
}

fn failed_batch<R>(len: usize, message: String) -> Vec<JobResult<R>> {
    let error = JobError::new(message);
    (0..len).map(|_| JobResult::err(error.clone())).collect()
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_owned()
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
