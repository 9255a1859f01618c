use std::io;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam::channel::{self, Sender};
use crossbeam::select;
use log::{debug, info};
use microbatch_runtime::TICKER_THREAD_NAME;

/// Owned background thread that fires the time trigger every `interval`.
///
/// The loop only observes the stop signal between ticks, so a dispatch that
/// is already running always completes before the thread exits.
pub(crate) struct Ticker {
    stop_tx: Sender<()>,
    handle: JoinHandle<()>,
}

impl Ticker {
    pub fn spawn<F>(interval: Duration, mut on_tick: F) -> io::Result<Self>
    where
        F: FnMut() + Send + 'static,
    {
        let (stop_tx, stop_rx) = channel::bounded::<()>(1);

        let handle = thread::Builder::new()
            .name(TICKER_THREAD_NAME.to_owned())
            .spawn(move || {
                let ticks = channel::tick(interval);
                debug!("[ticker] started, interval={interval:?}");

                loop {
                    select! {
                        recv(ticks) -> _ => on_tick(),
                        // A message or a dropped sender both mean stop.
                        recv(stop_rx) -> _ => break,
                    }
                }

                debug!("[ticker] exiting");
            })?;

        Ok(Self { stop_tx, handle })
    }

    /// Signal the loop and wait for the thread to exit.
    pub fn stop(self) -> thread::Result<()> {
        let _ = self.stop_tx.send(());
        let result = self.handle.join();
        info!("[ticker] joined");
        result
    }
}

#[cfg(test)]
#[path = "trigger_tests.rs"]
mod tests;
