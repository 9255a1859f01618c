use crossbeam::channel::{self, Receiver, Sender, TryRecvError, TrySendError};

/// Fixed-capacity FIFO shared by submitters and the drain path.
///
/// Backed by a bounded crossbeam channel: any number of producers can offer
/// concurrently, and removal never blocks.
pub struct JobBuffer<T> {
    tx: Sender<T>,
    rx: Receiver<T>,
    capacity: usize,
}

impl<T> JobBuffer<T> {
    pub fn new(capacity: usize) -> Self {
        let (tx, rx) = channel::bounded(capacity);
        Self { tx, rx, capacity }
    }

    /// Non-blocking insert. A full buffer hands the item back.
    pub fn offer(&self, item: T) -> Result<(), T> {
        // Both channel ends live in `self`, so the only refusal is `Full`.
        self.tx.try_send(item).map_err(TrySendError::into_inner)
    }

    /// Remove up to `max` items in FIFO order, stopping early as soon as the
    /// buffer reports empty.
    pub fn take_up_to(&self, max: usize) -> Vec<T> {
        let mut out = Vec::with_capacity(max.min(self.capacity));
        while out.len() < max {
            match self.rx.try_recv() {
                Ok(item) => out.push(item),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        out
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.rx.is_full()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
#[path = "buffer_tests.rs"]
mod tests;
