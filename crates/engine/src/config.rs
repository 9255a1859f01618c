use std::time::Duration;

use microbatch_runtime::{
    DEFAULT_BATCH_INTERVAL, DEFAULT_BATCH_SIZE, env_batch_interval, env_batch_size,
};

use crate::error::BatcherError;

/// Batching thresholds. Fixed for the lifetime of a batcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatcherConfig {
    /// Maximum jobs per batch, also the capacity of the job buffer.
    pub batch_size: usize,
    /// Period of the time trigger.
    pub batch_interval: Duration,
}

impl Default for BatcherConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            batch_interval: DEFAULT_BATCH_INTERVAL,
        }
    }
}

impl BatcherConfig {
    pub fn new(batch_size: usize, batch_interval: Duration) -> Result<Self, BatcherError> {
        let config = Self {
            batch_size,
            batch_interval,
        };
        config.validate()?;
        Ok(config)
    }

    /// Defaults overridden by `MICROBATCH_BATCH_SIZE` and
    /// `MICROBATCH_BATCH_INTERVAL_MS`.
    pub fn from_env() -> Result<Self, BatcherError> {
        let defaults = Self::default();
        let batch_size = env_batch_size()?.unwrap_or(defaults.batch_size);
        let batch_interval = env_batch_interval()?.unwrap_or(defaults.batch_interval);
        Self::new(batch_size, batch_interval)
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_batch_interval(mut self, batch_interval: Duration) -> Self {
        self.batch_interval = batch_interval;
        self
    }

    pub fn validate(&self) -> Result<(), BatcherError> {
        if self.batch_size == 0 {
            return Err(BatcherError::InvalidBatchSize(self.batch_size));
        }
        if self.batch_interval.is_zero() {
            return Err(BatcherError::InvalidBatchInterval(self.batch_interval));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
