use std::time::Duration;

pub const PROGRAM_NAME: &str = "microbatch";
pub const PROGRAM_LOG_LEVEL: &str = "MICROBATCH_LOG_LEVEL";

/// Overrides the number of jobs collected into a single batch.
pub const BATCH_SIZE_ENV: &str = "MICROBATCH_BATCH_SIZE";
/// Overrides the periodic flush interval, in milliseconds.
pub const BATCH_INTERVAL_ENV: &str = "MICROBATCH_BATCH_INTERVAL_MS";

pub const DEFAULT_BATCH_SIZE: usize = 10;
pub const DEFAULT_BATCH_INTERVAL: Duration = Duration::from_millis(1000);

/// Name given to the background thread that drives the periodic trigger.
pub const TICKER_THREAD_NAME: &str = "microbatch-ticker";

/// A value read from the environment that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvValueError {
    pub var: &'static str,
    pub value: String,
}

fn env_number(var: &'static str) -> Result<Option<u64>, EnvValueError> {
    match std::env::var(var) {
        Ok(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed
                .parse::<u64>()
                .map(Some)
                .map_err(|_| EnvValueError { var, value: raw })
        }
        Err(_) => Ok(None),
    }
}

/// Batch size requested through `MICROBATCH_BATCH_SIZE`, if set.
///
/// Zero is passed through untouched; rejecting it is the batcher's job.
pub fn env_batch_size() -> Result<Option<usize>, EnvValueError> {
    env_number(BATCH_SIZE_ENV)?
        .map(|n| {
            usize::try_from(n).map_err(|_| EnvValueError {
                var: BATCH_SIZE_ENV,
                value: n.to_string(),
            })
        })
        .transpose()
}

/// Batch interval requested through `MICROBATCH_BATCH_INTERVAL_MS`, if set.
pub fn env_batch_interval() -> Result<Option<Duration>, EnvValueError> {
    Ok(env_number(BATCH_INTERVAL_ENV)?.map(Duration::from_millis))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
