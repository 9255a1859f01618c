mod config;
pub mod logging;

pub use config::{
    BATCH_INTERVAL_ENV, BATCH_SIZE_ENV, DEFAULT_BATCH_INTERVAL, DEFAULT_BATCH_SIZE,
    EnvValueError, PROGRAM_LOG_LEVEL, PROGRAM_NAME, TICKER_THREAD_NAME, env_batch_interval,
    env_batch_size,
};

pub use logging::init;
