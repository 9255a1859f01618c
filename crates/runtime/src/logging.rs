use std::sync::OnceLock;

use chrono::Local;
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

use crate::config::PROGRAM_LOG_LEVEL;

/// Level used when `MICROBATCH_LOG_LEVEL` is unset or unparsable.
const DEFAULT_LEVEL: Level = Level::Warn;

pub struct StderrLogger {
    level: Level,
}

impl StderrLogger {
    pub fn new(level: Level) -> Self {
        Self { level }
    }
}

/// Render one log line.
///
/// Batches are dispatched from submitter threads as well as from the ticker
/// thread, so the emitting thread is part of every line.
fn format_line(record: &Record<'_>) -> String {
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
    let current = std::thread::current();
    let thread = current.name().unwrap_or("unnamed");

    format!(
        "{} {} [{}] ({}) {}",
        timestamp,
        record.level(),
        record.target(),
        thread,
        record.args()
    )
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            eprintln!("{}", format_line(record));
        }
    }

    fn flush(&self) {}
}

fn get_level_from_env() -> Level {
    std::env::var(PROGRAM_LOG_LEVEL)
        .ok()
        .and_then(|s| s.parse::<LevelFilter>().ok())
        .and_then(|filter| filter.to_level())
        .unwrap_or(DEFAULT_LEVEL)
}

pub fn init() -> Result<(), SetLoggerError> {
    init_with_level(get_level_from_env())
}

/// Install the stderr logger at an explicit level.
///
/// Only the first call installs anything; later calls are no-ops so that
/// binaries and tests can both call it freely.
pub fn init_with_level(level: Level) -> Result<(), SetLoggerError> {
    static LOGGER: OnceLock<StderrLogger> = OnceLock::new();

    let init_call = LOGGER.get().is_none();
    let logger = LOGGER.get_or_init(|| StderrLogger::new(level));

    if init_call {
        log::set_logger(logger)?;
        log::set_max_level(logger.level.to_level_filter());
    }

    Ok(())
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod tests;
