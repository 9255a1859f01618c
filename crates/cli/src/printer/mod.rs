use std::io::{self, Write};
use std::time::Duration;

use microbatch_engine::{BatcherConfig, BatcherStats};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table rows.
    #[default]
    Human,
    /// NDJSON (newline-delimited JSON) for machine consumption.
    Json,
}

/// Outcome of one batcher run, as printed by `bench` and `run`.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub label: String,
    pub batch_size: usize,
    pub interval_ms: u64,
    pub jobs: u64,
    pub elapsed_ms: f64,
    pub batches: u64,
    pub mean_batch_len: f64,
    pub failed: u64,
    pub size_triggered: u64,
    pub timer_triggered: u64,
    pub shutdown_triggered: u64,
}

impl RunReport {
    pub fn new(
        label: impl Into<String>,
        config: &BatcherConfig,
        stats: &BatcherStats,
        elapsed: Duration,
    ) -> Self {
        Self {
            label: label.into(),
            batch_size: config.batch_size,
            interval_ms: u64::try_from(config.batch_interval.as_millis()).unwrap_or(u64::MAX),
            jobs: stats.submitted,
            elapsed_ms: elapsed.as_secs_f64() * 1000.0,
            batches: stats.batches,
            mean_batch_len: stats.mean_batch_len(),
            failed: stats.failed,
            size_triggered: stats.size_triggered,
            timer_triggered: stats.timer_triggered,
            shutdown_triggered: stats.shutdown_triggered,
        }
    }
}

/// Writes run reports in a particular format.
pub trait ReportPrinter {
    fn begin(&mut self) -> io::Result<()>;

    fn print_report(&mut self, report: &RunReport) -> io::Result<()>;
}

pub struct HumanPrinter<W: Write> {
    out: W,
}

impl<W: Write> HumanPrinter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> ReportPrinter for HumanPrinter<W> {
    fn begin(&mut self) -> io::Result<()> {
        writeln!(
            self.out,
            "{:<24}  {:>6}  {:>8}  {:>7}  {:>10}  {:>7}  {:>6}  {:>6}",
            "SCENARIO", "SIZE", "INTERVAL", "JOBS", "ELAPSED", "BATCHES", "MEAN", "FAILED"
        )?;
        writeln!(self.out, "{}", "-".repeat(88))
    }

    fn print_report(&mut self, r: &RunReport) -> io::Result<()> {
        writeln!(
            self.out,
            "{:<24}  {:>6}  {:>6}ms  {:>7}  {:>8.2}ms  {:>7}  {:>6.1}  {:>6}",
            r.label,
            r.batch_size,
            r.interval_ms,
            r.jobs,
            r.elapsed_ms,
            r.batches,
            r.mean_batch_len,
            r.failed
        )
    }
}

pub struct JsonPrinter<W: Write> {
    out: W,
}

impl<W: Write> JsonPrinter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> ReportPrinter for JsonPrinter<W> {
    fn begin(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn print_report(&mut self, report: &RunReport) -> io::Result<()> {
        let line = serde_json::to_string(report).map_err(io::Error::other)?;
        writeln!(self.out, "{line}")
    }
}

pub fn stdout_printer(format: OutputFormat) -> Box<dyn ReportPrinter> {
    match format {
        OutputFormat::Human => Box::new(HumanPrinter::new(io::stdout())),
        OutputFormat::Json => Box::new(JsonPrinter::new(io::stdout())),
    }
}

#[cfg(test)]
#[path = "printer_tests.rs"]
mod tests;
