pub mod bench;
pub mod run;

use std::time::Duration;

use clap::{Args, Subcommand};
use microbatch_engine::{BatcherConfig, BatcherError};

pub use bench::BenchArgs;
pub use run::RunArgs;

use crate::printer::OutputFormat;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the built-in benchmark scenarios.
    ///
    /// Example:
    ///   microbatch bench
    ///   microbatch bench --scenario fast --jobs 5000 --json
    Bench(BenchArgs),

    /// Feed jobs continuously until interrupted, then drain and report.
    ///
    /// Example:
    ///   microbatch run --batch-size 25 --interval-ms 200 --rate 500
    Run(RunArgs),
}

/// Batcher thresholds, layered over `MICROBATCH_*` environment overrides.
#[derive(Debug, Args)]
pub struct BatcherOptions {
    /// Maximum jobs per batch
    #[arg(long, short = 'b')]
    pub batch_size: Option<usize>,

    /// Periodic flush interval in milliseconds
    #[arg(long, short = 'i')]
    pub interval_ms: Option<u64>,
}

impl BatcherOptions {
    pub fn resolve(&self) -> Result<BatcherConfig, BatcherError> {
        let mut config = BatcherConfig::from_env()?;
        if let Some(size) = self.batch_size {
            config = config.with_batch_size(size);
        }
        if let Some(ms) = self.interval_ms {
            config = config.with_batch_interval(Duration::from_millis(ms));
        }
        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, Args)]
pub struct OutputOptions {
    /// Output reports as NDJSON (one JSON object per line)
    #[arg(long)]
    pub json: bool,
}

impl OutputOptions {
    pub fn format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}
