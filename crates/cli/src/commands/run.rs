use std::process::ExitCode;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Args;
use crossbeam::channel::Receiver;
use log::{error, info, warn};
use microbatch_engine::{Completion, MicroBatcher};
use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook::flag;

use crate::commands::{BatcherOptions, OutputOptions};
use crate::printer::{RunReport, stdout_printer};
use crate::workload::Workload;

#[derive(Debug, Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub batcher: BatcherOptions,

    /// Target submissions per second
    #[arg(long, short = 'r', default_value = "100")]
    pub rate: u32,

    /// Stop on its own after this many seconds instead of waiting for a signal
    #[arg(long)]
    pub duration_secs: Option<u64>,

    /// Fail every job whose number is a multiple of K
    #[arg(long, value_name = "K")]
    pub fail_every: Option<u64>,

    /// Simulated fixed cost of one processor call, in milliseconds
    #[arg(long, default_value = "5")]
    pub call_cost_ms: u64,

    #[command(flatten)]
    pub output: OutputOptions,
}

pub fn run(args: RunArgs) -> ExitCode {
    match execute(args) {
        Ok(code) => code,
        Err(e) => {
            error!("[error] {e:#}");
            eprintln!("[run] {e:#}");
            ExitCode::from(2)
        }
    }
}

fn execute(args: RunArgs) -> Result<ExitCode> {
    let config = args.batcher.resolve()?;
    let workload = Workload {
        call_cost: Duration::from_millis(args.call_cost_ms),
        fail_every: args.fail_every,
    };

    let shutdown = Arc::new(AtomicBool::new(false));

    // Signal handlers only flip the flag; the submit loop polls it.
    for sig in [SIGINT, SIGTERM] {
        flag::register(sig, Arc::clone(&shutdown))
            .with_context(|| format!("Failed to register signal handler for {sig}"))?;
    }

    let batcher = MicroBatcher::new(workload.into_processor(), config)?;
    let results = batcher.results();
    let collector = thread::Builder::new()
        .name("microbatch-results".to_owned())
        .spawn(move || collect_failures(results))
        .context("Failed to spawn results collector")?;

    batcher.start()?;
    info!(
        "submitting ~{}/s (batch_size={}, interval={:?}); Ctrl-C to stop",
        args.rate, config.batch_size, config.batch_interval
    );

    let pause = Duration::from_secs(1) / args.rate.max(1);
    let deadline = args.duration_secs.map(|s| Instant::now() + Duration::from_secs(s));
    let started = Instant::now();
    let mut next_job: u64 = 0;

    loop {
        if shutdown.load(Ordering::Relaxed) {
            info!("Shutdown signal observed; draining.");
            break;
        }
        if deadline.is_some_and(|d| Instant::now() >= d) {
            info!("Run duration elapsed; draining.");
            break;
        }

        batcher.submit(next_job)?;
        next_job += 1;
        thread::sleep(pause);
    }

    batcher.shutdown()?;
    let elapsed = started.elapsed();
    let stats = batcher.stats();

    // Dropping the batcher closes the results stream and ends the collector.
    let report = RunReport::new("run", batcher.config(), &stats, elapsed);
    drop(batcher);

    let failures = collector
        .join()
        .map_err(|_| anyhow::Error::msg("results collector thread panicked"))?;
    if failures != stats.failed {
        warn!("collector saw {failures} failures, stats report {}", stats.failed);
    }

    let mut printer = stdout_printer(args.output.format());
    printer.begin()?;
    printer.print_report(&report)?;

    Ok(ExitCode::SUCCESS)
}

/// Drain the results stream until the batcher goes away, counting failures.
fn collect_failures(results: Receiver<Completion<String>>) -> u64 {
    results.iter().filter(|c| !c.result.is_ok()).count() as u64
}
