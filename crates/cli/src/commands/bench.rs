use std::process::ExitCode;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use clap::Args;
use log::{error, info};
use microbatch_engine::{BatcherConfig, MicroBatcher};

use crate::commands::OutputOptions;
use crate::printer::{RunReport, stdout_printer};
use crate::workload::Workload;

/// A named batch size / interval pairing.
#[derive(Debug, Clone, Copy)]
pub struct Scenario {
    pub name: &'static str,
    pub label: &'static str,
    pub batch_size: usize,
    pub interval: Duration,
}

pub const SCENARIOS: &[Scenario] = &[
    Scenario {
        name: "realtime",
        label: "near real time",
        batch_size: 1,
        interval: Duration::from_millis(1),
    },
    Scenario {
        name: "fast",
        label: "a fast job",
        batch_size: 50,
        interval: Duration::from_millis(10),
    },
    Scenario {
        name: "regular",
        label: "a regular paced job",
        batch_size: 2000,
        interval: Duration::from_millis(1000),
    },
    Scenario {
        name: "throttled",
        label: "a highly throttled job",
        batch_size: 2000,
        interval: Duration::from_millis(5000),
    },
];

#[derive(Debug, Args)]
pub struct BenchArgs {
    /// Jobs submitted per scenario
    #[arg(long, short = 'n', default_value = "1000")]
    pub jobs: u64,

    /// Only run the named scenario (realtime, fast, regular, throttled)
    #[arg(long, short = 's')]
    pub scenario: Option<String>,

    /// Simulated fixed cost of one processor call, in microseconds
    #[arg(long, default_value = "0")]
    pub call_cost_us: u64,

    #[command(flatten)]
    pub output: OutputOptions,
}

pub fn run(args: BenchArgs) -> ExitCode {
    match execute(args) {
        Ok(code) => code,
        Err(e) => {
            error!("[error] {e:#}");
            eprintln!("[bench] {e:#}");
            ExitCode::from(2)
        }
    }
}

pub fn select_scenarios(name: Option<&str>) -> Result<Vec<Scenario>> {
    match name {
        None => Ok(SCENARIOS.to_vec()),
        Some(wanted) => match SCENARIOS.iter().find(|s| s.name.eq_ignore_ascii_case(wanted)) {
            Some(s) => Ok(vec![*s]),
            None => {
                let known: Vec<&str> = SCENARIOS.iter().map(|s| s.name).collect();
                bail!("unknown scenario {wanted:?}, expected one of {}", known.join(", "))
            }
        },
    }
}

fn execute(args: BenchArgs) -> Result<ExitCode> {
    let scenarios = select_scenarios(args.scenario.as_deref())?;
    let workload = Workload {
        call_cost: Duration::from_micros(args.call_cost_us),
        fail_every: None,
    };

    let mut printer = stdout_printer(args.output.format());
    printer.begin()?;

    for scenario in scenarios {
        let report = run_scenario(&scenario, args.jobs, workload)
            .with_context(|| format!("scenario {:?} failed", scenario.name))?;
        printer.print_report(&report)?;
    }

    Ok(ExitCode::SUCCESS)
}

/// Submit `jobs` tracked jobs and wait until every one has a result.
pub fn run_scenario(scenario: &Scenario, jobs: u64, workload: Workload) -> Result<RunReport> {
    let config = BatcherConfig::new(scenario.batch_size, scenario.interval)?;
    let batcher = MicroBatcher::new(workload.into_processor(), config)?;

    info!("[bench] running {:?} with {jobs} jobs", scenario.name);
    let started = Instant::now();
    batcher.start()?;

    let tickets = (0..jobs)
        .map(|job| batcher.submit_tracked(job))
        .collect::<Result<Vec<_>, _>>()?;

    for ticket in tickets {
        let id = ticket.id();
        ticket
            .wait()
            .with_context(|| format!("no result for {id}"))?;
    }

    let elapsed = started.elapsed();
    batcher.shutdown()?;

    Ok(RunReport::new(
        scenario.label,
        batcher.config(),
        &batcher.stats(),
        elapsed,
    ))
}

#[cfg(test)]
#[path = "bench_tests.rs"]
mod tests;
