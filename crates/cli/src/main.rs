use std::process::ExitCode;

use clap::Parser;

mod commands;
mod printer;
mod workload;

use commands::Command;
use microbatch_runtime::logging;

#[derive(Debug, Parser)]
#[command(
    name = "microbatch",
    version,
    about = "Micro-batching engine playground",
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

fn main() -> ExitCode {
    logging::init().ok();

    let cli = Cli::parse();
    match cli.command {
        Command::Bench(args) => commands::bench::run(args),
        Command::Run(args) => commands::run::run(args),
    }
}
