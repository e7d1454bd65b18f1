//! `ringframe` binary: replay a recorded length-prefixed stream and list the
//! frames it contains.

mod cli;
mod replay;

use std::{
    fs::File,
    io::{self, BufWriter, Read, Write},
    process::ExitCode,
};

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    // Diagnostics go to stderr so stdout carries only the frame report.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = cli::Cli::parse();
    match execute(&cli) {
        Ok(summary) => {
            info!(frames = summary.frames, trailing = summary.trailing, "replay finished");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn execute(cli: &cli::Cli) -> Result<replay::Summary, replay::ReplayError> {
    let mut input: Box<dyn Read> = match &cli.input {
        Some(path) => Box::new(File::open(path)?),
        None => Box::new(io::stdin().lock()),
    };
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let summary = replay::run(cli, &mut *input, &mut out)?;
    out.flush()?;
    Ok(summary)
}
