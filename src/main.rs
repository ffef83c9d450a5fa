mod args;

use std::{fmt::Display, process::ExitCode};

use clap::Parser;
use eyre::Context;
use tierlog::{LevelSpec, RecordLevel, Severity};

use crate::args::Args;

fn main() -> ExitCode {
    let args = Args::parse();

    match run(args) {
        Err(err) => {
            let root = err.root_cause();

            eprint!("\x1b[31m");
            eprintln!("Error: {}", err);
            eprintln!();
            eprintln!("Caused by:");
            eprint!("  {}", root);
            eprintln!("\x1b[0m");
            ExitCode::from(1)
        }
        Ok(_) => ExitCode::from(0),
    }
}

fn setup_diagnostics(verbose: u8) {
    let level = match verbose {
        0 => return,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();
}

fn record_level(level: &str) -> eyre::Result<RecordLevel> {
    if level.eq_ignore_ascii_case("print") {
        return Ok(RecordLevel::Print);
    }

    let spec: LevelSpec = level.parse()?;
    let severity = Severity::resolve(&spec).wrap_err("Failed parsing --level")?;
    Ok(severity.into())
}

fn run(args: Args) -> eyre::Result<()> {
    setup_diagnostics(args.verbose);

    let level = record_level(&args.level)?;
    tierlog::initialize(args.log_config()).wrap_err("Failed initializing logger")?;
    tracing::debug!(config = ?tierlog::config(), "logger installed");

    let parts: Vec<&dyn Display> = args.message.iter().map(|part| part as &dyn Display).collect();
    tierlog::log(level, &parts);

    Ok(())
}
