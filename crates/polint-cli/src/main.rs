//! # po-lint entry point
//!
//! Parses command-line arguments, sets up logging and runs the linter.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use polint_cli::lint::{run_lint, LintArgs};

/// Lint Prometheus Operator manifests.
///
/// Each file must declare a known `kind` (Alertmanager, Prometheus,
/// PrometheusRule or ServiceMonitor) and match that kind's schema exactly.
/// Unknown fields are rejected.
#[derive(Parser, Debug)]
#[command(name = "po-lint", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(flatten)]
    lint: LintArgs,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "po-lint starting");

    match run_lint(&cli.lint) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
