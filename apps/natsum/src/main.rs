//! natsum: sum the first N natural numbers, optionally in parallel.
//!
//! Prints the closed-form value next to the value computed by the selected
//! threading scheme so the two can be compared.
//!
//! # Usage
//!
//! ```bash
//! # One worker thread
//! natsum 1000000
//!
//! # One worker per available CPU
//! natsum 1000000 --method cpus
//!
//! # JSON logs on stderr
//! NATSUM__LOGGING__FORMAT=json natsum 10 -m cpus
//! ```

// CLI tools are expected to print to stdout/stderr
#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use natsum_bootstrap::{AppConfig, CliArgs};
use natsum_core::{Interval, ThreadingScheme, closed_form_sum};

const SCHEME_HELP: &str = "\
Threading schemes:
  single  computation happens on a single worker thread
  cpus    computation is divided among k threads, where k is the
          number of CPUs available to the process";

/// Sum the first N natural numbers on one or many threads.
#[derive(Parser, Debug)]
#[command(name = "natsum")]
#[command(author, version, about, long_about = None)]
#[command(allow_negative_numbers = true, after_help = SCHEME_HELP)]
struct Cli {
    /// The number to sum up to (1 + 2 + ... + N)
    #[arg(
        value_name = "N",
        value_parser = parse_bound,
        required_unless_present = "print_config"
    )]
    bound: Option<u64>,

    /// Threading scheme: single or cpus (default: single)
    #[arg(short = 'm', long = "method", value_name = "SCHEME", value_parser = parse_scheme)]
    method: Option<ThreadingScheme>,

    /// Path to a YAML configuration file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Print effective configuration (YAML) and exit
    #[arg(long)]
    print_config: bool,
}

fn parse_bound(raw: &str) -> Result<u64, String> {
    match raw.trim().parse::<u64>() {
        Ok(bound) if bound > 0 => Interval::first_naturals(bound)
            .map(|_| bound)
            .map_err(|e| e.to_string()),
        _ => Err("please supply a positive number".to_owned()),
    }
}

fn parse_scheme(raw: &str) -> Result<ThreadingScheme, String> {
    raw.parse::<ThreadingScheme>().map_err(|e| e.to_string())
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => return report_usage_error(&err),
    };

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("\nERROR: {err:#}\n");
            ExitCode::FAILURE
        }
    }
}

/// Usage errors exit with status 1; `--help` and `--version` also come
/// through here and exit with 0.
fn report_usage_error(err: &clap::Error) -> ExitCode {
    let code = if err.use_stderr() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    };
    if err.print().is_err() {
        return ExitCode::FAILURE;
    }
    code
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let args = CliArgs {
        config: cli.config.clone(),
        verbose: cli.verbose,
    };

    // defaults -> YAML (if provided) -> env (NATSUM__*) -> CLI overrides
    let mut config = AppConfig::load_layered(args.config.as_deref())?;
    config.apply_cli_overrides(&args);

    natsum_bootstrap::init_logging(&config.logging)?;

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    let bound = cli.bound.context("N is required")?;
    let scheme = select_scheme(cli.method);

    let expected = closed_form_sum(bound);
    let calculated = scheme
        .sum_up_to(bound)
        .with_context(|| format!("threading scheme '{scheme}' failed"))?;

    println!("Expected:   {expected}");
    println!("Calculated: {calculated}");
    Ok(())
}

fn select_scheme(requested: Option<ThreadingScheme>) -> ThreadingScheme {
    requested.unwrap_or_else(|| {
        let scheme = ThreadingScheme::default();
        tracing::info!(scheme = scheme.name(), "Default threading scheme '{scheme}' will be used");
        scheme
    })
}
