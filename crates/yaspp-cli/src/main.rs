//! # create-yaspp
//!
//! Provisions a new yaspp site project.
//!
//! ## Startup sequence
//!
//! 1. Parse CLI arguments (help and version exit early).
//! 2. Initialise the tracing subscriber (logging).
//! 3. Load tool settings (file + env + defaults).
//! 4. Build the [`OutputManager`].
//! 5. Run the provisioning pipeline.
//! 6. Translate any [`CliError`] into a user-facing message and exit code.
//!
//! ## Exit codes
//!
//! | Code | Meaning                              |
//! |------|--------------------------------------|
//! |  0   | Success, help, version, completions  |
//! |  1   | Provisioning failed                  |
//! |  2   | Unrecognized or malformed arguments  |
//! |  4   | Unreadable settings                  |

use std::{io::IsTerminal as _, process::ExitCode};

use clap::{CommandFactory, Parser, error::ErrorKind};
use tracing::{debug, info, instrument};

use crate::{
    cli::Cli,
    config::AppConfig,
    error::{CliError, CliResult},
    logging::init_logging,
    output::OutputManager,
};

mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod messages;
mod output;
mod prompt;
mod reporter;

fn main() -> ExitCode {
    // .env first, before tracing reads RUST_LOG.
    let _ = dotenvy::dotenv();

    // ── 1. Parse arguments ────────────────────────────────────────────────
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => return parse_failure(e),
    };

    // ── 2. Initialise tracing ─────────────────────────────────────────────
    if let Err(e) = init_logging(&cli.global) {
        eprintln!("Failed to initialise logging: {e}");
        return ExitCode::from(1);
    }

    debug!(
        verbose = cli.global.verbose,
        quiet = cli.global.quiet,
        no_color = cli.global.no_color,
        "CLI started"
    );
    let verbose = cli.global.verbose > 0;

    if let Some(shell) = cli.completions {
        return finish(commands::completions::execute(shell), verbose);
    }

    // ── 3. Load settings ──────────────────────────────────────────────────
    let config = match AppConfig::load(cli.global.settings.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            return handle_error(
                CliError::ConfigError {
                    message: format!("{e:#}"),
                    source: None,
                },
                verbose,
            );
        }
    };

    // ── 4. Build output manager ───────────────────────────────────────────
    let output = OutputManager::new(&cli.global, &config);

    // ── 5. Run + 6. Error handling ────────────────────────────────────────
    finish(run(cli, config, output), verbose)
}

#[instrument(skip_all)]
fn run(cli: Cli, config: AppConfig, output: OutputManager) -> CliResult<()> {
    commands::create::execute(cli.create, cli.global, config, output)
}

fn finish(result: CliResult<()>, verbose: bool) -> ExitCode {
    match result {
        Ok(()) => {
            info!("create-yaspp completed successfully");
            ExitCode::SUCCESS
        }
        Err(e) => handle_error(e, verbose),
    }
}

/// Help and version go to stdout with status 0. Anything else prints the
/// error and the help text to stderr and exits with 2.
fn parse_failure(e: clap::Error) -> ExitCode {
    match e.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            let _ = e.print();
            ExitCode::SUCCESS
        }
        _ => {
            eprintln!("{}", e.render().ansi());
            eprintln!("{}", Cli::command().render_help().ansi());
            ExitCode::from(2)
        }
    }
}

/// Translate a `CliError` into a user message and an exit code.
fn handle_error(err: CliError, verbose: bool) -> ExitCode {
    err.log();

    // stderr, so the message survives a redirected stdout
    eprint!("{}", err.render(verbose, std::io::stderr().is_terminal()));

    ExitCode::from(err.exit_code())
}

// ── tests ─────────────────────────────────────────────────────────────────────
