//! cli
//!
//! Command-line interface layer for npmctl.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Take the environment snapshot and build the [`Context`]
//! - Delegate to command handlers
//!
//! Errors are returned to `main`, the only place that reports them and
//! turns them into an exit code. In debug mode the error already carries
//! the redacted payloads, so nothing is logged here.

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};

use anyhow::Result;

use crate::config::Environment;
use crate::context::Context;

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();
    let env = Environment::from_process();

    // NPM_CLI_DEBUG turns debug on even without the flag.
    let ctx = Context {
        debug: cli.debug || env.debug,
        quiet: cli.quiet,
        interactive: cli.interactive(),
    };

    commands::dispatch(cli.command, &ctx, &env)
}
