// src/lib.rs

pub mod batch;
pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod group;
pub mod logging;
pub mod session;
pub mod types;

use std::path::PathBuf;

use crate::cli::{CliArgs, SessionCommand};
use crate::config::{default_config_path, load_and_validate};
use crate::errors::Result;

/// High-level entry point used by `main.rs`.
///
/// Loads the config and dispatches to the session for the chosen
/// subcommand. Returns the orchestrator's own exit code; `main` is
/// responsible for actually exiting with it.
pub async fn run(args: CliArgs) -> Result<i32> {
    let config_path = args
        .config
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path);
    let cfg = load_and_validate(&config_path)?;

    match &args.command {
        SessionCommand::Check { fix, .. } => session::run_check(&cfg, *fix).await,
        SessionCommand::Dev { only, .. } => session::run_dev(&cfg, only).await,
    }
}
