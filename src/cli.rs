// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! Clustered short flags (`-fh`) work out of the box; everything after a
//! bare `--` is preserved verbatim and never interpreted as flags. Unknown
//! flags are a hard usage error: usage goes to stderr and the process
//! exits 1 (clap's default would be 2, so [`parse`] maps it).

use clap::{Parser, Subcommand, ValueEnum};

/// Command-line arguments for `runherd`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "runherd",
    version,
    about = "Run project checks in parallel and supervise dev processes.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Runherd.toml` in the current working directory.
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `RUNHERD_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: SessionCommand,
}

#[derive(Debug, Clone, Subcommand)]
pub enum SessionCommand {
    /// Run all configured checks in parallel.
    Check {
        /// Run the fix steps first, then verify.
        #[arg(short, long)]
        fix: bool,

        /// Arguments after `--` pass through verbatim.
        #[arg(last = true)]
        passthrough: Vec<String>,
    },

    /// Start and supervise the configured dev processes.
    Dev {
        /// Start only the named process(es).
        #[arg(long, value_name = "NAME")]
        only: Vec<String>,

        /// Arguments after `--` pass through verbatim.
        #[arg(last = true)]
        passthrough: Vec<String>,
    },
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Parse the process arguments, exiting on usage errors.
///
/// Usage errors exit 1 with clap's usage message on stderr; `--help` and
/// `--version` print to stdout and exit 0.
pub fn parse() -> CliArgs {
    match CliArgs::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let is_usage_error = err.use_stderr();
            let _ = err.print();
            std::process::exit(if is_usage_error { 1 } else { 0 });
        }
    }
}
