// src/exec/mod.rs

//! Process execution layer.
//!
//! This module is responsible for actually running external commands, using
//! `tokio::process::Command`. Commands are always argv vectors, never shell
//! strings.
//!
//! - [`task`] defines [`Task`] and [`ExecutionResult`].
//! - [`command`] implements the three spawn modes: interactive (inherited
//!   stdio), captured (buffered output), and async captured.
//! - [`tools`] answers "is this tool on PATH" for availability gating.

pub mod command;
pub mod task;
pub mod tools;

pub use command::{run_async, run_captured, run_interactive};
pub use task::{EXEC_FAILURE_CODE, ExecutionResult, Task};
pub use tools::has_tool;
