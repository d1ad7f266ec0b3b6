// src/exec/command.rs

use std::process::Stdio;
use std::time::Instant;

use anyhow::Context;
use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::errors::Result;
use crate::exec::task::{EXEC_FAILURE_CODE, ExecutionResult, Task};

/// Build a `tokio::process::Command` for a task.
///
/// The base environment is the orchestrator's own plus `CI=1`, so child
/// tools behave non-interactively; captured modes also force
/// `FORCE_COLOR=1` so tools keep ANSI color in buffered output. The task's
/// own overlay is applied last, so it wins per key.
pub(crate) fn build_command(task: &Task, force_color: bool) -> Command {
    let mut cmd = Command::new(&task.argv[0]);
    cmd.args(&task.argv[1..]);

    cmd.env("CI", "1");
    if force_color {
        cmd.env("FORCE_COLOR", "1");
    }
    for (key, value) in &task.env {
        cmd.env(key, value);
    }

    if let Some(cwd) = &task.cwd {
        cmd.current_dir(cwd);
    }

    cmd
}

/// Run a command with stdout/stderr connected directly to the
/// orchestrator's own, blocking until it exits.
///
/// Suitable for trusted, sequential steps whose tools want a real terminal.
/// A spawn failure is an error here (unlike [`run_async`]): there is no
/// batch to degrade into.
pub async fn run_interactive(task: &Task) -> Result<i32> {
    info!(step = %task.name, argv = ?task.argv, "running interactive step");

    let mut child = build_command(task, false)
        .stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .with_context(|| format!("spawning process for step '{}'", task.name))?;

    let status = child
        .wait()
        .await
        .with_context(|| format!("waiting for process of step '{}'", task.name))?;

    Ok(status.code().unwrap_or(EXEC_FAILURE_CODE))
}

/// Run a command with both output streams fully buffered, blocking until it
/// exits.
///
/// A nonzero child exit is a normal, reportable outcome, not an executor
/// failure; only a spawn/observation failure is an error.
pub async fn run_captured(task: &Task) -> Result<ExecutionResult> {
    info!(step = %task.name, argv = ?task.argv, "running captured step");
    let started = Instant::now();

    let output = build_command(task, false)
        .stdin(Stdio::null())
        .output()
        .await
        .with_context(|| format!("spawning process for step '{}'", task.name))?;

    let result = ExecutionResult::from_output(output, started.elapsed());
    debug!(
        step = %task.name,
        exit_code = result.exit_code,
        "captured step exited"
    );
    Ok(result)
}

/// Spawn a command without blocking; the returned handle resolves to an
/// [`ExecutionResult`] when the child exits.
///
/// Never resolves to an error: if the child cannot be spawned at all
/// (missing executable, permission error), the result carries
/// [`EXEC_FAILURE_CODE`] with the error text as the stderr payload.
pub fn run_async(task: &Task) -> JoinHandle<ExecutionResult> {
    let name = task.name.clone();
    let cmd = build_command(task, true);

    tokio::spawn(async move {
        let started = Instant::now();

        let mut cmd = cmd;
        match cmd.stdin(Stdio::null()).output().await {
            Ok(output) => {
                let result = ExecutionResult::from_output(output, started.elapsed());
                info!(
                    task = %name,
                    exit_code = result.exit_code,
                    elapsed_ms = result.elapsed.as_millis() as u64,
                    "task process exited"
                );
                result
            }
            Err(err) => {
                warn!(task = %name, error = %err, "task could not be executed");
                ExecutionResult::execution_failure(err.to_string(), started.elapsed())
            }
        }
    })
}
