// src/exec/task.rs

use std::path::PathBuf;
use std::process::Output;
use std::time::Duration;

/// Reserved exit code meaning "the command could not be executed or observed
/// at all" (missing executable, permission error, killed by signal), as
/// opposed to a genuine nonzero exit from the child. Unreachable as a real
/// exit status.
pub const EXEC_FAILURE_CODE: i32 = -1;

/// Static description of one unit of work: a named external command.
///
/// Immutable once constructed; the orchestration session that defines the
/// batch owns it.
#[derive(Debug, Clone)]
pub struct Task {
    /// Human-readable name, unique within a batch.
    pub name: String,
    /// Command and arguments.
    pub argv: Vec<String>,
    /// Working directory override.
    pub cwd: Option<PathBuf>,
    /// Environment overlay, merged last-write-wins over the base env.
    pub env: Vec<(String, String)>,
    /// Display grouping tag. Cosmetic only.
    pub tag: Option<String>,
    /// Remediation hint shown instead of raw output on failure.
    pub hint: Option<String>,
}

impl Task {
    pub fn new(name: impl Into<String>, argv: Vec<String>) -> Self {
        Self {
            name: name.into(),
            argv,
            cwd: None,
            env: Vec::new(),
            tag: None,
            hint: None,
        }
    }
}

/// The outcome of running one [`Task`] once. Produced exactly once per
/// execution; immutable after production.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// 0 = success, nonzero = failure, [`EXEC_FAILURE_CODE`] = the execution
    /// itself could not be started/observed.
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    /// Launch to observed completion.
    pub elapsed: Duration,
}

impl ExecutionResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    pub fn could_not_execute(&self) -> bool {
        self.exit_code == EXEC_FAILURE_CODE
    }

    pub(crate) fn from_output(output: Output, elapsed: Duration) -> Self {
        Self {
            exit_code: output.status.code().unwrap_or(EXEC_FAILURE_CODE),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            elapsed,
        }
    }

    /// Synthetic result for an execution that never produced a child exit:
    /// spawn failure, or the async machinery around it failing. A missing
    /// tool degrades to "one more failing check" instead of crashing the
    /// whole orchestration.
    pub fn execution_failure(message: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            exit_code: EXEC_FAILURE_CODE,
            stdout: String::new(),
            stderr: message.into(),
            elapsed,
        }
    }
}
