// src/session/check.rs

//! The check session: run all configured checks in parallel and report
//! them as each finishes.
//!
//! Flow:
//! 1. Warn once per missing tool; everything that needs it is skipped.
//! 2. With `--fix`: run the `[[fix]]` steps sequentially, fail-fast.
//! 3. Run the `[[pre]]` steps sequentially, fail-fast.
//! 4. Launch every available check, drain results in completion order,
//!    and aggregate the verdict only after all have been delivered. A
//!    failing check never aborts its still-running siblings.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Instant;

use tracing::{debug, info};

use crate::batch::race_in_order;
use crate::batch::report;
use crate::batch::status::{PendingSet, clear_status_line, spawn_status_reporter, stderr_is_tty};
use crate::config::{CheckConfig, ConfigFile, StepConfig};
use crate::errors::{Result, RunherdError};
use crate::exec::{Task, has_tool, run_async, run_captured, run_interactive};

/// Run the whole check session. Returns the orchestrator's exit code:
/// 0 iff every task succeeded, otherwise the failing sequential step's exit
/// code or 1 for batch failures.
pub async fn run_check(cfg: &ConfigFile, fix: bool) -> Result<i32> {
    if cfg.check.is_empty() {
        return Err(RunherdError::ConfigError(
            "config contains no [[check]] entries".to_string(),
        ));
    }

    let missing = missing_tools(cfg, fix);
    for tool in &missing {
        report::warn_missing_tool(tool, "skipping everything that needs it");
    }

    if fix {
        let code = run_steps(&cfg.fix, &missing).await?;
        if code != 0 {
            return Ok(code);
        }
    }

    let code = run_steps(&cfg.pre, &missing).await?;
    if code != 0 {
        return Ok(code);
    }

    run_batch(&cfg.check, &missing).await
}

/// Every `requires` tool referenced by the session that is absent from
/// PATH. Fix-step requirements only count when fix steps will actually run.
fn missing_tools(cfg: &ConfigFile, fix: bool) -> BTreeSet<String> {
    let mut required = BTreeSet::new();
    if fix {
        required.extend(cfg.fix.iter().filter_map(|s| s.requires.clone()));
    }
    required.extend(cfg.pre.iter().filter_map(|s| s.requires.clone()));
    required.extend(cfg.check.iter().filter_map(|c| c.requires.clone()));

    required.into_iter().filter(|t| !has_tool(t)).collect()
}

fn skipped(requires: &Option<String>, missing: &BTreeSet<String>) -> bool {
    requires.as_ref().is_some_and(|t| missing.contains(t))
}

fn step_task(step: &StepConfig) -> Task {
    Task {
        name: step.name.clone(),
        argv: step.cmd.clone(),
        cwd: step.cwd.as_ref().map(PathBuf::from),
        env: step.env.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        tag: step.tag.clone(),
        hint: None,
    }
}

fn check_task(check: &CheckConfig) -> Task {
    Task {
        name: check.name.clone(),
        argv: check.cmd.clone(),
        cwd: check.cwd.as_ref().map(PathBuf::from),
        env: check.env.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        tag: check.tag.clone(),
        hint: check.hint.clone(),
    }
}

/// Run sequential steps in file order. Any nonzero exit is fatal to the
/// whole run and propagated as the session's exit code.
async fn run_steps(steps: &[StepConfig], missing: &BTreeSet<String>) -> Result<i32> {
    for step in steps {
        if skipped(&step.requires, missing) {
            debug!(step = %step.name, "skipping step; required tool missing");
            continue;
        }

        let task = step_task(step);
        let started = Instant::now();

        let code = if step.interactive {
            let code = run_interactive(&task).await?;
            report::print_step_line(&step.name, step.tag.as_deref(), code, started.elapsed());
            code
        } else {
            let result = run_captured(&task).await?;
            report::print_step_line(
                &step.name,
                step.tag.as_deref(),
                result.exit_code,
                result.elapsed,
            );
            if !result.success() {
                report::print_step_output(&result);
            }
            result.exit_code
        };

        if code != 0 {
            info!(step = %step.name, exit_code = code, "sequential step failed; aborting run");
            return Ok(if code < 0 { 1 } else { code });
        }
    }
    Ok(0)
}

async fn run_batch(checks: &[CheckConfig], missing: &BTreeSet<String>) -> Result<i32> {
    let tasks: Vec<Task> = checks
        .iter()
        .filter(|c| !skipped(&c.requires, missing))
        .map(check_task)
        .collect();

    info!(count = tasks.len(), "launching check batch");
    let started = Instant::now();

    let executions = tasks
        .iter()
        .map(|task| (task.clone(), run_async(task)))
        .collect::<Vec<_>>();

    let pending = PendingSet::new(tasks.iter().map(|t| t.name.clone()));
    let live_status = stderr_is_tty();
    let reporter = live_status.then(|| spawn_status_reporter(pending.clone(), started));

    let mut failed = false;
    race_in_order(executions, |task, result| {
        pending.remove(&task.name);
        if live_status {
            clear_status_line();
        }
        report::print_result(&task, &result);
        if !result.success() {
            failed = true;
        }
    })
    .await;

    if let Some(handle) = reporter {
        handle.abort();
    }
    if live_status {
        clear_status_line();
    }

    info!(failed, "check batch drained");
    Ok(if failed { 1 } else { 0 })
}
