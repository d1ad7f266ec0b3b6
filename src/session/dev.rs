// src/session/dev.rs

//! The dev session: spawn the configured long-lived processes into a
//! process group and block on the configured wait policy.

use std::path::PathBuf;

use tracing::info;

use crate::batch::report;
use crate::config::{ConfigFile, DevProcessConfig};
use crate::errors::{Result, RunherdError};
use crate::exec::Task;
use crate::group::ProcessGroup;
use crate::types::WaitPolicy;

/// Run the dev session. Returns the orchestrator's exit code: the
/// policy-selected child's exit code, or 130 when shutdown was triggered
/// by a termination signal.
pub async fn run_dev(cfg: &ConfigFile, only: &[String]) -> Result<i32> {
    if cfg.dev.process.is_empty() {
        return Err(RunherdError::ConfigError(
            "config contains no [[dev.process]] entries".to_string(),
        ));
    }

    for name in only {
        if !cfg.dev.process.iter().any(|p| &p.name == name) {
            return Err(RunherdError::ConfigError(format!(
                "--only {name} does not match any [[dev.process]] entry"
            )));
        }
    }

    let selected: Vec<&DevProcessConfig> = cfg
        .dev
        .process
        .iter()
        .filter(|p| only.is_empty() || only.contains(&p.name))
        .collect();

    let group = ProcessGroup::new();

    for proc in &selected {
        report::announce_start(&proc.name);
        group.spawn(&process_task(proc), proc.inherit_stdin)?;
    }

    info!(
        processes = selected.len(),
        policy = ?cfg.dev.wait,
        "dev process group running"
    );

    let code = match cfg.dev.wait {
        WaitPolicy::First => group.wait_for_first().await,
        WaitPolicy::All => group.wait_for_all().await,
    };

    Ok(code)
}

fn process_task(proc: &DevProcessConfig) -> Task {
    Task {
        name: proc.name.clone(),
        argv: proc.cmd.clone(),
        cwd: proc.cwd.as_ref().map(PathBuf::from),
        env: proc.env.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        tag: None,
        hint: None,
    }
}
