// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::types::WaitPolicy;

/// Top-level configuration as read from a TOML file, before validation.
///
/// A direct mapping of the file:
///
/// ```toml
/// [[fix]]
/// name = "goimports"
/// cmd = ["goimports", "-w", "."]
/// requires = "goimports"
///
/// [[check]]
/// name = "backend-test"
/// cmd = ["go", "test", "./..."]
/// tag = "backend"
///
/// [dev]
/// wait = "first"
///
/// [[dev.process]]
/// name = "frontend"
/// cmd = ["bun", "run", "dev"]
/// cwd = "web"
/// inherit_stdin = true
/// ```
///
/// All sections are optional; which ones must be non-empty depends on the
/// subcommand and is checked at session start, not here.
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfigFile {
    /// Fix steps from `[[fix]]`, in file order.
    #[serde(default)]
    pub fix: Vec<StepConfig>,

    /// Pre steps from `[[pre]]`, in file order.
    #[serde(default)]
    pub pre: Vec<StepConfig>,

    /// Parallel checks from `[[check]]`, in file order.
    #[serde(default)]
    pub check: Vec<CheckConfig>,

    /// Dev supervision config from `[dev]`.
    #[serde(default)]
    pub dev: DevSection,
}

/// Validated configuration. Construct via `TryFrom<RawConfigFile>`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub fix: Vec<StepConfig>,
    pub pre: Vec<StepConfig>,
    pub check: Vec<CheckConfig>,
    pub dev: DevSection,
}

impl ConfigFile {
    /// Internal constructor used by the validation layer.
    pub(crate) fn new_unchecked(raw: RawConfigFile) -> Self {
        Self {
            fix: raw.fix,
            pre: raw.pre,
            check: raw.check,
            dev: raw.dev,
        }
    }
}

/// One sequential step (`[[fix]]` or `[[pre]]`).
#[derive(Debug, Clone, Deserialize)]
pub struct StepConfig {
    /// Human-readable step name, unique within its list.
    pub name: String,

    /// Command as an argv vector. Never interpreted by a shell.
    pub cmd: Vec<String>,

    /// Working directory override, relative to the invocation directory.
    #[serde(default)]
    pub cwd: Option<String>,

    /// Extra environment variables, merged last-write-wins over the base env.
    #[serde(default)]
    pub env: BTreeMap<String, String>,

    /// Display grouping tag. Cosmetic only.
    #[serde(default)]
    pub tag: Option<String>,

    /// Tool that must be on PATH for this step to run. Missing tools skip
    /// the step with a warning instead of failing the run.
    #[serde(default)]
    pub requires: Option<String>,

    /// Run with inherited stdio instead of captured output. Suitable for
    /// tools that want a real terminal.
    #[serde(default)]
    pub interactive: bool,
}

/// One parallel check (`[[check]]`).
#[derive(Debug, Clone, Deserialize)]
pub struct CheckConfig {
    /// Human-readable check name, unique within the batch.
    pub name: String,

    /// Command as an argv vector. Never interpreted by a shell.
    pub cmd: Vec<String>,

    /// Working directory override.
    #[serde(default)]
    pub cwd: Option<String>,

    /// Extra environment variables.
    #[serde(default)]
    pub env: BTreeMap<String, String>,

    /// Display grouping tag (e.g. `"frontend"`, `"backend"`). Cosmetic only.
    #[serde(default)]
    pub tag: Option<String>,

    /// Remediation hint printed instead of raw output when the check fails.
    #[serde(default)]
    pub hint: Option<String>,

    /// Tool that must be on PATH for this check to run.
    #[serde(default)]
    pub requires: Option<String>,
}

/// `[dev]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct DevSection {
    /// What the dev session blocks on: `"first"` (default) or `"all"`.
    #[serde(default)]
    pub wait: WaitPolicy,

    /// Supervised processes from `[[dev.process]]`, in file order.
    #[serde(default)]
    pub process: Vec<DevProcessConfig>,
}

/// One supervised process (`[[dev.process]]`).
#[derive(Debug, Clone, Deserialize)]
pub struct DevProcessConfig {
    /// Process name, unique within the group. Also the target of `--only`.
    pub name: String,

    /// Command as an argv vector.
    pub cmd: Vec<String>,

    /// Working directory override.
    #[serde(default)]
    pub cwd: Option<String>,

    /// Extra environment variables.
    #[serde(default)]
    pub env: BTreeMap<String, String>,

    /// Connect the child's stdin to the orchestrator's own. Only one
    /// process in a group usually wants this (e.g. an interactive dev
    /// server); the others stay silent consumers.
    #[serde(default)]
    pub inherit_stdin: bool,
}
