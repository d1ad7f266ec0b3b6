// src/config/validate.rs

use std::collections::BTreeSet;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{Result, RunherdError};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = RunherdError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_entries("fix", cfg.fix.iter().map(|s| (s.name.as_str(), &s.cmd)))?;
    validate_entries("pre", cfg.pre.iter().map(|s| (s.name.as_str(), &s.cmd)))?;
    validate_entries("check", cfg.check.iter().map(|c| (c.name.as_str(), &c.cmd)))?;
    validate_entries(
        "dev.process",
        cfg.dev.process.iter().map(|p| (p.name.as_str(), &p.cmd)),
    )?;
    Ok(())
}

/// Per-list checks: names must be non-empty and unique, and every entry
/// needs at least a program name in its argv vector.
fn validate_entries<'a>(
    section: &str,
    entries: impl Iterator<Item = (&'a str, &'a Vec<String>)>,
) -> Result<()> {
    let mut seen = BTreeSet::new();

    for (name, cmd) in entries {
        if name.is_empty() {
            return Err(RunherdError::ConfigError(format!(
                "[[{section}]] entry has an empty name"
            )));
        }
        if !seen.insert(name) {
            return Err(RunherdError::ConfigError(format!(
                "duplicate [[{section}]] name '{name}'"
            )));
        }
        if cmd.is_empty() {
            return Err(RunherdError::ConfigError(format!(
                "[[{section}]] entry '{name}' has an empty cmd"
            )));
        }
        if cmd[0].is_empty() {
            return Err(RunherdError::ConfigError(format!(
                "[[{section}]] entry '{name}' has an empty program in cmd"
            )));
        }
    }

    Ok(())
}
