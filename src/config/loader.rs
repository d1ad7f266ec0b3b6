// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// Read and deserialize a config file into the raw, unvalidated form.
///
/// TOML deserialization only; semantic checks (name uniqueness, non-empty
/// commands) live in the `TryFrom<RawConfigFile>` gate. Use
/// [`load_and_validate`] for the validated form.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a config file and validate it. The entry point the sessions use:
/// reads TOML, applies serde defaults, then runs the validation gate.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Default config path: `Runherd.toml` in the current working directory.
/// `--config` overrides it.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Runherd.toml")
}
