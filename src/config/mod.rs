// src/config/mod.rs

//! Configuration layer.
//!
//! `Runherd.toml` describes everything the orchestrator runs:
//!
//! - `[[fix]]`: ordered steps run sequentially (fail-fast) when `--fix` is
//!   given, before anything else.
//! - `[[pre]]`: ordered steps run sequentially (fail-fast) before the
//!   parallel batch, e.g. code generation.
//! - `[[check]]`: the flat parallel batch of checks.
//! - `[dev]` / `[[dev.process]]`: long-lived processes supervised by
//!   `runherd dev`, plus the wait policy for the group.
//!
//! [`loader`] reads and deserializes the file; [`validate`] implements
//! `TryFrom<RawConfigFile> for ConfigFile`, the only way to obtain a
//! validated config.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate};
pub use model::{CheckConfig, ConfigFile, DevProcessConfig, DevSection, RawConfigFile, StepConfig};
