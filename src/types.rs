// src/types.rs

//! Small shared domain types.

use std::str::FromStr;

use serde::Deserialize;

/// What `runherd dev` blocks on once all processes are up.
///
/// - `First`: the group lives and dies together. As soon as any one process
///   exits, the rest are torn down and the first exit code is propagated.
/// - `All`: every process runs to its own natural exit; the least successful
///   (maximum) exit code is propagated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaitPolicy {
    First,
    All,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        WaitPolicy::First
    }
}

impl FromStr for WaitPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "first" => Ok(WaitPolicy::First),
            "all" => Ok(WaitPolicy::All),
            other => Err(format!(
                "invalid wait policy: {other} (expected \"first\" or \"all\")"
            )),
        }
    }
}
