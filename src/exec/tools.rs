// src/exec/tools.rs

//! Tool availability detection.
//!
//! An expected external tool being absent is not an error: the session
//! skips whatever needs it, with a warning, rather than failing the batch.

use std::env;
use std::path::Path;

/// Returns true if `name` resolves to an executable on PATH.
pub fn has_tool(name: &str) -> bool {
    let Some(path) = env::var_os("PATH") else {
        return false;
    };
    env::split_paths(&path).any(|dir| is_executable(&dir.join(name)))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    std::fs::metadata(path)
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
