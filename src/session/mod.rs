// src/session/mod.rs

//! Orchestration sessions, one per subcommand.
//!
//! - [`check`] drives the parallel check batch (with optional fix and pre
//!   steps run sequentially first).
//! - [`dev`] spawns the configured dev processes into a
//!   [`ProcessGroup`](crate::group::ProcessGroup) and blocks on the
//!   configured wait policy.

pub mod check;
pub mod dev;

pub use check::run_check;
pub use dev::run_dev;
