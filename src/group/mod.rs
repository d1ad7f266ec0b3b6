// src/group/mod.rs

//! Long-lived process supervision.
//!
//! A [`ProcessGroup`] owns a set of sibling subprocesses sharing one
//! lifecycle: coordinated startup, per-group signal subscriptions, and a
//! single-shot teardown that escalates from SIGTERM to SIGKILL after a
//! bounded grace period and restores shared terminal state.

pub mod supervisor;
pub mod terminal;

pub use supervisor::{GroupState, ManagedProcess, ProcessGroup};
