// src/batch/mod.rs

//! Parallel batch orchestration.
//!
//! A batch is a fixed, statically-known set of [`Task`](crate::exec::Task)s
//! run concurrently with aggregate pass/fail semantics.
//!
//! - [`race`] delivers results in completion order, exactly once each.
//! - [`status`] tracks the still-pending names and renders them to stderr
//!   while the batch drains.
//! - [`report`] formats the per-task result lines.

pub mod race;
pub mod report;
pub mod status;

pub use race::race_in_order;
pub use status::{PendingSet, clear_status_line, spawn_status_reporter};
