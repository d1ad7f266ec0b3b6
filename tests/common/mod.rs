// tests/common/mod.rs

#![allow(dead_code)]

pub use runherd_test_utils::{init_tracing, with_timeout};
