//! Integration tests for tutorbox
//!
//! These tests require a `python3` interpreter on the host.
//! Run with: cargo test -p tutorbox --features integration-tests

#![cfg(feature = "integration-tests")]

use tutorbox::{Config, Executor, Grader};

mod execution;
mod grading;
mod sandbox;
mod timeouts;

/// Executor backed by the default (embedded) configuration
pub(crate) fn test_executor() -> Executor {
    Executor::new(Config::default())
}

/// Grader backed by a default executor
pub(crate) fn test_grader() -> Grader {
    Grader::new(test_executor())
}
