//! Utilities shared by Nova tests.
//!
//! This crate contains canonical class hierarchies used by the type resolution tests across the
//! workspace, plus a helper for routing `tracing` output through the test harness.

mod hierarchies;

pub use hierarchies::{generic_hierarchy, plain_hierarchy, GenericHierarchy, PlainHierarchy};

/// Install a `tracing` subscriber that writes through libtest's captured output.
///
/// Only the first call in a test binary installs `filter`; later calls are no-ops.
pub fn init_tracing(filter: tracing_subscriber::EnvFilter) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
