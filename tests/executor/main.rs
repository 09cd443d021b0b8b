//! Executor integration tests.
//!
//! Exercise the executor against real engines opened from targets,
//! including the log-backed engine across process-style reopen cycles.

#[path = "../common/mod.rs"]
mod common;

mod durability;
mod properties;
