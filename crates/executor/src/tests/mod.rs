//! Executor tests against the in-memory engine and a fault-injecting wrapper.

mod support;
