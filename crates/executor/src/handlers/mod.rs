//! Command handlers.
//!
//! Each handler takes the engine plus the command's fields and returns an
//! [`Output`](crate::Output). Handlers propagate errors; turning an error
//! into a failure envelope is the executor's job.

pub(crate) mod kv;
pub(crate) mod list;
pub(crate) mod queue;
