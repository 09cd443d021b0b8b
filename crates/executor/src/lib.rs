//! Command execution layer for kv-mcp
//!
//! The executor turns a typed [`Command`] into a call against the storage
//! engine and the result into a [`ResponseEnvelope`]. It owns the failure
//! boundary of every operation: [`Executor::call`] never returns an error,
//! only envelopes with `isError` set.
//!
//! # Example
//!
//! ```ignore
//! use kvmcp_executor::{Command, Executor};
//!
//! let executor = Executor::new(engine);
//! let envelope = executor.call(Command::Get { key, consistency: None }).await;
//! assert!(!envelope.is_error);
//! ```

#![warn(missing_docs)]

pub mod bounded;
mod command;
mod envelope;
mod error;
mod executor;
mod handlers;
mod output;
pub mod reset;

#[cfg(test)]
mod tests;

pub use command::Command;
pub use envelope::{ContentBlock, ResponseEnvelope};
pub use error::{Error, ErrorKind, Result};
pub use executor::Executor;
pub use output::{CommitResult, Output};
pub use reset::ResetOutcome;

pub use kvmcp_core::{Consistency, Entry, Key, MaybeEntry, Value};
