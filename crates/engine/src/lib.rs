//! Storage engine for kv-mcp
//!
//! The executor talks to storage exclusively through the [`KvEngine`] trait.
//! This crate defines that seam and ships [`MemoryEngine`], an ordered
//! in-memory engine that can optionally persist its mutations to an
//! append-only log.
//!
//! # Opening an engine
//!
//! ```ignore
//! use kvmcp_engine::{open, Target};
//!
//! let engine = open(&Target::parse(":memory:"))?;
//! // ... serve requests ...
//! engine.close().await?;
//! ```

#![warn(missing_docs)]

mod engine;
mod error;
pub mod limits;
mod memory;
mod open;
mod queue;
mod wal;

pub use engine::{EntryCursor, KvEngine};
pub use error::{describe_rejection, EngineError, Result};
pub use memory::MemoryEngine;
pub use open::{open, Target};
pub use queue::QueueMessage;
