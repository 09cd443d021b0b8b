//! Core types for kv-mcp
//!
//! This crate defines the vocabulary shared by the engine, the executor and
//! the protocol layer:
//! - [`Key`]: ordered sequence of string parts
//! - [`Entry`] / [`MaybeEntry`]: results of reads and listings
//! - [`Versionstamp`]: commit identifier attached to every stored entry
//! - [`RangeSelector`]: the three legal shapes of a listing query
//! - [`ListOptions`] / [`EnqueueOptions`]: optional engine parameters

#![warn(missing_docs)]

pub mod options;
pub mod selector;
pub mod types;

pub use options::{EnqueueOptions, ListOptions};
pub use selector::{build_selector, RangeSelector, SelectorError};
pub use types::{Consistency, Entry, Key, MaybeEntry, Versionstamp};

/// JSON document stored under a key.
pub type Value = serde_json::Value;
