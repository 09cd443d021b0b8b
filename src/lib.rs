//! # kv-mcp
//!
//! MCP tool server exposing a durable key-value store to AI agents.
//!
//! Seven tools (`kv_set`, `kv_get`, `kv_delete`, `kv_getMany`, `kv_list`,
//! `kv_enqueue`, `kv_reset`) are served over JSON-RPC 2.0 on stdio. Every
//! tool call returns the same envelope shape, `{content, isError}`; storage
//! failures never become protocol errors.
//!
//! ## Quick Start
//!
//! ```ignore
//! use kv_mcp::prelude::*;
//!
//! let engine = open(&Target::parse(":memory:"))?;
//! let executor = Executor::new(engine);
//!
//! let env = executor
//!     .call(Command::Set {
//!         key: Key::from(["users", "alice"]),
//!         value: r#"{"age": 30}"#.to_string(),
//!         expire_in: None,
//!     })
//!     .await;
//! assert!(!env.is_error);
//! ```
//!
//! ## Layers
//!
//! - [`model`] - keys, versionstamps, range selectors, options
//! - [`engine`] - the storage seam and the in-memory/log-backed engine
//! - [`executor`] - commands, bounded listing, bulk reset, response envelopes
//! - [`mcp`] - tool registry, JSON-RPC server, process configuration

#![warn(missing_docs)]

pub mod prelude;

pub use kvmcp_core as model;
pub use kvmcp_engine as engine;
pub use kvmcp_executor as executor;
pub use kvmcp_mcp as mcp;
