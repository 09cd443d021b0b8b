//! Convenient imports for kv-mcp.
//!
//! ```ignore
//! use kv_mcp::prelude::*;
//!
//! let executor = Executor::new(open(&Target::parse(":memory:"))?);
//! ```

// Execution
pub use kvmcp_executor::{Command, Executor, Output, ResponseEnvelope};

// Error handling
pub use kvmcp_executor::{Error, ErrorKind, Result};

// Storage
pub use kvmcp_engine::{open, EngineError, EntryCursor, KvEngine, MemoryEngine, Target};

// Core types
pub use kvmcp_core::{Consistency, Entry, Key, MaybeEntry, RangeSelector, Value, Versionstamp};

// Protocol
pub use kvmcp_mcp::{McpServer, ToolRegistry};

// Re-export serde_json for convenience
pub use serde_json::json;
