//! # kvmcp-mcp
//!
//! MCP (Model Context Protocol) server exposing a key-value store as tools
//! for AI agents, over stdin/stdout using JSON-RPC 2.0.
//!
//! ## Usage
//!
//! The server is run as an executable and configured in an MCP client:
//!
//! ```json
//! {
//!   "mcpServers": {
//!     "kv": {
//!       "command": "/path/to/kv-mcp",
//!       "env": { "KV_PATH": "/path/to/store.kv" }
//!     }
//!   }
//! }
//! ```
//!
//! ## Library Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use kvmcp_engine::MemoryEngine;
//! use kvmcp_executor::Executor;
//! use kvmcp_mcp::McpServer;
//!
//! # async fn run() -> kvmcp_mcp::Result<()> {
//! let server = McpServer::new(Executor::new(Arc::new(MemoryEngine::new())));
//! server.run_stdio().await
//! # }
//! ```

#![warn(missing_docs)]

pub mod config;
mod error;
mod server;
mod tools;

pub use config::{build_cli, Config, ConfigError};
pub use error::{codes, McpError, Result};
pub use server::{
    JsonRpcError, JsonRpcRequest, JsonRpcResponse, McpServer, PROTOCOL_VERSION, SERVER_NAME,
};
pub use tools::{ToolDef, ToolRegistry};
