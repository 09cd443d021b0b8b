//! MCP integration tests.
//!
//! Drive the JSON-RPC server the way a client would: raw request lines in,
//! response objects out.

#[path = "../common/mod.rs"]
mod common;

mod session;
mod tools;
