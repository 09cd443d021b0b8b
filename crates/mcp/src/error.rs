//! Protocol-level errors.
//!
//! These become JSON-RPC error responses. Failures inside a tool never
//! appear here; they are carried in the tool's response envelope.

use thiserror::Error;

/// JSON-RPC error codes
pub mod codes {
    /// Invalid JSON was received
    pub const PARSE_ERROR: i64 = -32700;
    /// The JSON sent is not a valid request object
    pub const INVALID_REQUEST: i64 = -32600;
    /// The method does not exist
    pub const METHOD_NOT_FOUND: i64 = -32601;
    /// Invalid method parameters
    pub const INVALID_PARAMS: i64 = -32602;
    /// Internal JSON-RPC error
    pub const INTERNAL_ERROR: i64 = -32603;
}

/// Errors surfaced to the MCP client as JSON-RPC errors.
#[derive(Debug, Error)]
pub enum McpError {
    /// The request line is not valid JSON
    #[error("Parse error: {0}")]
    Parse(String),

    /// The message is JSON but not a JSON-RPC request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Unknown method
    #[error("Unknown method: {0}")]
    MethodNotFound(String),

    /// `tools/call` named a tool that is not registered
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Arguments do not match the tool's input schema
    #[error("Invalid params: {0}")]
    InvalidParams(String),

    /// Transport failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A response could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl McpError {
    /// JSON-RPC error code for this error
    pub fn code(&self) -> i64 {
        match self {
            McpError::Parse(_) => codes::PARSE_ERROR,
            McpError::InvalidRequest(_) => codes::INVALID_REQUEST,
            McpError::MethodNotFound(_) => codes::METHOD_NOT_FOUND,
            McpError::UnknownTool(_) | McpError::InvalidParams(_) => codes::INVALID_PARAMS,
            McpError::Io(_) | McpError::Serialization(_) => codes::INTERNAL_ERROR,
        }
    }
}

/// Result type for protocol operations
pub type Result<T> = std::result::Result<T, McpError>;
