//! Engine error types

use serde_json::Value;
use thiserror::Error;

/// Failure surfaced by a storage engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Key is empty or too large
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// Serialized value exceeds the engine limit
    #[error("value too large: {size} bytes exceeds limit of {limit} bytes")]
    ValueTooLarge {
        /// Serialized size of the rejected value
        size: usize,
        /// Maximum accepted size
        limit: usize,
    },

    /// Argument outside the range the engine accepts
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Persisted data could not be encoded or decoded
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O failure in the persistence layer
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Target or feature this build cannot serve
    #[error("unsupported: {0}")]
    Unsupported(String),

    /// Engine handle used after `close`
    #[error("engine is closed")]
    Closed,

    /// Engine rejected the call with a diagnostic payload
    #[error("{}", describe_rejection(.0))]
    Rejected(Value),
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Render a rejection payload as one line of text.
///
/// A structured diagnostic (an object with a string `message` field) yields
/// that field. Any other payload yields its compact JSON text.
///
/// ```
/// use kvmcp_engine::describe_rejection;
/// use serde_json::json;
///
/// assert_eq!(describe_rejection(&json!({"message": "quota exceeded", "code": 429})), "quota exceeded");
/// assert_eq!(describe_rejection(&json!({"code": 429})), r#"{"code":429}"#);
/// assert_eq!(describe_rejection(&json!("boom")), r#""boom""#);
/// ```
pub fn describe_rejection(payload: &Value) -> String {
    match payload.get("message") {
        Some(Value::String(message)) => message.clone(),
        _ => payload.to_string(),
    }
}

impl From<rmp_serde::encode::Error> for EngineError {
    fn from(e: rmp_serde::encode::Error) -> Self {
        EngineError::Serialization(e.to_string())
    }
}

impl From<rmp_serde::decode::Error> for EngineError {
    fn from(e: rmp_serde::decode::Error) -> Self {
        EngineError::Serialization(e.to_string())
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(e: serde_json::Error) -> Self {
        EngineError::Serialization(e.to_string())
    }
}
