//! Executor error types
//!
//! [`Error`] is the closed set of ways an operation can fail. Its `Display`
//! implementation is the normalized one-line message that ends up in the
//! failure envelope:
//!
//! | Variant | Message |
//! |---------|---------|
//! | `InvalidSelector` | `InvalidSelector: <reason>` |
//! | `Engine` | engine error text; rejection payloads use their `message` field, else their JSON |
//! | `MalformedPayload` | `invalid JSON value: <parser error>` |
//! | `Encode` | `failed to encode result: <reason>` |
//! | `Aborted` | `operation aborted: <reason>` |

use std::fmt;

use kvmcp_core::SelectorError;
use kvmcp_engine::EngineError;
use thiserror::Error;

/// Operation failure.
#[derive(Debug, Error)]
pub enum Error {
    /// Range parameters do not form a selector
    #[error("InvalidSelector: {0}")]
    InvalidSelector(#[from] SelectorError),

    /// Failure surfaced by the storage engine
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// A `value` argument is not valid JSON text
    #[error("invalid JSON value: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    /// The result could not be rendered
    #[error("failed to encode result: {0}")]
    Encode(String),

    /// A spawned engine call panicked or was cancelled
    #[error("operation aborted: {0}")]
    Aborted(String),
}

/// Result type for executor operations
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed range parameters
    InvalidSelector,
    /// Storage engine failure, including result encoding and aborted calls
    EngineFailure,
    /// Unparseable `value` argument
    MalformedPayload,
}

impl Error {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidSelector(_) => ErrorKind::InvalidSelector,
            Error::MalformedPayload(_) => ErrorKind::MalformedPayload,
            Error::Engine(_) | Error::Encode(_) | Error::Aborted(_) => ErrorKind::EngineFailure,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::InvalidSelector => f.write_str("InvalidSelector"),
            ErrorKind::EngineFailure => f.write_str("EngineFailure"),
            ErrorKind::MalformedPayload => f.write_str("MalformedPayload"),
        }
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(e: tokio::task::JoinError) -> Self {
        Error::Aborted(e.to_string())
    }
}
