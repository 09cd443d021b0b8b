//! The uniform response envelope.
//!
//! Wire shape:
//!
//! ```json
//! {
//!   "content": [{"type": "text", "text": "..."}],
//!   "isError": false
//! }
//! ```
//!
//! `content` holds zero or one text block; `isError` is always present.

use serde::{Deserialize, Serialize};

/// One block of response content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    /// Plain or JSON text
    Text {
        /// The text itself
        text: String,
    },
}

/// Result of one operation as seen by the protocol layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    /// Response content, at most one block
    pub content: Vec<ContentBlock>,
    /// True when the operation failed
    #[serde(rename = "isError")]
    pub is_error: bool,
}

impl ResponseEnvelope {
    /// Success with no payload
    pub fn empty() -> Self {
        Self {
            content: Vec::new(),
            is_error: false,
        }
    }

    /// Success carrying one text block
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::Text { text: text.into() }],
            is_error: false,
        }
    }

    /// Failure carrying one text block
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::Text { text: text.into() }],
            is_error: true,
        }
    }

    /// Text of the first content block, if any
    pub fn first_text(&self) -> Option<&str> {
        self.content.first().map(|block| match block {
            ContentBlock::Text { text } => text.as_str(),
        })
    }
}
