//! Optional engine parameters
//!
//! Every field is an `Option` and stays `None` unless the caller supplied
//! it. The engine applies its own defaults; nothing here substitutes one.

use serde::{Deserialize, Serialize};

use crate::{Consistency, Key};

/// Options for a listing scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListOptions {
    /// Maximum number of entries the engine should produce
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    /// Read freshness
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consistency: Option<Consistency>,
    /// Entries fetched per internal page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<usize>,
    /// Scan in descending key order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reverse: Option<bool>,
}

impl ListOptions {
    /// True if the scan runs in descending order
    pub fn is_reverse(&self) -> bool {
        self.reverse.unwrap_or(false)
    }
}

/// Options for a queued message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnqueueOptions {
    /// Milliseconds before the message becomes deliverable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<u64>,
    /// Keys written with the message value if delivery ultimately fails
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keys_if_undelivered: Option<Vec<Key>>,
    /// Retry delays in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backoff_schedule: Option<Vec<u64>>,
}

impl EnqueueOptions {
    /// Assemble options from individually optional fields.
    ///
    /// Returns `None` when no field was supplied, so callers forward no
    /// options bag at all rather than an empty one.
    ///
    /// ```
    /// use kvmcp_core::EnqueueOptions;
    ///
    /// assert!(EnqueueOptions::from_parts(None, None, None).is_none());
    /// let opts = EnqueueOptions::from_parts(Some(500), None, None).unwrap();
    /// assert_eq!(opts.delay, Some(500));
    /// assert!(opts.backoff_schedule.is_none());
    /// ```
    pub fn from_parts(
        delay: Option<u64>,
        keys_if_undelivered: Option<Vec<Key>>,
        backoff_schedule: Option<Vec<u64>>,
    ) -> Option<Self> {
        let opts = Self {
            delay,
            keys_if_undelivered,
            backoff_schedule,
        };
        if opts.is_empty() {
            None
        } else {
            Some(opts)
        }
    }

    /// True if no field is set
    pub fn is_empty(&self) -> bool {
        self.delay.is_none() && self.keys_if_undelivered.is_none() && self.backoff_schedule.is_none()
    }
}
