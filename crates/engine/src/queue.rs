//! Queued messages.

use kvmcp_core::{EnqueueOptions, Key, Value, Versionstamp};
use serde::{Deserialize, Serialize};

/// A message accepted by `enqueue`, waiting for delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueMessage {
    /// Commit that accepted the message
    pub versionstamp: Versionstamp,
    /// Message payload
    pub value: Value,
    /// Wall-clock time (ms since epoch) the message becomes deliverable
    pub ready_at: i64,
    /// Keys written with the payload if delivery ultimately fails
    pub keys_if_undelivered: Vec<Key>,
    /// Retry delays in milliseconds, `None` for the engine default
    pub backoff_schedule: Option<Vec<u64>>,
}

impl QueueMessage {
    pub(crate) fn new(
        versionstamp: Versionstamp,
        value: Value,
        options: Option<EnqueueOptions>,
        now: i64,
    ) -> Self {
        let options = options.unwrap_or_default();
        let delay = i64::try_from(options.delay.unwrap_or(0)).unwrap_or(i64::MAX);
        Self {
            versionstamp,
            value,
            ready_at: now.saturating_add(delay),
            keys_if_undelivered: options.keys_if_undelivered.unwrap_or_default(),
            backoff_schedule: options.backoff_schedule,
        }
    }

    /// True once the delay has elapsed
    pub fn is_ready(&self, now: i64) -> bool {
        self.ready_at <= now
    }
}
