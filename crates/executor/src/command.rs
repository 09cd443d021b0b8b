//! Commands accepted by the executor.

use kvmcp_core::{Consistency, Key};

/// One storage operation with already-validated arguments.
///
/// `value` arguments arrive as JSON text and are parsed inside the
/// operation's failure boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Write a JSON value under a key
    Set {
        /// Target key
        key: Key,
        /// JSON text of the value
        value: String,
        /// Time-to-live in milliseconds
        expire_in: Option<u64>,
    },

    /// Read one key
    Get {
        /// Key to read
        key: Key,
        /// Requested read freshness
        consistency: Option<Consistency>,
    },

    /// Remove one key
    Delete {
        /// Key to remove
        key: Key,
    },

    /// Read several keys at once
    GetMany {
        /// Keys to read, in result order
        keys: Vec<Key>,
        /// Requested read freshness
        consistency: Option<Consistency>,
    },

    /// Scan a key range
    List {
        /// Common leading parts
        prefix: Option<Key>,
        /// Inclusive lower bound
        start: Option<Key>,
        /// Exclusive upper bound
        end: Option<Key>,
        /// Maximum entries returned
        limit: Option<usize>,
        /// Requested read freshness
        consistency: Option<Consistency>,
        /// Entries fetched per engine page
        batch_size: Option<usize>,
        /// Descending key order
        reverse: Option<bool>,
    },

    /// Queue a message
    Enqueue {
        /// JSON text of the message
        value: String,
        /// Delivery delay in milliseconds
        delay: Option<u64>,
        /// Keys written if delivery ultimately fails
        keys_if_undelivered: Option<Vec<Key>>,
        /// Retry delays in milliseconds
        backoff_schedule: Option<Vec<u64>>,
    },

    /// Delete every key, if confirmed
    Reset {
        /// Must be exactly `"yes"` for anything to happen
        confirmation: String,
    },
}

impl Command {
    /// Operation name, as used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Command::Set { .. } => "set",
            Command::Get { .. } => "get",
            Command::Delete { .. } => "delete",
            Command::GetMany { .. } => "getMany",
            Command::List { .. } => "list",
            Command::Enqueue { .. } => "enqueue",
            Command::Reset { .. } => "reset",
        }
    }

    /// Leading text of a failure message, naming the operation and keys.
    ///
    /// ```
    /// use kvmcp_executor::{Command, Key};
    ///
    /// let cmd = Command::Delete { key: Key::from(["users", "alice"]) };
    /// assert_eq!(cmd.failure_context(), "Failed to delete key [users, alice]");
    /// ```
    pub fn failure_context(&self) -> String {
        match self {
            Command::Set { key, .. } => format!("Failed to set key [{}]", key),
            Command::Get { key, .. } => format!("Failed to get key [{}]", key),
            Command::Delete { key } => format!("Failed to delete key [{}]", key),
            Command::GetMany { keys, .. } => {
                let joined: Vec<String> = keys.iter().map(Key::to_string).collect();
                format!("Failed to get keys [{}]", joined.join("; "))
            }
            Command::List { .. } => "Failed to list keys".to_string(),
            Command::Enqueue { .. } => "Failed to enqueue value".to_string(),
            Command::Reset { .. } => "Failed to reset KV store".to_string(),
        }
    }
}
