//! Operation results and their rendering into envelopes.

use kvmcp_core::{Entry, MaybeEntry, Versionstamp};
use serde::{Deserialize, Serialize};

use crate::reset::ResetOutcome;
use crate::{Error, ResponseEnvelope, Result};

/// Acknowledgement of a committed write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitResult {
    /// Always true for a commit that was accepted
    pub ok: bool,
    /// Commit that accepted the write
    pub versionstamp: Versionstamp,
}

/// Successful result of a [`Command`](crate::Command).
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    /// No payload (set, delete)
    Unit,
    /// Point read (get)
    Entry(MaybeEntry),
    /// Positional batch read (getMany)
    Entries(Vec<MaybeEntry>),
    /// Bounded scan (list)
    Listed(Vec<Entry>),
    /// Queued message (enqueue)
    Committed(CommitResult),
    /// Bulk reset (reset)
    Reset(ResetOutcome),
}

impl Output {
    /// Render into a success envelope; JSON payloads are pretty-printed.
    pub fn into_envelope(self) -> Result<ResponseEnvelope> {
        let text = match self {
            Output::Unit => return Ok(ResponseEnvelope::empty()),
            Output::Reset(outcome) => return Ok(ResponseEnvelope::text(outcome.to_string())),
            Output::Entry(entry) => serde_json::to_string_pretty(&entry),
            Output::Entries(entries) => serde_json::to_string_pretty(&entries),
            Output::Listed(entries) => serde_json::to_string_pretty(&entries),
            Output::Committed(commit) => serde_json::to_string_pretty(&commit),
        };
        text.map(ResponseEnvelope::text)
            .map_err(|e| Error::Encode(e.to_string()))
    }
}
