//! Bounded materialization of engine scans.
//!
//! An engine cursor may be unbounded and each pull may be a remote page
//! fetch, so a listing never materializes more than its cap and never pulls
//! past it.

use kvmcp_core::Entry;
use kvmcp_engine::{EngineError, EntryCursor};

/// Cap applied when a listing supplies no `limit`
pub const DEFAULT_LIST_LIMIT: usize = 100;

/// Effective cap for a listing
pub fn max_iterations(limit: Option<usize>) -> usize {
    limit.unwrap_or(DEFAULT_LIST_LIMIT)
}

/// Pull at most `max` entries from `cursor`, preserving source order.
///
/// Stops as soon as `max` entries are held or the cursor is exhausted; the
/// cursor is never polled again after the cap is reached.
pub async fn collect_bounded(
    cursor: &mut dyn EntryCursor,
    max: usize,
) -> Result<Vec<Entry>, EngineError> {
    let mut entries = Vec::with_capacity(max.min(DEFAULT_LIST_LIMIT));
    while entries.len() < max {
        match cursor.next().await? {
            Some(entry) => entries.push(entry),
            None => break,
        }
    }
    Ok(entries)
}
