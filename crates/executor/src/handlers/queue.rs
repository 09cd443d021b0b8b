//! Queue handler.

use std::sync::Arc;

use kvmcp_core::{EnqueueOptions, Key, Value};
use kvmcp_engine::KvEngine;
use tracing::debug;

use crate::{CommitResult, Output, Result};

/// Handle Enqueue command.
///
/// Only supplied options are forwarded; with none supplied the engine
/// receives no options at all.
pub(crate) async fn enqueue(
    engine: &Arc<dyn KvEngine>,
    value: String,
    delay: Option<u64>,
    keys_if_undelivered: Option<Vec<Key>>,
    backoff_schedule: Option<Vec<u64>>,
) -> Result<Output> {
    let value: Value = serde_json::from_str(&value)?;
    let options = EnqueueOptions::from_parts(delay, keys_if_undelivered, backoff_schedule);
    let versionstamp = engine.enqueue(value, options).await?;
    debug!(%versionstamp, "message enqueued");
    Ok(Output::Committed(CommitResult {
        ok: true,
        versionstamp,
    }))
}
