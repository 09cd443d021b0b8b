//! Point and batch key handlers: set, get, delete, getMany.

use std::sync::Arc;

use kvmcp_core::{Consistency, Key, Value};
use kvmcp_engine::KvEngine;
use tracing::debug;

use crate::{Output, Result};

// =============================================================================
// Individual Handlers
// =============================================================================

/// Handle Set command.
///
/// The value text is parsed before the engine is contacted, so a malformed
/// payload never reaches storage.
pub(crate) async fn set(
    engine: &Arc<dyn KvEngine>,
    key: Key,
    value: String,
    expire_in: Option<u64>,
) -> Result<Output> {
    let value: Value = serde_json::from_str(&value)?;
    let versionstamp = engine.set(&key, value, expire_in).await?;
    debug!(%key, %versionstamp, "set committed");
    Ok(Output::Unit)
}

/// Handle Get command.
pub(crate) async fn get(
    engine: &Arc<dyn KvEngine>,
    key: Key,
    consistency: Option<Consistency>,
) -> Result<Output> {
    let entry = engine.get(&key, consistency).await?;
    Ok(Output::Entry(entry))
}

/// Handle Delete command. Deleting an absent key succeeds.
pub(crate) async fn delete(engine: &Arc<dyn KvEngine>, key: Key) -> Result<Output> {
    engine.delete(&key).await?;
    Ok(Output::Unit)
}

/// Handle GetMany command. Results are positional with the request.
pub(crate) async fn get_many(
    engine: &Arc<dyn KvEngine>,
    keys: Vec<Key>,
    consistency: Option<Consistency>,
) -> Result<Output> {
    let entries = engine.get_many(&keys, consistency).await?;
    Ok(Output::Entries(entries))
}
