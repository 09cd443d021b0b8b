//! Range listing handler.

use std::sync::Arc;

use kvmcp_core::{build_selector, Consistency, Key, ListOptions};
use kvmcp_engine::KvEngine;
use tracing::debug;

use crate::bounded::{collect_bounded, max_iterations};
use crate::{Output, Result};

/// Range and option fields of a List command.
#[derive(Debug, Default)]
pub(crate) struct ListRequest {
    pub prefix: Option<Key>,
    pub start: Option<Key>,
    pub end: Option<Key>,
    pub limit: Option<usize>,
    pub consistency: Option<Consistency>,
    pub batch_size: Option<usize>,
    pub reverse: Option<bool>,
}

/// Handle List command.
///
/// The selector is built before the engine is contacted. Supplied options
/// are forwarded as-is; the materialized result is additionally capped at
/// `limit`, or the default cap when no limit was given.
pub(crate) async fn list(engine: &Arc<dyn KvEngine>, req: ListRequest) -> Result<Output> {
    let selector = build_selector(req.prefix, req.start, req.end)?;
    let cap = max_iterations(req.limit);
    let options = ListOptions {
        limit: req.limit,
        consistency: req.consistency,
        batch_size: req.batch_size,
        reverse: req.reverse,
    };

    let mut cursor = engine.list(selector, options).await?;
    let entries = collect_bounded(cursor.as_mut(), cap).await?;
    debug!(count = entries.len(), cap, "list collected");
    Ok(Output::Listed(entries))
}
