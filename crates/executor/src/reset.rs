//! Confirmed bulk deletion of every key.
//!
//! The full key space is scanned once; each key's delete is spawned as soon
//! as the key is seen, so deletes overlap with the rest of the scan. The
//! count reported is the number of keys scanned, and it is only reported
//! once every spawned delete has settled.

use std::fmt;
use std::sync::Arc;

use kvmcp_core::{ListOptions, RangeSelector};
use kvmcp_engine::KvEngine;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::{Error, Result};

/// The only confirmation value that triggers a reset
pub const RESET_CONFIRMATION: &str = "yes";

/// What a reset request did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetOutcome {
    /// Confirmation was missing or wrong; nothing was touched
    Cancelled,
    /// Every scanned key was deleted
    Completed {
        /// Number of keys scanned
        deleted: usize,
    },
}

impl fmt::Display for ResetOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResetOutcome::Cancelled => {
                f.write_str("Reset cancelled. Confirmation not provided.")
            }
            ResetOutcome::Completed { deleted } => {
                write!(f, "Reset complete. Deleted {} keys.", deleted)
            }
        }
    }
}

/// Delete every key in the store if `confirmation` is exactly `"yes"`.
///
/// Any other confirmation returns [`ResetOutcome::Cancelled`] without
/// contacting the engine. A failed scan or delete fails the whole reset,
/// but only after all deletes already spawned have finished; keys deleted
/// before the failure stay deleted.
pub async fn reset_all(engine: &Arc<dyn KvEngine>, confirmation: &str) -> Result<ResetOutcome> {
    if confirmation != RESET_CONFIRMATION {
        debug!("reset not confirmed");
        return Ok(ResetOutcome::Cancelled);
    }

    let mut deletes = JoinSet::new();
    let mut scanned = 0usize;

    let scan = scan_and_spawn(engine, &mut deletes, &mut scanned).await;

    let mut first_error = scan.err();
    while let Some(joined) = deletes.join_next().await {
        let outcome = match joined {
            Ok(result) => result.map_err(Error::from),
            Err(e) => Err(Error::from(e)),
        };
        if let Err(e) = outcome {
            warn!(error = %e, "reset delete failed");
            first_error.get_or_insert(e);
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => {
            info!(deleted = scanned, "reset complete");
            Ok(ResetOutcome::Completed { deleted: scanned })
        }
    }
}

async fn scan_and_spawn(
    engine: &Arc<dyn KvEngine>,
    deletes: &mut JoinSet<kvmcp_engine::Result<()>>,
    scanned: &mut usize,
) -> Result<()> {
    let mut cursor = engine
        .list(RangeSelector::everything(), ListOptions::default())
        .await?;
    while let Some(entry) = cursor.next().await? {
        *scanned += 1;
        let engine = Arc::clone(engine);
        deletes.spawn(async move { engine.delete(&entry.key).await });
    }
    Ok(())
}
