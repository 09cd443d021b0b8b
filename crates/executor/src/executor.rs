//! The command executor.

use std::sync::Arc;

use kvmcp_engine::KvEngine;
use tracing::{debug, warn};

use crate::handlers::{kv, list, queue};
use crate::reset::reset_all;
use crate::{Command, Output, ResponseEnvelope, Result};

/// Dispatches commands to the storage engine.
///
/// The executor is stateless apart from its engine handle and is cheap to
/// clone; concurrent calls share the engine.
#[derive(Clone)]
pub struct Executor {
    engine: Arc<dyn KvEngine>,
}

impl Executor {
    /// Create an executor over an open engine
    pub fn new(engine: Arc<dyn KvEngine>) -> Self {
        Self { engine }
    }

    /// The engine this executor dispatches to
    pub fn engine(&self) -> &Arc<dyn KvEngine> {
        &self.engine
    }

    /// Execute a command and return its typed output.
    pub async fn execute(&self, cmd: Command) -> Result<Output> {
        match cmd {
            Command::Set {
                key,
                value,
                expire_in,
            } => kv::set(&self.engine, key, value, expire_in).await,
            Command::Get { key, consistency } => kv::get(&self.engine, key, consistency).await,
            Command::Delete { key } => kv::delete(&self.engine, key).await,
            Command::GetMany { keys, consistency } => {
                kv::get_many(&self.engine, keys, consistency).await
            }
            Command::List {
                prefix,
                start,
                end,
                limit,
                consistency,
                batch_size,
                reverse,
            } => {
                let req = list::ListRequest {
                    prefix,
                    start,
                    end,
                    limit,
                    consistency,
                    batch_size,
                    reverse,
                };
                list::list(&self.engine, req).await
            }
            Command::Enqueue {
                value,
                delay,
                keys_if_undelivered,
                backoff_schedule,
            } => {
                queue::enqueue(&self.engine, value, delay, keys_if_undelivered, backoff_schedule)
                    .await
            }
            Command::Reset { confirmation } => reset_all(&self.engine, &confirmation)
                .await
                .map(Output::Reset),
        }
    }

    /// Execute a command and wrap the outcome in a response envelope.
    ///
    /// This never fails: any error becomes an envelope with `isError` set
    /// and the text `"<context>: <message>"`.
    pub async fn call(&self, cmd: Command) -> ResponseEnvelope {
        let name = cmd.name();
        let context = cmd.failure_context();
        match self.execute(cmd).await.and_then(Output::into_envelope) {
            Ok(envelope) => {
                debug!(op = name, "operation succeeded");
                envelope
            }
            Err(e) => {
                warn!(op = name, kind = %e.kind(), error = %e, "operation failed");
                ResponseEnvelope::error(format!("{}: {}", context, e))
            }
        }
    }

    /// Close the underlying engine
    pub async fn close(&self) -> Result<()> {
        self.engine.close().await?;
        Ok(())
    }
}

impl std::fmt::Debug for Executor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Executor").finish_non_exhaustive()
    }
}
