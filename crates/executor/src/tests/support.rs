//! Test engine that wraps [`MemoryEngine`] and injects failures.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use kvmcp_core::{
    Consistency, EnqueueOptions, Entry, Key, ListOptions, MaybeEntry, RangeSelector, Value,
    Versionstamp,
};
use kvmcp_engine::{EngineError, EntryCursor, KvEngine, MemoryEngine, Result};
use parking_lot::Mutex;
use serde_json::json;

use crate::Executor;

/// Which operation a fault applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Get,
    GetMany,
    Set,
    Delete,
    List,
    Enqueue,
}

/// How an injected failure is raised
#[derive(Debug, Clone)]
pub enum Fault {
    /// Structured rejection payload
    Reject(Value),
    /// Plain engine error
    Io(String),
}

impl Fault {
    fn raise(&self) -> EngineError {
        match self {
            Fault::Reject(payload) => EngineError::Rejected(payload.clone()),
            Fault::Io(msg) => {
                EngineError::Io(std::io::Error::new(std::io::ErrorKind::Other, msg.clone()))
            }
        }
    }
}

/// Memory engine with per-operation fault injection and call accounting.
#[derive(Default)]
pub struct FaultyEngine {
    inner: MemoryEngine,
    faults: Mutex<Vec<(Op, Fault)>>,
    poisoned_keys: Mutex<HashSet<Key>>,
    delete_delay: Mutex<Option<Duration>>,
    cursor_fault: Mutex<Option<(usize, Fault)>>,
    pub calls: Mutex<Vec<Op>>,
    pub last_list_options: Mutex<Option<ListOptions>>,
    pub last_enqueue_options: Mutex<Option<Option<EnqueueOptions>>>,
    pub cursor_pulls: Arc<AtomicUsize>,
    in_flight: AtomicUsize,
    pub peak_in_flight: AtomicUsize,
    pub deletes_finished: AtomicUsize,
}

impl FaultyEngine {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail(&self, op: Op, fault: Fault) {
        self.faults.lock().push((op, fault));
    }

    /// Fail deletes of this key only
    pub fn poison(&self, key: Key) {
        self.poisoned_keys.lock().insert(key);
    }

    /// Cursors yield `pulls` entries, then fail every later pull
    pub fn fail_cursor_after(&self, pulls: usize, fault: Fault) {
        *self.cursor_fault.lock() = Some((pulls, fault));
    }

    pub fn slow_deletes(&self, delay: Duration) {
        *self.delete_delay.lock() = Some(delay);
    }

    pub fn inner(&self) -> &MemoryEngine {
        &self.inner
    }

    pub fn count(&self, op: Op) -> usize {
        self.calls.lock().iter().filter(|c| **c == op).count()
    }

    fn enter(&self, op: Op) -> Result<()> {
        self.calls.lock().push(op);
        let faults = self.faults.lock();
        match faults.iter().find(|(o, _)| *o == op) {
            Some((_, fault)) => Err(fault.raise()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl KvEngine for FaultyEngine {
    async fn get(&self, key: &Key, consistency: Option<Consistency>) -> Result<MaybeEntry> {
        self.enter(Op::Get)?;
        self.inner.get(key, consistency).await
    }

    async fn get_many(
        &self,
        keys: &[Key],
        consistency: Option<Consistency>,
    ) -> Result<Vec<MaybeEntry>> {
        self.enter(Op::GetMany)?;
        self.inner.get_many(keys, consistency).await
    }

    async fn set(&self, key: &Key, value: Value, expire_in: Option<u64>) -> Result<Versionstamp> {
        self.enter(Op::Set)?;
        self.inner.set(key, value, expire_in).await
    }

    async fn delete(&self, key: &Key) -> Result<()> {
        self.enter(Op::Delete)?;
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        let delay = *self.delete_delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let poisoned = self.poisoned_keys.lock().contains(key);
        let result = if poisoned {
            Err(EngineError::Rejected(json!({"message": format!("cannot delete {}", key)})))
        } else {
            self.inner.delete(key).await
        };
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.deletes_finished.fetch_add(1, Ordering::SeqCst);
        result
    }

    async fn list(
        &self,
        selector: RangeSelector,
        options: ListOptions,
    ) -> Result<Box<dyn EntryCursor>> {
        self.enter(Op::List)?;
        *self.last_list_options.lock() = Some(options.clone());
        let inner = self.inner.list(selector, options).await?;
        Ok(Box::new(CountingCursor {
            inner,
            pulls: Arc::clone(&self.cursor_pulls),
            pulled: 0,
            fail_after: self.cursor_fault.lock().clone(),
        }))
    }

    async fn enqueue(&self, value: Value, options: Option<EnqueueOptions>) -> Result<Versionstamp> {
        self.enter(Op::Enqueue)?;
        *self.last_enqueue_options.lock() = Some(options.clone());
        self.inner.enqueue(value, options).await
    }

    async fn close(&self) -> Result<()> {
        self.inner.close().await
    }
}

struct CountingCursor {
    inner: Box<dyn EntryCursor>,
    pulls: Arc<AtomicUsize>,
    pulled: usize,
    fail_after: Option<(usize, Fault)>,
}

#[async_trait]
impl EntryCursor for CountingCursor {
    async fn next(&mut self) -> Result<Option<Entry>> {
        self.pulls.fetch_add(1, Ordering::SeqCst);
        if let Some((limit, fault)) = &self.fail_after {
            if self.pulled >= *limit {
                return Err(fault.raise());
            }
        }
        self.pulled += 1;
        self.inner.next().await
    }
}

/// Executor over a fresh faulty engine; the engine handle is returned for
/// configuring faults and inspecting calls.
pub fn faulty_executor() -> (Executor, Arc<FaultyEngine>) {
    let engine = FaultyEngine::new();
    let executor = Executor::new(engine.clone());
    (executor, engine)
}

/// Executor over a plain memory engine
pub fn memory_executor() -> Executor {
    Executor::new(Arc::new(MemoryEngine::new()))
}

pub fn key(parts: &[&str]) -> Key {
    Key::from(parts)
}
