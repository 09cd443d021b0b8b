//! Ordered in-memory engine
//!
//! [`MemoryEngine`] keeps entries in a `BTreeMap` ordered by [`Key`], so
//! range scans walk keys in the same order a remote engine would return
//! them. A single process is always up to date, so both consistency levels
//! read the latest committed state.
//!
//! # Durability
//!
//! - [`MemoryEngine::new`]: nothing persisted
//! - [`MemoryEngine::open_log`]: every mutation is appended to a log before
//!   it is applied; the log is replayed on open and compacted on close
//!
//! # Expiry
//!
//! Entries written with `expire_in` become invisible to reads and scans once
//! their deadline passes. Expired entries are swept from the map every
//! [`SWEEP_INTERVAL`] commits.

use std::collections::{BTreeMap, VecDeque};
use std::ops::Bound;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use kvmcp_core::{
    Consistency, EnqueueOptions, Entry, Key, ListOptions, MaybeEntry, RangeSelector, Value,
    Versionstamp,
};
use parking_lot::{Mutex, RwLock};
use tracing::{debug, trace};

use crate::limits;
use crate::queue::QueueMessage;
use crate::wal::{Wal, WalRecord};
use crate::{EngineError, EntryCursor, KvEngine, Result};

/// Commits between sweeps of expired entries
pub const SWEEP_INTERVAL: u64 = 64;

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[derive(Debug, Clone)]
struct StoredValue {
    value: Value,
    versionstamp: Versionstamp,
    expires_at: Option<i64>,
}

impl StoredValue {
    fn is_live(&self, now: i64) -> bool {
        self.expires_at.map_or(true, |deadline| deadline > now)
    }
}

struct Shared {
    entries: RwLock<BTreeMap<Key, StoredValue>>,
    queue: Mutex<Vec<QueueMessage>>,
    commit: AtomicU64,
    wal: Option<Mutex<Wal>>,
    closed: AtomicBool,
}

impl Shared {
    fn ensure_open(&self) -> Result<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(EngineError::Closed);
        }
        Ok(())
    }

    fn next_commit(&self) -> u64 {
        self.commit.fetch_add(1, Ordering::AcqRel) + 1
    }

    fn log(&self, record: &WalRecord) -> Result<()> {
        match &self.wal {
            Some(wal) => wal.lock().append(record),
            None => Ok(()),
        }
    }
}

/// Ordered in-memory key-value engine.
///
/// Cloning is cheap and clones share the same data.
#[derive(Clone)]
pub struct MemoryEngine {
    shared: Arc<Shared>,
}

impl Default for MemoryEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryEngine {
    /// Create an empty engine with no persistence.
    pub fn new() -> Self {
        Self::with_parts(BTreeMap::new(), Vec::new(), 0, None)
    }

    /// Open an engine backed by the mutation log at `path`, replaying any
    /// records already in it.
    pub fn open_log(path: impl AsRef<Path>) -> Result<Self> {
        let (wal, records) = Wal::open(path.as_ref())?;

        let mut entries = BTreeMap::new();
        let mut queue = Vec::new();
        let mut commit = 0;
        for record in records {
            commit = commit.max(record.commit());
            match record {
                WalRecord::Set {
                    key,
                    value,
                    commit,
                    expires_at,
                } => {
                    let stored = StoredValue {
                        value: serde_json::from_str(&value)?,
                        versionstamp: Versionstamp::from_commit(commit),
                        expires_at,
                    };
                    entries.insert(key, stored);
                }
                WalRecord::Delete { key, .. } => {
                    entries.remove(&key);
                }
                WalRecord::Enqueue {
                    value,
                    commit,
                    ready_at,
                    keys_if_undelivered,
                    backoff_schedule,
                } => queue.push(QueueMessage {
                    versionstamp: Versionstamp::from_commit(commit),
                    value: serde_json::from_str(&value)?,
                    ready_at,
                    keys_if_undelivered,
                    backoff_schedule,
                }),
                WalRecord::Checkpoint { .. } => {}
            }
        }
        debug!(
            path = %path.as_ref().display(),
            entries = entries.len(),
            queued = queue.len(),
            commit,
            "opened log-backed engine"
        );

        Ok(Self::with_parts(entries, queue, commit, Some(wal)))
    }

    fn with_parts(
        entries: BTreeMap<Key, StoredValue>,
        queue: Vec<QueueMessage>,
        commit: u64,
        wal: Option<Wal>,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                entries: RwLock::new(entries),
                queue: Mutex::new(queue),
                commit: AtomicU64::new(commit),
                wal: wal.map(Mutex::new),
                closed: AtomicBool::new(false),
            }),
        }
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        let now = now_millis();
        self.shared
            .entries
            .read()
            .values()
            .filter(|v| v.is_live(now))
            .count()
    }

    /// True if there are no live entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Messages accepted by `enqueue` and not yet delivered, oldest first
    pub fn pending_messages(&self) -> Vec<QueueMessage> {
        self.shared.queue.lock().clone()
    }

    fn sweep_expired(entries: &mut BTreeMap<Key, StoredValue>, now: i64) {
        let before = entries.len();
        entries.retain(|_, v| v.is_live(now));
        let swept = before - entries.len();
        if swept > 0 {
            trace!(swept, "swept expired entries");
        }
    }

    fn read(&self, key: &Key, now: i64) -> MaybeEntry {
        match self.shared.entries.read().get(key) {
            Some(stored) if stored.is_live(now) => MaybeEntry::from(Entry {
                key: key.clone(),
                value: stored.value.clone(),
                versionstamp: stored.versionstamp,
            }),
            _ => MaybeEntry::absent(key.clone()),
        }
    }
}

/// Records that rebuild the current state, ending with the commit
/// high-water mark.
fn live_records(
    entries: &BTreeMap<Key, StoredValue>,
    queue: &[QueueMessage],
    commit: u64,
) -> Vec<WalRecord> {
    let now = now_millis();
    let mut records = Vec::with_capacity(entries.len() + queue.len() + 1);
    for (key, stored) in entries.iter().filter(|(_, v)| v.is_live(now)) {
        records.push(WalRecord::Set {
            key: key.clone(),
            value: stored.value.to_string(),
            commit: stored.versionstamp.commit(),
            expires_at: stored.expires_at,
        });
    }
    for msg in queue {
        records.push(WalRecord::Enqueue {
            value: msg.value.to_string(),
            commit: msg.versionstamp.commit(),
            ready_at: msg.ready_at,
            keys_if_undelivered: msg.keys_if_undelivered.clone(),
            backoff_schedule: msg.backoff_schedule.clone(),
        });
    }
    records.sort_by_key(WalRecord::commit);
    records.push(WalRecord::Checkpoint { commit });
    records
}

#[async_trait]
impl KvEngine for MemoryEngine {
    async fn get(&self, key: &Key, consistency: Option<Consistency>) -> Result<MaybeEntry> {
        self.shared.ensure_open()?;
        limits::check_key_size(key)?;
        trace!(%key, ?consistency, "get");
        Ok(self.read(key, now_millis()))
    }

    async fn get_many(
        &self,
        keys: &[Key],
        consistency: Option<Consistency>,
    ) -> Result<Vec<MaybeEntry>> {
        self.shared.ensure_open()?;
        limits::check_get_many(keys)?;
        trace!(keys = keys.len(), ?consistency, "get_many");
        let now = now_millis();
        Ok(keys.iter().map(|k| self.read(k, now)).collect())
    }

    async fn set(&self, key: &Key, value: Value, expire_in: Option<u64>) -> Result<Versionstamp> {
        self.shared.ensure_open()?;
        limits::check_write_key(key)?;
        let encoded = limits::encode_value(&value)?;

        let now = now_millis();
        let expires_at =
            expire_in.map(|ms| now.saturating_add(i64::try_from(ms).unwrap_or(i64::MAX)));

        let mut entries = self.shared.entries.write();
        self.shared.ensure_open()?;
        let commit = self.shared.next_commit();
        self.shared.log(&WalRecord::Set {
            key: key.clone(),
            value: encoded,
            commit,
            expires_at,
        })?;
        let versionstamp = Versionstamp::from_commit(commit);
        entries.insert(
            key.clone(),
            StoredValue {
                value,
                versionstamp,
                expires_at,
            },
        );
        if commit % SWEEP_INTERVAL == 0 {
            Self::sweep_expired(&mut entries, now);
        }
        trace!(%key, %versionstamp, ?expires_at, "set");
        Ok(versionstamp)
    }

    async fn delete(&self, key: &Key) -> Result<()> {
        self.shared.ensure_open()?;
        limits::check_key_size(key)?;

        let mut entries = self.shared.entries.write();
        self.shared.ensure_open()?;
        let commit = self.shared.next_commit();
        self.shared.log(&WalRecord::Delete {
            key: key.clone(),
            commit,
        })?;
        entries.remove(key);
        trace!(%key, commit, "delete");
        Ok(())
    }

    async fn list(
        &self,
        selector: RangeSelector,
        options: ListOptions,
    ) -> Result<Box<dyn EntryCursor>> {
        self.shared.ensure_open()?;
        let batch_size = limits::check_list_options(&options)?;
        trace!(?selector, ?options, "list");
        Ok(Box::new(MemoryCursor {
            shared: Arc::clone(&self.shared),
            reverse: options.is_reverse(),
            remaining: options.limit,
            selector,
            batch_size,
            resume: None,
            buffer: VecDeque::new(),
            exhausted: false,
        }))
    }

    async fn enqueue(
        &self,
        value: Value,
        options: Option<EnqueueOptions>,
    ) -> Result<Versionstamp> {
        self.shared.ensure_open()?;
        if let Some(opts) = &options {
            limits::check_enqueue_options(opts)?;
        }
        let encoded = limits::encode_value(&value)?;

        let mut queue = self.shared.queue.lock();
        self.shared.ensure_open()?;
        let commit = self.shared.next_commit();
        let versionstamp = Versionstamp::from_commit(commit);
        let message = QueueMessage::new(versionstamp, value, options, now_millis());
        self.shared.log(&WalRecord::Enqueue {
            value: encoded,
            commit,
            ready_at: message.ready_at,
            keys_if_undelivered: message.keys_if_undelivered.clone(),
            backoff_schedule: message.backoff_schedule.clone(),
        })?;
        queue.push(message);
        trace!(%versionstamp, "enqueue");
        Ok(versionstamp)
    }

    async fn close(&self) -> Result<()> {
        if self.shared.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        if let Some(wal) = &self.shared.wal {
            // Mutators lock their data before the log; so does compaction.
            // A mutator waiting on these locks sees `closed` and backs out.
            let entries = self.shared.entries.write();
            let queue = self.shared.queue.lock();
            let mut wal = wal.lock();
            let commit = self.shared.commit.load(Ordering::Acquire);
            wal.compact(&live_records(&entries, &queue, commit))?;
            wal.sync()?;
        }
        debug!("engine closed");
        Ok(())
    }
}

/// Cursor over a [`MemoryEngine`] range.
///
/// Entries are fetched `batch_size` at a time. Each page takes the read
/// lock afresh and resumes strictly after the last key returned, so writers
/// are never blocked for the length of a scan.
struct MemoryCursor {
    shared: Arc<Shared>,
    selector: RangeSelector,
    reverse: bool,
    batch_size: usize,
    remaining: Option<usize>,
    resume: Option<Key>,
    buffer: VecDeque<Entry>,
    exhausted: bool,
}

impl MemoryCursor {
    fn fetch_page(&mut self) -> Result<()> {
        self.shared.ensure_open()?;
        let want = match self.remaining {
            Some(remaining) => remaining.min(self.batch_size),
            None => self.batch_size,
        };
        let now = now_millis();
        let entries = self.shared.entries.read();

        let to_entry = |(key, stored): (&Key, &StoredValue)| Entry {
            key: key.clone(),
            value: stored.value.clone(),
            versionstamp: stored.versionstamp,
        };

        let page: Vec<Entry> = if self.reverse {
            let upper = match &self.resume {
                Some(last) => Bound::Excluded(last.clone()),
                None => self.selector.upper_bound(),
            };
            entries
                .range((Bound::Unbounded, upper))
                .rev()
                .take_while(|(key, _)| self.selector.above_lower(key))
                .filter(|(_, stored)| stored.is_live(now))
                .take(want)
                .map(to_entry)
                .collect()
        } else {
            let lower = match &self.resume {
                Some(last) => Bound::Excluded(last.clone()),
                None => self.selector.lower_bound().cloned(),
            };
            entries
                .range((lower, Bound::Unbounded))
                .take_while(|(key, _)| self.selector.below_upper(key))
                .filter(|(_, stored)| stored.is_live(now))
                .take(want)
                .map(to_entry)
                .collect()
        };
        drop(entries);

        trace!(fetched = page.len(), want, "fetched page");
        if page.len() < want {
            self.exhausted = true;
        }
        if let Some(last) = page.last() {
            self.resume = Some(last.key.clone());
        }
        self.buffer.extend(page);
        Ok(())
    }
}

#[async_trait]
impl EntryCursor for MemoryCursor {
    async fn next(&mut self) -> Result<Option<Entry>> {
        if self.remaining == Some(0) {
            return Ok(None);
        }
        if self.buffer.is_empty() && !self.exhausted {
            self.fetch_page()?;
        }
        let entry = self.buffer.pop_front();
        if entry.is_some() {
            if let Some(remaining) = self.remaining.as_mut() {
                *remaining -= 1;
            }
        }
        Ok(entry)
    }
}
