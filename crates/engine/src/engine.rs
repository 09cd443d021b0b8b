//! The storage engine seam.

use async_trait::async_trait;
use kvmcp_core::{
    Consistency, EnqueueOptions, Entry, Key, ListOptions, MaybeEntry, RangeSelector, Value,
    Versionstamp,
};

use crate::Result;

/// Asynchronous key-value storage engine.
///
/// Implementations own ordering, consistency, TTL expiry and queue delivery.
/// Every call may suspend on I/O and may fail with an
/// [`EngineError`](crate::EngineError). A handle is opened once, shared
/// behind an `Arc` by every operation, and released with [`close`].
///
/// [`close`]: KvEngine::close
#[async_trait]
pub trait KvEngine: Send + Sync {
    /// Read one key. A missing key is `Ok` with an absent entry.
    async fn get(&self, key: &Key, consistency: Option<Consistency>) -> Result<MaybeEntry>;

    /// Read several keys; results align positionally with `keys`.
    async fn get_many(
        &self,
        keys: &[Key],
        consistency: Option<Consistency>,
    ) -> Result<Vec<MaybeEntry>>;

    /// Write a value, optionally expiring after `expire_in` milliseconds.
    async fn set(&self, key: &Key, value: Value, expire_in: Option<u64>) -> Result<Versionstamp>;

    /// Remove a key. Removing a missing key succeeds.
    async fn delete(&self, key: &Key) -> Result<()>;

    /// Open a lazy scan over the selected range.
    async fn list(
        &self,
        selector: RangeSelector,
        options: ListOptions,
    ) -> Result<Box<dyn EntryCursor>>;

    /// Queue a message for later delivery.
    async fn enqueue(&self, value: Value, options: Option<EnqueueOptions>)
        -> Result<Versionstamp>;

    /// Release the handle. Later calls fail with `EngineError::Closed`.
    async fn close(&self) -> Result<()>;
}

/// Lazy sequence of entries produced by [`KvEngine::list`].
///
/// Each call to [`next`](EntryCursor::next) may fetch a new page from the
/// engine; dropping the cursor stops the scan.
#[async_trait]
pub trait EntryCursor: Send {
    /// Next entry, or `None` once the scan is exhausted
    async fn next(&mut self) -> Result<Option<Entry>>;
}
