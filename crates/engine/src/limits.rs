//! Engine limits and argument validation.

use kvmcp_core::{EnqueueOptions, Key, ListOptions, Value};

use crate::{EngineError, Result};

/// Maximum total size of a key's parts in bytes
pub const MAX_KEY_BYTES: usize = 2048;

/// Maximum serialized size of a value in bytes
pub const MAX_VALUE_BYTES: usize = 65_536;

/// Maximum number of keys in one `get_many`
pub const MAX_GET_MANY_KEYS: usize = 10;

/// Page size used when the caller supplies none
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Largest accepted page size
pub const MAX_BATCH_SIZE: usize = 1000;

/// Longest accepted enqueue delay (30 days) in milliseconds
pub const MAX_ENQUEUE_DELAY_MS: u64 = 30 * 24 * 60 * 60 * 1000;

/// Longest accepted backoff step (1 hour) in milliseconds
pub const MAX_BACKOFF_STEP_MS: u64 = 60 * 60 * 1000;

/// Maximum number of backoff steps
pub const MAX_BACKOFF_STEPS: usize = 5;

/// Validate a key that is about to be written.
pub fn check_write_key(key: &Key) -> Result<()> {
    if key.is_empty() {
        return Err(EngineError::InvalidKey("key cannot be empty".into()));
    }
    check_key_size(key)
}

/// Validate the size of a key used for reading.
pub fn check_key_size(key: &Key) -> Result<()> {
    let size = key.byte_len();
    if size > MAX_KEY_BYTES {
        return Err(EngineError::InvalidKey(format!(
            "key of {} bytes exceeds limit of {} bytes",
            size, MAX_KEY_BYTES
        )));
    }
    Ok(())
}

/// Serialize a value, enforcing the size limit.
pub fn encode_value(value: &Value) -> Result<String> {
    let encoded = serde_json::to_string(value)?;
    if encoded.len() > MAX_VALUE_BYTES {
        return Err(EngineError::ValueTooLarge {
            size: encoded.len(),
            limit: MAX_VALUE_BYTES,
        });
    }
    Ok(encoded)
}

/// Validate listing options; returns the effective page size.
pub fn check_list_options(options: &ListOptions) -> Result<usize> {
    if options.limit == Some(0) {
        return Err(EngineError::InvalidArgument("limit must be positive".into()));
    }
    match options.batch_size {
        None => Ok(DEFAULT_BATCH_SIZE),
        Some(n) if (1..=MAX_BATCH_SIZE).contains(&n) => Ok(n),
        Some(n) => Err(EngineError::InvalidArgument(format!(
            "batch size {} outside 1..={}",
            n, MAX_BATCH_SIZE
        ))),
    }
}

/// Validate the key count of a batched read.
pub fn check_get_many(keys: &[Key]) -> Result<()> {
    if keys.len() > MAX_GET_MANY_KEYS {
        return Err(EngineError::InvalidArgument(format!(
            "too many keys: {} (max {})",
            keys.len(),
            MAX_GET_MANY_KEYS
        )));
    }
    keys.iter().try_for_each(check_key_size)
}

/// Validate queue options.
pub fn check_enqueue_options(options: &EnqueueOptions) -> Result<()> {
    if let Some(delay) = options.delay {
        if delay > MAX_ENQUEUE_DELAY_MS {
            return Err(EngineError::InvalidArgument(format!(
                "delay {}ms exceeds maximum of {}ms",
                delay, MAX_ENQUEUE_DELAY_MS
            )));
        }
    }
    if let Some(schedule) = &options.backoff_schedule {
        if schedule.len() > MAX_BACKOFF_STEPS {
            return Err(EngineError::InvalidArgument(format!(
                "backoff schedule has {} steps (max {})",
                schedule.len(),
                MAX_BACKOFF_STEPS
            )));
        }
        if let Some(step) = schedule.iter().find(|s| **s > MAX_BACKOFF_STEP_MS) {
            return Err(EngineError::InvalidArgument(format!(
                "backoff step {}ms exceeds maximum of {}ms",
                step, MAX_BACKOFF_STEP_MS
            )));
        }
    }
    if let Some(keys) = &options.keys_if_undelivered {
        keys.iter().try_for_each(check_write_key)?;
    }
    Ok(())
}
