//! Core data types
//!
//! - [`Key`]: ordered sequence of string parts, compared part by part
//! - [`Versionstamp`]: 10-byte commit id rendered as 20 hex digits
//! - [`Entry`]: a stored (key, value, versionstamp) triple
//! - [`MaybeEntry`]: a point-read result that may be absent
//! - [`Consistency`]: requested read freshness

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::Value;

/// Key of a stored entry.
///
/// Keys are compared lexicographically part by part, so a key always sorts
/// before every key that extends it:
///
/// ```
/// use kvmcp_core::Key;
///
/// let users = Key::from(["users"]);
/// let alice = Key::from(["users", "alice"]);
/// let zed = Key::from(["zed"]);
/// assert!(users < alice);
/// assert!(alice < zed);
/// assert!(alice.extends(&users));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Key(Vec<String>);

impl Key {
    /// Create a key from its parts
    pub fn new(parts: Vec<String>) -> Self {
        Key(parts)
    }

    /// The empty key (zero parts); as a prefix it selects every key
    pub fn empty() -> Self {
        Key(Vec::new())
    }

    /// Parts of this key in order
    pub fn parts(&self) -> &[String] {
        &self.0
    }

    /// Number of parts
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the key has no parts
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total size of the key parts in bytes
    pub fn byte_len(&self) -> usize {
        self.0.iter().map(String::len).sum()
    }

    /// True if `self` starts with every part of `prefix` and has at least
    /// one more part. A key never extends itself.
    pub fn extends(&self, prefix: &Key) -> bool {
        self.0.len() > prefix.0.len() && self.0.starts_with(&prefix.0)
    }

    /// Smallest key that sorts after every key extending `self`.
    ///
    /// Returns `None` for the empty key, whose extensions are unbounded.
    /// `["a", "b"]` maps to `["a", "b\0"]`: no string sorts between `"b"`
    /// and `"b\0"`, and `["a", "b", ..]` sorts before `["a", "b\0"]`.
    pub fn extensions_end(&self) -> Option<Key> {
        let (last, init) = self.0.split_last()?;
        let mut parts = init.to_vec();
        parts.push(format!("{last}\0"));
        Some(Key(parts))
    }

    /// Consume the key, returning its parts
    pub fn into_parts(self) -> Vec<String> {
        self.0
    }
}

impl From<Vec<String>> for Key {
    fn from(parts: Vec<String>) -> Self {
        Key(parts)
    }
}

impl<const N: usize> From<[&str; N]> for Key {
    fn from(parts: [&str; N]) -> Self {
        Key(parts.iter().map(|p| p.to_string()).collect())
    }
}

impl From<&[&str]> for Key {
    fn from(parts: &[&str]) -> Self {
        Key(parts.iter().map(|p| p.to_string()).collect())
    }
}

/// Keys display as their parts joined with `", "`, e.g. `users, alice`.
impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(", "))
    }
}

/// Commit identifier of a stored entry.
///
/// Versionstamps are 10 bytes: an 8-byte commit sequence followed by a
/// 2-byte batch index (always zero for single-operation commits). They are
/// rendered as 20 lowercase hex digits and compare in commit order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Versionstamp {
    commit: u64,
    index: u16,
}

impl Versionstamp {
    /// Versionstamp of the given commit sequence
    pub fn from_commit(commit: u64) -> Self {
        Self { commit, index: 0 }
    }

    /// Commit sequence
    pub fn commit(&self) -> u64 {
        self.commit
    }
}

impl fmt::Display for Versionstamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}{:04x}", self.commit, self.index)
    }
}

/// Error parsing a versionstamp from its hex form
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid versionstamp: {0:?}")]
pub struct ParseVersionstampError(String);

impl FromStr for Versionstamp {
    type Err = ParseVersionstampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 20 || !s.is_char_boundary(16) {
            return Err(ParseVersionstampError(s.to_string()));
        }
        let commit = u64::from_str_radix(&s[..16], 16)
            .map_err(|_| ParseVersionstampError(s.to_string()))?;
        let index = u16::from_str_radix(&s[16..], 16)
            .map_err(|_| ParseVersionstampError(s.to_string()))?;
        Ok(Self { commit, index })
    }
}

impl Serialize for Versionstamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Versionstamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A stored entry as returned by reads and listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Key the value is stored under
    pub key: Key,
    /// Stored JSON document
    pub value: Value,
    /// Commit that wrote this value
    pub versionstamp: Versionstamp,
}

/// Result of a point read.
///
/// An absent entry serializes with `null` value and `null` versionstamp.
/// A present entry whose document is JSON `null` still carries its
/// versionstamp, which keeps the two cases distinct on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaybeEntry {
    /// Key that was requested
    pub key: Key,
    /// Stored document, `None` when the key is absent
    pub value: Option<Value>,
    /// Commit that wrote the value, `None` when the key is absent
    pub versionstamp: Option<Versionstamp>,
}

impl MaybeEntry {
    /// Read result for a key with no live value
    pub fn absent(key: Key) -> Self {
        Self {
            key,
            value: None,
            versionstamp: None,
        }
    }

    /// True when the key was found
    pub fn is_present(&self) -> bool {
        self.versionstamp.is_some()
    }

    /// Convert into an [`Entry`] if present
    pub fn into_entry(self) -> Option<Entry> {
        let versionstamp = self.versionstamp?;
        Some(Entry {
            key: self.key,
            value: self.value.unwrap_or(Value::Null),
            versionstamp,
        })
    }
}

impl From<Entry> for MaybeEntry {
    fn from(entry: Entry) -> Self {
        Self {
            key: entry.key,
            value: Some(entry.value),
            versionstamp: Some(entry.versionstamp),
        }
    }
}

/// Read freshness requested from the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Consistency {
    /// Most recent committed state
    Strong,
    /// Possibly stale replica read
    Eventual,
}

impl fmt::Display for Consistency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Consistency::Strong => f.write_str("strong"),
            Consistency::Eventual => f.write_str("eventual"),
        }
    }
}
