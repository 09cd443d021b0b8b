//! Range selectors for listing queries
//!
//! A listing request carries three optional bounds (`prefix`, `start`,
//! `end`). [`build_selector`] folds them into exactly one [`RangeSelector`]
//! variant or rejects the combination. Precedence, first match wins:
//!
//! | prefix | start | end | result |
//! |--------|-------|-----|--------|
//! | -      | -     | -   | [`SelectorError::NoBound`] |
//! | -      | -     | yes | [`SelectorError::EndWithoutStart`] |
//! | any    | yes   | yes | [`RangeSelector::Range`] (prefix ignored) |
//! | yes    | yes   | -   | [`RangeSelector::PrefixFrom`] |
//! | yes    | -     | any | [`RangeSelector::Prefix`] (end ignored) |
//! | -      | yes   | -   | [`SelectorError::StartWithoutEnd`] |
//!
//! Callers that need prefix-scoped pagination with an upper bound must use
//! `{prefix, start}` and stop client-side, or pass `{start, end}` directly.

use std::ops::Bound;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::Key;

/// Rejected combination of range bounds
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    /// None of prefix/start/end was supplied
    #[error("no bound supplied")]
    NoBound,

    /// `end` was supplied without `start` or `prefix`
    #[error("end requires start or prefix")]
    EndWithoutStart,

    /// `start` was supplied alone
    #[error("start requires end or prefix")]
    StartWithoutEnd,
}

/// A contiguous key range driving a listing scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RangeSelector {
    /// Every key strictly extending `prefix`
    Prefix {
        /// Common leading parts
        prefix: Key,
    },

    /// Every key in `start..end`
    Range {
        /// Inclusive lower bound
        start: Key,
        /// Exclusive upper bound
        end: Key,
    },

    /// Every key strictly extending `prefix` that is `>= start`
    PrefixFrom {
        /// Common leading parts
        prefix: Key,
        /// Inclusive lower bound
        start: Key,
    },
}

/// Build a selector from optional request bounds.
///
/// ```
/// use kvmcp_core::{build_selector, Key, RangeSelector};
///
/// let sel = build_selector(
///     Some(Key::from(["a"])),
///     Some(Key::from(["a", "1"])),
///     Some(Key::from(["a", "9"])),
/// )
/// .unwrap();
/// assert!(matches!(sel, RangeSelector::Range { .. }));
/// ```
pub fn build_selector(
    prefix: Option<Key>,
    start: Option<Key>,
    end: Option<Key>,
) -> Result<RangeSelector, SelectorError> {
    match (prefix, start, end) {
        (None, None, None) => Err(SelectorError::NoBound),
        (None, None, Some(_)) => Err(SelectorError::EndWithoutStart),
        (_, Some(start), Some(end)) => Ok(RangeSelector::Range { start, end }),
        (Some(prefix), Some(start), None) => Ok(RangeSelector::PrefixFrom { prefix, start }),
        (Some(prefix), None, end) => {
            if let Some(end) = end {
                debug!(%prefix, %end, "end bound ignored for prefix-only selector");
            }
            Ok(RangeSelector::Prefix { prefix })
        }
        (None, Some(_), None) => Err(SelectorError::StartWithoutEnd),
    }
}

impl RangeSelector {
    /// Selector matching every key
    pub fn everything() -> Self {
        RangeSelector::Prefix {
            prefix: Key::empty(),
        }
    }

    /// Lower bound of the selected range
    pub fn lower_bound(&self) -> Bound<&Key> {
        match self {
            RangeSelector::Prefix { prefix } => Bound::Excluded(prefix),
            RangeSelector::Range { start, .. } => Bound::Included(start),
            RangeSelector::PrefixFrom { prefix, start } => {
                if start > prefix {
                    Bound::Included(start)
                } else {
                    Bound::Excluded(prefix)
                }
            }
        }
    }

    /// Upper bound of the selected range
    pub fn upper_bound(&self) -> Bound<Key> {
        match self {
            RangeSelector::Prefix { prefix } | RangeSelector::PrefixFrom { prefix, .. } => {
                match prefix.extensions_end() {
                    Some(end) => Bound::Excluded(end),
                    None => Bound::Unbounded,
                }
            }
            RangeSelector::Range { end, .. } => Bound::Excluded(end.clone()),
        }
    }

    /// True if `key` is above the lower bound
    pub fn above_lower(&self, key: &Key) -> bool {
        match self.lower_bound() {
            Bound::Included(lo) => key >= lo,
            Bound::Excluded(lo) => key > lo,
            Bound::Unbounded => true,
        }
    }

    /// True if `key` is below the upper bound
    pub fn below_upper(&self, key: &Key) -> bool {
        match self.upper_bound() {
            Bound::Included(hi) => key <= &hi,
            Bound::Excluded(hi) => key < &hi,
            Bound::Unbounded => true,
        }
    }

    /// True if `key` falls inside the selected range
    pub fn contains(&self, key: &Key) -> bool {
        self.above_lower(key) && self.below_upper(key)
    }
}
