//! Result wrapper for "currently visible version" resolution
//!
//! Resolving an entity under a view yields zero-or-one primary version
//! plus zero-or-more *contradictions*: versions that are equally current
//! under the view but cannot be totally ordered against the primary
//! (typically concurrent edits on different unmerged paths).

use serde::{Deserialize, Serialize};

/// Zero-or-one primary value plus any contradicting peers
///
/// ## Invariant
///
/// `contradictions` is non-empty only when two or more versions are
/// simultaneously maximal under the view; a lone latest version has an
/// empty contradiction list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Latest<V> {
    value: Option<V>,
    contradictions: Vec<V>,
}

impl<V> Latest<V> {
    /// An empty resolution: nothing visible
    pub fn absent() -> Self {
        Latest {
            value: None,
            contradictions: Vec::new(),
        }
    }

    /// A single uncontradicted value
    pub fn of(value: V) -> Self {
        Latest {
            value: Some(value),
            contradictions: Vec::new(),
        }
    }

    /// A primary value with contradicting peers
    pub fn with_contradictions(value: V, contradictions: Vec<V>) -> Self {
        Latest {
            value: Some(value),
            contradictions,
        }
    }

    /// Whether a primary value is present
    pub fn is_present(&self) -> bool {
        self.value.is_some()
    }

    /// Whether the resolution is contradicted
    pub fn is_contradicted(&self) -> bool {
        !self.contradictions.is_empty()
    }

    /// Borrow the primary value
    pub fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }

    /// Borrow the contradicting peers
    pub fn contradictions(&self) -> &[V] {
        &self.contradictions
    }

    /// Consume into the primary value
    pub fn into_value(self) -> Option<V> {
        self.value
    }

    /// Iterate the primary value followed by every contradiction
    pub fn iter(&self) -> impl Iterator<Item = &V> {
        self.value.iter().chain(self.contradictions.iter())
    }

    /// Total number of equally-current versions (primary + contradictions)
    pub fn len(&self) -> usize {
        self.value.iter().len() + self.contradictions.len()
    }

    /// Whether nothing at all resolved
    pub fn is_empty(&self) -> bool {
        self.value.is_none() && self.contradictions.is_empty()
    }

    /// Map every contained value to a new type
    pub fn map<U, F>(self, mut f: F) -> Latest<U>
    where
        F: FnMut(V) -> U,
    {
        Latest {
            value: self.value.map(&mut f),
            contradictions: self.contradictions.into_iter().map(f).collect(),
        }
    }
}

impl<V> Default for Latest<V> {
    fn default() -> Self {
        Latest::absent()
    }
}
