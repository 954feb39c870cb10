//! Core identifier types for the terminology store
//!
//! This module defines the foundational identifiers:
//! - Nid: process-local stable integer identifier for an entity
//! - PublicId: globally unique public identifier
//! - EntityKind: discriminator for the four entity kinds

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Process-local stable integer identifier for an entity
///
/// Every entity (concept, pattern, semantic, stamp) is addressed by a
/// `Nid` within a running store. Nids are stable for the lifetime of the
/// backing store but carry no meaning across stores; cross-store identity
/// is the [`PublicId`].
///
/// The reserved value [`Nid::WILDCARD`] never names a real entity; field
/// locators use it to mean "any entity" in a component position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Nid(i32);

impl Nid {
    /// Reserved sentinel meaning "matches any id" in locator components.
    ///
    /// Never assigned to a real entity.
    pub const WILDCARD: Nid = Nid(i32::MAX);

    /// Create a Nid from a raw integer
    pub const fn new(raw: i32) -> Self {
        Nid(raw)
    }

    /// Get the raw integer value
    #[inline]
    pub const fn as_i32(&self) -> i32 {
        self.0
    }

    /// Check whether this is the wildcard sentinel
    #[inline]
    pub const fn is_wildcard(&self) -> bool {
        self.0 == i32::MAX
    }
}

impl fmt::Display for Nid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_wildcard() {
            write!(f, "*")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Globally unique public identifier for an entity
///
/// A PublicId is a wrapper around a UUID v4. Nids are process-local;
/// the PublicId is what two stores agree on when exchanging changesets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PublicId(Uuid);

impl PublicId {
    /// Create a new random PublicId using UUID v4
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a PublicId from raw bytes
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }

    /// Parse a PublicId from a string representation
    ///
    /// Accepts standard UUID format (with or without hyphens).
    /// Returns None if the string is not a valid UUID.
    pub fn from_string(s: &str) -> Option<Self> {
        Uuid::parse_str(s).ok().map(Self)
    }

    /// Get the raw bytes of this PublicId
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

impl Default for PublicId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PublicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Discriminator for the four entity kinds
///
/// The store is polymorphic over exactly four kinds. The set is closed:
/// every dispatch over `EntityKind` must be an exhaustive match so that a
/// new kind is a compile error at every switch point, not a runtime
/// surprise.
///
/// The byte values are part of the record format and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[repr(u8)]
pub enum EntityKind {
    /// A concept: a unit of meaning, identified but otherwise unstructured
    Concept = 0x01,
    /// A pattern: the ordered field schema that semantics conform to
    Pattern = 0x02,
    /// A semantic: a statement about a component, shaped by a pattern
    Semantic = 0x03,
    /// A stamp: provenance (status, time, author, module, path)
    Stamp = 0x04,
}

impl EntityKind {
    /// Convert to byte representation
    pub fn as_byte(&self) -> u8 {
        *self as u8
    }

    /// Try to create from byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x01 => Some(EntityKind::Concept),
            0x02 => Some(EntityKind::Pattern),
            0x03 => Some(EntityKind::Semantic),
            0x04 => Some(EntityKind::Stamp),
            _ => None,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Concept => "concept",
            EntityKind::Pattern => "pattern",
            EntityKind::Semantic => "semantic",
            EntityKind::Stamp => "stamp",
        };
        write!(f, "{}", name)
    }
}
