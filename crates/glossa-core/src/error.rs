//! Error types for the terminology store
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait
//! implementations.
//!
//! Every variant represents a programmer or data-contract violation, not
//! a transient condition: nothing here is retried internally, and every
//! error propagates synchronously to the caller.

use crate::types::{EntityKind, Nid};
use thiserror::Error;

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the terminology store
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// Call made off the designated apply context
    #[error("wrong context: apply context is owned by {expected}, called from {actual}")]
    WrongContext {
        /// Thread that owns the apply context
        expected: String,
        /// Thread the call arrived on
        actual: String,
    },

    /// No entity with this nid exists in the backing store
    #[error("entity not found: {0}")]
    EntityNotFound(Nid),

    /// The entity exists but has no version under this stamp
    #[error("version not found: entity {entity} has no version for stamp {stamp}")]
    VersionNotFound {
        /// Owning entity nid
        entity: Nid,
        /// Stamp nid that was requested
        stamp: Nid,
    },

    /// A stamp lookup resolved to a non-stamp entity
    #[error("entity {0} is not a stamp")]
    NotAStamp(Nid),

    /// An operation addressed an entity of the wrong kind
    #[error("kind mismatch: expected {expected}, got {actual}")]
    KindMismatch {
        /// Kind the operation requires
        expected: EntityKind,
        /// Kind actually found
        actual: EntityKind,
    },

    /// The view surfaces no latest version for this entity
    ///
    /// A data-consistency problem upstream: the entity exists but no
    /// version is visible under the view. Never silently defaulted.
    #[error("no latest version for entity {0} under this view")]
    NoLatestVersion(Nid),

    /// A locator contains a wildcard where resolution needs a concrete id
    #[error("unresolvable locator: {0}")]
    UnresolvableLocator(String),

    /// A locator names a different target than the operation is bound to
    #[error("locator mismatch: bound to {expected}, locator names {actual}")]
    LocatorMismatch {
        /// Target the operation is bound to
        expected: Nid,
        /// Target the locator names
        actual: Nid,
    },

    /// A list-item locator's index is outside the addressed list
    #[error("field index {index} out of range (list has {len} entries)")]
    FieldIndexOutOfRange {
        /// Index the locator carried
        index: i32,
        /// Length of the addressed list
        len: usize,
    },

    /// A locator-addressed write names an unwritable target or carries
    /// a value of the wrong type for the field
    #[error("invalid field write: {0}")]
    InvalidFieldWrite(String),

    /// Locator decoding met a tag naming no known variant
    #[error("unknown locator tag: {0:?}")]
    UnknownLocatorTag(String),

    /// Locator decoding ran out of bytes mid-record
    #[error("truncated locator: needed {needed} more bytes, {remaining} remaining")]
    TruncatedLocator {
        /// Bytes the decoder still needed
        needed: usize,
        /// Bytes left in the buffer
        remaining: usize,
    },

    /// A version believed uncommitted has no active transaction
    ///
    /// Indicates a lifecycle bug, not a recoverable state.
    #[error("no active transaction for uncommitted version (entity {entity}, stamp {stamp})")]
    TransactionAbsent {
        /// Owning entity nid
        entity: Nid,
        /// Uncommitted stamp nid
        stamp: Nid,
    },

    /// Operation on a transaction that already committed or was canceled
    #[error("transaction is no longer active")]
    TransactionInactive,

    /// Attaching a transaction over one that is still active
    #[error("an active transaction is already attached")]
    TransactionActive,

    /// Backing store failure, propagated untouched
    #[error("store error: {0}")]
    Store(String),

    /// Record serialization/deserialization error
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<bincode::Error> for Error {
    fn from(e: bincode::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
