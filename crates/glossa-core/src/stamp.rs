//! Provenance stamps
//!
//! A stamp records who authored a version, when, with what status, in
//! which module, and on which authoring path. Stamps are first-class
//! entities: they have nids of their own and change only by replacement
//! (a new stamp version), never in place.

use crate::timestamp::Timestamp;
use crate::types::Nid;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status carried by a stamp
///
/// The byte values are part of the record format and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Status {
    /// Component is current and in use
    Active = 0x01,
    /// Component is retired but retained for history
    Inactive = 0x02,
    /// Component was withdrawn as erroneous
    Withdrawn = 0x03,
    /// Edit was canceled before commit
    Canceled = 0x04,
}

impl Status {
    /// Convert to byte representation
    pub fn as_byte(&self) -> u8 {
        *self as u8
    }

    /// Try to create from byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x01 => Some(Status::Active),
            0x02 => Some(Status::Inactive),
            0x03 => Some(Status::Withdrawn),
            0x04 => Some(Status::Canceled),
            _ => None,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Status::Active => "active",
            Status::Inactive => "inactive",
            Status::Withdrawn => "withdrawn",
            Status::Canceled => "canceled",
        };
        write!(f, "{}", name)
    }
}

/// A resolved stamp: the provenance tuple plus the stamp entity's nid
///
/// This is a point-in-time view of a stamp entity's current version. A
/// stamp whose `time` is [`Timestamp::SENTINEL`] is uncommitted and must
/// have an active transaction (its absence is a lifecycle bug, surfaced
/// as [`crate::Error::TransactionAbsent`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Stamp {
    /// Nid of the stamp entity itself
    pub nid: Nid,
    /// Lifecycle status the stamped version asserts
    pub status: Status,
    /// Commit time, or the uncommitted sentinel
    pub time: Timestamp,
    /// Author concept nid
    pub author: Nid,
    /// Module concept nid
    pub module: Nid,
    /// Authoring path concept nid
    pub path: Nid,
}

impl Stamp {
    /// Create a stamp view
    pub fn new(
        nid: Nid,
        status: Status,
        time: Timestamp,
        author: Nid,
        module: Nid,
        path: Nid,
    ) -> Self {
        Stamp {
            nid,
            status,
            time,
            author,
            module,
            path,
        }
    }

    /// Check whether this stamp is pending transaction commit
    #[inline]
    pub fn is_uncommitted(&self) -> bool {
        self.time.is_uncommitted()
    }
}

impl fmt::Display for Stamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "stamp {} [{} {} author={} module={} path={}]",
            self.nid, self.status, self.time, self.author, self.module, self.path
        )
    }
}
