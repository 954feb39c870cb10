//! Service traits at the edges of the core
//!
//! The core treats the backing entity store, the view calculator, the
//! transaction service, and the change bus as external collaborators
//! behind narrow traits. Swapping an implementation must not break the
//! registry, resolver, projector, or overlay.
//!
//! All calls are synchronous: nothing in the core suspends or blocks on
//! I/O, and no trait here retries internally.

use crate::entity::{Entity, EntityRecord, EntityVersion};
use crate::error::Result;
use crate::stamp::{Stamp, Status};
use crate::timestamp::Timestamp;
use crate::types::Nid;
use std::sync::Arc;

/// Backing entity store: the system of record
///
/// Synchronous key-value storage keyed by nid, returning the entity's
/// full known version set. Implementations must be safe to probe from
/// the hand-off path (Send + Sync) even though all mutation arrives from
/// the apply context.
pub trait EntityStore: Send + Sync {
    /// Write a record, replacing any prior record for its nid
    fn put(&self, record: EntityRecord) -> Result<()>;

    /// Fetch the full record for a nid
    ///
    /// Returns None if the store has never seen this nid.
    fn get(&self, nid: Nid) -> Result<Option<EntityRecord>>;

    /// Monotonic write generation
    ///
    /// Increments on every `put`. The registry uses it to skip redundant
    /// re-ingestion when nothing has been written since the last read.
    fn generation(&self) -> u64;
}

/// Resolves stamp nids to their current provenance tuple
pub trait StampSource {
    /// Resolve a stamp entity to its current [`Stamp`] view
    ///
    /// # Errors
    ///
    /// `EntityNotFound` if the nid is unknown, `NotAStamp` if it names a
    /// non-stamp entity, `VersionNotFound` if the stamp entity has no
    /// version yet.
    fn stamp(&self, nid: Nid) -> Result<Stamp>;
}

/// Hands out canonical entity instances
///
/// The read seam the resolver, projector, and field-read path depend on;
/// the identity registry is the production implementation.
pub trait EntitySource: StampSource {
    /// Canonical instance for a nid, created from the store on first use
    fn entity(&self, nid: Nid) -> Result<Arc<Entity>>;
}

/// Accepts version write-backs
///
/// The write seam the editable overlay depends on. Writing through must
/// make the version visible to every holder of the canonical entity.
pub trait EntityWriter {
    /// Ingest one version: persist it and merge it into the canonical
    /// entity, replacing any prior version under the same stamp
    fn put_version(&self, version: EntityVersion) -> Result<()>;
}

/// External view policy: which stamps are visible, and which are latest
///
/// Encapsulates path/module/time precedence. The core never implements
/// this policy; it only consumes the two stamp sets.
pub trait ViewCalculator {
    /// Stamp nids that are "latest" for this entity under the view
    ///
    /// More than one entry means the versions are concurrent and
    /// unordered — a contradiction.
    fn latest_stamps(&self, entity: &Entity) -> Result<Vec<Nid>>;

    /// All stamp nids visible for this entity under the view
    fn visible_stamps(&self, entity: &Entity) -> Result<Vec<Nid>>;
}

/// Callback registered with a [`ChangeBus`]
pub type BusCallback = Box<dyn Fn(Nid) + Send + Sync>;

/// Version-updated notification channel, keyed by nid
///
/// Delivery is synchronous and on the apply context; subscribers must
/// not assume reentrancy protection.
pub trait ChangeBus: Send + Sync {
    /// Announce that an entity's version set changed
    fn publish(&self, nid: Nid);

    /// Register a subscriber
    fn subscribe(&self, callback: BusCallback);
}

/// An open unit of work that mints provenance stamps
///
/// Obtained from a [`TransactionService`]. Stamps handed out before
/// commit carry the uncommitted sentinel time; `commit` rewrites every
/// one of them with a single real timestamp.
///
/// ## Caller contract
///
/// When several editable overlays share one transaction, every dirty
/// overlay must be saved *before* the transaction commits; the
/// transaction only commits stamps it has already minted, so unsaved
/// working copies are silently left behind.
pub trait Transaction: Send + Sync {
    /// Process-unique transaction id
    fn id(&self) -> u64;

    /// Whether the transaction is still open
    fn is_active(&self) -> bool;

    /// Mint (or reuse) an uncommitted stamp for this authorship
    ///
    /// One stamp per distinct (status, author, module, path) per
    /// transaction; repeated requests return the same stamp.
    fn stamp_for_entity(
        &self,
        status: Status,
        author: Nid,
        module: Nid,
        path: Nid,
        entity_nid: Nid,
    ) -> Result<Stamp>;

    /// Commit: assign one real timestamp to every minted stamp
    ///
    /// Returns the commit time. The transaction is inactive afterwards.
    fn commit(&self) -> Result<Timestamp>;

    /// Cancel: forget every minted stamp, synchronously, no partial effect
    fn cancel(&self) -> Result<()>;
}

/// Mints transactions and finds the active one for a stamp or version
pub trait TransactionService: Send + Sync {
    /// Open a new transaction
    fn begin(&self) -> Arc<dyn Transaction>;

    /// The active transaction that minted this stamp, if any
    fn transaction_for_stamp(&self, stamp_nid: Nid) -> Option<Arc<dyn Transaction>>;

    /// The active transaction behind this version's stamp, if any
    fn transaction_for_version(&self, version: &EntityVersion) -> Option<Arc<dyn Transaction>>;
}
