//! Canonical entity identity registry
//!
//! The registry guarantees one shared [`Entity`] instance per nid for as
//! long as any reference is held. Instances are materialized from the
//! backing store on first access and refreshed with newly observed
//! versions on every access (ingest-on-read), so merges are visible to
//! every holder — there is no stale copy to go looking for.
//!
//! ## Confinement
//!
//! `get`, `put_version`, and `put_entity` must be called on the apply
//! context; calling them from elsewhere is [`Error::WrongContext`], not
//! a retryable condition. The cache itself is race-safe (atomic
//! get-or-create) because hand-off paths may probe it before the apply
//! context claims the result.
//!
//! ## Eviction
//!
//! The cache holds weak references: an entity nobody references is
//! reclaimable, and a later `get` rebuilds an instance with identical
//! logical state from the store. Eviction is purely a memory
//! optimization and never affects read correctness.

use crate::context::ApplyContext;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use glossa_core::{
    ChangeBus, Entity, EntityKind, EntityRecord, EntitySource, EntityStore, EntityVersion,
    EntityWriter, Error, Nid, Result, Stamp, StampSource, VersionData,
};
use std::sync::{Arc, Weak};
use tracing::{debug, trace, warn};

/// One cache slot: the canonical instance and its ingest watermark
struct Slot {
    entity: Weak<Entity>,
    /// Store generation at the last ingest of this entity
    ingested_at: u64,
}

/// Canonical, weak-valued entity cache over a backing store
///
/// Constructed once per session and passed by reference to every
/// component that resolves entities; there is no global instance.
pub struct EntityRegistry {
    store: Arc<dyn EntityStore>,
    bus: Arc<dyn ChangeBus>,
    context: ApplyContext,
    cache: DashMap<Nid, Slot>,
}

impl EntityRegistry {
    /// Create a registry and subscribe it to the change bus
    ///
    /// The registry re-ingests an entity whenever the bus announces a
    /// version update for its nid.
    pub fn new(
        store: Arc<dyn EntityStore>,
        bus: Arc<dyn ChangeBus>,
        context: ApplyContext,
    ) -> Arc<Self> {
        let registry = Arc::new(EntityRegistry {
            store,
            bus,
            context,
            cache: DashMap::new(),
        });
        let weak = Arc::downgrade(&registry);
        registry.bus.subscribe(Box::new(move |nid| {
            if let Some(registry) = weak.upgrade() {
                registry.reingest(nid);
            }
        }));
        registry
    }

    /// The apply context this registry is confined to
    pub fn context(&self) -> &ApplyContext {
        &self.context
    }

    /// Canonical instance for a nid
    ///
    /// Creates the instance from the backing store on first access and
    /// merges newly observed versions on every access. While at least
    /// one prior reference is held, repeated calls return the identical
    /// instance (pointer equality).
    ///
    /// # Errors
    ///
    /// `WrongContext` off the apply context; `EntityNotFound` if the
    /// store has never seen the nid.
    pub fn get(&self, nid: Nid) -> Result<Arc<Entity>> {
        self.context.ensure()?;
        let generation = self.store.generation();

        // Atomic get-or-create; merges run after the shard guard drops
        // because entity change callbacks may re-enter the registry.
        let (entity, needs_ingest) = match self.cache.entry(nid) {
            Entry::Occupied(mut occupied) => match occupied.get().entity.upgrade() {
                Some(entity) => {
                    let stale = occupied.get().ingested_at != generation;
                    if stale {
                        occupied.get_mut().ingested_at = generation;
                    }
                    (entity, stale)
                }
                None => {
                    // Reclaimed; rebuild with identical logical state.
                    let entity = self.load(nid)?;
                    occupied.insert(Slot {
                        entity: Arc::downgrade(&entity),
                        ingested_at: generation,
                    });
                    (entity, false)
                }
            },
            Entry::Vacant(vacant) => {
                let entity = self.load(nid)?;
                vacant.insert(Slot {
                    entity: Arc::downgrade(&entity),
                    ingested_at: generation,
                });
                (entity, false)
            }
        };

        if needs_ingest {
            if let Some(record) = self.store.get(nid)? {
                if entity.merge_record(&record) {
                    trace!(nid = nid.as_i32(), "ingested new versions on read");
                }
            }
        }
        Ok(entity)
    }

    /// Seed or replace a whole entity record
    ///
    /// Writes through to the store and announces the change; any cached
    /// canonical instance absorbs the new versions via re-ingestion.
    pub fn put_entity(&self, record: EntityRecord) -> Result<()> {
        self.context.ensure()?;
        let nid = record.nid;
        debug!(nid = nid.as_i32(), kind = %record.kind, "writing entity record");
        self.store.put(record)?;
        self.bus.publish(nid);
        Ok(())
    }

    fn load(&self, nid: Nid) -> Result<Arc<Entity>> {
        let record = self.store.get(nid)?.ok_or(Error::EntityNotFound(nid))?;
        debug!(nid = nid.as_i32(), kind = %record.kind, "materializing canonical entity");
        Ok(Arc::new(Entity::from_record(&record)))
    }

    /// Bus-driven refresh of one cached entity
    ///
    /// Runs on the apply context (bus delivery is synchronous). Uncached
    /// or reclaimed entities need nothing; the next `get` rebuilds them.
    fn reingest(&self, nid: Nid) {
        let generation = self.store.generation();
        let entity = match self.cache.get_mut(&nid) {
            Some(mut slot) => match slot.entity.upgrade() {
                Some(entity) => {
                    slot.ingested_at = generation;
                    entity
                }
                None => return,
            },
            None => return,
        };
        match self.store.get(nid) {
            Ok(Some(record)) => {
                entity.merge_record(&record);
            }
            Ok(None) => {}
            Err(error) => {
                // A listener cannot propagate; the next get() surfaces
                // the store failure to the caller.
                warn!(nid = nid.as_i32(), %error, "re-ingest failed");
            }
        }
    }
}

impl EntityWriter for EntityRegistry {
    /// Ingest one version, replacing any prior version under its stamp
    ///
    /// Writes through the backing store first, then announces the change
    /// so the canonical instance (and any foreign subscribers) absorb
    /// it. The rebuild-then-write is a single logical step: a store
    /// failure leaves the prior record untouched.
    fn put_version(&self, version: EntityVersion) -> Result<()> {
        self.context.ensure()?;
        let nid = version.entity_nid;
        let mut record = self.store.get(nid)?.ok_or(Error::EntityNotFound(nid))?;
        debug!(
            nid = nid.as_i32(),
            stamp = version.stamp_nid.as_i32(),
            "writing version"
        );
        record.upsert_version(version);
        self.store.put(record)?;
        self.bus.publish(nid);
        Ok(())
    }
}

impl StampSource for EntityRegistry {
    fn stamp(&self, nid: Nid) -> Result<Stamp> {
        let entity = self.get(nid)?;
        if entity.kind() != EntityKind::Stamp {
            return Err(Error::NotAStamp(nid));
        }
        let version = entity.version(nid).ok_or(Error::VersionNotFound {
            entity: nid,
            stamp: nid,
        })?;
        match &version.data {
            VersionData::Stamp(data) => Ok(data.to_stamp(nid)),
            _ => Err(Error::NotAStamp(nid)),
        }
    }
}

impl EntitySource for EntityRegistry {
    fn entity(&self, nid: Nid) -> Result<Arc<Entity>> {
        self.get(nid)
    }
}

impl std::fmt::Debug for EntityRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityRegistry")
            .field("cached", &self.cache.len())
            .finish()
    }
}
