//! In-memory transaction service
//!
//! Transactions mint the uncommitted stamps that editable overlays save
//! under. One stamp exists per distinct authorship (status, author,
//! module, path) per transaction; `commit` assigns a single real
//! timestamp to every minted stamp, and `cancel` retires them as
//! canceled.
//!
//! ## Caller contract
//!
//! A transaction commits only stamps it has minted. When several
//! overlays share one transaction, each dirty overlay must `save()`
//! before the shared transaction commits — the service does not reach
//! back into overlay caches to flush unsaved working copies.

use dashmap::DashMap;
use glossa_core::{
    EntityKind, EntityRecord, EntityVersion, EntityWriter, Error, Nid, PublicId, Result, Stamp,
    StampVersionData, Status, Timestamp, Transaction, TransactionService, VersionData,
};
use glossa_registry::EntityRegistry;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI32, AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tracing::{debug, info};

/// Default first nid for service-minted stamp entities
///
/// High enough to stay clear of fixture- and store-assigned nids.
const DEFAULT_NID_BASE: i32 = 1 << 30;

/// Authorship key: one stamp per distinct tuple per transaction
type AuthorshipKey = (Status, Nid, Nid, Nid);

struct TransactionState {
    active: bool,
    stamps: HashMap<AuthorshipKey, Nid>,
}

/// One open unit of work
pub struct MemoryTransaction {
    id: u64,
    service: Weak<MemoryTransactionService>,
    state: Mutex<TransactionState>,
}

impl MemoryTransaction {
    fn service(&self) -> Result<Arc<MemoryTransactionService>> {
        self.service
            .upgrade()
            .ok_or_else(|| Error::Store("transaction service was dropped".to_string()))
    }
}

impl Transaction for MemoryTransaction {
    fn id(&self) -> u64 {
        self.id
    }

    fn is_active(&self) -> bool {
        self.state.lock().active
    }

    fn stamp_for_entity(
        &self,
        status: Status,
        author: Nid,
        module: Nid,
        path: Nid,
        entity_nid: Nid,
    ) -> Result<Stamp> {
        let service = self.service()?;
        let mut state = self.state.lock();
        if !state.active {
            return Err(Error::TransactionInactive);
        }

        let key = (status, author, module, path);
        if let Some(&stamp_nid) = state.stamps.get(&key) {
            return Ok(Stamp::new(
                stamp_nid,
                status,
                Timestamp::SENTINEL,
                author,
                module,
                path,
            ));
        }

        let stamp_nid = service.allocate_nid();
        let data = StampVersionData {
            status,
            time: Timestamp::SENTINEL,
            author,
            module,
            path,
        };
        let mut record = EntityRecord::new(stamp_nid, PublicId::new(), EntityKind::Stamp);
        record.upsert_version(EntityVersion::new(
            stamp_nid,
            stamp_nid,
            VersionData::Stamp(data),
        ));
        service.registry.put_entity(record)?;

        state.stamps.insert(key, stamp_nid);
        service.by_stamp.insert(stamp_nid, self.id);
        debug!(
            txn = self.id,
            stamp = stamp_nid.as_i32(),
            entity = entity_nid.as_i32(),
            "minted uncommitted stamp"
        );
        Ok(data.to_stamp(stamp_nid))
    }

    fn commit(&self) -> Result<Timestamp> {
        let service = self.service()?;
        let mut state = self.state.lock();
        if !state.active {
            return Err(Error::TransactionInactive);
        }

        // One shared commit time for every stamp in the transaction
        let commit_time = Timestamp::now();
        for (&(status, author, module, path), &stamp_nid) in state.stamps.iter() {
            let committed = StampVersionData {
                status,
                time: commit_time,
                author,
                module,
                path,
            };
            service.registry.put_version(EntityVersion::new(
                stamp_nid,
                stamp_nid,
                VersionData::Stamp(committed),
            ))?;
        }

        state.active = false;
        for &stamp_nid in state.stamps.values() {
            service.by_stamp.remove(&stamp_nid);
        }
        service.active.remove(&self.id);
        info!(
            txn = self.id,
            stamps = state.stamps.len(),
            time = %commit_time,
            "transaction committed"
        );
        Ok(commit_time)
    }

    fn cancel(&self) -> Result<()> {
        let mut state = self.state.lock();
        if !state.active {
            // Idempotent: canceling a finished transaction is a no-op
            return Ok(());
        }
        let service = self.service()?;

        // Retire minted stamps as canceled so no version is left
        // claiming to be uncommitted without a live transaction.
        for (&(_, author, module, path), &stamp_nid) in state.stamps.iter() {
            let canceled = StampVersionData {
                status: Status::Canceled,
                time: Timestamp::EPOCH,
                author,
                module,
                path,
            };
            service.registry.put_version(EntityVersion::new(
                stamp_nid,
                stamp_nid,
                VersionData::Stamp(canceled),
            ))?;
        }

        state.active = false;
        for &stamp_nid in state.stamps.values() {
            service.by_stamp.remove(&stamp_nid);
        }
        service.active.remove(&self.id);
        debug!(txn = self.id, "transaction canceled");
        Ok(())
    }
}

impl std::fmt::Debug for MemoryTransaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("MemoryTransaction")
            .field("id", &self.id)
            .field("active", &state.active)
            .field("stamp_count", &state.stamps.len())
            .finish()
    }
}

/// In-memory [`TransactionService`] writing through an [`EntityRegistry`]
pub struct MemoryTransactionService {
    registry: Arc<EntityRegistry>,
    next_nid: AtomicI32,
    next_id: AtomicU64,
    active: DashMap<u64, Arc<MemoryTransaction>>,
    by_stamp: DashMap<Nid, u64>,
    self_ref: Mutex<Weak<MemoryTransactionService>>,
}

impl MemoryTransactionService {
    /// Create a service minting stamp nids from the default base
    pub fn new(registry: Arc<EntityRegistry>) -> Arc<Self> {
        Self::with_nid_base(registry, DEFAULT_NID_BASE)
    }

    /// Create a service minting stamp nids from the given base
    pub fn with_nid_base(registry: Arc<EntityRegistry>, nid_base: i32) -> Arc<Self> {
        let service = Arc::new(MemoryTransactionService {
            registry,
            next_nid: AtomicI32::new(nid_base),
            next_id: AtomicU64::new(1),
            active: DashMap::new(),
            by_stamp: DashMap::new(),
            self_ref: Mutex::new(Weak::new()),
        });
        *service.self_ref.lock() = Arc::downgrade(&service);
        service
    }

    fn allocate_nid(&self) -> Nid {
        Nid::new(self.next_nid.fetch_add(1, Ordering::AcqRel))
    }

    /// Number of currently open transactions
    pub fn active_count(&self) -> usize {
        self.active.len()
    }
}

impl TransactionService for MemoryTransactionService {
    fn begin(&self) -> Arc<dyn Transaction> {
        let id = self.next_id.fetch_add(1, Ordering::AcqRel);
        let transaction = Arc::new(MemoryTransaction {
            id,
            service: self.self_ref.lock().clone(),
            state: Mutex::new(TransactionState {
                active: true,
                stamps: HashMap::new(),
            }),
        });
        self.active.insert(id, transaction.clone());
        debug!(txn = id, "transaction opened");
        transaction
    }

    fn transaction_for_stamp(&self, stamp_nid: Nid) -> Option<Arc<dyn Transaction>> {
        let id = *self.by_stamp.get(&stamp_nid)?;
        self.active
            .get(&id)
            .map(|txn| txn.value().clone() as Arc<dyn Transaction>)
    }

    fn transaction_for_version(&self, version: &EntityVersion) -> Option<Arc<dyn Transaction>> {
        self.transaction_for_stamp(version.stamp_nid)
    }
}

impl std::fmt::Debug for MemoryTransactionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryTransactionService")
            .field("active", &self.active.len())
            .finish()
    }
}
