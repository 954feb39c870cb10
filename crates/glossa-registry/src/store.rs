//! In-memory backing entity store
//!
//! The reference [`EntityStore`]: a concurrent map of bincode-encoded
//! records plus a monotonic write generation. Serving decoded copies
//! (rather than shared references) keeps the store honest as a stand-in
//! for persistent storage — callers get a snapshot, never a live view.

use dashmap::DashMap;
use glossa_core::{EntityRecord, EntityStore, Nid, Result};
use std::sync::atomic::{AtomicU64, Ordering};

/// In-memory [`EntityStore`] over bincode-encoded records
pub struct MemoryStore {
    records: DashMap<Nid, Vec<u8>>,
    generation: AtomicU64,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        MemoryStore {
            records: DashMap::new(),
            generation: AtomicU64::new(0),
        }
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityStore for MemoryStore {
    fn put(&self, record: EntityRecord) -> Result<()> {
        let nid = record.nid;
        let bytes = bincode::serialize(&record)?;
        self.records.insert(nid, bytes);
        self.generation.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }

    fn get(&self, nid: Nid) -> Result<Option<EntityRecord>> {
        match self.records.get(&nid) {
            Some(bytes) => {
                let record: EntityRecord = bincode::deserialize(&bytes)?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("record_count", &self.records.len())
            .field("generation", &self.generation())
            .finish()
    }
}
