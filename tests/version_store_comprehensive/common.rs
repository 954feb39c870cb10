//! Shared harness for the integration suite

use glossadb::{
    ApplyContext, ChannelBus, EntityKind, EntityRecord, EntityRegistry, EntityVersion,
    FieldValue, MemoryStore, MemoryTransactionService, Nid, OverlayCache, PublicId, SemanticRefs,
    SemanticVersionData, StampVersionData, Status, Timestamp, VersionData,
};
use once_cell::sync::Lazy;
use std::sync::Arc;

static TRACING: Lazy<()> = Lazy::new(|| {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
});

/// Fully wired store + registry + transactions + overlay cache
pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub registry: Arc<EntityRegistry>,
    pub transactions: Arc<MemoryTransactionService>,
    pub overlays: OverlayCache,
}

/// Build a fresh harness on the current thread (the apply context)
pub fn harness() -> Harness {
    Lazy::force(&TRACING);
    let store = Arc::new(MemoryStore::new());
    let registry = EntityRegistry::new(
        store.clone(),
        Arc::new(ChannelBus::new()),
        ApplyContext::claim(),
    );
    let transactions = MemoryTransactionService::new(registry.clone());
    let overlays = OverlayCache::new(registry.clone(), transactions.clone());
    Harness {
        store,
        registry,
        transactions,
        overlays,
    }
}

impl Harness {
    /// Seed a committed stamp entity on the given path
    pub fn seed_stamp(&self, nid: i32, time: Timestamp, path: i32) {
        let mut record = EntityRecord::new(Nid::new(nid), PublicId::new(), EntityKind::Stamp);
        record.upsert_version(EntityVersion::new(
            Nid::new(nid),
            Nid::new(nid),
            VersionData::Stamp(StampVersionData {
                status: Status::Active,
                time,
                author: Nid::new(90),
                module: Nid::new(91),
                path: Nid::new(path),
            }),
        ));
        self.registry.put_entity(record).unwrap();
    }

    /// Seed a concept entity with one version per given stamp
    pub fn seed_concept(&self, nid: i32, stamp_nids: &[i32]) {
        let mut record = EntityRecord::new(Nid::new(nid), PublicId::new(), EntityKind::Concept);
        for &stamp_nid in stamp_nids {
            record.upsert_version(EntityVersion::new(
                Nid::new(nid),
                Nid::new(stamp_nid),
                VersionData::Concept,
            ));
        }
        self.registry.put_entity(record).unwrap();
    }

    /// Seed a semantic entity with one version carrying the given fields
    pub fn seed_semantic(
        &self,
        nid: i32,
        pattern_nid: i32,
        component_nid: i32,
        stamp_nid: i32,
        fields: Vec<FieldValue>,
    ) {
        let mut record = EntityRecord::new(Nid::new(nid), PublicId::new(), EntityKind::Semantic)
            .with_semantic_refs(SemanticRefs {
                pattern_nid: Nid::new(pattern_nid),
                referenced_component_nid: Nid::new(component_nid),
            });
        record.upsert_version(EntityVersion::new(
            Nid::new(nid),
            Nid::new(stamp_nid),
            VersionData::Semantic(SemanticVersionData { fields }),
        ));
        self.registry.put_entity(record).unwrap();
    }

    /// The canonical version of `entity` under `stamp`
    pub fn version(&self, entity: i32, stamp: i32) -> Arc<EntityVersion> {
        self.registry
            .get(Nid::new(entity))
            .unwrap()
            .version(Nid::new(stamp))
            .unwrap_or_else(|| panic!("entity {} has no version for stamp {}", entity, stamp))
    }
}
