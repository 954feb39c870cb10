//! GlossaDB - bitemporal, multi-author terminology version store
//!
//! GlossaDB manages a knowledge base of terminology entities (concepts,
//! patterns, semantics, and provenance stamps) where every state change
//! is an immutable, stamp-tagged version rather than an in-place
//! mutation.
//!
//! # Quick Start
//!
//! ```ignore
//! use glossadb::{
//!     ApplyContext, ChannelBus, EntityRegistry, MemoryStore,
//!     MemoryTransactionService, OverlayCache,
//! };
//! use std::sync::Arc;
//!
//! // Wire the core services on the apply context
//! let registry = EntityRegistry::new(
//!     Arc::new(MemoryStore::new()),
//!     Arc::new(ChannelBus::new()),
//!     ApplyContext::claim(),
//! );
//! let transactions = MemoryTransactionService::new(registry.clone());
//! let overlays = OverlayCache::new(registry.clone(), transactions);
//!
//! // Resolve, edit, save, commit
//! let entity = registry.get(nid)?;
//! let latest = glossadb::resolve(&entity, &view, registry.as_ref())?;
//! let overlay = overlays.editable(nid, edit_stamp, latest.value().unwrap().clone())?;
//! overlay.set_semantic_field(0, FieldValue::String("term".into()))?;
//! overlay.save()?;
//! overlay.commit()?;
//! ```
//!
//! # Architecture
//!
//! The workspace layers bottom-up: `glossa-core` (model, errors, service
//! traits), `glossa-locator` (field addressing + binary codec),
//! `glossa-registry` (canonical identity, apply context, store, bus),
//! `glossa-view` (resolution, snapshots, field reads), `glossa-overlay`
//! (working copies and transactions). This crate re-exports the public
//! surface of each.

pub use glossa_core::{
    ChangeBus, Entity, EntityKind, EntityRecord, EntitySource, EntityStore, EntityVersion,
    EntityWriter, Error, FieldDataType, FieldDefinition, FieldValue, Latest, Nid,
    PatternVersionData, PublicId, Result, SemanticRefs, SemanticVersionData, Stamp, StampSource,
    StampVersionData, Status, Timestamp, Transaction, TransactionService, VersionData,
    ViewCalculator,
};
pub use glossa_locator::{decode, encode, FieldLocator, WILDCARD_INDEX};
pub use glossa_overlay::{EditableOverlay, MemoryTransactionService, OverlayCache};
pub use glossa_registry::{ApplyContext, ChannelBus, EntityRegistry, MemoryStore};
pub use glossa_view::{
    classify, project, read_field, resolve, resolve_pattern, FieldRead, VersionClass,
    VersionSnapshot,
};

/// Test and demo view policies
pub mod testing {
    pub use glossa_view::testing::{
        FixedStampSource, FixedViewCalculator, PathFilteredCalculator,
    };
}
