//! Entity model: records, versions, and the canonical in-memory entity
//!
//! Three layers:
//!
//! - [`EntityRecord`] — the plain, serializable form a backing store
//!   holds: identity plus the full known version set.
//! - [`EntityVersion`] / [`VersionData`] — one immutable stamped version;
//!   the payload is a tagged union over the four entity kinds, so every
//!   dispatch is an exhaustive match.
//! - [`Entity`] — the canonical shared in-memory instance the identity
//!   registry hands out. Exactly one exists per nid while referenced;
//!   merging new versions mutates it in place, observable by every
//!   holder.
//!
//! ## Invariants
//!
//! - Per entity, at most one version per stamp nid: the version map is
//!   keyed by stamp nid, so a second version under the same stamp
//!   replaces the first rather than appending.
//! - Versions are immutable once constructed; all change is by
//!   replacement under a new (or re-written) stamp.

use crate::stamp::{Stamp, Status};
use crate::timestamp::Timestamp;
use crate::types::{EntityKind, Nid, PublicId};
use crate::value::{FieldDefinition, FieldValue};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Chronology-level references carried only by semantic entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SemanticRefs {
    /// Pattern this semantic conforms to
    pub pattern_nid: Nid,
    /// Component this semantic is about
    pub referenced_component_nid: Nid,
}

/// Kind-specific payload of a pattern version
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternVersionData {
    /// Concept nid naming what conforming semantics mean
    pub meaning: Nid,
    /// Concept nid naming why the pattern exists
    pub purpose: Nid,
    /// Ordered field schema
    pub field_definitions: Vec<FieldDefinition>,
}

/// Kind-specific payload of a semantic version
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticVersionData {
    /// Ordered field values, positionally matched to the pattern schema
    pub fields: Vec<FieldValue>,
}

/// Kind-specific payload of a stamp version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StampVersionData {
    /// Lifecycle status
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

impl StampVersionData {
    /// Resolve into a [`Stamp`] view for the given stamp entity nid
    pub fn to_stamp(&self, nid: Nid) -> Stamp {
        Stamp::new(nid, self.status, self.time, self.author, self.module, self.path)
    }
}

/// Tagged union over the four version payloads
///
/// The set is closed; every consumer dispatches with an exhaustive match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum VersionData {
    /// Concept versions carry nothing beyond their stamp
    Concept,
    /// Pattern schema payload
    Pattern(PatternVersionData),
    /// Semantic field payload
    Semantic(SemanticVersionData),
    /// Stamp provenance payload
    Stamp(StampVersionData),
}

impl VersionData {
    /// The entity kind this payload belongs to
    pub fn kind(&self) -> EntityKind {
        match self {
            VersionData::Concept => EntityKind::Concept,
            VersionData::Pattern(_) => EntityKind::Pattern,
            VersionData::Semantic(_) => EntityKind::Semantic,
            VersionData::Stamp(_) => EntityKind::Stamp,
        }
    }

    /// Borrow the pattern payload, if this is a pattern version
    pub fn as_pattern(&self) -> Option<&PatternVersionData> {
        match self {
            VersionData::Pattern(data) => Some(data),
            _ => None,
        }
    }

    /// Borrow the semantic payload, if this is a semantic version
    pub fn as_semantic(&self) -> Option<&SemanticVersionData> {
        match self {
            VersionData::Semantic(data) => Some(data),
            _ => None,
        }
    }

    /// Borrow the stamp payload, if this is a stamp version
    pub fn as_stamp(&self) -> Option<&StampVersionData> {
        match self {
            VersionData::Stamp(data) => Some(data),
            _ => None,
        }
    }
}

/// One immutable stamped version of an entity
///
/// References the owning entity and exactly one stamp. Equality is
/// structural over all three fields; the editable overlay's dirty check
/// relies on that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityVersion {
    /// Owning entity nid
    pub entity_nid: Nid,
    /// Stamp that produced this version
    pub stamp_nid: Nid,
    /// Kind-specific payload
    pub data: VersionData,
}

impl EntityVersion {
    /// Create a version
    pub fn new(entity_nid: Nid, stamp_nid: Nid, data: VersionData) -> Self {
        EntityVersion {
            entity_nid,
            stamp_nid,
            data,
        }
    }

    /// The entity kind of this version's payload
    pub fn kind(&self) -> EntityKind {
        self.data.kind()
    }

    /// Rebuild this version under a different stamp, payload unchanged
    pub fn with_stamp(&self, stamp_nid: Nid) -> Self {
        EntityVersion {
            entity_nid: self.entity_nid,
            stamp_nid,
            data: self.data.clone(),
        }
    }
}

/// The plain, serializable form of an entity held by a backing store
///
/// Identity plus the full known version set. Records are what cross the
/// store boundary; the registry normalizes them into canonical
/// [`Entity`] instances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    /// Stable integer id
    pub nid: Nid,
    /// Globally unique public id
    pub public_id: PublicId,
    /// Entity kind
    pub kind: EntityKind,
    /// Semantic-only chronology references
    pub semantic_refs: Option<SemanticRefs>,
    /// All known versions, unordered
    pub versions: Vec<EntityVersion>,
}

impl EntityRecord {
    /// Create a record with no versions yet
    pub fn new(nid: Nid, public_id: PublicId, kind: EntityKind) -> Self {
        EntityRecord {
            nid,
            public_id,
            kind,
            semantic_refs: None,
            versions: Vec::new(),
        }
    }

    /// Attach semantic chronology references (builder style)
    pub fn with_semantic_refs(mut self, refs: SemanticRefs) -> Self {
        self.semantic_refs = Some(refs);
        self
    }

    /// Find the version produced by a stamp
    pub fn version_for(&self, stamp_nid: Nid) -> Option<&EntityVersion> {
        self.versions.iter().find(|v| v.stamp_nid == stamp_nid)
    }

    /// Insert or replace the version for its stamp
    ///
    /// Replacement, not append: at most one version per stamp nid.
    pub fn upsert_version(&mut self, version: EntityVersion) {
        if let Some(existing) = self
            .versions
            .iter_mut()
            .find(|v| v.stamp_nid == version.stamp_nid)
        {
            *existing = version;
        } else {
            self.versions.push(version);
        }
    }
}

/// Change callback invoked after a canonical entity absorbs new versions
pub type ChangeCallback = Box<dyn Fn(Nid) + Send + Sync>;

/// The canonical shared in-memory entity
///
/// The identity registry guarantees exactly one `Entity` per nid while
/// any reference is held; all holders observe merges immediately because
/// the version map is shared, not copied.
///
/// Identity and kind are fixed at construction; only the version map
/// changes, and only by whole-version replacement keyed by stamp nid.
pub struct Entity {
    nid: Nid,
    public_id: PublicId,
    kind: EntityKind,
    semantic_refs: Option<SemanticRefs>,
    versions: RwLock<FxHashMap<Nid, Arc<EntityVersion>>>,
    // Invoked synchronously on the apply context after a merge changes
    // the version map. No reentrancy guarantees.
    listeners: RwLock<Vec<ChangeCallback>>,
}

impl Entity {
    /// Construct a canonical entity from a store record
    pub fn from_record(record: &EntityRecord) -> Self {
        let mut versions = FxHashMap::default();
        for version in &record.versions {
            versions.insert(version.stamp_nid, Arc::new(version.clone()));
        }
        Entity {
            nid: record.nid,
            public_id: record.public_id,
            kind: record.kind,
            semantic_refs: record.semantic_refs,
            versions: RwLock::new(versions),
            listeners: RwLock::new(Vec::new()),
        }
    }

    /// Stable integer id
    #[inline]
    pub fn nid(&self) -> Nid {
        self.nid
    }

    /// Globally unique public id
    #[inline]
    pub fn public_id(&self) -> PublicId {
        self.public_id
    }

    /// Entity kind
    #[inline]
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Semantic-only chronology references
    #[inline]
    pub fn semantic_refs(&self) -> Option<SemanticRefs> {
        self.semantic_refs
    }

    /// The version produced by a stamp, if known
    pub fn version(&self, stamp_nid: Nid) -> Option<Arc<EntityVersion>> {
        self.versions.read().get(&stamp_nid).cloned()
    }

    /// Snapshot of all known versions, unordered
    pub fn versions(&self) -> Vec<Arc<EntityVersion>> {
        self.versions.read().values().cloned().collect()
    }

    /// Stamp nids of all known versions, unordered
    pub fn stamp_nids(&self) -> Vec<Nid> {
        self.versions.read().keys().copied().collect()
    }

    /// Number of known versions
    pub fn version_count(&self) -> usize {
        self.versions.read().len()
    }

    /// Merge one version, replacing any prior version under its stamp
    ///
    /// Returns true if the version map changed. Listeners fire after the
    /// lock is released.
    pub fn merge_version(&self, version: EntityVersion) -> bool {
        let changed = {
            let mut versions = self.versions.write();
            match versions.get(&version.stamp_nid) {
                Some(existing) if **existing == version => false,
                _ => {
                    versions.insert(version.stamp_nid, Arc::new(version));
                    true
                }
            }
        };
        if changed {
            self.notify();
        }
        changed
    }

    /// Merge every version of a record, replacing by stamp nid
    ///
    /// Returns true if anything changed. Listeners fire at most once per
    /// merge, after the lock is released.
    pub fn merge_record(&self, record: &EntityRecord) -> bool {
        let mut changed = false;
        {
            let mut versions = self.versions.write();
            for version in &record.versions {
                match versions.get(&version.stamp_nid) {
                    Some(existing) if **existing == *version => {}
                    _ => {
                        versions.insert(version.stamp_nid, Arc::new(version.clone()));
                        changed = true;
                    }
                }
            }
        }
        if changed {
            self.notify();
        }
        changed
    }

    /// Serialize the current state back into a store record
    pub fn to_record(&self) -> EntityRecord {
        let versions = self
            .versions
            .read()
            .values()
            .map(|v| (**v).clone())
            .collect();
        EntityRecord {
            nid: self.nid,
            public_id: self.public_id,
            kind: self.kind,
            semantic_refs: self.semantic_refs,
            versions,
        }
    }

    /// Register a change callback
    ///
    /// Invoked synchronously, on the apply context, after every merge
    /// that changes the version map.
    pub fn on_change(&self, callback: ChangeCallback) {
        self.listeners.write().push(callback);
    }

    fn notify(&self) {
        let listeners = self.listeners.read();
        for listener in listeners.iter() {
            listener(self.nid);
        }
    }
}

impl std::fmt::Debug for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entity")
            .field("nid", &self.nid)
            .field("public_id", &self.public_id)
            .field("kind", &self.kind)
            .field("version_count", &self.version_count())
            .finish()
    }
}
