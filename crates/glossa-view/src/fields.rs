//! Locator-addressed field reads
//!
//! [`read_field`] resolves a concrete [`FieldLocator`] against the live
//! entity graph and projects the named field. It is the read twin of the
//! editable overlay's locator-addressed writes.
//!
//! Resolution is strict: a wildcard anywhere in the locator is
//! [`Error::UnresolvableLocator`] (a wildcard names a *family* of
//! fields, not one field), a missing version is `VersionNotFound`, and a
//! kind disagreement is `KindMismatch`. Nothing is defaulted.

use glossa_core::{
    Entity, EntitySource, EntityVersion, Error, FieldDefinition, FieldValue, Nid, PublicId,
    Result, SemanticRefs, Stamp, Status, Timestamp,
};
use glossa_locator::FieldLocator;
use std::sync::Arc;

/// The value a locator resolves to
///
/// One variant per field category a locator can name; the mapping from
/// locator variant to read variant is fixed and documented on
/// [`read_field`].
#[derive(Debug, Clone)]
pub enum FieldRead {
    /// The whole canonical entity
    Chronology(Arc<Entity>),
    /// The entity's public id
    PublicId(PublicId),
    /// The entity's full version set
    Versions(Vec<Arc<EntityVersion>>),
    /// One specific version
    Version(Arc<EntityVersion>),
    /// A nid-valued field (pattern reference, meaning, author, ...)
    Nid(Nid),
    /// A whole resolved stamp
    Stamp(Stamp),
    /// A stamp's status field
    Status(Status),
    /// A stamp's time field
    Time(Timestamp),
    /// One semantic field value
    FieldValue(FieldValue),
    /// A semantic version's whole field list
    FieldValues(Vec<FieldValue>),
    /// One pattern field definition
    FieldDefinition(FieldDefinition),
    /// A pattern version's whole field-definition list
    FieldDefinitions(Vec<FieldDefinition>),
}

/// Resolve a concrete locator to the field it names
///
/// | locator | result |
/// |---|---|
/// | `Chronology` | `Chronology` |
/// | `PublicId` | `PublicId` |
/// | `VersionSet` | `Versions` |
/// | `Version` | `Version` |
/// | `SemanticPattern` / `SemanticReferencedComponent` | `Nid` |
/// | `VersionStamp` | `Stamp` |
/// | `PatternMeaning` / `PatternPurpose` | `Nid` |
/// | `FieldDefinitionList[Item]` | `FieldDefinitions` / `FieldDefinition` |
/// | `SemanticFieldList[Item]` | `FieldValues` / `FieldValue` |
/// | `StampStatus` | `Status` |
/// | `StampTime` | `Time` |
/// | `StampAuthor` / `StampModule` / `StampPath` | `Nid` |
pub fn read_field(source: &dyn EntitySource, locator: &FieldLocator) -> Result<FieldRead> {
    if locator.has_wildcard() {
        return Err(Error::UnresolvableLocator(locator.to_string()));
    }
    let entity = source.entity(locator.entity_nid())?;

    match *locator {
        FieldLocator::Chronology { .. } => Ok(FieldRead::Chronology(entity)),
        FieldLocator::PublicId { .. } => Ok(FieldRead::PublicId(entity.public_id())),
        FieldLocator::VersionSet { .. } => Ok(FieldRead::Versions(entity.versions())),
        FieldLocator::Version { stamp_nid, .. } => {
            Ok(FieldRead::Version(version_of(&entity, stamp_nid)?))
        }
        FieldLocator::SemanticPattern { .. } => {
            Ok(FieldRead::Nid(semantic_refs(&entity)?.pattern_nid))
        }
        FieldLocator::SemanticReferencedComponent { .. } => Ok(FieldRead::Nid(
            semantic_refs(&entity)?.referenced_component_nid,
        )),

        FieldLocator::VersionStamp { stamp_nid, .. } => {
            let version = version_of(&entity, stamp_nid)?;
            Ok(FieldRead::Stamp(source.stamp(version.stamp_nid)?))
        }
        FieldLocator::PatternMeaning { stamp_nid, .. } => {
            Ok(FieldRead::Nid(pattern_data(&entity, stamp_nid)?.meaning))
        }
        FieldLocator::PatternPurpose { stamp_nid, .. } => {
            Ok(FieldRead::Nid(pattern_data(&entity, stamp_nid)?.purpose))
        }
        FieldLocator::FieldDefinitionList { stamp_nid, .. } => Ok(FieldRead::FieldDefinitions(
            pattern_data(&entity, stamp_nid)?.field_definitions,
        )),
        FieldLocator::FieldDefinitionListItem {
            stamp_nid,
            pattern_nid,
            index,
            ..
        } => {
            // The pattern's own list: the pattern component must name
            // the addressed entity itself.
            if pattern_nid != entity.nid() {
                return Err(Error::LocatorMismatch {
                    expected: entity.nid(),
                    actual: pattern_nid,
                });
            }
            let definitions = pattern_data(&entity, stamp_nid)?.field_definitions;
            list_item(&definitions, index).map(FieldRead::FieldDefinition)
        }
        FieldLocator::SemanticFieldList { stamp_nid, .. } => Ok(FieldRead::FieldValues(
            semantic_fields(&entity, stamp_nid)?,
        )),
        FieldLocator::SemanticFieldListItem {
            stamp_nid,
            pattern_nid,
            index,
            ..
        } => {
            let refs = semantic_refs(&entity)?;
            if refs.pattern_nid != pattern_nid {
                return Err(Error::LocatorMismatch {
                    expected: refs.pattern_nid,
                    actual: pattern_nid,
                });
            }
            let fields = semantic_fields(&entity, stamp_nid)?;
            list_item(&fields, index).map(FieldRead::FieldValue)
        }

        FieldLocator::StampStatus { stamp_nid, .. } => {
            Ok(FieldRead::Status(stamp_of(source, &entity, stamp_nid)?.status))
        }
        FieldLocator::StampTime { stamp_nid, .. } => {
            Ok(FieldRead::Time(stamp_of(source, &entity, stamp_nid)?.time))
        }
        FieldLocator::StampAuthor { stamp_nid, .. } => {
            Ok(FieldRead::Nid(stamp_of(source, &entity, stamp_nid)?.author))
        }
        FieldLocator::StampModule { stamp_nid, .. } => {
            Ok(FieldRead::Nid(stamp_of(source, &entity, stamp_nid)?.module))
        }
        FieldLocator::StampPath { stamp_nid, .. } => {
            Ok(FieldRead::Nid(stamp_of(source, &entity, stamp_nid)?.path))
        }
    }
}

fn version_of(entity: &Entity, stamp_nid: Nid) -> Result<Arc<EntityVersion>> {
    entity.version(stamp_nid).ok_or(Error::VersionNotFound {
        entity: entity.nid(),
        stamp: stamp_nid,
    })
}

fn stamp_of(source: &dyn EntitySource, entity: &Entity, stamp_nid: Nid) -> Result<Stamp> {
    let version = version_of(entity, stamp_nid)?;
    source.stamp(version.stamp_nid)
}

fn semantic_refs(entity: &Entity) -> Result<SemanticRefs> {
    entity.semantic_refs().ok_or(Error::KindMismatch {
        expected: glossa_core::EntityKind::Semantic,
        actual: entity.kind(),
    })
}

fn pattern_data(
    entity: &Entity,
    stamp_nid: Nid,
) -> Result<glossa_core::PatternVersionData> {
    let version = version_of(entity, stamp_nid)?;
    version
        .data
        .as_pattern()
        .cloned()
        .ok_or(Error::KindMismatch {
            expected: glossa_core::EntityKind::Pattern,
            actual: version.kind(),
        })
}

fn semantic_fields(entity: &Entity, stamp_nid: Nid) -> Result<Vec<FieldValue>> {
    let version = version_of(entity, stamp_nid)?;
    version
        .data
        .as_semantic()
        .map(|data| data.fields.clone())
        .ok_or(Error::KindMismatch {
            expected: glossa_core::EntityKind::Semantic,
            actual: version.kind(),
        })
}

fn list_item<T: Clone>(list: &[T], index: i32) -> Result<T> {
    usize::try_from(index)
        .ok()
        .and_then(|i| list.get(i))
        .cloned()
        .ok_or(Error::FieldIndexOutOfRange {
            index,
            len: list.len(),
        })
}
