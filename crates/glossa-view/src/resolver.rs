//! Latest-version resolution and contradiction detection
//!
//! Given an entity and a view calculator, [`resolve`] computes the
//! currently-visible version(s). When the view reports more than one
//! "latest" stamp the versions are concurrent and unordered — all of
//! them are contradictions, one is nominated primary by a deterministic
//! tie-break, and the caller decides what to do about the rest.
//!
//! An empty latest set is a hard [`Error::NoLatestVersion`]: downstream
//! projection requires at least one visible version, and silently
//! defaulting would hide a data-consistency problem upstream.

use glossa_core::{
    Entity, EntityVersion, Error, Latest, Nid, Result, StampSource, ViewCalculator,
};
use std::sync::Arc;

/// Classification of one version relative to a resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VersionClass {
    /// Stamp time is the uncommitted sentinel; pending transaction commit
    Uncommitted,
    /// The single latest version under the view
    UncontradictedLatest,
    /// One of several concurrent latest versions
    ContradictedLatest,
    /// Visible under the view but superseded
    Prior,
}

/// Resolve the currently-visible version(s) of an entity
///
/// 1. Ask the view for the latest stamp set.
/// 2. Exactly one stamp: that version alone, no contradictions.
/// 3. More than one: every version is equally current; the primary is
///    chosen by descending stamp time, then ascending path nid, then
///    ascending stamp nid, and the rest are contradictions.
/// 4. Empty: [`Error::NoLatestVersion`].
///
/// # Errors
///
/// `VersionNotFound` if the view names a stamp the entity has no
/// version for — the view and the entity disagree about reality.
pub fn resolve(
    entity: &Entity,
    view: &dyn ViewCalculator,
    stamps: &dyn StampSource,
) -> Result<Latest<Arc<EntityVersion>>> {
    let latest_stamps = view.latest_stamps(entity)?;
    if latest_stamps.is_empty() {
        return Err(Error::NoLatestVersion(entity.nid()));
    }

    let mut candidates = Vec::with_capacity(latest_stamps.len());
    for stamp_nid in latest_stamps {
        let version = entity.version(stamp_nid).ok_or(Error::VersionNotFound {
            entity: entity.nid(),
            stamp: stamp_nid,
        })?;
        let stamp = stamps.stamp(stamp_nid)?;
        candidates.push((stamp, version));
    }

    if candidates.len() == 1 {
        return Ok(Latest::of(candidates.remove(0).1));
    }

    // Deterministic primary nomination: newest first, then lowest path,
    // then lowest stamp nid. Total because stamp nids are unique.
    candidates.sort_by(|(a, _), (b, _)| {
        b.time
            .cmp(&a.time)
            .then(a.path.cmp(&b.path))
            .then(a.nid.cmp(&b.nid))
    });

    let mut versions = candidates.into_iter().map(|(_, v)| v);
    match versions.next() {
        Some(primary) => Ok(Latest::with_contradictions(primary, versions.collect())),
        None => Err(Error::NoLatestVersion(entity.nid())),
    }
}

/// Classify one version relative to the view
///
/// Returns `None` when the view does not surface the version at all
/// (not visible and not pending commit).
pub fn classify(
    entity: &Entity,
    version: &EntityVersion,
    view: &dyn ViewCalculator,
    stamps: &dyn StampSource,
) -> Result<Option<VersionClass>> {
    let stamp = stamps.stamp(version.stamp_nid)?;
    if stamp.time.is_uncommitted() {
        return Ok(Some(VersionClass::Uncommitted));
    }

    let latest_stamps = view.latest_stamps(entity)?;
    if latest_stamps.contains(&version.stamp_nid) {
        return Ok(Some(if latest_stamps.len() > 1 {
            VersionClass::ContradictedLatest
        } else {
            VersionClass::UncontradictedLatest
        }));
    }

    let visible = view.visible_stamps(entity)?;
    if visible.contains(&version.stamp_nid) {
        Ok(Some(VersionClass::Prior))
    } else {
        Ok(None)
    }
}

/// Resolve the latest version of a pattern entity
///
/// Convenience for consumers that follow a semantic's pattern reference
/// and need the pattern's current field schema.
pub fn resolve_pattern(
    pattern_nid: Nid,
    source: &dyn glossa_core::EntitySource,
    view: &dyn ViewCalculator,
) -> Result<Latest<Arc<EntityVersion>>> {
    let entity = source.entity(pattern_nid)?;
    if entity.kind() != glossa_core::EntityKind::Pattern {
        return Err(Error::KindMismatch {
            expected: glossa_core::EntityKind::Pattern,
            actual: entity.kind(),
        });
    }
    resolve(&entity, view, source)
}
