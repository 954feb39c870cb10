//! Test doubles for view policy and stamp resolution
//!
//! The production view calculator lives outside this core; these helpers
//! stand in for it in tests and demos. [`FixedViewCalculator`] plays
//! back explicit stamp sets; [`PathFilteredCalculator`] implements the
//! simplest honest policy (visible = committed stamps on allowed paths,
//! latest = newest per path) so contradiction scenarios can be built
//! from real stamp data.

use glossa_core::{
    Entity, Error, Nid, Result, Stamp, StampSource, ViewCalculator,
};
use std::collections::HashMap;

/// View calculator that plays back explicitly configured stamp sets
///
/// Entities without configured sets resolve to empty sets, which the
/// resolver turns into `NoLatestVersion`.
#[derive(Debug, Default)]
pub struct FixedViewCalculator {
    latest: HashMap<Nid, Vec<Nid>>,
    visible: HashMap<Nid, Vec<Nid>>,
}

impl FixedViewCalculator {
    /// Create a calculator with no configured entities
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the latest stamp set for an entity (builder style)
    pub fn latest(mut self, entity_nid: i32, stamp_nids: &[i32]) -> Self {
        self.latest.insert(
            Nid::new(entity_nid),
            stamp_nids.iter().map(|&n| Nid::new(n)).collect(),
        );
        self
    }

    /// Configure the visible stamp set for an entity (builder style)
    pub fn visible(mut self, entity_nid: i32, stamp_nids: &[i32]) -> Self {
        self.visible.insert(
            Nid::new(entity_nid),
            stamp_nids.iter().map(|&n| Nid::new(n)).collect(),
        );
        self
    }
}

impl ViewCalculator for FixedViewCalculator {
    fn latest_stamps(&self, entity: &Entity) -> Result<Vec<Nid>> {
        Ok(self.latest.get(&entity.nid()).cloned().unwrap_or_default())
    }

    fn visible_stamps(&self, entity: &Entity) -> Result<Vec<Nid>> {
        Ok(self.visible.get(&entity.nid()).cloned().unwrap_or_default())
    }
}

/// Stamp source over a fixed set of stamps
#[derive(Debug, Default)]
pub struct FixedStampSource {
    stamps: HashMap<Nid, Stamp>,
}

impl FixedStampSource {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a stamp (builder style)
    pub fn with(mut self, stamp: Stamp) -> Self {
        self.stamps.insert(stamp.nid, stamp);
        self
    }
}

impl StampSource for FixedStampSource {
    fn stamp(&self, nid: Nid) -> Result<Stamp> {
        self.stamps
            .get(&nid)
            .copied()
            .ok_or(Error::EntityNotFound(nid))
    }
}

/// Path-precedence view policy over live stamp data
///
/// - `visible`: every committed stamp whose path is allowed
/// - `latest`: per allowed path, the newest visible stamp (ties broken
///   by stamp nid); one entry per path that has any visible stamp
///
/// Concurrent heads on two different allowed paths therefore produce a
/// two-element latest set — the contradiction shape the resolver
/// detects.
pub struct PathFilteredCalculator<'a> {
    stamps: &'a dyn StampSource,
    allowed_paths: Vec<Nid>,
}

impl<'a> PathFilteredCalculator<'a> {
    /// Create a policy over the given stamp source and allowed paths
    pub fn new(stamps: &'a dyn StampSource, allowed_paths: Vec<Nid>) -> Self {
        PathFilteredCalculator {
            stamps,
            allowed_paths,
        }
    }

    fn visible_with_stamps(&self, entity: &Entity) -> Result<Vec<Stamp>> {
        let mut visible = Vec::new();
        for stamp_nid in entity.stamp_nids() {
            let stamp = self.stamps.stamp(stamp_nid)?;
            if !stamp.time.is_uncommitted() && self.allowed_paths.contains(&stamp.path) {
                visible.push(stamp);
            }
        }
        Ok(visible)
    }
}

impl ViewCalculator for PathFilteredCalculator<'_> {
    fn latest_stamps(&self, entity: &Entity) -> Result<Vec<Nid>> {
        let mut newest_per_path: HashMap<Nid, Stamp> = HashMap::new();
        for stamp in self.visible_with_stamps(entity)? {
            match newest_per_path.get(&stamp.path) {
                Some(current)
                    if (current.time, current.nid) >= (stamp.time, stamp.nid) => {}
                _ => {
                    newest_per_path.insert(stamp.path, stamp);
                }
            }
        }
        let mut latest: Vec<Nid> = newest_per_path.values().map(|s| s.nid).collect();
        latest.sort();
        Ok(latest)
    }

    fn visible_stamps(&self, entity: &Entity) -> Result<Vec<Nid>> {
        let mut visible: Vec<Nid> = self
            .visible_with_stamps(entity)?
            .iter()
            .map(|s| s.nid)
            .collect();
        visible.sort();
        Ok(visible)
    }
}
