//! Snapshot projection: partitioning an entity's versions under a view
//!
//! [`project`] splits every version of an entity into three canonical
//! sets — `uncommitted`, `latest`, `historic` — and carries a separate
//! mutable `processed` working set for display filtering and reordering
//! that never touches the canonical partition.
//!
//! `historic` is sorted newest-to-oldest by stamp time. That ordering is
//! a contract, not an implementation detail: consumers index 0 as "most
//! recent prior state".

use crate::resolver::resolve;
use glossa_core::{
    Entity, EntityVersion, Latest, Nid, Result, StampSource, Timestamp, ViewCalculator,
};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// The canonical three-way partition plus a mutable working set
#[derive(Debug)]
pub struct VersionSnapshot {
    latest: Latest<Arc<EntityVersion>>,
    uncommitted: Vec<Arc<EntityVersion>>,
    historic: Vec<Arc<EntityVersion>>,
    processed: Vec<Arc<EntityVersion>>,
}

impl VersionSnapshot {
    /// The resolved latest version(s), contradictions included
    pub fn latest(&self) -> &Latest<Arc<EntityVersion>> {
        &self.latest
    }

    /// Versions whose stamps are pending transaction commit
    pub fn uncommitted(&self) -> &[Arc<EntityVersion>] {
        &self.uncommitted
    }

    /// Visible, superseded versions, newest-to-oldest by stamp time
    pub fn historic(&self) -> &[Arc<EntityVersion>] {
        &self.historic
    }

    /// The mutable working set
    ///
    /// Starts as uncommitted + latest + historic, in that order.
    /// Filtering and re-sorting it never changes the canonical sets.
    pub fn processed(&self) -> &[Arc<EntityVersion>] {
        &self.processed
    }

    /// Keep only working-set entries satisfying the predicate
    pub fn retain_processed<F>(&mut self, predicate: F)
    where
        F: FnMut(&Arc<EntityVersion>) -> bool,
    {
        self.processed.retain(predicate);
    }

    /// Re-sort the working set
    pub fn sort_processed_by<F>(&mut self, compare: F)
    where
        F: FnMut(&Arc<EntityVersion>, &Arc<EntityVersion>) -> Ordering,
    {
        self.processed.sort_by(compare);
    }

    /// Restore the working set from the canonical partition
    pub fn reset_processed(&mut self) {
        self.processed = initial_processed(&self.uncommitted, &self.latest, &self.historic);
    }
}

fn initial_processed(
    uncommitted: &[Arc<EntityVersion>],
    latest: &Latest<Arc<EntityVersion>>,
    historic: &[Arc<EntityVersion>],
) -> Vec<Arc<EntityVersion>> {
    let mut processed = Vec::with_capacity(uncommitted.len() + latest.len() + historic.len());
    processed.extend(uncommitted.iter().cloned());
    processed.extend(latest.iter().cloned());
    processed.extend(historic.iter().cloned());
    processed
}

/// Partition an entity's versions under a view
///
/// - `uncommitted`: stamp time is the sentinel
/// - `latest`: computed by [`resolve`] (its errors propagate — an entity
///   with no visible latest version is a hard error here too)
/// - `historic`: visible but not latest, sorted by stamp time descending
///
/// Versions the view does not surface (committed but invisible) appear
/// in no set.
pub fn project(
    entity: &Entity,
    view: &dyn ViewCalculator,
    stamps: &dyn StampSource,
) -> Result<VersionSnapshot> {
    let latest = resolve(entity, view, stamps)?;
    let latest_set: HashSet<Nid> = view.latest_stamps(entity)?.into_iter().collect();
    let visible_set: HashSet<Nid> = view.visible_stamps(entity)?.into_iter().collect();

    let mut uncommitted = Vec::new();
    let mut historic = Vec::new();
    let mut times: HashMap<Nid, Timestamp> = HashMap::new();

    for version in entity.versions() {
        let stamp = stamps.stamp(version.stamp_nid)?;
        times.insert(version.stamp_nid, stamp.time);
        if stamp.time.is_uncommitted() {
            uncommitted.push(version);
        } else if visible_set.contains(&version.stamp_nid)
            && !latest_set.contains(&version.stamp_nid)
        {
            historic.push(version);
        }
    }

    // Contract: index 0 is the most recent prior state. Stamp nid breaks
    // exact-time ties deterministically.
    historic.sort_by(|a, b| {
        times[&b.stamp_nid]
            .cmp(&times[&a.stamp_nid])
            .then(b.stamp_nid.cmp(&a.stamp_nid))
    });
    // Determinism for the working set as well
    uncommitted.sort_by(|a, b| a.stamp_nid.cmp(&b.stamp_nid));

    let processed = initial_processed(&uncommitted, &latest, &historic);
    Ok(VersionSnapshot {
        latest,
        uncommitted,
        historic,
        processed,
    })
}
