//! Canonical overlay cache
//!
//! Exactly one [`EditableOverlay`] exists per (entity nid, edit stamp
//! nid) pair while referenced: independent callers editing under the
//! same authorship share one working copy. The get-or-create is an
//! atomic entry operation — concurrent first requests for the same pair
//! must not construct two overlays, because hand-off paths may probe the
//! cache before the apply context claims the instance.
//!
//! Entries are weak: an overlay nobody references is reclaimable and a
//! later request builds a fresh one from the supplied observed version.

use crate::overlay::EditableOverlay;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use glossa_core::{EntityVersion, Nid, Result, TransactionService};
use glossa_registry::EntityRegistry;
use std::sync::{Arc, Weak};
use tracing::debug;

/// Weak-valued canonical cache of editable overlays
pub struct OverlayCache {
    registry: Arc<EntityRegistry>,
    transactions: Arc<dyn TransactionService>,
    overlays: DashMap<(Nid, Nid), Weak<EditableOverlay>>,
}

impl OverlayCache {
    /// Create a cache writing through the given registry and service
    pub fn new(
        registry: Arc<EntityRegistry>,
        transactions: Arc<dyn TransactionService>,
    ) -> Self {
        OverlayCache {
            registry,
            transactions,
            overlays: DashMap::new(),
        }
    }

    /// Canonical overlay for (entity, edit stamp)
    ///
    /// `observed` seeds the working copy on first creation; when the
    /// pair already has a live overlay the argument is ignored and the
    /// existing instance is returned unchanged (its edits included).
    pub fn editable(
        &self,
        entity_nid: Nid,
        edit_stamp_nid: Nid,
        observed: Arc<EntityVersion>,
    ) -> Result<Arc<EditableOverlay>> {
        let key = (entity_nid, edit_stamp_nid);
        let overlay = match self.overlays.entry(key) {
            Entry::Occupied(mut occupied) => match occupied.get().upgrade() {
                Some(existing) => existing,
                None => {
                    let fresh = self.build(entity_nid, edit_stamp_nid, observed);
                    occupied.insert(Arc::downgrade(&fresh));
                    fresh
                }
            },
            Entry::Vacant(vacant) => {
                let fresh = self.build(entity_nid, edit_stamp_nid, observed);
                vacant.insert(Arc::downgrade(&fresh));
                fresh
            }
        };
        Ok(overlay)
    }

    fn build(
        &self,
        entity_nid: Nid,
        edit_stamp_nid: Nid,
        observed: Arc<EntityVersion>,
    ) -> Arc<EditableOverlay> {
        debug!(
            entity = entity_nid.as_i32(),
            edit_stamp = edit_stamp_nid.as_i32(),
            "creating editable overlay"
        );
        Arc::new(EditableOverlay::new(
            self.registry.clone(),
            self.transactions.clone(),
            entity_nid,
            edit_stamp_nid,
            observed,
        ))
    }

    /// Number of live cached overlays
    pub fn live_count(&self) -> usize {
        self.overlays
            .iter()
            .filter(|entry| entry.value().strong_count() > 0)
            .count()
    }
}

impl std::fmt::Debug for OverlayCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayCache")
            .field("entries", &self.overlays.len())
            .finish()
    }
}
