//! Transactional editable working copies
//!
//! An [`EditableOverlay`] stages edits to one entity under one edit
//! stamp. The working version starts equal to the observed version and
//! diverges as fields are set; `save` publishes it under a fresh
//! uncommitted stamp, `commit` turns that stamp real, `reset` discards
//! everything.
//!
//! ## State machine
//!
//! ```text
//! Created ──edit──► Modified(dirty) ──save──► Saved(uncommitted)
//!    ▲                   │                        │
//!    │                 reset                 commit │ reset
//!    └───────────────────┴──────────◄─────────────┘
//! ```
//!
//! Created, post-reset, and post-commit are the clean states. Dirtiness
//! is recomputed from structural comparison on every query, never
//! cached.
//!
//! No operation retries internally and none leaves a partial write: a
//! failed `save` or `commit` keeps the previously committed version as
//! the observable state.

use glossa_core::{
    EntityVersion, EntityWriter, Error, FieldValue, Nid, Result, StampSource, Transaction,
    TransactionService, VersionData,
};
use glossa_locator::FieldLocator;
use glossa_registry::EntityRegistry;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use tracing::{debug, trace};

/// A canonical working copy for one (entity, edit stamp) pair
///
/// Obtain instances through the overlay cache — never construct two for
/// the same pair; independent callers editing under the same authorship
/// are supposed to share one working copy.
pub struct EditableOverlay {
    registry: Arc<EntityRegistry>,
    transactions: Arc<dyn TransactionService>,
    entity_nid: Nid,
    edit_stamp_nid: Nid,
    observed: RwLock<Arc<EntityVersion>>,
    working: RwLock<EntityVersion>,
    transaction: Mutex<Option<Arc<dyn Transaction>>>,
}

impl EditableOverlay {
    /// Create an overlay observing the given version
    ///
    /// Crate-internal: the overlay cache is the only constructor site,
    /// which is what makes the canonical-instance guarantee hold.
    pub(crate) fn new(
        registry: Arc<EntityRegistry>,
        transactions: Arc<dyn TransactionService>,
        entity_nid: Nid,
        edit_stamp_nid: Nid,
        observed: Arc<EntityVersion>,
    ) -> Self {
        let working = (*observed).clone();
        EditableOverlay {
            registry,
            transactions,
            entity_nid,
            edit_stamp_nid,
            observed: RwLock::new(observed),
            working: RwLock::new(working),
            transaction: Mutex::new(None),
        }
    }

    /// Entity this overlay edits
    pub fn entity_nid(&self) -> Nid {
        self.entity_nid
    }

    /// Edit stamp whose authorship this overlay writes under
    pub fn edit_stamp_nid(&self) -> Nid {
        self.edit_stamp_nid
    }

    /// The version this overlay is based on
    pub fn observed(&self) -> Arc<EntityVersion> {
        self.observed.read().clone()
    }

    /// Snapshot of the current working version
    pub fn working(&self) -> EntityVersion {
        self.working.read().clone()
    }

    /// Whether an opened transaction is pending commit
    pub fn has_active_transaction(&self) -> bool {
        self.transaction
            .lock()
            .as_ref()
            .map_or(false, |txn| txn.is_active())
    }

    /// Whether the working version differs from the observed version
    ///
    /// Recomputed structural comparison, never cached.
    pub fn is_dirty(&self) -> bool {
        *self.working.read() != **self.observed.read()
    }

    // ------------------------------------------------------------------
    // Field mutation
    // ------------------------------------------------------------------

    /// Replace one semantic field value
    pub fn set_semantic_field(&self, index: i32, value: FieldValue) -> Result<()> {
        self.registry.context().ensure()?;
        let mut working = self.working.write();
        match &mut working.data {
            VersionData::Semantic(data) => {
                let len = data.fields.len();
                let slot = usize::try_from(index)
                    .ok()
                    .and_then(|i| data.fields.get_mut(i))
                    .ok_or(Error::FieldIndexOutOfRange { index, len })?;
                *slot = value;
                Ok(())
            }
            other => Err(Error::KindMismatch {
                expected: glossa_core::EntityKind::Semantic,
                actual: other.kind(),
            }),
        }
    }

    /// Replace the whole semantic field list
    pub fn set_semantic_fields(&self, fields: Vec<FieldValue>) -> Result<()> {
        self.registry.context().ensure()?;
        let mut working = self.working.write();
        match &mut working.data {
            VersionData::Semantic(data) => {
                data.fields = fields;
                Ok(())
            }
            other => Err(Error::KindMismatch {
                expected: glossa_core::EntityKind::Semantic,
                actual: other.kind(),
            }),
        }
    }

    /// Set a pattern version's meaning
    pub fn set_pattern_meaning(&self, meaning: Nid) -> Result<()> {
        self.with_pattern_data(|data| data.meaning = meaning)
    }

    /// Set a pattern version's purpose
    pub fn set_pattern_purpose(&self, purpose: Nid) -> Result<()> {
        self.with_pattern_data(|data| data.purpose = purpose)
    }

    /// Replace a pattern version's field-definition list
    pub fn set_field_definitions(
        &self,
        definitions: Vec<glossa_core::FieldDefinition>,
    ) -> Result<()> {
        self.with_pattern_data(|data| data.field_definitions = definitions)
    }

    fn with_pattern_data<F>(&self, mutate: F) -> Result<()>
    where
        F: FnOnce(&mut glossa_core::PatternVersionData),
    {
        self.registry.context().ensure()?;
        let mut working = self.working.write();
        match &mut working.data {
            VersionData::Pattern(data) => {
                mutate(data);
                Ok(())
            }
            other => Err(Error::KindMismatch {
                expected: glossa_core::EntityKind::Pattern,
                actual: other.kind(),
            }),
        }
    }

    /// Locator-addressed field write
    ///
    /// The write twin of the field read path. Writable targets are the
    /// working version's own value fields: `SemanticFieldListItem`,
    /// `PatternMeaning`, and `PatternPurpose`. The locator must be
    /// wildcard-free, name this overlay's entity, and anchor to the
    /// current working stamp.
    pub fn write_field(&self, locator: &FieldLocator, value: FieldValue) -> Result<()> {
        self.registry.context().ensure()?;
        if locator.has_wildcard() {
            return Err(Error::UnresolvableLocator(locator.to_string()));
        }
        if locator.entity_nid() != self.entity_nid {
            return Err(Error::LocatorMismatch {
                expected: self.entity_nid,
                actual: locator.entity_nid(),
            });
        }
        if let Some(stamp_nid) = locator.stamp_nid() {
            let working_stamp = self.working.read().stamp_nid;
            if stamp_nid != working_stamp {
                return Err(Error::VersionNotFound {
                    entity: self.entity_nid,
                    stamp: stamp_nid,
                });
            }
        }

        match *locator {
            FieldLocator::SemanticFieldListItem {
                pattern_nid, index, ..
            } => {
                let entity = self.registry.get(self.entity_nid)?;
                let refs = entity.semantic_refs().ok_or(Error::KindMismatch {
                    expected: glossa_core::EntityKind::Semantic,
                    actual: entity.kind(),
                })?;
                if refs.pattern_nid != pattern_nid {
                    return Err(Error::LocatorMismatch {
                        expected: refs.pattern_nid,
                        actual: pattern_nid,
                    });
                }
                self.set_semantic_field(index, value)
            }
            FieldLocator::PatternMeaning { .. } => match value.as_component() {
                Some(nid) => self.set_pattern_meaning(nid),
                None => Err(Error::InvalidFieldWrite(format!(
                    "pattern meaning requires a component value, got {}",
                    value.type_name()
                ))),
            },
            FieldLocator::PatternPurpose { .. } => match value.as_component() {
                Some(nid) => self.set_pattern_purpose(nid),
                None => Err(Error::InvalidFieldWrite(format!(
                    "pattern purpose requires a component value, got {}",
                    value.type_name()
                ))),
            },
            ref other => Err(Error::InvalidFieldWrite(format!(
                "locator {} does not name a writable field",
                other
            ))),
        }
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Share an outer transaction with this overlay
    ///
    /// Subsequent saves mint their stamps from the given transaction
    /// instead of opening a private one. Remember the caller contract:
    /// every dirty overlay sharing the transaction must `save()` before
    /// the shared transaction commits, or its changes are silently left
    /// behind.
    ///
    /// # Errors
    ///
    /// `TransactionActive` if this overlay already holds a live
    /// transaction.
    pub fn attach_transaction(&self, transaction: Arc<dyn Transaction>) -> Result<()> {
        self.registry.context().ensure()?;
        let mut slot = self.transaction.lock();
        if slot.as_ref().map_or(false, |txn| txn.is_active()) {
            return Err(Error::TransactionActive);
        }
        *slot = Some(transaction);
        Ok(())
    }

    /// Publish the working version under an uncommitted stamp
    ///
    /// No-op when clean. Otherwise lazily opens a transaction, asks it
    /// for an uncommitted stamp carrying the edit stamp's authorship,
    /// rebuilds the working version under that stamp, and writes it
    /// through the registry — visible to every holder of the canonical
    /// entity, stamped with the sentinel time.
    pub fn save(&self) -> Result<()> {
        self.registry.context().ensure()?;
        if !self.is_dirty() {
            trace!(entity = self.entity_nid.as_i32(), "save skipped: clean");
            return Ok(());
        }

        let transaction = {
            let mut slot = self.transaction.lock();
            match slot.as_ref().filter(|txn| txn.is_active()) {
                Some(txn) => txn.clone(),
                None => {
                    let txn = self.transactions.begin();
                    *slot = Some(txn.clone());
                    txn
                }
            }
        };

        let template = self.registry.stamp(self.edit_stamp_nid)?;
        let stamp = transaction.stamp_for_entity(
            template.status,
            template.author,
            template.module,
            template.path,
            self.entity_nid,
        )?;

        let staged = self.working.read().with_stamp(stamp.nid);
        self.registry.put_version(staged.clone())?;
        *self.working.write() = staged;
        debug!(
            entity = self.entity_nid.as_i32(),
            stamp = stamp.nid.as_i32(),
            "working version saved"
        );
        Ok(())
    }

    /// Commit the pending transaction and adopt the result
    ///
    /// No-op without an active transaction. Otherwise the transaction
    /// mints a real timestamp for the working stamp, the working version
    /// is written through under the now-committed stamp, and it becomes
    /// the new observed baseline (the overlay is clean afterwards).
    pub fn commit(&self) -> Result<()> {
        self.registry.context().ensure()?;
        let transaction = match self.transaction.lock().as_ref() {
            Some(txn) if txn.is_active() => txn.clone(),
            _ => {
                trace!(
                    entity = self.entity_nid.as_i32(),
                    "commit skipped: no active transaction"
                );
                return Ok(());
            }
        };

        // Lifecycle check: an uncommitted working stamp must belong to a
        // live transaction, ours or not.
        let working_stamp = self.working.read().stamp_nid;
        let stamp = self.registry.stamp(working_stamp)?;
        if stamp.is_uncommitted()
            && self
                .transactions
                .transaction_for_stamp(working_stamp)
                .is_none()
        {
            return Err(Error::TransactionAbsent {
                entity: self.entity_nid,
                stamp: working_stamp,
            });
        }

        let commit_time = transaction.commit()?;
        let committed = self.working.read().clone();
        self.registry.put_version(committed.clone())?;
        *self.observed.write() = Arc::new(committed);
        *self.transaction.lock() = None;
        debug!(
            entity = self.entity_nid.as_i32(),
            stamp = working_stamp.as_i32(),
            time = %commit_time,
            "working version committed"
        );
        Ok(())
    }

    /// Discard the working version and cancel any open transaction
    ///
    /// Reverts to the observed version. Idempotent.
    pub fn reset(&self) -> Result<()> {
        self.registry.context().ensure()?;
        let observed = self.observed.read().clone();
        *self.working.write() = (*observed).clone();

        let transaction = self.transaction.lock().take();
        if let Some(txn) = transaction {
            txn.cancel()?;
        }
        debug!(entity = self.entity_nid.as_i32(), "overlay reset");
        Ok(())
    }
}

impl std::fmt::Debug for EditableOverlay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditableOverlay")
            .field("entity_nid", &self.entity_nid)
            .field("edit_stamp_nid", &self.edit_stamp_nid)
            .field("dirty", &self.is_dirty())
            .field("transaction", &self.has_active_transaction())
            .finish()
    }
}
