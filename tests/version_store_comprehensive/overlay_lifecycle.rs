//! Overlay save/commit/reset against the live registry

use crate::common::harness;
use glossadb::{FieldValue, Nid, StampSource, Timestamp, TransactionService};
use std::sync::Arc;

const EDIT_STAMP: i32 = 7;
const ENTITY: i32 = 100;
const PATTERN: i32 = 200;

fn seed(h: &crate::common::Harness) {
    h.seed_stamp(EDIT_STAMP, Timestamp::from_micros(1000), 1);
    h.seed_semantic(
        ENTITY,
        PATTERN,
        400,
        EDIT_STAMP,
        vec![FieldValue::String("term".into()), FieldValue::Integer(1)],
    );
}

#[test]
fn save_publishes_sentinel_stamped_version_then_commit_makes_it_real() {
    let h = harness();
    seed(&h);

    let overlay = h
        .overlays
        .editable(
            Nid::new(ENTITY),
            Nid::new(EDIT_STAMP),
            h.version(ENTITY, EDIT_STAMP),
        )
        .unwrap();
    overlay
        .set_semantic_field(0, FieldValue::String("revised term".into()))
        .unwrap();

    overlay.save().unwrap();

    // After save: the registry's canonical entity carries a version
    // whose stamp time is the sentinel.
    let staged_stamp = overlay.working().stamp_nid;
    let entity = h.registry.get(Nid::new(ENTITY)).unwrap();
    assert!(entity.version(staged_stamp).is_some());
    let stamp = h.registry.stamp(staged_stamp).unwrap();
    assert_eq!(
        stamp.time,
        Timestamp::SENTINEL,
        "Saved-but-uncommitted versions carry the sentinel time"
    );

    overlay.commit().unwrap();

    // After commit: the same stamp carries a real timestamp.
    let committed = h.registry.stamp(staged_stamp).unwrap();
    assert!(
        committed.time < Timestamp::SENTINEL,
        "Commit must mint a real timestamp strictly below the sentinel"
    );
    assert!(!committed.is_uncommitted());
    assert!(!overlay.is_dirty());
}

#[test]
fn dirty_lifecycle_through_resolved_observed_version() {
    let h = harness();
    seed(&h);

    let overlay = h
        .overlays
        .editable(
            Nid::new(ENTITY),
            Nid::new(EDIT_STAMP),
            h.version(ENTITY, EDIT_STAMP),
        )
        .unwrap();

    assert!(!overlay.is_dirty());
    overlay
        .set_semantic_field(1, FieldValue::Integer(2))
        .unwrap();
    assert!(overlay.is_dirty());

    overlay.reset().unwrap();
    assert!(!overlay.is_dirty());
    assert_eq!(overlay.working(), (*overlay.observed()).clone());
}

#[test]
fn failed_overlay_is_reclaimed_with_its_transaction_canceled() {
    let h = harness();
    seed(&h);

    {
        let overlay = h
            .overlays
            .editable(
                Nid::new(ENTITY),
                Nid::new(EDIT_STAMP),
                h.version(ENTITY, EDIT_STAMP),
            )
            .unwrap();
        overlay
            .set_semantic_field(0, FieldValue::String("abandoned".into()))
            .unwrap();
        overlay.save().unwrap();
        overlay.reset().unwrap();
        assert!(!overlay.has_active_transaction());
    }
    assert_eq!(h.transactions.active_count(), 0);
}

#[test]
fn batch_overlays_share_one_outer_transaction() {
    let h = harness();
    seed(&h);
    h.seed_semantic(
        101,
        PATTERN,
        401,
        EDIT_STAMP,
        vec![FieldValue::String("second".into())],
    );

    let first = h
        .overlays
        .editable(
            Nid::new(ENTITY),
            Nid::new(EDIT_STAMP),
            h.version(ENTITY, EDIT_STAMP),
        )
        .unwrap();
    let second = h
        .overlays
        .editable(Nid::new(101), Nid::new(EDIT_STAMP), h.version(101, EDIT_STAMP))
        .unwrap();

    let outer = h.transactions.begin();
    first.attach_transaction(outer.clone()).unwrap();
    second.attach_transaction(outer.clone()).unwrap();

    first
        .set_semantic_field(0, FieldValue::String("batched".into()))
        .unwrap();
    second
        .set_semantic_field(0, FieldValue::String("batched too".into()))
        .unwrap();
    first.save().unwrap();
    second.save().unwrap();

    // Same authorship, same transaction: both saves share one stamp
    let stamp = first.working().stamp_nid;
    assert_eq!(second.working().stamp_nid, stamp);

    let commit_time = outer.commit().unwrap();
    let committed = h.registry.stamp(stamp).unwrap();
    assert_eq!(committed.time, commit_time);
}

#[test]
fn unsaved_sibling_changes_are_lost_when_the_outer_transaction_commits() {
    let h = harness();
    seed(&h);
    h.seed_semantic(
        101,
        PATTERN,
        401,
        EDIT_STAMP,
        vec![FieldValue::String("second".into())],
    );

    let saved = h
        .overlays
        .editable(
            Nid::new(ENTITY),
            Nid::new(EDIT_STAMP),
            h.version(ENTITY, EDIT_STAMP),
        )
        .unwrap();
    let unsaved = h
        .overlays
        .editable(Nid::new(101), Nid::new(EDIT_STAMP), h.version(101, EDIT_STAMP))
        .unwrap();

    let outer = h.transactions.begin();
    saved.attach_transaction(outer.clone()).unwrap();
    unsaved.attach_transaction(outer.clone()).unwrap();

    saved
        .set_semantic_field(0, FieldValue::String("persisted".into()))
        .unwrap();
    unsaved
        .set_semantic_field(0, FieldValue::String("never saved".into()))
        .unwrap();

    // Caller contract violation: commit before every sibling saved
    saved.save().unwrap();
    outer.commit().unwrap();

    // The saved edit reached the store under the committed stamp...
    let stamp = saved.working().stamp_nid;
    assert!(h
        .registry
        .get(Nid::new(ENTITY))
        .unwrap()
        .version(stamp)
        .is_some());

    // ...the unsaved edit exists only in the abandoned working copy.
    let sibling = h.registry.get(Nid::new(101)).unwrap();
    assert_eq!(
        sibling.version_count(),
        1,
        "Unsaved working-copy changes are silently left behind"
    );
    assert!(unsaved.is_dirty());
}

#[test]
fn overlay_edits_are_visible_to_other_holders_after_save() {
    let h = harness();
    seed(&h);

    let holder = h.registry.get(Nid::new(ENTITY)).unwrap();
    let overlay = h
        .overlays
        .editable(
            Nid::new(ENTITY),
            Nid::new(EDIT_STAMP),
            h.version(ENTITY, EDIT_STAMP),
        )
        .unwrap();
    overlay
        .set_semantic_field(0, FieldValue::String("shared".into()))
        .unwrap();
    overlay.save().unwrap();

    assert_eq!(
        holder.version_count(),
        2,
        "Write-through must be observable on previously held instances"
    );
}

#[test]
fn second_transaction_attach_is_rejected_while_active() {
    let h = harness();
    seed(&h);

    let overlay = h
        .overlays
        .editable(
            Nid::new(ENTITY),
            Nid::new(EDIT_STAMP),
            h.version(ENTITY, EDIT_STAMP),
        )
        .unwrap();
    overlay
        .set_semantic_field(0, FieldValue::String("draft".into()))
        .unwrap();
    overlay.save().unwrap();

    let another: Arc<dyn glossadb::Transaction> = h.transactions.begin();
    assert!(matches!(
        overlay.attach_transaction(another.clone()),
        Err(glossadb::Error::TransactionActive)
    ));
    another.cancel().unwrap();
}
