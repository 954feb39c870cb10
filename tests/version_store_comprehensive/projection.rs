//! Snapshot projection through the full stack

use crate::common::harness;
use glossadb::testing::PathFilteredCalculator;
use glossadb::{
    project, EntityKind, EntityRecord, EntityVersion, Nid, PublicId, StampSource, Timestamp,
    VersionData,
};
use rand::seq::SliceRandom;
use rand::thread_rng;

#[test]
fn historic_versions_come_back_newest_first() {
    let h = harness();
    // Three superseded versions with stamp times 10, 30, 20, one latest
    h.seed_stamp(10, Timestamp::from_micros(10), 1);
    h.seed_stamp(20, Timestamp::from_micros(30), 1);
    h.seed_stamp(30, Timestamp::from_micros(20), 1);
    h.seed_stamp(40, Timestamp::from_micros(99), 1);
    h.seed_concept(100, &[10, 20, 30, 40]);

    let entity = h.registry.get(Nid::new(100)).unwrap();
    let view = PathFilteredCalculator::new(h.registry.as_ref(), vec![Nid::new(1)]);
    let snapshot = project(&entity, &view, h.registry.as_ref()).unwrap();

    let times: Vec<u64> = snapshot
        .historic()
        .iter()
        .map(|v| h.registry.stamp(v.stamp_nid).unwrap().time.as_micros())
        .collect();
    assert_eq!(
        times,
        vec![30, 20, 10],
        "Historic ordering is a contract: index 0 is most recent"
    );
}

#[test]
fn historic_ordering_is_independent_of_insertion_order() {
    let h = harness();
    let mut stamps: Vec<(i32, u64)> = vec![(10, 10), (20, 30), (30, 20), (40, 99)];
    stamps.shuffle(&mut thread_rng());

    for &(nid, time) in &stamps {
        h.seed_stamp(nid, Timestamp::from_micros(time), 1);
    }
    // Build the record in the shuffled order as well
    let mut record = EntityRecord::new(Nid::new(100), PublicId::new(), EntityKind::Concept);
    for &(stamp_nid, _) in &stamps {
        record.upsert_version(EntityVersion::new(
            Nid::new(100),
            Nid::new(stamp_nid),
            VersionData::Concept,
        ));
    }
    h.registry.put_entity(record).unwrap();

    let entity = h.registry.get(Nid::new(100)).unwrap();
    let view = PathFilteredCalculator::new(h.registry.as_ref(), vec![Nid::new(1)]);
    let snapshot = project(&entity, &view, h.registry.as_ref()).unwrap();

    let order: Vec<Nid> = snapshot.historic().iter().map(|v| v.stamp_nid).collect();
    assert_eq!(order, vec![Nid::new(20), Nid::new(30), Nid::new(10)]);
}

#[test]
fn uncommitted_versions_partition_separately() {
    let h = harness();
    h.seed_stamp(10, Timestamp::from_micros(10), 1);
    h.seed_stamp(11, Timestamp::SENTINEL, 1);
    h.seed_concept(100, &[10, 11]);

    let entity = h.registry.get(Nid::new(100)).unwrap();
    let view = PathFilteredCalculator::new(h.registry.as_ref(), vec![Nid::new(1)]);
    let snapshot = project(&entity, &view, h.registry.as_ref()).unwrap();

    assert_eq!(snapshot.uncommitted().len(), 1);
    assert_eq!(snapshot.uncommitted()[0].stamp_nid, Nid::new(11));
    assert_eq!(snapshot.latest().value().unwrap().stamp_nid, Nid::new(10));
    assert!(snapshot.historic().is_empty());
}

#[test]
fn processed_working_set_is_display_only() {
    let h = harness();
    h.seed_stamp(10, Timestamp::from_micros(10), 1);
    h.seed_stamp(11, Timestamp::from_micros(20), 1);
    h.seed_concept(100, &[10, 11]);

    let entity = h.registry.get(Nid::new(100)).unwrap();
    let view = PathFilteredCalculator::new(h.registry.as_ref(), vec![Nid::new(1)]);
    let mut snapshot = project(&entity, &view, h.registry.as_ref()).unwrap();

    snapshot.sort_processed_by(|a, b| a.stamp_nid.cmp(&b.stamp_nid));
    snapshot.retain_processed(|v| v.stamp_nid == Nid::new(10));
    assert_eq!(snapshot.processed().len(), 1);

    // Canonical partition untouched; reset restores the working set
    assert_eq!(snapshot.latest().value().unwrap().stamp_nid, Nid::new(11));
    snapshot.reset_processed();
    assert_eq!(snapshot.processed().len(), 2);
}
