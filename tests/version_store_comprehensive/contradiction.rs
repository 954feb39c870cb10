//! Contradiction detection under divergent authoring paths

use crate::common::harness;
use glossadb::testing::PathFilteredCalculator;
use glossadb::{classify, resolve, Nid, Timestamp, VersionClass};

#[test]
fn concurrent_heads_on_two_paths_contradict() {
    let h = harness();
    // Committed versions on stamp 10 (path A) and stamp 11 (path B),
    // both maximal under a view that includes both paths.
    h.seed_stamp(10, Timestamp::from_micros(100), 1);
    h.seed_stamp(11, Timestamp::from_micros(100), 2);
    h.seed_concept(100, &[10, 11]);

    let entity = h.registry.get(Nid::new(100)).unwrap();
    let view = PathFilteredCalculator::new(h.registry.as_ref(), vec![Nid::new(1), Nid::new(2)]);

    let latest = resolve(&entity, &view, h.registry.as_ref()).unwrap();
    assert!(latest.is_present(), "A primary version is still nominated");
    assert_eq!(
        latest.contradictions().len(),
        1,
        "The non-primary concurrent version is the contradiction"
    );
}

#[test]
fn narrowing_the_view_to_one_path_removes_the_contradiction() {
    let h = harness();
    h.seed_stamp(10, Timestamp::from_micros(100), 1);
    h.seed_stamp(11, Timestamp::from_micros(100), 2);
    h.seed_concept(100, &[10, 11]);

    let entity = h.registry.get(Nid::new(100)).unwrap();
    let view = PathFilteredCalculator::new(h.registry.as_ref(), vec![Nid::new(1)]);

    let latest = resolve(&entity, &view, h.registry.as_ref()).unwrap();
    assert!(!latest.is_contradicted());
    assert_eq!(latest.value().unwrap().stamp_nid, Nid::new(10));
}

#[test]
fn successive_versions_on_one_path_do_not_contradict() {
    let h = harness();
    h.seed_stamp(10, Timestamp::from_micros(100), 1);
    h.seed_stamp(11, Timestamp::from_micros(200), 1);
    h.seed_concept(100, &[10, 11]);

    let entity = h.registry.get(Nid::new(100)).unwrap();
    let view = PathFilteredCalculator::new(h.registry.as_ref(), vec![Nid::new(1)]);

    let latest = resolve(&entity, &view, h.registry.as_ref()).unwrap();
    assert!(!latest.is_contradicted(), "Time-ordered edits are not concurrent");
    assert_eq!(latest.value().unwrap().stamp_nid, Nid::new(11));
}

#[test]
fn contradicted_versions_classify_as_contradicted_latest() {
    let h = harness();
    h.seed_stamp(10, Timestamp::from_micros(100), 1);
    h.seed_stamp(11, Timestamp::from_micros(100), 2);
    h.seed_stamp(12, Timestamp::from_micros(50), 1);
    h.seed_concept(100, &[10, 11, 12]);

    let entity = h.registry.get(Nid::new(100)).unwrap();
    let view = PathFilteredCalculator::new(h.registry.as_ref(), vec![Nid::new(1), Nid::new(2)]);

    let head_a = entity.version(Nid::new(10)).unwrap();
    let head_b = entity.version(Nid::new(11)).unwrap();
    let superseded = entity.version(Nid::new(12)).unwrap();

    assert_eq!(
        classify(&entity, &head_a, &view, h.registry.as_ref()).unwrap(),
        Some(VersionClass::ContradictedLatest)
    );
    assert_eq!(
        classify(&entity, &head_b, &view, h.registry.as_ref()).unwrap(),
        Some(VersionClass::ContradictedLatest)
    );
    assert_eq!(
        classify(&entity, &superseded, &view, h.registry.as_ref()).unwrap(),
        Some(VersionClass::Prior)
    );
}

#[test]
fn entity_invisible_under_view_is_no_latest_version() {
    let h = harness();
    h.seed_stamp(10, Timestamp::from_micros(100), 9);
    h.seed_concept(100, &[10]);

    let entity = h.registry.get(Nid::new(100)).unwrap();
    // Path 9 is not in the view
    let view = PathFilteredCalculator::new(h.registry.as_ref(), vec![Nid::new(1)]);

    assert!(matches!(
        resolve(&entity, &view, h.registry.as_ref()),
        Err(glossadb::Error::NoLatestVersion(_))
    ));
}
