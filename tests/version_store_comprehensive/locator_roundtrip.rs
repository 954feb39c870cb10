//! Locator codec round-trips and read/write symmetry

use crate::common::harness;
use glossadb::{
    decode, encode, read_field, EntitySource, Error, FieldLocator, FieldRead, FieldValue, Nid,
    Timestamp, WILDCARD_INDEX,
};

/// Every locator variant, once fully concrete and once wildcarded
fn samples() -> Vec<FieldLocator> {
    let n = Nid::new(42);
    let s = Nid::new(7);
    let p = Nid::new(9);
    let w = Nid::WILDCARD;
    vec![
        FieldLocator::Chronology { nid: n },
        FieldLocator::Chronology { nid: w },
        FieldLocator::PublicId { nid: n },
        FieldLocator::PublicId { nid: w },
        FieldLocator::VersionSet { nid: n },
        FieldLocator::VersionSet { nid: w },
        FieldLocator::Version { nid: n, stamp_nid: s },
        FieldLocator::Version { nid: w, stamp_nid: w },
        FieldLocator::SemanticPattern { nid: n },
        FieldLocator::SemanticPattern { nid: w },
        FieldLocator::SemanticReferencedComponent { nid: n },
        FieldLocator::SemanticReferencedComponent { nid: w },
        FieldLocator::VersionStamp { nid: n, stamp_nid: s },
        FieldLocator::VersionStamp { nid: w, stamp_nid: w },
        FieldLocator::PatternMeaning { nid: n, stamp_nid: s },
        FieldLocator::PatternMeaning { nid: w, stamp_nid: w },
        FieldLocator::PatternPurpose { nid: n, stamp_nid: s },
        FieldLocator::PatternPurpose { nid: w, stamp_nid: w },
        FieldLocator::FieldDefinitionList { nid: n, stamp_nid: s },
        FieldLocator::FieldDefinitionList { nid: w, stamp_nid: w },
        FieldLocator::FieldDefinitionListItem {
            nid: n,
            stamp_nid: s,
            pattern_nid: p,
            index: 2,
        },
        FieldLocator::FieldDefinitionListItem {
            nid: w,
            stamp_nid: w,
            pattern_nid: w,
            index: WILDCARD_INDEX,
        },
        FieldLocator::SemanticFieldList { nid: n, stamp_nid: s },
        FieldLocator::SemanticFieldList { nid: w, stamp_nid: w },
        FieldLocator::SemanticFieldListItem {
            nid: n,
            stamp_nid: s,
            pattern_nid: p,
            index: 0,
        },
        FieldLocator::SemanticFieldListItem {
            nid: w,
            stamp_nid: w,
            pattern_nid: w,
            index: WILDCARD_INDEX,
        },
        FieldLocator::StampStatus { nid: n, stamp_nid: s },
        FieldLocator::StampStatus { nid: w, stamp_nid: w },
        FieldLocator::StampTime { nid: n, stamp_nid: s },
        FieldLocator::StampTime { nid: w, stamp_nid: w },
        FieldLocator::StampAuthor { nid: n, stamp_nid: s },
        FieldLocator::StampAuthor { nid: w, stamp_nid: w },
        FieldLocator::StampModule { nid: n, stamp_nid: s },
        FieldLocator::StampModule { nid: w, stamp_nid: w },
        FieldLocator::StampPath { nid: n, stamp_nid: s },
        FieldLocator::StampPath { nid: w, stamp_nid: w },
    ]
}

#[test]
fn every_variant_roundtrips_concrete_and_wildcarded() {
    for locator in samples() {
        let bytes = encode(&locator);
        let decoded = decode(&bytes)
            .unwrap_or_else(|e| panic!("decode failed for {}: {}", locator, e));
        assert_eq!(decoded, locator, "{} must decode to an equal value", locator);
        assert_eq!(
            encode(&decoded),
            bytes,
            "{} must re-encode byte-for-byte",
            locator
        );
    }
}

#[test]
fn wildcard_match_asymmetry_holds_for_spec_example() {
    let wild = FieldLocator::Version {
        nid: Nid::WILDCARD,
        stamp_nid: Nid::new(5),
    };
    let concrete = FieldLocator::Version {
        nid: Nid::new(42),
        stamp_nid: Nid::new(5),
    };
    assert!(wild.matches(&concrete));
    assert!(!concrete.matches(&wild));
}

#[test]
fn corrupted_tag_fails_whole_decode() {
    let mut bytes = encode(&FieldLocator::StampPath {
        nid: Nid::new(1),
        stamp_nid: Nid::new(2),
    });
    // Flip one tag byte: "StampPath" -> "StampPatx"
    let tag_end = 4 + "StampPath".len() - 1;
    bytes[tag_end] = b'x';
    assert!(matches!(decode(&bytes), Err(Error::UnknownLocatorTag(_))));
}

#[test]
fn overlay_write_then_locator_read_are_symmetric() {
    let h = harness();
    h.seed_stamp(7, Timestamp::from_micros(1000), 1);
    h.seed_semantic(
        100,
        200,
        400,
        7,
        vec![FieldValue::String("before".into()), FieldValue::Integer(1)],
    );

    let locator = FieldLocator::SemanticFieldListItem {
        nid: Nid::new(100),
        stamp_nid: Nid::new(7),
        pattern_nid: Nid::new(200),
        index: 0,
    };

    let overlay = h
        .overlays
        .editable(Nid::new(100), Nid::new(7), h.version(100, 7))
        .unwrap();
    overlay
        .write_field(&locator, FieldValue::String("after".into()))
        .unwrap();
    overlay.save().unwrap();
    overlay.commit().unwrap();

    // Read back through the saved stamp: same locator shape, new stamp
    let saved_locator = FieldLocator::SemanticFieldListItem {
        nid: Nid::new(100),
        stamp_nid: overlay.working().stamp_nid,
        pattern_nid: Nid::new(200),
        index: 0,
    };
    let source: &dyn EntitySource = h.registry.as_ref();
    match read_field(source, &saved_locator).unwrap() {
        FieldRead::FieldValue(value) => {
            assert_eq!(value, FieldValue::String("after".into()));
        }
        other => panic!("Expected FieldValue, got {:?}", other),
    }
}

#[test]
fn reading_a_wildcard_locator_is_unresolvable() {
    let h = harness();
    h.seed_stamp(7, Timestamp::from_micros(1000), 1);
    h.seed_concept(100, &[7]);

    let source: &dyn EntitySource = h.registry.as_ref();
    let result = read_field(
        source,
        &FieldLocator::VersionStamp {
            nid: Nid::new(100),
            stamp_nid: Nid::WILDCARD,
        },
    );
    assert!(matches!(result, Err(Error::UnresolvableLocator(_))));
}
