//! Field locators: structured addresses into the entity graph
//!
//! A [`FieldLocator`] names *where* a field lives: anchored either to a
//! chronology (an entity, across all its versions) or to one specific
//! version (entity + stamp), then specialized per field category. The
//! variant set is closed; every dispatch over it is an exhaustive match.
//!
//! Numeric components (`nid`, `stamp_nid`, `pattern_nid`, `index`) may
//! each independently be the wildcard sentinel, meaning "any value" when
//! this locator is used as a match pattern.
//!
//! ## Match asymmetry
//!
//! `a.matches(&b)` treats wildcards in `a` as matching anything in `b`,
//! but a concrete component in `a` never matches a wildcard in `b`.
//! Equality implies match; match does not imply equality.

use glossa_core::Nid;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Wildcard sentinel for locator `index` components
///
/// Mirrors [`Nid::WILDCARD`] for positions that are list indexes rather
/// than entity ids.
pub const WILDCARD_INDEX: i32 = i32::MAX;

/// A structured address naming one field in the entity graph
///
/// Chronology-anchored variants carry only the entity nid; version-
/// anchored variants add the stamp nid; list-item variants further carry
/// the owning pattern nid and a position index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldLocator {
    // ------------------------------------------------------------------
    // Chronology-anchored
    // ------------------------------------------------------------------
    /// The whole entity
    Chronology {
        /// Entity nid
        nid: Nid,
    },
    /// The entity's public id
    PublicId {
        /// Entity nid
        nid: Nid,
    },
    /// The entity's full version set
    VersionSet {
        /// Entity nid
        nid: Nid,
    },
    /// One specific version of the entity
    Version {
        /// Entity nid
        nid: Nid,
        /// Stamp that produced the version
        stamp_nid: Nid,
    },
    /// A semantic's pattern reference (chronology-level)
    SemanticPattern {
        /// Semantic entity nid
        nid: Nid,
    },
    /// A semantic's referenced component (chronology-level)
    SemanticReferencedComponent {
        /// Semantic entity nid
        nid: Nid,
    },

    // ------------------------------------------------------------------
    // Version-anchored
    // ------------------------------------------------------------------
    /// The stamp of one version
    VersionStamp {
        /// Entity nid
        nid: Nid,
        /// Stamp that produced the version
        stamp_nid: Nid,
    },
    /// A pattern version's meaning
    PatternMeaning {
        /// Pattern entity nid
        nid: Nid,
        /// Stamp that produced the version
        stamp_nid: Nid,
    },
    /// A pattern version's purpose
    PatternPurpose {
        /// Pattern entity nid
        nid: Nid,
        /// Stamp that produced the version
        stamp_nid: Nid,
    },
    /// A pattern version's whole field-definition list
    FieldDefinitionList {
        /// Pattern entity nid
        nid: Nid,
        /// Stamp that produced the version
        stamp_nid: Nid,
    },
    /// One slot of a pattern version's field-definition list
    FieldDefinitionListItem {
        /// Pattern entity nid
        nid: Nid,
        /// Stamp that produced the version
        stamp_nid: Nid,
        /// Owning pattern nid (wildcardable independently of `nid`)
        pattern_nid: Nid,
        /// Position in the list
        index: i32,
    },
    /// A semantic version's whole field list
    SemanticFieldList {
        /// Semantic entity nid
        nid: Nid,
        /// Stamp that produced the version
        stamp_nid: Nid,
    },
    /// One value of a semantic version's field list
    SemanticFieldListItem {
        /// Semantic entity nid
        nid: Nid,
        /// Stamp that produced the version
        stamp_nid: Nid,
        /// Pattern the semantic conforms to
        pattern_nid: Nid,
        /// Position in the list
        index: i32,
    },
    /// The status field of one version's stamp
    StampStatus {
        /// Entity nid
        nid: Nid,
        /// Stamp that produced the version
        stamp_nid: Nid,
    },
    /// The time field of one version's stamp
    StampTime {
        /// Entity nid
        nid: Nid,
        /// Stamp that produced the version
        stamp_nid: Nid,
    },
    /// The author field of one version's stamp
    StampAuthor {
        /// Entity nid
        nid: Nid,
        /// Stamp that produced the version
        stamp_nid: Nid,
    },
    /// The module field of one version's stamp
    StampModule {
        /// Entity nid
        nid: Nid,
        /// Stamp that produced the version
        stamp_nid: Nid,
    },
    /// The path field of one version's stamp
    StampPath {
        /// Entity nid
        nid: Nid,
        /// Stamp that produced the version
        stamp_nid: Nid,
    },
}

/// Wildcard-aware comparison for nid components
#[inline]
fn nid_matches(pattern: Nid, concrete: Nid) -> bool {
    pattern.is_wildcard() || pattern == concrete
}

/// Wildcard-aware comparison for index components
#[inline]
fn index_matches(pattern: i32, concrete: i32) -> bool {
    pattern == WILDCARD_INDEX || pattern == concrete
}

impl FieldLocator {
    /// Tag naming this variant
    ///
    /// The tag is the wire discriminant of the binary form; changing a
    /// tag breaks every encoded locator in the wild.
    pub fn tag(&self) -> &'static str {
        match self {
            FieldLocator::Chronology { .. } => "Chronology",
            FieldLocator::PublicId { .. } => "PublicId",
            FieldLocator::VersionSet { .. } => "VersionSet",
            FieldLocator::Version { .. } => "Version",
            FieldLocator::SemanticPattern { .. } => "SemanticPattern",
            FieldLocator::SemanticReferencedComponent { .. } => "SemanticReferencedComponent",
            FieldLocator::VersionStamp { .. } => "VersionStamp",
            FieldLocator::PatternMeaning { .. } => "PatternMeaning",
            FieldLocator::PatternPurpose { .. } => "PatternPurpose",
            FieldLocator::FieldDefinitionList { .. } => "FieldDefinitionList",
            FieldLocator::FieldDefinitionListItem { .. } => "FieldDefinitionListItem",
            FieldLocator::SemanticFieldList { .. } => "SemanticFieldList",
            FieldLocator::SemanticFieldListItem { .. } => "SemanticFieldListItem",
            FieldLocator::StampStatus { .. } => "StampStatus",
            FieldLocator::StampTime { .. } => "StampTime",
            FieldLocator::StampAuthor { .. } => "StampAuthor",
            FieldLocator::StampModule { .. } => "StampModule",
            FieldLocator::StampPath { .. } => "StampPath",
        }
    }

    /// The entity nid component (possibly wildcard)
    pub fn entity_nid(&self) -> Nid {
        match *self {
            FieldLocator::Chronology { nid }
            | FieldLocator::PublicId { nid }
            | FieldLocator::VersionSet { nid }
            | FieldLocator::SemanticPattern { nid }
            | FieldLocator::SemanticReferencedComponent { nid }
            | FieldLocator::Version { nid, .. }
            | FieldLocator::VersionStamp { nid, .. }
            | FieldLocator::PatternMeaning { nid, .. }
            | FieldLocator::PatternPurpose { nid, .. }
            | FieldLocator::FieldDefinitionList { nid, .. }
            | FieldLocator::FieldDefinitionListItem { nid, .. }
            | FieldLocator::SemanticFieldList { nid, .. }
            | FieldLocator::SemanticFieldListItem { nid, .. }
            | FieldLocator::StampStatus { nid, .. }
            | FieldLocator::StampTime { nid, .. }
            | FieldLocator::StampAuthor { nid, .. }
            | FieldLocator::StampModule { nid, .. }
            | FieldLocator::StampPath { nid, .. } => nid,
        }
    }

    /// The stamp nid component, for version-anchored variants
    pub fn stamp_nid(&self) -> Option<Nid> {
        match *self {
            FieldLocator::Chronology { .. }
            | FieldLocator::PublicId { .. }
            | FieldLocator::VersionSet { .. }
            | FieldLocator::SemanticPattern { .. }
            | FieldLocator::SemanticReferencedComponent { .. } => None,
            FieldLocator::Version { stamp_nid, .. }
            | FieldLocator::VersionStamp { stamp_nid, .. }
            | FieldLocator::PatternMeaning { stamp_nid, .. }
            | FieldLocator::PatternPurpose { stamp_nid, .. }
            | FieldLocator::FieldDefinitionList { stamp_nid, .. }
            | FieldLocator::FieldDefinitionListItem { stamp_nid, .. }
            | FieldLocator::SemanticFieldList { stamp_nid, .. }
            | FieldLocator::SemanticFieldListItem { stamp_nid, .. }
            | FieldLocator::StampStatus { stamp_nid, .. }
            | FieldLocator::StampTime { stamp_nid, .. }
            | FieldLocator::StampAuthor { stamp_nid, .. }
            | FieldLocator::StampModule { stamp_nid, .. }
            | FieldLocator::StampPath { stamp_nid, .. } => Some(stamp_nid),
        }
    }

    /// Whether this locator is anchored to one specific version
    pub fn is_version_anchored(&self) -> bool {
        self.stamp_nid().is_some() && !matches!(self, FieldLocator::Version { .. })
    }

    /// Whether any component is a wildcard
    pub fn has_wildcard(&self) -> bool {
        let nid_wild = self.entity_nid().is_wildcard();
        let stamp_wild = self.stamp_nid().map_or(false, |s| s.is_wildcard());
        let item_wild = match *self {
            FieldLocator::FieldDefinitionListItem {
                pattern_nid, index, ..
            }
            | FieldLocator::SemanticFieldListItem {
                pattern_nid, index, ..
            } => pattern_nid.is_wildcard() || index == WILDCARD_INDEX,
            _ => false,
        };
        nid_wild || stamp_wild || item_wild
    }

    /// Asymmetric wildcard match
    ///
    /// Variants must be identical; then every component of `self` either
    /// is a wildcard (matches anything) or must equal the corresponding
    /// component of `other` exactly. A concrete component in `self` does
    /// NOT match a wildcard in `other`.
    pub fn matches(&self, other: &FieldLocator) -> bool {
        use FieldLocator::*;
        match (*self, *other) {
            (Chronology { nid: a }, Chronology { nid: b })
            | (PublicId { nid: a }, PublicId { nid: b })
            | (VersionSet { nid: a }, VersionSet { nid: b })
            | (SemanticPattern { nid: a }, SemanticPattern { nid: b })
            | (
                SemanticReferencedComponent { nid: a },
                SemanticReferencedComponent { nid: b },
            ) => nid_matches(a, b),

            (
                Version {
                    nid: a,
                    stamp_nid: sa,
                },
                Version {
                    nid: b,
                    stamp_nid: sb,
                },
            )
            | (
                VersionStamp {
                    nid: a,
                    stamp_nid: sa,
                },
                VersionStamp {
                    nid: b,
                    stamp_nid: sb,
                },
            )
            | (
                PatternMeaning {
                    nid: a,
                    stamp_nid: sa,
                },
                PatternMeaning {
                    nid: b,
                    stamp_nid: sb,
                },
            )
            | (
                PatternPurpose {
                    nid: a,
                    stamp_nid: sa,
                },
                PatternPurpose {
                    nid: b,
                    stamp_nid: sb,
                },
            )
            | (
                FieldDefinitionList {
                    nid: a,
                    stamp_nid: sa,
                },
                FieldDefinitionList {
                    nid: b,
                    stamp_nid: sb,
                },
            )
            | (
                SemanticFieldList {
                    nid: a,
                    stamp_nid: sa,
                },
                SemanticFieldList {
                    nid: b,
                    stamp_nid: sb,
                },
            )
            | (
                StampStatus {
                    nid: a,
                    stamp_nid: sa,
                },
                StampStatus {
                    nid: b,
                    stamp_nid: sb,
                },
            )
            | (
                StampTime {
                    nid: a,
                    stamp_nid: sa,
                },
                StampTime {
                    nid: b,
                    stamp_nid: sb,
                },
            )
            | (
                StampAuthor {
                    nid: a,
                    stamp_nid: sa,
                },
                StampAuthor {
                    nid: b,
                    stamp_nid: sb,
                },
            )
            | (
                StampModule {
                    nid: a,
                    stamp_nid: sa,
                },
                StampModule {
                    nid: b,
                    stamp_nid: sb,
                },
            )
            | (
                StampPath {
                    nid: a,
                    stamp_nid: sa,
                },
                StampPath {
                    nid: b,
                    stamp_nid: sb,
                },
            ) => nid_matches(a, b) && nid_matches(sa, sb),

            (
                FieldDefinitionListItem {
                    nid: a,
                    stamp_nid: sa,
                    pattern_nid: pa,
                    index: ia,
                },
                FieldDefinitionListItem {
                    nid: b,
                    stamp_nid: sb,
                    pattern_nid: pb,
                    index: ib,
                },
            )
            | (
                SemanticFieldListItem {
                    nid: a,
                    stamp_nid: sa,
                    pattern_nid: pa,
                    index: ia,
                },
                SemanticFieldListItem {
                    nid: b,
                    stamp_nid: sb,
                    pattern_nid: pb,
                    index: ib,
                },
            ) => {
                nid_matches(a, b)
                    && nid_matches(sa, sb)
                    && nid_matches(pa, pb)
                    && index_matches(ia, ib)
            }

            // Different variants never match
            _ => false,
        }
    }
}

impl fmt::Display for FieldLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[nid={}", self.tag(), self.entity_nid())?;
        if let Some(stamp) = self.stamp_nid() {
            write!(f, " stamp={}", stamp)?;
        }
        match *self {
            FieldLocator::FieldDefinitionListItem {
                pattern_nid, index, ..
            }
            | FieldLocator::SemanticFieldListItem {
                pattern_nid, index, ..
            } => {
                write!(f, " pattern={}", pattern_nid)?;
                if index == WILDCARD_INDEX {
                    write!(f, " index=*")?;
                } else {
                    write!(f, " index={}", index)?;
                }
            }
            _ => {}
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_asymmetry_wildcard_vs_concrete() {
        let wild = FieldLocator::Version {
            nid: Nid::WILDCARD,
            stamp_nid: Nid::new(5),
        };
        let concrete = FieldLocator::Version {
            nid: Nid::new(42),
            stamp_nid: Nid::new(5),
        };

        assert!(wild.matches(&concrete), "Wildcard pattern must match");
        assert!(
            !concrete.matches(&wild),
            "Concrete pattern must not match a wildcard target"
        );
    }

    #[test]
    fn test_equality_implies_match() {
        let locators = [
            FieldLocator::Chronology { nid: Nid::new(1) },
            FieldLocator::StampAuthor {
                nid: Nid::new(2),
                stamp_nid: Nid::new(3),
            },
            FieldLocator::SemanticFieldListItem {
                nid: Nid::new(4),
                stamp_nid: Nid::new(5),
                pattern_nid: Nid::new(6),
                index: 2,
            },
        ];
        for locator in locators {
            assert!(
                locator.matches(&locator),
                "{} must match itself",
                locator
            );
        }
    }

    #[test]
    fn test_match_rejects_different_variants() {
        let status = FieldLocator::StampStatus {
            nid: Nid::WILDCARD,
            stamp_nid: Nid::WILDCARD,
        };
        let author = FieldLocator::StampAuthor {
            nid: Nid::new(1),
            stamp_nid: Nid::new(2),
        };
        assert!(
            !status.matches(&author),
            "All-wildcard pattern still must not cross variants"
        );
    }

    #[test]
    fn test_match_list_item_components_independent() {
        let pattern = FieldLocator::SemanticFieldListItem {
            nid: Nid::WILDCARD,
            stamp_nid: Nid::WILDCARD,
            pattern_nid: Nid::new(9),
            index: WILDCARD_INDEX,
        };
        let hit = FieldLocator::SemanticFieldListItem {
            nid: Nid::new(1),
            stamp_nid: Nid::new(2),
            pattern_nid: Nid::new(9),
            index: 4,
        };
        let miss = FieldLocator::SemanticFieldListItem {
            nid: Nid::new(1),
            stamp_nid: Nid::new(2),
            pattern_nid: Nid::new(10),
            index: 4,
        };

        assert!(pattern.matches(&hit));
        assert!(
            !pattern.matches(&miss),
            "Concrete pattern_nid must still be enforced"
        );
    }

    #[test]
    fn test_match_author_of_any_stamp() {
        // "The author field of any version of any entity"
        let any_author = FieldLocator::StampAuthor {
            nid: Nid::WILDCARD,
            stamp_nid: Nid::WILDCARD,
        };
        let specific = FieldLocator::StampAuthor {
            nid: Nid::new(100),
            stamp_nid: Nid::new(7),
        };
        assert!(any_author.matches(&specific));
    }

    #[test]
    fn test_entity_nid_and_stamp_nid_accessors() {
        let chronology = FieldLocator::PublicId { nid: Nid::new(3) };
        assert_eq!(chronology.entity_nid(), Nid::new(3));
        assert_eq!(chronology.stamp_nid(), None);
        assert!(!chronology.is_version_anchored());

        let versioned = FieldLocator::StampPath {
            nid: Nid::new(3),
            stamp_nid: Nid::new(8),
        };
        assert_eq!(versioned.stamp_nid(), Some(Nid::new(8)));
        assert!(versioned.is_version_anchored());

        // Version names a version but addresses the chronology's version set
        let version = FieldLocator::Version {
            nid: Nid::new(3),
            stamp_nid: Nid::new(8),
        };
        assert!(!version.is_version_anchored());
    }

    #[test]
    fn test_has_wildcard() {
        assert!(!FieldLocator::Chronology { nid: Nid::new(1) }.has_wildcard());
        assert!(FieldLocator::Chronology { nid: Nid::WILDCARD }.has_wildcard());
        assert!(FieldLocator::FieldDefinitionListItem {
            nid: Nid::new(1),
            stamp_nid: Nid::new(2),
            pattern_nid: Nid::new(3),
            index: WILDCARD_INDEX,
        }
        .has_wildcard());
    }

    #[test]
    fn test_display_shows_wildcards() {
        let locator = FieldLocator::SemanticFieldListItem {
            nid: Nid::WILDCARD,
            stamp_nid: Nid::new(2),
            pattern_nid: Nid::new(3),
            index: WILDCARD_INDEX,
        };
        let text = format!("{}", locator);
        assert!(text.contains("SemanticFieldListItem"));
        assert!(text.contains("nid=*"));
        assert!(text.contains("index=*"));
    }

    #[test]
    fn test_serde_roundtrip() {
        let locator = FieldLocator::FieldDefinitionListItem {
            nid: Nid::new(1),
            stamp_nid: Nid::new(2),
            pattern_nid: Nid::new(3),
            index: 0,
        };
        let json = serde_json::to_string(&locator).unwrap();
        let restored: FieldLocator = serde_json::from_str(&json).unwrap();
        assert_eq!(locator, restored);
    }
}
