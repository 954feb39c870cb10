//! Binary locator serialization.
//!
//! Every locator encodes as a tagged record:
//!
//! ```text
//! Locator Layout:
//! ┌────────────────────────────┬──────────────────────────────────────┐
//! │ Tag (len-prefixed UTF-8)   │ Components (fixed order, i32 LE)     │
//! └────────────────────────────┴──────────────────────────────────────┘
//!
//! String Layout:
//! ┌──────────────────┬──────────────────────────────────────────────┐
//! │ Length (4 bytes) │ UTF-8 bytes                                  │
//! └──────────────────┴──────────────────────────────────────────────┘
//! ```
//!
//! The tag is the variant name; components follow in the order the
//! variant declares them. Decoding reads the tag, dispatches to the
//! matching variant decoder, and must consume the buffer exactly.
//! An unrecognized tag is a hard error — there is no partial or lenient
//! decoding — and encode→decode→encode round-trips byte-for-byte.

use crate::key::FieldLocator;
use glossa_core::{Error, Nid, Result};

/// Encode a locator to its binary form
pub fn encode(locator: &FieldLocator) -> Vec<u8> {
    let mut bytes = Vec::new();
    write_string(&mut bytes, locator.tag());
    match *locator {
        FieldLocator::Chronology { nid }
        | FieldLocator::PublicId { nid }
        | FieldLocator::VersionSet { nid }
        | FieldLocator::SemanticPattern { nid }
        | FieldLocator::SemanticReferencedComponent { nid } => {
            write_nid(&mut bytes, nid);
        }
        FieldLocator::Version { nid, stamp_nid }
        | FieldLocator::VersionStamp { nid, stamp_nid }
        | FieldLocator::PatternMeaning { nid, stamp_nid }
        | FieldLocator::PatternPurpose { nid, stamp_nid }
        | FieldLocator::FieldDefinitionList { nid, stamp_nid }
        | FieldLocator::SemanticFieldList { nid, stamp_nid }
        | FieldLocator::StampStatus { nid, stamp_nid }
        | FieldLocator::StampTime { nid, stamp_nid }
        | FieldLocator::StampAuthor { nid, stamp_nid }
        | FieldLocator::StampModule { nid, stamp_nid }
        | FieldLocator::StampPath { nid, stamp_nid } => {
            write_nid(&mut bytes, nid);
            write_nid(&mut bytes, stamp_nid);
        }
        FieldLocator::FieldDefinitionListItem {
            nid,
            stamp_nid,
            pattern_nid,
            index,
        }
        | FieldLocator::SemanticFieldListItem {
            nid,
            stamp_nid,
            pattern_nid,
            index,
        } => {
            write_nid(&mut bytes, nid);
            write_nid(&mut bytes, stamp_nid);
            write_nid(&mut bytes, pattern_nid);
            bytes.extend_from_slice(&index.to_le_bytes());
        }
    }
    bytes
}

/// Decode a locator from its binary form
///
/// The buffer must contain exactly one encoded locator; trailing bytes
/// are an error.
pub fn decode(bytes: &[u8]) -> Result<FieldLocator> {
    let mut cursor = Cursor::new(bytes);
    let tag = cursor.read_string()?;

    // Every arm returns its reconstructed variant; only a genuinely
    // unknown tag reaches the trailing error.
    let locator = match tag.as_str() {
        "Chronology" => FieldLocator::Chronology {
            nid: cursor.read_nid()?,
        },
        "PublicId" => FieldLocator::PublicId {
            nid: cursor.read_nid()?,
        },
        "VersionSet" => FieldLocator::VersionSet {
            nid: cursor.read_nid()?,
        },
        "SemanticPattern" => FieldLocator::SemanticPattern {
            nid: cursor.read_nid()?,
        },
        "SemanticReferencedComponent" => FieldLocator::SemanticReferencedComponent {
            nid: cursor.read_nid()?,
        },
        "Version" => FieldLocator::Version {
            nid: cursor.read_nid()?,
            stamp_nid: cursor.read_nid()?,
        },
        "VersionStamp" => FieldLocator::VersionStamp {
            nid: cursor.read_nid()?,
            stamp_nid: cursor.read_nid()?,
        },
        "PatternMeaning" => FieldLocator::PatternMeaning {
            nid: cursor.read_nid()?,
            stamp_nid: cursor.read_nid()?,
        },
        "PatternPurpose" => FieldLocator::PatternPurpose {
            nid: cursor.read_nid()?,
            stamp_nid: cursor.read_nid()?,
        },
        "FieldDefinitionList" => FieldLocator::FieldDefinitionList {
            nid: cursor.read_nid()?,
            stamp_nid: cursor.read_nid()?,
        },
        "FieldDefinitionListItem" => FieldLocator::FieldDefinitionListItem {
            nid: cursor.read_nid()?,
            stamp_nid: cursor.read_nid()?,
            pattern_nid: cursor.read_nid()?,
            index: cursor.read_i32()?,
        },
        "SemanticFieldList" => FieldLocator::SemanticFieldList {
            nid: cursor.read_nid()?,
            stamp_nid: cursor.read_nid()?,
        },
        "SemanticFieldListItem" => FieldLocator::SemanticFieldListItem {
            nid: cursor.read_nid()?,
            stamp_nid: cursor.read_nid()?,
            pattern_nid: cursor.read_nid()?,
            index: cursor.read_i32()?,
        },
        "StampStatus" => FieldLocator::StampStatus {
            nid: cursor.read_nid()?,
            stamp_nid: cursor.read_nid()?,
        },
        "StampTime" => FieldLocator::StampTime {
            nid: cursor.read_nid()?,
            stamp_nid: cursor.read_nid()?,
        },
        "StampAuthor" => FieldLocator::StampAuthor {
            nid: cursor.read_nid()?,
            stamp_nid: cursor.read_nid()?,
        },
        "StampModule" => FieldLocator::StampModule {
            nid: cursor.read_nid()?,
            stamp_nid: cursor.read_nid()?,
        },
        "StampPath" => FieldLocator::StampPath {
            nid: cursor.read_nid()?,
            stamp_nid: cursor.read_nid()?,
        },
        _ => return Err(Error::UnknownLocatorTag(tag)),
    };

    cursor.finish()?;
    Ok(locator)
}

fn write_string(bytes: &mut Vec<u8>, s: &str) {
    bytes.extend_from_slice(&(s.len() as u32).to_le_bytes());
    bytes.extend_from_slice(s.as_bytes());
}

fn write_nid(bytes: &mut Vec<u8>, nid: Nid) {
    bytes.extend_from_slice(&nid.as_i32().to_le_bytes());
}

/// Byte cursor with hard truncation errors
struct Cursor<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> Cursor<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Cursor { bytes, position: 0 }
    }

    fn take(&mut self, count: usize) -> Result<&'a [u8]> {
        let remaining = self.bytes.len() - self.position;
        if remaining < count {
            return Err(Error::TruncatedLocator {
                needed: count - remaining,
                remaining,
            });
        }
        let slice = &self.bytes[self.position..self.position + count];
        self.position += count;
        Ok(slice)
    }

    fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.take(4)?;
        Ok(u32::from_le_bytes(bytes.try_into().expect("4-byte slice")))
    }

    fn read_i32(&mut self) -> Result<i32> {
        let bytes = self.take(4)?;
        Ok(i32::from_le_bytes(bytes.try_into().expect("4-byte slice")))
    }

    fn read_nid(&mut self) -> Result<Nid> {
        Ok(Nid::new(self.read_i32()?))
    }

    fn read_string(&mut self) -> Result<String> {
        let len = self.read_u32()? as usize;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec())
            .map_err(|e| Error::Serialization(format!("locator tag is not UTF-8: {}", e)))
    }

    /// Require the buffer to be fully consumed
    fn finish(&self) -> Result<()> {
        let remaining = self.bytes.len() - self.position;
        if remaining != 0 {
            return Err(Error::Serialization(format!(
                "locator decode left {} trailing bytes",
                remaining
            )));
        }
        Ok(())
    }
}
