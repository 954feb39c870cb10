//! Field value types
//!
//! This module defines:
//! - FieldValue: the closed value union carried by semantic fields
//! - FieldDataType: the declared type of a pattern field slot
//! - FieldDefinition: one slot of a pattern's ordered field schema
//!
//! ## Type Rules
//!
//! - Different variants are NEVER equal, even for the same "value":
//!   `Integer(1) != Float(1.0)`
//! - Float equality follows IEEE-754: `NaN != NaN`, `-0.0 == 0.0`

use crate::types::{Nid, PublicId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single semantic field value
///
/// Semantic versions carry an ordered list of these, positionally matched
/// against the owning pattern's field definitions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FieldValue {
    /// UTF-8 string
    String(String),
    /// 64-bit signed integer
    Integer(i64),
    /// 64-bit floating point (IEEE-754)
    Float(f64),
    /// Boolean value
    Boolean(bool),
    /// Reference to another component by nid
    Component(Nid),
    /// Reference by public id (for values not yet resolved to a nid)
    PublicId(PublicId),
}

// Custom PartialEq for IEEE-754 float semantics; no Eq because of Float.
impl PartialEq for FieldValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FieldValue::String(a), FieldValue::String(b)) => a == b,
            (FieldValue::Integer(a), FieldValue::Integer(b)) => a == b,
            (FieldValue::Float(a), FieldValue::Float(b)) => a == b,
            (FieldValue::Boolean(a), FieldValue::Boolean(b)) => a == b,
            (FieldValue::Component(a), FieldValue::Component(b)) => a == b,
            (FieldValue::PublicId(a), FieldValue::PublicId(b)) => a == b,
            // Different variants are never equal
            _ => false,
        }
    }
}

impl FieldValue {
    /// Get the variant name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::String(_) => "String",
            FieldValue::Integer(_) => "Integer",
            FieldValue::Float(_) => "Float",
            FieldValue::Boolean(_) => "Boolean",
            FieldValue::Component(_) => "Component",
            FieldValue::PublicId(_) => "PublicId",
        }
    }

    /// The declared data type this value satisfies
    pub fn data_type(&self) -> FieldDataType {
        match self {
            FieldValue::String(_) => FieldDataType::String,
            FieldValue::Integer(_) => FieldDataType::Integer,
            FieldValue::Float(_) => FieldDataType::Float,
            FieldValue::Boolean(_) => FieldDataType::Boolean,
            FieldValue::Component(_) => FieldDataType::Component,
            FieldValue::PublicId(_) => FieldDataType::Component,
        }
    }

    /// Extract the component nid, if this is a component reference
    pub fn as_component(&self) -> Option<Nid> {
        match self {
            FieldValue::Component(nid) => Some(*nid),
            _ => None,
        }
    }

    /// Extract the string, if this is a string value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::String(s) => write!(f, "{:?}", s),
            FieldValue::Integer(i) => write!(f, "{}", i),
            FieldValue::Float(x) => write!(f, "{}", x),
            FieldValue::Boolean(b) => write!(f, "{}", b),
            FieldValue::Component(nid) => write!(f, "->{}", nid),
            FieldValue::PublicId(id) => write!(f, "->{}", id),
        }
    }
}

/// Declared data type of a pattern field slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldDataType {
    /// UTF-8 string
    String,
    /// 64-bit signed integer
    Integer,
    /// 64-bit floating point
    Float,
    /// Boolean
    Boolean,
    /// Reference to another component
    Component,
}

/// One slot of a pattern's ordered field schema
///
/// A pattern version carries an ordered list of these; semantic versions
/// conforming to the pattern supply one [`FieldValue`] per slot, matched
/// by `index`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Concept nid naming what the field means
    pub meaning: Nid,
    /// Concept nid naming why the field exists
    pub purpose: Nid,
    /// Declared value type for the slot
    pub data_type: FieldDataType,
    /// Position within the pattern's field list
    pub index: i32,
}

impl FieldDefinition {
    /// Create a field definition
    pub fn new(meaning: Nid, purpose: Nid, data_type: FieldDataType, index: i32) -> Self {
        FieldDefinition {
            meaning,
            purpose,
            data_type,
            index,
        }
    }
}
