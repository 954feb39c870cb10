//! Field locators for the Glossa terminology store
//!
//! A locator is a structured address naming one field anywhere in the
//! versioned entity graph — anchored to a chronology or to a specific
//! version, with independently wildcardable numeric components. Locators
//! drive both the read path (field projection) and the write path
//! (overlay field edits), and carry a compact binary form for exchange.
//!
//! - [`FieldLocator`]: the closed variant set and its asymmetric
//!   wildcard [`FieldLocator::matches`]
//! - [`encode`] / [`decode`]: the tagged binary form

pub mod codec;
pub mod key;

pub use codec::{decode, encode};
pub use key::{FieldLocator, WILDCARD_INDEX};
