//! Read views over the Glossa version store
//!
//! Everything here is a pure computation over canonical entities plus an
//! externally supplied view policy:
//!
//! - [`resolver`]: latest-version resolution, contradiction detection,
//!   and per-version classification
//! - [`snapshot`]: the latest/uncommitted/historic partition with its
//!   mutable display working set
//! - [`fields`]: locator-addressed field reads
//! - [`testing`]: view-policy doubles for tests and demos

pub mod fields;
pub mod resolver;
pub mod snapshot;
pub mod testing;

pub use fields::{read_field, FieldRead};
pub use resolver::{classify, resolve, resolve_pattern, VersionClass};
pub use snapshot::{project, VersionSnapshot};
