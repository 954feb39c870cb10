//! Core types for the Glossa terminology store
//!
//! This crate defines the foundational model every other Glossa crate
//! builds on:
//!
//! - Identifiers: [`Nid`], [`PublicId`], [`EntityKind`]
//! - Provenance: [`Stamp`], [`Status`], [`Timestamp`] (with the
//!   uncommitted sentinel)
//! - The entity model: [`EntityRecord`], [`EntityVersion`],
//!   [`VersionData`], and the canonical shared [`Entity`]
//! - Resolution results: [`Latest`]
//! - Field values: [`FieldValue`], [`FieldDefinition`]
//! - Service seams: [`EntityStore`], [`EntitySource`], [`StampSource`],
//!   [`EntityWriter`], [`ViewCalculator`], [`ChangeBus`],
//!   [`TransactionService`], [`Transaction`]
//! - The error taxonomy: [`Error`], [`Result`]
//!
//! Everything here is synchronous and in-memory; persistence and policy
//! live behind the traits.

pub mod entity;
pub mod error;
pub mod latest;
pub mod stamp;
pub mod timestamp;
pub mod traits;
pub mod types;
pub mod value;

pub use entity::{
    ChangeCallback, Entity, EntityRecord, EntityVersion, PatternVersionData, SemanticRefs,
    SemanticVersionData, StampVersionData, VersionData,
};
pub use error::{Error, Result};
pub use latest::Latest;
pub use stamp::{Stamp, Status};
pub use timestamp::Timestamp;
pub use traits::{
    BusCallback, ChangeBus, EntitySource, EntityStore, EntityWriter, StampSource, Transaction,
    TransactionService, ViewCalculator,
};
pub use types::{EntityKind, Nid, PublicId};
pub use value::{FieldDataType, FieldDefinition, FieldValue};
