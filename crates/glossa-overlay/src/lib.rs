//! Transactional editable overlays for the Glossa version store
//!
//! The write side of the system:
//!
//! - [`EditableOverlay`]: a working copy bound to one (entity, edit
//!   stamp) pair, with the save/commit/reset lifecycle
//! - [`OverlayCache`]: the canonical weak-valued cache guaranteeing one
//!   overlay per pair
//! - [`MemoryTransactionService`]: the in-memory transaction service
//!   minting uncommitted stamps and committing them with one shared
//!   timestamp

pub mod cache;
pub mod overlay;
pub mod transaction;

pub use cache::OverlayCache;
pub use overlay::EditableOverlay;
pub use transaction::{MemoryTransaction, MemoryTransactionService};
