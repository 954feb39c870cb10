//! Canonical entity identity for the Glossa terminology store
//!
//! This crate owns the shared mutable heart of the system:
//!
//! - [`ApplyContext`]: the thread-confinement token every mutating call
//!   is checked against
//! - [`EntityRegistry`]: the weak-valued canonical cache with
//!   ingest-on-read and write-through versions
//! - [`MemoryStore`]: the in-memory reference backing store
//! - [`ChannelBus`]: the synchronous change-notification bus
//!
//! The registry is constructed once per session and passed by reference;
//! there is no global instance.

pub mod bus;
pub mod context;
pub mod registry;
pub mod store;

pub use bus::ChannelBus;
pub use context::ApplyContext;
pub use registry::EntityRegistry;
pub use store::MemoryStore;
