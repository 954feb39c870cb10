//! Comprehensive integration suite for the version store
//!
//! Exercises the full stack — store, registry, resolver, projector,
//! overlays, transactions, locators — through the public `glossadb`
//! facade.

mod common;
mod contradiction;
mod identity;
mod locator_roundtrip;
mod overlay_lifecycle;
mod projection;
