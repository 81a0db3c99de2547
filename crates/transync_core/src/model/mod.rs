//! Domain model for translation groups and vendor jobs.
//!
//! # Responsibility
//! - Define the read views the status engine and router operate on.
//! - Enforce translation-group shape invariants at construction time.
//!
//! # Invariants
//! - A group has exactly one parent and at most one child per locale.
//! - No child shares the parent's locale.
//! - Models are snapshots; nothing here writes back to host storage.

pub mod group;
pub mod item;
pub mod job;
