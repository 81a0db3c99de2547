//! Host storage collaborators and their SQLite implementations.
//!
//! # Responsibility
//! - Define the read contracts the status engine depends on
//!   (`GroupResolver`, `JobLedger`).
//! - Keep SQL details behind those contracts.
//!
//! # Invariants
//! - Read paths reject invalid persisted state instead of masking it.
//! - Missing items surface as `RepoError::NotFound`.

pub mod group_repo;
pub mod item_repo;
pub mod job_repo;
