//! Use-case services composed from injected collaborators.
//!
//! # Responsibility
//! - Wire host storage collaborators into the pure engines per request.
//! - Keep CLI/host layers decoupled from storage details.

pub mod status_service;
