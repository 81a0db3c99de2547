//! Translation status engine.
//!
//! # Responsibility
//! - Derive per-locale staleness for a translation group.
//! - Map `(group, active locales, staleness, viewer)` to one column state
//!   or one row state.
//!
//! # Invariants
//! - Every function here is pure; no I/O, no caching across calls.
//! - Precedence is total: exactly one state per query.
//! - In-progress masks staleness; a single-locale update beats update-all.

use crate::model::item::ItemId;
use crate::repo::item_repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod engine;
pub mod staleness;

/// Errors raised while answering status queries.
#[derive(Debug)]
pub enum StatusError {
    /// Item does not exist, or is not a member of the resolved group.
    NotFound(ItemId),
    /// Backing store failure from a collaborator.
    Repo(RepoError),
}

impl Display for StatusError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "content item not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StatusError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::NotFound(_) => None,
        }
    }
}

impl From<RepoError> for StatusError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
            other => Self::Repo(other),
        }
    }
}
