//! Translation sync core for a content host and a vendor translation service.
//! Status derivation, bulk dispatch and the interchange codec live here.

pub mod config;
pub mod db;
pub mod dispatch;
pub mod interchange;
pub mod logging;
pub mod model;
pub mod repo;
pub mod route;
pub mod service;
pub mod status;

pub use config::{ConfigError, LocalePairing, SyncConfig};
pub use dispatch::{BulkAction, DispatchError, DispatchRequest, DispatchRouter};
pub use interchange::{decode, decode_file, encode, InterchangeError, StructuredContent};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::group::{GroupError, TranslationGroup};
pub use model::item::{ContentItem, ItemId, RevisionMarker};
pub use model::job::{JobId, JobRecord, JobStatus};
pub use repo::group_repo::{GroupResolver, SqliteGroupResolver};
pub use repo::item_repo::{ContentRepository, RepoError, RepoResult, SqliteContentRepository};
pub use repo::job_repo::{JobLedger, SqliteJobLedger};
pub use route::RouteAction;
pub use service::status_service::{RowOverview, StatusService};
pub use status::engine::{LocaleState, RowState, StatusSnapshot};
pub use status::staleness::StalenessIndex;
pub use status::StatusError;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
