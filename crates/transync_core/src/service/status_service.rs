//! Translation status use-case service.
//!
//! # Responsibility
//! - Resolve a group, read the job ledger, and hand both to the engine.
//! - Emit one diagnostic event per query.
//!
//! # Invariants
//! - The group is resolved before the ledger is read, so ledger data is
//!   never older than the group snapshot.
//! - Nothing is cached between calls.

use crate::model::item::ItemId;
use crate::repo::group_repo::GroupResolver;
use crate::repo::job_repo::JobLedger;
use crate::status::engine::{LocaleState, RowState, StatusSnapshot};
use crate::status::StatusError;
use log::{debug, warn};
use serde::Serialize;

/// Row state plus column states for a fixed list of locales.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowOverview {
    pub item_id: ItemId,
    pub row: RowState,
    pub columns: Vec<(String, LocaleState)>,
}

/// Status facade over a group resolver and a job ledger.
pub struct StatusService<G: GroupResolver, J: JobLedger> {
    resolver: G,
    ledger: J,
}

impl<G: GroupResolver, J: JobLedger> StatusService<G, J> {
    pub fn new(resolver: G, ledger: J) -> Self {
        Self { resolver, ledger }
    }

    /// Takes a fresh snapshot of the group containing `item_id`.
    pub fn snapshot(&self, item_id: ItemId) -> Result<StatusSnapshot, StatusError> {
        let group = self.resolver.resolve_group(item_id).inspect_err(|err| {
            warn!(
                "event=status_snapshot module=status status=error item_id={item_id} error={err}"
            );
        })?;
        let active = self.ledger.active_locales(&group)?;
        Ok(StatusSnapshot::new(group, active))
    }

    /// Column state for `(item_id, locale)`.
    pub fn locale_status(
        &self,
        item_id: ItemId,
        locale: &str,
    ) -> Result<LocaleState, StatusError> {
        let state = self.snapshot(item_id)?.locale_state(item_id, locale);
        debug!(
            "event=locale_status module=status status=ok item_id={item_id} locale={locale} state={state:?}"
        );
        Ok(state)
    }

    /// Overall row state for `item_id`.
    pub fn row_status(&self, item_id: ItemId) -> Result<RowState, StatusError> {
        let state = self.snapshot(item_id)?.row_state(item_id)?;
        debug!("event=row_status module=status status=ok item_id={item_id} state={state:?}");
        Ok(state)
    }

    /// Row plus column states from a single snapshot.
    pub fn row_overview(
        &self,
        item_id: ItemId,
        locales: &[String],
    ) -> Result<RowOverview, StatusError> {
        let snapshot = self.snapshot(item_id)?;
        let row = snapshot.row_state(item_id)?;
        let columns = locales
            .iter()
            .map(|locale| (locale.clone(), snapshot.locale_state(item_id, locale)))
            .collect();
        debug!(
            "event=row_overview module=status status=ok item_id={item_id} group_key={} columns={}",
            snapshot.group().key(),
            locales.len()
        );
        Ok(RowOverview {
            item_id,
            row,
            columns,
        })
    }
}
