//! Column and row state derivation.
//!
//! # Responsibility
//! - Compose group, active locales and staleness into a `StatusSnapshot`.
//! - Answer per-locale column queries and per-item row queries.
//!
//! # Invariants
//! - Column precedence: in progress, out of date, translated, none.
//! - Row precedence: busy, update single, update all, up to date.
//! - `is_self` is set when the viewer is the target or the group parent.

use crate::model::group::TranslationGroup;
use crate::model::item::{normalize_locale, ItemId};
use crate::route::{RouteAction, ACTION_UPDATE_ALL, ACTION_UPDATE_SINGLE};
use crate::status::staleness::StalenessIndex;
use crate::status::StatusError;
use serde::Serialize;
use std::collections::BTreeSet;

/// State of one `(item, locale)` column cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LocaleState {
    /// A vendor job for this locale (or the whole group) is in flight.
    InProgress,
    /// The translation for this locale lags its parent.
    OutOfDate { target: ItemId, is_self: bool },
    /// An up-to-date translation exists.
    Translated { target: ItemId, is_self: bool },
    /// No translation exists for this locale.
    None,
}

impl LocaleState {
    /// The item a column link should point at.
    pub fn target(&self) -> Option<ItemId> {
        match self {
            Self::OutOfDate { target, .. } | Self::Translated { target, .. } => Some(*target),
            Self::InProgress | Self::None => Option::None,
        }
    }
}

/// Parameters for re-submitting one stale locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateSingleRequest {
    pub source_id: ItemId,
    pub source_locale: String,
    pub target_locale: String,
    pub project_options_id: Option<String>,
}

/// Parameters for re-submitting every stale locale of a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateAllRequest {
    pub source_id: ItemId,
    pub source_locale: String,
}

/// Overall state of one item row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RowState {
    /// No translations and nothing in flight; no action offered.
    NotApplicable,
    /// The group (or the viewer's locale) is being processed.
    Busy,
    UpdateSingle(UpdateSingleRequest),
    UpdateAll(UpdateAllRequest),
    UpToDateChild,
    UpToDateParent,
}

impl RowState {
    /// Host action for states that offer one.
    pub fn route(&self) -> Option<RouteAction> {
        match self {
            Self::UpdateSingle(request) => {
                let mut action = RouteAction::new(ACTION_UPDATE_SINGLE)
                    .with("src_id", request.source_id.to_string())
                    .with("src_lang", request.source_locale.as_str())
                    .with("target_lang", request.target_locale.as_str());
                if let Some(options) = &request.project_options_id {
                    action = action.with("project_options", options.as_str());
                }
                Some(action)
            }
            Self::UpdateAll(request) => Some(
                RouteAction::new(ACTION_UPDATE_ALL)
                    .with("src_id", request.source_id.to_string())
                    .with("src_lang", request.source_locale.as_str()),
            ),
            Self::NotApplicable | Self::Busy | Self::UpToDateChild | Self::UpToDateParent => {
                Option::None
            }
        }
    }
}

/// Point-in-time inputs for status queries on one group.
///
/// The ledger read must come from data no older than the group snapshot;
/// callers build one snapshot per request and discard it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusSnapshot {
    group: TranslationGroup,
    active_locales: BTreeSet<String>,
    staleness: StalenessIndex,
}

impl StatusSnapshot {
    /// Builds a snapshot and derives staleness from it.
    pub fn new(group: TranslationGroup, active_locales: BTreeSet<String>) -> Self {
        let active_locales: BTreeSet<String> = active_locales
            .iter()
            .map(|locale| normalize_locale(locale))
            .collect();
        let staleness = StalenessIndex::compute(&group, &active_locales);
        Self {
            group,
            active_locales,
            staleness,
        }
    }

    pub fn group(&self) -> &TranslationGroup {
        &self.group
    }

    pub fn active_locales(&self) -> &BTreeSet<String> {
        &self.active_locales
    }

    pub fn staleness(&self) -> &StalenessIndex {
        &self.staleness
    }

    /// Column state for `locale` as seen from `viewer_id`'s row.
    pub fn locale_state(&self, viewer_id: ItemId, locale: &str) -> LocaleState {
        let locale = normalize_locale(locale);
        let parent_is_viewer = self.group.is_parent(viewer_id);

        if self.active_locales.contains(&locale) {
            return LocaleState::InProgress;
        }
        if let Some(stale) = self.staleness.out_of_date(&locale) {
            return LocaleState::OutOfDate {
                target: stale.id,
                is_self: stale.id == viewer_id || parent_is_viewer,
            };
        }
        if let Some(child) = self.group.child(&locale) {
            return LocaleState::Translated {
                target: child.id,
                is_self: child.id == viewer_id || parent_is_viewer,
            };
        }
        LocaleState::None
    }

    /// Overall row state for `viewer_id`.
    ///
    /// # Errors
    /// - `StatusError::NotFound` when the viewer is not a member of the group.
    pub fn row_state(&self, viewer_id: ItemId) -> Result<RowState, StatusError> {
        let viewer = self
            .group
            .member(viewer_id)
            .ok_or(StatusError::NotFound(viewer_id))?;
        let parent = self.group.parent();
        let viewer_is_parent = parent.id == viewer_id;

        if !self.group.has_children() && self.active_locales.is_empty() {
            return Ok(RowState::NotApplicable);
        }

        if !self.active_locales.is_empty()
            && (viewer_is_parent || self.active_locales.contains(&viewer.locale))
        {
            return Ok(RowState::Busy);
        }

        if self.staleness.contains(&viewer.locale) {
            return Ok(RowState::UpdateSingle(UpdateSingleRequest {
                source_id: parent.id,
                source_locale: parent.locale.clone(),
                target_locale: viewer.locale.clone(),
                project_options_id: viewer.project_options_id.clone(),
            }));
        }

        if viewer_is_parent && self.staleness.has_outstanding() {
            return Ok(RowState::UpdateAll(UpdateAllRequest {
                source_id: parent.id,
                source_locale: parent.locale.clone(),
            }));
        }

        if viewer_is_parent {
            Ok(RowState::UpToDateParent)
        } else {
            Ok(RowState::UpToDateChild)
        }
    }
}
