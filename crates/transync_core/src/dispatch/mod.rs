//! Bulk action dispatch router.
//!
//! # Responsibility
//! - Parse `sdl_translate_<suffix>` bulk-action tokens into a
//!   `DispatchRequest`.
//! - Build the bulk-action menu with the same locale filter the parser uses.
//!
//! # Invariants
//! - A quick-translate locale must be a configured target AND have its
//!   primary subtag enabled on the host.
//! - An unsupported locale is an error, never a fallback to project mode.
//! - Tokens without the prefix belong to someone else (`NotOurs`).

use crate::config::{ConfigError, LocalePairing, SyncConfig};
use crate::model::item::{normalize_locale, primary_subtag, ItemId};
use crate::route::{RouteAction, ACTION_CREATE_PROJECT, ACTION_QUICK_TRANSLATE};
use log::{debug, warn};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Prefix shared by every bulk action this router owns.
pub const ACTION_PREFIX: &str = "sdl_translate_";
/// Suffix selecting the interactive create-project flow.
pub const FULL_PROJECT_SUFFIX: &str = "full";

/// Why a bulk action could not be routed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// Token is not a translation action; the caller must ignore it.
    NotOurs,
    /// Locale is not both configured and enabled on the host.
    UnsupportedLocale(String),
    /// No items were selected.
    EmptySelection,
}

impl Display for DispatchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotOurs => write!(f, "bulk action is not a translation action"),
            Self::UnsupportedLocale(locale) => {
                write!(f, "locale `{locale}` is not available for quick translation")
            }
            Self::EmptySelection => write!(f, "no items selected for translation"),
        }
    }
}

impl Error for DispatchError {}

/// Routing decision for one bulk-action invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DispatchRequest {
    CreateProject {
        item_ids: Vec<ItemId>,
    },
    QuickTranslate {
        item_ids: Vec<ItemId>,
        target_locale: String,
    },
}

impl DispatchRequest {
    pub fn item_ids(&self) -> &[ItemId] {
        match self {
            Self::CreateProject { item_ids } | Self::QuickTranslate { item_ids, .. } => item_ids,
        }
    }

    /// Item ids joined with commas, as the host screens expect them.
    pub fn joined_ids(&self) -> String {
        self.item_ids()
            .iter()
            .map(ItemId::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Host action for this request.
    ///
    /// Quick translation carries the source locale and project options so the
    /// host can submit without further input.
    ///
    /// # Errors
    /// - `UnknownProjectOptions` when a quick translation has no active
    ///   pairing to take the source locale from.
    pub fn route(&self, config: &SyncConfig) -> Result<RouteAction, ConfigError> {
        match self {
            Self::CreateProject { .. } => {
                Ok(RouteAction::new(ACTION_CREATE_PROJECT).with("posts", self.joined_ids()))
            }
            Self::QuickTranslate { target_locale, .. } => {
                let pairing = config.active_pairing()?;
                Ok(RouteAction::new(ACTION_QUICK_TRANSLATE)
                    .with("id", self.joined_ids())
                    .with("TargetLang", target_locale.as_str())
                    .with("SrcLang", pairing.source.to_ascii_lowercase())
                    .with("ProjectOptionsID", config.project_options_id.as_str()))
            }
        }
    }
}

/// One entry of the bulk-action menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkAction {
    pub token: String,
    pub label: String,
}

/// Router bound to one loaded configuration.
///
/// Parsing and menu building share the pairing and host locale set, so the
/// menu never offers an action the parser would reject.
pub struct DispatchRouter<'a> {
    pairing: &'a LocalePairing,
    host_locales: &'a [String],
}

impl<'a> DispatchRouter<'a> {
    pub fn new(pairing: &'a LocalePairing, host_locales: &'a [String]) -> Self {
        Self {
            pairing,
            host_locales,
        }
    }

    pub fn from_config(config: &'a SyncConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(config.active_pairing()?, &config.host_locales))
    }

    pub fn parse(
        &self,
        action_token: &str,
        selected: &[ItemId],
    ) -> Result<DispatchRequest, DispatchError> {
        parse_action(action_token, selected, self.pairing, self.host_locales)
    }

    pub fn menu(&self) -> Vec<BulkAction> {
        bulk_actions(self.pairing, self.host_locales)
    }
}

/// Parses a bulk-action token against the configured pairing.
///
/// # Errors
/// - `NotOurs` when `action_token` lacks the `sdl_translate_` prefix.
/// - `EmptySelection` when `selected` is empty.
/// - `UnsupportedLocale` when the suffix fails the offerable-locale filter.
pub fn parse_action(
    action_token: &str,
    selected: &[ItemId],
    pairing: &LocalePairing,
    host_locales: &[String],
) -> Result<DispatchRequest, DispatchError> {
    let suffix = action_token
        .strip_prefix(ACTION_PREFIX)
        .ok_or(DispatchError::NotOurs)?;

    if selected.is_empty() {
        return Err(DispatchError::EmptySelection);
    }

    if suffix == FULL_PROJECT_SUFFIX {
        debug!(
            "event=dispatch module=dispatch status=ok mode=create_project items={}",
            selected.len()
        );
        return Ok(DispatchRequest::CreateProject {
            item_ids: selected.to_vec(),
        });
    }

    if !is_offerable(suffix, pairing, host_locales) {
        warn!("event=dispatch module=dispatch status=rejected locale={suffix}");
        return Err(DispatchError::UnsupportedLocale(suffix.to_string()));
    }

    debug!(
        "event=dispatch module=dispatch status=ok mode=quick_translate locale={suffix} items={}",
        selected.len()
    );
    Ok(DispatchRequest::QuickTranslate {
        item_ids: selected.to_vec(),
        target_locale: suffix.to_string(),
    })
}

/// Configured targets whose primary subtag is enabled on the host, in
/// configuration order.
pub fn offerable_locales<'a>(
    pairing: &'a LocalePairing,
    host_locales: &[String],
) -> Vec<&'a str> {
    pairing
        .targets
        .iter()
        .map(String::as_str)
        .filter(|locale| is_offerable(locale, pairing, host_locales))
        .collect()
}

/// Full bulk-action menu: create-project first, then one quick action per
/// offerable locale.
pub fn bulk_actions(pairing: &LocalePairing, host_locales: &[String]) -> Vec<BulkAction> {
    let mut actions = vec![BulkAction {
        token: format!("{ACTION_PREFIX}{FULL_PROJECT_SUFFIX}"),
        label: "Create translation project".to_string(),
    }];
    actions.extend(
        offerable_locales(pairing, host_locales)
            .into_iter()
            .map(|locale| BulkAction {
                token: format!("{ACTION_PREFIX}{locale}"),
                label: format!(
                    "Quick translate into {}",
                    primary_subtag(locale).to_ascii_uppercase()
                ),
            }),
    );
    actions
}

fn is_offerable(locale: &str, pairing: &LocalePairing, host_locales: &[String]) -> bool {
    if !pairing.has_target(locale) {
        return false;
    }
    let primary = normalize_locale(primary_subtag(locale));
    host_locales
        .iter()
        .any(|host| normalize_locale(host) == primary)
}

#[cfg(test)]
mod tests {
    use super::{bulk_actions, offerable_locales, parse_action, DispatchError, DispatchRequest};
    use crate::config::{ConfigError, LocalePairing, SyncConfig};
    use std::collections::BTreeMap;

    fn pairing() -> LocalePairing {
        LocalePairing {
            source: "en-US".to_string(),
            targets: vec!["de-DE".to_string(), "fr-FR".to_string(), "ja-JP".to_string()],
        }
    }

    fn hosts(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn foreign_token_is_not_ours_even_with_empty_selection() {
        let err = parse_action("trash", &[], &pairing(), &hosts(&["de"])).unwrap_err();
        assert_eq!(err, DispatchError::NotOurs);
    }

    #[test]
    fn unconfigured_locale_is_rejected_even_when_hosted() {
        let err =
            parse_action("sdl_translate_es-ES", &[1], &pairing(), &hosts(&["es"])).unwrap_err();
        assert_eq!(err, DispatchError::UnsupportedLocale("es-ES".to_string()));
    }

    #[test]
    fn menu_filter_matches_parser() {
        let host = hosts(&["en", "DE", "ja"]);
        assert_eq!(offerable_locales(&pairing(), &host), vec!["de-DE", "ja-JP"]);
        for action in bulk_actions(&pairing(), &host) {
            assert!(parse_action(&action.token, &[1], &pairing(), &host).is_ok());
        }
        assert!(parse_action("sdl_translate_fr-FR", &[1], &pairing(), &host).is_err());
    }

    #[test]
    fn menu_labels_use_uppercase_primary_subtag() {
        let actions = bulk_actions(&pairing(), &hosts(&["de"]));
        assert_eq!(actions.len(), 2);
        assert_eq!(actions[0].label, "Create translation project");
        assert_eq!(actions[1].token, "sdl_translate_de-DE");
        assert_eq!(actions[1].label, "Quick translate into DE");
    }

    #[test]
    fn quick_route_without_active_pairing_reports_config_error() {
        let config = SyncConfig {
            project_options_id: "po-missing".to_string(),
            pairings: BTreeMap::from([("po-1".to_string(), pairing())]),
            host_locales: hosts(&["de"]),
            database_path: None,
            logging: None,
        };
        let quick = DispatchRequest::QuickTranslate {
            item_ids: vec![1],
            target_locale: "de-DE".to_string(),
        };
        let err = quick.route(&config).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownProjectOptions(id) if id == "po-missing"));

        let project = DispatchRequest::CreateProject { item_ids: vec![1, 2] };
        assert_eq!(project.route(&config).unwrap().param("posts"), Some("1,2"));
    }
}
