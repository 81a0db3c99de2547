//! Routing parameters handed to the host redirect layer.
//!
//! Action names and parameter keys are the admin URL contract the host
//! already understands; nothing here renders markup.

use serde::Serialize;

/// Action for updating one translated locale of a group.
pub const ACTION_UPDATE_SINGLE: &str = "sdl_update_single";
/// Action for re-submitting every stale locale of a group.
pub const ACTION_UPDATE_ALL: &str = "sdl_update_all";
/// Action for submitting selected items straight to the vendor.
pub const ACTION_QUICK_TRANSLATE: &str = "sdl_create_project_quick";
/// Action for opening the interactive project form.
pub const ACTION_CREATE_PROJECT: &str = "create_project";

/// A host action plus ordered query parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteAction {
    pub action: &'static str,
    pub params: Vec<(&'static str, String)>,
}

impl RouteAction {
    pub fn new(action: &'static str) -> Self {
        Self {
            action,
            params: Vec::new(),
        }
    }

    pub fn with(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.params.push((key, value.into()));
        self
    }

    /// Looks up the first parameter named `key`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| value.as_str())
    }
}
