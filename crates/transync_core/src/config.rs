//! Sync configuration: active vendor project options and host locales.
//!
//! # Responsibility
//! - Load the locale pairing table and the host's enabled locale set.
//! - Validate locale codes before the router ever sees them.
//!
//! # Invariants
//! - `project_options_id` always names an entry in `pairings`.
//! - Pairing codes keep their configured case; host locales are lowercase.

use crate::model::item::normalize_locale;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

static LOCALE_TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z]{2,3}(-[A-Za-z0-9]{2,8})*$").expect("valid locale tag regex")
});

/// Configuration loading/validation failures.
#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(serde_json::Error),
    UnknownProjectOptions(String),
    InvalidLocale(String),
    EmptyTargets(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config json: {err}"),
            Self::UnknownProjectOptions(id) => {
                write!(f, "project options `{id}` has no locale pairing")
            }
            Self::InvalidLocale(value) => write!(f, "invalid locale code `{value}`"),
            Self::EmptyTargets(id) => {
                write!(f, "project options `{id}` declares no target locales")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Source locale and offered targets of one vendor project configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalePairing {
    pub source: String,
    pub targets: Vec<String>,
}

impl LocalePairing {
    pub fn has_target(&self, locale: &str) -> bool {
        self.targets.iter().any(|target| target == locale)
    }
}

/// Optional log sink settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_level")]
    pub level: String,
    pub dir: PathBuf,
}

fn default_level() -> String {
    crate::logging::default_log_level().to_string()
}

/// Top-level configuration document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    pub project_options_id: String,
    pub pairings: BTreeMap<String, LocalePairing>,
    #[serde(default)]
    pub host_locales: Vec<String>,
    #[serde(default)]
    pub database_path: Option<PathBuf>,
    #[serde(default)]
    pub logging: Option<LoggingSettings>,
}

impl SyncConfig {
    /// Parses and validates a JSON configuration document.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        config.host_locales = config
            .host_locales
            .iter()
            .map(|locale| normalize_locale(locale))
            .collect();
        Ok(config)
    }

    /// Reads and validates a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Pairing selected by `project_options_id`.
    pub fn active_pairing(&self) -> Result<&LocalePairing, ConfigError> {
        self.pairings
            .get(&self.project_options_id)
            .ok_or_else(|| ConfigError::UnknownProjectOptions(self.project_options_id.clone()))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.active_pairing()?;
        for (id, pairing) in &self.pairings {
            if pairing.targets.is_empty() {
                return Err(ConfigError::EmptyTargets(id.clone()));
            }
            for locale in std::iter::once(&pairing.source).chain(&pairing.targets) {
                validate_locale(locale)?;
            }
        }
        for locale in &self.host_locales {
            validate_locale(locale.trim())?;
        }
        Ok(())
    }
}

/// Checks `value` against the language-tag shape used by vendors and hosts.
pub fn validate_locale(value: &str) -> Result<(), ConfigError> {
    if LOCALE_TAG_RE.is_match(value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidLocale(value.to_string()))
    }
}
