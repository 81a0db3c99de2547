//! Vendor interchange codec (XLIFF 1.2 dialect).
//!
//! # Responsibility
//! - Decode vendor files into `StructuredContent` (title, body, taxonomy
//!   terms, metadata).
//! - Encode `StructuredContent` into files the vendor accepts.
//!
//! # Invariants
//! - Locales come from the first `file` container only.
//! - Units are classified by `resname`; unknown channels are skipped.
//! - A failed decode never yields partially populated content.
//!
//! # Fidelity
//! - Unit values are the flattened text of the `target` node. Inline markup
//!   nested inside a target (`<g>`, `<x/>`, `<mrk>`) is dropped and only its
//!   text survives.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

mod decode;
mod encode;

pub use decode::{decode, decode_file};
pub use encode::encode;

pub(crate) const FILE_TAG: &str = "file";
pub(crate) const UNIT_TAG: &str = "trans-unit";
pub(crate) const TARGET_TAG: &str = "target";
pub(crate) const SOURCE_TAG: &str = "source";

pub(crate) const ATTR_SOURCE_LANGUAGE: &str = "source-language";
pub(crate) const ATTR_TARGET_LANGUAGE: &str = "target-language";
pub(crate) const ATTR_RESNAME: &str = "resname";
pub(crate) const ATTR_TAXONOMY: &str = "wp_taxonomy";
pub(crate) const ATTR_TERM_ID: &str = "wp_id";
pub(crate) const ATTR_META_KEY: &str = "wp_meta";

/// Translated fields carried by one interchange document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredContent {
    /// Verbatim `source-language`; empty when the attribute is absent.
    #[serde(default)]
    pub source_locale: String,
    /// Verbatim `target-language`; empty when the attribute is absent.
    #[serde(default)]
    pub target_locale: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    /// Taxonomy type -> term id -> translated term name.
    #[serde(default)]
    pub taxonomy_terms: BTreeMap<String, BTreeMap<String, String>>,
    /// Meta key -> translated value.
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

/// Semantic channel selected by a unit's `resname`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Title,
    Body,
    Taxonomy,
    Meta,
}

impl Channel {
    /// Maps a `resname` value; `None` for channels this codec ignores.
    pub fn from_resname(value: &str) -> Option<Self> {
        match value {
            "title" => Some(Self::Title),
            "body" => Some(Self::Body),
            "taxonomy" => Some(Self::Taxonomy),
            "meta" => Some(Self::Meta),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Body => "body",
            Self::Taxonomy => "taxonomy",
            Self::Meta => "meta",
        }
    }
}

/// Codec failures.
#[derive(Debug)]
pub enum InterchangeError {
    /// Unparsable XML or no `file` container.
    Malformed(String),
    /// A taxonomy/meta unit lacks a companion attribute; fails the whole decode.
    MissingAttribute {
        /// Zero-based position of the unit among all `trans-unit` elements.
        unit_index: usize,
        channel: Channel,
        attribute: &'static str,
    },
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Serialization failure while encoding.
    Write(String),
}

impl Display for InterchangeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(message) => write!(f, "malformed interchange document: {message}"),
            Self::MissingAttribute {
                unit_index,
                channel,
                attribute,
            } => write!(
                f,
                "trans-unit #{unit_index} ({}) is missing attribute `{attribute}`",
                channel.as_str()
            ),
            Self::Io { path, source } => {
                write!(f, "failed to read `{}`: {source}", path.display())
            }
            Self::Write(message) => write!(f, "failed to write interchange document: {message}"),
        }
    }
}

impl Error for InterchangeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
