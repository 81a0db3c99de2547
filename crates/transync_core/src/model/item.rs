//! Content item model.
//!
//! # Responsibility
//! - Describe one localized unit of host content.
//! - Normalize locale tags the way the host stores them.
//!
//! # Invariants
//! - `locale` is trimmed and lowercase.
//! - `revision` only moves forward; comparisons use its total order.

use serde::{Deserialize, Deserializer, Serialize};

/// Host-assigned content identifier (post id).
pub type ItemId = i64;

/// Monotonic revision marker advanced on every content edit.
///
/// Hosts typically feed a modification timestamp or a version counter; only
/// the ordering is meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RevisionMarker(pub i64);

impl RevisionMarker {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(self) -> i64 {
        self.0
    }
}

/// One localized content item as seen by the sync engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: ItemId,
    /// Lowercase host language slug, e.g. `fr`.
    #[serde(deserialize_with = "deserialize_locale")]
    pub locale: String,
    /// Current revision of this item.
    pub revision: RevisionMarker,
    /// Parent revision recorded when this item was produced by an import.
    ///
    /// `None` for source content and for translations authored by hand.
    pub source_revision: Option<RevisionMarker>,
    /// Vendor project configuration that produced this item.
    pub project_options_id: Option<String>,
}

impl ContentItem {
    /// Creates an item with no import provenance.
    pub fn new(id: ItemId, locale: impl AsRef<str>, revision: RevisionMarker) -> Self {
        Self {
            id,
            locale: normalize_locale(locale.as_ref()),
            revision,
            source_revision: None,
            project_options_id: None,
        }
    }

    /// Marks this item as produced from `source_revision` of its parent.
    pub fn produced_from(
        mut self,
        source_revision: RevisionMarker,
        project_options_id: impl Into<String>,
    ) -> Self {
        self.source_revision = Some(source_revision);
        self.project_options_id = Some(project_options_id.into());
        self
    }

    /// Revision of the parent this item reflects.
    ///
    /// Falls back to the item's own revision when no import provenance exists.
    pub fn baseline_revision(&self) -> RevisionMarker {
        self.source_revision.unwrap_or(self.revision)
    }
}

/// Normalizes a host locale slug to trimmed lowercase.
pub fn normalize_locale(value: &str) -> String {
    value.trim().to_ascii_lowercase()
}

fn deserialize_locale<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(normalize_locale(&raw))
}

/// Returns the primary language subtag (`de` for `de-DE`).
pub fn primary_subtag(locale: &str) -> &str {
    locale.split('-').next().unwrap_or(locale)
}

#[cfg(test)]
mod tests {
    use super::{normalize_locale, primary_subtag, ContentItem, RevisionMarker};

    #[test]
    fn new_item_normalizes_locale() {
        let item = ContentItem::new(7, " FR ", RevisionMarker(1));
        assert_eq!(item.locale, "fr");
        assert_eq!(normalize_locale("pt-BR"), "pt-br");
    }

    #[test]
    fn baseline_prefers_import_provenance() {
        let hand_made = ContentItem::new(1, "de", RevisionMarker(9));
        assert_eq!(hand_made.baseline_revision(), RevisionMarker(9));

        let imported =
            ContentItem::new(2, "de", RevisionMarker(9)).produced_from(RevisionMarker(3), "po-1");
        assert_eq!(imported.baseline_revision(), RevisionMarker(3));
        assert_eq!(imported.project_options_id.as_deref(), Some("po-1"));
    }

    #[test]
    fn deserialized_item_normalizes_locale() {
        let item: ContentItem = serde_json::from_str(
            r#"{"id": 3, "locale": " FR", "revision": 4, "source_revision": null, "project_options_id": null}"#,
        )
        .unwrap();
        assert_eq!(item.locale, "fr");
        assert_eq!(item.revision, RevisionMarker::new(4));
    }

    #[test]
    fn primary_subtag_splits_on_first_hyphen() {
        assert_eq!(primary_subtag("de-DE"), "de");
        assert_eq!(primary_subtag("zh-Hant-TW"), "zh");
        assert_eq!(primary_subtag("fr"), "fr");
    }
}
