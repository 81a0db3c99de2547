//! Per-locale staleness of translated children.

use crate::model::group::TranslationGroup;
use crate::model::item::ContentItem;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Out-of-date children of one group, keyed by locale.
///
/// A child is stale when the parent's revision is newer than the parent
/// revision the child was produced from. Locales with an in-flight job are
/// never listed: a retranslation already underway is not also stale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StalenessIndex {
    out_of_date: BTreeMap<String, ContentItem>,
}

impl StalenessIndex {
    pub fn compute(group: &TranslationGroup, active_locales: &BTreeSet<String>) -> Self {
        let parent_revision = group.parent().revision;
        let out_of_date = group
            .children()
            .iter()
            .filter(|(locale, _)| !active_locales.contains(*locale))
            .filter(|(_, child)| parent_revision > child.baseline_revision())
            .map(|(locale, child)| (locale.clone(), child.clone()))
            .collect();

        Self { out_of_date }
    }

    /// The item reported as out of date for `locale`, if any.
    pub fn out_of_date(&self, locale: &str) -> Option<&ContentItem> {
        self.out_of_date.get(locale)
    }

    pub fn contains(&self, locale: &str) -> bool {
        self.out_of_date.contains_key(locale)
    }

    /// Group-level fact: the parent has at least one stale child.
    pub fn has_outstanding(&self) -> bool {
        !self.out_of_date.is_empty()
    }

    pub fn len(&self) -> usize {
        self.out_of_date.len()
    }

    pub fn is_empty(&self) -> bool {
        self.out_of_date.is_empty()
    }

    pub fn locales(&self) -> impl Iterator<Item = &str> {
        self.out_of_date.keys().map(String::as_str)
    }
}
