//! Translation group model.
//!
//! # Responsibility
//! - Hold one parent item plus its per-locale translated children.
//! - Reject shapes the host should never produce.
//!
//! # Invariants
//! - Exactly one parent.
//! - At most one child per locale, and never in the parent's locale.
//! - A solitary item is represented as a group with no children.

use crate::model::item::{normalize_locale, ContentItem, ItemId};
use serde::Serialize;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Key identifying one translation group in host storage and the job ledger.
pub type GroupKey = String;

/// Shape violations detected while assembling a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupError {
    ChildInParentLocale {
        group_key: GroupKey,
        child_id: ItemId,
        locale: String,
    },
    DuplicateLocale {
        group_key: GroupKey,
        locale: String,
        first_id: ItemId,
        second_id: ItemId,
    },
}

impl Display for GroupError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ChildInParentLocale {
                group_key,
                child_id,
                locale,
            } => write!(
                f,
                "group `{group_key}`: child {child_id} shares parent locale `{locale}`"
            ),
            Self::DuplicateLocale {
                group_key,
                locale,
                first_id,
                second_id,
            } => write!(
                f,
                "group `{group_key}`: locale `{locale}` claimed by both {first_id} and {second_id}"
            ),
        }
    }
}

impl Error for GroupError {}

/// Parent item plus translated children keyed by locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslationGroup {
    key: GroupKey,
    parent: ContentItem,
    children: BTreeMap<String, ContentItem>,
}

impl TranslationGroup {
    /// Assembles a group and validates locale uniqueness.
    ///
    /// Member locales are normalized first, so `FR` and `fr` collide.
    pub fn new(
        key: impl Into<GroupKey>,
        parent: ContentItem,
        children: impl IntoIterator<Item = ContentItem>,
    ) -> Result<Self, GroupError> {
        let key = key.into();
        let parent = with_normalized_locale(parent);
        let mut by_locale: BTreeMap<String, ContentItem> = BTreeMap::new();

        for child in children.into_iter().map(with_normalized_locale) {
            if child.locale == parent.locale {
                return Err(GroupError::ChildInParentLocale {
                    group_key: key,
                    child_id: child.id,
                    locale: child.locale,
                });
            }
            if let Some(existing) = by_locale.get(&child.locale) {
                return Err(GroupError::DuplicateLocale {
                    group_key: key,
                    locale: child.locale.clone(),
                    first_id: existing.id,
                    second_id: child.id,
                });
            }
            by_locale.insert(child.locale.clone(), child);
        }

        Ok(Self {
            key,
            parent,
            children: by_locale,
        })
    }

    /// Builds the degenerate group for an item with no translation links.
    pub fn solitary(item: ContentItem) -> Self {
        Self {
            key: solitary_group_key(item.id),
            parent: with_normalized_locale(item),
            children: BTreeMap::new(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn parent(&self) -> &ContentItem {
        &self.parent
    }

    pub fn children(&self) -> &BTreeMap<String, ContentItem> {
        &self.children
    }

    pub fn child(&self, locale: &str) -> Option<&ContentItem> {
        self.children.get(locale)
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn is_parent(&self, item_id: ItemId) -> bool {
        self.parent.id == item_id
    }

    /// Finds a member (parent or child) by id.
    pub fn member(&self, item_id: ItemId) -> Option<&ContentItem> {
        if self.parent.id == item_id {
            return Some(&self.parent);
        }
        self.children.values().find(|child| child.id == item_id)
    }
}

fn with_normalized_locale(mut item: ContentItem) -> ContentItem {
    item.locale = normalize_locale(&item.locale);
    item
}

/// Group key used for items that have no translation linkage.
pub fn solitary_group_key(item_id: ItemId) -> GroupKey {
    format!("item:{item_id}")
}
