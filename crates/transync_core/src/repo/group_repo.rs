//! Translation group resolution.
//!
//! # Responsibility
//! - Rebuild a `TranslationGroup` for any member item id.
//!
//! # Invariants
//! - The host's `is_source` flag designates the parent; it is never inferred.
//! - An item with no link resolves to a group of one instead of an error.
//! - A linked group without exactly one source is invalid persisted data.

use crate::model::group::TranslationGroup;
use crate::model::item::ItemId;
use crate::repo::item_repo::{fetch_item, parse_item_row, RepoError, RepoResult};
use log::debug;
use rusqlite::{Connection, OptionalExtension};

/// Reconstructs the translation group an item belongs to.
pub trait GroupResolver {
    /// Returns the item's group.
    ///
    /// # Errors
    /// - `RepoError::NotFound` when `item_id` does not exist.
    fn resolve_group(&self, item_id: ItemId) -> RepoResult<TranslationGroup>;
}

impl<T: GroupResolver + ?Sized> GroupResolver for &T {
    fn resolve_group(&self, item_id: ItemId) -> RepoResult<TranslationGroup> {
        (**self).resolve_group(item_id)
    }
}

/// SQLite-backed group resolver over `translation_links`.
pub struct SqliteGroupResolver<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteGroupResolver<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl GroupResolver for SqliteGroupResolver<'_> {
    fn resolve_group(&self, item_id: ItemId) -> RepoResult<TranslationGroup> {
        let item = fetch_item(self.conn, item_id)?.ok_or(RepoError::NotFound(item_id))?;

        let group_key: Option<String> = self
            .conn
            .query_row(
                "SELECT group_key FROM translation_links WHERE item_id = ?1;",
                [item_id],
                |row| row.get(0),
            )
            .optional()?;

        let Some(group_key) = group_key else {
            debug!("event=resolve_group module=repo status=ok item_id={item_id} shape=solitary");
            return Ok(TranslationGroup::solitary(item));
        };

        let mut stmt = self.conn.prepare(
            "SELECT
                content_items.id,
                content_items.locale,
                content_items.revision,
                content_items.source_revision,
                content_items.project_options_id,
                translation_links.is_source
             FROM content_items
             INNER JOIN translation_links ON translation_links.item_id = content_items.id
             WHERE translation_links.group_key = ?1
             ORDER BY translation_links.is_source DESC, content_items.id ASC;",
        )?;
        let mut rows = stmt.query([group_key.as_str()])?;

        let mut parent = None;
        let mut children = Vec::new();
        while let Some(row) = rows.next()? {
            let member = parse_item_row(row)?;
            let is_source: i64 = row.get("is_source")?;
            if is_source == 1 {
                if parent.is_some() {
                    return Err(RepoError::InvalidData(format!(
                        "group `{group_key}` has more than one source item"
                    )));
                }
                parent = Some(member);
            } else {
                children.push(member);
            }
        }

        let parent = parent.ok_or_else(|| {
            RepoError::InvalidData(format!("group `{group_key}` has no source item"))
        })?;
        let group = TranslationGroup::new(group_key, parent, children)?;

        debug!(
            "event=resolve_group module=repo status=ok item_id={item_id} group_key={} children={}",
            group.key(),
            group.children().len()
        );
        Ok(group)
    }
}
