//! Content item persistence and translation linkage.
//!
//! # Responsibility
//! - Store content item snapshots pushed by the host.
//! - Record which translation group each item belongs to.
//!
//! # Invariants
//! - Locales are stored normalized (lowercase).
//! - A group has at most one source item (enforced by a partial unique index).

use crate::db::DbError;
use crate::model::group::GroupError;
use crate::model::item::{normalize_locale, ContentItem, ItemId, RevisionMarker};
use crate::model::job::JobId;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const ITEM_SELECT_SQL: &str = "SELECT
    content_items.id,
    content_items.locale,
    content_items.revision,
    content_items.source_revision,
    content_items.project_options_id
FROM content_items";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error shared by all host storage collaborators.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(ItemId),
    JobNotFound(JobId),
    InvalidData(String),
    InvalidGroup(GroupError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "content item not found: {id}"),
            Self::JobNotFound(id) => write!(f, "translation job not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::InvalidGroup(err) => write!(f, "invalid translation group: {err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidGroup(err) => Some(err),
            Self::NotFound(_) | Self::JobNotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<GroupError> for RepoError {
    fn from(value: GroupError) -> Self {
        Self::InvalidGroup(value)
    }
}

/// Write/read contract for host content snapshots.
pub trait ContentRepository {
    fn upsert_item(&self, item: &ContentItem) -> RepoResult<()>;
    fn get_item(&self, id: ItemId) -> RepoResult<Option<ContentItem>>;
    /// Attaches an item to a translation group, replacing any previous link.
    fn link_item(&self, id: ItemId, group_key: &str, is_source: bool) -> RepoResult<()>;
    fn unlink_item(&self, id: ItemId) -> RepoResult<()>;
}

/// SQLite-backed content repository.
pub struct SqliteContentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteContentRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ContentRepository for SqliteContentRepository<'_> {
    fn upsert_item(&self, item: &ContentItem) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO content_items (id, locale, revision, source_revision, project_options_id)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(id) DO UPDATE SET
                locale = excluded.locale,
                revision = excluded.revision,
                source_revision = excluded.source_revision,
                project_options_id = excluded.project_options_id;",
            params![
                item.id,
                normalize_locale(&item.locale),
                item.revision.value(),
                item.source_revision.map(RevisionMarker::value),
                item.project_options_id.as_deref(),
            ],
        )?;
        Ok(())
    }

    fn get_item(&self, id: ItemId) -> RepoResult<Option<ContentItem>> {
        fetch_item(self.conn, id)
    }

    fn link_item(&self, id: ItemId, group_key: &str, is_source: bool) -> RepoResult<()> {
        let exists = self
            .conn
            .query_row("SELECT 1 FROM content_items WHERE id = ?1;", [id], |_| Ok(()))
            .optional()?;
        if exists.is_none() {
            return Err(RepoError::NotFound(id));
        }

        let group_key = group_key.trim();
        if group_key.is_empty() {
            return Err(RepoError::InvalidData(format!(
                "group key for item {id} must not be blank"
            )));
        }

        self.conn.execute(
            "INSERT INTO translation_links (item_id, group_key, is_source)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(item_id) DO UPDATE SET
                group_key = excluded.group_key,
                is_source = excluded.is_source;",
            params![id, group_key, i64::from(is_source)],
        )?;
        Ok(())
    }

    fn unlink_item(&self, id: ItemId) -> RepoResult<()> {
        self.conn
            .execute("DELETE FROM translation_links WHERE item_id = ?1;", [id])?;
        Ok(())
    }
}

pub(crate) fn fetch_item(conn: &Connection, id: ItemId) -> RepoResult<Option<ContentItem>> {
    let mut stmt = conn.prepare(&format!("{ITEM_SELECT_SQL} WHERE content_items.id = ?1;"))?;
    let mut rows = stmt.query([id])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_item_row(row)?));
    }

    Ok(None)
}

pub(crate) fn parse_item_row(row: &Row<'_>) -> RepoResult<ContentItem> {
    let id: ItemId = row.get("id")?;
    let locale: String = row.get("locale")?;
    if locale.trim().is_empty() {
        return Err(RepoError::InvalidData(format!(
            "blank locale for content item {id}"
        )));
    }

    Ok(ContentItem {
        id,
        locale: normalize_locale(&locale),
        revision: RevisionMarker(row.get("revision")?),
        source_revision: row
            .get::<_, Option<i64>>("source_revision")?
            .map(RevisionMarker),
        project_options_id: row.get("project_options_id")?,
    })
}
