//! Vendor job ledger.
//!
//! # Responsibility
//! - Report which locales of a group have an in-flight vendor job.
//! - Let the host record submissions and completion callbacks.
//!
//! # Invariants
//! - Only `in_progress` jobs make a locale active.
//! - Reads never mutate the ledger.

use crate::model::group::TranslationGroup;
use crate::model::item::normalize_locale;
use crate::model::job::{JobId, JobRecord, JobStatus};
use crate::repo::item_repo::{RepoError, RepoResult};
use rusqlite::{params, Connection};
use std::collections::BTreeSet;
use uuid::Uuid;

/// Read view over in-flight vendor jobs.
pub trait JobLedger {
    /// Returns locales with an `InProgress` job for `group`.
    ///
    /// The parent's own locale may be present, meaning the whole group is busy.
    fn active_locales(&self, group: &TranslationGroup) -> RepoResult<BTreeSet<String>>;
}

impl<T: JobLedger + ?Sized> JobLedger for &T {
    fn active_locales(&self, group: &TranslationGroup) -> RepoResult<BTreeSet<String>> {
        (**self).active_locales(group)
    }
}

/// SQLite-backed ledger over `translation_jobs`.
pub struct SqliteJobLedger<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteJobLedger<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Records a dispatched job.
    pub fn record_job(&self, job: &JobRecord) -> RepoResult<JobId> {
        self.conn.execute(
            "INSERT INTO translation_jobs (id, group_key, target_locale, status)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                job.id.to_string(),
                job.group_key.as_str(),
                normalize_locale(&job.target_locale),
                job.status.as_str(),
            ],
        )?;
        Ok(job.id)
    }

    /// Applies a status transition reported by the vendor.
    pub fn set_job_status(&self, id: JobId, status: JobStatus) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE translation_jobs
             SET status = ?1, updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?2;",
            params![status.as_str(), id.to_string()],
        )?;
        if changed == 0 {
            return Err(RepoError::JobNotFound(id));
        }
        Ok(())
    }

    /// Lists every job recorded for a group, oldest first.
    pub fn jobs_for_group(&self, group_key: &str) -> RepoResult<Vec<JobRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, group_key, target_locale, status
             FROM translation_jobs
             WHERE group_key = ?1
             ORDER BY created_at ASC, id ASC;",
        )?;
        let mut rows = stmt.query([group_key])?;
        let mut jobs = Vec::new();

        while let Some(row) = rows.next()? {
            let id_text: String = row.get("id")?;
            let id = Uuid::parse_str(&id_text).map_err(|_| {
                RepoError::InvalidData(format!("invalid job id `{id_text}` in translation_jobs.id"))
            })?;
            let status_text: String = row.get("status")?;
            let status = JobStatus::parse(&status_text).ok_or_else(|| {
                RepoError::InvalidData(format!(
                    "invalid job status `{status_text}` in translation_jobs.status"
                ))
            })?;
            jobs.push(JobRecord {
                id,
                group_key: row.get("group_key")?,
                target_locale: row.get("target_locale")?,
                status,
            });
        }

        Ok(jobs)
    }
}

impl JobLedger for SqliteJobLedger<'_> {
    fn active_locales(&self, group: &TranslationGroup) -> RepoResult<BTreeSet<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT target_locale
             FROM translation_jobs
             WHERE group_key = ?1 AND status = ?2;",
        )?;
        let mut rows = stmt.query(params![group.key(), JobStatus::InProgress.as_str()])?;
        let mut locales = BTreeSet::new();

        while let Some(row) = rows.next()? {
            let locale: String = row.get(0)?;
            locales.insert(normalize_locale(&locale));
        }

        Ok(locales)
    }
}
