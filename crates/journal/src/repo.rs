//! Repository over the `transfers` and `issues` tables.
//!
//! The organizer core only needs two operations for correctness — "insert if
//! absent" ([`record`](Repository::record)) and "exists by source path"
//! ([`seen`](Repository::seen)) — everything else here serves auditing.

use crate::Database;
use crate::error::{ErrorKind, Result};
use crate::models::{Issue, IssueRow, TransferRecord, TransferRow, TransferStatus};
use exn::{OptionExt, ResultExt};
use sqlx::SqlitePool;
use std::path::Path;

/// Repository for journal rows.
///
/// Cheap to clone; intended to be passed into the organizer as an injected
/// collaborator so tests can swap in an in-memory database via
/// [`Database::connect_in_memory`].
#[derive(Debug, Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl From<&Database> for Repository {
    fn from(db: &Database) -> Self {
        Self { pool: db.pool().clone() }
    }
}

impl Repository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn path_as_text(path: impl AsRef<Path>) -> Result<String> {
        Ok(path.as_ref().to_str().ok_or_raise(|| ErrorKind::InvalidData("path"))?.to_string())
    }

    // =========================================================================
    // Transfers
    // =========================================================================

    /// Append a transfer record, unless one already exists for the same
    /// source path.
    ///
    /// Returns `true` when a row was written, `false` when the source path
    /// was already journaled (the existing row wins; records are immutable).
    pub async fn record(&self, record: &TransferRecord) -> Result<bool> {
        let row = TransferRow::try_from(record)?;
        let result = sqlx::query(include_str!("../queries/insert_transfer.sql"))
            .bind(row.source_path)
            .bind(row.destination_path)
            .bind(row.status)
            .bind(row.recorded_at)
            .execute(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        let inserted = result.rows_affected() > 0;
        if !inserted {
            tracing::debug!(source = %record.source_path.display(), "Transfer already journaled; keeping the existing row");
        }
        Ok(inserted)
    }

    /// The idempotence check: has this source path ever been journaled?
    ///
    /// Counts failed transfers too — failures are assumed non-transient, so
    /// a re-run must not retry them.
    pub async fn seen(&self, source: impl AsRef<Path>) -> Result<bool> {
        let count: i64 = sqlx::query_scalar(include_str!("../queries/transfer_exists.sql"))
            .bind(Self::path_as_text(source)?)
            .fetch_one(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(count > 0)
    }

    /// Fetch the transfer record for a source path, if any.
    pub async fn get(&self, source: impl AsRef<Path>) -> Result<Option<TransferRecord>> {
        let row: Option<TransferRow> = sqlx::query_as(include_str!("../queries/get_transfer.sql"))
            .bind(Self::path_as_text(source)?)
            .fetch_optional(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        row.map(TransferRecord::try_from).transpose()
    }

    /// List the most recently journaled transfers, newest first.
    pub async fn list_recent(&self, limit: usize) -> Result<Vec<TransferRecord>> {
        let limit = i64::try_from(limit).or_raise(|| ErrorKind::InvalidData("limit"))?;
        let rows: Vec<TransferRow> = sqlx::query_as(include_str!("../queries/list_recent_transfers.sql"))
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        rows.into_iter().map(TransferRecord::try_from).collect()
    }

    /// Count journaled transfers with the given status.
    pub async fn count_by_status(&self, status: TransferStatus) -> Result<u64> {
        let count: i64 = sqlx::query_scalar(include_str!("../queries/count_transfers_by_status.sql"))
            .bind(status.to_string())
            .fetch_one(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        u64::try_from(count).or_raise(|| ErrorKind::InvalidData("count"))
    }

    // =========================================================================
    // Issues
    // =========================================================================

    /// Append an issue row.
    pub async fn report(&self, issue: &Issue) -> Result<()> {
        let row = IssueRow::try_from(issue)?;
        sqlx::query(include_str!("../queries/insert_issue.sql"))
            .bind(row.source_path)
            .bind(row.code)
            .bind(row.detail)
            .bind(row.recorded_at)
            .execute(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(())
    }

    /// All issues recorded for a source path, oldest first.
    pub async fn issues_for(&self, source: impl AsRef<Path>) -> Result<Vec<Issue>> {
        let rows: Vec<IssueRow> = sqlx::query_as(include_str!("../queries/list_issues_for_source.sql"))
            .bind(Self::path_as_text(source)?)
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        rows.into_iter().map(Issue::try_from).collect()
    }
}
