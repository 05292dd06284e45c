//! SQLite journal of transfer operations.
//!
//! The journal is what makes runs idempotent: a source path that already has
//! a row in the `transfers` table is never processed again, whatever its
//! status. It is also the audit trail — rows are only ever appended, never
//! updated or deleted.
//!
//! # Architecture
//! Two tables:
//! - **transfers**: one row per source path ever handled, with the
//!   destination it was filed to, a `moved`/`copied`/`failed` status, and a
//!   timestamp.
//! - **issues**: free-form warnings and errors observed while handling a
//!   file (no embedded date, transfer failure, ...), keyed by source path
//!   but deliberately not UNIQUE — one file can accumulate several.

mod db;
pub mod error;
mod models;
mod repo;

pub use crate::db::Database;
pub use crate::models::{Issue, IssueCode, TransferRecord, TransferStatus};
pub use crate::repo::Repository;
