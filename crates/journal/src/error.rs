//! Journal Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A journal error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for journal operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// Any of these means the idempotence guarantee is at risk, which is why the
/// organizer treats journal errors as fatal for the whole run.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    #[display("database error")]
    Database,
    #[display("database migration error")]
    Migration,
    /// Serialization/deserialization error.
    #[display("invalid journal data: {_0}")]
    InvalidData(#[error(not(source))] &'static str),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
