//! Error types for the [`organize`](super) module.
//!
//! Uses [`exn`] for automatic location tracking and error tree construction.

use derive_more::{Display, Error};

/// An organize error with automatic location tracking via [`exn::Exn`].
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for organize operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Classifies the origin of an organize failure.
///
/// The distinction that matters operationally is [`is_fatal`](ErrorKind::is_fatal):
/// per-file failures are journaled and skipped, fatal ones terminate the run
/// because continuing would either do nothing useful (source unreadable) or
/// break the idempotence guarantee (journal unwritable).
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// A journal read or append failed. Fatal: without the journal every
    /// file would be re-processed on the next run.
    #[display("journal operation failed")]
    Journal,
    /// Listing the source directory failed.
    #[display("scanning the source directory failed")]
    Scan,
    /// The transfer (or the folder creation / metadata read leading up to
    /// it) failed for one file. The source file is left untouched.
    #[display("transfer failed")]
    Transfer,
    /// The destination folder had no free name left under the collision
    /// policy.
    #[display("no collision-free destination name available")]
    Conflict,
    /// The file is not a recognized image or video.
    #[display("not a recognized media file")]
    Unsupported,
}

impl ErrorKind {
    /// Returns `true` when the whole run must stop.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Journal | Self::Scan)
    }

    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
