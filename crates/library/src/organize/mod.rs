//! Filing media into the year/month hierarchy.
//!
//! The per-file pipeline lives in [`organize_file`]: journal idempotence
//! check, date detection, bucket computation, conflict-free placement,
//! transfer, journal append. [`organize`] wraps it in a stream over a whole
//! source directory, emitting one [`OrganizeEvent`] per file and tolerating
//! per-file transfer failures.

mod conflict;
pub mod error;
mod file;
mod stream;

pub use self::file::{Action, organize_file};
pub use self::stream::{OrganizeEvent, Summary, organize};
