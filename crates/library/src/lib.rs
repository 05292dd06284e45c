//! The organizer pipeline.
//!
//! Ties the other crates together: [`scan`] lists media files from a
//! [storage backend](shoebox_storage), [`organize`](organize::organize)
//! pushes each one through date detection, bucketing, conflict-free
//! placement and the [journal](shoebox_journal).

mod bucket;
mod context;
pub mod error;
pub mod organize;
pub mod scan;

pub use crate::bucket::{Bucket, UNSORTED_DIR};
pub use crate::context::Context;
pub use crate::scan::scan;
