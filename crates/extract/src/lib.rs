//! Capture-date detection for media files.
//!
//! A media file's "real" date can live in three places, in decreasing order
//! of trustworthiness: embedded camera metadata (EXIF), a timestamp baked
//! into the filename by the recording device, or the filesystem's modified
//! time. This crate models that policy as an ordered list of
//! [`DateStrategy`] implementations tried in turn by an [`Extractor`].
//!
//! Detection never fails: a strategy that errors is skipped, and exhausting
//! the list simply yields no date — the caller decides what an undatable
//! file means (for the organizer, the `unsorted` bucket).

mod date;
pub mod error;
mod media;
pub mod strategy;

pub use crate::date::{CaptureDate, Detection, Provenance};
pub use crate::media::MediaKind;
pub use crate::strategy::{DateStrategy, Extractor, Probe};
