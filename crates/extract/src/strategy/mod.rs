//! Date-detection strategies.
//!
//! The fallback policy (camera metadata, then filename, then filesystem
//! timestamp) is expressed as an ordered list of [`DateStrategy`] values so
//! it stays explicit and testable instead of being buried in one long
//! function.

mod exif;
mod filename;
mod mtime;

pub use self::exif::ExifStrategy;
pub use self::filename::FilenameStrategy;
pub use self::mtime::MtimeStrategy;
use crate::date::{CaptureDate, Detection, Provenance};
use crate::error::Result;
use crate::media::MediaKind;
use std::path::Path;
use time::UtcDateTime;

/// Everything a strategy may look at for one file.
///
/// `bytes` is only populated for images — container probing a multi-gigabyte
/// video to maybe find a date is not worth the read, and the filename and
/// mtime strategies cover videos well in practice.
pub struct Probe<'a> {
    pub path: &'a Path,
    pub kind: MediaKind,
    pub modified: Option<UtcDateTime>,
    pub bytes: Option<&'a [u8]>,
}

/// One way of determining a capture date.
pub trait DateStrategy: Send + Sync {
    /// The provenance recorded when this strategy produces a date.
    fn provenance(&self) -> Provenance;

    /// Whether this strategy is worth running for the given media kind.
    fn applies_to(&self, kind: MediaKind) -> bool {
        let _ = kind;
        true
    }

    /// Attempt to extract a date. `Ok(None)` means "nothing found, try the
    /// next strategy"; an error means the same but is worth a log line.
    fn extract(&self, probe: &Probe<'_>) -> Result<Option<CaptureDate>>;
}

/// Ordered strategy list; the first hit wins.
pub struct Extractor {
    strategies: Vec<Box<dyn DateStrategy>>,
}

impl Extractor {
    /// The standard policy: embedded metadata, then filename pattern, then
    /// filesystem modified time.
    pub fn standard() -> Self {
        Self::with_strategies(vec![
            Box::new(ExifStrategy),
            Box::new(FilenameStrategy::new(UtcDateTime::now().date())),
            Box::new(MtimeStrategy),
        ])
    }

    pub fn with_strategies(strategies: Vec<Box<dyn DateStrategy>>) -> Self {
        Self { strategies }
    }

    /// Run the strategies in order and return the first detection.
    ///
    /// Never fails: strategy errors are logged at debug level and skipped,
    /// and exhausting the list yields `None` (the "unknown" bucket).
    pub fn detect(&self, probe: &Probe<'_>) -> Option<Detection> {
        for strategy in &self.strategies {
            if !strategy.applies_to(probe.kind) {
                continue;
            }
            match strategy.extract(probe) {
                Ok(Some(date)) => {
                    tracing::debug!(path = %probe.path.display(), %date, source = %strategy.provenance(), "Capture date detected");
                    return Some(Detection { date, source: strategy.provenance() });
                },
                Ok(None) => {},
                Err(err) => {
                    tracing::debug!(path = %probe.path.display(), source = %strategy.provenance(), error = %err, "Date strategy failed; trying the next one");
                },
            }
        }
        None
    }
}
