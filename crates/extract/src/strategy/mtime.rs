//! Filesystem modified time, the strategy of last resort.

use crate::date::{CaptureDate, Provenance};
use crate::error::Result;
use crate::strategy::{DateStrategy, Probe};

/// Modified times before this year are copy artifacts (unset clocks, epoch
/// defaults), not capture dates.
const EPOCH_CUTOFF_YEAR: u16 = 1980;

/// Falls back to the file's last-modified timestamp.
pub struct MtimeStrategy;

impl DateStrategy for MtimeStrategy {
    fn provenance(&self) -> Provenance {
        Provenance::FileModified
    }

    fn extract(&self, probe: &Probe<'_>) -> Result<Option<CaptureDate>> {
        let Some(modified) = probe.modified else {
            return Ok(None);
        };
        match CaptureDate::from_civil(modified.date()) {
            Ok(date) if date.year >= EPOCH_CUTOFF_YEAR => Ok(Some(date)),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::MediaKind;
    use std::path::Path;
    use time::UtcDateTime;
    use time::macros::{date, time};

    fn probe(modified: Option<UtcDateTime>) -> Probe<'static> {
        Probe { path: Path::new("clip.mp4"), kind: MediaKind::Video, modified, bytes: None }
    }

    #[test]
    fn test_uses_modified_date() {
        let modified = UtcDateTime::new(date!(2023 - 07 - 15), time!(13:45:02));
        let date = MtimeStrategy.extract(&probe(Some(modified))).unwrap();
        assert_eq!(date, Some(CaptureDate::new(2023, 7, 15).unwrap()));
    }

    #[test]
    fn test_missing_metadata_yields_nothing() {
        assert_eq!(MtimeStrategy.extract(&probe(None)).unwrap(), None);
    }

    #[test]
    fn test_epoch_garbage_is_rejected() {
        let modified = UtcDateTime::new(date!(1970 - 01 - 01), time!(00:00:00));
        assert_eq!(MtimeStrategy.extract(&probe(Some(modified))).unwrap(), None);
    }
}
