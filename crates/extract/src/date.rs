use crate::error::{ErrorKind, Result};
use derive_more::Display;
use time::Date;

/// The calendar date a media file was captured.
///
/// Only the date part matters to the organizer; times of day are discarded
/// at the point of detection.
#[derive(Clone, Copy, Debug, Display, Eq, Ord, PartialEq, PartialOrd)]
#[display("{year:04}-{month:02}-{day:02}")]
pub struct CaptureDate {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

impl CaptureDate {
    /// Build a capture date, validating field ranges.
    ///
    /// Day validation is deliberately loose (1–31): a filename claiming
    /// "February 31st" is garbage either way, and the bucket only uses year
    /// and month.
    pub fn new(year: u16, month: u8, day: u8) -> Result<Self> {
        if year == 0 {
            exn::bail!(ErrorKind::OutOfRange("year"));
        }
        if !(1..=12).contains(&month) {
            exn::bail!(ErrorKind::OutOfRange("month"));
        }
        if !(1..=31).contains(&day) {
            exn::bail!(ErrorKind::OutOfRange("day"));
        }
        Ok(Self { year, month, day })
    }

    /// Convert a civil [`Date`]; fails for years outside `1..=u16::MAX`.
    pub fn from_civil(date: Date) -> Result<Self> {
        let Ok(year) = u16::try_from(date.year()) else {
            exn::bail!(ErrorKind::OutOfRange("year"));
        };
        Self::new(year, u8::from(date.month()), date.day())
    }

    /// The `(year, month)` pair that determines the destination bucket.
    pub fn year_month(&self) -> (u16, u8) {
        (self.year, self.month)
    }
}

/// Where a detected date came from.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum Provenance {
    /// Embedded camera metadata (EXIF `DateTimeOriginal` and friends).
    #[display("camera metadata")]
    CameraMetadata,
    /// A timestamp pattern in the filename.
    #[display("filename pattern")]
    FilenamePattern,
    /// The filesystem's last-modified timestamp.
    #[display("file modified time")]
    FileModified,
}

/// A successful date detection: the date plus which strategy produced it.
///
/// Provenance matters downstream — filename-derived dates are journaled with
/// a warning since the pattern match is a guess, not a recording.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Detection {
    pub date: CaptureDate,
    pub source: Provenance,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use time::macros::date;

    #[test]
    fn test_display() {
        let date = CaptureDate::new(2023, 7, 15).unwrap();
        assert_eq!(date.to_string(), "2023-07-15");
    }

    #[rstest]
    #[case(0, 1, 1)]
    #[case(2023, 0, 1)]
    #[case(2023, 13, 1)]
    #[case(2023, 7, 0)]
    #[case(2023, 7, 32)]
    fn test_out_of_range_fields_are_rejected(#[case] year: u16, #[case] month: u8, #[case] day: u8) {
        assert!(CaptureDate::new(year, month, day).is_err());
    }

    #[test]
    fn test_from_civil() {
        let date = CaptureDate::from_civil(date!(2023 - 07 - 15)).unwrap();
        assert_eq!(date.year_month(), (2023, 7));
        assert_eq!(date.day, 15);
    }

    #[test]
    fn test_from_civil_rejects_negative_years() {
        assert!(CaptureDate::from_civil(date!(-0044 - 03 - 15)).is_err());
    }
}
