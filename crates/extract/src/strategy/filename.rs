//! Timestamp patterns in filenames.
//!
//! Phones and cameras bake the recording date into the filename in a handful
//! of well-known shapes. A matched date is still a guess, so the organizer
//! journals a warning when this strategy wins.

use crate::date::{CaptureDate, Provenance};
use crate::error::Result;
use crate::strategy::{DateStrategy, Probe};
use regex::{Captures, Regex};
use std::sync::LazyLock;
use time::Date;

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

// Separated year-month-day: "2023-07-15", "2023_07_15", "2023.07.15"
regex!(SEPARATED_YMD, r"(\d{4})[-_.](\d{2})[-_.](\d{2})");
// Device-prefixed compact stamps: "IMG_20230715", "VID-20230715", "PXL_20230715"
regex!(PREFIXED_YMD, r"(?:IMG|VID|PXL|PANO|MVIMG)[-_](\d{4})(\d{2})(\d{2})");
// Bare compact stamp bounded by non-digits: "20230715_134502"
regex!(COMPACT_YMD, r"(?:^|[^0-9])(\d{4})(\d{2})(\d{2})(?:[^0-9]|$)");
// Day-first with separators: "15-07-2023"
regex!(SEPARATED_DMY, r"(?:^|[^0-9])(\d{2})[-_.](\d{2})[-_.](\d{4})(?:[^0-9]|$)");

enum FieldOrder {
    YearFirst,
    DayFirst,
}

/// Extracts a date from the filename itself.
///
/// "Today" is injected rather than read from the clock so that the
/// future-stamp rejection below is deterministic under test.
pub struct FilenameStrategy {
    today: Date,
}

impl FilenameStrategy {
    pub fn new(today: Date) -> Self {
        Self { today }
    }

    fn parse(captures: &Captures<'_>, order: FieldOrder) -> Option<CaptureDate> {
        let field = |index: usize| captures.get(index)?.as_str().parse::<u16>().ok();
        let (year, month, day) = match order {
            FieldOrder::YearFirst => (field(1)?, field(2)?, field(3)?),
            FieldOrder::DayFirst => (field(3)?, field(2)?, field(1)?),
        };
        CaptureDate::new(year, u8::try_from(month).ok()?, u8::try_from(day).ok()?).ok()
    }

    /// A stamp from the future is a serial number, not a date.
    fn is_plausible(&self, date: CaptureDate) -> bool {
        let year = i32::from(date.year);
        year < self.today.year() || (year == self.today.year() && date.month <= u8::from(self.today.month()))
    }
}

impl DateStrategy for FilenameStrategy {
    fn provenance(&self) -> Provenance {
        Provenance::FilenamePattern
    }

    fn extract(&self, probe: &Probe<'_>) -> Result<Option<CaptureDate>> {
        let Some(name) = probe.path.file_name().and_then(|name| name.to_str()) else {
            return Ok(None);
        };
        let patterns = [
            (&SEPARATED_YMD, FieldOrder::YearFirst),
            (&PREFIXED_YMD, FieldOrder::YearFirst),
            (&COMPACT_YMD, FieldOrder::YearFirst),
            (&SEPARATED_DMY, FieldOrder::DayFirst),
        ];
        for (pattern, order) in patterns {
            let Some(captures) = pattern.captures(name) else {
                continue;
            };
            if let Some(date) = Self::parse(&captures, order)
                && self.is_plausible(date)
            {
                return Ok(Some(date));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::MediaKind;
    use rstest::rstest;
    use std::path::Path;
    use time::macros::date;

    fn extract(name: &str) -> Option<CaptureDate> {
        let strategy = FilenameStrategy::new(date!(2024 - 06 - 01));
        let path = Path::new(name);
        let probe = Probe { path, kind: MediaKind::Image, modified: None, bytes: None };
        strategy.extract(&probe).unwrap()
    }

    #[rstest]
    #[case("2023-07-15 beach.jpg", 2023, 7, 15)]
    #[case("holiday_2023_07_15.jpg", 2023, 7, 15)]
    #[case("IMG_20230715_134502.jpg", 2023, 7, 15)]
    #[case("VID-20230715.mp4", 2023, 7, 15)]
    #[case("PXL_20230715231402123.jpg", 2023, 7, 15)]
    #[case("20230715_134502.jpg", 2023, 7, 15)]
    #[case("15-07-2023.jpg", 2023, 7, 15)]
    #[case("scan 15_07_2023.png", 2023, 7, 15)]
    fn test_recognized_patterns(#[case] name: &str, #[case] year: u16, #[case] month: u8, #[case] day: u8) {
        assert_eq!(extract(name), Some(CaptureDate::new(year, month, day).unwrap()));
    }

    #[rstest]
    #[case("IMG_4032.jpg")]
    #[case("beach.jpg")]
    #[case("DSC01234.jpg")]
    #[case("invoice-123456789.pdf.jpg")]
    fn test_unrecognized_names(#[case] name: &str) {
        assert_eq!(extract(name), None);
    }

    #[test]
    fn test_future_stamps_are_rejected() {
        assert_eq!(extract("20991231_000000.jpg"), None);
        // Same year, later month than the injected "today".
        assert_eq!(extract("2024-12-01.jpg"), None);
        // Same year, earlier month is fine.
        assert_eq!(extract("2024-05-01.jpg"), Some(CaptureDate::new(2024, 5, 1).unwrap()));
    }

    #[test]
    fn test_invalid_calendar_fields_are_rejected() {
        // Looks like a compact stamp but the month is 17.
        assert_eq!(extract("20231715_134502.jpg"), None);
    }
}
