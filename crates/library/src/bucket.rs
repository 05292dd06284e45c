use derive_more::Display;
use shoebox_extract::{CaptureDate, Detection};
use std::path::PathBuf;

/// Folder name for files whose capture date could not be determined.
pub const UNSORTED_DIR: &str = "unsorted";

/// The destination folder a file is assigned to, relative to the target root.
///
/// The mapping is deterministic: the same `(year, month)` always produces
/// the same folder, and everything undatable shares [`UNSORTED_DIR`].
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum Bucket {
    #[display("{year:04}/{month:02}")]
    Dated { year: u16, month: u8 },
    #[display("{UNSORTED_DIR}")]
    Unsorted,
}

impl Bucket {
    pub fn from_detection(detection: Option<&Detection>) -> Self {
        match detection {
            Some(detection) => Self::from_date(detection.date),
            None => Self::Unsorted,
        }
    }

    pub fn from_date(date: CaptureDate) -> Self {
        let (year, month) = date.year_month();
        Self::Dated { year, month }
    }

    /// The folder for this bucket, relative to the target root.
    pub fn relative_dir(&self) -> PathBuf {
        PathBuf::from(self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::path::Path;

    #[test]
    fn test_dated_bucket_is_zero_padded() {
        let date = CaptureDate::new(2023, 7, 15).unwrap();
        assert_eq!(Bucket::from_date(date).relative_dir(), Path::new("2023/07"));
    }

    #[rstest]
    #[case(2023, 7, 1, 2023, 7, 28)]
    #[case(1999, 12, 31, 1999, 12, 1)]
    fn test_same_year_month_same_folder(
        #[case] year_a: u16,
        #[case] month_a: u8,
        #[case] day_a: u8,
        #[case] year_b: u16,
        #[case] month_b: u8,
        #[case] day_b: u8,
    ) {
        let a = Bucket::from_date(CaptureDate::new(year_a, month_a, day_a).unwrap());
        let b = Bucket::from_date(CaptureDate::new(year_b, month_b, day_b).unwrap());
        assert_eq!(a.relative_dir(), b.relative_dir());
    }

    #[test]
    fn test_missing_detection_goes_to_unsorted() {
        assert_eq!(Bucket::from_detection(None), Bucket::Unsorted);
        assert_eq!(Bucket::Unsorted.relative_dir(), Path::new(UNSORTED_DIR));
    }
}
