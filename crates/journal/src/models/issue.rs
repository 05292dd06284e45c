use crate::error::{Error, ErrorKind};
use exn::{OptionExt, ResultExt};
use std::path::PathBuf;
use time::UtcDateTime;

/// Numeric issue codes, carried in the journal for grep-ability.
///
/// Codes below 100 are warnings (the file was still filed somewhere); codes
/// from 100 up are errors.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum IssueCode {
    /// No capture date could be determined; the file went to `unsorted/`.
    NoDateMetadata = 10,
    /// The capture date was guessed from the filename.
    FilenameDate = 30,
    /// The transfer itself failed; the source file was left in place.
    TransferFailed = 300,
    /// A journal write failed.
    JournalWrite = 400,
}

impl IssueCode {
    pub fn code(self) -> i64 {
        self as i64
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            10 => Some(Self::NoDateMetadata),
            30 => Some(Self::FilenameDate),
            300 => Some(Self::TransferFailed),
            400 => Some(Self::JournalWrite),
            _ => None,
        }
    }

    pub fn is_warning(self) -> bool {
        self.code() < 100
    }
}

/// A warning or error observed while handling one file.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Issue {
    pub source_path: PathBuf,
    pub code: IssueCode,
    pub detail: String,
    pub recorded_at: UtcDateTime,
}

impl Issue {
    pub fn new(source: impl Into<PathBuf>, code: IssueCode, detail: impl Into<String>) -> Self {
        Self {
            source_path: source.into(),
            code,
            detail: detail.into(),
            recorded_at: UtcDateTime::now(),
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct IssueRow {
    pub(crate) source_path: String,
    pub(crate) code: i64,
    pub(crate) detail: String,
    pub(crate) recorded_at: i64,
}

impl TryFrom<&Issue> for IssueRow {
    type Error = Error;
    fn try_from(issue: &Issue) -> Result<Self, Self::Error> {
        Ok(Self {
            source_path: issue.source_path.to_str().ok_or_raise(|| ErrorKind::InvalidData("path"))?.to_string(),
            code: issue.code.code(),
            detail: issue.detail.clone(),
            recorded_at: issue.recorded_at.unix_timestamp(),
        })
    }
}

impl TryFrom<IssueRow> for Issue {
    type Error = Error;
    fn try_from(row: IssueRow) -> Result<Self, Self::Error> {
        Ok(Self {
            source_path: PathBuf::from(row.source_path),
            code: IssueCode::from_code(row.code).ok_or_raise(|| ErrorKind::InvalidData("issue code"))?,
            detail: row.detail,
            recorded_at: UtcDateTime::from_unix_timestamp(row.recorded_at)
                .or_raise(|| ErrorKind::InvalidData("recorded-at timestamp"))?,
        })
    }
}
