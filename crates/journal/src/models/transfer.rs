use crate::error::{Error, ErrorKind};
use derive_more::Display;
use exn::{OptionExt, ResultExt};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use time::UtcDateTime;

/// Outcome of a transfer as recorded in the journal.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum TransferStatus {
    #[display("moved")]
    Moved,
    #[display("copied")]
    Copied,
    #[display("failed")]
    Failed,
}

impl TransferStatus {
    /// Whether the file actually reached its destination.
    pub fn is_success(self) -> bool {
        !matches!(self, Self::Failed)
    }
}

impl FromStr for TransferStatus {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "moved" => Ok(Self::Moved),
            "copied" => Ok(Self::Copied),
            "failed" => Ok(Self::Failed),
            _ => exn::bail!(ErrorKind::InvalidData("transfer status")),
        }
    }
}

/// One appended journal entry: what happened to a single source file.
///
/// Append-only; the journal never updates or deletes these.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TransferRecord {
    pub source_path: PathBuf,
    /// Absent for failed transfers.
    pub destination_path: Option<PathBuf>,
    pub status: TransferStatus,
    pub recorded_at: UtcDateTime,
}

impl TransferRecord {
    /// A successful transfer, stamped with the current time.
    pub fn success(source: impl Into<PathBuf>, destination: impl Into<PathBuf>, status: TransferStatus) -> Self {
        Self {
            source_path: source.into(),
            destination_path: Some(destination.into()),
            status,
            recorded_at: UtcDateTime::now(),
        }
    }

    /// A failed transfer, stamped with the current time.
    pub fn failure(source: impl Into<PathBuf>) -> Self {
        Self {
            source_path: source.into(),
            destination_path: None,
            status: TransferStatus::Failed,
            recorded_at: UtcDateTime::now(),
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct TransferRow {
    pub(crate) source_path: String,
    pub(crate) destination_path: Option<String>,
    pub(crate) status: String,
    pub(crate) recorded_at: i64,
}

fn path_as_text(path: &Path) -> Result<String, Error> {
    // sqlx binds &str; a non-UTF-8 path has no faithful TEXT form.
    Ok(path.to_str().ok_or_raise(|| ErrorKind::InvalidData("path"))?.to_string())
}

impl TryFrom<&TransferRecord> for TransferRow {
    type Error = Error;
    fn try_from(record: &TransferRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            source_path: path_as_text(&record.source_path)?,
            destination_path: record.destination_path.as_deref().map(path_as_text).transpose()?,
            status: record.status.to_string(),
            recorded_at: record.recorded_at.unix_timestamp(),
        })
    }
}

impl TryFrom<TransferRow> for TransferRecord {
    type Error = Error;
    fn try_from(row: TransferRow) -> Result<Self, Self::Error> {
        Ok(Self {
            source_path: PathBuf::from(row.source_path),
            destination_path: row.destination_path.map(PathBuf::from),
            status: row.status.parse()?,
            recorded_at: UtcDateTime::from_unix_timestamp(row.recorded_at)
                .or_raise(|| ErrorKind::InvalidData("recorded-at timestamp"))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_to_model() {
        let recorded = UtcDateTime::now();
        let row = TransferRow {
            source_path: "dump/IMG_0412.jpg".to_string(),
            destination_path: Some("library/2023/07/IMG_0412.jpg".to_string()),
            status: "moved".to_string(),
            recorded_at: recorded.unix_timestamp(),
        };
        let record = TransferRecord::try_from(row).unwrap();
        assert_eq!(record.status, TransferStatus::Moved);
        // Unix timestamps are measured in whole seconds.
        assert_eq!(record.recorded_at, recorded.replace_nanosecond(0).unwrap());
    }

    #[test]
    fn test_model_to_row() {
        let record = TransferRecord::failure("dump/IMG_0412.jpg");
        let row = TransferRow::try_from(&record).unwrap();
        assert_eq!(row.status, "failed");
        assert_eq!(row.destination_path, None);
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        assert!("teleported".parse::<TransferStatus>().is_err());
    }
}
