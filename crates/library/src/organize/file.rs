use crate::Context;
use crate::bucket::Bucket;
use crate::error::{ErrorKind as LibraryErrorKind, Result as LibraryResult};
use crate::organize::conflict::place;
use crate::organize::error::{ErrorKind, Result as OrganizeResult};
use exn::{OptionExt, ResultExt};
use shoebox_extract::{Detection, MediaKind, Probe, Provenance};
use shoebox_journal::{Issue, IssueCode, Repository, TransferRecord, TransferStatus};
use shoebox_storage::{BackendHandle, FileInfo, TransferMode};
use std::path::PathBuf;

/// The outcome of (successfully) handling a single file.
///
/// Consumers pattern-match to decide how loudly to report: a dated filing is
/// routine, an unsorted parking is worth a warning, a skip is only
/// interesting at debug level.
#[derive(Debug)]
pub enum Action {
    /// The file was transferred into its year/month bucket.
    Filed { source: PathBuf, destination: PathBuf, detection: Detection },
    /// No capture date could be determined; the file was transferred into
    /// the unsorted bucket instead.
    Unsorted { source: PathBuf, destination: PathBuf },
    /// The journal already holds a record for this source path; nothing was
    /// touched.
    AlreadySeen(PathBuf),
}

impl Action {
    /// The destination path, when a transfer actually happened.
    pub fn destination(&self) -> Option<&PathBuf> {
        match self {
            Self::Filed { destination, .. } | Self::Unsorted { destination, .. } => Some(destination),
            Self::AlreadySeen(_) => None,
        }
    }
}

/// Files a single media file into the target hierarchy.
///
/// The pipeline, in order:
/// 1. **Idempotence check** — a source path already in the journal is
///    returned as [`Action::AlreadySeen`] without touching the file.
/// 2. **Date detection** — the context's [`Extractor`](shoebox_extract::Extractor)
///    runs its strategies; images are read once so the EXIF strategy can see
///    the bytes.
/// 3. **Bucketing** — `(year, month)` maps to `target/<year>/<month>`,
///    undatable files to `target/unsorted`.
/// 4. **Placement** — the destination folder is created if missing and a
///    collision-free name is chosen (numeric suffix, never overwriting).
/// 5. **Transfer** — rename or copy per the context's [`TransferMode`].
/// 6. **Journal** — exactly one transfer record is appended, plus issue rows
///    for undated and filename-dated files.
///
/// # Errors
/// Returns [`Exn<LibraryErrorKind::Organize>`](LibraryErrorKind::Organize)
/// raised from an inner [`Exn<ErrorKind>`](ErrorKind).
pub async fn organize_file(
    backend: &BackendHandle,
    journal: &Repository,
    ctx: &Context,
    info: &FileInfo,
) -> LibraryResult<Action> {
    organize_file_inner(backend, journal, ctx, info).await.or_raise(|| LibraryErrorKind::Organize)
}

pub(crate) async fn organize_file_inner(
    backend: &BackendHandle,
    journal: &Repository,
    ctx: &Context,
    info: &FileInfo,
) -> OrganizeResult<Action> {
    if journal.seen(&info.path).await.or_raise(|| ErrorKind::Journal)? {
        return Ok(Action::AlreadySeen(info.path.clone()));
    }

    let Some(kind) = MediaKind::from_path(&info.path) else {
        exn::bail!(ErrorKind::Unsupported);
    };
    // Only images are read up front: the EXIF strategy needs the bytes,
    // while video dates come from the filename or mtime.
    let bytes = match kind {
        MediaKind::Image => Some(backend.read(&info.path).await.or_raise(|| ErrorKind::Transfer)?),
        MediaKind::Video => None,
    };
    let probe = Probe {
        path: &info.path,
        kind,
        modified: Some(info.modified),
        bytes: bytes.as_deref(),
    };
    let detection = ctx.extractor.detect(&probe);

    let bucket = Bucket::from_detection(detection.as_ref());
    let bucket_dir = ctx.target_root.join(bucket.relative_dir());
    backend.ensure_dir(&bucket_dir).await.or_raise(|| ErrorKind::Transfer)?;

    let file_name = info.path.file_name().and_then(|name| name.to_str()).ok_or_raise(|| ErrorKind::Unsupported)?;
    let destination = place(backend, &bucket_dir, file_name).await?;

    match ctx.mode {
        TransferMode::Move => backend.rename(&info.path, &destination).await.or_raise(|| ErrorKind::Transfer)?,
        TransferMode::Copy => backend.copy(&info.path, &destination).await.or_raise(|| ErrorKind::Transfer)?,
    }

    let status = match ctx.mode {
        TransferMode::Move => TransferStatus::Moved,
        TransferMode::Copy => TransferStatus::Copied,
    };
    let record = TransferRecord::success(&info.path, &destination, status);
    journal.record(&record).await.or_raise(|| ErrorKind::Journal)?;

    match detection {
        None => {
            let issue =
                Issue::new(&info.path, IssueCode::NoDateMetadata, format!("no capture date found for {kind} file"));
            journal.report(&issue).await.or_raise(|| ErrorKind::Journal)?;
            Ok(Action::Unsorted { source: info.path.clone(), destination })
        },
        Some(detection) => {
            if detection.source == Provenance::FilenamePattern {
                let issue = Issue::new(
                    &info.path,
                    IssueCode::FilenameDate,
                    format!("date {} taken from filename pattern", detection.date),
                );
                journal.report(&issue).await.or_raise(|| ErrorKind::Journal)?;
            }
            Ok(Action::Filed { source: info.path.clone(), destination, detection })
        },
    }
}
