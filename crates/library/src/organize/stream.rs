use crate::Context;
use crate::error::{ErrorKind as LibraryErrorKind, Result as LibraryResult};
use crate::organize::error::{ErrorKind, Result as OrganizeResult};
use crate::organize::file::{Action, organize_file_inner};
use crate::scan::scan;
use async_stream::stream;
use exn::ResultExt;
use futures::{Stream, TryStreamExt};
use shoebox_journal::{Issue, IssueCode, Repository, TransferRecord};
use shoebox_storage::{BackendHandle, FileInfo};
use std::ops::Deref;
use std::path::PathBuf;

/// Progress events emitted by [`organize`] as it works through the source
/// directory.
///
/// Events follow a strict ordering:
/// 1. [`Started`](Self::Started) — exactly once.
/// 2. [`DiscoveryComplete`](Self::DiscoveryComplete) — exactly once, with
///    the total media file count.
/// 3. [`Organized`](Self::Organized) / [`TransferFailed`](Self::TransferFailed)
///    — zero or more times, one per file.
/// 4. [`Complete`](Self::Complete) — exactly once, with the run totals.
///
/// A fatal error terminates the stream early, in which case
/// [`Complete`](Self::Complete) is never emitted.
#[derive(Debug)]
pub enum OrganizeEvent {
    /// Organizing has begun; emitted exactly once before any other event.
    Started,
    /// The source listing has been collected; the total count is now known.
    DiscoveryComplete(u64),
    /// A file has been handled (filed, parked in unsorted, or skipped).
    Organized(Action),
    /// A file's transfer failed; it was journaled as failed and left in
    /// place, and the run continues.
    TransferFailed { path: PathBuf, reason: String },
    /// All discovered files have been handled; the stream is finished.
    Complete(Summary),
}

/// Totals for one organize run.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Summary {
    /// Files transferred into a dated bucket.
    pub filed: u64,
    /// Files transferred into the unsorted bucket.
    pub unsorted: u64,
    /// Files skipped because the journal had already seen them.
    pub skipped: u64,
    /// Files whose transfer failed.
    pub failed: u64,
}

impl Summary {
    fn tally(&mut self, action: &Action) {
        match action {
            Action::Filed { .. } => self.filed += 1,
            Action::Unsorted { .. } => self.unsorted += 1,
            Action::AlreadySeen(_) => self.skipped += 1,
        }
    }

    /// Total number of files the run looked at.
    pub fn processed(&self) -> u64 {
        self.filed + self.unsorted + self.skipped + self.failed
    }

    /// `true` when no file failed to transfer (the exit-code criterion).
    pub fn fully_successful(&self) -> bool {
        self.failed == 0
    }
}

/// Streams [`OrganizeEvent`]s for every media file under the source root,
/// filing each one into the target hierarchy.
///
/// Files are processed strictly sequentially — one transfer in flight at a
/// time, in listing order. A per-file transfer failure appends a `failed`
/// journal row plus an issue row and the run continues with the next file;
/// source-listing and journal failures are fatal and terminate the stream
/// with an error.
pub fn organize<'a>(
    backend: &'a BackendHandle,
    journal: &'a Repository,
    ctx: &'a Context,
) -> impl Stream<Item = LibraryResult<OrganizeEvent>> + 'a {
    // `rustfmt` does not format macro-specific syntax such as
    // `for await` even using the parentheses trick.
    stream! {
        for await event in organize_inner(backend, journal, ctx) {
            yield event.or_raise(|| LibraryErrorKind::Organize);
        }
    }
}

fn organize_inner<'a>(
    backend: &'a BackendHandle,
    journal: &'a Repository,
    ctx: &'a Context,
) -> impl Stream<Item = OrganizeResult<OrganizeEvent>> + 'a {
    // `rustfmt` does not format macros that use braces. Wrap in parentheses!
    stream!({
        yield Ok(OrganizeEvent::Started);

        // Collect the listing up front so the total is known before any
        // transfer starts (and a file moved into `unsorted/` can never be
        // picked up again by the very scan that is moving it).
        let files: Vec<FileInfo> = match scan(backend, ctx).try_collect().await {
            Ok(files) => files,
            Err(e) => {
                yield Err(e.raise(ErrorKind::Scan));
                return;
            },
        };
        // Infallible: a usize (either 32- or 64-bit) will always fit in a u64.
        yield Ok(OrganizeEvent::DiscoveryComplete(u64::try_from(files.len()).unwrap_or(0)));

        let mut summary = Summary::default();
        for info in &files {
            match organize_file_inner(backend, journal, ctx, info).await {
                Ok(action) => {
                    summary.tally(&action);
                    yield Ok(OrganizeEvent::Organized(action));
                },
                Err(e) if e.deref().is_fatal() => {
                    yield Err(e);
                    return;
                },
                Err(e) => {
                    summary.failed += 1;
                    let reason = e.deref().to_string();
                    if let Err(journal_err) = journal.record(&TransferRecord::failure(&info.path)).await {
                        yield Err(journal_err.raise(ErrorKind::Journal));
                        return;
                    }
                    let issue = Issue::new(&info.path, IssueCode::TransferFailed, reason.clone());
                    if let Err(journal_err) = journal.report(&issue).await {
                        yield Err(journal_err.raise(ErrorKind::Journal));
                        return;
                    }
                    yield Ok(OrganizeEvent::TransferFailed { path: info.path.clone(), reason });
                },
            }
        }

        yield Ok(OrganizeEvent::Complete(summary));
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use shoebox_extract::Extractor;
    use shoebox_extract::strategy::FilenameStrategy;
    use shoebox_journal::{Database, TransferStatus};
    use shoebox_storage::TransferMode;
    use shoebox_storage::backend::{MockBackend, ReadOnlyBackend};
    use std::path::Path;
    use std::sync::Arc;
    use time::macros::date;

    /// Filename-only detection keeps the tests deterministic: no EXIF bytes
    /// to fake and no wall-clock mtime sneaking in through the mock.
    fn filename_only() -> Extractor {
        Extractor::with_strategies(vec![Box::new(FilenameStrategy::new(date!(2024 - 06 - 01)))])
    }

    fn ctx(mode: TransferMode, recursive: bool) -> Context {
        Context::new("camera", "library", mode, recursive).with_extractor(filename_only())
    }

    async fn journal() -> Repository {
        let db = Database::connect_in_memory().await.unwrap();
        Repository::from(&db)
    }

    async fn run(backend: &BackendHandle, journal: &Repository, ctx: &Context) -> (Vec<OrganizeEvent>, Summary) {
        let events: Vec<OrganizeEvent> = organize(backend, journal, ctx).try_collect().await.unwrap();
        let summary = events
            .iter()
            .find_map(|event| match event {
                OrganizeEvent::Complete(summary) => Some(*summary),
                _ => None,
            })
            .expect("stream must end with Complete");
        (events, summary)
    }

    #[tokio::test]
    async fn test_move_run_files_by_year_month() {
        let backend: BackendHandle = Arc::new(MockBackend::with_files([
            ("camera/IMG_20230715_134502.jpg", Vec::from(*b"a")),
            ("camera/2023-07-01 picnic.jpg", Vec::from(*b"b")),
            ("camera/VID-20221231.mp4", Vec::from(*b"c")),
        ]));
        let journal = journal().await;
        let ctx = ctx(TransferMode::Move, false);
        let (events, summary) = run(&backend, &journal, &ctx).await;

        assert!(matches!(events.first(), Some(OrganizeEvent::Started)));
        assert!(events.iter().any(|e| matches!(e, OrganizeEvent::DiscoveryComplete(3))));
        assert_eq!(summary, Summary { filed: 3, unsorted: 0, skipped: 0, failed: 0 });
        assert!(summary.fully_successful());

        // Same (year, month) shares a folder; the sources are gone.
        assert!(backend.exists(Path::new("library/2023/07/IMG_20230715_134502.jpg")).await.unwrap());
        assert!(backend.exists(Path::new("library/2023/07/2023-07-01 picnic.jpg")).await.unwrap());
        assert!(backend.exists(Path::new("library/2022/12/VID-20221231.mp4")).await.unwrap());
        assert!(!backend.exists(Path::new("camera/IMG_20230715_134502.jpg")).await.unwrap());
        assert!(!backend.exists(Path::new("camera/2023-07-01 picnic.jpg")).await.unwrap());
        assert!(!backend.exists(Path::new("camera/VID-20221231.mp4")).await.unwrap());
    }

    #[tokio::test]
    async fn test_undatable_files_are_parked_in_unsorted() {
        let backend: BackendHandle = Arc::new(MockBackend::with_files([("camera/beach.jpg", Vec::from(*b"a"))]));
        let journal = journal().await;
        let ctx = ctx(TransferMode::Move, false);
        let (_events, summary) = run(&backend, &journal, &ctx).await;

        assert_eq!(summary, Summary { filed: 0, unsorted: 1, skipped: 0, failed: 0 });
        assert!(backend.exists(Path::new("library/unsorted/beach.jpg")).await.unwrap());
        // An issue row documents why the file was not dated.
        let issues = journal.issues_for("camera/beach.jpg").await.unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, IssueCode::NoDateMetadata);
    }

    #[tokio::test]
    async fn test_rerun_transfers_nothing() {
        let backend: BackendHandle = Arc::new(MockBackend::with_files([
            ("camera/IMG_20230715.jpg", Vec::from(*b"a")),
            ("camera/IMG_20230716.jpg", Vec::from(*b"b")),
        ]));
        let journal = journal().await;
        // Copy mode keeps the sources around, so only the journal prevents
        // the second run from re-transferring them.
        let ctx = ctx(TransferMode::Copy, false);

        let (_events, first) = run(&backend, &journal, &ctx).await;
        assert_eq!(first, Summary { filed: 2, unsorted: 0, skipped: 0, failed: 0 });

        let (_events, second) = run(&backend, &journal, &ctx).await;
        assert_eq!(second, Summary { filed: 0, unsorted: 0, skipped: 2, failed: 0 });
        // No duplicate destinations were created by the second run.
        assert!(!backend.exists(Path::new("library/2023/07/IMG_20230715-1.jpg")).await.unwrap());
    }

    #[tokio::test]
    async fn test_copy_mode_keeps_sources() {
        let backend: BackendHandle = Arc::new(MockBackend::with_files([("camera/IMG_20230715.jpg", Vec::from(*b"a"))]));
        let journal = journal().await;
        let ctx = ctx(TransferMode::Copy, false);
        let (_events, summary) = run(&backend, &journal, &ctx).await;

        assert_eq!(summary.filed, 1);
        assert!(backend.exists(Path::new("camera/IMG_20230715.jpg")).await.unwrap());
        assert!(backend.exists(Path::new("library/2023/07/IMG_20230715.jpg")).await.unwrap());
        let record = journal.get("camera/IMG_20230715.jpg").await.unwrap().unwrap();
        assert_eq!(record.status, TransferStatus::Copied);
    }

    #[tokio::test]
    async fn test_transfer_failure_is_journaled_and_run_continues() {
        let inner: BackendHandle = Arc::new(MockBackend::with_files([
            ("camera/IMG_20230715.jpg", Vec::from(*b"a")),
            ("camera/IMG_20230716.jpg", Vec::from(*b"b")),
        ]));
        // Read-only destination: every mutation is denied, as on a read-only
        // mount.
        let backend: BackendHandle = Arc::new(ReadOnlyBackend::new(inner.clone()));
        let journal = journal().await;
        let ctx = ctx(TransferMode::Move, false);
        let (events, summary) = run(&backend, &journal, &ctx).await;

        assert_eq!(summary, Summary { filed: 0, unsorted: 0, skipped: 0, failed: 2 });
        assert_eq!(events.iter().filter(|e| matches!(e, OrganizeEvent::TransferFailed { .. })).count(), 2);
        // The sources are untouched and journaled as failed.
        assert!(inner.exists(Path::new("camera/IMG_20230715.jpg")).await.unwrap());
        assert!(inner.exists(Path::new("camera/IMG_20230716.jpg")).await.unwrap());
        let record = journal.get("camera/IMG_20230715.jpg").await.unwrap().unwrap();
        assert_eq!(record.status, TransferStatus::Failed);
        assert!(record.destination_path.is_none());
    }

    #[tokio::test]
    async fn test_already_journaled_files_are_skipped() {
        let backend: BackendHandle = Arc::new(MockBackend::with_files([("camera/IMG_20230715.jpg", Vec::from(*b"a"))]));
        let journal = journal().await;
        journal
            .record(&TransferRecord::success(
                "camera/IMG_20230715.jpg",
                "library/2023/07/IMG_20230715.jpg",
                TransferStatus::Moved,
            ))
            .await
            .unwrap();
        let ctx = ctx(TransferMode::Move, false);
        let (_events, summary) = run(&backend, &journal, &ctx).await;

        assert_eq!(summary, Summary { filed: 0, unsorted: 0, skipped: 1, failed: 0 });
        // The file itself was not touched.
        assert!(backend.exists(Path::new("camera/IMG_20230715.jpg")).await.unwrap());
    }

    #[tokio::test]
    async fn test_empty_source_completes_with_zero_transfers() {
        let backend: BackendHandle = Arc::new(MockBackend::default());
        let journal = journal().await;
        let ctx = ctx(TransferMode::Move, true);
        let (events, summary) = run(&backend, &journal, &ctx).await;

        assert!(events.iter().any(|e| matches!(e, OrganizeEvent::DiscoveryComplete(0))));
        assert_eq!(summary, Summary::default());
        assert!(summary.fully_successful());
    }

    #[tokio::test]
    async fn test_name_collisions_get_numeric_suffixes() {
        let backend: BackendHandle = Arc::new(MockBackend::with_files([
            ("camera/a/IMG_20230715.jpg", Vec::from(*b"first")),
            ("camera/b/IMG_20230715.jpg", Vec::from(*b"second")),
        ]));
        let journal = journal().await;
        let ctx = ctx(TransferMode::Move, true);
        let (_events, summary) = run(&backend, &journal, &ctx).await;

        assert_eq!(summary.filed, 2);
        assert!(backend.exists(Path::new("library/2023/07/IMG_20230715.jpg")).await.unwrap());
        assert!(backend.exists(Path::new("library/2023/07/IMG_20230715-1.jpg")).await.unwrap());
    }

    #[tokio::test]
    async fn test_unreadable_source_is_fatal() {
        let backend: BackendHandle = Arc::new(MockBackend::default());
        let journal = journal().await;
        // An invalid source root fails validation inside the listing, which
        // the stream surfaces as a fatal scan error.
        let ctx = Context::new("..", "library", TransferMode::Move, false).with_extractor(filename_only());
        let result: Result<Vec<OrganizeEvent>, _> = organize(&backend, &journal, &ctx).try_collect().await;
        assert!(result.is_err());
    }
}
