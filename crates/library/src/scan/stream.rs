use crate::Context;
use crate::scan::error::{ErrorKind, Result as ScanResult};
use async_stream::stream;
use exn::ResultExt;
use futures::{Stream, StreamExt};
use shoebox_extract::MediaKind;
use shoebox_storage::{BackendHandle, FileInfo};

/// Streams the media files waiting under the source root.
///
/// Listing honours the context's `recursive` flag. Three kinds of entries
/// are dropped along the way, each with a debug log line:
/// - files whose extension is not a recognized image/video format,
/// - anything already under the target root (when the two trees overlap,
///   organizing output as input would be a feedback loop),
/// - files whose name is not valid UTF-8 (they could not be journaled
///   faithfully, so they are left untouched for a human).
pub fn scan<'a>(backend: &'a BackendHandle, ctx: &'a Context) -> impl Stream<Item = ScanResult<FileInfo>> + 'a {
    stream! {
        let mut listing = backend.list_stream(Some(ctx.source_root.as_path()), ctx.recursive);
        while let Some(item) = listing.next().await {
            let info = match item {
                Ok(info) => info,
                Err(e) => {
                    yield Err(e).or_raise(|| ErrorKind::Storage);
                    continue;
                },
            };
            if info.path.starts_with(&ctx.target_root) {
                tracing::debug!(path = %info.path.display(), "Skipping file already inside the target root");
                continue;
            }
            if info.path.to_str().is_none() {
                tracing::debug!(path = %info.path.display(), "Skipping file with non-UTF-8 name");
                continue;
            }
            if MediaKind::from_path(&info.path).is_none() {
                tracing::debug!(path = %info.path.display(), "Skipping non-media file");
                continue;
            }
            yield Ok(info);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::TryStreamExt;
    use shoebox_storage::TransferMode;
    use shoebox_storage::backend::MockBackend;
    use std::path::PathBuf;
    use std::sync::Arc;

    fn ctx(recursive: bool) -> Context {
        Context::new("camera", "library", TransferMode::Move, recursive)
    }

    #[tokio::test]
    async fn test_scan_filters_to_media_files() {
        let backend: BackendHandle = Arc::new(MockBackend::with_files([
            ("camera/IMG_0412.jpg", Vec::from(*b"jpeg")),
            ("camera/clip.mp4", Vec::from(*b"mpeg")),
            ("camera/notes.txt", Vec::from(*b"text")),
            ("camera/archive.zip", Vec::from(*b"zip")),
        ]));
        let mut paths: Vec<PathBuf> =
            scan(&backend, &ctx(false)).try_collect::<Vec<_>>().await.unwrap().into_iter().map(|f| f.path).collect();
        paths.sort();
        assert_eq!(paths, vec![PathBuf::from("camera/IMG_0412.jpg"), PathBuf::from("camera/clip.mp4")]);
    }

    #[tokio::test]
    async fn test_scan_flat_ignores_subdirectories() {
        let backend: BackendHandle = Arc::new(MockBackend::with_files([
            ("camera/top.jpg", Vec::from(*b"a")),
            ("camera/2022/old.jpg", Vec::from(*b"b")),
        ]));
        let files = scan(&backend, &ctx(false)).try_collect::<Vec<_>>().await.unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, PathBuf::from("camera/top.jpg"));
    }

    #[tokio::test]
    async fn test_scan_recursive_descends() {
        let backend: BackendHandle = Arc::new(MockBackend::with_files([
            ("camera/top.jpg", Vec::from(*b"a")),
            ("camera/2022/old.jpg", Vec::from(*b"b")),
        ]));
        let files = scan(&backend, &ctx(true)).try_collect::<Vec<_>>().await.unwrap();
        assert_eq!(files.len(), 2);
    }

    #[tokio::test]
    async fn test_scan_excludes_target_subtree() {
        // Target nested inside source: already-organized output must not be
        // rediscovered as input.
        let backend: BackendHandle = Arc::new(MockBackend::with_files([
            ("camera/top.jpg", Vec::from(*b"a")),
            ("camera/sorted/2023/07/done.jpg", Vec::from(*b"b")),
        ]));
        let ctx = Context::new("camera", "camera/sorted", TransferMode::Move, true);
        let files = scan(&backend, &ctx).try_collect::<Vec<_>>().await.unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, PathBuf::from("camera/top.jpg"));
    }

    #[tokio::test]
    async fn test_scan_empty_source_is_empty() {
        let backend: BackendHandle = Arc::new(MockBackend::default());
        let files = scan(&backend, &ctx(true)).try_collect::<Vec<_>>().await.unwrap();
        assert!(files.is_empty());
    }
}
