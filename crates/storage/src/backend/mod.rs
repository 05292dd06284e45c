//! Storage backend trait and implementations.
//!
//! The organizer core never touches `std::fs` directly: directory listing,
//! metadata reads, folder creation and file transfer all go through the
//! [`StorageBackend`] trait so that tests can substitute an in-memory store
//! and failure modes can be simulated with decorators.

mod local;
#[cfg(feature = "mock")]
mod mock;
mod ro;

pub use self::local::LocalBackend;
#[cfg(feature = "mock")]
pub use self::mock::MockBackend;
pub use self::ro::ReadOnlyBackend;
use crate::error::Result;
use crate::file::FileInfo;
use async_trait::async_trait;
use futures::{Stream, TryStreamExt};
use std::path::Path;
use std::pin::Pin;

pub type FileInfoStream<'a> = Pin<Box<dyn Stream<Item = Result<FileInfo>> + Send + 'a>>;

/// Unified interface over a rooted file tree.
///
/// All paths are relative to the backend root and are validated with
/// [`validate_path`](crate::validate_path) by every implementation, so a
/// caller can pass untrusted names without escaping the root.
///
/// # Transfer semantics
/// [`rename`](Self::rename) and [`copy`](Self::copy) create missing parent
/// directories but refuse to replace an existing destination — collision
/// handling is the caller's decision, never a silent overwrite.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use shoebox_storage::{StorageBackend, error::Result};
///
/// async fn file_into_place(backend: &dyn StorageBackend) -> Result<()> {
///     backend.ensure_dir(Path::new("library/2023/07")).await?;
///     backend.rename(Path::new("dump/IMG_0412.jpg"), Path::new("library/2023/07/IMG_0412.jpg")).await
/// }
/// ```
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Name of the configured backend. Used for logging only.
    fn name(&self) -> &str;

    /// Stream metadata for regular files under `prefix` (the backend root
    /// when `None`).
    ///
    /// When `recursive` is `false` only the immediate directory level is
    /// listed; otherwise the whole subtree is walked. Listing a directory
    /// that does not exist yields an empty stream, not an error. Entries
    /// that are neither files nor directories (broken symlinks, sockets)
    /// are silently dropped.
    fn list_stream<'a>(&'a self, prefix: Option<&'a Path>, recursive: bool) -> FileInfoStream<'a>;

    /// Collect [`list_stream`](Self::list_stream) into a `Vec`.
    async fn list(&self, prefix: Option<&Path>, recursive: bool) -> Result<Vec<FileInfo>> {
        self.list_stream(prefix, recursive).try_collect().await
    }

    /// Check if a file exists.
    async fn exists(&self, path: &Path) -> Result<bool>;

    /// Get file metadata without reading contents.
    ///
    /// Returns [`NotFound`](crate::error::ErrorKind::NotFound) if the file
    /// does not exist.
    async fn stat(&self, path: &Path) -> Result<FileInfo>;

    /// Read complete file contents.
    ///
    /// Returns [`NotFound`](crate::error::ErrorKind::NotFound) if the file
    /// does not exist.
    async fn read(&self, path: &Path) -> Result<Vec<u8>>;

    /// Write file contents, creating parent directories as needed.
    async fn write(&self, path: &Path, data: &[u8]) -> Result<()>;

    /// Delete a file.
    ///
    /// Returns [`NotFound`](crate::error::ErrorKind::NotFound) if the file
    /// does not exist.
    async fn remove(&self, path: &Path) -> Result<()>;

    /// Create a directory and any missing parents.
    ///
    /// Idempotent: succeeds when the directory already exists.
    async fn ensure_dir(&self, path: &Path) -> Result<()>;

    /// Move a file, creating destination parents as needed.
    ///
    /// Returns [`NotFound`](crate::error::ErrorKind::NotFound) if the source
    /// does not exist and [`AlreadyExists`](crate::error::ErrorKind::AlreadyExists)
    /// if the destination is occupied. On failure the source is left in place.
    async fn rename(&self, from: &Path, to: &Path) -> Result<()>;

    /// Copy a file, creating destination parents as needed.
    ///
    /// Same error contract as [`rename`](Self::rename); the source is never
    /// modified.
    async fn copy(&self, from: &Path, to: &Path) -> Result<()>;
}
