//! Read-only storage backend decorator.
//!
//! Wraps another backend and fails every mutating operation with
//! [`PermissionDenied`](crate::error::ErrorKind::PermissionDenied), exactly
//! as a read-only mount would. Tests use this to exercise the
//! transfer-failure path without needing real filesystem permissions.

use async_trait::async_trait;
use std::path::Path;

use crate::backend::FileInfoStream;
use crate::error::{ErrorKind, Result};
use crate::file::FileInfo;
use crate::{BackendHandle, StorageBackend};

/// Read-only decorator over any [`StorageBackend`].
#[derive(Clone)]
pub struct ReadOnlyBackend {
    inner: BackendHandle,
}

impl ReadOnlyBackend {
    pub fn new(inner: BackendHandle) -> Self {
        Self { inner }
    }

    fn deny(&self, path: &Path) -> crate::error::Error {
        tracing::debug!(backend = self.inner.name(), path = %path.display(), "Denying write in read-only mode");
        exn::Exn::from(ErrorKind::PermissionDenied(path.to_path_buf()))
    }
}

#[async_trait]
impl StorageBackend for ReadOnlyBackend {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn list_stream<'a>(&'a self, prefix: Option<&'a Path>, recursive: bool) -> FileInfoStream<'a> {
        self.inner.list_stream(prefix, recursive)
    }

    async fn exists(&self, path: &Path) -> Result<bool> {
        self.inner.exists(path).await
    }

    async fn stat(&self, path: &Path) -> Result<FileInfo> {
        self.inner.stat(path).await
    }

    async fn read(&self, path: &Path) -> Result<Vec<u8>> {
        self.inner.read(path).await
    }

    async fn write(&self, path: &Path, _data: &[u8]) -> Result<()> {
        Err(self.deny(path))
    }

    async fn remove(&self, path: &Path) -> Result<()> {
        Err(self.deny(path))
    }

    async fn ensure_dir(&self, path: &Path) -> Result<()> {
        Err(self.deny(path))
    }

    async fn rename(&self, from: &Path, _to: &Path) -> Result<()> {
        Err(self.deny(from))
    }

    async fn copy(&self, from: &Path, _to: &Path) -> Result<()> {
        Err(self.deny(from))
    }
}
