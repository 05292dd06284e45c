//! Local filesystem storage backend.
//!
//! Files live under a configured root directory and are accessed with
//! `tokio::fs`. Paths handed to callers are always root-relative.

use crate::backend::FileInfoStream;
use crate::error::{ErrorKind, Result};
use crate::file::FileInfo;
use crate::path::validate as validate_path;
use crate::StorageBackend;
use async_stream::stream;
use async_trait::async_trait;
use exn::ResultExt;
use std::fs::{Metadata, create_dir_all as sync_create_dir};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Local filesystem storage backend.
///
/// # Examples
///
/// ```no_run
/// use shoebox_storage::backend::LocalBackend;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let backend = LocalBackend::new("fs", "/")?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct LocalBackend {
    name: String,
    /// Root directory all relative paths resolve against
    root: PathBuf,
}

impl LocalBackend {
    /// Create a new local filesystem backend rooted at an absolute directory.
    ///
    /// The root is created if it does not exist yet.
    ///
    /// # Errors
    /// Returns [`InvalidPath`](ErrorKind::InvalidPath) if the path is not
    /// absolute or exists but is not a directory.
    pub fn new(name: impl Into<String>, root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_absolute() {
            exn::bail!(ErrorKind::InvalidPath(root));
        }
        if root.exists() {
            if !root.is_dir() {
                exn::bail!(ErrorKind::InvalidPath(root));
            }
        } else {
            // Non-async is fine here; this happens once at startup and the
            // constructor stays synchronous.
            sync_create_dir(&root).map_err(|e| Self::map_io_error(e, &root))?;
        }
        Ok(Self { name: name.into(), root })
    }

    /// Resolve a validated relative path against the root.
    fn absolute_path(&self, path: impl AsRef<Path>) -> Result<PathBuf> {
        let validated = validate_path(path.as_ref())?;
        Ok(self.root.join(validated))
    }

    /// Strip the root prefix off an absolute path produced by a walk.
    fn relative_path(&self, absolute: &Path) -> Result<PathBuf> {
        let relative = absolute.strip_prefix(&self.root).or_raise(|| {
            ErrorKind::BackendError(format!(
                "path `{}` is not within root `{}`",
                absolute.display(),
                self.root.display()
            ))
        })?;
        validate_path(relative)
    }

    fn file_info(path: &Path, metadata: &Metadata) -> Result<FileInfo> {
        let modified = metadata.modified().map_err(ErrorKind::Io)?;
        Ok(FileInfo::new(path, metadata.len(), modified.into()))
    }

    fn map_io_error(e: std::io::Error, path: &Path) -> ErrorKind {
        match e.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied(path.to_path_buf()),
            _ => ErrorKind::Io(e),
        }
    }

    /// Create the parent directory of a destination before a write-like
    /// operation lands there.
    async fn prepare_parent(&self, abs: &Path, reported: &Path) -> Result<()> {
        if let Some(parent) = abs.parent() {
            fs::create_dir_all(parent).await.map_err(|e| Self::map_io_error(e, reported))?;
        }
        Ok(())
    }

    /// Fail with [`ErrorKind::AlreadyExists`] when a destination is occupied.
    async fn reject_occupied(&self, abs: &Path, reported: &Path) -> Result<()> {
        if fs::try_exists(abs).await.map_err(ErrorKind::Io)? {
            exn::bail!(ErrorKind::AlreadyExists(reported.to_path_buf()));
        }
        Ok(())
    }
}

#[async_trait]
impl StorageBackend for LocalBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn list_stream<'a>(&'a self, prefix: Option<&'a Path>, recursive: bool) -> FileInfoStream<'a> {
        let start = match prefix.map(validate_path).transpose() {
            Ok(validated) => validated.map(|p| self.root.join(p)).unwrap_or_else(|| self.root.clone()),
            Err(e) => return Box::pin(futures::stream::once(async { Err(e) })),
        };
        let mut stack = vec![start];

        Box::pin(stream! {
            while let Some(current) = stack.pop() {
                let mut entries = match fs::read_dir(&current).await {
                    Ok(entries) => entries,
                    // Listing a directory that doesn't exist is an empty
                    // result, not an error.
                    Err(err) if err.kind() == std::io::ErrorKind::NotFound => continue,
                    Err(err) => {
                        yield Err(exn::Exn::from(Self::map_io_error(err, &current)));
                        continue;
                    },
                };
                loop {
                    let entry = match entries.next_entry().await {
                        Ok(Some(entry)) => entry,
                        Ok(None) => break,
                        Err(e) => {
                            yield Err(exn::Exn::from(Self::map_io_error(e, &current)));
                            break;
                        },
                    };
                    let path = entry.path();
                    let metadata = match entry.metadata().await {
                        Ok(metadata) => metadata,
                        Err(e) => {
                            yield Err(exn::Exn::from(Self::map_io_error(e, &path)));
                            continue;
                        },
                    };
                    if metadata.is_dir() {
                        if recursive {
                            stack.push(path);
                        }
                        continue;
                    }
                    if !metadata.is_file() {
                        // Most likely a broken symlink; drop it.
                        continue;
                    }
                    yield self.relative_path(&path).and_then(|rel| Self::file_info(&rel, &metadata));
                }
            }
        })
    }

    async fn exists(&self, path: &Path) -> Result<bool> {
        let abs = self.absolute_path(path)?;
        Ok(fs::try_exists(&abs).await.map_err(ErrorKind::Io)?)
    }

    async fn stat(&self, path: &Path) -> Result<FileInfo> {
        let abs = self.absolute_path(path)?;
        let metadata = fs::metadata(&abs).await.map_err(|e| Self::map_io_error(e, path))?;
        Self::file_info(path, &metadata)
    }

    async fn read(&self, path: &Path) -> Result<Vec<u8>> {
        let abs = self.absolute_path(path)?;
        Ok(fs::read(&abs).await.map_err(|e| Self::map_io_error(e, path))?)
    }

    async fn write(&self, path: &Path, data: &[u8]) -> Result<()> {
        let abs = self.absolute_path(path)?;
        self.prepare_parent(&abs, path).await?;
        Ok(fs::write(&abs, data).await.map_err(|e| Self::map_io_error(e, path))?)
    }

    async fn remove(&self, path: &Path) -> Result<()> {
        let abs = self.absolute_path(path)?;
        Ok(fs::remove_file(&abs).await.map_err(|e| Self::map_io_error(e, path))?)
    }

    async fn ensure_dir(&self, path: &Path) -> Result<()> {
        let abs = self.absolute_path(path)?;
        Ok(fs::create_dir_all(&abs).await.map_err(|e| Self::map_io_error(e, path))?)
    }

    async fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        let from_abs = self.absolute_path(from)?;
        let to_abs = self.absolute_path(to)?;
        self.reject_occupied(&to_abs, to).await?;
        self.prepare_parent(&to_abs, to).await?;
        match fs::rename(&from_abs, &to_abs).await {
            Ok(()) => Ok(()),
            // A camera card and the library are usually different
            // filesystems; fall back to copy-then-delete.
            Err(e) if e.kind() == std::io::ErrorKind::CrossesDevices => {
                fs::copy(&from_abs, &to_abs).await.map_err(|e| Self::map_io_error(e, to))?;
                Ok(fs::remove_file(&from_abs).await.map_err(|e| Self::map_io_error(e, from))?)
            },
            Err(e) => Err(exn::Exn::from(Self::map_io_error(e, to))),
        }
    }

    async fn copy(&self, from: &Path, to: &Path) -> Result<()> {
        let from_abs = self.absolute_path(from)?;
        let to_abs = self.absolute_path(to)?;
        self.reject_occupied(&to_abs, to).await?;
        self.prepare_parent(&to_abs, to).await?;
        fs::copy(&from_abs, &to_abs).await.map_err(|e| Self::map_io_error(e, to))?;
        Ok(())
    }
}
