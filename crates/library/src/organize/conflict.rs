use crate::organize::error::{ErrorKind, Result};
use exn::ResultExt;
use shoebox_storage::BackendHandle;
use std::path::{Path, PathBuf};

/// Suffixes tried before giving up on a name.
const MAX_SUFFIX: u32 = 99;

/// Picks a destination inside `dir` for `file_name` that is not occupied.
///
/// The original name is preferred; on collision a numeric suffix is inserted
/// before the extension (`IMG_0412.jpg`, `IMG_0412-1.jpg`, `IMG_0412-2.jpg`,
/// ...). Existing files are never overwritten — past [`MAX_SUFFIX`] the file
/// fails with [`ErrorKind::Conflict`] rather than clobbering anything.
///
/// The pipeline is single-threaded, so an exists-then-transfer sequence
/// cannot race against another worker.
pub(crate) async fn place(backend: &BackendHandle, dir: &Path, file_name: &str) -> Result<PathBuf> {
    let candidate = dir.join(file_name);
    if !backend.exists(&candidate).await.or_raise(|| ErrorKind::Transfer)? {
        return Ok(candidate);
    }
    let (stem, extension) = match file_name.rsplit_once('.') {
        Some((stem, extension)) if !stem.is_empty() => (stem, Some(extension)),
        _ => (file_name, None),
    };
    for suffix in 1..=MAX_SUFFIX {
        let name = match extension {
            Some(extension) => format!("{stem}-{suffix}.{extension}"),
            None => format!("{stem}-{suffix}"),
        };
        let candidate = dir.join(name);
        if !backend.exists(&candidate).await.or_raise(|| ErrorKind::Transfer)? {
            return Ok(candidate);
        }
    }
    exn::bail!(ErrorKind::Conflict)
}
