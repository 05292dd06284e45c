//! Path validation and normalization.
//!
//! Every path handed to a storage backend is relative to that backend's root.
//! Validation rejects anything that would resolve outside the root, so a
//! hostile filename in a camera dump cannot place a file outside the library.

use std::path::{Component, Path, PathBuf};

use crate::error::{ErrorKind, Result};

/// Validates and normalizes a backend-relative path.
///
/// Leading slashes and `.` components are dropped, and `..` components are
/// resolved against what came before them. A path that would climb above the
/// backend root, contains a null byte, or normalizes to nothing is rejected
/// with [`InvalidPath`](crate::error::ErrorKind::InvalidPath).
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use shoebox_storage::validate_path;
/// assert_eq!(validate_path("2023/07/IMG_0412.jpg").unwrap(), Path::new("2023/07/IMG_0412.jpg"));
/// assert_eq!(validate_path("dump/./a/../IMG_0412.jpg").unwrap(), Path::new("dump/IMG_0412.jpg"));
/// assert!(validate_path("../outside").is_err());
/// assert!(validate_path("a/../../b").is_err());
/// ```
pub fn validate(path: impl AsRef<Path>) -> Result<PathBuf> {
    let original = path.as_ref();
    let mut clean = PathBuf::new();
    for component in original.components() {
        match component {
            Component::Normal(part) => {
                // Null bytes survive Path::components() on Unix but truncate
                // strings at the syscall boundary.
                if part.as_encoded_bytes().contains(&0) {
                    exn::bail!(ErrorKind::InvalidPath(original.to_path_buf()));
                }
                clean.push(part);
            },
            Component::CurDir | Component::RootDir => {},
            Component::Prefix(_) => exn::bail!(ErrorKind::InvalidPath(original.to_path_buf())),
            Component::ParentDir => {
                if !clean.pop() {
                    exn::bail!(ErrorKind::InvalidPath(original.to_path_buf()));
                }
            },
        }
    }
    if clean.as_os_str().is_empty() {
        exn::bail!(ErrorKind::InvalidPath(original.to_path_buf()));
    }
    Ok(clean)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_paths_pass_through() {
        assert_eq!(validate("IMG_0412.jpg").unwrap(), Path::new("IMG_0412.jpg"));
        assert_eq!(validate("2023/07/IMG_0412.jpg").unwrap(), Path::new("2023/07/IMG_0412.jpg"));
    }

    #[test]
    fn test_normalization() {
        assert_eq!(validate("dump//clip.mp4").unwrap(), Path::new("dump/clip.mp4"));
        assert_eq!(validate("./dump/./clip.mp4").unwrap(), Path::new("dump/clip.mp4"));
        assert_eq!(validate("dump/clip.mp4/").unwrap(), Path::new("dump/clip.mp4"));
        // Parent references that stay inside the root are resolved, not rejected.
        assert_eq!(validate("dump/raw/../clip.mp4").unwrap(), Path::new("dump/clip.mp4"));
    }

    #[test]
    fn test_traversal_is_rejected() {
        assert!(validate("../etc/passwd").is_err());
        assert!(validate("dump/../../elsewhere").is_err());
        assert!(validate("..").is_err());
    }

    #[test]
    fn test_null_bytes_are_rejected() {
        assert!(validate("clip\0.mp4").is_err());
    }

    #[test]
    fn test_empty_results_are_rejected() {
        assert!(validate("").is_err());
        assert!(validate(".").is_err());
        assert!(validate("a/..").is_err());
        assert!(validate("//").is_err());
    }
}
