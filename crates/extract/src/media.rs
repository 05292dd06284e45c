use derive_more::Display;
use std::path::Path;

/// Image extensions the organizer recognizes, lowercase.
pub const IMAGE_EXTENSIONS: &[&str] = &[
    "arw", "bmp", "cr2", "dng", "gif", "heic", "heif", "jpeg", "jpg", "nef", "orf", "png", "raf", "raw", "tif",
    "tiff", "webp",
];

/// Video extensions the organizer recognizes, lowercase.
pub const VIDEO_EXTENSIONS: &[&str] =
    &["3gp", "avi", "m2ts", "m4v", "mkv", "mov", "mp4", "mpeg", "mpg", "mts", "webm", "wmv"];

/// Coarse classification of a media file, decided by extension alone.
///
/// Files matching neither list are not media and never enter the pipeline.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum MediaKind {
    #[display("image")]
    Image,
    #[display("video")]
    Video,
}

impl MediaKind {
    /// Classify a path by its extension, case-insensitively.
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let extension = path.as_ref().extension()?.to_str()?.to_ascii_lowercase();
        if IMAGE_EXTENSIONS.contains(&extension.as_str()) {
            return Some(Self::Image);
        }
        if VIDEO_EXTENSIONS.contains(&extension.as_str()) {
            return Some(Self::Video);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("IMG_0412.jpg", Some(MediaKind::Image))]
    #[case("IMG_0412.JPG", Some(MediaKind::Image))]
    #[case("scan.tiff", Some(MediaKind::Image))]
    #[case("holiday.HEIC", Some(MediaKind::Image))]
    #[case("clip.mp4", Some(MediaKind::Video))]
    #[case("clip.MOV", Some(MediaKind::Video))]
    #[case("dump/nested/clip.mkv", Some(MediaKind::Video))]
    #[case("notes.txt", None)]
    #[case("archive.zip", None)]
    #[case("no_extension", None)]
    #[case(".hidden", None)]
    fn test_classification(#[case] path: &str, #[case] expected: Option<MediaKind>) {
        assert_eq!(MediaKind::from_path(path), expected);
    }
}
