use shoebox_extract::Extractor;
use shoebox_storage::TransferMode;
use std::path::PathBuf;

/// Everything an organize run needs to know, resolved up front.
///
/// Both roots are backend-relative paths; the binary derives them from the
/// CLI arguments, tests point them at directories inside a mock backend.
pub struct Context {
    /// Directory the media files are scanned from.
    pub source_root: PathBuf,
    /// Directory the year/month hierarchy is built under.
    pub target_root: PathBuf,
    pub mode: TransferMode,
    /// Whether to descend into subdirectories of the source root.
    pub recursive: bool,
    pub extractor: Extractor,
}

impl Context {
    /// A context with the standard date-detection policy.
    pub fn new(
        source_root: impl Into<PathBuf>,
        target_root: impl Into<PathBuf>,
        mode: TransferMode,
        recursive: bool,
    ) -> Self {
        Self {
            source_root: source_root.into(),
            target_root: target_root.into(),
            mode,
            recursive,
            extractor: Extractor::standard(),
        }
    }

    /// Replace the date-detection policy (tests use this to pin dates).
    pub fn with_extractor(mut self, extractor: Extractor) -> Self {
        self.extractor = extractor;
        self
    }
}
