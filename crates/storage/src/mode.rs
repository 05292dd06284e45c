use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Whether a transfer leaves the original file behind.
///
/// Moving is the default: the tool exists to drain camera dumps, not to
/// mirror them. Copy mode is for runs against media the user wants to keep
/// in place (e.g. a card that will be wiped by the camera anyway).
#[derive(Clone, Copy, Debug, Default, Display, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferMode {
    #[default]
    #[display("move")]
    Move,
    #[display("copy")]
    Copy,
}

impl TransferMode {
    /// Returns `true` when the source file is removed by the transfer.
    pub fn removes_source(self) -> bool {
        matches!(self, Self::Move)
    }
}
