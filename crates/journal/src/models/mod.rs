mod issue;
mod transfer;

pub use self::issue::{Issue, IssueCode};
pub(crate) use self::issue::IssueRow;
pub use self::transfer::{TransferRecord, TransferStatus};
pub(crate) use self::transfer::TransferRow;
