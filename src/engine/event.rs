//! Progress notifications emitted by the engine.
//! One enum covers every decision point of a transfer; observers receive
//! borrowed events and copy out whatever they keep.

use std::fmt;
use std::path::Path;

use super::filter::{Rejection, Role};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferMethod {
    Renamed,
    Copied,
}

impl fmt::Display for TransferMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TransferMethod::Renamed => "renamed",
            TransferMethod::Copied => "copied",
        })
    }
}

/// Why a file ended up as a ledger failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    Filtered(Role, Rejection),
    PartitionRootDestination,
    OverwriteDeclined,
    CopyFailed(String),
    /// Neither a file nor a directory on disk
    IncorrectSourcePath,
    OutsideSourceRoot,
    NoDestination,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Filtered(role, rejection) => write!(f, "{role} {rejection}"),
            FailureReason::PartitionRootDestination => {
                f.write_str("destination directory is a partition root")
            }
            FailureReason::OverwriteDeclined => f.write_str("overwrite declined"),
            FailureReason::CopyFailed(e) => write!(f, "copy failed: {e}"),
            FailureReason::IncorrectSourcePath => f.write_str("incorrect source path"),
            FailureReason::OutsideSourceRoot => f.write_str("source is outside the source root"),
            FailureReason::NoDestination => f.write_str("no destination could be derived"),
        }
    }
}

#[derive(Debug, Clone)]
pub enum TransferEvent<'a> {
    /// The walker collected another file
    CalculatingSize { current: &'a Path, collected: usize },
    /// The copy pass is about to look at file `index` of `total`
    Processing {
        current: &'a Path,
        index: usize,
        total: usize,
    },
    /// Admission result of a file in the copy pass
    ConfirmCopy {
        source: &'a Path,
        destination: &'a Path,
        confirmed: bool,
    },
    BeforeCopy {
        source: &'a Path,
        destination: &'a Path,
    },
    Exists {
        destination: &'a Path,
        overwrite: bool,
    },
    Succeeded {
        source: &'a Path,
        destination: &'a Path,
        method: TransferMethod,
        bytes: u64,
    },
    Failed {
        source: &'a Path,
        destination: Option<&'a Path>,
        reason: FailureReason,
    },
}

impl TransferEvent<'_> {
    /// Short name, handy for logs and tests.
    pub fn kind(&self) -> &'static str {
        match self {
            TransferEvent::CalculatingSize { .. } => "calculating_size",
            TransferEvent::Processing { .. } => "processing",
            TransferEvent::ConfirmCopy { .. } => "confirm_copy",
            TransferEvent::BeforeCopy { .. } => "before_copy",
            TransferEvent::Exists { .. } => "exists",
            TransferEvent::Succeeded { .. } => "succeeded",
            TransferEvent::Failed { .. } => "failed",
        }
    }
}
