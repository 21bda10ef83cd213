//! Typed error definitions for copyutil.
//! Startup failures are fatal; per-file failures never surface here, they end up in the ledger.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CopyUtilError {
    #[error("Source path is not specified")]
    SourceRootUnset,

    #[error("Source path does not exist: {0}")]
    SourceRootMissing(PathBuf),

    #[error("Source path is not a directory: {0}")]
    SourceRootNotDir(PathBuf),

    #[error("Cannot read source directory {path}: {context}")]
    SourceRootUnreadable { path: PathBuf, context: String },

    #[error("Destination path is not specified")]
    DestinationRootUnset,

    #[error("Destination path exists but is not a directory: {0}")]
    DestinationRootNotDir(PathBuf),

    #[error("Source path {0} is same as destination path")]
    SameRoots(PathBuf),

    #[error("Cannot read list file {path}: {context}")]
    ListFile { path: PathBuf, context: String },

    /// A path handed to the source filter does not live under the source root.
    /// Indicates a resolution bug upstream, never a user error.
    #[error("Source file {path} does not start with source root {root}")]
    OutsideSourceRoot { path: PathBuf, root: PathBuf },

    #[error("Operation interrupted by user")]
    Interrupted,
}

impl CopyUtilError {
    /// Stable numeric code for structured logs.
    pub fn code(&self) -> u16 {
        match self {
            CopyUtilError::SourceRootUnset => 10,
            CopyUtilError::SourceRootMissing(_) => 11,
            CopyUtilError::SourceRootNotDir(_) => 12,
            CopyUtilError::SourceRootUnreadable { .. } => 13,
            CopyUtilError::DestinationRootUnset => 20,
            CopyUtilError::DestinationRootNotDir(_) => 21,
            CopyUtilError::SameRoots(_) => 30,
            CopyUtilError::ListFile { .. } => 40,
            CopyUtilError::OutsideSourceRoot { .. } => 50,
            CopyUtilError::Interrupted => 130,
        }
    }

    /// True for errors that abort the run before anything is processed.
    pub fn is_config_error(&self) -> bool {
        !matches!(
            self,
            CopyUtilError::OutsideSourceRoot { .. } | CopyUtilError::Interrupted
        )
    }
}
