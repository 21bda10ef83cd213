//! Core library for `copyutil`.
//!
//! Copies or moves a tree of files from a source root to a destination root.
//! For every requested relative path the engine filters reserved and excluded
//! paths, derives the destination, tries a rename when asked to and falls back
//! to a buffered copy, and records one outcome per source file.
//!
//! ```no_run
//! use copyutil::{ExclusionConfig, RunConfig};
//!
//! let cfg = RunConfig::new("/data/photos", "/backup");
//! let report = copyutil::run(cfg, ExclusionConfig::default())?;
//! println!("{}", report.summary_line());
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod fs_ops;
pub mod output;
pub mod prompt;
pub mod shutdown;

pub use config::{
    CONFIG_ENV, Config, ExclusionConfig, LogLevel, ROOT_SENTINEL, RunConfig,
    SYSTEM_RESERVED_NAMES, create_template_config, default_config_path, default_log_path,
    load_config_from_xml, load_config_from_xml_path, path_has_symlink_ancestor, read_list_file,
    validate_and_normalize,
};
pub use engine::{
    Depth, LedgerEntry, PathFilter, ResultLedger, Role, RunReport, TransferEngine, TransferEvent,
    TransferMethod, run,
};
pub use errors::CopyUtilError;
pub use fs_ops::{FileOps, LocalFs};
pub use prompt::{FixedAnswer, Prompt};
pub use shutdown::CancelToken;

pub mod prelude {
    pub use crate::config::{Config, ExclusionConfig, LogLevel, RunConfig};
    pub use crate::engine::{RunReport, TransferEngine, TransferEvent, run};
    pub use crate::errors::CopyUtilError as Error;
    pub use crate::fs_ops::{FileOps, LocalFs};
    pub use crate::prompt::{FixedAnswer, Prompt};
    pub use crate::shutdown::CancelToken;
}
