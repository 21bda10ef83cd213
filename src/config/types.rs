//! Core configuration types.
//! - Config is the merged, user-facing settings (XML + CLI).
//! - RunConfig / ExclusionConfig are the immutable inputs of one engine run.
//! - LogLevel represents verbosity with simple parsing helpers.

use std::fmt;
use std::path::{MAIN_SEPARATOR_STR, PathBuf};
use std::str::FromStr;

use super::paths;

/// Sentinel relative path meaning "the entire source root".
pub const ROOT_SENTINEL: &str = MAIN_SEPARATOR_STR;

/// Well-known system directory fragments that are never touched unless explicitly allowed.
pub const SYSTEM_RESERVED_NAMES: [&str; 9] = [
    "Boot",
    "Documents and Settings",
    "ProgramData",
    "Program Files",
    "Program Files (x86)",
    "Recovery",
    "System Volume Information",
    "Windows",
    "Users",
];

/// Returns true for the "whole tree" sentinel. Both separators are accepted on Windows.
pub fn is_root_sentinel(relative: &str) -> bool {
    relative == ROOT_SENTINEL || relative == "/"
}

/// Program-defined verbosity levels exposed to users/config.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Only errors
    Quiet,
    /// Informational output (default)
    #[default]
    Normal,
    /// More info (like verbose)
    Info,
    /// Debug/trace
    Debug,
}

impl LogLevel {
    /// Parse common string names into our LogLevel (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "quiet" | "error" | "none" => Some(LogLevel::Quiet),
            "normal" => Some(LogLevel::Normal),
            "info" | "verbose" | "detailed" => Some(LogLevel::Info),
            "debug" | "trace" => Some(LogLevel::Debug),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Normal => "normal",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        };
        f.write_str(s)
    }
}

impl FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid log level: '{s}'"))
    }
}

/// Merged settings as read from the XML file and the command line.
/// Turned into a `RunConfig` + `ExclusionConfig` by `validate_and_normalize`.
#[derive(Debug, Clone)]
pub struct Config {
    pub source_root: Option<PathBuf>,
    pub destination_root: Option<PathBuf>,
    /// Newline-separated relative paths to handle; absent means the whole tree
    pub paths_list_file: Option<PathBuf>,
    /// Newline-separated source-relative prefixes to skip
    pub exclude_list_file: Option<PathBuf>,
    pub rename_files: bool,
    pub delete_empty_dirs: bool,
    pub delete_copied_files: bool,
    pub ignore_system_reserved: bool,
    pub force_overwrite: bool,
    pub disable_recursion: bool,
    pub preserve_timestamps: bool,
    /// If true, report what would happen but do not modify the filesystem
    pub dry_run: bool,
    /// Console verbosity
    pub log_level: LogLevel,
    /// Optional path to a log file
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_root: None,
            destination_root: None,
            paths_list_file: None,
            exclude_list_file: None,
            rename_files: false,
            delete_empty_dirs: false,
            delete_copied_files: false,
            ignore_system_reserved: false,
            force_overwrite: false,
            disable_recursion: false,
            preserve_timestamps: true,
            dry_run: false,
            log_level: LogLevel::Normal,
            log_file: paths::default_log_path(),
        }
    }
}

impl Config {
    /// Construct a Config with explicit roots; other fields use defaults.
    pub fn new(source_root: impl Into<PathBuf>, destination_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: Some(source_root.into()),
            destination_root: Some(destination_root.into()),
            ..Default::default()
        }
    }
}

/// Immutable inputs of a single run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub source_root: PathBuf,
    pub destination_root: PathBuf,
    /// Relative paths in processing order; `ROOT_SENTINEL` means the whole source root
    pub paths_to_handle: Vec<String>,
    pub rename_files: bool,
    pub delete_empty_dirs: bool,
    pub delete_copied_files: bool,
    pub force_overwrite: bool,
    pub disable_recursion: bool,
    pub preserve_timestamps: bool,
    pub dry_run: bool,
}

impl RunConfig {
    /// Whole-tree copy between two roots with every flag off (timestamps preserved).
    pub fn new(source_root: impl Into<PathBuf>, destination_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            destination_root: destination_root.into(),
            paths_to_handle: vec![ROOT_SENTINEL.to_string()],
            rename_files: false,
            delete_empty_dirs: false,
            delete_copied_files: false,
            force_overwrite: false,
            disable_recursion: false,
            preserve_timestamps: true,
            dry_run: false,
        }
    }

    /// Replace the requested paths; an empty list falls back to the whole tree.
    pub fn with_paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.paths_to_handle = paths.into_iter().map(Into::into).collect();
        if self.paths_to_handle.is_empty() {
            self.paths_to_handle.push(ROOT_SENTINEL.to_string());
        }
        self
    }
}

/// Exclusion rules; loaded once and never mutated during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionConfig {
    pub system_reserved_names: Vec<String>,
    pub ignore_system_reserved: bool,
    /// Source-relative path prefixes, in file order
    pub source_relative_exclude_list: Vec<String>,
}

impl Default for ExclusionConfig {
    fn default() -> Self {
        Self {
            system_reserved_names: SYSTEM_RESERVED_NAMES.iter().map(|s| s.to_string()).collect(),
            ignore_system_reserved: false,
            source_relative_exclude_list: Vec::new(),
        }
    }
}

impl ExclusionConfig {
    pub fn with_excludes<I, S>(mut self, excludes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.source_relative_exclude_list = excludes.into_iter().map(Into::into).collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_paths_fall_back_to_sentinel() {
        let cfg = RunConfig::new("/src", "/dst").with_paths(Vec::<String>::new());
        assert_eq!(cfg.paths_to_handle, vec![ROOT_SENTINEL.to_string()]);
    }

    #[test]
    fn log_level_aliases() {
        assert_eq!(LogLevel::parse("TRACE"), Some(LogLevel::Debug));
        assert_eq!(LogLevel::parse("verbose"), Some(LogLevel::Info));
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn default_exclusions_hold_reserved_names() {
        let ex = ExclusionConfig::default();
        assert_eq!(ex.system_reserved_names.len(), 9);
        assert!(ex.system_reserved_names.iter().any(|n| n == "Program Files (x86)"));
        assert!(!ex.ignore_system_reserved);
    }
}
