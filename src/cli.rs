//! CLI definition and parsing.
//!
//! Notes:
//! - Flags override values loaded from the XML config; unset flags leave them alone.
//! - --debug is a shorthand for --log-level debug.
//! - Path arguments are sanitized (stray quotes, one trailing separator).

use clap::{Parser, ValueHint};
use std::path::{Path, PathBuf};

use crate::config::types::{Config, LogLevel};

/// Copy or move files from a source root to a destination root.
#[derive(Parser, Debug, Clone, Default)]
#[command(
    author,
    version,
    about = "Copy or move a tree of files, renaming where possible"
)]
pub struct Args {
    /// Root directory files are taken from.
    #[arg(long, short = 's', value_name = "PATH", value_hint = ValueHint::DirPath)]
    pub source_path: Option<PathBuf>,

    /// Root directory files are copied/moved to.
    #[arg(long, short = 't', value_name = "PATH", value_hint = ValueHint::DirPath)]
    pub destination_path: Option<PathBuf>,

    /// File listing source-relative paths to handle, one per line ("/" = everything).
    #[arg(long, value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub paths_list_file: Option<PathBuf>,

    /// File listing source-relative path prefixes to skip, one per line.
    #[arg(long, value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub exclude_source_paths_file: Option<PathBuf>,

    /// Try renaming (moving) files before falling back to copying.
    #[arg(long)]
    pub rename_files: bool,

    /// Remove source directories left empty.
    #[arg(long)]
    pub delete_empty_dirs: bool,

    /// Delete each source file after it was copied.
    #[arg(long)]
    pub delete_copied_files: bool,

    /// Also touch paths containing system-reserved names (Windows, Program Files, ...).
    #[arg(long)]
    pub ignore_excluded_paths: bool,

    /// Overwrite existing destination files without asking.
    #[arg(long)]
    pub force_overwrite: bool,

    /// Only handle files directly inside requested directories.
    #[arg(long)]
    pub disable_recursion: bool,

    /// Show what would be done, but do not modify files/directories.
    #[arg(long)]
    pub dry_run: bool,

    /// Do not copy modification times to copied files.
    #[arg(long)]
    pub no_preserve_timestamps: bool,

    /// Enable debug logging (equivalent to `--log-level debug`).
    #[arg(short = 'd', long)]
    pub debug: bool,

    /// Set log level. One of: quiet, normal, info, debug.
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Write logs to this file in addition to stdout.
    #[arg(long, value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub log_file: Option<PathBuf>,

    /// Emit logs in structured JSON.
    #[arg(long)]
    pub json: bool,

    /// Print where the config file is looked up, then exit.
    #[arg(long)]
    pub print_config: bool,

    /// Write a template config file at the config location, then exit.
    #[arg(long)]
    pub init_config: bool,
}

impl Args {
    pub fn sanitize_path(p: &Path) -> PathBuf {
        Self::sanitize_str(&p.to_string_lossy())
    }

    /// Strip surrounding/stray edge quotes (PowerShell, CMD) and one trailing separator.
    /// Quotes inside the path are part of the name.
    pub fn sanitize_str(s: &str) -> PathBuf {
        let trimmed = s.trim();
        let mut inner = if trimmed.len() >= 2
            && ((trimmed.starts_with('"') && trimmed.ends_with('"'))
                || (trimmed.starts_with('\'') && trimmed.ends_with('\'')))
        {
            trimmed[1..trimmed.len() - 1].to_string()
        } else {
            trimmed.trim_matches(|c| c == '\'' || c == '"').to_string()
        };

        // keep a bare "/" intact
        if inner.len() > 1 && (inner.ends_with('\\') || inner.ends_with('/')) {
            inner.pop();
        }
        PathBuf::from(inner)
    }

    /// Precedence: --debug > --log-level value > None (use config default).
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level.as_deref().and_then(LogLevel::parse)
    }

    /// Apply CLI overrides to a loaded Config in place. Unset flags are no-ops.
    pub fn apply_overrides(&self, cfg: &mut Config) {
        if let Some(p) = &self.source_path {
            cfg.source_root = Some(Self::sanitize_path(p));
        }
        if let Some(p) = &self.destination_path {
            cfg.destination_root = Some(Self::sanitize_path(p));
        }
        if let Some(p) = &self.paths_list_file {
            cfg.paths_list_file = Some(Self::sanitize_path(p));
        }
        if let Some(p) = &self.exclude_source_paths_file {
            cfg.exclude_list_file = Some(Self::sanitize_path(p));
        }
        if let Some(p) = &self.log_file {
            cfg.log_file = Some(Self::sanitize_path(p));
        }
        if let Some(level) = self.effective_log_level() {
            cfg.log_level = level;
        }
        cfg.rename_files |= self.rename_files;
        cfg.delete_empty_dirs |= self.delete_empty_dirs;
        cfg.delete_copied_files |= self.delete_copied_files;
        cfg.ignore_system_reserved |= self.ignore_excluded_paths;
        cfg.force_overwrite |= self.force_overwrite;
        cfg.disable_recursion |= self.disable_recursion;
        cfg.dry_run |= self.dry_run;
        if self.no_preserve_timestamps {
            cfg.preserve_timestamps = false;
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_and_trailing_separator_are_stripped() {
        assert_eq!(Args::sanitize_str("'/data/in/'"), PathBuf::from("/data/in"));
        assert_eq!(Args::sanitize_str("\"C:\\data\\\""), PathBuf::from("C:\\data"));
        assert_eq!(Args::sanitize_str("/"), PathBuf::from("/"));
    }

    #[test]
    fn inner_apostrophes_are_kept() {
        assert_eq!(Args::sanitize_str("/data/O'Brien"), PathBuf::from("/data/O'Brien"));
        assert_eq!(Args::sanitize_str("\"/data/O'Brien/\""), PathBuf::from("/data/O'Brien"));
        assert_eq!(Args::sanitize_str("'/data/it's'"), PathBuf::from("/data/it's"));
    }

    #[test]
    fn debug_beats_log_level() {
        let args = Args::try_parse_from(["copyutil", "--log-level", "quiet", "-d"]).unwrap();
        assert_eq!(args.effective_log_level(), Some(LogLevel::Debug));
    }
}
