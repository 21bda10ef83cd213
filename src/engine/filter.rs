//! Path admission rules.
//!
//! Two independent checks:
//! - system-reserved fragments: case-insensitive *substring* match on the whole
//!   absolute path (so `/data/MyWindowsBackup` is rejected too), skipped when
//!   `ignore_system_reserved` is set;
//! - source excludes: the path relative to the source root is matched against each
//!   exclude entry as a leading-components prefix (`sub/skip` covers `sub/skip/a.txt`
//!   but not `sub/skip2/a.txt`). Applies to source paths only.

use std::fmt;
use std::path::{Path, PathBuf};
use tracing::error;

use crate::config::{ExclusionConfig, is_root_sentinel};
use crate::errors::CopyUtilError;

/// Which side of a transfer a path belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Source,
    Destination,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Role::Source => "source",
            Role::Destination => "destination",
        })
    }
}

/// Why a path was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Contains one of the reserved fragments
    Reserved(String),
    /// Covered by an entry of the source exclude list
    Excluded(String),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::Reserved(part) => write!(f, "contains reserved part \"{part}\""),
            Rejection::Excluded(entry) => write!(f, "excluded by relative path \"{entry}\""),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PathFilter {
    source_root: PathBuf,
    /// (as configured, lowercased)
    reserved: Vec<(String, String)>,
    ignore_reserved: bool,
    excludes: Vec<String>,
}

impl PathFilter {
    pub fn new(exclusion: &ExclusionConfig, source_root: &Path) -> Self {
        let reserved = exclusion
            .system_reserved_names
            .iter()
            .filter(|n| !n.is_empty())
            .map(|n| (n.clone(), n.to_lowercase()))
            .collect();
        let excludes = exclusion
            .source_relative_exclude_list
            .iter()
            .map(|e| e.trim())
            .filter(|e| !e.is_empty() && !is_root_sentinel(e))
            .map(str::to_string)
            .collect();
        Self {
            source_root: source_root.to_path_buf(),
            reserved,
            ignore_reserved: exclusion.ignore_system_reserved,
            excludes,
        }
    }

    /// Pure check. `Ok(None)` means allowed.
    /// Errors only when a source path lies outside the source root.
    pub fn check(&self, path: &Path, role: Role) -> Result<Option<Rejection>, CopyUtilError> {
        if !self.ignore_reserved {
            let haystack = path.to_string_lossy().to_lowercase();
            if let Some((name, _)) = self
                .reserved
                .iter()
                .find(|(_, lower)| haystack.contains(lower.as_str()))
            {
                return Ok(Some(Rejection::Reserved(name.clone())));
            }
        }

        if role == Role::Source {
            let part = path.strip_prefix(&self.source_root).map_err(|_| {
                CopyUtilError::OutsideSourceRoot {
                    path: path.to_path_buf(),
                    root: self.source_root.clone(),
                }
            })?;
            if let Some(entry) = self
                .excludes
                .iter()
                .find(|entry| part.starts_with(trim_separators(entry)))
            {
                return Ok(Some(Rejection::Excluded(entry.clone())));
            }
        }
        Ok(None)
    }

    /// `check` plus a log line naming the reason on refusal.
    pub fn is_allowed(&self, path: &Path, role: Role) -> Result<bool, CopyUtilError> {
        match self.check(path, role)? {
            None => Ok(true),
            Some(rejection) => {
                error!(%role, path = %path.display(), "Not messing with {role} \"{}\" ({rejection}), skipping", path.display());
                Ok(false)
            }
        }
    }
}

fn trim_separators(entry: &str) -> &Path {
    Path::new(entry.trim_matches(|c| c == '/' || c == std::path::MAIN_SEPARATOR))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(excludes: &[&str], ignore_reserved: bool) -> PathFilter {
        let ex = ExclusionConfig {
            ignore_system_reserved: ignore_reserved,
            ..ExclusionConfig::default()
        }
        .with_excludes(excludes.iter().copied());
        PathFilter::new(&ex, Path::new("/data/src"))
    }

    #[test]
    fn reserved_fragment_matches_anywhere_case_insensitive() {
        let f = filter(&[], false);
        let hit = f.check(Path::new("/data/src/MyWINDOWSBackup/a.txt"), Role::Source).unwrap();
        assert_eq!(hit, Some(Rejection::Reserved("Windows".into())));
        let hit = f.check(Path::new("/mnt/program files/x"), Role::Destination).unwrap();
        assert_eq!(hit, Some(Rejection::Reserved("Program Files".into())));
    }

    #[test]
    fn reserved_check_can_be_disabled() {
        let f = filter(&[], true);
        assert!(f.is_allowed(Path::new("/data/src/Windows/a"), Role::Source).unwrap());
    }

    #[test]
    fn exclude_entries_match_leading_components() {
        let f = filter(&["sub/skip"], true);
        assert!(!f.is_allowed(Path::new("/data/src/sub/skip/a.txt"), Role::Source).unwrap());
        assert!(!f.is_allowed(Path::new("/data/src/sub/skip"), Role::Source).unwrap());
        assert!(f.is_allowed(Path::new("/data/src/sub/skip2/a.txt"), Role::Source).unwrap());
        assert!(f.is_allowed(Path::new("/data/src/other/sub/skip/a.txt"), Role::Source).unwrap());
    }

    #[test]
    fn exclude_entries_are_trimmed_and_separator_only_entries_ignored() {
        let f = filter(&["/", "", " /sub/ "], true);
        assert!(!f.is_allowed(Path::new("/data/src/sub/a.txt"), Role::Source).unwrap());
        assert!(f.is_allowed(Path::new("/data/src/top.txt"), Role::Source).unwrap());
    }

    #[test]
    fn excludes_do_not_apply_to_destinations() {
        let f = filter(&["sub"], true);
        assert!(f.is_allowed(Path::new("/data/src/sub/a.txt"), Role::Destination).unwrap());
    }

    #[test]
    fn source_outside_root_is_an_invariant_violation() {
        let f = filter(&[], true);
        let err = f.check(Path::new("/data/src2/a.txt"), Role::Source).unwrap_err();
        assert!(matches!(err, CopyUtilError::OutsideSourceRoot { .. }));
    }
}
