//! File enumeration under a directory, bounded or unbounded in depth.

use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::shutdown::CancelToken;

/// How many directory levels below the root are descended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Depth {
    Unlimited,
    /// `Levels(0)` = only files directly in the root
    Levels(usize),
}

impl Depth {
    /// Negative values mean unlimited.
    pub fn from_raw(depth: i64) -> Self {
        if depth < 0 {
            Depth::Unlimited
        } else {
            Depth::Levels(depth as usize)
        }
    }
}

#[derive(Debug, Default)]
pub struct Listing {
    /// Regular files in traversal order, no duplicates
    pub files: Vec<PathBuf>,
    /// Walk stopped early on cancellation
    pub interrupted: bool,
}

/// Walk `root` collecting regular files.
/// Symlinks are not followed; anything that is neither a file nor a directory is
/// logged and skipped, as are unreadable entries. `on_step` sees every collected
/// file with the running count.
pub fn walk_files(
    root: &Path,
    depth: Depth,
    cancel: &CancelToken,
    on_step: &mut dyn FnMut(&Path, usize),
) -> Listing {
    let mut walker = WalkDir::new(root).follow_links(false).sort_by_file_name();
    if let Depth::Levels(levels) = depth {
        walker = walker.max_depth(levels.saturating_add(1));
    }

    let mut listing = Listing::default();
    for entry in walker {
        if cancel.is_cancelled() {
            debug!(root = %root.display(), "walk interrupted");
            listing.interrupted = true;
            break;
        }
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!(root = %root.display(), error = %e, "skipping unreadable entry");
                continue;
            }
        };
        let ft = entry.file_type();
        if ft.is_file() {
            listing.files.push(entry.into_path());
            if let Some(last) = listing.files.last() {
                on_step(last, listing.files.len());
            }
        } else if !ft.is_dir() {
            warn!(path = %entry.path().display(), "Incorrect file or folder, skipping");
        }
    }
    listing
}

/// Uncancellable walk without progress reporting.
pub fn list_files(root: &Path, depth: Depth) -> Vec<PathBuf> {
    walk_files(root, depth, &CancelToken::new(), &mut |_, _| {}).files
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn tree() -> tempfile::TempDir {
        let td = tempdir().unwrap();
        fs::create_dir_all(td.path().join("sub/deeper")).unwrap();
        fs::create_dir_all(td.path().join("empty")).unwrap();
        fs::write(td.path().join("a.txt"), "a").unwrap();
        fs::write(td.path().join("sub/b.txt"), "b").unwrap();
        fs::write(td.path().join("sub/deeper/c.txt"), "c").unwrap();
        td
    }

    fn names(root: &Path, files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|f| f.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn unlimited_depth_lists_every_file_once() {
        let td = tree();
        let files = list_files(td.path(), Depth::Unlimited);
        assert_eq!(names(td.path(), &files), vec!["a.txt", "sub/b.txt", "sub/deeper/c.txt"]);
    }

    #[test]
    fn depth_bounds_descent() {
        let td = tree();
        assert_eq!(names(td.path(), &list_files(td.path(), Depth::Levels(0))), vec!["a.txt"]);
        assert_eq!(
            names(td.path(), &list_files(td.path(), Depth::Levels(1))),
            vec!["a.txt", "sub/b.txt"]
        );
        assert_eq!(Depth::from_raw(-1), Depth::Unlimited);
    }

    #[test]
    fn a_file_root_lists_itself() {
        let td = tree();
        let f = td.path().join("a.txt");
        assert_eq!(list_files(&f, Depth::Unlimited), vec![f]);
    }

    #[test]
    fn cancelled_walk_reports_interruption() {
        let td = tree();
        let cancel = CancelToken::new();
        let mut seen = 0;
        let listing = walk_files(td.path(), Depth::Unlimited, &cancel, &mut |_, n| {
            seen = n;
            cancel.cancel();
        });
        assert!(listing.interrupted);
        assert_eq!(seen, 1);
        assert_eq!(listing.files.len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_are_skipped() {
        let td = tree();
        std::os::unix::fs::symlink(td.path().join("a.txt"), td.path().join("link.txt")).unwrap();
        let files = list_files(td.path(), Depth::Levels(0));
        assert_eq!(names(td.path(), &files), vec!["a.txt"]);
    }
}
