//! Source/destination path resolution.
//!
//! Requested paths (from the paths list) and discovered files (from the walker)
//! are mapped to destinations differently:
//! - a request `rel` maps to `dst/rel`; the whole-tree request maps to
//!   `dst/<name of source root>`, or just `dst` when the source root is a partition root;
//! - a discovered file keeps its position relative to the source root, so
//!   `src/sub/b.txt` lands at `dst/sub/b.txt`.

use std::path::{Path, PathBuf};
use tracing::error;

use crate::config::is_root_sentinel;

/// A requested path and where it would go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferTarget {
    pub source: PathBuf,
    pub destination: PathBuf,
}

/// Map a requested relative path (or the whole-tree sentinel) to source and destination.
pub fn resolve_for_relative_path(
    source_root: &Path,
    destination_root: &Path,
    relative: &str,
) -> TransferTarget {
    if is_root_sentinel(relative) {
        let destination = match source_root.file_name() {
            Some(name) => destination_root.join(name),
            None => destination_root.to_path_buf(),
        };
        return TransferTarget {
            source: source_root.to_path_buf(),
            destination,
        };
    }
    // leading separators would make `join` replace the root
    let rel = relative.trim_matches(|c| c == '/' || c == std::path::MAIN_SEPARATOR);
    TransferTarget {
        source: source_root.join(rel),
        destination: destination_root.join(rel),
    }
}

/// Destination of a file found while walking a directory.
/// `None` if the file has no parent or is not under `source_root`.
pub fn resolve_for_discovered_file(
    file: &Path,
    source_root: &Path,
    destination_root: &Path,
) -> Option<PathBuf> {
    let parent = file.parent()?;
    let name = file.file_name()?;
    let relative_parent = parent.strip_prefix(source_root).ok()?;
    Some(destination_root.join(relative_parent).join(name))
}

/// Writing straight into a partition root is refused.
pub fn is_destination_dir_allowed(source_file: &Path, destination_dir: &Path) -> bool {
    if destination_dir.parent().is_none() {
        error!(
            source = %source_file.display(),
            destination_dir = %destination_dir.display(),
            "Won't copy/move file \"{}\" into root \"{}\" of the partition",
            source_file.display(),
            destination_dir.display()
        );
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_tree_request_nests_under_source_name() {
        let t = resolve_for_relative_path(Path::new("/data/photos"), Path::new("/backup"), "/");
        assert_eq!(t.source, PathBuf::from("/data/photos"));
        assert_eq!(t.destination, PathBuf::from("/backup/photos"));
    }

    #[test]
    fn whole_tree_request_from_partition_root_uses_destination_root() {
        let t = resolve_for_relative_path(Path::new("/"), Path::new("/backup"), "/");
        assert_eq!(t.destination, PathBuf::from("/backup"));
    }

    #[test]
    fn relative_request_is_joined_to_both_roots() {
        let t = resolve_for_relative_path(Path::new("/src"), Path::new("/dst"), "/sub/file.txt");
        assert_eq!(t.source, PathBuf::from("/src/sub/file.txt"));
        assert_eq!(t.destination, PathBuf::from("/dst/sub/file.txt"));
    }

    #[test]
    fn discovered_files_keep_their_relative_position() {
        let dst = resolve_for_discovered_file(
            Path::new("/src/sub/b.txt"),
            Path::new("/src"),
            Path::new("/dst"),
        );
        assert_eq!(dst, Some(PathBuf::from("/dst/sub/b.txt")));
        let dst = resolve_for_discovered_file(Path::new("/src/a.txt"), Path::new("/src"), Path::new("/dst"));
        assert_eq!(dst, Some(PathBuf::from("/dst/a.txt")));
        assert_eq!(
            resolve_for_discovered_file(Path::new("/elsewhere/a.txt"), Path::new("/src"), Path::new("/dst")),
            None
        );
    }

    #[test]
    fn partition_root_destination_is_refused() {
        assert!(!is_destination_dir_allowed(Path::new("/src/a"), Path::new("/")));
        assert!(is_destination_dir_allowed(Path::new("/src/a"), Path::new("/dst")));
    }
}
