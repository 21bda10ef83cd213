//! Deletion helpers. All of them report success as a bool and never fail the caller.

use std::fs;
use std::path::Path;
use tracing::warn;

/// Delete a regular file. False if it is missing, not a file, or removal failed.
pub fn delete_file(path: &Path) -> bool {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_file() => match fs::remove_file(path) {
            Ok(()) => true,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "delete file failed");
                false
            }
        },
        _ => false,
    }
}

/// Remove `dir` only if it is an existing, empty directory.
pub fn delete_dir_if_empty(dir: &Path) -> bool {
    let empty = match fs::read_dir(dir) {
        Ok(mut entries) => entries.next().is_none(),
        Err(_) => return false,
    };
    empty && fs::remove_dir(dir).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn delete_file_ignores_directories() {
        let td = tempdir().unwrap();
        assert!(!delete_file(td.path()));
        let f = td.path().join("f");
        fs::write(&f, "x").unwrap();
        assert!(delete_file(&f));
        assert!(!delete_file(&f));
    }

    #[test]
    fn only_empty_directories_are_removed() {
        let td = tempdir().unwrap();
        let dir = td.path().join("d");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("f"), "x").unwrap();
        assert!(!delete_dir_if_empty(&dir));
        fs::remove_file(dir.join("f")).unwrap();
        assert!(delete_dir_if_empty(&dir));
        assert!(!dir.exists());
        assert!(!delete_dir_if_empty(&dir));
    }
}
