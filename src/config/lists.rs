//! Plain-text list files (paths to handle, source excludes).
//! One relative path per line, UTF-8; surrounding whitespace trimmed, blank lines ignored.

use std::fs;
use std::path::Path;

use crate::errors::CopyUtilError;

/// Split list-file contents into trimmed, non-empty entries (order preserved).
pub fn parse_list(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(|line| line.trim_start_matches('\u{feff}').trim())
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Read and parse a list file.
pub fn read_list_file(path: &Path) -> Result<Vec<String>, CopyUtilError> {
    let contents = fs::read_to_string(path).map_err(|e| CopyUtilError::ListFile {
        path: path.to_path_buf(),
        context: e.to_string(),
    })?;
    Ok(parse_list(&contents))
}
