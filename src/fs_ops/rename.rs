//! Rename (move) of a single file into a destination directory.
//! Only an in-filesystem rename is attempted here; the copy fallback is the caller's decision.

use anyhow::{Result, bail};
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::atomic::try_atomic_move;
use super::delete::delete_dir_if_empty;
use super::helpers::io_error_with_help;
use super::util::is_cross_device;

/// Move `src` to `dest_dir/dest_name`.
/// - `replace_existing`: delete an existing destination file first, else fail.
/// - `prune_source_parent`: remove the source's parent directory if the move emptied it.
pub fn rename_or_move(
    src: &Path,
    dest_dir: &Path,
    dest_name: &OsStr,
    replace_existing: bool,
    prune_source_parent: bool,
) -> Result<PathBuf> {
    if !src.is_file() {
        bail!("source file does not exist: {}", src.display());
    }
    if dest_name.is_empty() {
        bail!("file name for the new file is not specified");
    }

    fs::create_dir_all(dest_dir)
        .map_err(io_error_with_help("create destination directory", dest_dir))?;
    let dest = dest_dir.join(dest_name);

    if dest.exists() {
        if !replace_existing {
            bail!("target file already exists: {}", dest.display());
        }
        if dest.is_dir() {
            bail!("target is a directory: {}", dest.display());
        }
        debug!(dest = %dest.display(), "Removing existing target before rename");
        fs::remove_file(&dest).map_err(io_error_with_help("remove existing target", &dest))?;
    }

    if let Err(e) = try_atomic_move(src, &dest) {
        if is_cross_device(&e) {
            debug!(src = %src.display(), dest = %dest.display(), "rename crosses filesystems");
        }
        return Err(io_error_with_help("rename", src)(e));
    }

    if prune_source_parent {
        if let Some(parent) = src.parent() {
            if !delete_dir_if_empty(parent) && parent.exists() {
                debug!(dir = %parent.display(), "source directory not empty; kept");
            }
        } else {
            warn!(src = %src.display(), "source has no parent directory to prune");
        }
    }
    Ok(dest)
}
