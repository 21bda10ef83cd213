//! Filesystem operations the engine depends on.
//! Everything goes through the `FileOps` trait so tests can inject failures;
//! `LocalFs` is the real implementation.

mod atomic;
mod copy;
mod delete;
mod helpers;
mod io_copy;
mod meta;
mod rename;
mod util;

pub use copy::{CopyOptions, copy_bytes};
pub use delete::{delete_dir_if_empty, delete_file};
pub use helpers::{io_error_with_help, io_error_with_help_io};
pub use rename::rename_or_move;

use anyhow::Result;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Filesystem collaborators of the transfer engine.
pub trait FileOps {
    /// Rename `src` to `dest_dir/dest_name`; see [`rename_or_move`].
    fn rename_or_move(
        &self,
        src: &Path,
        dest_dir: &Path,
        dest_name: &OsStr,
        replace_existing: bool,
        prune_source_parent: bool,
    ) -> Result<PathBuf>;

    /// Buffered copy; see [`copy_bytes`]. Returns bytes copied.
    fn copy_bytes(
        &self,
        src: &Path,
        dest: &Path,
        opts: CopyOptions,
        progress: &mut dyn FnMut(u64, u64),
    ) -> Result<u64>;

    fn delete_file(&self, path: &Path) -> bool;

    fn delete_dir_if_empty(&self, path: &Path) -> bool;
}

/// The local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl FileOps for LocalFs {
    fn rename_or_move(
        &self,
        src: &Path,
        dest_dir: &Path,
        dest_name: &OsStr,
        replace_existing: bool,
        prune_source_parent: bool,
    ) -> Result<PathBuf> {
        rename::rename_or_move(src, dest_dir, dest_name, replace_existing, prune_source_parent)
    }

    fn copy_bytes(
        &self,
        src: &Path,
        dest: &Path,
        opts: CopyOptions,
        progress: &mut dyn FnMut(u64, u64),
    ) -> Result<u64> {
        copy::copy_bytes(src, dest, opts, progress)
    }

    fn delete_file(&self, path: &Path) -> bool {
        delete::delete_file(path)
    }

    fn delete_dir_if_empty(&self, path: &Path) -> bool {
        delete::delete_dir_if_empty(path)
    }
}
