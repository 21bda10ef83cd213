//! Startup validation.
//! Verifies the roots, reads the list files and produces the immutable run inputs.
//! Everything reported here is fatal: nothing has been processed yet.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

use crate::errors::CopyUtilError;

use super::lists::read_list_file;
use super::types::{Config, ExclusionConfig, RunConfig};

impl RunConfig {
    /// Root sanity checks shared by the CLI path and library callers.
    /// - source_root must exist, be a directory and be readable.
    /// - destination_root, when it exists, must be a directory.
    /// - the roots must not resolve to the same path.
    pub fn validate(&self) -> Result<(), CopyUtilError> {
        let src = &self.source_root;
        let dst = &self.destination_root;

        if dst.as_os_str().is_empty() {
            return Err(CopyUtilError::DestinationRootUnset);
        }
        match fs::metadata(src) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => return Err(CopyUtilError::SourceRootNotDir(src.clone())),
            Err(_) => return Err(CopyUtilError::SourceRootMissing(src.clone())),
        }
        fs::read_dir(src).map_err(|e| CopyUtilError::SourceRootUnreadable {
            path: src.clone(),
            context: e.to_string(),
        })?;
        debug!("source_root readable: {}", src.display());

        if dst.exists() && !dst.is_dir() {
            return Err(CopyUtilError::DestinationRootNotDir(dst.clone()));
        }

        if resolve_root(src) == resolve_root(dst) {
            return Err(CopyUtilError::SameRoots(src.clone()));
        }
        Ok(())
    }
}

/// Absolute form of a root: symlinks resolved when it exists, lexical otherwise.
pub fn resolve_root(path: &Path) -> PathBuf {
    dunce::canonicalize(path)
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

/// Turn merged settings into run inputs, reading both list files.
pub fn validate_and_normalize(cfg: &Config) -> Result<(RunConfig, ExclusionConfig)> {
    let source = match cfg.source_root.as_deref() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => {
            error!("source path is not specified");
            return Err(CopyUtilError::SourceRootUnset.into());
        }
    };
    let destination = match cfg.destination_root.as_deref() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => {
            error!("destination path is not specified");
            return Err(CopyUtilError::DestinationRootUnset.into());
        }
    };

    let paths = match cfg.paths_list_file.as_deref() {
        Some(list) => read_list_file(list)
            .with_context(|| format!("paths list '{}'", list.display()))?,
        None => Vec::new(),
    };
    let excludes = match cfg.exclude_list_file.as_deref() {
        Some(list) => read_list_file(list)
            .with_context(|| format!("exclude list '{}'", list.display()))?,
        None => Vec::new(),
    };

    let run = RunConfig {
        source_root: resolve_root(source),
        destination_root: resolve_root(destination),
        rename_files: cfg.rename_files,
        delete_empty_dirs: cfg.delete_empty_dirs,
        delete_copied_files: cfg.delete_copied_files,
        force_overwrite: cfg.force_overwrite,
        disable_recursion: cfg.disable_recursion,
        preserve_timestamps: cfg.preserve_timestamps,
        dry_run: cfg.dry_run,
        ..RunConfig::new(PathBuf::new(), PathBuf::new())
    }
    .with_paths(paths);

    if let Err(e) = run.validate() {
        error!(code = e.code(), "{e}");
        return Err(e.into());
    }

    let exclusion = ExclusionConfig {
        ignore_system_reserved: cfg.ignore_system_reserved,
        ..ExclusionConfig::default()
    }
    .with_excludes(excludes);

    info!(
        "Config validated: source='{}' destination='{}' paths={:?} excludes={:?}",
        run.source_root.display(),
        run.destination_root.display(),
        run.paths_to_handle,
        exclusion.source_relative_exclude_list
    );
    Ok((run, exclusion))
}
