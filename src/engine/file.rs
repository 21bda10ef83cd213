//! Single-file flow: filter source, filter destination, check the destination
//! directory, rename (optional), copy as fallback, delete source (optional), record.

use std::fs;
use std::path::Path;
use tracing::{debug, error, info, trace, warn};

use super::event::{FailureReason, TransferEvent, TransferMethod};
use super::filter::Role;
use super::resolve::is_destination_dir_allowed;
use super::TransferEngine;
use crate::fs_ops::CopyOptions;

impl TransferEngine<'_> {
    pub(super) fn handle_file(&mut self, source: &Path, destination: &Path) {
        if self.ledger.contains(source) {
            debug!(src = %source.display(), "already processed; skipping");
            return;
        }
        if self.check_cancelled() {
            return;
        }
        let ok = self.transfer_file(source, destination);
        self.ledger.record(source, Some(destination), ok);
    }

    fn transfer_file(&mut self, source: &Path, destination: &Path) -> bool {
        let Some(replace) = self.admit(source, destination) else {
            return false;
        };
        if self.config.dry_run {
            return self.dry_run_success(source, destination);
        }
        if self.config.rename_files && self.try_rename(source, destination, replace) {
            return true;
        }
        self.emit(TransferEvent::BeforeCopy {
            source,
            destination,
        });
        self.copy_file(source, destination, replace)
    }

    /// Filters, partition-root guard and overwrite confirmation.
    /// `Some(replace_existing)` when the file may be transferred.
    pub(super) fn admit(&mut self, source: &Path, destination: &Path) -> Option<bool> {
        if !self.passes_checks(source, destination) {
            return None;
        }
        self.resolve_overwrite(source, destination)
    }

    /// Source and destination filters plus the partition-root guard.
    pub(super) fn passes_checks(&mut self, source: &Path, destination: &Path) -> bool {
        for (path, role) in [(source, Role::Source), (destination, Role::Destination)] {
            let reason = match self.filter.check(path, role) {
                Ok(None) => continue,
                Ok(Some(rejection)) => {
                    error!(%role, path = %path.display(), "Not messing with {role} \"{}\" ({rejection}), skipping", path.display());
                    FailureReason::Filtered(role, rejection)
                }
                Err(e) => {
                    error!(code = e.code(), src = %source.display(), "{e}");
                    FailureReason::OutsideSourceRoot
                }
            };
            self.emit(TransferEvent::Failed {
                source,
                destination: Some(destination),
                reason,
            });
            return false;
        }

        let dir_allowed = destination
            .parent()
            .is_some_and(|dir| is_destination_dir_allowed(source, dir));
        if !dir_allowed {
            self.emit(TransferEvent::Failed {
                source,
                destination: Some(destination),
                reason: FailureReason::PartitionRootDestination,
            });
        }
        dir_allowed
    }

    /// Overwrite decision for an existing destination, asked at most once per destination.
    /// `Some(false)` when nothing is in the way.
    pub(super) fn resolve_overwrite(&mut self, source: &Path, destination: &Path) -> Option<bool> {
        if fs::symlink_metadata(destination).is_err() {
            return Some(false);
        }
        let overwrite = if self.config.force_overwrite
            || self.approved_overwrites.contains(destination)
        {
            true
        } else if self.config.dry_run {
            info!(dest = %destination.display(), "[dry-run] would ask before overwriting \"{}\"", destination.display());
            true
        } else {
            self.prompt.confirm_overwrite(destination)
        };
        self.emit(TransferEvent::Exists {
            destination,
            overwrite,
        });
        if !overwrite {
            warn!(dest = %destination.display(), "Destination \"{}\" exists; not overwriting", destination.display());
            self.emit(TransferEvent::Failed {
                source,
                destination: Some(destination),
                reason: FailureReason::OverwriteDeclined,
            });
            return None;
        }
        self.approved_overwrites.insert(destination.to_path_buf());
        Some(true)
    }

    pub(super) fn dry_run_success(&mut self, source: &Path, destination: &Path) -> bool {
        let method = if self.config.rename_files {
            TransferMethod::Renamed
        } else {
            TransferMethod::Copied
        };
        info!(src = %source.display(), dest = %destination.display(), "[dry-run] would be {method}: \"{}\" -> \"{}\"", source.display(), destination.display());
        let bytes = fs::metadata(source).map(|m| m.len()).unwrap_or(0);
        self.emit(TransferEvent::Succeeded {
            source,
            destination,
            method,
            bytes,
        });
        true
    }

    /// False means "not renamed"; the caller decides whether to copy instead.
    pub(super) fn try_rename(&mut self, source: &Path, destination: &Path, replace: bool) -> bool {
        let (Some(dest_dir), Some(name)) = (destination.parent(), destination.file_name()) else {
            return false;
        };
        let bytes = fs::metadata(source).map(|m| m.len()).unwrap_or(0);
        // never prune the source root itself
        let prune_parent = self.config.delete_empty_dirs
            && source.parent() != Some(self.config.source_root.as_path());
        info!(src = %source.display(), dest = %destination.display(), "Renaming \"{}\" to \"{}\"", source.display(), destination.display());
        match self.fs.rename_or_move(source, dest_dir, name, replace, prune_parent) {
            Ok(moved_to) => {
                info!(dest = %moved_to.display(), "Renamed");
                self.emit(TransferEvent::Succeeded {
                    source,
                    destination: &moved_to,
                    method: TransferMethod::Renamed,
                    bytes,
                });
                true
            }
            Err(e) => {
                warn!(src = %source.display(), error = %format!("{e:#}"), "Rename failed; falling back to copy");
                false
            }
        }
    }

    /// Callers emit `BeforeCopy` themselves.
    pub(super) fn copy_file(&mut self, source: &Path, destination: &Path, replace: bool) -> bool {
        info!(src = %source.display(), dest = %destination.display(), "Copying \"{}\" to \"{}\"", source.display(), destination.display());
        let opts = CopyOptions {
            overwrite: replace,
            preserve_timestamp: self.config.preserve_timestamps,
        };
        let mut progress = |done: u64, total: u64| trace!(done, total, "copy progress");
        match self.fs.copy_bytes(source, destination, opts, &mut progress) {
            Ok(bytes) => {
                info!(dest = %destination.display(), bytes, "Copied");
                if self.config.delete_copied_files {
                    info!(src = %source.display(), "Deleting copied file \"{}\"", source.display());
                    // the copy stands even if this fails
                    if !self.fs.delete_file(source) {
                        error!(src = %source.display(), "Delete copied file \"{}\" failed", source.display());
                    }
                }
                self.emit(TransferEvent::Succeeded {
                    source,
                    destination,
                    method: TransferMethod::Copied,
                    bytes,
                });
                true
            }
            Err(e) => {
                let detail = format!("{e:#}");
                error!(src = %source.display(), dest = %destination.display(), error = %detail, "Copy failed");
                self.emit(TransferEvent::Failed {
                    source,
                    destination: Some(destination),
                    reason: FailureReason::CopyFailed(detail),
                });
                false
            }
        }
    }
}
