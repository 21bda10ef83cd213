//! Directory flow: optional rename pass, copy pass over whatever is left,
//! then optional pruning of the source directories the pass emptied.

use std::cmp::Reverse;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

use super::TransferEngine;
use super::event::{FailureReason, TransferEvent};
use super::filter::Role;
use super::resolve::resolve_for_discovered_file;
use super::walker::{Depth, walk_files};

impl TransferEngine<'_> {
    pub(super) fn handle_directory(&mut self, dir: &Path) {
        if !self.config.rename_files
            && dir.parent().is_none()
            && !self.prompt.confirm_proceed_at_root(dir)
        {
            warn!(src = %dir.display(), "Not proceeding from partition root \"{}\"", dir.display());
            return;
        }

        let depth = if self.config.disable_recursion {
            Depth::Levels(0)
        } else {
            Depth::Unlimited
        };
        // a destination inside this directory must never be copied into itself
        let nested = self
            .config
            .destination_root
            .starts_with(dir)
            .then(|| self.config.destination_root.clone());
        let nested = nested.as_deref();

        // parents of files moved away by this pass
        let mut vacated = BTreeSet::new();
        if self.config.rename_files {
            self.rename_pass(dir, depth, nested, &mut vacated);
        }
        if !self.interrupted {
            self.copy_pass(dir, depth, nested, &mut vacated);
        }
        if self.config.delete_empty_dirs && !self.config.dry_run && !self.interrupted {
            let removed = self.prune_empty_dirs(dir, &vacated, nested);
            if removed > 0 {
                info!(src = %dir.display(), removed, "Removed empty directories");
            }
        }
    }

    /// Files that rename cleanly are recorded; the rest stay unrecorded for the copy pass.
    fn rename_pass(
        &mut self,
        dir: &Path,
        depth: Depth,
        nested: Option<&Path>,
        vacated: &mut BTreeSet<PathBuf>,
    ) {
        let files = self.collect_files(dir, depth);
        for file in &files {
            if self.check_cancelled() {
                return;
            }
            if self.ledger.contains(file) || is_inside(file, nested) {
                continue;
            }
            let Some(destination) = self.destination_of(file) else {
                continue;
            };
            let Some(replace) = self.admit(file, &destination) else {
                self.record_failure(file, Some(&destination));
                continue;
            };
            if self.config.dry_run {
                let ok = self.dry_run_success(file, &destination);
                self.ledger.record(file, Some(&destination), ok);
                continue;
            }
            if self.try_rename(file, &destination, replace) {
                self.ledger.record(file, Some(&destination), true);
                note_vacated(file, vacated);
            }
        }
    }

    /// Per file: confirm (filters), before copy, existing destination, outcome.
    fn copy_pass(
        &mut self,
        dir: &Path,
        depth: Depth,
        nested: Option<&Path>,
        vacated: &mut BTreeSet<PathBuf>,
    ) {
        self.mirror_empty_dirs(dir, depth, nested);
        let files = self.collect_files(dir, depth);
        if self.interrupted {
            return;
        }
        let total = files.len();
        for (index, file) in files.iter().enumerate() {
            if self.check_cancelled() {
                return;
            }
            self.emit(TransferEvent::Processing {
                current: file,
                index,
                total,
            });
            if self.ledger.contains(file) {
                continue;
            }
            if is_inside(file, nested) {
                debug!(src = %file.display(), "inside the destination tree; skipped");
                continue;
            }
            let Some(destination) = self.destination_of(file) else {
                continue;
            };
            let confirmed = self.passes_checks(file, &destination);
            self.emit(TransferEvent::ConfirmCopy {
                source: file,
                destination: &destination,
                confirmed,
            });
            if !confirmed {
                self.ledger.record(file, Some(&destination), false);
                continue;
            }
            if !self.config.dry_run {
                self.emit(TransferEvent::BeforeCopy {
                    source: file,
                    destination: &destination,
                });
            }
            let ok = match self.resolve_overwrite(file, &destination) {
                None => false,
                Some(_) if self.config.dry_run => self.dry_run_success(file, &destination),
                Some(replace) => self.copy_file(file, &destination, replace),
            };
            self.ledger.record(file, Some(&destination), ok);
            if ok && !self.config.dry_run {
                note_vacated(file, vacated);
            }
        }
    }

    fn collect_files(&mut self, dir: &Path, depth: Depth) -> Vec<PathBuf> {
        let observer = &mut self.observer;
        let listing = walk_files(dir, depth, &self.cancel, &mut |current, collected| {
            observer(&TransferEvent::CalculatingSize { current, collected })
        });
        if listing.interrupted {
            self.check_cancelled();
        }
        listing.files
    }

    /// Destination of a walked file; unresolvable files are recorded as failures.
    fn destination_of(&mut self, file: &Path) -> Option<PathBuf> {
        let destination = resolve_for_discovered_file(
            file,
            &self.config.source_root,
            &self.config.destination_root,
        );
        if destination.is_none() {
            error!(src = %file.display(), root = %self.config.source_root.display(), "Cannot derive a destination for \"{}\"", file.display());
            self.emit(TransferEvent::Failed {
                source: file,
                destination: None,
                reason: FailureReason::NoDestination,
            });
            self.record_failure(file, None);
        }
        destination
    }

    /// Recreate empty source subdirectories at the destination.
    fn mirror_empty_dirs(&mut self, dir: &Path, depth: Depth, nested: Option<&Path>) {
        if self.config.dry_run {
            return;
        }
        let mut walker = WalkDir::new(dir).min_depth(1).follow_links(false);
        if let Depth::Levels(levels) = depth {
            walker = walker.max_depth(levels);
        }
        for entry in walker.into_iter().filter_map(Result::ok) {
            if !entry.file_type().is_dir() || is_inside(entry.path(), nested) {
                continue;
            }
            let is_empty = fs::read_dir(entry.path()).is_ok_and(|mut it| it.next().is_none());
            if !is_empty || !matches!(self.filter.check(entry.path(), Role::Source), Ok(None)) {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(&self.config.source_root) else {
                continue;
            };
            let target = self.config.destination_root.join(relative);
            if let Err(e) = fs::create_dir_all(&target) {
                warn!(dest = %target.display(), error = %e, "Could not create destination directory");
            } else {
                debug!(dest = %target.display(), "created empty directory");
            }
        }
    }

    /// Remove `dir` and the directories between it and each vacated parent,
    /// deepest first, when they are empty. Directories the filter rejects stay.
    fn prune_empty_dirs(
        &mut self,
        dir: &Path,
        vacated: &BTreeSet<PathBuf>,
        nested: Option<&Path>,
    ) -> usize {
        let mut candidates = BTreeSet::from([dir.to_path_buf()]);
        for parent in vacated {
            candidates.extend(
                parent
                    .ancestors()
                    .take_while(|ancestor| ancestor.starts_with(dir))
                    .map(Path::to_path_buf),
            );
        }
        let mut candidates: Vec<_> = candidates.into_iter().collect();
        candidates.sort_by_key(|path| Reverse(path.components().count()));

        let mut removed = 0;
        for path in &candidates {
            if is_inside(path, nested) {
                continue;
            }
            match self.filter.check(path, Role::Source) {
                Ok(None) => {}
                Ok(Some(rejection)) => {
                    debug!(dir = %path.display(), %rejection, "kept filtered directory");
                    continue;
                }
                Err(_) => continue,
            }
            if self.fs.delete_dir_if_empty(path) {
                debug!(dir = %path.display(), "removed empty directory");
                removed += 1;
            }
        }
        removed
    }
}

/// Remember the parent of a file that no longer exists at its source.
fn note_vacated(file: &Path, vacated: &mut BTreeSet<PathBuf>) {
    if fs::symlink_metadata(file).is_err() {
        if let Some(parent) = file.parent() {
            vacated.insert(parent.to_path_buf());
        }
    }
}

fn is_inside(path: &Path, dir: Option<&Path>) -> bool {
    dir.is_some_and(|d| path.starts_with(d))
}
