//! The transfer engine.
//!
//! For every requested relative path the engine decides between the single-file
//! flow (`file.rs`) and the directory flow (`dir.rs`), and records exactly one
//! ledger entry per distinct source file. Everything is sequential; the only
//! shared state is the cancellation token.
//!
//! Collaborators are injectable:
//! - `FileOps` for rename/copy/delete (defaults to the local filesystem),
//! - `Prompt` for overwrite / partition-root confirmations (defaults to "no"),
//! - an observer closure receiving every `TransferEvent`.

mod dir;
mod event;
mod file;
mod filter;
mod ledger;
mod report;
mod resolve;
mod walker;

pub use event::{FailureReason, TransferEvent, TransferMethod};
pub use filter::{PathFilter, Rejection, Role};
pub use ledger::{LedgerEntry, ResultLedger};
pub use report::{RunReport, format_bytes, format_entry};
pub use resolve::{
    TransferTarget, is_destination_dir_allowed, resolve_for_discovered_file,
    resolve_for_relative_path,
};
pub use walker::{Depth, Listing, list_files, walk_files};

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{error, info, trace, warn};

use crate::config::{ExclusionConfig, RunConfig};
use crate::errors::CopyUtilError;
use crate::fs_ops::{FileOps, LocalFs};
use crate::prompt::{FixedAnswer, Prompt};
use crate::shutdown::CancelToken;

pub type Observer<'a> = Box<dyn FnMut(&TransferEvent<'_>) + 'a>;

pub struct TransferEngine<'a> {
    config: RunConfig,
    filter: PathFilter,
    fs: Box<dyn FileOps + 'a>,
    prompt: Box<dyn Prompt + 'a>,
    observer: Observer<'a>,
    cancel: CancelToken,
    ledger: ResultLedger,
    /// Destinations the user already agreed to replace (asked once per file)
    approved_overwrites: HashSet<PathBuf>,
    interrupted: bool,
    started: Instant,
}

impl<'a> TransferEngine<'a> {
    /// Validates `config`; configuration errors are returned before anything is touched.
    pub fn new(config: RunConfig, exclusion: ExclusionConfig) -> Result<Self, CopyUtilError> {
        config.validate()?;
        let filter = PathFilter::new(&exclusion, &config.source_root);
        Ok(Self {
            config,
            filter,
            fs: Box::new(LocalFs),
            prompt: Box::new(FixedAnswer(false)),
            observer: Box::new(log_event),
            cancel: CancelToken::new(),
            ledger: ResultLedger::new(),
            approved_overwrites: HashSet::new(),
            interrupted: false,
            started: Instant::now(),
        })
    }

    pub fn with_file_ops(mut self, fs: impl FileOps + 'a) -> Self {
        self.fs = Box::new(fs);
        self
    }

    pub fn with_prompt(mut self, prompt: impl Prompt + 'a) -> Self {
        self.prompt = Box::new(prompt);
        self
    }

    pub fn with_observer<F>(mut self, observer: F) -> Self
    where
        F: FnMut(&TransferEvent<'_>) + 'a,
    {
        self.observer = Box::new(observer);
        self
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn ledger(&self) -> &ResultLedger {
        &self.ledger
    }

    pub fn is_interrupted(&self) -> bool {
        self.interrupted
    }

    /// Handle every requested path in order, then report.
    pub fn run(mut self) -> RunReport {
        let requests = self.config.paths_to_handle.clone();
        for relative in &requests {
            if self.check_cancelled() {
                break;
            }
            self.handle_request(relative);
        }
        self.finish()
    }

    /// Handle one relative path (or the whole-tree sentinel).
    pub fn handle_request(&mut self, relative: &str) {
        let relative = relative.trim();
        if relative.is_empty() || self.check_cancelled() {
            return;
        }
        let target = resolve_for_relative_path(
            &self.config.source_root,
            &self.config.destination_root,
            relative,
        );
        info!(path = %relative, src = %target.source.display(), "Handling \"{relative}\"");

        match fs::metadata(&target.source) {
            Ok(meta) if meta.is_file() => self.handle_file(&target.source, &target.destination),
            Ok(meta) if meta.is_dir() => self.handle_directory(&target.source),
            _ => {
                error!(src = %target.source.display(), "Incorrect source path \"{}\"", target.source.display());
                self.emit(TransferEvent::Failed {
                    source: &target.source,
                    destination: None,
                    reason: FailureReason::IncorrectSourcePath,
                });
                self.ledger.record(&target.source, None, false);
            }
        }
    }

    pub fn finish(self) -> RunReport {
        RunReport::from_ledger(self.ledger, self.interrupted, self.started.elapsed())
    }

    fn emit(&mut self, event: TransferEvent<'_>) {
        (self.observer)(&event);
    }

    /// Latches the interrupted flag the first time cancellation is seen.
    fn check_cancelled(&mut self) -> bool {
        if !self.interrupted && self.cancel.is_cancelled() {
            warn!("Interrupted; stopping after the current file");
            self.interrupted = true;
        }
        self.interrupted
    }

    fn record_failure(&mut self, source: &Path, destination: Option<&Path>) {
        self.ledger.record(source, destination, false);
    }
}

fn log_event(event: &TransferEvent<'_>) {
    trace!(kind = event.kind(), ?event, "transfer event");
}

/// Validate and run with default collaborators (local filesystem, "no" to every question).
pub fn run(config: RunConfig, exclusion: ExclusionConfig) -> anyhow::Result<RunReport> {
    Ok(TransferEngine::new(config, exclusion)?.run())
}
