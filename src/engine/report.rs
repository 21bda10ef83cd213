//! End-of-run summary.

use std::fmt::Write as _;
use std::fs;
use std::time::Duration;

use super::ledger::{LedgerEntry, ResultLedger};

#[derive(Debug, Clone)]
pub struct RunReport {
    pub succeeded_count: usize,
    pub failed_count: usize,
    /// One per distinct source path, in processing order
    pub entries: Vec<LedgerEntry>,
    /// Cancelled before every request was handled
    pub interrupted: bool,
    pub elapsed: Duration,
}

impl RunReport {
    pub fn from_ledger(ledger: ResultLedger, interrupted: bool, elapsed: Duration) -> Self {
        let entries = ledger.into_entries();
        let succeeded_count = entries.iter().filter(|e| e.success).count();
        Self {
            succeeded_count,
            failed_count: entries.len() - succeeded_count,
            entries,
            interrupted,
            elapsed,
        }
    }

    pub fn succeeded(&self) -> impl Iterator<Item = &LedgerEntry> {
        self.entries.iter().filter(|e| e.success)
    }

    pub fn failed(&self) -> impl Iterator<Item = &LedgerEntry> {
        self.entries.iter().filter(|e| !e.success)
    }

    pub fn is_clean(&self) -> bool {
        self.failed_count == 0 && !self.interrupted
    }

    /// `succeeded: N, failed: M, elapsed time: T`
    pub fn summary_line(&self) -> String {
        format!(
            "Copy/move done; succeeded: {}, failed: {}, elapsed time: {}",
            self.succeeded_count,
            self.failed_count,
            format_elapsed(self.elapsed)
        )
    }

    /// Plain-text report: succeeded section, failed section, summary.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "[---succeeded---]");
        for entry in self.succeeded() {
            let _ = writeln!(out, "{}", format_entry(entry));
        }
        let _ = writeln!(out, "[---failed---]");
        for entry in self.failed() {
            let _ = writeln!(out, "{}", format_entry(entry));
        }
        if self.interrupted {
            let _ = writeln!(out, "Interrupted; remaining paths were not processed");
        }
        let _ = write!(out, "{}", self.summary_line());
        out
    }
}

/// `source -> destination: size`. The size is taken from the destination when
/// it exists (moved files no longer have a source).
pub fn format_entry(entry: &LedgerEntry) -> String {
    let size = entry
        .destination
        .as_deref()
        .and_then(|d| fs::metadata(d).ok())
        .filter(|m| m.is_file())
        .or_else(|| fs::metadata(&entry.source).ok().filter(|m| m.is_file()))
        .map(|m| format_bytes(m.len()))
        .unwrap_or_else(|| "-".to_string());
    match &entry.destination {
        Some(dest) => format!("{} -> {}: {}", entry.source.display(), dest.display(), size),
        None => format!("{} -> ?: {}", entry.source.display(), size),
    }
}

pub fn format_bytes(n: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;
    let f = n as f64;
    if f >= GB {
        format!("{:.1} GiB", f / GB)
    } else if f >= MB {
        format!("{:.1} MiB", f / MB)
    } else if f >= KB {
        format!("{:.1} KiB", f / KB)
    } else {
        format!("{n} B")
    }
}

fn format_elapsed(d: Duration) -> String {
    let secs = d.as_secs();
    if secs >= 60 {
        format!("{}m {:02}s", secs / 60, secs % 60)
    } else {
        format!("{:.3}s", d.as_secs_f64())
    }
}
