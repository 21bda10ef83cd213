use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Outcome of one source path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    pub source: PathBuf,
    /// Absent when no destination could be derived
    pub destination: Option<PathBuf>,
    pub success: bool,
}

/// Every distinct source path seen in a run, in processing order.
/// The first record for a path wins; later ones are ignored.
#[derive(Debug, Default)]
pub struct ResultLedger {
    entries: Vec<LedgerEntry>,
    index: HashMap<PathBuf, usize>,
}

impl ResultLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if `source` already had an entry.
    pub fn record(&mut self, source: &Path, destination: Option<&Path>, success: bool) -> bool {
        if self.index.contains_key(source) {
            return false;
        }
        self.index.insert(source.to_path_buf(), self.entries.len());
        self.entries.push(LedgerEntry {
            source: source.to_path_buf(),
            destination: destination.map(Path::to_path_buf),
            success,
        });
        true
    }

    pub fn contains(&self, source: &Path) -> bool {
        self.index.contains_key(source)
    }

    pub fn get(&self, source: &Path) -> Option<&LedgerEntry> {
        self.index.get(source).map(|&i| &self.entries[i])
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// (succeeded, failed), each in processing order.
    pub fn partition(&self) -> (Vec<&LedgerEntry>, Vec<&LedgerEntry>) {
        self.entries.iter().partition(|e| e.success)
    }

    pub fn into_entries(self) -> Vec<LedgerEntry> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_record_wins() {
        let mut ledger = ResultLedger::new();
        assert!(ledger.record(Path::new("/s/a"), Some(Path::new("/d/a")), false));
        assert!(!ledger.record(Path::new("/s/a"), Some(Path::new("/d/a")), true));
        assert_eq!(ledger.len(), 1);
        assert!(!ledger.get(Path::new("/s/a")).unwrap().success);
    }

    #[test]
    fn partition_keeps_order() {
        let mut ledger = ResultLedger::new();
        ledger.record(Path::new("/s/1"), None, true);
        ledger.record(Path::new("/s/2"), None, false);
        ledger.record(Path::new("/s/3"), None, true);
        let (ok, failed) = ledger.partition();
        let ok: Vec<_> = ok.iter().map(|e| e.source.clone()).collect();
        assert_eq!(ok, vec![PathBuf::from("/s/1"), PathBuf::from("/s/3")]);
        assert_eq!(failed.len(), 1);
        assert!(ledger.contains(Path::new("/s/2")));
    }
}
