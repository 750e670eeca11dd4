// ConsoleLink - core/store.rs
//
// Append-only, insertion-ordered storage of captured entries.
// Core layer: pure logic, no I/O or UI dependencies.

use crate::core::model::{LogEntry, SeverityPresence};

/// In-memory console contents for the current session.
#[derive(Debug, Default)]
pub struct LogStore {
    entries: Vec<LogEntry>,
}

impl LogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry at the end of the sequence.
    pub fn append(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    /// Drop every stored entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Read-only view of all entries in insertion order.
    pub fn snapshot(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Which severities have at least one stored entry.
    pub fn presence(&self) -> SeverityPresence {
        let mut presence = SeverityPresence::default();
        for entry in &self.entries {
            presence.record(entry.severity);
        }
        presence
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::Severity;
    use chrono::Local;

    fn entry(message: &str, severity: Severity) -> LogEntry {
        LogEntry::new(message, "", severity, Local::now())
    }

    #[test]
    fn test_append_preserves_insertion_order() {
        let mut store = LogStore::new();
        store.append(entry("third-by-name", Severity::Info));
        store.append(entry("first-by-name", Severity::Error));
        store.append(entry("second-by-name", Severity::Warning));

        let messages: Vec<_> = store.snapshot().iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["third-by-name", "first-by-name", "second-by-name"]);
    }

    #[test]
    fn test_clear_empties_store() {
        let mut store = LogStore::new();
        store.append(entry("a", Severity::Info));
        store.append(entry("b", Severity::Info));
        assert_eq!(store.len(), 2);

        store.clear();
        assert!(store.is_empty());
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn test_presence_tracks_categories() {
        let mut store = LogStore::new();
        assert_eq!(store.presence(), SeverityPresence::default());

        store.append(entry("w", Severity::Warning));
        let presence = store.presence();
        assert!(presence.warnings);
        assert!(!presence.errors);
        assert!(!presence.logs);

        store.clear();
        assert!(!store.presence().warnings);
    }
}
