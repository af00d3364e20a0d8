//! clipwatch - Clipboard history module
//!
//! Bounded, order-preserving store of observed clipboard text with
//! adjacent-duplicate suppression and JSON import/export

use std::collections::VecDeque;

use parking_lot::Mutex;

/// Default maximum number of retained entries
pub const DEFAULT_CAPACITY: usize = 50;

/// Bounded clipboard history
///
/// Entries are kept in insertion order. A new entry is rejected only
/// when it equals the immediately preceding one; non-adjacent repeats
/// stay. Past capacity the oldest entry is evicted.
pub struct HistoryStore {
    entries: Mutex<VecDeque<String>>,
    capacity: usize,
}

impl HistoryStore {
    /// Create a store with the default capacity
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a store retaining at most `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Append `text` unless it equals the most recent entry
    pub fn add(&self, text: &str) {
        let mut entries = self.entries.lock();
        if entries.back().map(String::as_str) == Some(text) {
            return;
        }
        entries.push_back(text.to_string());
        if entries.len() > self.capacity {
            entries.pop_front();
        }
    }

    /// Snapshot of the current entries, oldest first
    pub fn list(&self) -> Vec<String> {
        self.entries.lock().iter().cloned().collect()
    }

    /// Remove all entries
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    /// Number of retained entries
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether the history is empty
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Serialize the history as a JSON array of strings
    pub fn export(&self) -> String {
        let entries = self.entries.lock();
        serde_json::to_string(&*entries).unwrap_or_else(|e| {
            log::error!("[History] Failed to export history: {}", e);
            "[]".to_string()
        })
    }

    /// Replace the history with a previously exported JSON array
    ///
    /// An import longer than the capacity keeps only the most recent
    /// entries. Input that does not parse as an array of strings is
    /// logged and leaves the current contents untouched.
    pub fn import(&self, serialized: &str) {
        let imported: Vec<String> = match serde_json::from_str(serialized) {
            Ok(values) => values,
            Err(e) => {
                log::warn!("[History] Failed to import history: {}", e);
                return;
            }
        };

        let mut entries = self.entries.lock();
        entries.clear();
        let skip = imported.len().saturating_sub(self.capacity);
        entries.extend(imported.into_iter().skip(skip));
    }
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjacent_duplicates_are_suppressed() {
        let history = HistoryStore::new();
        history.add("a");
        history.add("a");
        history.add("a");
        assert_eq!(history.list(), vec!["a"]);
    }

    #[test]
    fn non_adjacent_repeats_are_kept() {
        let history = HistoryStore::new();
        history.add("a");
        history.add("b");
        history.add("a");
        assert_eq!(history.list(), vec!["a", "b", "a"]);
    }

    #[test]
    fn never_holds_adjacent_equal_entries() {
        let history = HistoryStore::with_capacity(5);
        for text in ["a", "a", "b", "b", "b", "c", "c", "a"] {
            history.add(text);
        }
        let entries = history.list();
        for pair in entries.windows(2) {
            assert_ne!(pair[0], pair[1]);
        }
        assert_eq!(entries, vec!["a", "b", "c", "a"]);
    }

    #[test]
    fn capacity_evicts_the_oldest_entry() {
        let history = HistoryStore::with_capacity(3);
        for text in ["a", "b", "c", "d"] {
            history.add(text);
        }
        assert_eq!(history.list(), vec!["b", "c", "d"]);
    }

    #[test]
    fn length_never_exceeds_default_capacity() {
        let history = HistoryStore::new();
        for i in 0..70 {
            history.add(&format!("entry-{}", i));
        }
        assert_eq!(history.len(), DEFAULT_CAPACITY);
        assert_eq!(history.list()[0], "entry-20");
    }

    #[test]
    fn clear_empties_the_history() {
        let history = HistoryStore::new();
        history.add("a");
        history.add("b");
        history.clear();
        assert!(history.is_empty());
    }

    #[test]
    fn export_import_round_trips() {
        let history = HistoryStore::new();
        for text in ["a", "b", "c with \"quotes\""] {
            history.add(text);
        }

        let serialized = history.export();
        let restored = HistoryStore::new();
        restored.import(&serialized);
        assert_eq!(restored.list(), history.list());
    }

    #[test]
    fn import_keeps_the_tail_beyond_capacity() {
        let history = HistoryStore::with_capacity(3);
        history.import(r#"["a", "b", "c", "d", "e"]"#);
        assert_eq!(history.list(), vec!["c", "d", "e"]);
    }

    #[test]
    fn import_of_empty_array_yields_empty_history() {
        let history = HistoryStore::new();
        history.add("leftover");
        history.import("[]");
        assert!(history.is_empty());
    }

    #[test]
    fn import_of_invalid_json_leaves_state_unchanged() {
        let history = HistoryStore::new();
        history.add("keep me");
        history.import("{not json");
        assert_eq!(history.list(), vec!["keep me"]);
    }

    #[test]
    fn import_of_non_array_payload_leaves_state_unchanged() {
        let history = HistoryStore::new();
        history.add("keep me");
        history.import(r#"{"a": 1}"#);
        history.import(r#""just a string""#);
        history.import("[1, 2, 3]");
        assert_eq!(history.list(), vec!["keep me"]);
    }

    #[test]
    fn list_returns_a_detached_snapshot() {
        let history = HistoryStore::new();
        history.add("a");
        let mut snapshot = history.list();
        snapshot.push("injected".to_string());
        assert_eq!(history.list(), vec!["a"]);
    }
}
