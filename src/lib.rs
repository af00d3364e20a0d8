//! clipwatch - A polling clipboard watcher
//!
//! Polls the system clipboard on a timer, detects text changes, fans
//! them out to subscribers and keeps a bounded, deduplicated history
//! of everything observed.
//!
//! The platform hands library code no change notifications, so the
//! watcher polls: one background task reads the clipboard at a
//! configurable interval, compares against the last observed value and
//! emits a change event when the text differs. Reads are single-flight;
//! a poll outlasting the interval drops the overlapping ticks instead
//! of queuing them.
//!
//! ```no_run
//! use clipwatch::{ClipboardWatcher, WatchOptions};
//! use regex::Regex;
//!
//! # async fn run() {
//! let watcher = ClipboardWatcher::new();
//! watcher.on_change(|text| println!("clipboard: {text}"));
//! watcher.on_match(Regex::new(r"https?://\S+").unwrap(), |url| {
//!     println!("copied a link: {url}");
//! });
//! watcher.start(WatchOptions::default());
//! # }
//! ```
//!
//! Diagnostics go through the `log` facade; install any logger to see
//! them. No error in this crate is fatal: bad imports, read failures
//! and panicking subscribers are logged and absorbed.

pub mod error;
pub mod events;
pub mod history;
pub mod matcher;
pub mod source;
pub mod watch;

use std::sync::Arc;

use regex::Regex;

pub use error::Error;
pub use events::{EventBus, CLIPBOARD_CHANGE};
pub use history::{HistoryStore, DEFAULT_CAPACITY};
pub use source::{ClipboardSource, SystemClipboard};
pub use watch::{WatchOptions, Watcher, DEFAULT_INTERVAL_MS};

/// Watch loop, event bus and history wired together
///
/// One instance owns at most one watch session at a time. All state is
/// held in plain objects shared internally by `Arc`, so separate
/// instances are fully isolated; nothing here is process-global.
pub struct ClipboardWatcher {
    bus: Arc<EventBus>,
    history: Arc<HistoryStore>,
    watcher: Watcher,
}

impl ClipboardWatcher {
    /// Watcher over the system clipboard
    pub fn new() -> Self {
        Self::with_source(Arc::new(SystemClipboard::new()))
    }

    /// Watcher over a caller-provided clipboard source
    pub fn with_source(source: Arc<dyn ClipboardSource>) -> Self {
        let bus = Arc::new(EventBus::new());
        let history = Arc::new(HistoryStore::new());
        let watcher = Watcher::new(Arc::clone(&source), Arc::clone(&bus), Arc::clone(&history));
        Self {
            bus,
            history,
            watcher,
        }
    }

    /// Start polling; see [`Watcher::start`]
    pub fn start(&self, options: WatchOptions) {
        self.watcher.start(options);
    }

    /// Stop polling; see [`Watcher::stop`]
    pub fn stop(&self) {
        self.watcher.stop();
    }

    /// Retarget the polling interval; see [`Watcher::set_throttle`]
    pub fn set_throttle(&self, ms: u64) {
        self.watcher.set_throttle(ms);
    }

    /// Whether a polling session is currently active
    pub fn is_running(&self) -> bool {
        self.watcher.is_running()
    }

    /// One-shot clipboard read; empty string on failure
    pub async fn current_text(&self) -> String {
        self.watcher.current_text().await
    }

    /// Subscribe to every clipboard change
    pub fn on_change<F>(&self, callback: F)
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.bus.subscribe(CLIPBOARD_CHANGE, callback);
    }

    /// Subscribe to clipboard changes matching `pattern`
    ///
    /// The callback receives only the matched substring.
    pub fn on_match<F>(&self, pattern: Regex, callback: F)
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.bus
            .subscribe(CLIPBOARD_CHANGE, matcher::filtered(pattern, callback));
    }

    /// Snapshot of the observed history, oldest first
    pub fn history(&self) -> Vec<String> {
        self.history.list()
    }

    /// Drop all history entries
    pub fn clear_history(&self) {
        self.history.clear();
    }

    /// Serialize the history as a JSON array of strings
    pub fn export_history(&self) -> String {
        self.history.export()
    }

    /// Replace the history from a previous export; lenient on bad input
    pub fn import_history(&self, serialized: &str) {
        self.history.import(serialized);
    }
}

impl Default for ClipboardWatcher {
    fn default() -> Self {
        Self::new()
    }
}
