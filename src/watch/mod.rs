//! clipwatch - Watch loop module
//!
//! Owns the polling timer, the single-flight discipline and the last
//! observed baseline; the only trigger of change emissions

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::events::{EventBus, CLIPBOARD_CHANGE};
use crate::history::HistoryStore;
use crate::source::ClipboardSource;

/// Default polling interval in milliseconds
pub const DEFAULT_INTERVAL_MS: u64 = 1000;

/// Options accepted by [`Watcher::start`]
#[derive(Debug, Clone)]
pub struct WatchOptions {
    /// Polling interval in milliseconds
    pub interval_ms: u64,
    /// Suppress history writes for this session; also wipes any
    /// existing history when the session starts
    pub private: bool,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_INTERVAL_MS,
            private: false,
        }
    }
}

/// One started polling session
struct Session {
    running: Arc<AtomicBool>,
    private: bool,
    handle: JoinHandle<()>,
}

/// Configured interval plus the active session, if any
struct WatchState {
    interval_ms: u64,
    session: Option<Session>,
}

/// The polling state machine
///
/// At most one session is active; starting while one is running fully
/// stops it first. The baseline survives stop/start, so a restart does
/// not re-emit clipboard contents that were already observed.
pub struct Watcher {
    source: Arc<dyn ClipboardSource>,
    bus: Arc<EventBus>,
    history: Arc<HistoryStore>,
    baseline: Arc<Mutex<String>>,
    state: Mutex<WatchState>,
}

impl Watcher {
    pub fn new(
        source: Arc<dyn ClipboardSource>,
        bus: Arc<EventBus>,
        history: Arc<HistoryStore>,
    ) -> Self {
        Self {
            source,
            bus,
            history,
            baseline: Arc::new(Mutex::new(String::new())),
            state: Mutex::new(WatchState {
                interval_ms: DEFAULT_INTERVAL_MS,
                session: None,
            }),
        }
    }

    /// Start polling, stopping any previous session first
    ///
    /// Must be called from within a tokio runtime. The first poll
    /// happens one full interval after this call. A private session
    /// clears the history immediately on start: it begins empty and
    /// leaves nothing behind, including any prior non-private entries.
    pub fn start(&self, options: WatchOptions) {
        let mut state = self.state.lock();
        Self::stop_session(&mut state);
        state.interval_ms = options.interval_ms;

        if options.private {
            self.history.clear();
        }

        let running = Arc::new(AtomicBool::new(true));
        let handle = tokio::spawn(Self::poll_loop(
            Arc::clone(&self.source),
            Arc::clone(&self.bus),
            Arc::clone(&self.history),
            Arc::clone(&self.baseline),
            Arc::clone(&running),
            options.interval_ms,
            options.private,
        ));

        log::info!(
            "[Watch] Started polling every {}ms (private: {})",
            options.interval_ms,
            options.private
        );
        state.session = Some(Session {
            running,
            private: options.private,
            handle,
        });
    }

    /// Stop polling
    ///
    /// Idempotent; leaves baseline and history alone. A read already
    /// in flight is not cancelled: if it completes with changed text
    /// it still emits and records, then the task drains.
    pub fn stop(&self) {
        let mut state = self.state.lock();
        Self::stop_session(&mut state);
    }

    /// Retarget the polling interval
    ///
    /// A no-op when `ms` equals the current interval. When running,
    /// the session restarts with the same private flag and the timer
    /// phase resets: the next poll happens `ms` after this call.
    pub fn set_throttle(&self, ms: u64) {
        let restart = {
            let mut state = self.state.lock();
            if state.interval_ms == ms {
                return;
            }
            state.interval_ms = ms;
            state.session.as_ref().map(|session| session.private)
        };

        log::debug!("[Watch] Polling interval set to {}ms", ms);
        if let Some(private) = restart {
            self.start(WatchOptions {
                interval_ms: ms,
                private,
            });
        }
    }

    /// Whether a polling session is currently active
    pub fn is_running(&self) -> bool {
        self.state.lock().session.is_some()
    }

    /// One-shot clipboard read, independent of the polling loop
    ///
    /// Read failures are logged and flattened to an empty string.
    pub async fn current_text(&self) -> String {
        match self.source.read_text().await {
            Ok(text) => text,
            Err(e) => {
                log::error!("[Watch] Failed to read clipboard: {}", e);
                String::new()
            }
        }
    }

    fn stop_session(state: &mut WatchState) {
        if let Some(session) = state.session.take() {
            session.running.store(false, Ordering::SeqCst);
            // Detach rather than abort: the task checks the flag on its
            // next wake-up, so an in-flight read finishes its emission.
            drop(session.handle);
            log::info!("[Watch] Stopped polling");
        }
    }

    async fn poll_loop(
        source: Arc<dyn ClipboardSource>,
        bus: Arc<EventBus>,
        history: Arc<HistoryStore>,
        baseline: Arc<Mutex<String>>,
        running: Arc<AtomicBool>,
        interval_ms: u64,
        private: bool,
    ) {
        let period = Duration::from_millis(interval_ms);
        let mut ticker = interval_at(Instant::now() + period, period);
        // Single-flight: the read below is awaited inline, so a read
        // outlasting the interval makes the ticker skip the missed
        // ticks instead of queuing them.
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            if !running.load(Ordering::SeqCst) {
                break;
            }

            match source.read_text().await {
                Ok(text) => {
                    log::debug!("[Watch] Read {} bytes from clipboard", text.len());
                    let changed = {
                        let mut last = baseline.lock();
                        if *last == text {
                            false
                        } else {
                            *last = text.clone();
                            true
                        }
                    };
                    if changed {
                        log::debug!("[Watch] Clipboard changed, emitting");
                        bus.emit(CLIPBOARD_CHANGE, &text);
                        if !private {
                            history.add(&text);
                        }
                    }
                }
                Err(e) => {
                    // Transient: no emission this tick, keep polling.
                    log::warn!("[Watch] Failed to read clipboard: {}", e);
                }
            }
        }
    }
}
