//! clipwatch - Event bus module
//!
//! Minimal publish/subscribe registry keyed by event name, with
//! synchronous fan-out in registration order

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use parking_lot::RwLock;

/// Name of the event emitted on every detected clipboard change
pub const CLIPBOARD_CHANGE: &str = "clipboard-change";

/// A registered event callback
type Subscriber = Arc<dyn Fn(&str) + Send + Sync>;

/// Publish/subscribe registry keyed by event name
///
/// Dispatch is synchronous and runs in registration order. A panicking
/// subscriber is isolated so the remaining subscribers still fire.
#[derive(Default)]
pub struct EventBus {
    subscribers: RwLock<HashMap<String, Vec<Subscriber>>>,
}

impl EventBus {
    /// Create an empty event bus
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` for `event`
    ///
    /// Never fails. Duplicate registrations of the same callback are
    /// allowed and all of them fire; registrations live for the
    /// lifetime of the bus.
    pub fn subscribe<F>(&self, event: &str, callback: F)
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        let mut subscribers = self.subscribers.write();
        subscribers
            .entry(event.to_string())
            .or_default()
            .push(Arc::new(callback));
    }

    /// Invoke every callback registered for `event` with `payload`
    ///
    /// Emitting an event nobody subscribed to is a no-op. The
    /// registration list is snapshotted before dispatch, so a callback
    /// may itself subscribe without deadlocking the registry lock.
    pub fn emit(&self, event: &str, payload: &str) {
        let snapshot: Vec<Subscriber> = {
            let subscribers = self.subscribers.read();
            match subscribers.get(event) {
                Some(list) => list.clone(),
                None => return,
            }
        };

        for callback in snapshot {
            if panic::catch_unwind(AssertUnwindSafe(|| callback(payload))).is_err() {
                log::error!("[EventBus] Subscriber for '{}' panicked, continuing", event);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn dispatches_in_registration_order() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for tag in ["first", "second", "third"] {
            let seen = Arc::clone(&seen);
            bus.subscribe("change", move |_| seen.lock().push(tag));
        }

        bus.emit("change", "payload");
        assert_eq!(*seen.lock(), vec!["first", "second", "third"]);
    }

    #[test]
    fn payload_reaches_every_subscriber() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for _ in 0..2 {
            let seen = Arc::clone(&seen);
            bus.subscribe("change", move |text| seen.lock().push(text.to_string()));
        }

        bus.emit("change", "hello");
        assert_eq!(*seen.lock(), vec!["hello", "hello"]);
    }

    #[test]
    fn emit_without_subscribers_is_a_noop() {
        let bus = EventBus::new();
        bus.emit("nobody-home", "payload");
    }

    #[test]
    fn events_are_isolated_by_name() {
        let bus = EventBus::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&calls);
        bus.subscribe("one", move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        bus.emit("two", "payload");
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        bus.emit("one", "payload");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn panicking_subscriber_does_not_block_others() {
        let bus = EventBus::new();
        let calls = Arc::new(AtomicUsize::new(0));

        bus.subscribe("change", |_| panic!("subscriber blew up"));
        let counter = Arc::clone(&calls);
        bus.subscribe("change", move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        bus.emit("change", "payload");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn subscriber_may_register_during_dispatch() {
        let bus = Arc::new(EventBus::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let reentrant = Arc::clone(&bus);
        let counter = Arc::clone(&calls);
        bus.subscribe("change", move |_| {
            let counter = Arc::clone(&counter);
            reentrant.subscribe("change", move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        });

        // First emit only registers; late subscribers never see the
        // event that created them.
        bus.emit("change", "payload");
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        bus.emit("change", "payload");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
