//! Listener registry with serialized delivery.
//!
//! Emissions are queued under the state lock and delivered by whichever
//! thread claims the `draining` flag. A listener that emits into its own source,
//! or a second thread emitting concurrently, only enqueues; the active drainer
//! picks the signal up after the current one. Delivery order is therefore the
//! order in which signals were enqueued, and no listener is ever invoked
//! re-entrantly.

use super::{Listener, Notification, Subscription};
use crate::error::RouteStateError;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::trace;

type SharedListener<T> = Arc<Mutex<Listener<T>>>;

struct Entry<T> {
    id: u64,
    /// First `Next` sequence number this listener may observe
    from_seq: u64,
    active: Arc<AtomicBool>,
    listener: SharedListener<T>,
}

#[derive(Clone)]
pub(crate) enum Terminal {
    Error(RouteStateError),
    Complete,
}

enum Signal<T> {
    Next { seq: u64, value: T },
    Replay { id: u64, value: T },
    Stop(Terminal),
}

impl<T> Signal<T> {
    fn notification(&self) -> Notification<'_, T> {
        match self {
            Signal::Next { value, .. } | Signal::Replay { value, .. } => Notification::Next(value),
            Signal::Stop(Terminal::Error(err)) => Notification::Error(err),
            Signal::Stop(Terminal::Complete) => Notification::Complete,
        }
    }
}

struct HubState<T> {
    entries: Vec<Entry<T>>,
    queue: VecDeque<Signal<T>>,
    /// Replayed to each new subscriber when set
    current: Option<T>,
    replay: bool,
    next_seq: u64,
    next_id: u64,
    draining: bool,
    stopped: Option<Terminal>,
}

pub(crate) struct Hub<T> {
    state: Mutex<HubState<T>>,
}

impl<T: Clone + Send + 'static> Hub<T> {
    /// Plain multicast: subscribers see only values emitted after they join.
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::with_state(None, false))
    }

    /// Replaying hub: each subscriber first receives the current value.
    pub(crate) fn replaying(initial: T) -> Arc<Self> {
        Arc::new(Self::with_state(Some(initial), true))
    }

    fn with_state(current: Option<T>, replay: bool) -> Self {
        Self {
            state: Mutex::new(HubState {
                entries: Vec::new(),
                queue: VecDeque::new(),
                current,
                replay,
                next_seq: 0,
                next_id: 0,
                draining: false,
                stopped: None,
            }),
        }
    }

    /// Emit a value. Returns `false` if the hub is stopped.
    pub(crate) fn emit(&self, value: T) -> bool {
        self.emit_with(value, |_| {})
    }

    /// Emit a value, running `commit` under the state lock before it is queued.
    ///
    /// `commit` is how owners mirror the value elsewhere (e.g. a lock-free read
    /// slot) without a window where the mirror and the queue disagree on order.
    pub(crate) fn emit_with<F>(&self, value: T, commit: F) -> bool
    where
        F: FnOnce(&T),
    {
        {
            let mut state = self.state.lock();
            if state.stopped.is_some() {
                return false;
            }
            commit(&value);
            if state.replay {
                state.current = Some(value.clone());
            }
            let seq = state.next_seq;
            state.next_seq += 1;
            state.queue.push_back(Signal::Next { seq, value });
        }
        self.drain();
        true
    }

    /// Stop the hub with an error or completion. Returns `false` if it was
    /// already stopped.
    pub(crate) fn stop(&self, terminal: Terminal) -> bool {
        {
            let mut state = self.state.lock();
            if state.stopped.is_some() {
                return false;
            }
            state.stopped = Some(terminal.clone());
            state.current = None;
            state.queue.push_back(Signal::Stop(terminal));
        }
        self.drain();
        true
    }

    pub(crate) fn is_stopped(&self) -> bool {
        self.state.lock().stopped.is_some()
    }

    pub(crate) fn observer_count(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub(crate) fn subscribe(self: &Arc<Self>, mut listener: Listener<T>) -> Subscription {
        let mut state = self.state.lock();
        if let Some(terminal) = state.stopped.clone() {
            drop(state);
            let signal: Signal<T> = Signal::Stop(terminal);
            listener(signal.notification());
            return Subscription::closed();
        }

        let id = state.next_id;
        state.next_id += 1;
        let active = Arc::new(AtomicBool::new(true));
        let from_seq = state.next_seq;
        state.entries.push(Entry {
            id,
            from_seq,
            active: Arc::clone(&active),
            listener: Arc::new(Mutex::new(listener)),
        });
        if let Some(value) = state.current.clone() {
            state.queue.push_back(Signal::Replay { id, value });
        }
        trace!(listener_id = id, observers = state.entries.len(), "listener registered");
        drop(state);

        let hub = Arc::downgrade(self);
        let subscription = Subscription::new(move || {
            active.store(false, Ordering::Release);
            if let Some(hub) = hub.upgrade() {
                hub.remove(id);
            }
        });
        self.drain();
        subscription
    }

    fn remove(&self, id: u64) {
        let mut state = self.state.lock();
        state.entries.retain(|entry| entry.id != id);
        trace!(listener_id = id, observers = state.entries.len(), "listener removed");
    }

    fn drain(&self) {
        {
            let mut state = self.state.lock();
            if state.draining {
                return;
            }
            state.draining = true;
        }
        let _guard = DrainGuard { hub: self };

        loop {
            let (signal, targets) = {
                let mut state = self.state.lock();
                let Some(signal) = state.queue.pop_front() else {
                    state.draining = false;
                    return;
                };
                let targets = state.targets(&signal);
                (signal, targets)
            };

            let notification = signal.notification();
            for (active, listener) in targets {
                if active.load(Ordering::Acquire) {
                    (&mut *listener.lock())(notification);
                }
            }
        }
    }
}

impl<T> HubState<T> {
    fn targets(&mut self, signal: &Signal<T>) -> Vec<(Arc<AtomicBool>, SharedListener<T>)> {
        let pick = |entry: &Entry<T>| (Arc::clone(&entry.active), Arc::clone(&entry.listener));
        match signal {
            Signal::Next { seq, .. } => self
                .entries
                .iter()
                .filter(|entry| entry.from_seq <= *seq)
                .map(pick)
                .collect(),
            Signal::Replay { id, .. } => self
                .entries
                .iter()
                .filter(|entry| entry.id == *id)
                .map(pick)
                .collect(),
            // Terminal signals release every listener.
            Signal::Stop(_) => std::mem::take(&mut self.entries).iter().map(pick).collect(),
        }
    }
}

/// Releases the drain flag if a listener panics mid-delivery.
struct DrainGuard<'a, T> {
    hub: &'a Hub<T>,
}

impl<T> Drop for DrainGuard<'_, T> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            self.hub.state.lock().draining = false;
        }
    }
}
