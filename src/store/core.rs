use crate::error::{Result, RouteStateError};
use crate::observable::hub::{Hub, Terminal};
use crate::observable::Observable;
use arc_swap::ArcSwap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Single-value observable store.
///
/// Holds exactly one current state. [`update`](Self::update) replaces it
/// wholesale and notifies subscribers; [`get_value`](Self::get_value) is a
/// lock-free read of whatever was last committed.
///
/// # Lifecycle
///
/// A store is open until [`destroy`](Self::destroy) is called or an upstream
/// error is forwarded into it. Once closed it rejects updates with
/// [`RouteStateError::StoreClosed`], completes (or errors) every live
/// subscription, and hands new subscribers only that terminal notification.
pub struct Store<S> {
    name: String,
    current: ArcSwap<S>,
    hub: Arc<Hub<Arc<S>>>,
}

impl<S: Send + Sync + 'static> Store<S> {
    pub fn new(name: impl Into<String>, initial: S) -> Self {
        let initial = Arc::new(initial);
        Self {
            name: name.into(),
            current: ArcSwap::new(Arc::clone(&initial)),
            hub: Hub::replaying(initial),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Atomically replace the state and notify subscribers.
    pub fn update(&self, state: S) -> Result<()> {
        let committed = self
            .hub
            .emit_with(Arc::new(state), |next| self.current.store(Arc::clone(next)));
        if committed {
            Ok(())
        } else {
            warn!(store = %self.name, "update rejected: store is closed");
            Err(RouteStateError::StoreClosed {
                store: self.name.clone(),
            })
        }
    }

    /// The last committed state.
    #[inline]
    #[must_use]
    pub fn get_value(&self) -> Arc<S> {
        self.current.load_full()
    }

    /// Stream of the full state: the current value on subscribe, then every update.
    #[must_use]
    pub fn observe(&self) -> Observable<Arc<S>> {
        let hub = Arc::clone(&self.hub);
        Observable::new(move |listener| hub.subscribe(listener))
    }

    /// Stream of a projection of the state.
    #[must_use]
    pub fn select<T, F>(&self, project: F) -> Observable<T>
    where
        T: 'static,
        F: Fn(&S) -> T + Send + Sync + 'static,
    {
        self.observe().map(move |state: &Arc<S>| project(state))
    }

    /// Close the store and complete every subscription.
    ///
    /// Returns `true` if this call closed it.
    pub fn destroy(&self) -> bool {
        let closed = self.hub.stop(Terminal::Complete);
        if closed {
            debug!(store = %self.name, "store destroyed");
        }
        closed
    }

    /// Close the store by forwarding an upstream error to every subscriber.
    pub(crate) fn fail(&self, error: RouteStateError) -> bool {
        let closed = self.hub.stop(Terminal::Error(error));
        if closed {
            debug!(store = %self.name, "store closed by upstream error");
        }
        closed
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.hub.is_stopped()
    }

    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.hub.observer_count()
    }
}
