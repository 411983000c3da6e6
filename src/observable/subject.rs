use super::hub::{Hub, Terminal};
use super::{Notification, Observable, Subscription};
use crate::error::RouteStateError;
use std::sync::Arc;
use tracing::trace;

/// Multicast source: every value passed to [`next`](Self::next) is delivered to
/// all current subscribers, in emission order.
///
/// Subscribers only see values emitted after they subscribe. Once stopped by
/// [`error`](Self::error) or [`complete`](Self::complete), a subject ignores
/// further values and hands its terminal notification straight to any late
/// subscriber.
pub struct Subject<T> {
    hub: Arc<Hub<T>>,
}

impl<T: Clone + Send + 'static> Subject<T> {
    #[must_use]
    pub fn new() -> Self {
        Self { hub: Hub::new() }
    }

    pub fn next(&self, value: T) {
        if !self.hub.emit(value) {
            trace!("value dropped: subject already stopped");
        }
    }

    pub fn error(&self, error: RouteStateError) {
        self.hub.stop(Terminal::Error(error));
    }

    pub fn complete(&self) {
        self.hub.stop(Terminal::Complete);
    }

    pub fn subscribe<L>(&self, listener: L) -> Subscription
    where
        L: FnMut(Notification<'_, T>) + Send + 'static,
    {
        self.hub.subscribe(Box::new(listener))
    }

    /// A restartable [`Observable`] view of this subject.
    #[must_use]
    pub fn as_observable(&self) -> Observable<T> {
        let hub = Arc::clone(&self.hub);
        Observable::new(move |listener| hub.subscribe(listener))
    }

    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.hub.observer_count()
    }

    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.hub.is_stopped()
    }
}

impl<T: Clone + Send + 'static> Default for Subject<T> {
    fn default() -> Self {
        Self::new()
    }
}
