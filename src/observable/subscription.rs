use parking_lot::Mutex;
use std::fmt;

type Teardown = Box<dyn FnOnce() + Send>;

/// Disposable handle returned by every `subscribe` call.
///
/// The teardown runs at most once: on the first [`unsubscribe`](Self::unsubscribe)
/// or when the handle is dropped, whichever comes first. Hold on to the handle
/// for as long as the listener should stay registered.
#[must_use = "dropping a Subscription cancels it immediately"]
pub struct Subscription {
    teardown: Mutex<Option<Teardown>>,
}

impl Subscription {
    /// Wrap a teardown closure.
    pub fn new<F>(teardown: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            teardown: Mutex::new(Some(Box::new(teardown))),
        }
    }

    /// A handle that is already closed (e.g. subscribing to a stopped source).
    pub fn closed() -> Self {
        Self {
            teardown: Mutex::new(None),
        }
    }

    /// Cancel the subscription.
    ///
    /// Returns `true` if this call ran the teardown, `false` if the handle was
    /// already closed.
    pub fn unsubscribe(&self) -> bool {
        // Take under the lock, run outside it: teardowns may re-enter the source.
        let teardown = self.teardown.lock().take();
        match teardown {
            Some(teardown) => {
                teardown();
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.teardown.lock().is_none()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(teardown) = self.teardown.get_mut().take() {
            teardown();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("closed", &self.is_closed())
            .finish()
    }
}
