use super::{Listener, Notification, Subscription};
use crate::error::Result;
use std::fmt;
use std::sync::Arc;

type SubscribeFn<T> = dyn Fn(Listener<T>) -> Subscription + Send + Sync;

/// A lazy, restartable stream of values.
///
/// An `Observable` is only a description: nothing runs until
/// [`subscribe`](Self::subscribe) is called, and each subscription gets its own
/// operator state (e.g. the last value seen by
/// [`distinct_until_changed`](Self::distinct_until_changed)). Cloning is cheap.
pub struct Observable<T> {
    subscribe_fn: Arc<SubscribeFn<T>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            subscribe_fn: Arc::clone(&self.subscribe_fn),
        }
    }
}

impl<T> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Observable")
    }
}

impl<T: 'static> Observable<T> {
    /// Build an observable from a subscribe function.
    ///
    /// `subscribe` is called once per subscriber with that subscriber's
    /// listener and must return the handle that detaches it.
    pub fn new<F>(subscribe: F) -> Self
    where
        F: Fn(Listener<T>) -> Subscription + Send + Sync + 'static,
    {
        Self {
            subscribe_fn: Arc::new(subscribe),
        }
    }

    pub fn subscribe<L>(&self, listener: L) -> Subscription
    where
        L: FnMut(Notification<'_, T>) + Send + 'static,
    {
        (self.subscribe_fn)(Box::new(listener))
    }

    /// Subscribe to values only; errors and completion are ignored.
    pub fn subscribe_next<F>(&self, mut on_next: F) -> Subscription
    where
        F: FnMut(&T) + Send + 'static,
    {
        self.subscribe(move |notification: Notification<'_, T>| {
            if let Notification::Next(value) = notification {
                on_next(value);
            }
        })
    }

    #[must_use]
    pub fn map<U, F>(&self, project: F) -> Observable<U>
    where
        U: 'static,
        F: Fn(&T) -> U + Send + Sync + 'static,
    {
        let source = self.clone();
        let project = Arc::new(project);
        Observable::new(move |mut downstream: Listener<U>| {
            let project = Arc::clone(&project);
            source.subscribe(move |notification: Notification<'_, T>| match notification {
                Notification::Next(value) => {
                    let mapped = project(value);
                    downstream(Notification::Next(&mapped));
                }
                Notification::Error(err) => downstream(Notification::Error(err)),
                Notification::Complete => downstream(Notification::Complete),
            })
        })
    }

    /// Like [`map`](Self::map), but a failed projection is delivered as an
    /// error and ends the stream for that subscriber.
    #[must_use]
    pub fn try_map<U, F>(&self, project: F) -> Observable<U>
    where
        U: 'static,
        F: Fn(&T) -> Result<U> + Send + Sync + 'static,
    {
        let source = self.clone();
        let project = Arc::new(project);
        Observable::new(move |mut downstream: Listener<U>| {
            let project = Arc::clone(&project);
            let mut stopped = false;
            source.subscribe(move |notification: Notification<'_, T>| {
                if stopped {
                    return;
                }
                match notification {
                    Notification::Next(value) => match project(value) {
                        Ok(mapped) => downstream(Notification::Next(&mapped)),
                        Err(err) => {
                            stopped = true;
                            downstream(Notification::Error(&err));
                        }
                    },
                    Notification::Error(err) => {
                        stopped = true;
                        downstream(Notification::Error(err));
                    }
                    Notification::Complete => {
                        stopped = true;
                        downstream(Notification::Complete);
                    }
                }
            })
        })
    }

    #[must_use]
    pub fn filter<F>(&self, predicate: F) -> Observable<T>
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let source = self.clone();
        let predicate = Arc::new(predicate);
        Observable::new(move |mut downstream: Listener<T>| {
            let predicate = Arc::clone(&predicate);
            source.subscribe(move |notification: Notification<'_, T>| match notification {
                Notification::Next(value) if !predicate(value) => {}
                other => downstream(other),
            })
        })
    }

    /// Suppress values equal to the previous value seen by this subscriber.
    #[must_use]
    pub fn distinct_until_changed(&self) -> Observable<T>
    where
        T: Clone + PartialEq + Send,
    {
        let source = self.clone();
        Observable::new(move |mut downstream: Listener<T>| {
            let mut last: Option<T> = None;
            source.subscribe(move |notification: Notification<'_, T>| match notification {
                Notification::Next(value) => {
                    if last.as_ref() != Some(value) {
                        last = Some(value.clone());
                        downstream(Notification::Next(value));
                    }
                }
                other => downstream(other),
            })
        })
    }
}
