//! # Observable Module
//!
//! Minimal push-based publish/subscribe primitives used by the store and the
//! router adapter.
//!
//! ## Overview
//!
//! - **[`Observable`]** - a lazy, restartable stream description with the
//!   handful of operators route selectors need (`map`, `try_map`, `filter`,
//!   `distinct_until_changed`)
//! - **[`Subject`]** - a multicast source that producers push values into
//! - **[`Subscription`]** - the disposable handle every `subscribe` returns
//! - **[`Notification`]** - what a listener receives: a value, an error or
//!   completion
//!
//! ## Delivery guarantees
//!
//! - Values are delivered synchronously on the emitting call when no other
//!   delivery is in progress.
//! - Re-entrant emissions (a listener pushing into its own source) and
//!   concurrent emissions from other threads are queued and delivered in
//!   arrival order by the thread already delivering.
//! - After [`Subscription::unsubscribe`] returns, the listener is never
//!   invoked again.
//! - An error or completion is delivered once and releases every listener.
//!
//! ## Usage
//!
//! ```rust
//! use route_state::observable::{Notification, Subject};
//! use std::sync::{Arc, Mutex};
//!
//! let subject = Subject::new();
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&seen);
//!
//! let doubled = subject.as_observable().map(|v: &i32| v * 2);
//! let subscription = doubled.subscribe(move |n: Notification<'_, i32>| {
//!     if let Notification::Next(v) = n {
//!         sink.lock().unwrap().push(*v);
//!     }
//! });
//!
//! subject.next(1);
//! subject.next(2);
//! subscription.unsubscribe();
//! subject.next(3);
//!
//! assert_eq!(*seen.lock().unwrap(), vec![2, 4]);
//! ```

pub(crate) mod hub;
mod stream;
mod subject;
mod subscription;

pub use stream::Observable;
pub use subject::Subject;
pub use subscription::Subscription;

use crate::error::RouteStateError;
use std::fmt;

/// Boxed listener as stored by sources.
pub type Listener<T> = Box<dyn FnMut(Notification<'_, T>) + Send>;

/// A single signal delivered to a listener.
pub enum Notification<'a, T> {
    Next(&'a T),
    Error(&'a RouteStateError),
    Complete,
}

impl<'a, T> Notification<'a, T> {
    /// The carried value, if this is a `Next`.
    #[must_use]
    pub fn value(self) -> Option<&'a T> {
        match self {
            Notification::Next(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Notification::Next(_))
    }
}

impl<T> Clone for Notification<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Notification<'_, T> {}

impl<T: fmt::Debug> fmt::Debug for Notification<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notification::Next(value) => f.debug_tuple("Next").field(value).finish(),
            Notification::Error(err) => f.debug_tuple("Error").field(err).finish(),
            Notification::Complete => f.write_str("Complete"),
        }
    }
}
