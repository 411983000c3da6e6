//! Error types shared by the store, the observable primitives and the router adapter.
//!
//! A missing parameter is not an error: it reaches the caller's cast as `None`.
//! Upstream failures are forwarded to subscribers, not handled here.

use thiserror::Error;

/// Errors surfaced by [`RouteState`](crate::RouteState) and its collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteStateError {
    /// The store was destroyed or failed and no longer accepts updates.
    #[error("store `{store}` is closed and no longer accepts updates")]
    StoreClosed {
        /// Name the store was created with (e.g. `router`)
        store: String,
    },

    /// A caller-supplied cast rejected a parameter value.
    #[error("failed to cast parameter `{name}`: {message}")]
    Cast {
        /// Parameter name passed to the selector
        name: String,
        /// Display output of the cast's error
        message: String,
    },

    /// The router's event stream terminated with an error.
    #[error("router event stream failed: {0}")]
    Upstream(String),

    /// A navigation target could not be parsed as a URL.
    #[error("invalid navigation url `{url}`: {message}")]
    InvalidUrl {
        /// The URL as given to the router
        url: String,
        /// Parser error message
        message: String,
    },
}

/// Result alias used across the crate.
pub type Result<T, E = RouteStateError> = std::result::Result<T, E>;
