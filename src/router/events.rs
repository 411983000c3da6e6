use serde::{Deserialize, Serialize};

/// Navigation lifecycle events emitted by a [`Router`](super::Router).
///
/// Every navigation gets a monotonically increasing `id` and ends in exactly
/// one of `NavigationEnd`, `NavigationCancel` or `NavigationError`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RouterEvent {
    NavigationStart {
        id: u64,
        url: String,
    },
    RoutesRecognized {
        id: u64,
        url: String,
        url_after_redirects: String,
    },
    /// The navigation completed and the new route tree is active
    NavigationEnd {
        id: u64,
        url: String,
        url_after_redirects: String,
    },
    NavigationCancel {
        id: u64,
        url: String,
        reason: String,
    },
    NavigationError {
        id: u64,
        url: String,
        error: String,
    },
}

impl RouterEvent {
    #[must_use]
    pub fn id(&self) -> u64 {
        match self {
            RouterEvent::NavigationStart { id, .. }
            | RouterEvent::RoutesRecognized { id, .. }
            | RouterEvent::NavigationEnd { id, .. }
            | RouterEvent::NavigationCancel { id, .. }
            | RouterEvent::NavigationError { id, .. } => *id,
        }
    }

    /// The URL the navigation was requested for.
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            RouterEvent::NavigationStart { url, .. }
            | RouterEvent::RoutesRecognized { url, .. }
            | RouterEvent::NavigationEnd { url, .. }
            | RouterEvent::NavigationCancel { url, .. }
            | RouterEvent::NavigationError { url, .. } => url,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_navigation_end(&self) -> bool {
        matches!(self, RouterEvent::NavigationEnd { .. })
    }
}
