use super::{ActiveRoute, Router, RouterEvent};
use crate::error::{Result, RouteStateError};
use crate::observable::{Observable, Subject};
use crate::params::{ParamValue, Params};
use crate::snapshot::RouteSnapshot;
use arc_swap::ArcSwap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

/// Base used to resolve relative navigation targets.
const BASE_URL: &str = "http://localhost/";

/// In-process router with no browser history behind it.
///
/// The caller supplies the resolved route tree for each navigation; the
/// router owns URL handling and the event lifecycle:
///
/// 1. `NavigationStart`
/// 2. `RoutesRecognized`
/// 3. commit of the new tree and URL
/// 4. `NavigationEnd`
///
/// Root query parameters always come from the URL, overriding whatever the
/// supplied tree carried. Repeated keys become [`ParamValue::Many`].
pub struct MemoryRouter {
    events: Subject<RouterEvent>,
    state: ArcSwap<ActiveRoute>,
    navigation_id: AtomicU64,
}

impl MemoryRouter {
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: Subject::new(),
            state: ArcSwap::from_pointee(ActiveRoute::default()),
            navigation_id: AtomicU64::new(0),
        }
    }

    /// Navigate to `url` with the resolved route tree `tree`.
    ///
    /// Returns the navigation id. An unparseable URL emits
    /// `NavigationError`, leaves the committed state untouched, and returns
    /// [`RouteStateError::InvalidUrl`].
    pub fn navigate(&self, url: &str, tree: RouteSnapshot) -> Result<u64> {
        let id = self.next_id();
        self.events.next(RouterEvent::NavigationStart {
            id,
            url: url.to_string(),
        });

        let (normalized, query_params) = match parse_target(url) {
            Ok(parsed) => parsed,
            Err(err) => {
                self.events.next(RouterEvent::NavigationError {
                    id,
                    url: url.to_string(),
                    error: err.to_string(),
                });
                return Err(err);
            }
        };

        self.events.next(RouterEvent::RoutesRecognized {
            id,
            url: url.to_string(),
            url_after_redirects: normalized.clone(),
        });

        let mut root = tree;
        root.query_params = query_params;
        self.state.store(Arc::new(ActiveRoute {
            url: normalized.clone(),
            root: Arc::new(root),
        }));
        debug!(navigation_id = id, url = %normalized, "navigation committed");

        self.events.next(RouterEvent::NavigationEnd {
            id,
            url: url.to_string(),
            url_after_redirects: normalized,
        });
        Ok(id)
    }

    /// Start and immediately cancel a navigation. The committed state is unchanged.
    pub fn cancel(&self, url: &str, reason: &str) -> u64 {
        let id = self.next_id();
        self.events.next(RouterEvent::NavigationStart {
            id,
            url: url.to_string(),
        });
        self.events.next(RouterEvent::NavigationCancel {
            id,
            url: url.to_string(),
            reason: reason.to_string(),
        });
        id
    }

    /// Terminate the event stream with an error.
    pub fn fail(&self, message: &str) {
        warn!(error = message, "router event stream failed");
        self.events.error(RouteStateError::Upstream(message.to_string()));
    }

    /// Terminate the event stream normally.
    pub fn complete(&self) {
        self.events.complete();
    }

    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.events.observer_count()
    }

    fn next_id(&self) -> u64 {
        self.navigation_id.fetch_add(1, Ordering::Relaxed) + 1
    }
}

impl Default for MemoryRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl Router for MemoryRouter {
    fn events(&self) -> Observable<RouterEvent> {
        self.events.as_observable()
    }

    fn active_route(&self) -> Arc<ActiveRoute> {
        self.state.load_full()
    }
}

/// Resolve `url` against [`BASE_URL`] and return the router-style URL
/// (`/path?query#fragment`) together with its decoded query parameters.
pub(crate) fn parse_target(url: &str) -> Result<(String, Params)> {
    let invalid = |message: String| RouteStateError::InvalidUrl {
        url: url.to_string(),
        message,
    };
    let base = Url::parse(BASE_URL).map_err(|e| invalid(e.to_string()))?;
    let resolved = base.join(url).map_err(|e| invalid(e.to_string()))?;

    let mut normalized = resolved.path().to_string();
    if let Some(query) = resolved.query() {
        normalized.push('?');
        normalized.push_str(query);
    }
    if let Some(fragment) = resolved.fragment() {
        normalized.push('#');
        normalized.push_str(fragment);
    }

    let mut query_params = Params::new();
    for (key, value) in resolved.query_pairs() {
        match query_params.get_mut(&*key) {
            Some(existing) => existing.push(value),
            None => {
                query_params.insert(key.into_owned(), ParamValue::One(value.into_owned()));
            }
        }
    }
    Ok((normalized, query_params))
}
