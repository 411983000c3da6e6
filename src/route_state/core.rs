use crate::config::RouteStateConfig;
use crate::error::RouteStateError;
use crate::observable::{Notification, Observable, Subscription};
use crate::params::ParamMap;
use crate::router::{Router, RouterEvent};
use crate::snapshot::Data;
use crate::state::RouteStateData;
use crate::store::Store;
use std::fmt::Display;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Reactive cache of the active route.
///
/// Construct one per router at the application's composition root and share
/// it (typically as `Arc<RouteState>`) with whatever needs route information.
/// Every selector returns a lazy [`Observable`] that stays silent until the
/// first navigation has completed.
pub struct RouteState {
    store: Arc<Store<RouteStateData>>,
    navigation: Subscription,
    config: RouteStateConfig,
}

impl RouteState {
    /// Start tracking `router` with the default configuration.
    pub fn new<R>(router: Arc<R>) -> Self
    where
        R: Router + ?Sized + 'static,
    {
        Self::with_config(router, RouteStateConfig::default())
    }

    /// Start tracking `router`.
    ///
    /// The store starts at [`RouteStateData::default`]; nothing else happens
    /// until the router emits `NavigationEnd`.
    pub fn with_config<R>(router: Arc<R>, config: RouteStateConfig) -> Self
    where
        R: Router + ?Sized + 'static,
    {
        let store = Arc::new(Store::new(
            config.store_name.clone(),
            RouteStateData::default(),
        ));
        let navigation = handle_navigation_end(&router, &store);
        info!(store = %config.store_name, distinct = config.distinct, "route state tracking router");
        Self {
            store,
            navigation,
            config,
        }
    }

    /// Stream of the full record, once per completed navigation.
    #[must_use]
    pub fn select_state(&self) -> Observable<Arc<RouteStateData>> {
        self.store
            .observe()
            .filter(|state: &Arc<RouteStateData>| state.has_navigated())
    }

    /// Stream of `projector` applied to each record, once per completed navigation.
    #[must_use]
    pub fn select<T, F>(&self, projector: F) -> Observable<T>
    where
        T: 'static,
        F: Fn(&RouteStateData) -> T + Send + Sync + 'static,
    {
        self.select_state()
            .map(move |state: &Arc<RouteStateData>| projector(state))
    }

    /// Merged route data, once per completed navigation.
    #[must_use]
    pub fn select_data(&self) -> Observable<Data> {
        self.select(|state| state.data.clone())
    }

    /// Lookup view over the root query parameters, once per completed navigation.
    #[must_use]
    pub fn select_query_param_map(&self) -> Observable<ParamMap> {
        self.select(|state| state.query_param_map.clone())
    }

    /// First value of query parameter `name`, `None` when absent.
    #[must_use]
    pub fn select_query_param(&self, name: &str) -> Observable<Option<String>> {
        self.select_query_param_as(name, |value| value.map(str::to_owned))
    }

    /// Query parameter `name` passed through `cast`.
    ///
    /// `cast` receives `None` when the parameter is absent, so it decides what
    /// absence means (a default, `Option`, ...).
    #[must_use]
    pub fn select_query_param_as<T, F>(&self, name: &str, cast: F) -> Observable<T>
    where
        T: Clone + PartialEq + Send + 'static,
        F: Fn(Option<&str>) -> T + Send + Sync + 'static,
    {
        let name = name.to_owned();
        self.select_distinct(move |state| cast(state.query_param_map.get(&name)))
    }

    /// Query parameter `name` through a fallible `cast`.
    ///
    /// A cast error reaches the subscriber as
    /// [`RouteStateError::Cast`] and ends that subscriber's stream.
    #[must_use]
    pub fn try_select_query_param_as<T, E, F>(&self, name: &str, cast: F) -> Observable<T>
    where
        T: Clone + PartialEq + Send + 'static,
        E: Display,
        F: Fn(Option<&str>) -> Result<T, E> + Send + Sync + 'static,
    {
        let name = name.to_owned();
        self.try_select_distinct(move |state| {
            cast(state.query_param_map.get(&name)).map_err(|err| RouteStateError::Cast {
                name: name.clone(),
                message: err.to_string(),
            })
        })
    }

    /// Lookup view over the merged path parameters, once per completed navigation.
    #[must_use]
    pub fn select_params(&self) -> Observable<ParamMap> {
        self.select(|state| state.param_map.clone())
    }

    /// Path parameter `name`, `None` when absent.
    #[must_use]
    pub fn select_param(&self, name: &str) -> Observable<Option<String>> {
        self.select_param_as(name, |value| value.map(str::to_owned))
    }

    /// Path parameter `name` passed through `cast`; see
    /// [`select_query_param_as`](Self::select_query_param_as).
    #[must_use]
    pub fn select_param_as<T, F>(&self, name: &str, cast: F) -> Observable<T>
    where
        T: Clone + PartialEq + Send + 'static,
        F: Fn(Option<&str>) -> T + Send + Sync + 'static,
    {
        let name = name.to_owned();
        self.select_distinct(move |state| cast(state.param_map.get(&name)))
    }

    /// Path parameter `name` through a fallible `cast`; see
    /// [`try_select_query_param_as`](Self::try_select_query_param_as).
    #[must_use]
    pub fn try_select_param_as<T, E, F>(&self, name: &str, cast: F) -> Observable<T>
    where
        T: Clone + PartialEq + Send + 'static,
        E: Display,
        F: Fn(Option<&str>) -> Result<T, E> + Send + Sync + 'static,
    {
        let name = name.to_owned();
        self.try_select_distinct(move |state| {
            cast(state.param_map.get(&name)).map_err(|err| RouteStateError::Cast {
                name: name.clone(),
                message: err.to_string(),
            })
        })
    }

    #[must_use]
    pub fn select_url(&self) -> Observable<String> {
        self.select_distinct(|state| state.url.clone())
    }

    /// The current record; the empty default before the first navigation.
    #[must_use]
    pub fn get_value(&self) -> Arc<RouteStateData> {
        self.store.get_value()
    }

    /// Stop tracking: complete every selector stream, reject further store
    /// updates and cancel the router subscription. Safe to call repeatedly.
    pub fn destroy(&self) {
        let closed = self.store.destroy();
        let cancelled = self.navigation.unsubscribe();
        if closed || cancelled {
            info!(store = %self.store.name(), "route state destroyed");
        }
    }

    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.store.is_closed()
    }

    #[must_use]
    pub fn config(&self) -> &RouteStateConfig {
        &self.config
    }

    fn select_distinct<T, F>(&self, projector: F) -> Observable<T>
    where
        T: Clone + PartialEq + Send + 'static,
        F: Fn(&RouteStateData) -> T + Send + Sync + 'static,
    {
        let selected = self.select(projector);
        if self.config.distinct {
            selected.distinct_until_changed()
        } else {
            selected
        }
    }

    fn try_select_distinct<T, F>(&self, projector: F) -> Observable<T>
    where
        T: Clone + PartialEq + Send + 'static,
        F: Fn(&RouteStateData) -> crate::Result<T> + Send + Sync + 'static,
    {
        let selected = self
            .select_state()
            .try_map(move |state: &Arc<RouteStateData>| projector(state));
        if self.config.distinct {
            selected.distinct_until_changed()
        } else {
            selected
        }
    }
}

impl Drop for RouteState {
    fn drop(&mut self) {
        self.destroy();
    }
}

/// Subscribe to the router's `NavigationEnd` events and mirror each completed
/// navigation into `store`.
///
/// The listener holds only weak references: the router owns the listener, so
/// a strong reference back to the router would keep both alive forever.
fn handle_navigation_end<R>(router: &Arc<R>, store: &Arc<Store<RouteStateData>>) -> Subscription
where
    R: Router + ?Sized + 'static,
{
    let router_ref = Arc::downgrade(router);
    let store_ref = Arc::downgrade(store);

    router
        .events()
        .filter(RouterEvent::is_navigation_end)
        .subscribe(move |notification: Notification<'_, RouterEvent>| {
            let Some(store) = store_ref.upgrade() else {
                return;
            };
            match notification {
                Notification::Next(event) => {
                    let Some(router) = router_ref.upgrade() else {
                        return;
                    };
                    apply_navigation(&*router, &store, event);
                }
                Notification::Error(err) => {
                    warn!(store = %store.name(), error = %err, "router event stream failed");
                    store.fail(err.clone());
                }
                Notification::Complete => {
                    debug!(store = %store.name(), "router event stream completed");
                }
            }
        })
}

fn apply_navigation<R>(router: &R, store: &Store<RouteStateData>, event: &RouterEvent)
where
    R: Router + ?Sized,
{
    let active = router.active_route();
    let state = RouteStateData::from_snapshot(&active.root, active.url.clone());
    debug!(
        store = %store.name(),
        navigation_id = event.id(),
        url = %state.url,
        params = state.params.len(),
        data_keys = state.data.len(),
        "navigation end: route state updated"
    );
    if let Err(err) = store.update(state) {
        warn!(navigation_id = event.id(), error = %err, "navigation end ignored");
    }
}
