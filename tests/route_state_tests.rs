use route_state::observable::Listener;
use route_state::router::{ActiveRoute, MemoryRouter, Router, RouterEvent};
use route_state::snapshot::RouteSnapshot;
use route_state::{Notification, Observable, RouteState, RouteStateError, Subscription};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing_util::TestTracing;

/// Router wrapper that counts how often a subscription to its event stream is
/// torn down.
struct CountingRouter {
    inner: MemoryRouter,
    teardowns: Arc<AtomicUsize>,
}

impl CountingRouter {
    fn new() -> Self {
        Self {
            inner: MemoryRouter::new(),
            teardowns: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn teardowns(&self) -> usize {
        self.teardowns.load(Ordering::SeqCst)
    }
}

impl Router for CountingRouter {
    fn events(&self) -> Observable<RouterEvent> {
        let inner = self.inner.events();
        let teardowns = Arc::clone(&self.teardowns);
        Observable::new(move |listener: Listener<RouterEvent>| {
            let upstream = inner.subscribe(listener);
            let teardowns = Arc::clone(&teardowns);
            Subscription::new(move || {
                drop(upstream);
                teardowns.fetch_add(1, Ordering::SeqCst);
            })
        })
    }

    fn active_route(&self) -> Arc<ActiveRoute> {
        self.inner.active_route()
    }
}

/// Router wrapper that stalls inside every read of the committed route, widening
/// the window in which another thread can commit a navigation.
struct SlowRouter {
    inner: MemoryRouter,
}

impl Router for SlowRouter {
    fn events(&self) -> Observable<RouterEvent> {
        self.inner.events()
    }

    fn active_route(&self) -> Arc<ActiveRoute> {
        let active = self.inner.active_route();
        std::thread::sleep(Duration::from_micros(50));
        active
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Seen<T> {
    Next(T),
    Error(RouteStateError),
    Complete,
}

fn record<T: Clone + Send + std::fmt::Debug + 'static>(stream: &Observable<T>) -> (Arc<Mutex<Vec<Seen<T>>>>, Subscription) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let sub = stream.subscribe(move |n: Notification<'_, T>| {
        let mut seen = sink.lock().unwrap();
        assert!(
            !matches!(seen.last(), Some(Seen::Error(_) | Seen::Complete)),
            "notification after terminal: {n:?}"
        );
        seen.push(match (n.value(), n) {
            (Some(v), _) => Seen::Next(v.clone()),
            (None, Notification::Error(e)) => Seen::Error(e.clone()),
            (None, _) => Seen::Complete,
        });
    });
    (seen, sub)
}

fn admin_tree() -> RouteSnapshot {
    RouteSnapshot::new("")
        .with_data("section", "admin")
        .with_param("org", "acme")
        .with_child(
            RouteSnapshot::new("users/:id")
                .with_data("section", "users")
                .with_data("title", "User")
                .with_param("id", "42")
                .with_child(RouteSnapshot::new("edit").with_param("id", "43")),
        )
}

#[test]
fn test_selectors_silent_before_first_navigation() {
    let router = Arc::new(MemoryRouter::new());
    let state = RouteState::new(Arc::clone(&router));
    let (states, _a) = record(&state.select_state());
    let (urls, _b) = record(&state.select_url());
    let (data, _c) = record(&state.select_data());

    router.cancel("/login", "guard rejected");

    assert!(states.lock().unwrap().is_empty());
    assert!(urls.lock().unwrap().is_empty());
    assert!(data.lock().unwrap().is_empty());
}

#[test]
fn test_exactly_one_state_emission_per_navigation() {
    let router = Arc::new(MemoryRouter::new());
    let state = RouteState::new(Arc::clone(&router));
    let (states, _sub) = record(&state.select_state());

    router.navigate("/admin/users/42/edit", admin_tree()).unwrap();
    assert_eq!(states.lock().unwrap().len(), 1);

    router.navigate("/admin/users/42/edit?x=1", admin_tree()).unwrap();
    assert_eq!(states.lock().unwrap().len(), 2);
}

#[test]
fn test_merge_prefers_deepest_route() {
    let router = Arc::new(MemoryRouter::new());
    let state = RouteState::new(Arc::clone(&router));

    router.navigate("/admin/users/42/edit?tab=a&tab=b", admin_tree()).unwrap();

    let value = state.get_value();
    assert_eq!(value.data["section"], json!("users"));
    assert_eq!(value.data["title"], json!("User"));
    assert_eq!(value.param_map.get("id"), Some("43"));
    assert_eq!(value.param_map.get("org"), Some("acme"));
    assert_eq!(value.query_param_map.get_all("tab"), vec!["a", "b"]);
    assert_eq!(value.query_param_map.get("tab"), Some("a"));
}

#[test]
fn test_record_fields_are_consistent() {
    let router = Arc::new(MemoryRouter::new());
    let state = RouteState::new(Arc::clone(&router));
    let (states, _sub) = record(&state.select_state());

    router.navigate("/admin/users/42/edit?q=rust", admin_tree()).unwrap();

    let states = states.lock().unwrap();
    let Seen::Next(record) = &states[0] else {
        panic!("expected a record, got {:?}", states[0]);
    };
    assert_eq!(record.params, *record.param_map.params());
    assert_eq!(record.query_params, *record.query_param_map.params());
    assert_eq!(record.url, "/admin/users/42/edit?q=rust");
}

#[test]
fn test_only_first_child_is_merged() {
    let router = Arc::new(MemoryRouter::new());
    let state = RouteState::new(Arc::clone(&router));
    let tree = RouteSnapshot::new("")
        .with_child(RouteSnapshot::new("main").with_param("id", "primary"))
        .with_child(RouteSnapshot::new("aux").with_param("panel", "chat"));

    router.navigate("/main(aux:chat)", tree).unwrap();

    let value = state.get_value();
    assert_eq!(value.param_map.get("id"), Some("primary"));
    assert!(!value.param_map.has("panel"));
}

#[test]
fn test_query_params_come_from_root_only() {
    let router = Arc::new(MemoryRouter::new());
    let state = RouteState::new(Arc::clone(&router));
    let tree = RouteSnapshot::new("")
        .with_child(RouteSnapshot::new("search").with_query_param("leaf", "ignored"));

    router.navigate("/search?q=books", tree).unwrap();

    let value = state.get_value();
    assert_eq!(value.query_param_map.get("q"), Some("books"));
    assert!(!value.query_param_map.has("leaf"));
}

#[test]
fn test_destroy_unsubscribes_from_router_once() {
    let router = Arc::new(CountingRouter::new());
    let state = RouteState::new(Arc::clone(&router));
    assert_eq!(router.teardowns(), 0);

    state.destroy();
    state.destroy();
    assert_eq!(router.teardowns(), 1);

    drop(state);
    assert_eq!(router.teardowns(), 1);
}

#[test]
fn test_no_emissions_after_destroy() {
    let router = Arc::new(MemoryRouter::new());
    let state = RouteState::new(Arc::clone(&router));
    let (urls, _sub) = record(&state.select_url());

    router.navigate("/a", RouteSnapshot::default()).unwrap();
    state.destroy();
    router.navigate("/b", RouteSnapshot::default()).unwrap();

    assert_eq!(
        *urls.lock().unwrap(),
        vec![Seen::Next("/a".to_string()), Seen::Complete]
    );
    assert_eq!(state.get_value().url, "/a");
    assert_eq!(router.observer_count(), 0);
}

#[test]
fn test_subscribing_after_destroy_only_completes() {
    let router = Arc::new(MemoryRouter::new());
    let state = RouteState::new(Arc::clone(&router));
    router.navigate("/a", RouteSnapshot::default()).unwrap();
    state.destroy();

    let (params, sub) = record(&state.select_param("id"));
    assert_eq!(*params.lock().unwrap(), vec![Seen::Complete]);
    assert!(sub.is_closed());
    assert!(state.is_destroyed());
}

#[test]
fn test_router_completion_keeps_last_record() {
    let router = Arc::new(MemoryRouter::new());
    let state = RouteState::new(Arc::clone(&router));
    router.navigate("/kept", RouteSnapshot::default()).unwrap();

    router.complete();

    assert!(!state.is_destroyed());
    assert_eq!(state.get_value().url, "/kept");
}

#[test]
fn test_subscriptions_are_independent() {
    let router = Arc::new(MemoryRouter::new());
    let state = RouteState::new(Arc::clone(&router));
    let (first, first_sub) = record(&state.select_url());
    let (second, _second_sub) = record(&state.select_url());

    router.navigate("/one", RouteSnapshot::default()).unwrap();
    drop(first_sub);
    router.navigate("/two", RouteSnapshot::default()).unwrap();

    assert_eq!(*first.lock().unwrap(), vec![Seen::Next("/one".to_string())]);
    assert_eq!(
        *second.lock().unwrap(),
        vec![Seen::Next("/one".to_string()), Seen::Next("/two".to_string())]
    );
}

/// Run `workers` threads of `per_worker` navigations each against `router`
/// and return every record `select_state` emitted.
fn navigate_concurrently<R>(
    router: Arc<R>,
    navigate: fn(&R, &str, RouteSnapshot),
    workers: usize,
    per_worker: usize,
) -> Vec<Seen<Arc<route_state::RouteStateData>>>
where
    R: Router + 'static,
{
    let state = RouteState::new(Arc::clone(&router));
    let (states, _sub) = record(&state.select_state());

    let handles: Vec<_> = (0..workers)
        .map(|worker| {
            let router = Arc::clone(&router);
            std::thread::spawn(move || {
                for n in 0..per_worker {
                    let id = format!("{worker}-{n}");
                    let tree = RouteSnapshot::new("")
                        .with_child(RouteSnapshot::new("items/:id").with_param("id", id.as_str()));
                    navigate(&router, &format!("/items/{id}"), tree);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let seen = states.lock().unwrap().clone();
    seen
}

fn assert_records_whole(seen: &[Seen<Arc<route_state::RouteStateData>>], expected: usize) {
    assert_eq!(seen.len(), expected);
    for entry in seen {
        let Seen::Next(record) = entry else {
            panic!("unexpected notification {entry:?}");
        };
        let id = record.param_map.get("id").unwrap_or_default();
        assert_eq!(record.url, format!("/items/{id}"), "url and params from different navigations");
    }
}

#[test]
fn test_navigations_from_many_threads_keep_records_whole() {
    let router = Arc::new(MemoryRouter::new());
    let seen = navigate_concurrently(
        router,
        |router, url, tree| {
            router.navigate(url, tree).unwrap();
        },
        4,
        50,
    );
    assert_records_whole(&seen, 200);
}

#[test]
fn test_slow_router_reads_never_tear_records() {
    let router = Arc::new(SlowRouter {
        inner: MemoryRouter::new(),
    });
    let seen = navigate_concurrently(
        router,
        |router, url, tree| {
            router.inner.navigate(url, tree).unwrap();
        },
        4,
        100,
    );
    assert_records_whole(&seen, 400);
}

#[test]
fn test_dropping_route_state_completes_selectors() {
    let router = Arc::new(MemoryRouter::new());
    let state = RouteState::new(Arc::clone(&router));
    let (urls, _sub) = record(&state.select_url());

    router.navigate("/a", RouteSnapshot::default()).unwrap();
    drop(state);
    router.navigate("/b", RouteSnapshot::default()).unwrap();

    assert_eq!(
        *urls.lock().unwrap(),
        vec![Seen::Next("/a".to_string()), Seen::Complete]
    );
    assert_eq!(router.observer_count(), 0);
}

#[test]
fn test_navigation_is_logged() {
    let tracing = TestTracing::init();
    let router = Arc::new(MemoryRouter::new());
    let state = RouteState::new(Arc::clone(&router));

    router.navigate("/logged", RouteSnapshot::default()).unwrap();
    state.destroy();

    assert!(tracing.contains("navigation end: route state updated"));
    assert!(tracing.contains("/logged"));
    assert!(tracing.contains("route state destroyed"));
}

#[test]
fn test_router_failure_is_logged_as_warning() {
    let tracing = TestTracing::init();
    let router = Arc::new(MemoryRouter::new());
    let _state = RouteState::new(Arc::clone(&router));

    router.fail("history lost");

    let output = tracing.output();
    let failures: Vec<&str> = output
        .lines()
        .filter(|line| line.contains("router event stream failed"))
        .collect();
    assert_eq!(failures.len(), 2, "{output}");
    assert!(failures.iter().all(|line| line.contains("WARN")), "{output}");
}
