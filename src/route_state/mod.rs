//! # Route State Module
//!
//! [`RouteState`] keeps the latest flattened snapshot of the active route and
//! exposes it as observable streams.
//!
//! ## Data flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Router
//!     participant RouteState
//!     participant Store as Store<RouteStateData>
//!     participant Consumer
//!
//!     Consumer->>RouteState: select_param("id")
//!     RouteState-->>Consumer: Observable (silent until first navigation)
//!     Router->>RouteState: NavigationEnd
//!     RouteState->>Router: active_route()
//!     RouteState->>RouteState: merge data/params root → leaf
//!     RouteState->>Store: update(RouteStateData)
//!     Store-->>Consumer: Some("42")
//! ```
//!
//! ## Lifecycle
//!
//! There are two states: before the first completed navigation, where the
//! store holds an empty record and selectors stay silent, and after it, where
//! every completed navigation replaces the record and selectors emit.
//! [`RouteState::destroy`] (or dropping the `RouteState`) detaches it from the
//! router and completes every selector stream.
//!
//! ## Example
//!
//! ```rust
//! use route_state::router::MemoryRouter;
//! use route_state::snapshot::RouteSnapshot;
//! use route_state::RouteState;
//! use std::sync::{Arc, Mutex};
//!
//! let router = Arc::new(MemoryRouter::new());
//! let route_state = RouteState::new(Arc::clone(&router));
//!
//! let pages = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&pages);
//! let _sub = route_state
//!     .select_query_param_as("page", |v| v.and_then(|s| s.parse::<u32>().ok()).unwrap_or(1))
//!     .subscribe_next(move |page| sink.lock().unwrap().push(*page));
//!
//! let tree = RouteSnapshot::new("").with_child(RouteSnapshot::new("posts"));
//! router.navigate("/posts?page=3", tree.clone()).unwrap();
//! router.navigate("/posts", tree).unwrap();
//!
//! assert_eq!(*pages.lock().unwrap(), vec![3, 1]);
//! ```

mod core;

pub use core::RouteState;
