//! # route-state
//!
//! **route-state** is a reactive cache of a client-side router's current
//! navigation state. It listens for completed navigations, flattens the active
//! route-snapshot tree into one merged record, and publishes that record as
//! observable streams for route data, query parameters, path parameters and the
//! current URL.
//!
//! ## Overview
//!
//! The library is organized into a few small modules:
//!
//! - **[`route_state`]** - [`RouteState`], the adapter and its selectors
//! - **[`router`]** - the [`Router`](router::Router) contract, navigation events and
//!   [`MemoryRouter`](router::MemoryRouter)
//! - **[`snapshot`]** - route-snapshot trees and the active-path merge
//! - **[`params`]** - parameter values and the [`ParamMap`](params::ParamMap) lookup view
//! - **[`store`]** - the single-value observable store backing `RouteState`
//! - **[`observable`]** - publish/subscribe primitives
//! - **[`config`]** / **[`logging`]** - environment-driven configuration and
//!   `tracing` setup
//!
//! ### Navigation Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Host as Host application
//!     participant Router
//!     participant RS as RouteState
//!     participant Store
//!     participant UI as Subscribers
//!
//!     Host->>RS: RouteState::new(router)
//!     RS->>Router: events().filter(NavigationEnd).subscribe
//!     UI->>RS: select_param("id") / select_url() / ...
//!     Note over UI: silent: no navigation yet
//!
//!     Host->>Router: navigate("/users/42")
//!     Router-->>RS: NavigationStart, RoutesRecognized (ignored)
//!     Router-->>RS: NavigationEnd
//!     RS->>Router: active_route()
//!     RS->>RS: merge data + params along first_child chain
//!     RS->>Store: update(RouteStateData)
//!     Store-->>UI: Some("42"), "/users/42", ...
//!
//!     Host->>RS: destroy()
//!     RS->>Store: destroy (subscribers complete)
//!     RS->>Router: unsubscribe
//! ```
//!
//! ### Key Properties
//!
//! 1. **Atomic records**: all six fields of [`RouteStateData`] are replaced
//!    together, once per completed navigation
//! 2. **Leaf wins**: on the active path, a child's `data`/`params` key overrides
//!    its ancestors'
//! 3. **No premature emissions**: selectors stay silent until the first
//!    navigation completes
//! 4. **No ambient singleton**: the host constructs one `RouteState` and shares it
//!
//! ## Quick Start
//!
//! ```rust
//! use route_state::router::MemoryRouter;
//! use route_state::snapshot::RouteSnapshot;
//! use route_state::RouteState;
//! use std::sync::{Arc, Mutex};
//!
//! let router = Arc::new(MemoryRouter::new());
//! let route_state = Arc::new(RouteState::new(Arc::clone(&router)));
//!
//! let ids = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&ids);
//! let _sub = route_state
//!     .select_param("id")
//!     .subscribe_next(move |id| sink.lock().unwrap().push(id.clone()));
//!
//! let tree = RouteSnapshot::new("")
//!     .with_data("section", "admin")
//!     .with_child(RouteSnapshot::new("users/:id").with_param("id", "42"));
//! router.navigate("/users/42", tree).unwrap();
//!
//! assert_eq!(*ids.lock().unwrap(), vec![Some("42".to_string())]);
//! assert_eq!(route_state.get_value().url, "/users/42");
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod observable;
pub mod params;
pub mod route_state;
pub mod router;
pub mod snapshot;
mod state;
pub mod store;

pub use config::RouteStateConfig;
pub use error::{Result, RouteStateError};
pub use observable::{Notification, Observable, Subject, Subscription};
pub use params::{ParamMap, ParamValue, Params};
pub use route_state::RouteState;
pub use router::{ActiveRoute, MemoryRouter, Router, RouterEvent};
pub use snapshot::{Data, RouteSnapshot};
pub use state::RouteStateData;
