//! # Router Module
//!
//! The router is the external collaborator [`RouteState`](crate::RouteState)
//! listens to. This module defines the contract it must satisfy and ships
//! [`MemoryRouter`], an in-process implementation for hosts that drive
//! navigation themselves and for tests.
//!
//! ## Contract
//!
//! A [`Router`] must provide:
//!
//! - a stream of [`RouterEvent`]s, with exactly one `NavigationEnd` per
//!   completed navigation, delivered in navigation order
//! - the committed [`ActiveRoute`]: the current URL and the root of the active
//!   route-snapshot tree, read together
//!
//! When `NavigationEnd` is emitted, `active_route()` must already reflect the
//! completed navigation. URL and tree are handed over as one value so a reader
//! never pairs one navigation's URL with another navigation's tree.
//!
//! ## Example
//!
//! ```rust
//! use route_state::router::{MemoryRouter, Router};
//! use route_state::snapshot::RouteSnapshot;
//!
//! let router = MemoryRouter::new();
//! let tree = RouteSnapshot::new("")
//!     .with_child(RouteSnapshot::new("users/:id").with_param("id", "42"));
//!
//! router.navigate("/users/42?tab=posts", tree).unwrap();
//! assert_eq!(router.url(), "/users/42?tab=posts");
//! assert_eq!(router.root_snapshot().leaf().path, "users/:id");
//! ```

mod events;
mod memory;

pub use events::RouterEvent;
pub use memory::MemoryRouter;

use crate::observable::Observable;
use crate::snapshot::RouteSnapshot;
use std::sync::Arc;

/// URL and route tree committed by one navigation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActiveRoute {
    /// The URL after redirects
    pub url: String,
    /// Root of the active route-snapshot tree
    pub root: Arc<RouteSnapshot>,
}

/// Source of navigation events and the active route tree.
pub trait Router: Send + Sync {
    /// Navigation lifecycle events.
    fn events(&self) -> Observable<RouterEvent>;

    /// The last committed navigation, URL and tree in one read.
    fn active_route(&self) -> Arc<ActiveRoute>;

    /// Root of the active route-snapshot tree.
    fn root_snapshot(&self) -> Arc<RouteSnapshot> {
        Arc::clone(&self.active_route().root)
    }

    /// The current URL, after redirects.
    fn url(&self) -> String {
        self.active_route().url.clone()
    }
}
