//! # Route Snapshot Module
//!
//! A [`RouteSnapshot`] is one node of the tree the router produces after it
//! resolves a URL: each node matches one route segment and carries that
//! segment's resolved `data` and path `params`. Query parameters are global to
//! the navigation and live on the root.
//!
//! ## Active-path merge
//!
//! [`collect_data_and_params`] flattens the tree into a single record by
//! walking from the root down the primary child chain:
//!
//! ```text
//! root            data {section: "admin"}   params {}
//!  └─ users/:id   data {title: "User"}      params {id: "42"}
//!      └─ edit    data {title: "Edit"}      params {}
//!
//! merged          data {section: "admin", title: "Edit"}   params {id: "42"}
//! ```
//!
//! Keys closer to the leaf win. Only [`RouteSnapshot::first_child`] is
//! followed; sibling branches (secondary outlets) never contribute.

use crate::params::{ParamValue, Params};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Arbitrary per-route data, keyed by name.
pub type Data = Map<String, Value>;

/// One matched route segment in the router's state tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteSnapshot {
    /// Route-config path for this segment (e.g. `users/:id`), informational
    pub path: String,
    /// Static and resolved data attached to this segment
    pub data: Data,
    /// Path parameters matched by this segment
    pub params: Params,
    /// Query parameters; only read from the root
    pub query_params: Params,
    /// Child segments; the first one is the primary outlet
    pub children: Vec<RouteSnapshot>,
}

impl RouteSnapshot {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_query_param(
        mut self,
        name: impl Into<String>,
        value: impl Into<ParamValue>,
    ) -> Self {
        self.query_params.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: RouteSnapshot) -> Self {
        self.children.push(child);
        self
    }

    /// The primary child, if any.
    #[inline]
    #[must_use]
    pub fn first_child(&self) -> Option<&RouteSnapshot> {
        self.children.first()
    }

    /// Iterate root → leaf along the primary child chain, starting with `self`.
    pub fn active_path(&self) -> ActivePath<'_> {
        ActivePath { next: Some(self) }
    }

    /// The deepest node on the primary chain.
    #[must_use]
    pub fn leaf(&self) -> &RouteSnapshot {
        let mut node = self;
        while let Some(child) = node.first_child() {
            node = child;
        }
        node
    }
}

/// Iterator returned by [`RouteSnapshot::active_path`].
#[derive(Debug, Clone)]
pub struct ActivePath<'a> {
    next: Option<&'a RouteSnapshot>,
}

impl<'a> Iterator for ActivePath<'a> {
    type Item = &'a RouteSnapshot;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.next?;
        self.next = node.first_child();
        Some(node)
    }
}

/// Merge `data` and `params` along the active path, leaf values overriding
/// ancestor values for the same key.
#[must_use]
pub fn collect_data_and_params(root: &RouteSnapshot) -> (Data, Params) {
    let mut data = Data::new();
    let mut params = Params::new();
    for node in root.active_path() {
        data.extend(node.data.iter().map(|(k, v)| (k.clone(), v.clone())));
        params.extend(node.params.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    (data, params)
}
