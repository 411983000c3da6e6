//! # Configuration Module
//!
//! Environment-driven configuration for [`RouteState`](crate::RouteState).
//!
//! ## Environment Variables
//!
//! ### `ROUTE_STATE_STORE_NAME`
//!
//! Name of the backing store, used in log fields and in
//! [`RouteStateError::StoreClosed`](crate::RouteStateError::StoreClosed).
//!
//! Default: `router`
//!
//! ### `ROUTE_STATE_DISTINCT`
//!
//! When `true`, the single-value selectors (`select_url`, `select_param`,
//! `select_query_param` and their `_as` variants) skip a value equal to the one
//! they last emitted, so navigating between two URLs that share a parameter
//! does not re-emit that parameter. `select_state`, `select`, `select_data`,
//! `select_params` and `select_query_param_map` always emit once per
//! navigation.
//!
//! Default: `true`
//!
//! Unparseable values fall back to the defaults.

use std::env;

/// Default store name.
pub const DEFAULT_STORE_NAME: &str = "router";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteStateConfig {
    /// Name of the backing store (default: `router`)
    pub store_name: String,
    /// Suppress consecutive equal values on single-value selectors (default: `true`)
    pub distinct: bool,
}

impl RouteStateConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        let store_name = env::var("ROUTE_STATE_STORE_NAME")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_STORE_NAME.to_string());
        let distinct = env::var("ROUTE_STATE_DISTINCT")
            .ok()
            .and_then(|s| parse_bool(&s))
            .unwrap_or(true);
        Self {
            store_name,
            distinct,
        }
    }
}

impl Default for RouteStateConfig {
    fn default() -> Self {
        Self {
            store_name: DEFAULT_STORE_NAME.to_string(),
            distinct: true,
        }
    }
}

pub(crate) fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
