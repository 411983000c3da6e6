use crate::params::{ParamMap, Params};
use crate::snapshot::{collect_data_and_params, Data, RouteSnapshot};
use serde::Serialize;

/// The flattened navigation record published by [`RouteState`](crate::RouteState).
///
/// Replaced as a whole on every completed navigation, so the six fields always
/// describe the same navigation. The default value (empty maps, empty `url`)
/// is what the store holds before the first navigation completes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RouteStateData {
    /// `data` merged along the active path, leaf winning
    pub data: Data,
    /// Lookup view over `query_params`
    pub query_param_map: ParamMap,
    /// Query parameters from the tree root
    pub query_params: Params,
    /// Lookup view over `params`
    pub param_map: ParamMap,
    /// Path parameters merged along the active path, leaf winning
    pub params: Params,
    /// Current router URL
    pub url: String,
}

impl RouteStateData {
    /// Flatten a route-snapshot tree into a record for `url`.
    #[must_use]
    pub fn from_snapshot(root: &RouteSnapshot, url: impl Into<String>) -> Self {
        let query_params = root.query_params.clone();
        let query_param_map = ParamMap::from(query_params.clone());
        let (data, params) = collect_data_and_params(root);
        let param_map = ParamMap::from(params.clone());
        Self {
            data,
            query_param_map,
            query_params,
            param_map,
            params,
            url: url.into(),
        }
    }

    /// `true` once at least one navigation has completed.
    #[inline]
    #[must_use]
    pub fn has_navigated(&self) -> bool {
        !self.url.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_snapshot_builds_consistent_views() {
        let root = RouteSnapshot::new("")
            .with_query_param("page", "2")
            .with_child(
                RouteSnapshot::new("orgs/:org")
                    .with_param("org", "acme")
                    .with_data("title", "Org"),
            );
        let state = RouteStateData::from_snapshot(&root, "/orgs/acme?page=2");

        assert_eq!(state.param_map.get("org"), Some("acme"));
        assert_eq!(state.param_map.params(), &state.params);
        assert_eq!(state.query_param_map.get("page"), Some("2"));
        assert_eq!(state.query_param_map.params(), &state.query_params);
        assert_eq!(state.data["title"], json!("Org"));
        assert!(state.has_navigated());
    }

    #[test]
    fn test_default_has_not_navigated() {
        let state = RouteStateData::default();
        assert!(!state.has_navigated());
        assert!(state.param_map.is_empty());
    }

    #[test]
    fn test_serializes_views_as_plain_maps() {
        let root = RouteSnapshot::new("").with_param("id", "1");
        let json = serde_json::to_value(RouteStateData::from_snapshot(&root, "/1")).unwrap();
        assert_eq!(json["param_map"], json!({ "id": "1" }));
        assert_eq!(json["url"], "/1");
    }
}
