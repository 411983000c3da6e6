//! Route parameters and the read-only [`ParamMap`] lookup view.
//!
//! Path parameters hold one value per name. Query parameters may repeat
//! (`?tag=a&tag=b`), so every value is a [`ParamValue`] that is either a single
//! string or a short list. Lookups follow the usual web-router convention:
//! [`ParamMap::get`] returns the first value, [`ParamMap::get_all`] returns all
//! of them.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Maximum number of repeated values stored inline before heap allocation.
pub const MAX_INLINE_VALUES: usize = 2;

/// Raw parameter mapping, ordered by name for stable iteration and equality.
pub type Params = BTreeMap<String, ParamValue>;

/// A single parameter value as carried by a route snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// The common case: `?page=3` or `/users/{id}`
    One(String),
    /// Repeated keys, in the order they appeared
    Many(SmallVec<[String; MAX_INLINE_VALUES]>),
}

impl ParamValue {
    /// First value, or `None` for an empty list.
    #[must_use]
    pub fn first(&self) -> Option<&str> {
        match self {
            ParamValue::One(v) => Some(v.as_str()),
            ParamValue::Many(values) => values.first().map(String::as_str),
        }
    }

    /// Every value in order.
    #[must_use]
    pub fn all(&self) -> Vec<&str> {
        match self {
            ParamValue::One(v) => vec![v.as_str()],
            ParamValue::Many(values) => values.iter().map(String::as_str).collect(),
        }
    }

    /// Append another value for the same key, promoting `One` to `Many`.
    pub fn push(&mut self, value: impl Into<String>) {
        match self {
            ParamValue::One(existing) => {
                let mut values = SmallVec::new();
                values.push(std::mem::take(existing));
                values.push(value.into());
                *self = ParamValue::Many(values);
            }
            ParamValue::Many(values) => values.push(value.into()),
        }
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::One(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::One(value.to_string())
    }
}

impl<S: Into<String>> FromIterator<S> for ParamValue {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        ParamValue::Many(iter.into_iter().map(Into::into).collect())
    }
}

/// Build a [`Params`] mapping from `(name, value)` pairs.
///
/// Later pairs replace earlier ones with the same name. Use
/// [`ParamValue::push`] when repeated keys must be kept.
pub fn params<K, V, I>(pairs: I) -> Params
where
    K: Into<String>,
    V: Into<ParamValue>,
    I: IntoIterator<Item = (K, V)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Read-only lookup view over a [`Params`] mapping.
///
/// Cloning is an `Arc` bump; the underlying mapping is never mutated once the
/// view is built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamMap {
    params: Arc<Params>,
}

impl ParamMap {
    /// First value for `name`, if present.
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.params.get(name).and_then(ParamValue::first)
    }

    /// All values for `name`; empty when the key is absent.
    #[must_use]
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.params
            .get(name)
            .map(ParamValue::all)
            .unwrap_or_default()
    }

    #[inline]
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.params.contains_key(name)
    }

    /// Parameter names in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.params.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// The raw mapping behind this view.
    #[must_use]
    pub fn params(&self) -> &Params {
        &self.params
    }
}

impl From<Params> for ParamMap {
    fn from(params: Params) -> Self {
        Self {
            params: Arc::new(params),
        }
    }
}

impl Serialize for ParamMap {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.params.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_returns_first_value() {
        let mut tags = ParamValue::from("a");
        tags.push("b");
        let map = ParamMap::from(params([("tag", tags), ("page", ParamValue::from("3"))]));

        assert_eq!(map.get("tag"), Some("a"));
        assert_eq!(map.get_all("tag"), vec!["a", "b"]);
        assert_eq!(map.get("page"), Some("3"));
        assert_eq!(map.get_all("page"), vec!["3"]);
    }

    #[test]
    fn test_missing_key() {
        let map = ParamMap::default();
        assert_eq!(map.get("id"), None);
        assert!(map.get_all("id").is_empty());
        assert!(!map.has("id"));
        assert!(map.is_empty());
    }

    #[test]
    fn test_keys_are_sorted() {
        let map = ParamMap::from(params([("b", "2"), ("a", "1")]));
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_untagged_serde() {
        let parsed: Params = serde_json::from_value(serde_json::json!({
            "id": "42",
            "tag": ["x", "y"]
        }))
        .unwrap();
        assert_eq!(parsed["id"], ParamValue::from("42"));
        assert_eq!(parsed["tag"], ["x", "y"].into_iter().collect::<ParamValue>());

        let map = ParamMap::from(parsed);
        let out = serde_json::to_value(&map).unwrap();
        assert_eq!(out["tag"], serde_json::json!(["x", "y"]));
    }
}
