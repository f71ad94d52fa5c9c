//! Cache key derivation.
//!
//! A [`CacheKey`] is a pure function of a logical resource and a flat
//! parameter set. [`Params`] keeps its entries sorted, so two parameter sets
//! with the same pairs produce the same key no matter the insertion order.
//! Pairs are form-urlencoded, which keeps the rendering injective: a value
//! containing `&` or `=` can never collide with a second parameter.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

use crate::{LyceumError, Result};

/// Flat query parameters for a read request.
///
/// ```rust
/// # use lyceum::cache::Params;
/// let a = Params::new().with("page", 2).with("category", "devops");
/// let b = Params::new().with("category", "devops").with("page", 2);
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Params(BTreeMap<String, String>);

impl Params {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a parameter.
    pub fn with(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.insert(name, value);
        self
    }

    /// Add (or replace) a parameter in place.
    pub fn insert(&mut self, name: impl Into<String>, value: impl ToString) {
        self.0.insert(name.into(), value.to_string());
    }

    /// Build from a flat JSON object.
    ///
    /// Strings are taken verbatim, numbers and booleans use their JSON text,
    /// and `null` values are skipped. Nested arrays or objects are rejected.
    pub fn from_json(value: &Value) -> Result<Self> {
        let object = match value {
            Value::Null => return Ok(Self::new()),
            Value::Object(object) => object,
            other => {
                return Err(LyceumError::InvalidInput(format!(
                    "query parameters must be a JSON object, got {other}"
                )));
            }
        };

        let mut params = Self::new();
        for (name, value) in object {
            match value {
                Value::Null => {}
                Value::String(s) => params.insert(name.as_str(), s),
                Value::Bool(_) | Value::Number(_) => params.insert(name.as_str(), value),
                Value::Array(_) | Value::Object(_) => {
                    return Err(LyceumError::InvalidInput(format!(
                        "query parameter '{name}' must be a scalar"
                    )));
                }
            }
        }
        Ok(params)
    }

    /// Look up a parameter value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate pairs in sorted name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Canonical `application/x-www-form-urlencoded` rendering.
    pub fn to_query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.iter())
            .finish()
    }
}

/// Deterministic identifier for one cached read.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    resource: String,
    query: String,
}

impl CacheKey {
    /// Derive the key for `resource` read with `params`.
    pub fn new(resource: impl Into<String>, params: &Params) -> Self {
        Self {
            resource: normalize_resource(resource.into()),
            query: params.to_query_string(),
        }
    }

    /// Key for a parameterless read of `resource`.
    pub fn resource(resource: impl Into<String>) -> Self {
        Self::new(resource, &Params::new())
    }

    /// The logical resource path (without leading or trailing `/`).
    pub fn resource_path(&self) -> &str {
        &self.resource
    }

    /// The canonical query string (empty when there are no parameters).
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Top-level collection this key belongs to (`blogs` for `blogs/intro`).
    pub fn collection(&self) -> &str {
        self.resource.split('/').next().unwrap_or_default()
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.query.is_empty() {
            f.write_str(&self.resource)
        } else {
            write!(f, "{}?{}", self.resource, self.query)
        }
    }
}

impl From<&str> for CacheKey {
    fn from(resource: &str) -> Self {
        CacheKey::resource(resource)
    }
}

fn normalize_resource(resource: String) -> String {
    let trimmed = resource.trim_matches('/');
    if trimmed.len() == resource.len() {
        resource
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn key_ignores_parameter_order() {
        let k1 = CacheKey::new("courses", &Params::new().with("a", 1).with("b", 2));
        let k2 = CacheKey::new("courses", &Params::new().with("b", 2).with("a", 1));
        assert_eq!(k1, k2);
        assert_eq!(k1.to_string(), k2.to_string());
    }

    #[test]
    fn key_differs_on_value() {
        let k1 = CacheKey::new("courses", &Params::new().with("a", 1));
        let k2 = CacheKey::new("courses", &Params::new().with("a", 2));
        assert_ne!(k1, k2);
    }

    #[test]
    fn key_differs_on_resource() {
        let k1 = CacheKey::new("courses", &Params::new().with("a", 1));
        let k2 = CacheKey::new("placements", &Params::new().with("a", 1));
        assert_ne!(k1, k2);
    }

    #[test]
    fn encoded_separators_do_not_collide() {
        let k1 = CacheKey::new("blogs", &Params::new().with("a", "1&b=2"));
        let k2 = CacheKey::new("blogs", &Params::new().with("a", 1).with("b", 2));
        assert_ne!(k1, k2);
    }

    #[test]
    fn display_renders_query() {
        let key = CacheKey::new("blogs", &Params::new().with("page", 2).with("category", "web dev"));
        assert_eq!(key.to_string(), "blogs?category=web+dev&page=2");
        assert_eq!(CacheKey::resource("navbar").to_string(), "navbar");
    }

    #[test]
    fn slashes_are_trimmed() {
        assert_eq!(CacheKey::resource("/courses/"), CacheKey::resource("courses"));
    }

    #[test]
    fn collection_is_first_segment() {
        assert_eq!(CacheKey::resource("blogs/intro-to-rust").collection(), "blogs");
        assert_eq!(CacheKey::resource("home").collection(), "home");
    }

    #[test]
    fn from_json_flat_object() {
        let params = Params::from_json(&json!({"page": 3, "featured": true, "q": "rust", "skip": null}))
            .unwrap();
        assert_eq!(params.get("page"), Some("3"));
        assert_eq!(params.get("featured"), Some("true"));
        assert_eq!(params.get("q"), Some("rust"));
        assert_eq!(params.get("skip"), None);
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn from_json_matches_builder() {
        let from_json = Params::from_json(&json!({"b": 2, "a": 1})).unwrap();
        let built = Params::new().with("a", 1).with("b", 2);
        assert_eq!(CacheKey::new("x", &from_json), CacheKey::new("x", &built));
    }

    #[test]
    fn from_json_rejects_nested_values() {
        assert!(Params::from_json(&json!({"filter": {"a": 1}})).is_err());
        assert!(Params::from_json(&json!({"ids": [1, 2]})).is_err());
        assert!(Params::from_json(&json!([1, 2])).is_err());
    }

    #[test]
    fn from_json_null_is_empty() {
        assert!(Params::from_json(&Value::Null).unwrap().is_empty());
    }
}
