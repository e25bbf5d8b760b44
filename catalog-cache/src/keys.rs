//! Cache key derivation.
//!
//! A key is `resource:query_spec:params-json`. Params are serialized in
//! canonical form (object keys sorted recursively) so that logically equal
//! parameter sets always map to the same entry, regardless of the order the
//! caller populated them in.

use crate::domain::QueryParams;
use serde_json::Value;

/// Derive the cache key for one logical query.
pub fn cache_key(resource: &str, query_spec: &str, params: &QueryParams) -> String {
    let params = serde_json::to_value(params).unwrap_or(Value::Null);
    let canonical = serde_json::to_string(&sort_keys(params)).unwrap_or_else(|_| "null".to_string());
    format!("{resource}:{query_spec}:{canonical}")
}

/// The prefix shared by every key of a resource, used for scoped invalidation.
pub fn resource_prefix(resource: &str) -> String {
    format!("{resource}:")
}

fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, sort_keys(value)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn key_carries_resource_spec_and_params() {
        let params = QueryParams::new().with_limit(10);
        assert_eq!(
            cache_key("products", "*", &params),
            "products:*:{\"limit\":10}"
        );
    }

    #[test]
    fn field_insertion_order_does_not_change_the_key() {
        let first = QueryParams::new().with_limit(10).with_field("sort", "asc");
        let second = QueryParams::new().with_field("sort", "asc").with_limit(10);
        assert_eq!(
            cache_key("products", "*", &first),
            cache_key("products", "*", &second)
        );
    }

    #[test]
    fn nested_objects_are_canonicalized_too() {
        let first = QueryParams::new().with_field("filter", json!({"b": 1, "a": 2}));
        let second = QueryParams::new().with_field("filter", json!({"a": 2, "b": 1}));
        assert_eq!(
            cache_key("products", "*", &first),
            cache_key("products", "*", &second)
        );
    }

    #[test]
    fn empty_params_serialize_as_empty_object() {
        assert_eq!(cache_key("banners", "*", &QueryParams::new()), "banners:*:{}");
    }

    #[test]
    fn different_query_specs_get_different_keys() {
        let params = QueryParams::new();
        assert_ne!(
            cache_key("products", "*", &params),
            cache_key("products", "id,name", &params)
        );
    }

    #[test]
    fn resource_prefix_matches_key_start() {
        let key = cache_key("products", "*", &QueryParams::new());
        assert!(key.starts_with(&resource_prefix("products")));
        assert!(!key.starts_with(&resource_prefix("product")));
    }
}
