use crate::{Error, Result, TtlMs};
use tracing::warn;

/// Tuning knobs for the read-through cache.
#[derive(Clone, Debug)]
pub struct CacheConfig {
    /// Maximum age of an entry before a read triggers a refetch.
    pub ttl: TtlMs,
    /// Records requested from the source when the caller gives no limit.
    pub default_limit: usize,
    /// Field the source orders by (descending) for deterministic pagination.
    pub order_field: String,
}

impl CacheConfig {
    const DEFAULT_TTL_MS: u64 = 60_000;
    const DEFAULT_LIMIT: usize = 100;
    const DEFAULT_ORDER_FIELD: &str = "id";

    pub fn new(ttl: TtlMs, default_limit: usize, order_field: impl Into<String>) -> Result<Self> {
        let order_field = order_field.into();
        if ttl.0 == 0 {
            return Err(Error::InvalidConfig("ttl must be greater than zero".to_string()));
        }
        if default_limit == 0 {
            return Err(Error::InvalidConfig(
                "default_limit must be greater than zero".to_string(),
            ));
        }
        if order_field.is_empty() {
            return Err(Error::InvalidConfig("order_field must not be empty".to_string()));
        }
        Ok(Self {
            ttl,
            default_limit,
            order_field,
        })
    }

    /// Read configuration from the environment, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        let ttl_ms = read_env("CATALOG_CACHE_TTL_MS", Self::DEFAULT_TTL_MS);
        let default_limit = read_env("CATALOG_CACHE_DEFAULT_LIMIT", Self::DEFAULT_LIMIT);
        let order_field = std::env::var("CATALOG_CACHE_ORDER_FIELD")
            .unwrap_or_else(|_| Self::DEFAULT_ORDER_FIELD.to_string());
        Self::new(TtlMs(ttl_ms), default_limit, order_field)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: TtlMs(Self::DEFAULT_TTL_MS),
            default_limit: Self::DEFAULT_LIMIT,
            order_field: Self::DEFAULT_ORDER_FIELD.to_string(),
        }
    }
}

fn read_env<T: std::str::FromStr + Copy + std::fmt::Display>(var: &str, default: T) -> T {
    match std::env::var(var) {
        Ok(raw) => raw.parse::<T>().unwrap_or_else(|_| {
            warn!("{var} is set to {raw:?} which does not parse, using {default}");
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = CacheConfig::default();
        assert_eq!(config.ttl, TtlMs(60_000));
        assert_eq!(config.default_limit, 100);
        assert_eq!(config.order_field, "id");
    }

    #[test]
    fn zero_ttl_is_rejected_at_construction() {
        let result = CacheConfig::new(TtlMs(0), 100, "id");
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn zero_limit_is_rejected_at_construction() {
        let result = CacheConfig::new(TtlMs(1000), 0, "id");
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn empty_order_field_is_rejected() {
        let result = CacheConfig::new(TtlMs(1000), 100, "");
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }
}
