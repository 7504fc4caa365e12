//! Configuration for the selector cache.

/// The environment variable read by [`CacheConfig::from_env`].
pub const CACHE_ENV_VAR: &str = "PROTOQUERY_SELECTOR_CACHE";

/// Configuration for a [`crate::SelectorCache`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Whether compiled selectors are kept. When disabled every lookup recompiles.
    pub enabled: bool,
    /// The number of selectors the cache has room for before it grows.
    /// The cache itself is unbounded.
    pub initial_capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            initial_capacity: 64,
        }
    }
}

impl CacheConfig {
    /// The default configuration, disabled when `PROTOQUERY_SELECTOR_CACHE`
    /// is `off`, `false` or `0`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(value) = std::env::var(CACHE_ENV_VAR) {
            config.enabled = !is_disabling(&value);
        }
        config
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }
}

fn is_disabling(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "off" | "false" | "0")
}
