//! Memoizes compiled selectors by their source text.

use crate::config::CacheConfig;
use crate::error::Result;
use crate::selector::Selector;
use log::{trace, warn};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock, RwLock};

static GLOBAL: OnceLock<SelectorCache> = OnceLock::new();

/// A map from expression text to its compiled [`Selector`].
///
/// Lookups take a read lock and misses compile outside any lock before
/// inserting, so concurrent misses on the same text may compile twice and the
/// last insert wins. Failed compilations are never stored.
#[derive(Debug)]
pub struct SelectorCache {
    disabled: AtomicBool,
    selectors: RwLock<HashMap<String, Arc<Selector>>>,
    compilations: AtomicUsize,
}

impl Default for SelectorCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

impl SelectorCache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            disabled: AtomicBool::new(!config.enabled),
            selectors: RwLock::new(HashMap::with_capacity(config.initial_capacity)),
            compilations: AtomicUsize::new(0),
        }
    }

    /// The process-wide cache, created from [`CacheConfig::from_env`] on first use.
    pub fn global() -> &'static SelectorCache {
        GLOBAL.get_or_init(|| SelectorCache::new(CacheConfig::from_env()))
    }

    /// Returns the compiled form of `expr`, compiling and storing it on a miss.
    pub fn get(&self, expr: &str) -> Result<Arc<Selector>> {
        if self.is_disabled() {
            return self.compile(expr).map(Arc::new);
        }

        match self.selectors.read() {
            Ok(selectors) => {
                if let Some(selector) = selectors.get(expr) {
                    trace!("Selector cache hit for '{}'", expr);
                    return Ok(Arc::clone(selector));
                }
            }
            Err(_) => {
                warn!("Selector cache lock poisoned, compiling '{}' without caching", expr);
                return self.compile(expr).map(Arc::new);
            }
        }

        trace!("Selector cache miss for '{}'", expr);
        let selector = Arc::new(self.compile(expr)?);
        match self.selectors.write() {
            Ok(mut selectors) => {
                selectors.insert(expr.to_string(), Arc::clone(&selector));
            }
            Err(_) => warn!("Selector cache lock poisoned, '{}' was not stored", expr),
        }
        Ok(selector)
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled.load(Ordering::Relaxed)
    }

    /// Turns caching off or back on. Stored selectors are kept either way.
    pub fn set_disabled(&self, disabled: bool) {
        self.disabled.store(disabled, Ordering::Relaxed);
    }

    /// The number of stored selectors.
    pub fn len(&self) -> usize {
        self.selectors.read().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Ok(mut selectors) = self.selectors.write() {
            selectors.clear();
        }
    }

    /// How many times this cache has run the compiler.
    pub fn compilations(&self) -> usize {
        self.compilations.load(Ordering::Relaxed)
    }

    fn compile(&self, expr: &str) -> Result<Selector> {
        self.compilations.fetch_add(1, Ordering::Relaxed);
        Selector::compile(expr)
    }
}

/// Disables or re-enables the process-wide selector cache.
pub fn set_disable_selector_cache(disabled: bool) {
    SelectorCache::global().set_disabled(disabled);
}

pub fn selector_cache_disabled() -> bool {
    SelectorCache::global().is_disabled()
}
