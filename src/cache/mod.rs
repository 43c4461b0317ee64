//! In-process cache for fetch results
//!
//! Results are kept in memory only; nothing survives a restart. The store is
//! an explicit instance owned by whoever builds the fetcher. A process-wide
//! default instance is offered for callers that don't want to manage one.

pub mod key;
pub mod store;

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use crate::fetch::CachedPayload;

/// Default cache sizing
pub struct CacheDefaults;

impl CacheDefaults {
    /// Feed data changes every few minutes upstream
    pub const TTL: Duration = Duration::from_secs(5 * 60); // 5 min
    pub const MAX_SIZE: usize = 100;
}

/// Cache holding fetch results of either shape
pub type TrendsCache = CacheStore<CachedPayload>;

// Re-export main types
pub use key::cache_key;
pub use store::{CacheEntry, CacheStats, CacheStore, Clock, SystemClock};

static DEFAULT_CACHE: OnceLock<Arc<TrendsCache>> = OnceLock::new();

/// Process-wide default cache, created on first use with [`CacheDefaults`].
pub fn global() -> Arc<TrendsCache> {
    DEFAULT_CACHE
        .get_or_init(|| Arc::new(CacheStore::new(CacheDefaults::TTL, CacheDefaults::MAX_SIZE)))
        .clone()
}

/// Process-wide default cache, created with the given sizing if it does not
/// exist yet. An existing cache keeps its capacity but takes the new TTL.
pub fn init_global(ttl: Duration, max_size: usize) -> Arc<TrendsCache> {
    let mut created = false;
    let cache = DEFAULT_CACHE
        .get_or_init(|| {
            created = true;
            Arc::new(CacheStore::new(ttl, max_size))
        })
        .clone();
    if !created {
        cache.set_ttl(ttl);
    }
    cache
}
