//! In-memory TTL cache with bounded capacity
//!
//! Entries expire lazily: nothing sweeps the store in the background, an
//! expired entry is dropped the first time a lookup finds it. When the store
//! is full the oldest *inserted* entry is evicted (FIFO, not LRU).

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Time source for entry expiry
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time source
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A stored value with its insertion and expiry timestamps
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub value: V,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Snapshot of cache counters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub size: usize,
    pub max_size: usize,
    pub ttl_secs: u64,
}

impl CacheStats {
    /// `hits / (hits + misses)`, or 0 when nothing has been looked up yet
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Caching is disabled when the TTL is zero
    pub fn enabled(&self) -> bool {
        self.ttl_secs > 0
    }
}

struct Inner<V> {
    entries: HashMap<String, CacheEntry<V>>,
    /// Keys in insertion order, oldest first
    order: VecDeque<String>,
    ttl: Duration,
    max_size: usize,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl<V> Inner<V> {
    fn forget(&mut self, key: &str) {
        self.entries.remove(key);
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            self.order.remove(pos);
        }
    }
}

/// Thread-safe TTL cache shared by concurrent fetches.
///
/// Every operation takes the same lock, so `get`, `put`, `clear` and
/// `set_ttl` are atomic with respect to each other. The lock is never held
/// across an await point.
pub struct CacheStore<V> {
    inner: Mutex<Inner<V>>,
    clock: Arc<dyn Clock>,
}

impl<V: Clone> CacheStore<V> {
    /// Create a store using the wall clock.
    ///
    /// `max_size` is clamped to at least one entry.
    pub fn new(ttl: Duration, max_size: usize) -> Self {
        Self::with_clock(ttl, max_size, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, max_size: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                order: VecDeque::new(),
                ttl,
                max_size: max_size.max(1),
                hits: 0,
                misses: 0,
                evictions: 0,
            }),
            clock,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<V>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Look up a live entry, counting a hit or a miss.
    ///
    /// While caching is disabled every lookup is a miss, even if entries
    /// stored under an earlier TTL are still present.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = self.clock.now();
        let mut inner = self.lock();

        if inner.ttl.is_zero() {
            inner.misses += 1;
            return None;
        }

        match inner.entries.get(key).map(|entry| now >= entry.expires_at) {
            None => {
                inner.misses += 1;
                None
            }
            Some(true) => {
                log::debug!("Cache entry {} expired", short(key));
                inner.forget(key);
                inner.misses += 1;
                None
            }
            Some(false) => {
                inner.hits += 1;
                inner.entries.get(key).map(|entry| entry.value.clone())
            }
        }
    }

    /// Insert or overwrite an entry using the current TTL.
    ///
    /// A new key arriving at capacity evicts the oldest-inserted entry first.
    /// Overwriting refreshes the timestamps and makes the key the newest
    /// insertion; it never counts as an eviction. No-op while disabled.
    pub fn put(&self, key: &str, value: V) {
        let now = self.clock.now();
        let mut inner = self.lock();

        if inner.ttl.is_zero() {
            return;
        }

        let expires_at = chrono::Duration::from_std(inner.ttl)
            .ok()
            .and_then(|ttl| now.checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        let entry = CacheEntry {
            value,
            created_at: now,
            expires_at,
        };

        if inner.entries.contains_key(key) {
            inner.forget(key);
        } else {
            while inner.entries.len() >= inner.max_size {
                let Some(oldest) = inner.order.pop_front() else {
                    break;
                };
                inner.entries.remove(&oldest);
                inner.evictions += 1;
                log::debug!("Cache full, evicted {}", short(&oldest));
            }
        }

        inner.entries.insert(key.to_string(), entry);
        inner.order.push_back(key.to_string());
    }

    /// Drop every entry. Hit/miss counters are lifetime totals and survive.
    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.entries.clear();
        inner.order.clear();
    }

    /// Change the TTL applied to future insertions.
    ///
    /// Entries already stored keep the expiry they were given. A zero TTL
    /// disables caching.
    pub fn set_ttl(&self, ttl: Duration) {
        let mut inner = self.lock();
        inner.ttl = ttl;
    }

    /// Change the TTL in whole seconds; `seconds <= 0` disables caching.
    pub fn set_ttl_secs(&self, seconds: i64) {
        let secs = u64::try_from(seconds).unwrap_or(0);
        self.set_ttl(Duration::from_secs(secs));
    }

    pub fn stats(&self) -> CacheStats {
        let inner = self.lock();
        CacheStats {
            hits: inner.hits,
            misses: inner.misses,
            evictions: inner.evictions,
            size: inner.entries.len(),
            max_size: inner.max_size,
            ttl_secs: inner.ttl.as_secs(),
        }
    }

    /// Whether `key` is stored, expired or not. Does not touch the counters.
    pub fn contains(&self, key: &str) -> bool {
        self.lock().entries.contains_key(key)
    }

    /// Copy of the raw entry for `key`. Does not touch the counters.
    pub fn peek(&self, key: &str) -> Option<CacheEntry<V>> {
        self.lock().entries.get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// First 12 characters of `key`, for log lines
fn short(key: &str) -> &str {
    key.char_indices().nth(12).map_or(key, |(idx, _)| &key[..idx])
}

/// Manually advanced clock for expiry tests
#[cfg(test)]
pub(crate) struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

#[cfg(test)]
impl ManualClock {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            now: Mutex::new(Utc::now()),
        })
    }

    pub(crate) fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += chrono::Duration::from_std(by).unwrap();
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(ttl_secs: u64, max_size: usize) -> (CacheStore<String>, Arc<ManualClock>) {
        let clock = ManualClock::new();
        let store = CacheStore::with_clock(Duration::from_secs(ttl_secs), max_size, clock.clone());
        (store, clock)
    }

    #[test]
    fn test_put_get() {
        let (store, _clock) = store(60, 10);
        store.put("k1", "v1".to_string());

        assert_eq!(store.get("k1"), Some("v1".to_string()));
        assert_eq!(store.get("missing"), None);

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.size, 1);
    }

    #[test]
    fn test_entry_live_until_ttl_boundary() {
        let (store, clock) = store(60, 10);
        store.put("k1", "v1".to_string());

        clock.advance(Duration::from_secs(59));
        assert_eq!(store.get("k1"), Some("v1".to_string()));

        // Exactly created_at + ttl is already expired
        clock.advance(Duration::from_secs(1));
        assert_eq!(store.get("k1"), None);

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        // Lazily removed on the failed lookup
        assert_eq!(stats.size, 0);
    }

    #[test]
    fn test_short_key_respects_char_boundaries() {
        assert_eq!(short("abc"), "abc");
        assert_eq!(short("0123456789abcdef"), "0123456789ab");
        assert_eq!(short("aéééééééééééééé"), "aééééééééééé");
    }

    #[test]
    fn test_non_ascii_keys_with_debug_logging() {
        log::set_max_level(log::LevelFilter::Debug);
        let (store, clock) = store(10, 1);

        store.put("aéééééééé", "v1".to_string());
        store.put("other", "v2".to_string());
        assert_eq!(store.stats().evictions, 1);

        store.put("ñandú ñandú ñandú", "v3".to_string());
        clock.advance(Duration::from_secs(20));
        assert_eq!(store.get("ñandú ñandú ñandú"), None);
    }

    #[test]
    fn test_expired_entry_kept_until_looked_up() {
        let (store, clock) = store(10, 10);
        store.put("k1", "v1".to_string());
        clock.advance(Duration::from_secs(20));

        assert!(store.contains("k1"));
        assert_eq!(store.get("k1"), None);
        assert!(!store.contains("k1"));
    }

    #[test]
    fn test_capacity_evicts_oldest_insertion() {
        let (store, _clock) = store(60, 3);
        for key in ["a", "b", "c"] {
            store.put(key, key.to_uppercase());
        }
        // Reading "a" does not protect it: eviction is by insertion order
        assert_eq!(store.get("a"), Some("A".to_string()));

        store.put("d", "D".to_string());

        assert_eq!(store.len(), 3);
        assert!(!store.contains("a"));
        assert!(store.contains("b"));
        assert!(store.contains("c"));
        assert!(store.contains("d"));
        assert_eq!(store.stats().evictions, 1);
    }

    #[test]
    fn test_overwrite_refreshes_without_eviction() {
        let (store, clock) = store(60, 2);
        store.put("a", "1".to_string());
        store.put("b", "2".to_string());

        clock.advance(Duration::from_secs(30));
        store.put("a", "3".to_string());

        let stats = store.stats();
        assert_eq!(stats.size, 2);
        assert_eq!(stats.evictions, 0);

        let entry = store.peek("a").unwrap();
        assert_eq!(entry.value, "3");
        assert_eq!(entry.expires_at - entry.created_at, chrono::Duration::seconds(60));

        // "a" is now the newest insertion, so "b" goes first
        store.put("c", "4".to_string());
        assert!(store.contains("a"));
        assert!(!store.contains("b"));
    }

    #[test]
    fn test_clear_keeps_counters() {
        let (store, _clock) = store(60, 10);
        store.put("k1", "v1".to_string());
        store.get("k1");
        store.get("k2");

        store.clear();

        let stats = store.stats();
        assert_eq!(stats.size, 0);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(store.get("k1"), None);
    }

    #[test]
    fn test_hit_rate() {
        let (store, _clock) = store(60, 10);
        assert_eq!(store.stats().hit_rate(), 0.0);

        store.put("k1", "v1".to_string());
        store.get("k1");
        store.get("k1");
        store.get("k1");
        store.get("nope");

        let stats = store.stats();
        assert_eq!(stats.hit_rate(), 0.75);
        assert_eq!(
            stats.hit_rate(),
            stats.hits as f64 / (stats.hits + stats.misses) as f64
        );
    }

    #[test]
    fn test_zero_ttl_disables_caching() {
        let (store, _clock) = store(60, 10);
        store.set_ttl_secs(0);

        store.put("k1", "v1".to_string());
        assert_eq!(store.get("k1"), None);
        assert_eq!(store.len(), 0);
        assert!(!store.stats().enabled());

        store.set_ttl_secs(-5);
        store.put("k2", "v2".to_string());
        assert_eq!(store.get("k2"), None);
        assert_eq!(store.stats().misses, 2);
    }

    #[test]
    fn test_disable_hides_but_keeps_existing_entries() {
        let (store, _clock) = store(60, 10);
        store.put("k1", "v1".to_string());

        store.set_ttl_secs(0);
        assert_eq!(store.get("k1"), None);
        assert!(store.contains("k1"));

        store.set_ttl_secs(60);
        assert_eq!(store.get("k1"), Some("v1".to_string()));
    }

    #[test]
    fn test_ttl_change_not_retroactive() {
        let (store, clock) = store(100, 10);
        store.put("old", "1".to_string());

        store.set_ttl_secs(10);
        store.put("new", "2".to_string());

        clock.advance(Duration::from_secs(50));
        // "old" keeps its original 100s lifetime, "new" got 10s
        assert_eq!(store.get("old"), Some("1".to_string()));
        assert_eq!(store.get("new"), None);
    }

    #[test]
    fn test_max_size_clamped() {
        let (store, _clock) = store(60, 0);
        store.put("a", "1".to_string());
        assert_eq!(store.stats().max_size, 1);
        assert_eq!(store.get("a"), Some("1".to_string()));
    }

    #[test]
    fn test_concurrent_access() {
        let store = Arc::new(CacheStore::<usize>::new(Duration::from_secs(60), 50));
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for i in 0..100 {
                        let key = format!("{}-{}", t, i % 10);
                        store.put(&key, i);
                        store.get(&key);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let stats = store.stats();
        assert!(stats.size <= 50);
        assert_eq!(stats.hits + stats.misses, 800);
    }
}
