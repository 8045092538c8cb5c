//! Read-through TTL cache with an injected clock.
//!
//! A process-wide keyed store wrapping each engine operation in "compute
//! once, serve many" semantics. Time is read through the [`Clock`] trait
//! so TTL expiry is deterministic in tests.
//!
//! # Consistency
//!
//! Individual get/insert/invalidate operations are atomic (a single
//! mutex guards the store), but a compute-and-store sequence is not
//! serialized: two concurrent misses on the same key may both compute
//! and both write, with the last write winning. That relaxed behavior is
//! accepted here; callers wanting single-flight semantics would add a
//! per-key in-flight map guarded by the same mutex.
//!
//! The mutex is never held across an await point, so `std::sync::Mutex`
//! is the right primitive.

use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

/// Millisecond time source.
pub trait Clock: Send + Sync {
    /// Current time in milliseconds since Unix epoch.
    fn now_ms(&self) -> i64;
}

/// Wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// A clock that only moves when told to. For tests.
#[derive(Debug, Default)]
pub struct ManualClock {
    now_ms: AtomicI64,
}

impl ManualClock {
    /// Create a clock frozen at `now_ms`.
    pub fn new(now_ms: i64) -> Self {
        Self {
            now_ms: AtomicI64::new(now_ms),
        }
    }

    /// Move the clock forward by `delta_ms`.
    pub fn advance(&self, delta_ms: i64) {
        self.now_ms.fetch_add(delta_ms, Ordering::SeqCst);
    }

    /// Set the clock to an absolute time.
    pub fn set(&self, now_ms: i64) {
        self.now_ms.store(now_ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}

struct CacheEntry {
    value: Arc<dyn Any + Send + Sync>,
    expires_at_ms: i64,
}

/// Keyed store with per-entry TTL and prefix invalidation.
///
/// Values are stored type-erased; [`get`](Self::get) downcasts back to
/// the requested type and misses (forcing a recompute) if the stored
/// type does not match.
pub struct MemoCache {
    clock: Arc<dyn Clock>,
    store: Mutex<HashMap<String, CacheEntry>>,
}

impl MemoCache {
    /// Create a cache reading time from `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            store: Mutex::new(HashMap::new()),
        }
    }

    /// Create a cache on the system clock.
    pub fn system() -> Self {
        Self::new(Arc::new(SystemClock))
    }

    /// Look up a live entry, removing it if expired.
    pub fn get<T>(&self, key: &str) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        let mut store = self.store.lock().expect("cache mutex poisoned");
        let entry = store.get(key)?;
        if self.clock.now_ms() > entry.expires_at_ms {
            store.remove(key);
            return None;
        }
        entry.value.downcast_ref::<T>().cloned()
    }

    /// Store a value, replacing any previous entry for the key.
    pub fn insert<T>(&self, key: &str, value: T, ttl_ms: i64)
    where
        T: Send + Sync + 'static,
    {
        let entry = CacheEntry {
            value: Arc::new(value),
            expires_at_ms: self.clock.now_ms() + ttl_ms,
        };
        self.store
            .lock()
            .expect("cache mutex poisoned")
            .insert(key.to_string(), entry);
    }

    /// Return the cached value for `key`, or run `compute` and store its
    /// result for `ttl_ms`.
    ///
    /// Failed computes are not stored; the error propagates and the next
    /// caller retries. The store lock is released while `compute` runs.
    pub async fn get_or_try_compute<T, E, F, Fut>(
        &self,
        key: &str,
        ttl_ms: i64,
        compute: F,
    ) -> Result<T, E>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(hit) = self.get::<T>(key) {
            return Ok(hit);
        }
        let value = compute().await?;
        self.insert(key, value.clone(), ttl_ms);
        Ok(value)
    }

    /// Remove every entry whose key starts with `prefix`.
    pub fn invalidate_prefix(&self, prefix: &str) {
        self.store
            .lock()
            .expect("cache mutex poisoned")
            .retain(|key, _| !key.starts_with(prefix));
    }

    /// Remove all entries.
    pub fn clear(&self) {
        self.store.lock().expect("cache mutex poisoned").clear();
    }

    /// Number of stored entries, live or expired.
    pub fn len(&self) -> usize {
        self.store.lock().expect("cache mutex poisoned").len()
    }

    /// True if no entries are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
