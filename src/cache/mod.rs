//! In-memory TTL cache
//!
//! Shields the upstream market APIs from repeated identical requests within
//! a short window. One instance is created at startup and shared through
//! `AppState`; the clock is injected so tests can drive expiry
//! deterministically.
//!
//! Expired entries are evicted lazily on lookup. There is no capacity bound:
//! key cardinality is limited to the small set of (resource, parameter)
//! combinations the routes can produce.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

/// Millisecond clock, swappable in tests
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> u64;
}

/// Wall-clock time
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// Manually advanced clock for deterministic expiry tests
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: AtomicU64::new(start_ms),
        }
    }

    pub fn advance(&self, delta_ms: u64) {
        self.now.fetch_add(delta_ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

struct CacheEntry {
    value: Value,
    expires: u64,
}

/// Process-wide key/value store with per-entry expiry
pub struct TtlCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    clock: Arc<dyn Clock>,
}

impl TtlCache {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
        }
    }

    /// Fetch an unexpired value; expired entries are removed on the way out
    pub fn get(&self, key: &str) -> Option<Value> {
        let mut entries = self.entries.lock().unwrap();
        match entries.get(key) {
            Some(entry) if self.clock.now_ms() < entry.expires => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Unconditionally (over)write an entry expiring `ttl_ms` from now
    pub fn set(&self, key: &str, value: Value, ttl_ms: u64) {
        let expires = self.clock.now_ms() + ttl_ms;
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), CacheEntry { value, expires });
    }

    /// Number of stored entries, expired ones included
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }
}
