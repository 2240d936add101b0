//! Time-based response cache.
//!
//! Key-to-(value, expiry) store with read-through checks and a TTL per entry
//! class: 300 seconds for rate entries, 24 hours for the currency list.
//! Expired entries are evicted lazily on the next lookup; there is no
//! background sweep and no size bound. The key space is bounded by the
//! provider x currency-pair x date combinations actually requested, so
//! unbounded growth is a documented scaling limit rather than a bug.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use chrono::NaiveDate;

use crate::models::{CurrencyList, RateResult};

/// TTL for rate entries.
pub const RATE_TTL: Duration = Duration::from_secs(300);

/// TTL for the currency list entry.
pub const CURRENCY_LIST_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Cache key for the currency list.
pub const CURRENCY_LIST_KEY: &str = "currencies";

/// Entry class, determining the TTL assigned on write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryClass {
    /// Latest or historical rate result.
    Rate,
    /// The currency list.
    Currencies,
}

impl EntryClass {
    /// TTL assigned to entries of this class.
    pub fn ttl(self) -> Duration {
        match self {
            EntryClass::Rate => RATE_TTL,
            EntryClass::Currencies => CURRENCY_LIST_TTL,
        }
    }
}

/// A cached value.
#[derive(Debug, Clone)]
pub enum CachedValue {
    /// A normalized rate result.
    Rate(RateResult),
    /// The shared currency list.
    Currencies(Arc<CurrencyList>),
}

#[derive(Debug)]
struct CacheEntry {
    value: CachedValue,
    stored_at: Instant,
    ttl: Duration,
}

impl CacheEntry {
    fn is_fresh(&self) -> bool {
        self.stored_at.elapsed() < self.ttl
    }
}

/// Mutex-guarded in-memory cache shared by the resolver.
#[derive(Default)]
pub struct RateCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl RateCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the value for `key` if present and not expired.
    ///
    /// An expired entry is removed and reported as a miss; the caller must
    /// refresh.
    pub fn get(&self, key: &str) -> Option<CachedValue> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        match entries.get(key) {
            Some(entry) if entry.is_fresh() => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Store `value` under `key`, unconditionally overwriting, with the TTL
    /// of its class.
    pub fn put(&self, key: impl Into<String>, value: CachedValue, class: EntryClass) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(
            key.into(),
            CacheEntry {
                value,
                stored_at: Instant::now(),
                ttl: class.ttl(),
            },
        );
    }

    /// Number of entries currently held, expired ones included.
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Zero the TTL of an entry so the next lookup sees it as expired.
    #[cfg(test)]
    pub(crate) fn force_expire(&self, key: &str) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(entry) = entries.get_mut(key) {
            entry.ttl = Duration::ZERO;
        }
    }
}

/// Cache key for a latest-rate lookup.
pub fn latest_key(base: &str, target: &str, provider: &str) -> String {
    format!("latest:{}:{}:{}", base, target, provider)
}

/// Cache key for a historical lookup.
pub fn historical_key(base: &str, target: &str, date: NaiveDate, provider: &str) -> String {
    format!(
        "historical:{}:{}:{}:{}",
        base,
        target,
        date.format("%Y-%m-%d"),
        provider
    )
}
