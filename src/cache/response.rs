//! Response cache for idempotent reads.
//!
//! [`ResponseCache`] memoizes decoded API responses for a bounded freshness
//! window. Each entry carries its own TTL, chosen by the caller from a small
//! set of [`TtlTier`]s. Write paths evict entries explicitly through
//! [`invalidate`](ResponseCache::invalidate),
//! [`invalidate_resource`](ResponseCache::invalidate_resource) or
//! [`invalidate_all`](ResponseCache::invalidate_all).
//!
//! # Expiry
//!
//! An entry is valid while `now - stored_at < ttl`. Expired entries are
//! never returned; they are dropped on the next lookup, or by moka's own
//! housekeeping shortly after. There is no sweeper thread.
//!
//! # Concurrent misses
//!
//! [`fetch_with_cache`](ResponseCache::fetch_with_cache) does not coalesce
//! in-flight loads. Two callers missing the same key both run their loader
//! and the last one to finish wins. Reads are idempotent, so this only costs
//! a duplicate request.

use std::future::Future;
use std::time::{Duration, Instant};

use moka::ops::compute::Op;
use moka::sync::Cache;
use moka::Expiry;
use tracing::debug;

use super::key::CacheKey;
use crate::telemetry;

/// Freshness policy tiers for cached responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TtlTier {
    /// Frequently changing data. Default: 1 minute.
    Short,
    /// Collections edited from the admin panel. Default: 5 minutes.
    Medium,
    /// Page layout and static page content. Default: 30 minutes.
    Long,
}

/// Configuration for the response cache.
///
/// ```rust
/// # use lyceum::cache::{CacheConfig, TtlTier};
/// # use std::time::Duration;
/// let config = CacheConfig::new()
///     .max_entries(500)
///     .tier(TtlTier::Long, Duration::from_secs(3600));
/// assert_eq!(config.ttl(TtlTier::Long), Duration::from_secs(3600));
/// ```
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of cached entries. Default: 10,000.
    pub max_entries: u64,
    /// TTL for [`TtlTier::Short`]. Default: 1 minute.
    pub short_ttl: Duration,
    /// TTL for [`TtlTier::Medium`]. Default: 5 minutes.
    pub medium_ttl: Duration,
    /// TTL for [`TtlTier::Long`]. Default: 30 minutes.
    pub long_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 10_000,
            short_ttl: Duration::from_secs(60),
            medium_ttl: Duration::from_secs(5 * 60),
            long_ttl: Duration::from_secs(30 * 60),
        }
    }
}

impl CacheConfig {
    /// Create a new config with sensible defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of cached entries.
    pub fn max_entries(mut self, n: u64) -> Self {
        self.max_entries = n;
        self
    }

    /// Set the duration of one TTL tier.
    pub fn tier(mut self, tier: TtlTier, ttl: Duration) -> Self {
        match tier {
            TtlTier::Short => self.short_ttl = ttl,
            TtlTier::Medium => self.medium_ttl = ttl,
            TtlTier::Long => self.long_ttl = ttl,
        }
        self
    }

    /// Duration of a TTL tier.
    pub fn ttl(&self, tier: TtlTier) -> Duration {
        match tier {
            TtlTier::Short => self.short_ttl,
            TtlTier::Medium => self.medium_ttl,
            TtlTier::Long => self.long_ttl,
        }
    }
}

#[derive(Clone)]
struct CacheEntry<V> {
    value: V,
    stored_at: Instant,
    ttl: Duration,
}

impl<V> CacheEntry<V> {
    fn is_valid(&self) -> bool {
        self.stored_at.elapsed() < self.ttl
    }
}

/// How long moka keeps an entry after it stops being served. Lookups inside
/// this window see the stale entry, purge it and count the expiry.
const EVICTION_GRACE: Duration = Duration::from_secs(1);

/// Hands each entry's own TTL (plus [`EVICTION_GRACE`]) to moka. An
/// overwrite restarts the clock.
struct EntryTtl;

impl<V> Expiry<CacheKey, CacheEntry<V>> for EntryTtl {
    fn expire_after_create(
        &self,
        _key: &CacheKey,
        value: &CacheEntry<V>,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl.saturating_add(EVICTION_GRACE))
    }

    fn expire_after_update(
        &self,
        _key: &CacheKey,
        value: &CacheEntry<V>,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl.saturating_add(EVICTION_GRACE))
    }
}

/// In-memory TTL cache of decoded responses.
///
/// Generic over the payload so it can hold anything cloneable; the content
/// client stores raw JSON bodies (`serde_json::Value`). All operations are
/// synchronous and never perform I/O.
pub struct ResponseCache<V = serde_json::Value> {
    entries: Cache<CacheKey, CacheEntry<V>>,
    config: CacheConfig,
}

impl<V> ResponseCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Create a new response cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let entries = Cache::builder()
            .max_capacity(config.max_entries)
            .expire_after(EntryTtl)
            .build();
        Self {
            entries,
            config: config.clone(),
        }
    }

    /// The configuration this cache was built with.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Duration of a TTL tier under this cache's configuration.
    pub fn ttl(&self, tier: TtlTier) -> Duration {
        self.config.ttl(tier)
    }

    /// Look up a still-valid value.
    ///
    /// Returns `None` on a miss. An entry whose TTL has elapsed is removed
    /// and reported as a miss.
    pub fn get(&self, key: &CacheKey) -> Option<V> {
        let resource = key.collection().to_string();
        match self.entries.get(key) {
            Some(entry) if entry.is_valid() => {
                metrics::counter!(telemetry::CACHE_HITS_TOTAL, "resource" => resource)
                    .increment(1);
                Some(entry.value)
            }
            Some(_) => {
                self.purge_expired(key);
                debug!(%key, "cache entry expired");
                metrics::counter!(telemetry::CACHE_EXPIRED_TOTAL, "resource" => resource.clone())
                    .increment(1);
                metrics::counter!(telemetry::CACHE_MISSES_TOTAL, "resource" => resource)
                    .increment(1);
                None
            }
            None => {
                metrics::counter!(telemetry::CACHE_MISSES_TOTAL, "resource" => resource)
                    .increment(1);
                None
            }
        }
    }

    /// Insert or overwrite the entry for `key`. Last write wins.
    pub fn put(&self, key: CacheKey, value: V, ttl: Duration) {
        let entry = CacheEntry {
            value,
            stored_at: Instant::now(),
            ttl,
        };
        self.entries.insert(key, entry);
    }

    /// Whether `key` currently holds a valid entry. Emits no metrics.
    pub fn contains_key(&self, key: &CacheKey) -> bool {
        self.entries
            .get(key)
            .is_some_and(|entry| entry.is_valid())
    }

    /// Remove a single entry, if present.
    pub fn invalidate(&self, key: &CacheKey) {
        self.entries.invalidate(key);
        debug!(%key, "cache entry invalidated");
        metrics::counter!(telemetry::CACHE_INVALIDATIONS_TOTAL, "scope" => "key").increment(1);
    }

    /// Remove every entry of `resource`, whatever its parameters.
    ///
    /// `courses` matches `courses`, `courses?page=2` and `courses/42`, but
    /// not `courses-archive`. Returns the number of entries removed.
    pub fn invalidate_resource(&self, resource: &str) -> usize {
        let resource = resource.trim_matches('/');
        let prefix = format!("{resource}/");
        let doomed: Vec<_> = self
            .entries
            .iter()
            .filter(|(key, _)| {
                let path = key.resource_path();
                path == resource || path.starts_with(&prefix)
            })
            .map(|(key, _)| key)
            .collect();

        for key in &doomed {
            self.entries.invalidate(key.as_ref());
        }
        debug!(resource, removed = doomed.len(), "cache resource invalidated");
        metrics::counter!(telemetry::CACHE_INVALIDATIONS_TOTAL, "scope" => "resource")
            .increment(1);
        doomed.len()
    }

    /// Remove every entry.
    pub fn invalidate_all(&self) {
        self.entries.invalidate_all();
        debug!("cache cleared");
        metrics::counter!(telemetry::CACHE_INVALIDATIONS_TOTAL, "scope" => "all").increment(1);
    }

    /// Return the cached value for `key`, or run `loader` and cache its result.
    ///
    /// A loader error is returned unchanged and nothing is cached, so the
    /// next call retries the load.
    pub async fn fetch_with_cache<F, Fut, E>(
        &self,
        key: CacheKey,
        ttl: Duration,
        loader: F,
    ) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(&key) {
            return Ok(value);
        }

        let value = loader().await?;
        self.put(key, value.clone(), ttl);
        Ok(value)
    }

    /// Number of entries that would currently be served.
    ///
    /// Walks the whole cache; meant for diagnostics and tests.
    pub fn len(&self) -> usize {
        self.entries
            .iter()
            .filter(|(_, entry)| entry.is_valid())
            .count()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop `key` only if it is still expired, so a concurrent fresh `put`
    /// is never lost.
    fn purge_expired(&self, key: &CacheKey) {
        let _ = self
            .entries
            .entry_by_ref(key)
            .and_compute_with(|current| match current {
                Some(entry) if !entry.value().is_valid() => Op::Remove,
                _ => Op::Nop,
            });
    }
}

impl Default for ResponseCache<serde_json::Value> {
    fn default() -> Self {
        Self::new(&CacheConfig::default())
    }
}
