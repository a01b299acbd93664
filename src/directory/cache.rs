//! Prefix cache around another directory.
//!
//! The cache is an ordinary value: whoever builds it owns it and decides how
//! long it lives (one batch, one process, ...). Entries are bounded by
//! `max_capacity` and expire after `ttl`. Only definitive answers are stored
//! (`Found` and `NotFound`); rate limits, bad statuses and failures are
//! passed through so a later lookup can still succeed.

use super::{BinDirectory, LookupOutcome};
use crate::number::BinPrefix;
use moka::future::Cache;
use std::time::Duration;
use tracing::debug;

/// Default bound on cached prefixes.
pub const DEFAULT_CACHE_CAPACITY: u64 = 10_000;

/// Default lifetime of a cached answer.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

/// Limits for `CachedDirectory`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of cached prefixes.
    pub max_capacity: u64,
    /// How long an answer is served before the inner directory is asked again.
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: DEFAULT_CACHE_CAPACITY,
            ttl: DEFAULT_CACHE_TTL,
        }
    }
}

impl CacheConfig {
    /// Sets the maximum capacity.
    pub fn with_max_capacity(mut self, max_capacity: u64) -> Self {
        self.max_capacity = max_capacity;
        self
    }

    /// Sets the TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

/// Caching wrapper for any `BinDirectory`.
///
/// # Example
///
/// ```
/// use bincheck::directory::{BinDirectory, BinMetadata, CacheConfig, CachedDirectory, MemoryDirectory};
/// use std::time::Duration;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let mut inner = MemoryDirectory::new();
/// inner.insert("411111", BinMetadata::with_scheme("visa"));
///
/// let cached = CachedDirectory::with_config(
///     inner,
///     CacheConfig::default().with_ttl(Duration::from_secs(60)),
/// );
/// assert!(cached.lookup_str("411111").await.is_found());
///
/// cached.run_pending_tasks().await;
/// assert_eq!(cached.entry_count(), 1);
/// # }
/// ```
#[derive(Debug)]
pub struct CachedDirectory<D> {
    inner: D,
    entries: Cache<BinPrefix, LookupOutcome>,
    config: CacheConfig,
}

impl<D: BinDirectory> CachedDirectory<D> {
    /// Wraps `inner` with an empty cache using default limits.
    pub fn new(inner: D) -> Self {
        Self::with_config(inner, CacheConfig::default())
    }

    /// Wraps `inner` with an empty cache using explicit limits.
    pub fn with_config(inner: D, config: CacheConfig) -> Self {
        let entries = Cache::builder()
            .max_capacity(config.max_capacity)
            .time_to_live(config.ttl)
            .build();

        Self {
            inner,
            entries,
            config,
        }
    }

    /// The wrapped directory.
    pub fn inner(&self) -> &D {
        &self.inner
    }

    /// The configured limits.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Approximate number of cached prefixes.
    ///
    /// Exact only after `run_pending_tasks`.
    pub fn entry_count(&self) -> u64 {
        self.entries.entry_count()
    }

    /// Applies pending evictions and expirations.
    pub async fn run_pending_tasks(&self) {
        self.entries.run_pending_tasks().await;
    }

    /// Drops every cached answer.
    pub fn clear(&self) {
        self.entries.invalidate_all();
    }
}

impl<D: BinDirectory> BinDirectory for CachedDirectory<D> {
    async fn lookup(&self, prefix: &BinPrefix) -> LookupOutcome {
        if let Some(outcome) = self.entries.get(prefix).await {
            debug!(bin = %prefix, "BIN cache hit");
            return outcome;
        }

        let outcome = self.inner.lookup(prefix).await;
        if matches!(outcome, LookupOutcome::Found(_) | LookupOutcome::NotFound) {
            self.entries.insert(*prefix, outcome.clone()).await;
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::{BinMetadata, FailureKind};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Answers from a fixed outcome and counts calls.
    struct Scripted {
        outcome: LookupOutcome,
        calls: AtomicUsize,
    }

    impl Scripted {
        fn new(outcome: LookupOutcome) -> Self {
            Self {
                outcome,
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl BinDirectory for Scripted {
        async fn lookup(&self, _prefix: &BinPrefix) -> LookupOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome.clone()
        }
    }

    fn prefix() -> BinPrefix {
        BinPrefix::parse("411111").unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.max_capacity, DEFAULT_CACHE_CAPACITY);
        assert_eq!(config.ttl, Duration::from_secs(300));

        let config = config
            .with_max_capacity(5)
            .with_ttl(Duration::from_millis(10));
        assert_eq!(config.max_capacity, 5);
        assert_eq!(config.ttl, Duration::from_millis(10));
    }

    #[tokio::test]
    async fn test_found_is_cached() {
        let cached = CachedDirectory::new(Scripted::new(LookupOutcome::Found(
            BinMetadata::with_scheme("visa"),
        )));

        assert!(cached.lookup(&prefix()).await.is_found());
        assert!(cached.lookup(&prefix()).await.is_found());
        assert_eq!(cached.inner().calls(), 1);

        cached.run_pending_tasks().await;
        assert_eq!(cached.entry_count(), 1);
    }

    #[tokio::test]
    async fn test_not_found_is_cached() {
        let cached = CachedDirectory::new(Scripted::new(LookupOutcome::NotFound));

        cached.lookup(&prefix()).await;
        cached.lookup(&prefix()).await;
        assert_eq!(cached.inner().calls(), 1);
    }

    #[tokio::test]
    async fn test_transient_outcomes_are_not_cached() {
        for outcome in [
            LookupOutcome::RateLimited,
            LookupOutcome::BadStatus(503),
            LookupOutcome::Failed(FailureKind::Timeout),
        ] {
            let cached = CachedDirectory::new(Scripted::new(outcome.clone()));
            assert_eq!(cached.lookup(&prefix()).await, outcome);
            assert_eq!(cached.lookup(&prefix()).await, outcome);
            assert_eq!(cached.inner().calls(), 2);

            cached.run_pending_tasks().await;
            assert_eq!(cached.entry_count(), 0);
        }
    }

    #[tokio::test]
    async fn test_cached_answer_expires_after_ttl() {
        let cached = CachedDirectory::with_config(
            Scripted::new(LookupOutcome::NotFound),
            CacheConfig::default().with_ttl(Duration::from_millis(50)),
        );

        cached.lookup(&prefix()).await;
        cached.lookup(&prefix()).await;
        assert_eq!(cached.inner().calls(), 1);

        tokio::time::sleep(Duration::from_millis(100)).await;
        cached.run_pending_tasks().await;

        cached.lookup(&prefix()).await;
        assert_eq!(cached.inner().calls(), 2);
    }

    #[tokio::test]
    async fn test_capacity_is_bounded() {
        let cached = CachedDirectory::with_config(
            Scripted::new(LookupOutcome::NotFound),
            CacheConfig::default().with_max_capacity(10),
        );

        for i in 0..200u32 {
            let prefix = BinPrefix::parse(&format!("{:06}", i)).unwrap();
            cached.lookup(&prefix).await;
            cached.run_pending_tasks().await;
        }

        assert_eq!(cached.inner().calls(), 200);
        assert!(cached.entry_count() <= 10, "{}", cached.entry_count());
    }

    #[tokio::test]
    async fn test_clear() {
        let cached = CachedDirectory::new(Scripted::new(LookupOutcome::NotFound));
        cached.lookup(&prefix()).await;
        cached.clear();
        cached.run_pending_tasks().await;
        assert_eq!(cached.entry_count(), 0);

        cached.lookup(&prefix()).await;
        assert_eq!(cached.inner().calls(), 2);
    }
}
