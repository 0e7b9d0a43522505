use crate::domain::model::ReviewSnapshot;
use crate::domain::ports::{
    CacheStore, CacheWriteMode, ConfigProvider, ReviewProvider, ReviewSource,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Cache-aside lookup in front of a [`ReviewSource`].
///
/// A hit returns the cached snapshot without touching the source. A miss
/// fetches, writes the snapshot back with the configured TTL and returns it.
/// Failures are never cached. Concurrent misses for the same domain each fetch
/// and each write; the last write wins.
pub struct ReviewService<R: ReviewSource, S: CacheStore + 'static, C: ConfigProvider> {
    source: R,
    store: Arc<S>,
    config: C,
}

impl<R: ReviewSource, S: CacheStore + 'static, C: ConfigProvider> ReviewService<R, S, C> {
    pub fn new(source: R, store: S, config: C) -> Self {
        Self {
            source,
            store: Arc::new(store),
            config,
        }
    }

    pub async fn get_review(&self, domain: &str) -> Result<Option<ReviewSnapshot>> {
        if domain.trim().is_empty() {
            return Ok(None);
        }

        if let Some(snapshot) = self.lookup(domain).await {
            tracing::debug!("Cache hit for domain: {}", domain);
            return Ok(Some(snapshot));
        }
        tracing::debug!("Cache miss for domain: {}", domain);

        let Some(snapshot) = self.source.fetch_review(domain).await? else {
            return Ok(None);
        };

        self.populate(domain, snapshot).await;
        Ok(Some(snapshot))
    }

    /// Store trouble degrades to a miss rather than failing the lookup.
    async fn lookup(&self, domain: &str) -> Option<ReviewSnapshot> {
        let raw = match self.store.get(domain).await {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!("Cache read failed for domain {}: {}", domain, e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                tracing::warn!("Discarding undecodable cache entry for {}: {}", domain, e);
                None
            }
        }
    }

    async fn populate(&self, domain: &str, snapshot: ReviewSnapshot) {
        let value = match serde_json::to_string(&snapshot) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Could not encode snapshot for {}: {}", domain, e);
                return;
            }
        };
        let ttl = self.config.cache_ttl();

        match self.config.cache_write_mode() {
            CacheWriteMode::Awaited => {
                if let Err(e) = self.store.set(domain, value, ttl).await {
                    tracing::warn!("Cache write failed for domain {}: {}", domain, e);
                }
            }
            CacheWriteMode::Detached => {
                let store = Arc::clone(&self.store);
                let key = domain.to_string();
                tokio::spawn(async move {
                    if let Err(e) = store.set(&key, value, ttl).await {
                        tracing::warn!("Cache write failed for domain {}: {}", key, e);
                    }
                });
            }
        }
    }
}

#[async_trait]
impl<R, S, C> ReviewProvider for ReviewService<R, S, C>
where
    R: ReviewSource,
    S: CacheStore + 'static,
    C: ConfigProvider,
{
    async fn get_review(&self, domain: &str) -> Result<Option<ReviewSnapshot>> {
        ReviewService::get_review(self, domain).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::cache::InMemoryCacheStore;
    use crate::utils::error::ReviewError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::{Mutex, Notify};

    #[derive(Clone, Copy)]
    enum Outcome {
        Snapshot(ReviewSnapshot),
        NotFound,
        Timeout,
    }

    #[derive(Clone)]
    struct CountingSource {
        outcome: Outcome,
        delay: Option<Duration>,
        calls: Arc<AtomicUsize>,
    }

    impl CountingSource {
        fn new(outcome: Outcome) -> Self {
            Self {
                outcome,
                delay: None,
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ReviewSource for CountingSource {
        async fn fetch_review(&self, domain: &str) -> Result<Option<ReviewSnapshot>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            match self.outcome {
                Outcome::Snapshot(snapshot) => Ok(Some(snapshot)),
                Outcome::NotFound => Err(ReviewError::not_found(domain)),
                Outcome::Timeout => Err(ReviewError::Timeout {
                    timeout: Duration::from_secs(1),
                }),
            }
        }
    }

    /// Store that always fails, to exercise degraded paths.
    #[derive(Clone, Default)]
    struct BrokenStore {
        writes: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl CacheStore for BrokenStore {
        async fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(ReviewError::Cache {
                message: "connection refused".to_string(),
            })
        }

        async fn set(&self, key: &str, _value: String, _ttl: Duration) -> Result<()> {
            self.writes.lock().await.push(key.to_string());
            Err(ReviewError::Cache {
                message: "connection refused".to_string(),
            })
        }
    }

    /// In-memory store that signals every completed write.
    #[derive(Clone, Default)]
    struct RecordingStore {
        inner: InMemoryCacheStore,
        written: Arc<Notify>,
    }

    #[async_trait]
    impl CacheStore for RecordingStore {
        async fn get(&self, key: &str) -> Result<Option<String>> {
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<()> {
            self.inner.set(key, value, ttl).await?;
            self.written.notify_one();
            Ok(())
        }
    }

    struct MockConfig {
        cache_ttl: Duration,
        write_mode: CacheWriteMode,
    }

    impl MockConfig {
        fn with_ttl(cache_ttl: Duration) -> Self {
            Self {
                cache_ttl,
                write_mode: CacheWriteMode::Awaited,
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn review_url(&self) -> &str {
            "http://reviews.invalid/review/"
        }

        fn request_timeout(&self) -> Duration {
            Duration::from_secs(5)
        }

        fn cache_ttl(&self) -> Duration {
            self.cache_ttl
        }

        fn cache_write_mode(&self) -> CacheWriteMode {
            self.write_mode
        }
    }

    fn snapshot() -> ReviewSnapshot {
        ReviewSnapshot::new(100, 4.3)
    }

    #[tokio::test]
    async fn test_different_domains_are_fetched_separately() {
        let source = CountingSource::new(Outcome::Snapshot(snapshot()));
        let service = ReviewService::new(
            source.clone(),
            InMemoryCacheStore::new(),
            MockConfig::with_ttl(Duration::from_secs(60)),
        );

        assert_eq!(service.get_review("anyDomain1").await.unwrap(), Some(snapshot()));
        assert_eq!(service.get_review("anyDomain2").await.unwrap(), Some(snapshot()));
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_second_lookup_is_served_from_cache() {
        let source = CountingSource::new(Outcome::Snapshot(snapshot()));
        let store = InMemoryCacheStore::new();
        let service = ReviewService::new(
            source.clone(),
            store.clone(),
            MockConfig::with_ttl(Duration::from_secs(60)),
        );

        assert_eq!(service.get_review("anyDomain").await.unwrap(), Some(snapshot()));
        assert_eq!(service.get_review("anyDomain").await.unwrap(), Some(snapshot()));
        assert_eq!(source.calls(), 1);

        let cached = store.get("anyDomain").await.unwrap().unwrap();
        assert_eq!(cached, r#"{"reviewsCount":100,"rating":4.3}"#);
    }

    #[tokio::test(start_paused = true)]
    async fn test_lookup_refetches_once_ttl_elapses() {
        let source = CountingSource::new(Outcome::Snapshot(snapshot()));
        let service = ReviewService::new(
            source.clone(),
            InMemoryCacheStore::new(),
            MockConfig::with_ttl(Duration::from_secs(1)),
        );

        service.get_review("anyDomainShortTtl").await.unwrap();

        tokio::time::advance(Duration::from_millis(999)).await;
        service.get_review("anyDomainShortTtl").await.unwrap();
        assert_eq!(source.calls(), 1);

        tokio::time::advance(Duration::from_millis(2)).await;
        service.get_review("anyDomainShortTtl").await.unwrap();
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_cached_value_is_returned_without_fetching() {
        let source = CountingSource::new(Outcome::Snapshot(snapshot()));
        let store = InMemoryCacheStore::new();
        store
            .set(
                "cached.example",
                r#"{"reviewsCount":7,"rating":3.25}"#.to_string(),
                Duration::from_secs(60),
            )
            .await
            .unwrap();
        let service = ReviewService::new(
            source.clone(),
            store,
            MockConfig::with_ttl(Duration::from_secs(60)),
        );

        let result = service.get_review("cached.example").await.unwrap();

        assert_eq!(result, Some(ReviewSnapshot::new(7, 3.25)));
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test]
    async fn test_not_found_is_propagated_and_not_cached() {
        let source = CountingSource::new(Outcome::NotFound);
        let store = InMemoryCacheStore::new();
        let service = ReviewService::new(
            source.clone(),
            store.clone(),
            MockConfig::with_ttl(Duration::from_secs(60)),
        );

        let err = service.get_review("X").await.unwrap_err();
        assert_eq!(err.to_string(), "Review for domain: X was not found");
        assert!(store.is_empty().await);

        service.get_review("X").await.unwrap_err();
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_timeout_is_propagated_and_not_cached() {
        let source = CountingSource::new(Outcome::Timeout);
        let store = InMemoryCacheStore::new();
        let service = ReviewService::new(
            source.clone(),
            store.clone(),
            MockConfig::with_ttl(Duration::from_secs(60)),
        );

        let err = service.get_review("slow.example").await.unwrap_err();

        assert!(matches!(err, ReviewError::Timeout { .. }));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_blank_domain_short_circuits() {
        let source = CountingSource::new(Outcome::Snapshot(snapshot()));
        let store = InMemoryCacheStore::new();
        let service = ReviewService::new(
            source.clone(),
            store.clone(),
            MockConfig::with_ttl(Duration::from_secs(60)),
        );

        assert_eq!(service.get_review("").await.unwrap(), None);
        assert_eq!(service.get_review("  ").await.unwrap(), None);
        assert_eq!(source.calls(), 0);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_undecodable_cache_entry_is_treated_as_miss() {
        let source = CountingSource::new(Outcome::Snapshot(snapshot()));
        let store = InMemoryCacheStore::new();
        store
            .set("acme.example", "not json".to_string(), Duration::from_secs(60))
            .await
            .unwrap();
        let service = ReviewService::new(
            source.clone(),
            store.clone(),
            MockConfig::with_ttl(Duration::from_secs(60)),
        );

        assert_eq!(service.get_review("acme.example").await.unwrap(), Some(snapshot()));
        assert_eq!(source.calls(), 1);
        assert_eq!(
            store.get("acme.example").await.unwrap().as_deref(),
            Some(r#"{"reviewsCount":100,"rating":4.3}"#)
        );
    }

    #[tokio::test]
    async fn test_broken_store_degrades_to_direct_fetch() {
        let source = CountingSource::new(Outcome::Snapshot(snapshot()));
        let store = BrokenStore::default();
        let service = ReviewService::new(
            source.clone(),
            store.clone(),
            MockConfig::with_ttl(Duration::from_secs(60)),
        );

        assert_eq!(service.get_review("acme.example").await.unwrap(), Some(snapshot()));
        assert_eq!(service.get_review("acme.example").await.unwrap(), Some(snapshot()));
        assert_eq!(source.calls(), 2);
        assert_eq!(store.writes.lock().await.len(), 2);
    }

    #[tokio::test]
    async fn test_detached_write_lands_in_background() {
        let source = CountingSource::new(Outcome::Snapshot(snapshot()));
        let store = RecordingStore::default();
        let config = MockConfig {
            cache_ttl: Duration::from_secs(60),
            write_mode: CacheWriteMode::Detached,
        };
        let service = ReviewService::new(source.clone(), store.clone(), config);

        assert_eq!(service.get_review("acme.example").await.unwrap(), Some(snapshot()));

        store.written.notified().await;
        assert!(store.inner.get("acme.example").await.unwrap().is_some());

        service.get_review("acme.example").await.unwrap();
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_misses_both_fetch() {
        let mut source = CountingSource::new(Outcome::Snapshot(snapshot()));
        source.delay = Some(Duration::from_millis(50));
        let store = InMemoryCacheStore::new();
        let service = ReviewService::new(
            source.clone(),
            store.clone(),
            MockConfig::with_ttl(Duration::from_secs(60)),
        );

        let (first, second) = tokio::join!(
            service.get_review("acme.example"),
            service.get_review("acme.example")
        );

        assert_eq!(first.unwrap(), Some(snapshot()));
        assert_eq!(second.unwrap(), Some(snapshot()));
        assert_eq!(source.calls(), 2);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_service_behind_provider_trait() {
        let source = CountingSource::new(Outcome::Snapshot(snapshot()));
        let provider: Arc<dyn ReviewProvider> = Arc::new(ReviewService::new(
            source.clone(),
            InMemoryCacheStore::new(),
            MockConfig::with_ttl(Duration::from_secs(60)),
        ));

        assert_eq!(provider.get_review("acme.example").await.unwrap(), Some(snapshot()));
        assert_eq!(provider.get_review("acme.example").await.unwrap(), Some(snapshot()));
        assert_eq!(source.calls(), 1);
    }
}
