//! In-process cache store with per-entry deadlines.

use super::{CacheNamespace, CacheStore, CacheTtl};
use crate::error::AppResult;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::debug;

struct Entry {
    value: String,
    expires_at: Instant,
}

/// Single-node cache. Expired entries read as absent and are dropped lazily.
#[derive(Clone)]
pub struct MemoryCache {
    entries: Arc<RwLock<HashMap<(CacheNamespace, String), Entry>>>,
    ttl: CacheTtl,
}

impl MemoryCache {
    pub fn new(ttl: CacheTtl) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Drop every expired entry. Returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, e| e.expires_at > now);
        let removed = before - entries.len();
        if removed > 0 {
            debug!(removed, "purged expired cache entries");
        }
        removed
    }

    /// Sweep expired entries every `every` until `shutdown` flips to `true`
    /// or its sender is dropped.
    pub fn spawn_purger(&self, every: Duration, mut shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        let cache = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every.max(Duration::from_secs(1)));
            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        cache.purge_expired().await;
                    }
                    changed = shutdown.changed() => {
                        if changed.is_err() || *shutdown.borrow() {
                            break;
                        }
                    }
                }
            }
            debug!("cache purger stopped");
        })
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new(CacheTtl::default())
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, ns: CacheNamespace, key: &str) -> AppResult<Option<String>> {
        let map_key = (ns, key.to_string());
        {
            let entries = self.entries.read().await;
            match entries.get(&map_key) {
                None => return Ok(None),
                Some(e) if e.expires_at > Instant::now() => return Ok(Some(e.value.clone())),
                Some(_) => {}
            }
        }
        let mut entries = self.entries.write().await;
        // re-check: a put may have landed between the two locks
        if let Some(e) = entries.get(&map_key) {
            if e.expires_at > Instant::now() {
                return Ok(Some(e.value.clone()));
            }
            entries.remove(&map_key);
        }
        Ok(None)
    }

    async fn put(&self, ns: CacheNamespace, key: &str, value: &str) -> AppResult<()> {
        let expires_at = Instant::now() + self.ttl.for_namespace(ns);
        self.entries.write().await.insert(
            (ns, key.to_string()),
            Entry {
                value: value.to_string(),
                expires_at,
            },
        );
        Ok(())
    }

    async fn remove(&self, ns: CacheNamespace, key: &str) -> AppResult<()> {
        self.entries.write().await.remove(&(ns, key.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache() -> MemoryCache {
        MemoryCache::new(CacheTtl::new(
            Duration::from_secs(60),
            Duration::from_secs(300),
        ))
    }

    #[tokio::test]
    async fn put_then_get() {
        let cache = cache();
        cache
            .put(CacheNamespace::VerificationCode, "a@b.com", "042917")
            .await
            .unwrap();
        let got = cache
            .get(CacheNamespace::VerificationCode, "a@b.com")
            .await
            .unwrap();
        assert_eq!(got.as_deref(), Some("042917"));
        assert!(cache.get(CacheNamespace::Token, "a@b.com").await.unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn entries_expire_after_namespace_ttl() {
        let cache = cache();
        cache
            .put(CacheNamespace::VerificationCode, "a@b.com", "123456")
            .await
            .unwrap();
        cache.put(CacheNamespace::Token, "t", "a@b.com").await.unwrap();

        tokio::time::advance(Duration::from_secs(61)).await;
        assert!(cache
            .get(CacheNamespace::VerificationCode, "a@b.com")
            .await
            .unwrap()
            .is_none());
        assert_eq!(
            cache.get(CacheNamespace::Token, "t").await.unwrap().as_deref(),
            Some("a@b.com")
        );

        tokio::time::advance(Duration::from_secs(300)).await;
        assert!(cache.get(CacheNamespace::Token, "t").await.unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn purge_expired_sweeps_only_dead_entries() {
        let cache = cache();
        cache
            .put(CacheNamespace::VerificationCode, "x@y.com", "000000")
            .await
            .unwrap();
        cache.put(CacheNamespace::Token, "t", "x@y.com").await.unwrap();

        tokio::time::advance(Duration::from_secs(120)).await;
        assert_eq!(cache.purge_expired().await, 1);
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn purger_sweeps_until_shutdown() {
        let cache = cache();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let purger = cache.spawn_purger(Duration::from_secs(30), shutdown_rx);

        cache
            .put(CacheNamespace::VerificationCode, "a@b.com", "123456")
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_secs(91)).await;
        assert!(cache.is_empty().await);

        shutdown_tx.send(true).unwrap();
        purger.await.unwrap();
    }

    #[tokio::test]
    async fn purger_stops_when_sender_dropped() {
        let cache = cache();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let purger = cache.spawn_purger(Duration::from_secs(30), shutdown_rx);
        drop(shutdown_tx);
        purger.await.unwrap();
    }

    #[tokio::test]
    async fn remove_deletes_entry() {
        let cache = cache();
        cache.put(CacheNamespace::Token, "t", "e@x.com").await.unwrap();
        cache.remove(CacheNamespace::Token, "t").await.unwrap();
        assert!(cache.get(CacheNamespace::Token, "t").await.unwrap().is_none());
        assert!(cache.is_empty().await);
    }
}
