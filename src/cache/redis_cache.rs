//! Redis-backed cache store: `SET .. EX` per namespace TTL.

use super::{CacheNamespace, CacheStore, CacheTtl};
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use redis::AsyncCommands;
use std::sync::Arc;
use tracing::debug;

#[derive(Clone)]
pub struct RedisCache {
    client: Arc<redis::Client>,
    ttl: CacheTtl,
}

impl RedisCache {
    /// Create the store from a Redis URL. Connections are opened lazily.
    pub fn new(redis_url: &str, ttl: CacheTtl) -> Result<Self, AppError> {
        let client = redis::Client::open(redis_url)?;
        Ok(Self {
            client: Arc::new(client),
            ttl,
        })
    }

    /// Get a multiplexed connection for commands.
    pub async fn connection(&self) -> Result<redis::aio::MultiplexedConnection, AppError> {
        let conn = self.client.get_multiplexed_async_connection().await?;
        Ok(conn)
    }
}

#[async_trait]
impl CacheStore for RedisCache {
    async fn get(&self, ns: CacheNamespace, key: &str) -> AppResult<Option<String>> {
        let mut conn = self.connection().await?;
        let value: Option<String> = conn.get(ns.key(key)).await?;
        Ok(value)
    }

    async fn put(&self, ns: CacheNamespace, key: &str, value: &str) -> AppResult<()> {
        let mut conn = self.connection().await?;
        let ttl_secs = self.ttl.for_namespace(ns).as_secs();
        redis::cmd("SET")
            .arg(ns.key(key))
            .arg(value)
            .arg("EX")
            .arg(ttl_secs)
            .query_async::<_, ()>(&mut conn)
            .await?;
        debug!(namespace = ?ns, ttl_secs, "cache put");
        Ok(())
    }

    async fn remove(&self, ns: CacheNamespace, key: &str) -> AppResult<()> {
        let mut conn = self.connection().await?;
        conn.del::<_, ()>(ns.key(key)).await?;
        Ok(())
    }
}
