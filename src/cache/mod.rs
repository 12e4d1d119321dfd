//! Expiring key-value storage for verification codes and email tokens.

mod memory;
mod redis_cache;

pub use memory::MemoryCache;
pub use redis_cache::RedisCache;

use crate::error::AppResult;
use async_trait::async_trait;
use std::time::Duration;

/// Logical namespaces held by the cache store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheNamespace {
    /// Recipient address -> 6-digit code.
    VerificationCode,
    /// Token -> verified email address.
    Token,
}

impl CacheNamespace {
    pub fn prefix(&self) -> &'static str {
        match self {
            CacheNamespace::VerificationCode => "signup:code:",
            CacheNamespace::Token => "signup:token:",
        }
    }

    pub fn key(&self, key: &str) -> String {
        format!("{}{}", self.prefix(), key)
    }
}

/// Entry lifetimes per namespace.
#[derive(Debug, Clone, Copy)]
pub struct CacheTtl {
    pub code: Duration,
    pub token: Duration,
}

impl CacheTtl {
    pub fn new(code: Duration, token: Duration) -> Self {
        Self { code, token }
    }

    pub fn for_namespace(&self, ns: CacheNamespace) -> Duration {
        match ns {
            CacheNamespace::VerificationCode => self.code,
            CacheNamespace::Token => self.token,
        }
    }
}

impl Default for CacheTtl {
    fn default() -> Self {
        Self {
            code: Duration::from_secs(600),
            token: Duration::from_secs(1800),
        }
    }
}

/// Cache store shared by all requests. Entries expire after their namespace TTL.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, ns: CacheNamespace, key: &str) -> AppResult<Option<String>>;

    /// Insert or overwrite; the entry's TTL restarts.
    async fn put(&self, ns: CacheNamespace, key: &str, value: &str) -> AppResult<()>;

    async fn remove(&self, ns: CacheNamespace, key: &str) -> AppResult<()>;
}
