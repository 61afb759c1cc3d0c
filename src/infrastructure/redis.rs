//! Redis counter store implementation.
//!
//! Uses `deadpool-redis` for connection pooling.
//!
//! # Key Design
//!
//! - Call counter: `{METHOD} {route}` -> integer (`INCRBY`, `GET`)
//! - Distinct callers: `{METHOD} {route}ua` -> HyperLogLog (`PFADD`, `PFCOUNT`)
//!
//! Reading a missing key yields `None` or a cardinality of 0.

use deadpool_redis::{Config, Pool, Runtime};
use redis::AsyncCommands;

use super::counter::CounterStore;
use super::repository::{RepositoryError, RepositoryFuture};

fn cache_error(error: &impl std::fmt::Display) -> RepositoryError {
    RepositoryError::CacheError(error.to_string())
}

/// Redis implementation of `CounterStore`.
///
/// # Example
///
/// ```ignore
/// use infrastructure::redis::RedisCounterStore;
///
/// let store = RedisCounterStore::from_url("redis://localhost:6379")?;
/// store.increment("GET /v1/farm", 1).await?;
/// let count = store.get("GET /v1/farm").await?;
/// ```
#[derive(Debug, Clone)]
pub struct RedisCounterStore {
    /// Connection pool for Redis.
    pool: Pool,
}

impl RedisCounterStore {
    /// Creates a new Redis counter store with the given connection pool.
    #[must_use]
    pub const fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Creates a new Redis counter store from a Redis URL.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::CacheError` if the pool cannot be created.
    pub fn from_url(redis_url: &str) -> Result<Self, RepositoryError> {
        let config = Config::from_url(redis_url);
        let pool = config
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|error| cache_error(&error))?;
        Ok(Self { pool })
    }
}

#[allow(clippy::significant_drop_tightening)]
impl CounterStore for RedisCounterStore {
    fn increment(&self, key: &str, delta: i64) -> RepositoryFuture<i64> {
        let pool = self.pool.clone();
        let key = key.to_string();
        Box::pin(async move {
            let mut connection = pool.get().await.map_err(|error| cache_error(&error))?;

            connection
                .incr(&key, delta)
                .await
                .map_err(|error| cache_error(&error))
        })
    }

    fn add_to_approx_set(&self, key: &str, element: &str) -> RepositoryFuture<()> {
        let pool = self.pool.clone();
        let key = key.to_string();
        let element = element.to_string();
        Box::pin(async move {
            let mut connection = pool.get().await.map_err(|error| cache_error(&error))?;

            let _changed: bool = connection
                .pfadd(&key, &element)
                .await
                .map_err(|error| cache_error(&error))?;
            Ok(())
        })
    }

    fn approx_set_cardinality(&self, key: &str) -> RepositoryFuture<u64> {
        let pool = self.pool.clone();
        let key = key.to_string();
        Box::pin(async move {
            let mut connection = pool.get().await.map_err(|error| cache_error(&error))?;

            connection
                .pfcount(&key)
                .await
                .map_err(|error| cache_error(&error))
        })
    }

    fn get(&self, key: &str) -> RepositoryFuture<Option<i64>> {
        let pool = self.pool.clone();
        let key = key.to_string();
        Box::pin(async move {
            let mut connection = pool.get().await.map_err(|error| cache_error(&error))?;

            connection
                .get(&key)
                .await
                .map_err(|error| cache_error(&error))
        })
    }
}
