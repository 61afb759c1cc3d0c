//! Store factory for runtime backend selection.
//!
//! Chooses the record store and the counter store from environment
//! configuration and returns them as shared trait objects.
//!
//! # Environment Variables
//!
//! - `STORAGE_MODE`: `in_memory` (default) | `postgres`
//! - `COUNTER_MODE`: `in_memory` (default) | `redis`
//! - `DATABASE_URL`: `PostgreSQL` connection URL (required when `STORAGE_MODE=postgres`)
//! - `REDIS_URL`: Redis connection URL (required when `COUNTER_MODE=redis`)
//!
//! # Example
//!
//! ```ignore
//! use infrastructure::factory::{RepositoryConfig, RepositoryFactory};
//!
//! let config = RepositoryConfig::from_env()?;
//! let repositories = RepositoryFactory::new(config).create().await?;
//!
//! let farm = repositories.farm_repository.find_by_id("f1").await?;
//! ```

use std::env;
use std::str::FromStr;
use std::sync::Arc;

use sqlx::PgPool;
use thiserror::Error;

use super::{
    CounterStore, FarmRepository, InMemoryCounterStore, InMemoryFarmRepository,
    InMemoryPondRepository, PondRepository, PostgresFarmRepository, PostgresPondRepository,
    RedisCounterStore,
};

// =============================================================================
// Configuration Types
// =============================================================================

/// Backend for farm and pond records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageMode {
    #[default]
    InMemory,
    Postgres,
}

impl FromStr for StorageMode {
    type Err = ConfigurationError;

    /// Parses a storage mode from a string.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidStorageMode` if the string is not recognized.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "in_memory" | "inmemory" | "memory" => Ok(Self::InMemory),
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            _ => Err(ConfigurationError::InvalidStorageMode(value.to_string())),
        }
    }
}

/// Backend for endpoint usage counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CounterMode {
    #[default]
    InMemory,
    Redis,
}

impl FromStr for CounterMode {
    type Err = ConfigurationError;

    /// Parses a counter mode from a string.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidCounterMode` if the string is not recognized.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "in_memory" | "inmemory" | "memory" => Ok(Self::InMemory),
            "redis" => Ok(Self::Redis),
            _ => Err(ConfigurationError::InvalidCounterMode(value.to_string())),
        }
    }
}

/// Configuration for the store factory.
///
/// Use `RepositoryConfigBuilder` for a fluent API to construct this.
#[derive(Debug, Clone, Default)]
pub struct RepositoryConfig {
    /// Backend for farm and pond records.
    pub storage_mode: StorageMode,
    /// Backend for usage counters.
    pub counter_mode: CounterMode,
    /// `PostgreSQL` connection URL (required when `storage_mode` is `Postgres`).
    pub database_url: Option<String>,
    /// Redis connection URL (required when `counter_mode` is `Redis`).
    pub redis_url: Option<String>,
}

impl RepositoryConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> RepositoryConfigBuilder {
        RepositoryConfigBuilder::default()
    }

    /// Creates a configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` if:
    /// - `STORAGE_MODE` or `COUNTER_MODE` contains an invalid value
    /// - `DATABASE_URL` is missing when `STORAGE_MODE=postgres`
    /// - `REDIS_URL` is missing when `COUNTER_MODE=redis`
    pub fn from_env() -> Result<Self, ConfigurationError> {
        Self::from_lookup(|name| env::var(name))
    }

    /// Creates a configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`RepositoryConfig::from_env`].
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Result<String, env::VarError>,
    ) -> Result<Self, ConfigurationError> {
        let storage_mode = match lookup("STORAGE_MODE") {
            Ok(value) => value.parse()?,
            Err(env::VarError::NotPresent) => StorageMode::default(),
            Err(env::VarError::NotUnicode(_)) => {
                return Err(ConfigurationError::InvalidStorageMode(
                    "<non-UTF-8 value>".to_string(),
                ));
            }
        };

        let counter_mode = match lookup("COUNTER_MODE") {
            Ok(value) => value.parse()?,
            Err(env::VarError::NotPresent) => CounterMode::default(),
            Err(env::VarError::NotUnicode(_)) => {
                return Err(ConfigurationError::InvalidCounterMode(
                    "<non-UTF-8 value>".to_string(),
                ));
            }
        };

        // Blank URLs count as absent
        let url = |name: &str| {
            lookup(name)
                .ok()
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let config = Self {
            storage_mode,
            counter_mode,
            database_url: url("DATABASE_URL"),
            redis_url: url("REDIS_URL"),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` if required URLs are missing for the selected modes.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.storage_mode == StorageMode::Postgres && self.database_url.is_none() {
            return Err(ConfigurationError::MissingDatabaseUrl);
        }

        if self.counter_mode == CounterMode::Redis && self.redis_url.is_none() {
            return Err(ConfigurationError::MissingRedisUrl);
        }

        Ok(())
    }
}

/// Builder for `RepositoryConfig`.
///
/// ```ignore
/// let config = RepositoryConfig::builder()
///     .storage_mode(StorageMode::Postgres)
///     .database_url("postgres://localhost/farms")
///     .counter_mode(CounterMode::Redis)
///     .redis_url("redis://localhost:6379")
///     .build()?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct RepositoryConfigBuilder {
    storage_mode: StorageMode,
    counter_mode: CounterMode,
    database_url: Option<String>,
    redis_url: Option<String>,
}

impl RepositoryConfigBuilder {
    #[must_use]
    pub const fn storage_mode(mut self, mode: StorageMode) -> Self {
        self.storage_mode = mode;
        self
    }

    #[must_use]
    pub const fn counter_mode(mut self, mode: CounterMode) -> Self {
        self.counter_mode = mode;
        self
    }

    #[must_use]
    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn redis_url(mut self, url: impl Into<String>) -> Self {
        self.redis_url = Some(url.into());
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` if the configuration is invalid.
    pub fn build(self) -> Result<RepositoryConfig, ConfigurationError> {
        let config = RepositoryConfig {
            storage_mode: self.storage_mode,
            counter_mode: self.counter_mode,
            database_url: self.database_url,
            redis_url: self.redis_url,
        };

        config.validate()?;
        Ok(config)
    }
}

// =============================================================================
// Error Types
// =============================================================================

/// Invalid or incomplete factory configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("Invalid storage mode: '{0}'. Expected 'in_memory' or 'postgres'")]
    InvalidStorageMode(String),

    #[error("Invalid counter mode: '{0}'. Expected 'in_memory' or 'redis'")]
    InvalidCounterMode(String),

    #[error("DATABASE_URL environment variable is required when STORAGE_MODE=postgres")]
    MissingDatabaseUrl,

    #[error("REDIS_URL environment variable is required when COUNTER_MODE=redis")]
    MissingRedisUrl,
}

/// Errors that can occur during factory initialization.
#[derive(Debug, Error)]
pub enum FactoryError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Database connection error: {0}")]
    DatabaseConnection(String),

    #[error("Redis connection error: {0}")]
    RedisConnection(String),
}

// =============================================================================
// Repository Factory
// =============================================================================

/// Initialized stores, shared across request handlers.
#[derive(Clone)]
pub struct Repositories {
    pub farm_repository: Arc<dyn FarmRepository + Send + Sync>,
    pub pond_repository: Arc<dyn PondRepository + Send + Sync>,
    pub counter_store: Arc<dyn CounterStore + Send + Sync>,
}

impl Repositories {
    /// All stores in memory. Used by tests and the default configuration.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            farm_repository: Arc::new(InMemoryFarmRepository::new()),
            pond_repository: Arc::new(InMemoryPondRepository::new()),
            counter_store: Arc::new(InMemoryCounterStore::new()),
        }
    }
}

impl std::fmt::Debug for Repositories {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("Repositories")
            .field("farm_repository", &"Arc<dyn FarmRepository>")
            .field("pond_repository", &"Arc<dyn PondRepository>")
            .field("counter_store", &"Arc<dyn CounterStore>")
            .finish()
    }
}

/// Creates store instances based on configuration.
#[derive(Debug, Clone)]
pub struct RepositoryFactory {
    config: RepositoryConfig,
}

impl RepositoryFactory {
    #[must_use]
    pub const fn new(config: RepositoryConfig) -> Self {
        Self { config }
    }

    /// Creates a new factory from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `FactoryError::Configuration` if environment configuration is invalid.
    pub fn from_env() -> Result<Self, FactoryError> {
        let config = RepositoryConfig::from_env()?;
        Ok(Self::new(config))
    }

    #[must_use]
    pub const fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    /// Creates all stores, connecting to external services as needed.
    ///
    /// # Errors
    ///
    /// Returns `FactoryError` if:
    /// - Database connection fails (when `storage_mode` is `Postgres`)
    /// - Redis pool creation fails (when `counter_mode` is `Redis`)
    pub async fn create(&self) -> Result<Repositories, FactoryError> {
        let (farm_repository, pond_repository): (
            Arc<dyn FarmRepository + Send + Sync>,
            Arc<dyn PondRepository + Send + Sync>,
        ) = match self.config.storage_mode {
            StorageMode::InMemory => (
                Arc::new(InMemoryFarmRepository::new()),
                Arc::new(InMemoryPondRepository::new()),
            ),
            StorageMode::Postgres => {
                let pool = self.create_postgres_pool().await?;
                (
                    Arc::new(PostgresFarmRepository::new(pool.clone())),
                    Arc::new(PostgresPondRepository::new(pool)),
                )
            }
        };

        let counter_store: Arc<dyn CounterStore + Send + Sync> = match self.config.counter_mode {
            CounterMode::InMemory => Arc::new(InMemoryCounterStore::new()),
            CounterMode::Redis => Arc::new(self.create_redis_counter_store()?),
        };

        Ok(Repositories {
            farm_repository,
            pond_repository,
            counter_store,
        })
    }

    async fn create_postgres_pool(&self) -> Result<PgPool, FactoryError> {
        let database_url = self
            .config
            .database_url
            .as_ref()
            .ok_or(ConfigurationError::MissingDatabaseUrl)?;

        PgPool::connect(database_url)
            .await
            .map_err(|error| FactoryError::DatabaseConnection(error.to_string()))
    }

    fn create_redis_counter_store(&self) -> Result<RedisCounterStore, FactoryError> {
        let redis_url = self
            .config
            .redis_url
            .as_ref()
            .ok_or(ConfigurationError::MissingRedisUrl)?;

        RedisCounterStore::from_url(redis_url)
            .map_err(|error| FactoryError::RedisConnection(error.to_string()))
    }
}
