//! Infrastructure module for external services.
//!
//! This module contains the record store and counter store traits and their
//! in-memory, `PostgreSQL` and Redis implementations.

pub mod counter;
pub mod factory;
pub mod hyperloglog;
pub mod in_memory;
pub mod postgres;
pub mod redis;
pub mod repository;

pub use counter::CounterStore;
pub use factory::{
    ConfigurationError, CounterMode, FactoryError, Repositories, RepositoryConfig,
    RepositoryConfigBuilder, RepositoryFactory, StorageMode,
};
pub use hyperloglog::HyperLogLog;
pub use in_memory::{InMemoryCounterStore, InMemoryFarmRepository, InMemoryPondRepository};
pub use postgres::{PostgresFarmRepository, PostgresPondRepository};
pub use redis::RedisCounterStore;
pub use repository::{
    FarmFilter, FarmRepository, PondFilter, PondRepository, RepositoryError, RepositoryFuture,
};
