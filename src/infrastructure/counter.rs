//! Counter store trait used for endpoint usage statistics.

use super::repository::RepositoryFuture;

/// Key-value store of integer counters and approximate distinct sets.
///
/// Keys that were never written read as absent (`get`) or as an empty set
/// (`approx_set_cardinality`), never as an error.
pub trait CounterStore: Send + Sync {
    /// Adds `delta` to the counter at `key` and returns the new value.
    fn increment(&self, key: &str, delta: i64) -> RepositoryFuture<i64>;

    /// Adds an element to the approximate distinct set at `key`.
    fn add_to_approx_set(&self, key: &str, element: &str) -> RepositoryFuture<()>;

    /// Estimated number of distinct elements in the set at `key`.
    fn approx_set_cardinality(&self, key: &str) -> RepositoryFuture<u64>;

    /// Current value of the counter at `key`.
    fn get(&self, key: &str) -> RepositoryFuture<Option<i64>>;
}
