//! In-memory store implementations.
//!
//! These implementations are suitable for development and testing.
//!
//! # Features
//!
//! - Thread-safe with `Arc<RwLock<...>>`
//! - Insert checks uniqueness under the write lock
//! - Listing filters active rows, sorts by the requested key (ties broken by
//!   id) and slices by offset and limit
//! - Approximate distinct sets backed by [`HyperLogLog`]

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tokio::sync::RwLock;

use super::counter::CounterStore;
use super::hyperloglog::HyperLogLog;
use super::repository::{
    FarmFilter, FarmRepository, PondFilter, PondRepository, RepositoryError, RepositoryFuture,
};
use crate::domain::{Farm, Pagination, Pond, SortKey, SortOrder, Timestamp};

// =============================================================================
// Listing Helpers
// =============================================================================

/// Fields the in-memory stores sort by.
trait Sortable {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn created_at(&self) -> Timestamp;
    fn updated_at(&self) -> Timestamp;
}

impl Sortable for Farm {
    fn id(&self) -> &str {
        &self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn created_at(&self) -> Timestamp {
        self.created_at
    }
    fn updated_at(&self) -> Timestamp {
        self.updated_at
    }
}

impl Sortable for Pond {
    fn id(&self) -> &str {
        &self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn created_at(&self) -> Timestamp {
        self.created_at
    }
    fn updated_at(&self) -> Timestamp {
        self.updated_at
    }
}

fn compare<T: Sortable>(left: &T, right: &T, sort: SortKey) -> Ordering {
    let primary = match sort {
        SortKey::Id => Ordering::Equal,
        SortKey::Name => left.name().cmp(right.name()),
        SortKey::CreatedAt => left.created_at().cmp(&right.created_at()),
        SortKey::UpdatedAt => left.updated_at().cmp(&right.updated_at()),
    };
    primary.then_with(|| left.id().cmp(right.id()))
}

/// Sorts the matching rows and cuts out the requested page.
fn select_page<T: Sortable>(mut rows: Vec<T>, pagination: &Pagination) -> Vec<T> {
    rows.sort_by(|left, right| {
        let ordering = compare(left, right, pagination.sort);
        match pagination.order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    });

    let offset = usize::try_from(pagination.offset()).unwrap_or(usize::MAX);
    let limit = usize::try_from(pagination.limit()).unwrap_or(usize::MAX);
    rows.into_iter().skip(offset).take(limit).collect()
}

// =============================================================================
// In-Memory Farm Repository
// =============================================================================

/// In-memory implementation of `FarmRepository`.
///
/// # Example
///
/// ```ignore
/// use infrastructure::in_memory::InMemoryFarmRepository;
///
/// let repository = InMemoryFarmRepository::new();
/// let farm = Farm::new("f1", "North", "fields", Timestamp::now());
///
/// repository.insert(&farm).await?;
/// let found = repository.find_by_id("f1").await?;
/// ```
#[derive(Debug, Clone)]
pub struct InMemoryFarmRepository {
    farms: Arc<RwLock<BTreeMap<String, Farm>>>,
}

impl InMemoryFarmRepository {
    /// Creates a new empty in-memory farm repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            farms: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }
}

impl Default for InMemoryFarmRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl FarmRepository for InMemoryFarmRepository {
    fn insert(&self, farm: &Farm) -> RepositoryFuture<()> {
        let farms = Arc::clone(&self.farms);
        let farm = farm.clone();
        Box::pin(async move {
            let mut guard = farms.write().await;
            if guard.contains_key(&farm.id) {
                return Err(RepositoryError::Duplicate(farm.id));
            }
            guard.insert(farm.id.clone(), farm);
            Ok(())
        })
    }

    fn find_by_id(&self, id: &str) -> RepositoryFuture<Option<Farm>> {
        let farms = Arc::clone(&self.farms);
        let id = id.to_string();
        Box::pin(async move {
            let guard = farms.read().await;
            Ok(guard.get(&id).cloned())
        })
    }

    fn find_many(
        &self,
        filter: &FarmFilter,
        pagination: &Pagination,
    ) -> RepositoryFuture<Vec<Farm>> {
        let farms = Arc::clone(&self.farms);
        let filter = filter.clone();
        let pagination = *pagination;
        Box::pin(async move {
            let matching: Vec<Farm> = {
                let guard = farms.read().await;
                guard
                    .values()
                    .filter(|farm| !farm.is_deleted() && filter.matches(farm))
                    .cloned()
                    .collect()
            };
            Ok(select_page(matching, &pagination))
        })
    }

    fn count(&self, filter: &FarmFilter) -> RepositoryFuture<u64> {
        let farms = Arc::clone(&self.farms);
        let filter = filter.clone();
        Box::pin(async move {
            let guard = farms.read().await;
            let count = guard
                .values()
                .filter(|farm| !farm.is_deleted() && filter.matches(farm))
                .count();
            Ok(count as u64)
        })
    }

    fn save(&self, farm: &Farm) -> RepositoryFuture<()> {
        let farms = Arc::clone(&self.farms);
        let farm = farm.clone();
        Box::pin(async move {
            farms.write().await.insert(farm.id.clone(), farm);
            Ok(())
        })
    }
}

// =============================================================================
// In-Memory Pond Repository
// =============================================================================

/// In-memory implementation of `PondRepository`.
#[derive(Debug, Clone)]
pub struct InMemoryPondRepository {
    ponds: Arc<RwLock<BTreeMap<String, Pond>>>,
}

impl InMemoryPondRepository {
    /// Creates a new empty in-memory pond repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            ponds: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }
}

impl Default for InMemoryPondRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl PondRepository for InMemoryPondRepository {
    fn insert(&self, pond: &Pond) -> RepositoryFuture<()> {
        let ponds = Arc::clone(&self.ponds);
        let pond = pond.clone();
        Box::pin(async move {
            let mut guard = ponds.write().await;
            if guard.contains_key(&pond.id) {
                return Err(RepositoryError::Duplicate(pond.id));
            }
            guard.insert(pond.id.clone(), pond);
            Ok(())
        })
    }

    fn find_by_id(&self, id: &str) -> RepositoryFuture<Option<Pond>> {
        let ponds = Arc::clone(&self.ponds);
        let id = id.to_string();
        Box::pin(async move { Ok(ponds.read().await.get(&id).cloned()) })
    }

    fn find_many(
        &self,
        filter: &PondFilter,
        pagination: &Pagination,
    ) -> RepositoryFuture<Vec<Pond>> {
        let ponds = Arc::clone(&self.ponds);
        let filter = filter.clone();
        let pagination = *pagination;
        Box::pin(async move {
            let matching: Vec<Pond> = {
                let guard = ponds.read().await;
                guard
                    .values()
                    .filter(|pond| !pond.is_deleted() && filter.matches(pond))
                    .cloned()
                    .collect()
            };
            Ok(select_page(matching, &pagination))
        })
    }

    fn count(&self, filter: &PondFilter) -> RepositoryFuture<u64> {
        let ponds = Arc::clone(&self.ponds);
        let filter = filter.clone();
        Box::pin(async move {
            let guard = ponds.read().await;
            let count = guard
                .values()
                .filter(|pond| !pond.is_deleted() && filter.matches(pond))
                .count();
            Ok(count as u64)
        })
    }

    fn save(&self, pond: &Pond) -> RepositoryFuture<()> {
        let ponds = Arc::clone(&self.ponds);
        let pond = pond.clone();
        Box::pin(async move {
            ponds.write().await.insert(pond.id.clone(), pond);
            Ok(())
        })
    }
}

// =============================================================================
// In-Memory Counter Store
// =============================================================================

#[derive(Debug, Default)]
struct CounterState {
    counters: HashMap<String, i64>,
    sketches: HashMap<String, HyperLogLog>,
}

/// In-memory implementation of `CounterStore`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCounterStore {
    state: Arc<RwLock<CounterState>>,
}

impl InMemoryCounterStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl CounterStore for InMemoryCounterStore {
    fn increment(&self, key: &str, delta: i64) -> RepositoryFuture<i64> {
        let state = Arc::clone(&self.state);
        let key = key.to_string();
        Box::pin(async move {
            let mut guard = state.write().await;
            let counter = guard.counters.entry(key).or_insert(0);
            *counter = counter.saturating_add(delta);
            Ok(*counter)
        })
    }

    fn add_to_approx_set(&self, key: &str, element: &str) -> RepositoryFuture<()> {
        let state = Arc::clone(&self.state);
        let key = key.to_string();
        let element = element.to_string();
        Box::pin(async move {
            let mut guard = state.write().await;
            guard
                .sketches
                .entry(key)
                .or_default()
                .insert(element.as_bytes());
            Ok(())
        })
    }

    fn approx_set_cardinality(&self, key: &str) -> RepositoryFuture<u64> {
        let state = Arc::clone(&self.state);
        let key = key.to_string();
        Box::pin(async move {
            let guard = state.read().await;
            Ok(guard.sketches.get(&key).map_or(0, HyperLogLog::count))
        })
    }

    fn get(&self, key: &str) -> RepositoryFuture<Option<i64>> {
        let state = Arc::clone(&self.state);
        let key = key.to_string();
        Box::pin(async move { Ok(state.read().await.counters.get(&key).copied()) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn farm(id: &str, name: &str) -> Farm {
        Farm::new(id, name, "description", Timestamp::now())
    }

    async fn seeded_farms(ids: &[&str]) -> InMemoryFarmRepository {
        let repository = InMemoryFarmRepository::new();
        for id in ids {
            repository.insert(&farm(id, &format!("name-{id}"))).await.unwrap();
        }
        repository
    }

    #[rstest]
    #[tokio::test]
    async fn test_insert_then_find_by_id() {
        let repository = InMemoryFarmRepository::new();
        let created = farm("f1", "North");

        repository.insert(&created).await.unwrap();

        let found = repository.find_by_id("f1").await.unwrap();
        assert_eq!(found, Some(created));
    }

    #[rstest]
    #[tokio::test]
    async fn test_insert_duplicate_fails() {
        let repository = seeded_farms(&["f1"]).await;

        let result = repository.insert(&farm("f1", "Other")).await;

        assert_eq!(result, Err(RepositoryError::Duplicate("f1".to_string())));
    }

    #[rstest]
    #[tokio::test]
    async fn test_find_by_id_includes_deleted() {
        let repository = seeded_farms(&["f1"]).await;
        let deleted = farm("f1", "name-f1").soft_deleted(Timestamp::now());
        repository.save(&deleted).await.unwrap();

        let found = repository.find_by_id("f1").await.unwrap();
        assert!(found.is_some_and(|farm| farm.is_deleted()));
    }

    #[rstest]
    #[tokio::test]
    async fn test_find_many_and_count_skip_deleted() {
        let repository = seeded_farms(&["f1", "f2", "f3"]).await;
        repository
            .save(&farm("f2", "name-f2").soft_deleted(Timestamp::now()))
            .await
            .unwrap();

        let filter = FarmFilter::default();
        let listed = repository
            .find_many(&filter, &Pagination::default())
            .await
            .unwrap();
        let count = repository.count(&filter).await.unwrap();

        let ids: Vec<_> = listed.iter().map(|farm| farm.id.as_str()).collect();
        assert_eq!(ids, vec!["f1", "f3"]);
        assert_eq!(count, 2);
    }

    #[rstest]
    #[tokio::test]
    async fn test_find_many_pages_in_id_order() {
        let ids: Vec<String> = (1..=25).map(|index| format!("f{index:02}")).collect();
        let id_refs: Vec<&str> = ids.iter().map(String::as_str).collect();
        let repository = seeded_farms(&id_refs).await;

        let page = repository
            .find_many(&FarmFilter::default(), &Pagination::new(3, 10))
            .await
            .unwrap();

        let listed: Vec<_> = page.iter().map(|farm| farm.id.as_str()).collect();
        assert_eq!(listed, vec!["f21", "f22", "f23", "f24", "f25"]);
    }

    #[rstest]
    #[tokio::test]
    async fn test_find_many_sorts_by_name_descending() {
        let repository = InMemoryFarmRepository::new();
        for (id, name) in [("a", "Beta"), ("b", "Alpha"), ("c", "Gamma")] {
            repository.insert(&farm(id, name)).await.unwrap();
        }

        let pagination = Pagination::default()
            .sorted_by(SortKey::Name, SortOrder::Descending);
        let listed = repository
            .find_many(&FarmFilter::default(), &pagination)
            .await
            .unwrap();

        let names: Vec<_> = listed.iter().map(|farm| farm.name.as_str()).collect();
        assert_eq!(names, vec!["Gamma", "Beta", "Alpha"]);
    }

    #[rstest]
    #[tokio::test]
    async fn test_pond_filter_by_owner() {
        let repository = InMemoryPondRepository::new();
        for (id, farm_id) in [("p1", "f1"), ("p2", "f2"), ("p3", "f1")] {
            repository
                .insert(&Pond::new(id, farm_id, "Koi", "deep", Timestamp::now()))
                .await
                .unwrap();
        }

        let filter = PondFilter {
            farm_id: Some("f1".to_string()),
            ..PondFilter::default()
        };
        let listed = repository
            .find_many(&filter, &Pagination::default())
            .await
            .unwrap();

        let ids: Vec<_> = listed.iter().map(|pond| pond.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p3"]);
        assert_eq!(repository.count(&filter).await.unwrap(), 2);
    }

    #[rstest]
    #[tokio::test]
    async fn test_counter_store_increment_and_get() {
        let store = InMemoryCounterStore::new();

        assert_eq!(store.get("GET /v1/farm").await.unwrap(), None);
        assert_eq!(store.increment("GET /v1/farm", 1).await.unwrap(), 1);
        assert_eq!(store.increment("GET /v1/farm", 1).await.unwrap(), 2);
        assert_eq!(store.get("GET /v1/farm").await.unwrap(), Some(2));
    }

    #[rstest]
    #[tokio::test]
    async fn test_counter_store_approx_set() {
        let store = InMemoryCounterStore::new();

        assert_eq!(store.approx_set_cardinality("key").await.unwrap(), 0);
        for agent in ["a", "b", "a", "c", "b"] {
            store.add_to_approx_set("key", agent).await.unwrap();
        }
        assert_eq!(store.approx_set_cardinality("key").await.unwrap(), 3);
    }
}
