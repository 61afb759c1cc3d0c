//! Per-endpoint usage counting.

use std::sync::Arc;

use futures::future::try_join_all;

use super::error::ServiceError;
use crate::domain::{ApiEndpoint, ApiStatistic};
use crate::infrastructure::CounterStore;

/// Records endpoint calls and reports call counts with distinct-caller
/// estimates.
#[derive(Clone)]
pub struct ApiStatisticService {
    store: Arc<dyn CounterStore + Send + Sync>,
}

impl std::fmt::Debug for ApiStatisticService {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("ApiStatisticService")
            .field("store", &"Arc<dyn CounterStore>")
            .finish()
    }
}

impl ApiStatisticService {
    #[must_use]
    pub fn new(store: Arc<dyn CounterStore + Send + Sync>) -> Self {
        Self { store }
    }

    /// Counts one call of `endpoint` by `caller`.
    ///
    /// The counter increment and the distinct-set insert are independent:
    /// both are attempted even if one fails, and there is no rollback.
    ///
    /// # Errors
    ///
    /// Returns the increment failure if any, otherwise the insert failure.
    pub async fn record_call(
        &self,
        endpoint: ApiEndpoint,
        caller: &str,
    ) -> Result<(), ServiceError> {
        let unique_caller_key = endpoint.unique_caller_key();
        let (incremented, added) = futures::join!(
            self.store.increment(endpoint.counter_key(), 1),
            self.store.add_to_approx_set(&unique_caller_key, caller),
        );

        incremented?;
        added?;
        Ok(())
    }

    /// Statistics of one endpoint. A never-called endpoint reports 0 and 0.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the counter store fails.
    pub async fn statistic(&self, endpoint: ApiEndpoint) -> Result<ApiStatistic, ServiceError> {
        let unique_caller_key = endpoint.unique_caller_key();
        let (count, unique_callers) = futures::try_join!(
            self.store.get(endpoint.counter_key()),
            self.store.approx_set_cardinality(&unique_caller_key),
        )?;

        Ok(ApiStatistic::new(
            endpoint,
            count.unwrap_or(0),
            unique_callers,
        ))
    }

    /// Statistics of every endpoint, in catalogue order.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the counter store fails.
    pub async fn statistics(&self) -> Result<Vec<ApiStatistic>, ServiceError> {
        try_join_all(
            ApiEndpoint::ALL
                .into_iter()
                .map(|endpoint| self.statistic(endpoint)),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::{InMemoryCounterStore, RepositoryError, RepositoryFuture};
    use rstest::{fixture, rstest};

    #[fixture]
    fn service() -> ApiStatisticService {
        ApiStatisticService::new(Arc::new(InMemoryCounterStore::new()))
    }

    #[rstest]
    #[tokio::test]
    async fn test_ten_calls_from_three_callers(service: ApiStatisticService) {
        let callers = ["curl/8.0", "Mozilla/5.0", "PostmanRuntime/7.36"];
        for index in 0..10 {
            service
                .record_call(ApiEndpoint::ListFarms, callers[index % callers.len()])
                .await
                .unwrap();
        }

        let statistic = service.statistic(ApiEndpoint::ListFarms).await.unwrap();

        assert_eq!(statistic.path, "GET /v1/farm");
        assert_eq!(statistic.count, 10);
        assert_eq!(statistic.unique_callers, 3);
    }

    #[rstest]
    #[tokio::test]
    async fn test_unknown_endpoint_reports_zero(service: ApiStatisticService) {
        let statistic = service.statistic(ApiEndpoint::DeletePond).await.unwrap();
        assert_eq!(statistic.count, 0);
        assert_eq!(statistic.unique_callers, 0);
    }

    #[rstest]
    #[tokio::test]
    async fn test_statistics_cover_catalogue_in_order(service: ApiStatisticService) {
        service
            .record_call(ApiEndpoint::GetPond, "agent")
            .await
            .unwrap();

        let statistics = service.statistics().await.unwrap();

        let paths: Vec<_> = statistics.iter().map(|s| s.path.as_str()).collect();
        let expected: Vec<_> = ApiEndpoint::ALL.iter().map(|e| e.path()).collect();
        assert_eq!(paths, expected);
        let get_pond = statistics
            .iter()
            .find(|s| s.path == "GET /v1/pond/{id}")
            .unwrap();
        assert_eq!(get_pond.count, 1);
        assert_eq!(get_pond.unique_callers, 1);
    }

    /// Counter store whose increments always fail.
    struct FailingIncrement {
        inner: InMemoryCounterStore,
    }

    impl CounterStore for FailingIncrement {
        fn increment(&self, _key: &str, _delta: i64) -> RepositoryFuture<i64> {
            Box::pin(async { Err(RepositoryError::CacheError("down".to_string())) })
        }
        fn add_to_approx_set(&self, key: &str, element: &str) -> RepositoryFuture<()> {
            self.inner.add_to_approx_set(key, element)
        }
        fn approx_set_cardinality(&self, key: &str) -> RepositoryFuture<u64> {
            self.inner.approx_set_cardinality(key)
        }
        fn get(&self, key: &str) -> RepositoryFuture<Option<i64>> {
            self.inner.get(key)
        }
    }

    #[rstest]
    #[tokio::test]
    async fn test_failed_increment_still_records_caller() {
        let service = ApiStatisticService::new(Arc::new(FailingIncrement {
            inner: InMemoryCounterStore::new(),
        }));

        let result = service.record_call(ApiEndpoint::CreateFarm, "agent").await;
        let statistic = service.statistic(ApiEndpoint::CreateFarm).await.unwrap();

        assert_eq!(
            result,
            Err(ServiceError::Repository(RepositoryError::CacheError(
                "down".to_string()
            )))
        );
        assert_eq!(statistic.count, 0);
        assert_eq!(statistic.unique_callers, 1);
    }

    /// Counter store whose distinct-set inserts always fail.
    struct FailingApproxSet {
        inner: InMemoryCounterStore,
    }

    impl CounterStore for FailingApproxSet {
        fn increment(&self, key: &str, delta: i64) -> RepositoryFuture<i64> {
            self.inner.increment(key, delta)
        }
        fn add_to_approx_set(&self, _key: &str, _element: &str) -> RepositoryFuture<()> {
            Box::pin(async { Err(RepositoryError::CacheError("pfadd down".to_string())) })
        }
        fn approx_set_cardinality(&self, key: &str) -> RepositoryFuture<u64> {
            self.inner.approx_set_cardinality(key)
        }
        fn get(&self, key: &str) -> RepositoryFuture<Option<i64>> {
            self.inner.get(key)
        }
    }

    #[rstest]
    #[tokio::test]
    async fn test_failed_caller_insert_still_counts_call() {
        let service = ApiStatisticService::new(Arc::new(FailingApproxSet {
            inner: InMemoryCounterStore::new(),
        }));

        let result = service.record_call(ApiEndpoint::ListPonds, "agent").await;
        let statistic = service.statistic(ApiEndpoint::ListPonds).await.unwrap();

        assert_eq!(
            result,
            Err(ServiceError::Repository(RepositoryError::CacheError(
                "pfadd down".to_string()
            )))
        );
        assert_eq!(statistic.count, 1);
        assert_eq!(statistic.unique_callers, 0);
    }
}
