//! Farm lifecycle operations.

use std::sync::Arc;

use super::error::ServiceError;
use crate::domain::{CreateFarm, Farm, Page, Pagination, Timestamp, UpdateFarm, Validate};
use crate::infrastructure::{FarmFilter, FarmRepository, RepositoryError};

/// Create, read, list, upsert and soft-delete for farms.
#[derive(Clone)]
pub struct FarmService {
    repository: Arc<dyn FarmRepository + Send + Sync>,
}

impl std::fmt::Debug for FarmService {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("FarmService")
            .field("repository", &"Arc<dyn FarmRepository>")
            .finish()
    }
}

impl FarmService {
    #[must_use]
    pub fn new(repository: Arc<dyn FarmRepository + Send + Sync>) -> Self {
        Self { repository }
    }

    /// Creates a farm from trimmed input.
    ///
    /// # Errors
    ///
    /// - `ServiceError::Validation` if a field rule fails
    /// - `ServiceError::FarmAlreadyExists` if the id is taken, including by a
    ///   soft-deleted farm
    /// - `ServiceError::Repository` for any other store failure
    pub async fn create(&self, command: CreateFarm) -> Result<Farm, ServiceError> {
        let farm = Farm::new(
            &command.id,
            &command.name,
            &command.description,
            Timestamp::now(),
        );
        self.insert_new(farm).await
    }

    /// Returns the farm with `id`, or `None` if it does not exist or is deleted.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the store fails.
    pub async fn get_by_id(&self, id: &str) -> Result<Option<Farm>, ServiceError> {
        let farm = self.repository.find_by_id(id.trim()).await?;
        Ok(farm.filter(|farm| !farm.is_deleted()))
    }

    /// Lists active farms matching `filter`.
    ///
    /// The count runs before the fetch; a concurrent write between the two
    /// can make the page metadata disagree with the returned rows.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the store fails.
    pub async fn list(
        &self,
        filter: &FarmFilter,
        pagination: &Pagination,
    ) -> Result<Page<Farm>, ServiceError> {
        let total_rows = self.repository.count(filter).await?;
        let farms = self.repository.find_many(filter, pagination).await?;
        Ok(Page::new(farms, pagination, total_rows))
    }

    /// Updates the farm with `id`, creating it if no active farm has that id.
    ///
    /// # Errors
    ///
    /// - `ServiceError::Validation` if a field rule fails
    /// - `ServiceError::FarmAlreadyExists` if `id` belongs to a soft-deleted farm
    /// - `ServiceError::Repository` for any other store failure
    pub async fn update(&self, id: &str, command: UpdateFarm) -> Result<Farm, ServiceError> {
        match self.get_by_id(id).await? {
            None => {
                self.create(CreateFarm {
                    id: id.to_string(),
                    name: command.name,
                    description: command.description,
                })
                .await
            }
            Some(existing) => self.modify(existing, command).await,
        }
    }

    /// Soft-deletes the farm with `id`. Deleting a deleted farm is a no-op.
    ///
    /// # Errors
    ///
    /// - `ServiceError::FarmNotFound` if no farm row has that id
    /// - `ServiceError::Repository` for any other store failure
    pub async fn soft_delete(&self, id: &str) -> Result<(), ServiceError> {
        let Some(farm) = self.repository.find_by_id(id.trim()).await? else {
            return Err(ServiceError::FarmNotFound(id.trim().to_string()));
        };

        if farm.is_deleted() {
            return Ok(());
        }

        self.repository
            .save(&farm.soft_deleted(Timestamp::now()))
            .await?;
        Ok(())
    }

    async fn insert_new(&self, farm: Farm) -> Result<Farm, ServiceError> {
        farm.validate()?;

        self.repository
            .insert(&farm)
            .await
            .map_err(|error| match error {
                RepositoryError::Duplicate(_) => ServiceError::FarmAlreadyExists(farm.id.clone()),
                other => ServiceError::Repository(other),
            })?;

        Ok(farm)
    }

    async fn modify(&self, existing: Farm, command: UpdateFarm) -> Result<Farm, ServiceError> {
        let farm = existing.with_details(&command.name, &command.description, Timestamp::now());
        farm.validate()?;
        self.repository.save(&farm).await?;
        Ok(farm)
    }
}
