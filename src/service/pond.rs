//! Pond lifecycle operations.
//!
//! Create and update first resolve the owning farm through [`FarmService`];
//! a missing or deleted farm stops the operation before validation or any
//! write. The check and the following insert are two separate calls, so a
//! farm deleted in between is not detected.

use std::sync::Arc;

use super::error::ServiceError;
use super::farm::FarmService;
use crate::domain::{CreatePond, Page, Pagination, Pond, Timestamp, UpdatePond, Validate};
use crate::infrastructure::{PondFilter, PondRepository, RepositoryError};

/// Create, read, list, upsert and soft-delete for ponds.
#[derive(Clone)]
pub struct PondService {
    repository: Arc<dyn PondRepository + Send + Sync>,
    farms: FarmService,
}

impl std::fmt::Debug for PondService {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("PondService")
            .field("repository", &"Arc<dyn PondRepository>")
            .field("farms", &self.farms)
            .finish()
    }
}

impl PondService {
    #[must_use]
    pub fn new(repository: Arc<dyn PondRepository + Send + Sync>, farms: FarmService) -> Self {
        Self { repository, farms }
    }

    /// Creates a pond under an existing farm.
    ///
    /// # Errors
    ///
    /// - `ServiceError::ReferencedFarmNotFound` if the owning farm is missing or deleted
    /// - `ServiceError::Validation` if a field rule fails
    /// - `ServiceError::PondAlreadyExists` if the id is taken
    /// - `ServiceError::Repository` for any other store failure
    pub async fn create(&self, command: CreatePond) -> Result<Pond, ServiceError> {
        self.ensure_farm_exists(&command.farm_id).await?;
        self.insert_new(Pond::new(
            &command.id,
            &command.farm_id,
            &command.name,
            &command.description,
            Timestamp::now(),
        ))
        .await
    }

    /// Returns the pond with `id`, or `None` if it does not exist or is deleted.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the store fails.
    pub async fn get_by_id(&self, id: &str) -> Result<Option<Pond>, ServiceError> {
        let pond = self.repository.find_by_id(id.trim()).await?;
        Ok(pond.filter(|pond| !pond.is_deleted()))
    }

    /// Lists active ponds matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the store fails.
    pub async fn list(
        &self,
        filter: &PondFilter,
        pagination: &Pagination,
    ) -> Result<Page<Pond>, ServiceError> {
        let total_rows = self.repository.count(filter).await?;
        let ponds = self.repository.find_many(filter, pagination).await?;
        Ok(Page::new(ponds, pagination, total_rows))
    }

    /// Updates the pond with `id`, creating it if no active pond has that id.
    ///
    /// The created pond keeps the supplied owning farm.
    ///
    /// # Errors
    ///
    /// Same as [`PondService::create`].
    pub async fn update(&self, id: &str, command: UpdatePond) -> Result<Pond, ServiceError> {
        self.ensure_farm_exists(&command.farm_id).await?;

        match self.get_by_id(id).await? {
            None => {
                self.insert_new(Pond::new(
                    id,
                    &command.farm_id,
                    &command.name,
                    &command.description,
                    Timestamp::now(),
                ))
                .await
            }
            Some(existing) => {
                let pond = existing.with_details(
                    &command.farm_id,
                    &command.name,
                    &command.description,
                    Timestamp::now(),
                );
                pond.validate()?;
                self.repository.save(&pond).await?;
                Ok(pond)
            }
        }
    }

    /// Soft-deletes the pond with `id`. Deleting a deleted pond is a no-op.
    ///
    /// # Errors
    ///
    /// - `ServiceError::PondNotFound` if no pond row has that id
    /// - `ServiceError::Repository` for any other store failure
    pub async fn soft_delete(&self, id: &str) -> Result<(), ServiceError> {
        let Some(pond) = self.repository.find_by_id(id.trim()).await? else {
            return Err(ServiceError::PondNotFound(id.trim().to_string()));
        };

        if !pond.is_deleted() {
            self.repository
                .save(&pond.soft_deleted(Timestamp::now()))
                .await?;
        }
        Ok(())
    }

    async fn ensure_farm_exists(&self, farm_id: &str) -> Result<(), ServiceError> {
        match self.farms.get_by_id(farm_id).await? {
            Some(_) => Ok(()),
            None => Err(ServiceError::ReferencedFarmNotFound(
                farm_id.trim().to_string(),
            )),
        }
    }

    async fn insert_new(&self, pond: Pond) -> Result<Pond, ServiceError> {
        pond.validate()?;

        self.repository
            .insert(&pond)
            .await
            .map_err(|error| match error {
                RepositoryError::Duplicate(_) => ServiceError::PondAlreadyExists(pond.id.clone()),
                other => ServiceError::Repository(other),
            })?;

        Ok(pond)
    }
}
