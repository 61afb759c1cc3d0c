//! `PostgreSQL` store implementations.
//!
//! This module provides `PostgreSQL`-based implementations of the record
//! store traits using `sqlx`. Listing issues the count query first and the
//! bounded fetch second, against the same filter and without a transaction.
//!
//! # Table Schema
//!
//! ```sql
//! CREATE TABLE farms (
//!     id VARCHAR(36) PRIMARY KEY,
//!     name VARCHAR(100) NOT NULL,
//!     description VARCHAR(150) NOT NULL,
//!     created_at TIMESTAMPTZ NOT NULL,
//!     updated_at TIMESTAMPTZ NOT NULL,
//!     deleted_at TIMESTAMPTZ NULL
//! );
//!
//! CREATE TABLE ponds (
//!     id VARCHAR(36) PRIMARY KEY,
//!     farm_id VARCHAR(36) NOT NULL REFERENCES farms(id),
//!     name VARCHAR(100) NOT NULL,
//!     description VARCHAR(150) NOT NULL,
//!     created_at TIMESTAMPTZ NOT NULL,
//!     updated_at TIMESTAMPTZ NOT NULL,
//!     deleted_at TIMESTAMPTZ NULL
//! );
//! CREATE INDEX idx_ponds_farm_id ON ponds(farm_id);
//! ```
//!
//! A row is active while `deleted_at IS NULL`.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::repository::{
    FarmFilter, FarmRepository, PondFilter, PondRepository, RepositoryError, RepositoryFuture,
};
use crate::domain::{Farm, Lifecycle, Pagination, Pond, Timestamp};

// =============================================================================
// Row Types
// =============================================================================

type FarmRow = (
    String,
    String,
    String,
    DateTime<Utc>,
    DateTime<Utc>,
    Option<DateTime<Utc>>,
);

type PondRow = (
    String,
    String,
    String,
    String,
    DateTime<Utc>,
    DateTime<Utc>,
    Option<DateTime<Utc>>,
);

const FARM_COLUMNS: &str = "id, name, description, created_at, updated_at, deleted_at";

const POND_COLUMNS: &str = "id, farm_id, name, description, created_at, updated_at, deleted_at";

fn farm_from_row(row: FarmRow) -> Farm {
    let (id, name, description, created_at, updated_at, deleted_at) = row;
    Farm {
        id,
        name,
        description,
        created_at: Timestamp::from_datetime(created_at),
        updated_at: Timestamp::from_datetime(updated_at),
        lifecycle: Lifecycle::from_deleted_at(deleted_at),
    }
}

fn pond_from_row(row: PondRow) -> Pond {
    let (id, farm_id, name, description, created_at, updated_at, deleted_at) = row;
    Pond {
        id,
        farm_id,
        name,
        description,
        created_at: Timestamp::from_datetime(created_at),
        updated_at: Timestamp::from_datetime(updated_at),
        lifecycle: Lifecycle::from_deleted_at(deleted_at),
    }
}

fn deleted_at(lifecycle: Lifecycle) -> Option<DateTime<Utc>> {
    lifecycle.deleted_at().map(|at| *at.as_datetime())
}

// =============================================================================
// Query Helpers
// =============================================================================

/// WHERE clause over active rows plus the values to bind, in placeholder order.
#[derive(Debug, Clone, PartialEq, Eq)]
struct WhereClause {
    sql: String,
    values: Vec<String>,
}

impl WhereClause {
    /// Builds `deleted_at IS NULL AND column = $n ...` for every present
    /// criterion.
    fn active_matching(criteria: &[(&str, Option<&String>)]) -> Self {
        let mut conditions = vec!["deleted_at IS NULL".to_string()];
        let mut values = Vec::new();

        for (column, value) in criteria {
            if let Some(value) = value {
                values.push((*value).clone());
                conditions.push(format!("{column} = ${}", values.len()));
            }
        }

        Self {
            sql: conditions.join(" AND "),
            values,
        }
    }

    /// Index of the next free placeholder.
    fn next_placeholder(&self) -> usize {
        self.values.len() + 1
    }
}

fn farm_where(filter: &FarmFilter) -> WhereClause {
    WhereClause::active_matching(&[
        ("id", filter.id.as_ref()),
        ("name", filter.name.as_ref()),
    ])
}

fn pond_where(filter: &PondFilter) -> WhereClause {
    WhereClause::active_matching(&[
        ("id", filter.id.as_ref()),
        ("farm_id", filter.farm_id.as_ref()),
        ("name", filter.name.as_ref()),
    ])
}

/// `ORDER BY ... LIMIT $n OFFSET $n+1`. The column comes from a closed enum.
fn page_clause(pagination: &Pagination, next_placeholder: usize) -> String {
    let column = pagination.sort.column();
    let direction = pagination.order.keyword();
    let tie_breaker = if column == "id" { "" } else { ", id ASC" };
    format!(
        "ORDER BY {column} {direction}{tie_breaker} LIMIT ${} OFFSET ${}",
        next_placeholder,
        next_placeholder + 1
    )
}

fn limit_and_offset(pagination: &Pagination) -> (i64, i64) {
    (
        i64::try_from(pagination.limit()).unwrap_or(i64::MAX),
        i64::try_from(pagination.offset()).unwrap_or(i64::MAX),
    )
}

fn database_error(error: &sqlx::Error) -> RepositoryError {
    RepositoryError::DatabaseError(error.to_string())
}

/// Maps an insert failure, recognising primary-key violations.
fn insert_error(error: &sqlx::Error, id: &str) -> RepositoryError {
    match error {
        sqlx::Error::Database(database) if database.is_unique_violation() => {
            RepositoryError::Duplicate(id.to_string())
        }
        other => database_error(other),
    }
}

async fn count_rows(
    pool: &PgPool,
    table: &str,
    clause: &WhereClause,
) -> Result<u64, RepositoryError> {
    let sql = format!("SELECT COUNT(*) FROM {table} WHERE {}", clause.sql);
    let mut query = sqlx::query_as::<_, (i64,)>(&sql);
    for value in &clause.values {
        query = query.bind(value);
    }

    let row = query
        .fetch_one(pool)
        .await
        .map_err(|error| database_error(&error))?;

    #[allow(clippy::cast_sign_loss)]
    Ok(row.0 as u64)
}

// =============================================================================
// PostgreSQL Farm Repository
// =============================================================================

/// `PostgreSQL` implementation of `FarmRepository`.
#[derive(Debug, Clone)]
pub struct PostgresFarmRepository {
    pool: PgPool,
}

impl PostgresFarmRepository {
    /// Creates a new `PostgreSQL` farm repository with the given connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl FarmRepository for PostgresFarmRepository {
    fn insert(&self, farm: &Farm) -> RepositoryFuture<()> {
        let pool = self.pool.clone();
        let farm = farm.clone();

        Box::pin(async move {
            sqlx::query(
                "INSERT INTO farms (id, name, description, created_at, updated_at, deleted_at) \
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(&farm.id)
            .bind(&farm.name)
            .bind(&farm.description)
            .bind(farm.created_at.as_datetime())
            .bind(farm.updated_at.as_datetime())
            .bind(deleted_at(farm.lifecycle))
            .execute(&pool)
            .await
            .map_err(|error| insert_error(&error, &farm.id))?;

            Ok(())
        })
    }

    fn find_by_id(&self, id: &str) -> RepositoryFuture<Option<Farm>> {
        let pool = self.pool.clone();
        let id = id.to_string();

        Box::pin(async move {
            let sql = format!("SELECT {FARM_COLUMNS} FROM farms WHERE id = $1");
            let row: Option<FarmRow> = sqlx::query_as(&sql)
                .bind(&id)
                .fetch_optional(&pool)
                .await
                .map_err(|error| database_error(&error))?;

            Ok(row.map(farm_from_row))
        })
    }

    fn find_many(
        &self,
        filter: &FarmFilter,
        pagination: &Pagination,
    ) -> RepositoryFuture<Vec<Farm>> {
        let pool = self.pool.clone();
        let clause = farm_where(filter);
        let pagination = *pagination;

        Box::pin(async move {
            let sql = format!(
                "SELECT {FARM_COLUMNS} FROM farms WHERE {} {}",
                clause.sql,
                page_clause(&pagination, clause.next_placeholder())
            );
            let (limit, offset) = limit_and_offset(&pagination);

            let mut query = sqlx::query_as::<_, FarmRow>(&sql);
            for value in &clause.values {
                query = query.bind(value);
            }

            let rows = query
                .bind(limit)
                .bind(offset)
                .fetch_all(&pool)
                .await
                .map_err(|error| database_error(&error))?;

            Ok(rows.into_iter().map(farm_from_row).collect())
        })
    }

    fn count(&self, filter: &FarmFilter) -> RepositoryFuture<u64> {
        let pool = self.pool.clone();
        let clause = farm_where(filter);

        Box::pin(async move { count_rows(&pool, "farms", &clause).await })
    }

    fn save(&self, farm: &Farm) -> RepositoryFuture<()> {
        let pool = self.pool.clone();
        let farm = farm.clone();

        Box::pin(async move {
            sqlx::query(
                "UPDATE farms SET name = $2, description = $3, updated_at = $4, deleted_at = $5 \
                 WHERE id = $1",
            )
            .bind(&farm.id)
            .bind(&farm.name)
            .bind(&farm.description)
            .bind(farm.updated_at.as_datetime())
            .bind(deleted_at(farm.lifecycle))
            .execute(&pool)
            .await
            .map_err(|error| database_error(&error))?;

            Ok(())
        })
    }
}

// =============================================================================
// PostgreSQL Pond Repository
// =============================================================================

/// `PostgreSQL` implementation of `PondRepository`.
#[derive(Debug, Clone)]
pub struct PostgresPondRepository {
    pool: PgPool,
}

impl PostgresPondRepository {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl PondRepository for PostgresPondRepository {
    fn insert(&self, pond: &Pond) -> RepositoryFuture<()> {
        let pool = self.pool.clone();
        let pond = pond.clone();

        Box::pin(async move {
            sqlx::query(
                "INSERT INTO ponds \
                 (id, farm_id, name, description, created_at, updated_at, deleted_at) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7)",
            )
            .bind(&pond.id)
            .bind(&pond.farm_id)
            .bind(&pond.name)
            .bind(&pond.description)
            .bind(pond.created_at.as_datetime())
            .bind(pond.updated_at.as_datetime())
            .bind(deleted_at(pond.lifecycle))
            .execute(&pool)
            .await
            .map_err(|error| insert_error(&error, &pond.id))?;

            Ok(())
        })
    }

    fn find_by_id(&self, id: &str) -> RepositoryFuture<Option<Pond>> {
        let pool = self.pool.clone();
        let id = id.to_string();

        Box::pin(async move {
            let sql = format!("SELECT {POND_COLUMNS} FROM ponds WHERE id = $1");
            let row: Option<PondRow> = sqlx::query_as(&sql)
                .bind(&id)
                .fetch_optional(&pool)
                .await
                .map_err(|error| database_error(&error))?;

            Ok(row.map(pond_from_row))
        })
    }

    fn find_many(
        &self,
        filter: &PondFilter,
        pagination: &Pagination,
    ) -> RepositoryFuture<Vec<Pond>> {
        let pool = self.pool.clone();
        let clause = pond_where(filter);
        let pagination = *pagination;

        Box::pin(async move {
            let sql = format!(
                "SELECT {POND_COLUMNS} FROM ponds WHERE {} {}",
                clause.sql,
                page_clause(&pagination, clause.next_placeholder())
            );
            let (limit, offset) = limit_and_offset(&pagination);

            let mut query = sqlx::query_as::<_, PondRow>(&sql);
            for value in &clause.values {
                query = query.bind(value);
            }

            let rows = query
                .bind(limit)
                .bind(offset)
                .fetch_all(&pool)
                .await
                .map_err(|error| database_error(&error))?;

            Ok(rows.into_iter().map(pond_from_row).collect())
        })
    }

    fn count(&self, filter: &PondFilter) -> RepositoryFuture<u64> {
        let pool = self.pool.clone();
        let clause = pond_where(filter);

        Box::pin(async move { count_rows(&pool, "ponds", &clause).await })
    }

    fn save(&self, pond: &Pond) -> RepositoryFuture<()> {
        let pool = self.pool.clone();
        let pond = pond.clone();

        Box::pin(async move {
            sqlx::query(
                "UPDATE ponds SET farm_id = $2, name = $3, description = $4, updated_at = $5, \
                 deleted_at = $6 WHERE id = $1",
            )
            .bind(&pond.id)
            .bind(&pond.farm_id)
            .bind(&pond.name)
            .bind(&pond.description)
            .bind(pond.updated_at.as_datetime())
            .bind(deleted_at(pond.lifecycle))
            .execute(&pool)
            .await
            .map_err(|error| database_error(&error))?;

            Ok(())
        })
    }
}
