//! # Location Repository
//!
//! Storage locations inside a warehouse. Short codes only need to be
//! unique per warehouse: "Stock1" may exist in both WH and SF.

use chrono::Utc;
use sqlx::SqlitePool;
use stockmaster_core::{Location, LocationInput};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};

const SELECT_LOCATION: &str = r#"
    SELECT l.id, l.name, l.short_code, l.warehouse_id, w.name AS warehouse_name,
           l.created_at, l.updated_at
    FROM locations l
    JOIN warehouses w ON w.id = l.warehouse_id
"#;

/// Repository for location database operations.
#[derive(Debug, Clone)]
pub struct LocationRepository {
    pool: SqlitePool,
}

impl LocationRepository {
    /// Creates a new LocationRepository.
    pub fn new(pool: SqlitePool) -> Self {
        LocationRepository { pool }
    }

    /// Lists locations newest first, optionally for one warehouse.
    pub async fn list(&self, warehouse_id: Option<i64>) -> DbResult<Vec<Location>> {
        let locations = match warehouse_id {
            Some(warehouse_id) => {
                sqlx::query_as::<_, Location>(&format!(
                    "{SELECT_LOCATION} WHERE l.warehouse_id = ?1 ORDER BY l.created_at DESC, l.id DESC"
                ))
                .bind(warehouse_id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Location>(&format!(
                    "{SELECT_LOCATION} ORDER BY l.created_at DESC, l.id DESC"
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };

        debug!(?warehouse_id, count = locations.len(), "Locations listed");
        Ok(locations)
    }

    /// Gets a location by id, with its warehouse name.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Location>> {
        let location =
            sqlx::query_as::<_, Location>(&format!("{SELECT_LOCATION} WHERE l.id = ?1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(location)
    }

    /// Creates a location.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - the warehouse does not exist
    /// * `Err(DbError::UniqueViolation)` - short code taken in that warehouse
    pub async fn create(&self, input: &LocationInput) -> DbResult<Location> {
        let warehouse: Option<i64> = sqlx::query_scalar("SELECT id FROM warehouses WHERE id = ?1")
            .bind(input.warehouse_id)
            .fetch_optional(&self.pool)
            .await?;
        if warehouse.is_none() {
            return Err(DbError::not_found("Warehouse", input.warehouse_id));
        }

        if self.short_code_taken(input, None).await? {
            return Err(DbError::duplicate("locations.short_code", &input.short_code));
        }

        let now = Utc::now();
        let id = sqlx::query(
            r#"
            INSERT INTO locations (name, short_code, warehouse_id, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?4)
            "#,
        )
        .bind(&input.name)
        .bind(&input.short_code)
        .bind(input.warehouse_id)
        .bind(now)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        info!(
            location_id = id,
            warehouse_id = input.warehouse_id,
            short_code = %input.short_code,
            "Location created"
        );

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Location", id))
    }

    /// Overwrites name, short code and warehouse.
    ///
    /// Moving to a missing warehouse fails with a foreign-key violation.
    pub async fn update(&self, id: i64, input: &LocationInput) -> DbResult<Location> {
        if self.short_code_taken(input, Some(id)).await? {
            return Err(DbError::duplicate("locations.short_code", &input.short_code));
        }

        let result = sqlx::query(
            r#"
            UPDATE locations
            SET name = ?1, short_code = ?2, warehouse_id = ?3, updated_at = ?4
            WHERE id = ?5
            "#,
        )
        .bind(&input.name)
        .bind(&input.short_code)
        .bind(input.warehouse_id)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Location", id));
        }

        info!(location_id = id, "Location updated");

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Location", id))
    }

    /// Deletes a location. Its stock cells cascade.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM locations WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Location", id));
        }

        info!(location_id = id, "Location deleted");
        Ok(())
    }

    async fn short_code_taken(&self, input: &LocationInput, exclude_id: Option<i64>) -> DbResult<bool> {
        let existing: Option<i64> = sqlx::query_scalar(
            "SELECT id FROM locations WHERE short_code = ?1 AND warehouse_id = ?2 AND id != ?3",
        )
        .bind(&input.short_code)
        .bind(input.warehouse_id)
        .bind(exclude_id.unwrap_or(0))
        .fetch_optional(&self.pool)
        .await?;
        Ok(existing.is_some())
    }
}
