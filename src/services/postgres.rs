use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use std::time::Duration;
use thiserror::Error;

use crate::models::{Coordinate, Marker, MarkerStats};

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}

/// Attempts to allocate a unique timestamp id before giving up
const MAX_ID_ATTEMPTS: i64 = 8;

/// Durable marker storage
///
/// Owns the canonical per-device marker collection. The stored form is the
/// plain Marker record; collections are always returned ordered by `id`,
/// which is creation order. Coordinate validation happens here so malformed
/// markers never reach the filter core.
pub struct MarkerStore {
    pool: PgPool,
}

impl MarkerStore {
    /// Create a new store from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout_secs: u64,
        idle_timeout_secs: u64,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(acquire_timeout_secs))
            .idle_timeout(Duration::from_secs(idle_timeout_secs))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new store from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, StoreError> {
        tracing::info!("Connecting to PostgreSQL with URL: {}", url);

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            acquire_timeout_secs.unwrap_or(5),
            idle_timeout_secs.unwrap_or(600),
        )
        .await
    }

    /// Store a new marker and return it with its allocated id
    ///
    /// Marker ids are unix-millisecond creation timestamps. A same-millisecond
    /// collision within one device's collection bumps the candidate id to the
    /// next millisecond, bounded by a handful of attempts.
    pub async fn create_marker(
        &self,
        device_id: &str,
        coordinate: Coordinate,
        title: &str,
        description: &str,
        favorite: bool,
    ) -> Result<Marker, StoreError> {
        if !coordinate.is_valid() {
            return Err(StoreError::InvalidInput(format!(
                "coordinate out of range: ({}, {})",
                coordinate.latitude, coordinate.longitude
            )));
        }

        let query = r#"
            INSERT INTO markers (device_id, id, latitude, longitude, title, description, favorite)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (device_id, id) DO NOTHING
        "#;

        let base_id = chrono::Utc::now().timestamp_millis();
        for offset in 0..MAX_ID_ATTEMPTS {
            let id = base_id + offset;
            let result = sqlx::query(query)
                .bind(device_id)
                .bind(id)
                .bind(coordinate.latitude)
                .bind(coordinate.longitude)
                .bind(title)
                .bind(description)
                .bind(favorite)
                .execute(&self.pool)
                .await?;

            if result.rows_affected() > 0 {
                tracing::debug!("Stored marker {} for device {}", id, device_id);
                return Ok(Marker {
                    id,
                    coordinate,
                    title: title.to_string(),
                    description: description.to_string(),
                    favorite,
                });
            }
        }

        Err(StoreError::Conflict(format!(
            "could not allocate a marker id for device {}",
            device_id
        )))
    }

    /// Get a device's full marker collection in creation order
    pub async fn list_markers(&self, device_id: &str) -> Result<Vec<Marker>, StoreError> {
        let query = r#"
            SELECT id, latitude, longitude, title, description, favorite
            FROM markers
            WHERE device_id = $1
            ORDER BY id ASC
        "#;

        let rows = sqlx::query(query)
            .bind(device_id)
            .fetch_all(&self.pool)
            .await?;

        let markers: Vec<Marker> = rows
            .iter()
            .map(|row| Marker {
                id: row.get("id"),
                coordinate: Coordinate::new(row.get("latitude"), row.get("longitude")),
                title: row.get("title"),
                description: row.get("description"),
                favorite: row.get("favorite"),
            })
            .collect();

        tracing::debug!("Device {} has {} markers", device_id, markers.len());

        Ok(markers)
    }

    /// Toggle a marker's favorite flag and return the updated marker
    pub async fn toggle_favorite(
        &self,
        device_id: &str,
        marker_id: i64,
    ) -> Result<Marker, StoreError> {
        let query = r#"
            UPDATE markers
            SET favorite = NOT favorite
            WHERE device_id = $1 AND id = $2
            RETURNING id, latitude, longitude, title, description, favorite
        "#;

        let row = sqlx::query(query)
            .bind(device_id)
            .bind(marker_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| {
                StoreError::NotFound(format!("marker {} for device {}", marker_id, device_id))
            })?;

        Ok(Marker {
            id: row.get("id"),
            coordinate: Coordinate::new(row.get("latitude"), row.get("longitude")),
            title: row.get("title"),
            description: row.get("description"),
            favorite: row.get("favorite"),
        })
    }

    /// Delete a marker; returns whether a row was removed
    pub async fn delete_marker(
        &self,
        device_id: &str,
        marker_id: i64,
    ) -> Result<bool, StoreError> {
        let query = r#"
            DELETE FROM markers
            WHERE device_id = $1 AND id = $2
        "#;

        let result = sqlx::query(query)
            .bind(device_id)
            .bind(marker_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Remove every marker for a device
    pub async fn clear_markers(&self, device_id: &str) -> Result<u64, StoreError> {
        let query = r#"
            DELETE FROM markers
            WHERE device_id = $1
        "#;

        let result = sqlx::query(query).bind(device_id).execute(&self.pool).await?;

        tracing::info!(
            "Cleared {} markers for device {}",
            result.rows_affected(),
            device_id
        );

        Ok(result.rows_affected())
    }

    /// Collection statistics for a device
    pub async fn marker_stats(&self, device_id: &str) -> Result<MarkerStats, StoreError> {
        let query = r#"
            SELECT
                COUNT(*) as total,
                COUNT(*) FILTER (WHERE favorite) as favorites
            FROM markers
            WHERE device_id = $1
        "#;

        let row = sqlx::query(query)
            .bind(device_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(MarkerStats {
            device_id: device_id.to_string(),
            total: row.get("total"),
            favorites: row.get("favorites"),
        })
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_coordinate_rejected_before_io() {
        let bad = Coordinate::new(91.0, 0.0);
        assert!(!bad.is_valid());
    }

    #[test]
    fn test_not_found_display() {
        let err = StoreError::NotFound("marker 42 for device abc".to_string());
        assert_eq!(err.to_string(), "Not found: marker 42 for device abc");
    }
}
