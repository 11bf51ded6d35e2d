//! Repository for the `parking_spots` table.

use parkit_core::parking::ParkingType;
use parkit_core::types::DbId;
use sqlx::PgPool;

use crate::models::parking_spot::ParkingSpotRow;

const COLUMNS: &str = "id, category, is_available";

/// Provides data access for parking spots.
pub struct ParkingSpotRepo;

impl ParkingSpotRepo {
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ParkingSpotRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM parking_spots WHERE id = $1");
        sqlx::query_as::<_, ParkingSpotRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All spots, ordered by id.
    pub async fn list(pool: &PgPool) -> Result<Vec<ParkingSpotRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM parking_spots ORDER BY id");
        sqlx::query_as::<_, ParkingSpotRow>(&query)
            .fetch_all(pool)
            .await
    }

    /// Lowest-numbered available spot of a category.
    pub async fn next_available(
        pool: &PgPool,
        category: ParkingType,
    ) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "SELECT id FROM parking_spots \
             WHERE category = $1 AND is_available \
             ORDER BY id \
             LIMIT 1",
        )
        .bind(category.as_str())
        .fetch_optional(pool)
        .await
    }

    /// Mark a spot as taken. Returns `false` if it was already taken or
    /// does not exist, so concurrent claims of one spot cannot both win.
    pub async fn claim(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE parking_spots SET is_available = FALSE WHERE id = $1 AND is_available",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark a spot as free. Returns `false` if the spot does not exist.
    pub async fn release(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE parking_spots SET is_available = TRUE WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
