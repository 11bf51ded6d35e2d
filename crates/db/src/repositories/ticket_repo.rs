//! Repository for the `tickets` table.
//!
//! Reads join `parking_spots` so a row carries everything needed to build
//! a domain `Ticket`.

use parkit_core::types::DbId;
use sqlx::PgPool;

use crate::models::ticket::{CloseTicket, CreateTicket, TicketRow};

/// Column list for joined ticket reads (`t` = tickets, `s` = parking_spots).
const COLUMNS: &str = "\
    t.id, t.spot_id, t.vehicle_reg_number, t.price, t.entry_time, t.exit_time, \
    s.category AS spot_category, s.is_available AS spot_is_available";

/// Provides data access for tickets.
pub struct TicketRepo;

impl TicketRepo {
    /// Insert an open ticket and return its id.
    ///
    /// Fails with a unique violation on `uq_tickets_open_vehicle` if the
    /// vehicle already has an open ticket.
    pub async fn create(pool: &PgPool, input: &CreateTicket) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "INSERT INTO tickets (spot_id, vehicle_reg_number, entry_time) \
             VALUES ($1, $2, $3) \
             RETURNING id",
        )
        .bind(input.spot_id)
        .bind(&input.vehicle_reg_number)
        .bind(input.entry_time)
        .fetch_one(pool)
        .await
    }

    /// The open ticket of a vehicle, if any.
    pub async fn find_open_by_vehicle(
        pool: &PgPool,
        vehicle_reg_number: &str,
    ) -> Result<Option<TicketRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tickets t \
             JOIN parking_spots s ON s.id = t.spot_id \
             WHERE t.vehicle_reg_number = $1 AND t.exit_time IS NULL"
        );
        sqlx::query_as::<_, TicketRow>(&query)
            .bind(vehicle_reg_number)
            .fetch_optional(pool)
            .await
    }

    /// The most recent ticket of a vehicle, open or closed.
    pub async fn find_latest(
        pool: &PgPool,
        vehicle_reg_number: &str,
    ) -> Result<Option<TicketRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tickets t \
             JOIN parking_spots s ON s.id = t.spot_id \
             WHERE t.vehicle_reg_number = $1 \
             ORDER BY t.entry_time DESC, t.id DESC \
             LIMIT 1"
        );
        sqlx::query_as::<_, TicketRow>(&query)
            .bind(vehicle_reg_number)
            .fetch_optional(pool)
            .await
    }

    /// Record exit time and price. Returns `false` if the ticket does not
    /// exist or was already closed.
    pub async fn close(pool: &PgPool, input: &CloseTicket) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE tickets SET price = $2, exit_time = $3 \
             WHERE id = $1 AND exit_time IS NULL",
        )
        .bind(input.id)
        .bind(input.price)
        .bind(input.exit_time)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Number of tickets ever issued to a vehicle.
    pub async fn count_by_vehicle(
        pool: &PgPool,
        vehicle_reg_number: &str,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tickets WHERE vehicle_reg_number = $1")
            .bind(vehicle_reg_number)
            .fetch_one(pool)
            .await
    }
}
