//! `parkit_core` store traits over PostgreSQL.
//!
//! Repository errors are logged here and folded into the boolean /
//! [`StoreResult`] answers the parking service expects.

use parkit_core::error::StoreError;
use parkit_core::parking::{ParkingSpot, ParkingType, Ticket};
use parkit_core::store::{SpotStore, StoreResult, TicketStore};
use parkit_core::types::DbId;

use crate::models::ticket::{CloseTicket, CreateTicket};
use crate::repositories::{ParkingSpotRepo, TicketRepo};
use crate::DbPool;

/// Spot and ticket store sharing one connection pool.
#[derive(Debug, Clone)]
pub struct PgParkingStore {
    pool: DbPool,
}

impl PgParkingStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

impl SpotStore for PgParkingStore {
    async fn next_available_slot(&self, parking_type: ParkingType) -> StoreResult<DbId> {
        ParkingSpotRepo::next_available(&self.pool, parking_type)
            .await
            .into()
    }

    async fn update_parking(&self, spot: &ParkingSpot) -> bool {
        let result = if spot.is_available {
            ParkingSpotRepo::release(&self.pool, spot.id).await
        } else {
            ParkingSpotRepo::claim(&self.pool, spot.id).await
        };
        match result {
            Ok(updated) => updated,
            Err(err) => {
                tracing::error!(error = %err, spot_id = spot.id, "Error updating parking info");
                false
            }
        }
    }
}

impl TicketStore for PgParkingStore {
    async fn get_ticket(&self, vehicle_reg_number: &str) -> StoreResult<Ticket> {
        match TicketRepo::find_open_by_vehicle(&self.pool, vehicle_reg_number).await {
            Ok(Some(row)) => match Ticket::try_from(row) {
                Ok(ticket) => StoreResult::Found(ticket),
                Err(err) => StoreResult::TechnicalError(StoreError::new(err)),
            },
            Ok(None) => StoreResult::NotFound,
            Err(err) => {
                tracing::error!(error = %err, vehicle = vehicle_reg_number, "Error fetching ticket");
                StoreResult::TechnicalError(StoreError::new(err))
            }
        }
    }

    async fn save_ticket(&self, ticket: &Ticket) -> bool {
        match TicketRepo::create(&self.pool, &CreateTicket::from(ticket)).await {
            Ok(id) => {
                tracing::debug!(ticket_id = id, vehicle = %ticket.vehicle_reg_number, "Ticket saved");
                true
            }
            Err(err) => {
                tracing::error!(error = %err, vehicle = %ticket.vehicle_reg_number, "Error saving ticket");
                false
            }
        }
    }

    async fn update_ticket(&self, ticket: &Ticket) -> bool {
        let Some(close) = CloseTicket::from_ticket(ticket) else {
            tracing::error!(vehicle = %ticket.vehicle_reg_number, "Ticket is not ready to be closed");
            return false;
        };
        match TicketRepo::close(&self.pool, &close).await {
            Ok(updated) => updated,
            Err(err) => {
                tracing::error!(error = %err, ticket_id = close.id, "Error updating ticket");
                false
            }
        }
    }

    async fn count_tickets(&self, vehicle_reg_number: &str) -> Result<i64, StoreError> {
        TicketRepo::count_by_vehicle(&self.pool, vehicle_reg_number)
            .await
            .map_err(StoreError::new)
    }
}
