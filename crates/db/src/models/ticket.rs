//! Ticket rows and DTOs.

use parkit_core::error::ParkingError;
use parkit_core::parking::{ParkingSpot, Ticket};
use parkit_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Entity structs (database rows)
// ---------------------------------------------------------------------------

/// A row from `tickets` joined with its spot.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TicketRow {
    pub id: DbId,
    pub spot_id: DbId,
    pub vehicle_reg_number: String,
    pub price: Option<f64>,
    pub entry_time: Timestamp,
    pub exit_time: Option<Timestamp>,
    pub spot_category: String,
    pub spot_is_available: bool,
}

impl TryFrom<TicketRow> for Ticket {
    type Error = ParkingError;

    fn try_from(row: TicketRow) -> Result<Self, Self::Error> {
        Ok(Ticket {
            id: Some(row.id),
            vehicle_reg_number: row.vehicle_reg_number,
            parking_spot: ParkingSpot::new(
                row.spot_id,
                row.spot_category.parse()?,
                row.spot_is_available,
            ),
            entry_time: row.entry_time,
            exit_time: row.exit_time,
            price: row.price,
        })
    }
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// Insert payload for a freshly opened ticket.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTicket {
    pub spot_id: DbId,
    pub vehicle_reg_number: String,
    pub entry_time: Timestamp,
}

impl From<&Ticket> for CreateTicket {
    fn from(ticket: &Ticket) -> Self {
        Self {
            spot_id: ticket.parking_spot.id,
            vehicle_reg_number: ticket.vehicle_reg_number.clone(),
            entry_time: ticket.entry_time,
        }
    }
}

/// Exit time and price written when a vehicle leaves.
#[derive(Debug, Clone, Deserialize)]
pub struct CloseTicket {
    pub id: DbId,
    pub price: f64,
    pub exit_time: Timestamp,
}

impl CloseTicket {
    /// `None` unless the ticket was loaded from the store and has been priced.
    pub fn from_ticket(ticket: &Ticket) -> Option<Self> {
        Some(Self {
            id: ticket.id?,
            price: ticket.price?,
            exit_time: ticket.exit_time?,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use parkit_core::parking::ParkingType;

    use super::*;

    fn row() -> TicketRow {
        let entry = Utc::now();
        TicketRow {
            id: 7,
            spot_id: 2,
            vehicle_reg_number: "ABCDEF".to_string(),
            price: None,
            entry_time: entry,
            exit_time: None,
            spot_category: "CAR".to_string(),
            spot_is_available: false,
        }
    }

    #[test]
    fn row_converts_to_open_ticket() {
        let ticket = Ticket::try_from(row()).unwrap();
        assert_eq!(ticket.id, Some(7));
        assert_eq!(ticket.parking_spot, ParkingSpot::new(2, ParkingType::Car, false));
        assert!(ticket.is_open());
    }

    #[test]
    fn close_requires_id_price_and_exit() {
        let mut ticket = Ticket::try_from(row()).unwrap();
        assert!(CloseTicket::from_ticket(&ticket).is_none());

        ticket.exit_time = Some(ticket.entry_time + Duration::hours(1));
        assert!(CloseTicket::from_ticket(&ticket).is_none());

        ticket.price = Some(1.5);
        let close = CloseTicket::from_ticket(&ticket).unwrap();
        assert_eq!(close.id, 7);
        assert_eq!(close.price, 1.5);

        ticket.id = None;
        assert!(CloseTicket::from_ticket(&ticket).is_none());
    }
}
