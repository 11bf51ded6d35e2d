//! Persistence boundary of the parking service.
//!
//! Lookups answer with a [`StoreResult`] so callers can tell "nothing
//! there" from "the store is broken" without inspecting messages. Writes
//! answer with a plain `bool`; implementations log the underlying failure
//! and callers must abort dependent state changes on `false`.

use std::error::Error as StdError;
use std::future::Future;

use crate::error::StoreError;
use crate::parking::{ParkingSpot, ParkingType, Ticket};
use crate::types::DbId;

pub mod memory;

// ---------------------------------------------------------------------------
// Lookup result
// ---------------------------------------------------------------------------

/// Outcome of a store lookup.
#[derive(Debug)]
pub enum StoreResult<T> {
    Found(T),
    NotFound,
    TechnicalError(StoreError),
}

impl<T, E> From<Result<Option<T>, E>> for StoreResult<T>
where
    E: Into<Box<dyn StdError + Send + Sync>>,
{
    fn from(result: Result<Option<T>, E>) -> Self {
        match result {
            Ok(Some(value)) => Self::Found(value),
            Ok(None) => Self::NotFound,
            Err(err) => Self::TechnicalError(StoreError::new(err)),
        }
    }
}

// ---------------------------------------------------------------------------
// Store traits
// ---------------------------------------------------------------------------

/// Access to the facility's parking spots.
pub trait SpotStore: Send + Sync {
    /// Id of the lowest-numbered available spot of `parking_type`.
    fn next_available_slot(
        &self,
        parking_type: ParkingType,
    ) -> impl Future<Output = StoreResult<DbId>> + Send;

    /// Persist the spot's availability.
    ///
    /// Marking a spot unavailable only succeeds while it is still
    /// available, so two callers can never claim the same spot.
    fn update_parking(&self, spot: &ParkingSpot) -> impl Future<Output = bool> + Send;
}

/// Access to parking tickets.
pub trait TicketStore: Send + Sync {
    /// The open ticket of a vehicle, if it is currently parked.
    fn get_ticket(
        &self,
        vehicle_reg_number: &str,
    ) -> impl Future<Output = StoreResult<Ticket>> + Send;

    /// Insert a new open ticket. Fails if the vehicle already has one.
    fn save_ticket(&self, ticket: &Ticket) -> impl Future<Output = bool> + Send;

    /// Write back exit time and price of a ticket loaded from this store.
    fn update_ticket(&self, ticket: &Ticket) -> impl Future<Output = bool> + Send;

    /// Number of tickets ever issued to a vehicle, open ones included.
    fn count_tickets(
        &self,
        vehicle_reg_number: &str,
    ) -> impl Future<Output = Result<i64, StoreError>> + Send;
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn option_result_converts_to_tagged_result() {
        let found: StoreResult<i64> = Ok::<_, std::io::Error>(Some(4)).into();
        assert_matches!(found, StoreResult::Found(4));

        let missing: StoreResult<i64> = Ok::<_, std::io::Error>(None).into();
        assert_matches!(missing, StoreResult::NotFound);

        let broken: StoreResult<i64> = Err::<Option<i64>, _>(std::io::Error::other("down")).into();
        assert_matches!(broken, StoreResult::TechnicalError(err) if err.to_string() == "down");
    }
}
