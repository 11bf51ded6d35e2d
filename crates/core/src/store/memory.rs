//! Process-local store used by the `memory` backend and by tests.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::StoreError;
use crate::parking::{ParkingSpot, ParkingType, Ticket};
use crate::store::{SpotStore, StoreResult, TicketStore};
use crate::types::DbId;

/// Spots 1-3 take cars, 4-5 take bikes.
pub fn default_layout() -> Vec<ParkingSpot> {
    vec![
        ParkingSpot::new(1, ParkingType::Car, true),
        ParkingSpot::new(2, ParkingType::Car, true),
        ParkingSpot::new(3, ParkingType::Car, true),
        ParkingSpot::new(4, ParkingType::Bike, true),
        ParkingSpot::new(5, ParkingType::Bike, true),
    ]
}

#[derive(Debug)]
struct State {
    spots: BTreeMap<DbId, ParkingSpot>,
    tickets: Vec<Ticket>,
    next_ticket_id: DbId,
}

/// Both stores over one shared, mutex-guarded state.
///
/// Cloning is cheap and clones see the same data, so one instance can be
/// handed to the service as spot store and ticket store at once.
#[derive(Debug, Clone)]
pub struct InMemoryStore {
    state: Arc<Mutex<State>>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl InMemoryStore {
    pub fn new(spots: impl IntoIterator<Item = ParkingSpot>) -> Self {
        let state = State {
            spots: spots.into_iter().map(|spot| (spot.id, spot)).collect(),
            tickets: Vec::new(),
            next_ticket_id: 1,
        };
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub fn with_default_layout() -> Self {
        Self::new(default_layout())
    }

    pub fn spot(&self, id: DbId) -> Option<ParkingSpot> {
        self.lock().ok()?.spots.get(&id).cloned()
    }

    /// All tickets of a vehicle, oldest first.
    pub fn tickets_for(&self, vehicle_reg_number: &str) -> Vec<Ticket> {
        self.lock()
            .map(|state| {
                state
                    .tickets
                    .iter()
                    .filter(|t| t.vehicle_reg_number == vehicle_reg_number)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, StoreError> {
        self.state
            .lock()
            .map_err(|_| StoreError::new("in-memory store lock poisoned"))
    }
}

impl SpotStore for InMemoryStore {
    async fn next_available_slot(&self, parking_type: ParkingType) -> StoreResult<DbId> {
        let state = match self.lock() {
            Ok(state) => state,
            Err(err) => return StoreResult::TechnicalError(err),
        };
        // BTreeMap iterates in id order, so the lowest free id wins.
        state
            .spots
            .values()
            .find(|spot| spot.parking_type == parking_type && spot.is_available)
            .map(|spot| spot.id)
            .map_or(StoreResult::NotFound, StoreResult::Found)
    }

    async fn update_parking(&self, spot: &ParkingSpot) -> bool {
        let mut state = match self.lock() {
            Ok(state) => state,
            Err(err) => {
                tracing::error!(error = %err, spot_id = spot.id, "Failed to update parking spot");
                return false;
            }
        };
        match state.spots.get_mut(&spot.id) {
            Some(stored) if !spot.is_available && !stored.is_available => false,
            Some(stored) => {
                stored.is_available = spot.is_available;
                true
            }
            None => false,
        }
    }
}

impl TicketStore for InMemoryStore {
    async fn get_ticket(&self, vehicle_reg_number: &str) -> StoreResult<Ticket> {
        let state = match self.lock() {
            Ok(state) => state,
            Err(err) => return StoreResult::TechnicalError(err),
        };
        state
            .tickets
            .iter()
            .rev()
            .find(|t| t.vehicle_reg_number == vehicle_reg_number && t.is_open())
            .cloned()
            .map_or(StoreResult::NotFound, StoreResult::Found)
    }

    async fn save_ticket(&self, ticket: &Ticket) -> bool {
        let mut state = match self.lock() {
            Ok(state) => state,
            Err(err) => {
                tracing::error!(error = %err, "Failed to save ticket");
                return false;
            }
        };
        let already_open = state
            .tickets
            .iter()
            .any(|t| t.vehicle_reg_number == ticket.vehicle_reg_number && t.is_open());
        if already_open || !ticket.is_open() {
            return false;
        }

        let mut saved = ticket.clone();
        saved.id = Some(state.next_ticket_id);
        state.next_ticket_id += 1;
        state.tickets.push(saved);
        true
    }

    async fn update_ticket(&self, ticket: &Ticket) -> bool {
        let Some(id) = ticket.id else {
            return false;
        };
        let mut state = match self.lock() {
            Ok(state) => state,
            Err(err) => {
                tracing::error!(error = %err, ticket_id = id, "Failed to update ticket");
                return false;
            }
        };
        match state.tickets.iter_mut().find(|t| t.id == Some(id)) {
            Some(stored) if !stored.is_open() => {
                tracing::warn!(ticket_id = id, "Ticket is already closed");
                false
            }
            Some(stored) => {
                stored.exit_time = ticket.exit_time;
                stored.price = ticket.price;
                true
            }
            None => false,
        }
    }

    async fn count_tickets(&self, vehicle_reg_number: &str) -> Result<i64, StoreError> {
        let state = self.lock()?;
        let count = state
            .tickets
            .iter()
            .filter(|t| t.vehicle_reg_number == vehicle_reg_number)
            .count();
        Ok(count as i64)
    }
}
