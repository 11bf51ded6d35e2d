//! Recording test doubles for the parking service collaborators.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use parkit_core::error::{ParkingError, StoreError};
use parkit_core::input::{parse_registration_number, InputReader};
use parkit_core::parking::{ParkingSpot, ParkingType, Ticket};
use parkit_core::store::{SpotStore, StoreResult, TicketStore};
use parkit_core::types::DbId;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Always answers with the same selection and registration number.
pub struct ScriptedInput {
    selection: i32,
    registration: String,
    pub selection_reads: AtomicUsize,
    pub registration_reads: AtomicUsize,
}

impl ScriptedInput {
    pub fn new(selection: i32, registration: &str) -> Self {
        Self {
            selection,
            registration: registration.to_string(),
            selection_reads: AtomicUsize::new(0),
            registration_reads: AtomicUsize::new(0),
        }
    }
}

impl InputReader for ScriptedInput {
    fn read_selection(&self) -> i32 {
        self.selection_reads.fetch_add(1, Ordering::SeqCst);
        self.selection
    }

    fn read_vehicle_registration_number(&self) -> Result<String, ParkingError> {
        self.registration_reads.fetch_add(1, Ordering::SeqCst);
        parse_registration_number(&self.registration)
    }
}

// ---------------------------------------------------------------------------
// Spot store
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub enum SlotAnswer {
    Found(DbId),
    NotFound,
    Broken,
}

pub struct MockSpotStore {
    pub slot_answer: SlotAnswer,
    /// Answers for successive `update_parking` calls; `true` once exhausted.
    pub update_answers: Mutex<Vec<bool>>,
    pub lookups: Mutex<Vec<ParkingType>>,
    pub updates: Mutex<Vec<ParkingSpot>>,
}

impl MockSpotStore {
    pub fn new(slot_answer: SlotAnswer) -> Self {
        Self {
            slot_answer,
            update_answers: Mutex::new(Vec::new()),
            lookups: Mutex::new(Vec::new()),
            updates: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_updates(self, answers: Vec<bool>) -> Self {
        *self.update_answers.lock().unwrap() = answers;
        self
    }

    pub fn lookups(&self) -> Vec<ParkingType> {
        self.lookups.lock().unwrap().clone()
    }

    pub fn updates(&self) -> Vec<ParkingSpot> {
        self.updates.lock().unwrap().clone()
    }
}

impl SpotStore for MockSpotStore {
    async fn next_available_slot(&self, parking_type: ParkingType) -> StoreResult<DbId> {
        self.lookups.lock().unwrap().push(parking_type);
        match self.slot_answer {
            SlotAnswer::Found(id) => StoreResult::Found(id),
            SlotAnswer::NotFound => StoreResult::NotFound,
            SlotAnswer::Broken => StoreResult::TechnicalError(StoreError::new("connection refused")),
        }
    }

    async fn update_parking(&self, spot: &ParkingSpot) -> bool {
        self.updates.lock().unwrap().push(spot.clone());
        let mut answers = self.update_answers.lock().unwrap();
        if answers.is_empty() {
            true
        } else {
            answers.remove(0)
        }
    }
}

// ---------------------------------------------------------------------------
// Ticket store
// ---------------------------------------------------------------------------

pub struct MockTicketStore {
    pub open_ticket: Option<Ticket>,
    pub ticket_count: i64,
    pub save_answer: bool,
    pub update_answer: bool,
    pub get_calls: Mutex<Vec<String>>,
    pub count_calls: Mutex<Vec<String>>,
    pub saved: Mutex<Vec<Ticket>>,
    pub updated: Mutex<Vec<Ticket>>,
}

impl MockTicketStore {
    pub fn new(open_ticket: Option<Ticket>, ticket_count: i64) -> Self {
        Self {
            open_ticket,
            ticket_count,
            save_answer: true,
            update_answer: true,
            get_calls: Mutex::new(Vec::new()),
            count_calls: Mutex::new(Vec::new()),
            saved: Mutex::new(Vec::new()),
            updated: Mutex::new(Vec::new()),
        }
    }

    pub fn saved(&self) -> Vec<Ticket> {
        self.saved.lock().unwrap().clone()
    }

    pub fn updated(&self) -> Vec<Ticket> {
        self.updated.lock().unwrap().clone()
    }

    pub fn get_calls(&self) -> Vec<String> {
        self.get_calls.lock().unwrap().clone()
    }

    pub fn count_calls(&self) -> Vec<String> {
        self.count_calls.lock().unwrap().clone()
    }
}

impl TicketStore for MockTicketStore {
    async fn get_ticket(&self, vehicle_reg_number: &str) -> StoreResult<Ticket> {
        self.get_calls.lock().unwrap().push(vehicle_reg_number.to_string());
        match &self.open_ticket {
            Some(ticket) => StoreResult::Found(ticket.clone()),
            None => StoreResult::NotFound,
        }
    }

    async fn save_ticket(&self, ticket: &Ticket) -> bool {
        self.saved.lock().unwrap().push(ticket.clone());
        self.save_answer
    }

    async fn update_ticket(&self, ticket: &Ticket) -> bool {
        self.updated.lock().unwrap().push(ticket.clone());
        self.update_answer
    }

    async fn count_tickets(&self, vehicle_reg_number: &str) -> Result<i64, StoreError> {
        self.count_calls.lock().unwrap().push(vehicle_reg_number.to_string());
        Ok(self.ticket_count)
    }
}
