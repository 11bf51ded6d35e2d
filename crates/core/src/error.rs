use std::error::Error as StdError;

use crate::parking::ParkingType;
use crate::types::{DbId, Timestamp};

/// A technical failure reported by a store implementation.
///
/// Wraps whatever the backend produced (a `sqlx::Error`, a poisoned lock,
/// ...) so the core never depends on a storage crate.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct StoreError(Box<dyn StdError + Send + Sync>);

impl StoreError {
    pub fn new<E>(cause: E) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        Self(cause.into())
    }
}

/// Why no spot could be handed out for an incoming vehicle.
#[derive(Debug, thiserror::Error)]
pub enum SpotLookupError {
    /// The store answered, but every spot of the category is taken.
    #[error("Error fetching parking number from DB. Parking slots might be full")]
    Full { category: ParkingType },

    /// The store could not answer at all.
    #[error("Error fetching parking number from DB: {0}")]
    Store(#[source] StoreError),
}

#[derive(Debug, thiserror::Error)]
pub enum ParkingError {
    #[error("Out time provided is incorrect: entry {entry_time}, exit {exit_time:?}")]
    InvalidInterval {
        entry_time: Timestamp,
        exit_time: Option<Timestamp>,
    },

    #[error("Duration must be positive: {hours} hours")]
    NonPositiveDuration { hours: f64 },

    #[error("Unknown parking type: {0}")]
    UnknownCategory(String),

    #[error("Entered input is invalid: {0}")]
    InvalidSelection(i32),

    #[error("Invalid vehicle registration number: {0:?}")]
    InvalidRegistration(String),

    #[error("Unexpected error while fetching parking slot")]
    NoAvailableSpot(#[source] SpotLookupError),

    #[error("No open ticket found for vehicle {vehicle}")]
    TicketNotFound { vehicle: String },

    #[error("Vehicle {vehicle} is already parked in spot {spot_id}")]
    VehicleAlreadyParked { vehicle: String, spot_id: DbId },

    #[error("Unable to update parking spot {spot_id}")]
    SpotUpdateFailed { spot_id: DbId },

    #[error("Unable to save ticket for vehicle {vehicle}")]
    TicketSaveFailed { vehicle: String },

    #[error("Unable to update ticket information for vehicle {vehicle}")]
    TicketUpdateFailed { vehicle: String },

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Invalid fare configuration: {0}")]
    InvalidConfig(String),
}
