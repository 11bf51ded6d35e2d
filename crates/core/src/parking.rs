//! Parking spots, vehicle categories and tickets.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParkingError;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Vehicle category
// ---------------------------------------------------------------------------

/// Vehicle category a spot is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ParkingType {
    Car,
    Bike,
}

impl ParkingType {
    pub const ALL: [ParkingType; 2] = [ParkingType::Car, ParkingType::Bike];

    /// Map a console menu selection (1 = CAR, 2 = BIKE) to a category.
    pub fn from_selection(selection: i32) -> Option<Self> {
        match selection {
            1 => Some(Self::Car),
            2 => Some(Self::Bike),
            _ => None,
        }
    }

    /// The stored text form, also used in log output.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Car => "CAR",
            Self::Bike => "BIKE",
        }
    }
}

impl fmt::Display for ParkingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParkingType {
    type Err = ParkingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CAR" => Ok(Self::Car),
            "BIKE" => Ok(Self::Bike),
            other => Err(ParkingError::UnknownCategory(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Spot
// ---------------------------------------------------------------------------

/// A physical parking location. Never destroyed, only toggled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParkingSpot {
    pub id: DbId,
    pub parking_type: ParkingType,
    pub is_available: bool,
}

impl ParkingSpot {
    pub fn new(id: DbId, parking_type: ParkingType, is_available: bool) -> Self {
        Self {
            id,
            parking_type,
            is_available,
        }
    }
}

// ---------------------------------------------------------------------------
// Ticket
// ---------------------------------------------------------------------------

/// One entry/exit cycle of one vehicle.
///
/// `exit_time` and `price` stay `None` until the vehicle leaves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    /// Assigned by the store on save.
    pub id: Option<DbId>,
    pub vehicle_reg_number: String,
    pub parking_spot: ParkingSpot,
    pub entry_time: Timestamp,
    pub exit_time: Option<Timestamp>,
    pub price: Option<f64>,
}

impl Ticket {
    /// Start a new session for `vehicle_reg_number` in `parking_spot`.
    pub fn open(
        vehicle_reg_number: impl Into<String>,
        parking_spot: ParkingSpot,
        entry_time: Timestamp,
    ) -> Self {
        Self {
            id: None,
            vehicle_reg_number: vehicle_reg_number.into(),
            parking_spot,
            entry_time,
            exit_time: None,
            price: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.exit_time.is_none()
    }
}
