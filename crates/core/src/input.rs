//! Source of operator input for the parking service.

use crate::error::ParkingError;

/// Reads the answers the service needs from whoever is at the gate.
///
/// Calls block until input is available.
pub trait InputReader {
    /// The vehicle type menu choice, or `-1` when the input was not a number.
    fn read_selection(&self) -> i32;

    /// A trimmed, non-empty registration number.
    fn read_vehicle_registration_number(&self) -> Result<String, ParkingError>;
}

/// Validate a raw registration number as typed by the operator.
pub fn parse_registration_number(raw: &str) -> Result<String, ParkingError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ParkingError::InvalidRegistration(raw.to_string()));
    }
    Ok(trimmed.to_string())
}

/// Parse a menu selection; anything that is not an integer becomes `-1`.
pub fn parse_selection(raw: &str) -> i32 {
    raw.trim().parse().unwrap_or(-1)
}
