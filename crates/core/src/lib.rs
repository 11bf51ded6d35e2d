//! Parking spot allocation and fare calculation.
//!
//! [`fare::FareCalculator`] prices a closed [`parking::Ticket`];
//! [`parking_service::ParkingService`] drives vehicle entry and exit through
//! the [`store`] and [`input`] collaborator traits.

pub mod error;
pub mod fare;
pub mod input;
pub mod parking;
pub mod parking_service;
pub mod store;
pub mod types;
