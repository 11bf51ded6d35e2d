//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod parking_spot_repo;
pub mod ticket_repo;

pub use parking_spot_repo::ParkingSpotRepo;
pub use ticket_repo::TicketRepo;
