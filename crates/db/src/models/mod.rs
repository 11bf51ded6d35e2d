//! Row structs and DTOs.
//!
//! Each submodule contains a `FromRow` entity struct matching the database
//! row, conversions into the `parkit_core` domain types, and the DTOs used
//! for writes.

pub mod parking_spot;
pub mod ticket;
