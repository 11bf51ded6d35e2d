//! Parkit operator console.
//!
//! Configuration, stdin-backed input and the interactive menu live in the
//! library so the binary entrypoint stays a thin wiring layer and the
//! pieces can be unit tested.

pub mod config;
pub mod console;
pub mod shell;
