//! Stdin-backed [`InputReader`].

use std::io::{self, BufRead, BufReader, Stdin, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use parkit_core::error::ParkingError;
use parkit_core::input::{parse_registration_number, parse_selection, InputReader};

/// Reads operator answers line by line and prints the matching prompts.
pub struct ConsoleInput<R> {
    reader: Mutex<R>,
    closed: AtomicBool,
}

impl ConsoleInput<BufReader<Stdin>> {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(io::stdin()))
    }
}

impl<R: BufRead> ConsoleInput<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: Mutex::new(reader),
            closed: AtomicBool::new(false),
        }
    }

    /// The input reached end-of-file; no further answers will come.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Relaxed)
    }

    /// Read one line, or `None` at end-of-file or on a read error.
    pub fn read_line(&self) -> Option<String> {
        let mut line = String::new();
        let read = match self.reader.lock() {
            Ok(mut reader) => reader.read_line(&mut line),
            Err(poisoned) => poisoned.into_inner().read_line(&mut line),
        };
        match read {
            Ok(0) => {
                self.closed.store(true, Ordering::Relaxed);
                None
            }
            Ok(_) => Some(line),
            Err(err) => {
                tracing::error!(error = %err, "Error while reading user input from shell");
                None
            }
        }
    }

    /// Read the main menu choice, `-1` when it is not a number.
    pub fn read_menu_option(&self) -> i32 {
        self.read_line().map_or(-1, |line| parse_selection(&line))
    }
}

fn prompt(text: &str) {
    println!("{text}");
    if let Err(err) = io::stdout().flush() {
        tracing::debug!(error = %err, "Failed to flush prompt");
    }
}

impl<R: BufRead> InputReader for ConsoleInput<R> {
    fn read_selection(&self) -> i32 {
        prompt("Please select vehicle type from menu\n1 CAR\n2 BIKE");
        self.read_menu_option()
    }

    fn read_vehicle_registration_number(&self) -> Result<String, ParkingError> {
        prompt("Please type the vehicle registration number and press enter key");
        let line = self.read_line().unwrap_or_default();
        parse_registration_number(&line).inspect_err(|_| {
            tracing::warn!("Invalid vehicle registration number entered");
        })
    }
}
