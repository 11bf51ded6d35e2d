//! Interactive operator menu.
//!
//! Each menu round runs one service operation. Domain failures are logged
//! and reported to the operator, then the loop carries on.

use std::io::BufRead;

use chrono::Utc;
use parkit_core::fare::RateProvider;
use parkit_core::parking_service::{EntryReceipt, ExitReceipt, ParkingService};
use parkit_core::store::{SpotStore, TicketStore};
use parkit_core::types::Timestamp;

use crate::console::ConsoleInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOption {
    Incoming,
    Exiting,
    Shutdown,
}

impl MenuOption {
    pub fn from_selection(selection: i32) -> Option<Self> {
        match selection {
            1 => Some(Self::Incoming),
            2 => Some(Self::Exiting),
            3 => Some(Self::Shutdown),
            _ => None,
        }
    }
}

fn format_time(time: Timestamp) -> String {
    time.format("%Y-%m-%d %H:%M:%S").to_string()
}

pub fn entry_message(receipt: &EntryReceipt) -> Vec<String> {
    let ticket = &receipt.ticket;
    let mut lines = Vec::with_capacity(4);
    if receipt.returning_vehicle {
        lines.push(
            "Welcome back! As a recurring user of our parking lot, you'll benefit from a discount."
                .to_string(),
        );
    }
    lines.push("Generated Ticket and saved in DB".to_string());
    lines.push(format!(
        "Please park your vehicle in spot number: {}",
        ticket.parking_spot.id
    ));
    lines.push(format!(
        "Recorded in-time for vehicle number: {} is: {}",
        ticket.vehicle_reg_number,
        format_time(ticket.entry_time)
    ));
    lines
}

pub fn exit_message(receipt: &ExitReceipt) -> Vec<String> {
    vec![
        format!("Please pay the parking fare: {:.2}", receipt.price),
        format!(
            "Recorded out-time for vehicle number: {} is: {}",
            receipt.ticket.vehicle_reg_number,
            format_time(receipt.exit_time)
        ),
    ]
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{line}");
    }
}

fn print_menu() {
    println!("Please select an option. Simply enter the number to choose an action");
    println!("1 New Vehicle Entering - Allocate Parking Space");
    println!("2 Vehicle Exiting - Generate Ticket Price");
    println!("3 Shutdown System");
}

/// Run the menu until the operator shuts down or stdin closes.
pub async fn run<B, S, T, R>(service: &ParkingService<ConsoleInput<B>, S, T, R>)
where
    B: BufRead,
    S: SpotStore,
    T: TicketStore,
    R: RateProvider,
{
    println!("Welcome to Parking System!");

    loop {
        print_menu();
        let selection = service.input().read_menu_option();
        if service.input().is_closed() {
            tracing::info!("Input closed, shutting down");
            break;
        }

        match MenuOption::from_selection(selection) {
            Some(MenuOption::Incoming) => match service.process_incoming_vehicle().await {
                Ok(receipt) => print_lines(entry_message(&receipt)),
                Err(err) => {
                    tracing::error!(error = %err, "Unable to process incoming vehicle");
                    println!("Unable to process incoming vehicle: {err}");
                }
            },
            Some(MenuOption::Exiting) => match service.process_exiting_vehicle(Utc::now()).await {
                Ok(receipt) => print_lines(exit_message(&receipt)),
                Err(err) => {
                    tracing::error!(error = %err, "Unable to process exiting vehicle");
                    println!("Unable to process exiting vehicle: {err}");
                }
            },
            Some(MenuOption::Shutdown) => {
                println!("Exiting from the system!");
                break;
            }
            None => {
                tracing::warn!(selection, "Unsupported menu option");
                println!("Unsupported option. Please enter a number corresponding to the provided menu");
            }
        }
    }
}
