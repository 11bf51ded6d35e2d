//! Vehicle entry and exit.
//!
//! Entry claims the lowest free spot of the requested category and opens a
//! ticket; exit closes the ticket, prices it and frees the spot. A spot is
//! only released after its ticket has been closed successfully, so a spot
//! never goes back into circulation while billing is unresolved.

use chrono::Utc;
use serde::Serialize;

use crate::error::{ParkingError, SpotLookupError};
use crate::fare::{FareCalculator, FareConfig, RateProvider};
use crate::input::InputReader;
use crate::parking::{ParkingSpot, ParkingType, Ticket};
use crate::store::{SpotStore, StoreResult, TicketStore};
use crate::types::Timestamp;

/// What the operator is told after a successful entry.
#[derive(Debug, Clone, Serialize)]
pub struct EntryReceipt {
    pub ticket: Ticket,
    /// The vehicle has parked here before.
    pub returning_vehicle: bool,
}

/// What the operator is told after a successful exit.
#[derive(Debug, Clone, Serialize)]
pub struct ExitReceipt {
    pub ticket: Ticket,
    pub price: f64,
    pub exit_time: Timestamp,
    pub recurring_user: bool,
}

pub struct ParkingService<I, S, T, R = FareConfig> {
    input: I,
    spots: S,
    tickets: T,
    fare_calculator: FareCalculator<R>,
}

impl<I, S, T, R> ParkingService<I, S, T, R>
where
    I: InputReader,
    S: SpotStore,
    T: TicketStore,
    R: RateProvider,
{
    pub fn new(input: I, spots: S, tickets: T, fare_calculator: FareCalculator<R>) -> Self {
        Self {
            input,
            spots,
            tickets,
            fare_calculator,
        }
    }

    pub fn input(&self) -> &I {
        &self.input
    }

    pub fn spot_store(&self) -> &S {
        &self.spots
    }

    pub fn ticket_store(&self) -> &T {
        &self.tickets
    }

    // -----------------------------------------------------------------------
    // Entry
    // -----------------------------------------------------------------------

    pub async fn process_incoming_vehicle(&self) -> Result<EntryReceipt, ParkingError> {
        self.process_incoming_vehicle_at(Utc::now()).await
    }

    /// Park the next vehicle with an explicit entry time.
    ///
    /// The registration number is read before the spot is claimed so a
    /// rejected vehicle never leaves a spot marked as taken.
    pub async fn process_incoming_vehicle_at(
        &self,
        entry_time: Timestamp,
    ) -> Result<EntryReceipt, ParkingError> {
        let mut spot = self.get_next_parking_number_if_available().await?;
        let vehicle = self.input.read_vehicle_registration_number()?;

        match self.tickets.get_ticket(&vehicle).await {
            StoreResult::Found(open) => {
                tracing::warn!(%vehicle, spot_id = open.parking_spot.id, "Vehicle is already parked");
                return Err(ParkingError::VehicleAlreadyParked {
                    vehicle,
                    spot_id: open.parking_spot.id,
                });
            }
            StoreResult::NotFound => {}
            StoreResult::TechnicalError(err) => return Err(err.into()),
        }

        let returning_vehicle = self.tickets.count_tickets(&vehicle).await? > 0;

        spot.is_available = false;
        if !self.spots.update_parking(&spot).await {
            tracing::warn!(spot_id = spot.id, %vehicle, "Could not claim parking spot");
            return Err(ParkingError::SpotUpdateFailed { spot_id: spot.id });
        }

        let ticket = Ticket::open(vehicle.clone(), spot.clone(), entry_time);
        if !self.tickets.save_ticket(&ticket).await {
            tracing::error!(spot_id = spot.id, %vehicle, "Could not save ticket, releasing spot");
            spot.is_available = true;
            if !self.spots.update_parking(&spot).await {
                tracing::error!(spot_id = spot.id, "Failed to release spot after ticket save failure");
            }
            return Err(ParkingError::TicketSaveFailed { vehicle });
        }

        if returning_vehicle {
            tracing::info!(%vehicle, "Returning vehicle, recurring-user discount applies");
        } else {
            tracing::info!(%vehicle, "New vehicle");
        }
        tracing::info!(
            %vehicle,
            spot_id = spot.id,
            parking_type = %spot.parking_type,
            %entry_time,
            "Vehicle parked"
        );

        Ok(EntryReceipt {
            ticket,
            returning_vehicle,
        })
    }

    /// Read the requested category and find the lowest free spot for it.
    ///
    /// The returned spot is still flagged available; claiming it is up to
    /// the caller.
    pub async fn get_next_parking_number_if_available(&self) -> Result<ParkingSpot, ParkingError> {
        let parking_type = self.get_vehicle_type()?;

        match self.spots.next_available_slot(parking_type).await {
            StoreResult::Found(id) if id > 0 => Ok(ParkingSpot::new(id, parking_type, true)),
            StoreResult::Found(_) | StoreResult::NotFound => {
                tracing::warn!(%parking_type, "No parking spot available");
                Err(ParkingError::NoAvailableSpot(SpotLookupError::Full {
                    category: parking_type,
                }))
            }
            StoreResult::TechnicalError(err) => {
                tracing::error!(error = %err, %parking_type, "Error fetching next available spot");
                Err(ParkingError::NoAvailableSpot(SpotLookupError::Store(err)))
            }
        }
    }

    fn get_vehicle_type(&self) -> Result<ParkingType, ParkingError> {
        let selection = self.input.read_selection();
        ParkingType::from_selection(selection).ok_or_else(|| {
            tracing::warn!(selection, "Incorrect vehicle type selection");
            ParkingError::InvalidSelection(selection)
        })
    }

    // -----------------------------------------------------------------------
    // Exit
    // -----------------------------------------------------------------------

    pub async fn process_exiting_vehicle(
        &self,
        exit_time: Timestamp,
    ) -> Result<ExitReceipt, ParkingError> {
        let vehicle = self.input.read_vehicle_registration_number()?;

        let mut ticket = match self.tickets.get_ticket(&vehicle).await {
            StoreResult::Found(ticket) => ticket,
            StoreResult::NotFound => return Err(ParkingError::TicketNotFound { vehicle }),
            StoreResult::TechnicalError(err) => return Err(err.into()),
        };
        ticket.exit_time = Some(exit_time);

        let recurring_user = self.tickets.count_tickets(&vehicle).await? > 1;
        let price = self
            .fare_calculator
            .calculate_fare(&mut ticket, recurring_user)?;

        if !self.tickets.update_ticket(&ticket).await {
            tracing::error!(%vehicle, "Unable to update ticket information, spot stays occupied");
            return Err(ParkingError::TicketUpdateFailed { vehicle });
        }

        let mut spot = ticket.parking_spot.clone();
        spot.is_available = true;
        if !self.spots.update_parking(&spot).await {
            tracing::error!(spot_id = spot.id, %vehicle, "Ticket closed but spot could not be freed");
            return Err(ParkingError::SpotUpdateFailed { spot_id: spot.id });
        }
        ticket.parking_spot = spot;

        tracing::info!(%vehicle, price, %exit_time, recurring_user, "Vehicle exited");

        Ok(ExitReceipt {
            ticket,
            price,
            exit_time,
            recurring_user,
        })
    }
}
