//! Fare calculation for closed parking sessions.
//!
//! Price = duration (hours) x hourly rate of the spot's category, free for
//! short stays, discounted for recurring users. Durations are measured in
//! whole milliseconds and divided by [`MILLIS_PER_HOUR`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ParkingError;
use crate::parking::{ParkingType, Ticket};
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Milliseconds per hour (3,600,000).
pub const MILLIS_PER_HOUR: f64 = 3_600_000.0;

pub const DEFAULT_CAR_RATE_PER_HOUR: f64 = 1.5;
pub const DEFAULT_BIKE_RATE_PER_HOUR: f64 = 1.0;

/// Stays up to and including this many hours are free.
pub const DEFAULT_FREE_DURATION_HOURS: f64 = 0.5;

/// Price multiplier for recurring users (5% off).
pub const DEFAULT_RECURRING_DISCOUNT: f64 = 0.95;

// ---------------------------------------------------------------------------
// Rates
// ---------------------------------------------------------------------------

/// Looks up the hourly base rate of a vehicle category.
///
/// Returning `None` means the category is not priced, which the calculator
/// reports as [`ParkingError::UnknownCategory`].
pub trait RateProvider {
    fn rate_per_hour(&self, parking_type: ParkingType) -> Option<f64>;
}

impl RateProvider for BTreeMap<ParkingType, f64> {
    fn rate_per_hour(&self, parking_type: ParkingType) -> Option<f64> {
        self.get(&parking_type).copied()
    }
}

/// Immutable fare settings, built once at startup and handed to the
/// calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FareConfig {
    pub car_rate_per_hour: f64,
    pub bike_rate_per_hour: f64,
    pub free_duration_hours: f64,
    pub recurring_discount: f64,
}

impl Default for FareConfig {
    fn default() -> Self {
        Self {
            car_rate_per_hour: DEFAULT_CAR_RATE_PER_HOUR,
            bike_rate_per_hour: DEFAULT_BIKE_RATE_PER_HOUR,
            free_duration_hours: DEFAULT_FREE_DURATION_HOURS,
            recurring_discount: DEFAULT_RECURRING_DISCOUNT,
        }
    }
}

impl FareConfig {
    /// Reject settings that would produce negative or meaningless prices.
    pub fn validate(&self) -> Result<(), ParkingError> {
        for (name, rate) in [
            ("car_rate_per_hour", self.car_rate_per_hour),
            ("bike_rate_per_hour", self.bike_rate_per_hour),
        ] {
            if !rate.is_finite() || rate < 0.0 {
                return Err(ParkingError::InvalidConfig(format!(
                    "{name} must be a non-negative number, got {rate}"
                )));
            }
        }
        if !self.free_duration_hours.is_finite() || self.free_duration_hours < 0.0 {
            return Err(ParkingError::InvalidConfig(format!(
                "free_duration_hours must be a non-negative number, got {}",
                self.free_duration_hours
            )));
        }
        if !(self.recurring_discount > 0.0 && self.recurring_discount <= 1.0) {
            return Err(ParkingError::InvalidConfig(format!(
                "recurring_discount must be in (0, 1], got {}",
                self.recurring_discount
            )));
        }
        Ok(())
    }
}

impl RateProvider for FareConfig {
    fn rate_per_hour(&self, parking_type: ParkingType) -> Option<f64> {
        match parking_type {
            ParkingType::Car => Some(self.car_rate_per_hour),
            ParkingType::Bike => Some(self.bike_rate_per_hour),
        }
    }
}

// ---------------------------------------------------------------------------
// Calculator
// ---------------------------------------------------------------------------

/// Elapsed time between two instants in fractional hours.
pub fn duration_hours(entry_time: Timestamp, exit_time: Timestamp) -> f64 {
    (exit_time - entry_time).num_milliseconds() as f64 / MILLIS_PER_HOUR
}

#[derive(Debug, Clone)]
pub struct FareCalculator<R = FareConfig> {
    rates: R,
    free_duration_hours: f64,
    recurring_discount: f64,
}

impl FareCalculator<FareConfig> {
    /// Build a calculator from a validated configuration.
    pub fn new(config: FareConfig) -> Result<Self, ParkingError> {
        config.validate()?;
        Ok(Self::from_valid(config))
    }

    fn from_valid(config: FareConfig) -> Self {
        Self {
            free_duration_hours: config.free_duration_hours,
            recurring_discount: config.recurring_discount,
            rates: config,
        }
    }
}

impl Default for FareCalculator<FareConfig> {
    fn default() -> Self {
        Self::from_valid(FareConfig::default())
    }
}

impl<R: RateProvider> FareCalculator<R> {
    /// Build a calculator over a custom rate table.
    pub fn with_rates(rates: R, free_duration_hours: f64, recurring_discount: f64) -> Self {
        Self {
            rates,
            free_duration_hours,
            recurring_discount,
        }
    }

    /// Price a closed ticket and store the result in `ticket.price`.
    ///
    /// Entry and exit times are never modified.
    pub fn calculate_fare(
        &self,
        ticket: &mut Ticket,
        is_recurring_user: bool,
    ) -> Result<f64, ParkingError> {
        let exit_time = match ticket.exit_time {
            Some(exit_time) if exit_time >= ticket.entry_time => exit_time,
            other => {
                return Err(ParkingError::InvalidInterval {
                    entry_time: ticket.entry_time,
                    exit_time: other,
                })
            }
        };

        let hours = duration_hours(ticket.entry_time, exit_time);
        if hours <= 0.0 {
            return Err(ParkingError::NonPositiveDuration { hours });
        }

        let parking_type = ticket.parking_spot.parking_type;
        let rate = self
            .rates
            .rate_per_hour(parking_type)
            .ok_or_else(|| ParkingError::UnknownCategory(parking_type.to_string()))?;

        let price = if hours <= self.free_duration_hours {
            0.0
        } else if is_recurring_user {
            hours * rate * self.recurring_discount
        } else {
            hours * rate
        };

        tracing::debug!(
            vehicle = %ticket.vehicle_reg_number,
            %parking_type,
            hours,
            is_recurring_user,
            price,
            "Fare calculated"
        );
        ticket.price = Some(price);
        Ok(price)
    }
}
