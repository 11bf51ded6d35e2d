use std::fmt::Display;
use std::str::FromStr;

use parkit_core::error::ParkingError;
use parkit_core::fare::{
    FareConfig, DEFAULT_BIKE_RATE_PER_HOUR, DEFAULT_CAR_RATE_PER_HOUR,
    DEFAULT_FREE_DURATION_HOURS, DEFAULT_RECURRING_DISCOUNT,
};

const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} must be set when PARKIT_STORE=postgres")]
    Missing { key: &'static str },

    #[error("{key} has an invalid value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error(transparent)]
    Fare(#[from] ParkingError),
}

/// Where spots and tickets are kept.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreBackend {
    Postgres { database_url: String },
    /// Process-local store with the default five-spot layout.
    Memory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Application configuration loaded from environment variables.
///
/// | Env Var              | Default    |
/// |----------------------|------------|
/// | `PARKIT_STORE`       | `postgres` |
/// | `DATABASE_URL`       | (required for `postgres`) |
/// | `DB_MAX_CONNECTIONS` | `5`        |
/// | `CAR_RATE_PER_HOUR`  | `1.5`      |
/// | `BIKE_RATE_PER_HOUR` | `1.0`      |
/// | `FREE_MINUTES`       | `30`       |
/// | `RECURRING_DISCOUNT` | `0.95`     |
/// | `LOG_FORMAT`         | `text`     |
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub store: StoreBackend,
    pub db_max_connections: u32,
    pub fare: FareConfig,
    pub log_format: LogFormat,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store = match lookup("PARKIT_STORE").as_deref().map(str::trim) {
            None | Some("") | Some("postgres") => {
                let database_url = lookup("DATABASE_URL")
                    .filter(|url| !url.trim().is_empty())
                    .ok_or(ConfigError::Missing {
                        key: "DATABASE_URL",
                    })?;
                StoreBackend::Postgres { database_url }
            }
            Some("memory") => StoreBackend::Memory,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "PARKIT_STORE",
                    value: other.to_string(),
                    reason: "expected `postgres` or `memory`".into(),
                })
            }
        };

        let db_max_connections: u32 =
            parse_or(&lookup, "DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS)?;
        if db_max_connections == 0 {
            return Err(ConfigError::Invalid {
                key: "DB_MAX_CONNECTIONS",
                value: "0".into(),
                reason: "the pool needs at least one connection".into(),
            });
        }

        let free_minutes: f64 =
            parse_or(&lookup, "FREE_MINUTES", DEFAULT_FREE_DURATION_HOURS * 60.0)?;
        let fare = FareConfig {
            car_rate_per_hour: parse_or(&lookup, "CAR_RATE_PER_HOUR", DEFAULT_CAR_RATE_PER_HOUR)?,
            bike_rate_per_hour: parse_or(
                &lookup,
                "BIKE_RATE_PER_HOUR",
                DEFAULT_BIKE_RATE_PER_HOUR,
            )?,
            free_duration_hours: free_minutes / 60.0,
            recurring_discount: parse_or(
                &lookup,
                "RECURRING_DISCOUNT",
                DEFAULT_RECURRING_DISCOUNT,
            )?,
        };
        fare.validate()?;

        let log_format = match lookup("LOG_FORMAT").as_deref().map(str::trim) {
            None | Some("") | Some("text") => LogFormat::Text,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "LOG_FORMAT",
                    value: other.to_string(),
                    reason: "expected `text` or `json`".into(),
                })
            }
        };

        Ok(Self {
            store,
            db_max_connections,
            fare,
            log_format,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) if raw.trim().is_empty() => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|err: T::Err| ConfigError::Invalid {
            key,
            value: raw.clone(),
            reason: err.to_string(),
        }),
    }
}
