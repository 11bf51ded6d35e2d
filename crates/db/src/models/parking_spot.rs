//! Parking spot rows.

use parkit_core::error::ParkingError;
use parkit_core::parking::ParkingSpot;
use parkit_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `parking_spots` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ParkingSpotRow {
    pub id: DbId,
    pub category: String,
    pub is_available: bool,
}

impl TryFrom<ParkingSpotRow> for ParkingSpot {
    type Error = ParkingError;

    fn try_from(row: ParkingSpotRow) -> Result<Self, Self::Error> {
        Ok(ParkingSpot::new(row.id, row.category.parse()?, row.is_available))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use parkit_core::parking::ParkingType;

    use super::*;

    #[test]
    fn row_converts_to_spot() {
        let row = ParkingSpotRow {
            id: 4,
            category: "BIKE".to_string(),
            is_available: true,
        };
        let spot = ParkingSpot::try_from(row).unwrap();
        assert_eq!(spot, ParkingSpot::new(4, ParkingType::Bike, true));
    }

    #[test]
    fn unknown_category_is_rejected() {
        let row = ParkingSpotRow {
            id: 9,
            category: "TRUCK".to_string(),
            is_available: true,
        };
        assert_matches!(
            ParkingSpot::try_from(row),
            Err(ParkingError::UnknownCategory(_))
        );
    }
}
