//! Full entry/exit cycles over the in-memory store.

mod common;

use chrono::{Duration, Utc};
use parkit_core::fare::{duration_hours, FareCalculator, DEFAULT_CAR_RATE_PER_HOUR};
use parkit_core::parking::ParkingType;
use parkit_core::parking_service::ParkingService;
use parkit_core::store::memory::InMemoryStore;
use parkit_core::store::{SpotStore, StoreResult};

use common::ScriptedInput;

const VEHICLE: &str = "ABCDEF";

fn service(store: &InMemoryStore) -> ParkingService<ScriptedInput, InMemoryStore, InMemoryStore> {
    ParkingService::new(
        ScriptedInput::new(1, VEHICLE),
        store.clone(),
        store.clone(),
        FareCalculator::default(),
    )
}

#[tokio::test]
async fn parking_a_car_takes_the_spot_out_of_circulation() {
    let store = InMemoryStore::with_default_layout();
    let svc = service(&store);

    let receipt = svc.process_incoming_vehicle().await.unwrap();

    assert_eq!(receipt.ticket.parking_spot.id, 1);
    assert_eq!(store.spot(1).map(|s| s.is_available), Some(false));
    match store.next_available_slot(ParkingType::Car).await {
        StoreResult::Found(next) => assert_ne!(next, receipt.ticket.parking_spot.id),
        other => panic!("expected a free car spot, got {other:?}"),
    }
    assert_eq!(store.tickets_for(VEHICLE).len(), 1);
}

#[tokio::test]
async fn parking_lot_exit_records_price_and_out_time() {
    let store = InMemoryStore::with_default_layout();
    let svc = service(&store);
    let entry = Utc::now();

    svc.process_incoming_vehicle_at(entry).await.unwrap();
    let receipt = svc
        .process_exiting_vehicle(entry + Duration::hours(1))
        .await
        .unwrap();

    let history = store.tickets_for(VEHICLE);
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].exit_time, Some(entry + Duration::hours(1)));
    assert!(history[0].price.unwrap() > 0.0);
    assert_eq!(history[0].price, Some(receipt.price));
    assert_eq!(store.spot(1).map(|s| s.is_available), Some(true));
}

#[tokio::test]
async fn second_visit_gets_recurring_discount() {
    let store = InMemoryStore::with_default_layout();
    let svc = service(&store);
    let first_entry = Utc::now() - Duration::hours(3);

    // First visit: a short stay, free of charge.
    let first_entry_receipt = svc.process_incoming_vehicle_at(first_entry).await.unwrap();
    assert!(!first_entry_receipt.returning_vehicle);
    let first_exit = svc
        .process_exiting_vehicle(first_entry + Duration::minutes(10))
        .await
        .unwrap();
    assert_eq!(first_exit.price, 0.0);
    assert!(!first_exit.recurring_user);

    // Second visit: one hour, discounted.
    let second_entry = Utc::now() - Duration::hours(1);
    let second_entry_receipt = svc.process_incoming_vehicle_at(second_entry).await.unwrap();
    assert!(second_entry_receipt.returning_vehicle);
    let second_exit = svc
        .process_exiting_vehicle(second_entry + Duration::hours(1))
        .await
        .unwrap();

    let history = store.tickets_for(VEHICLE);
    assert_eq!(history.len(), 2);
    let closed = &history[1];
    let hours = duration_hours(closed.entry_time, closed.exit_time.unwrap());
    let undiscounted = hours * DEFAULT_CAR_RATE_PER_HOUR;

    assert!(second_exit.recurring_user);
    assert!((closed.price.unwrap() - undiscounted * 0.95).abs() < 0.01);
    assert!(closed.price.unwrap() < undiscounted);
    assert_eq!(store.spot(1).map(|s| s.is_available), Some(true));
}

#[tokio::test]
async fn full_facility_rejects_fourth_car() {
    let store = InMemoryStore::with_default_layout();
    for vehicle in ["CAR-1", "CAR-2", "CAR-3"] {
        let svc = ParkingService::new(
            ScriptedInput::new(1, vehicle),
            store.clone(),
            store.clone(),
            FareCalculator::default(),
        );
        svc.process_incoming_vehicle().await.unwrap();
    }

    let svc = ParkingService::new(
        ScriptedInput::new(1, "CAR-4"),
        store.clone(),
        store.clone(),
        FareCalculator::default(),
    );
    let err = svc.process_incoming_vehicle().await.unwrap_err();

    assert_eq!(err.to_string(), "Unexpected error while fetching parking slot");
    assert!(store.tickets_for("CAR-4").is_empty());
}
