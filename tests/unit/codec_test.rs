//! Unit tests for the persisted record format.

use chrono::{Duration, TimeZone, Utc};
use serde_json::{json, Value};
use waymark::storage::MemoryStore;
use waymark::view::{MarkerHandle, WorkoutView};
use waymark::workouts::{
    decode_records, encode_records, Activity, Coordinates, Workout, WorkoutFactory, WorkoutId,
    WorkoutRecord,
};
use waymark::WorkoutStore;

/// View that ignores everything.
struct NullView;

impl WorkoutView for NullView {
    fn on_added(&mut self, _workout: &Workout) -> Option<MarkerHandle> {
        None
    }
    fn on_removed(&mut self, _id: &WorkoutId, _marker: Option<MarkerHandle>) {}
    fn on_cleared_all(&mut self, _markers: Vec<MarkerHandle>) {}
    fn on_renamed(&mut self, _id: &WorkoutId, _marker: Option<&MarkerHandle>, _text: &str) {}
    fn on_bulk_rendered(&mut self, _workouts: &[&Workout]) {}
    fn place_marker(&mut self, _workout: &Workout) -> Option<MarkerHandle> {
        None
    }
    fn set_controls_visible(&mut self, _visible: bool) {}
}

fn empty_store() -> WorkoutStore<NullView> {
    WorkoutStore::new(Box::new(MemoryStore::new()), NullView)
}

fn mixed_workouts() -> Vec<Workout> {
    let mut factory = WorkoutFactory::new();
    let start = Utc.with_ymd_and_hms(2024, 2, 29, 17, 30, 0).unwrap();
    let here = Coordinates::new(60.17, 24.94);

    vec![
        factory
            .create_at(here, 7.3, 41.5, Activity::Running { cadence_spm: 176.0 }, start)
            .unwrap(),
        factory
            .create_at(
                here,
                33.1,
                72.0,
                Activity::Cycling { elevation_gain_m: 0.0 },
                start + Duration::minutes(5),
            )
            .unwrap(),
        factory
            .create_at(
                Coordinates::new(60.2, 24.9),
                2.0,
                11.25,
                Activity::Running { cadence_spm: 181.5 },
                start + Duration::days(1),
            )
            .unwrap(),
    ]
}

#[test]
fn test_round_trip_through_fresh_store() {
    let mut original = empty_store();
    for workout in mixed_workouts() {
        original.add(workout);
    }
    let renamed = original.workouts()[1].id().clone();
    original.rename(&renamed, "Coast ride");

    let snapshot = original.to_persistable();
    let json = encode_records(&snapshot).unwrap();

    let mut restored = empty_store();
    assert_eq!(restored.load(decode_records(&json).unwrap()), 3);

    assert_eq!(restored.workouts(), original.workouts());
    assert_eq!(restored.to_persistable(), snapshot);
}

#[test]
fn test_persisted_array_deep_equal_after_reload() {
    let mut store = empty_store();
    for workout in mixed_workouts() {
        store.add(workout);
    }
    let persisted: Value = serde_json::to_value(store.to_persistable()).unwrap();

    let records: Vec<WorkoutRecord> = serde_json::from_value(persisted.clone()).unwrap();
    let mut reloaded = empty_store();
    reloaded.load(records);

    assert_eq!(serde_json::to_value(reloaded.to_persistable()).unwrap(), persisted);
}

#[test]
fn test_record_shape() {
    let mut store = empty_store();
    store.add(mixed_workouts().remove(1));

    let value = serde_json::to_value(store.to_persistable()).unwrap();
    let record = &value[0];

    assert_eq!(record["type"], json!("cycling"));
    assert_eq!(record["coordinates"], json!([60.17, 24.94]));
    assert_eq!(record["distanceKm"], json!(33.1));
    // whole numbers are written as integers
    assert_eq!(record["durationMin"], json!(72));
    assert_eq!(record["elevationGainM"], json!(0));
    assert_eq!(record["description"], json!("Cycling on February 29"));
    assert!(record.get("cadenceSpm").is_none());
    assert!(record.get("speedKmPerH").is_none());
    assert!(record["id"].is_string());
    assert!(record["createdAt"].is_string());
}

/// Array in the stored schema as written by the browser version.
fn browser_array() -> Value {
    json!([
        {
            "id": "1714551600",
            "createdAt": "2024-05-01T08:20:00.123Z",
            "coordinates": [45.76, 4.84],
            "distanceKm": 5.5,
            "durationMin": 30.5,
            "description": "Running on May 1",
            "type": "running",
            "cadenceSpm": 172.5
        },
        {
            "id": "1714638000",
            "createdAt": "2024-05-02T08:20:00.000Z",
            "coordinates": [45, 5],
            "distanceKm": 40,
            "durationMin": 100,
            "description": "Commute",
            "type": "cycling",
            "elevationGainM": 0
        },
        {
            "id": "1714724400",
            "createdAt": "2024-05-03T08:20:00Z",
            "coordinates": [45.7, 4.8],
            "distanceKm": 5,
            "durationMin": 30,
            "description": "Running on May 3",
            "type": "running",
            "cadenceSpm": 172,
            "pace": 6
        }
    ])
}

#[test]
fn test_hand_written_array_round_trips_exactly() {
    let original = browser_array();
    let records: Vec<WorkoutRecord> = serde_json::from_value(original.clone()).unwrap();

    let mut store = empty_store();
    assert_eq!(store.load(records), 3);

    assert_eq!(serde_json::to_value(store.to_persistable()).unwrap(), original);
}

#[test]
fn test_hand_written_array_survives_rename() {
    let records: Vec<WorkoutRecord> = serde_json::from_value(browser_array()).unwrap();
    let mut store = empty_store();
    store.load(records);

    let id = store.workouts()[1].id().clone();
    store.rename(&id, "Long commute");

    let mut expected = browser_array();
    expected[1]["description"] = json!("Long commute");
    assert_eq!(serde_json::to_value(store.to_persistable()).unwrap(), expected);
    assert_eq!(store.workouts()[1].speed_km_per_h(), Some(24.0));
    assert_eq!(store.workouts()[2].pace_min_per_km(), Some(6.0));
}
