//! Integration tests for startup with and without a position.

use super::fakes::{DeniedLocation, Harness, SilentLocation};
use waymark::storage::AppConfig;
use waymark::view::{FixedLocation, GeolocationError, Notice};
use waymark::workouts::{
    encode_records, Activity, Coordinates, WorkoutFactory, WorkoutForm, WorkoutKind, WorkoutRecord,
};
use waymark::Command;

/// JSON snapshot of two stored workouts.
fn stored_snapshot() -> String {
    let mut factory = WorkoutFactory::new();
    let workouts = vec![
        factory
            .create(
                Coordinates::new(40.0, -3.7),
                6.0,
                33.0,
                Activity::Running { cadence_spm: 172.0 },
            )
            .unwrap(),
        factory
            .create(
                Coordinates::new(40.1, -3.6),
                25.0,
                75.0,
                Activity::Cycling { elevation_gain_m: 210.0 },
            )
            .unwrap(),
    ];
    let records: Vec<WorkoutRecord> = workouts.iter().map(WorkoutRecord::from).collect();
    encode_records(&records).unwrap()
}

fn form() -> WorkoutForm {
    WorkoutForm {
        kind: WorkoutKind::Running,
        distance_km: 4.0,
        duration_min: 22.0,
        cadence_spm: 165.0,
        elevation_gain_m: f64::NAN,
    }
}

#[tokio::test]
async fn test_start_restores_markers_and_centres_map() {
    let harness = Harness::with_stored(&stored_snapshot());
    let mut app = harness.app(AppConfig::default());
    let here = Coordinates::new(40.4, -3.7);

    let result = app.start(&FixedLocation::new(Some(here)), harness.map()).await;

    assert_eq!(result, Ok(here));
    assert_eq!(app.store().len(), 2);
    assert_eq!(app.store().marker_count(), 2);
    assert_eq!(harness.map.borrow().views.first(), Some(&(here, 9)));

    let map = harness.map.borrow();
    for workout in app.store().workouts() {
        let marker = map.marker_for(workout.id()).unwrap();
        assert_eq!(marker.coordinates, workout.coordinates());
        assert!(marker.text.ends_with(workout.description()));
    }
    assert_eq!(harness.list.borrow().items.len(), 2);
    assert!(harness.notices.borrow().is_empty());
}

#[tokio::test]
async fn test_start_with_empty_storage_hides_controls() {
    let harness = Harness::new();
    let mut app = harness.app(AppConfig::default());

    app.start(&FixedLocation::new(Some(Coordinates::new(0.0, 0.0))), harness.map())
        .await
        .unwrap();

    assert!(app.store().is_empty());
    assert!(!harness.list.borrow().controls_visible);
}

#[tokio::test]
async fn test_denied_location_leaves_list_only_mode() {
    let harness = Harness::with_stored(&stored_snapshot());
    let mut app = harness.app(AppConfig::default());

    let result = app.start(&DeniedLocation, harness.map()).await;

    assert_eq!(result, Err(GeolocationError::Unavailable("denied".to_string())));
    assert_eq!(*harness.notices.borrow(), vec![Notice::LocationUnavailable]);

    // the list is still populated and usable
    assert_eq!(app.store().len(), 2);
    assert_eq!(harness.list.borrow().items.len(), 2);
    assert!(harness.list.borrow().controls_visible);
    assert_eq!(app.store().marker_count(), 0);
    assert!(harness.map.borrow().markers.is_empty());

    // map clicks do nothing without a map
    app.dispatch(Command::MapClicked(Coordinates::new(40.0, -3.7)));
    assert!(!app.form_open());
    app.dispatch(Command::SubmitWorkout(form()));
    assert_eq!(app.store().len(), 2);
}

#[tokio::test]
async fn test_silent_location_times_out() {
    let harness = Harness::new();
    let mut config = AppConfig::default();
    config.location.timeout_secs = 0;
    let mut app = harness.app(config);

    let result = app.start(&SilentLocation, harness.map()).await;

    assert_eq!(result, Err(GeolocationError::Timeout));
    assert_eq!(*harness.notices.borrow(), vec![Notice::LocationUnavailable]);
    assert!(harness.map.borrow().views.is_empty());
}

#[tokio::test]
async fn test_late_map_attach_places_loaded_markers() {
    let harness = Harness::with_stored(&stored_snapshot());
    let mut app = harness.app(AppConfig::default());
    let _ = app.start(&DeniedLocation, harness.map()).await;

    app.attach_map(harness.map(), Coordinates::new(40.4, -3.7));

    assert_eq!(app.store().marker_count(), 2);
    assert_eq!(harness.map.borrow().markers.len(), 2);

    app.dispatch(Command::MapClicked(Coordinates::new(40.3, -3.8)));
    app.dispatch(Command::SubmitWorkout(form()));
    assert_eq!(app.store().len(), 3);
    assert_eq!(harness.map.borrow().markers.len(), 3);
}
