//! Waymark - Workout Map Tracker
//!
//! Headless host: loads the stored workouts, brings up a console map and
//! list, and logs what is on them.

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use waymark::storage::config::{get_config_path, load_config, save_config};
use waymark::storage::FileStore;
use waymark::view::{FixedLocation, ListRenderer, MapProvider, MarkerHandle, Notice, Notifier};
use waymark::workouts::{Coordinates, SortKey, WorkoutId};
use waymark::App;

/// Map provider that logs instead of drawing.
#[derive(Default)]
struct ConsoleMap {
    next_marker: u64,
}

impl MapProvider for ConsoleMap {
    fn place_marker(&mut self, id: &WorkoutId, coordinates: Coordinates) -> MarkerHandle {
        self.next_marker += 1;
        tracing::info!(
            "marker #{} for {} at ({:.4}, {:.4})",
            self.next_marker,
            id,
            coordinates.lat,
            coordinates.lng
        );
        MarkerHandle(self.next_marker)
    }

    fn remove_marker(&mut self, handle: &MarkerHandle) {
        tracing::info!("marker #{} removed", handle.0);
    }

    fn set_marker_text(&mut self, handle: &MarkerHandle, text: &str) {
        tracing::info!("marker #{}: {}", handle.0, text);
    }

    fn pan_to(&mut self, coordinates: Coordinates, zoom: u8) {
        tracing::info!(
            "view at ({:.4}, {:.4}) zoom {}",
            coordinates.lat,
            coordinates.lng,
            zoom
        );
    }
}

/// List renderer that logs instead of drawing.
struct ConsoleList;

impl ListRenderer for ConsoleList {
    fn append_item(&mut self, id: &WorkoutId, _html: &str) {
        tracing::debug!("list item {} added", id);
    }

    fn remove_item(&mut self, id: &WorkoutId) {
        tracing::debug!("list item {} removed", id);
    }

    fn clear_items(&mut self) {
        tracing::debug!("list cleared");
    }

    fn patch_item_text(&mut self, id: &WorkoutId, text: &str) {
        tracing::debug!("list item {} renamed to {}", id, text);
    }

    fn set_controls_visible(&mut self, visible: bool) {
        tracing::debug!("list controls visible: {}", visible);
    }
}

struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn show(&mut self, notice: Notice) {
        match notice {
            Notice::InvalidInput => tracing::warn!("Inputs have to be positive numbers"),
            Notice::LocationUnavailable => tracing::warn!("Could not get your position"),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = load_config().context("failed to load configuration")?;

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_filter.as_str())),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Waymark v{}", env!("CARGO_PKG_VERSION"));

    let config_path = get_config_path();
    if !config_path.exists() {
        match save_config(&config) {
            Ok(()) => tracing::info!("Wrote default config to {}", config_path.display()),
            Err(e) => tracing::warn!("Could not write default config: {}", e),
        }
    }

    let storage = FileStore::new(config.storage_dir());
    tracing::info!("Workouts stored in {}", storage.dir().display());

    let geolocation = FixedLocation::new(config.location.fixed_position());
    let mut app = App::new(
        config,
        Box::new(storage),
        Box::new(ConsoleList),
        Box::new(ConsoleNotifier),
    );

    if let Err(e) = app.start(&geolocation, Box::new(ConsoleMap::default())).await {
        tracing::debug!("Continuing in list-only mode: {}", e);
    }

    for workout in app.store().project(SortKey::Default) {
        tracing::info!(
            "{} {} - {:.0} km in {:.0} min",
            workout.id(),
            workout.description(),
            workout.distance_km(),
            workout.duration_min()
        );
    }

    Ok(())
}
