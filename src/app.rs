//! Application state and command dispatch.
//!
//! Every UI gesture arrives as one [`Command`] and maps to exactly one store
//! operation. Clicks inside the workout list are classified once by the host
//! into a [`ClickTarget`] so a single handler decides what the click means.

use std::time::Duration;

use crate::storage::{AppConfig, DurableStore};
use crate::store::WorkoutStore;
use crate::view::{
    GeolocationError, GeolocationProvider, ListRenderer, MapListSynchronizer, MapProvider,
    Notice, Notifier,
};
use crate::workouts::{Coordinates, SortKey, WorkoutFactory, WorkoutForm, WorkoutId};

/// Part of a list entry that received a click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// The delete button
    Delete,
    /// The edit (rename) button
    Edit,
    /// Anywhere else on the entry
    Body,
}

/// A user gesture.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// The map was clicked; opens the workout form at that spot
    MapClicked(Coordinates),
    /// The workout form was submitted
    SubmitWorkout(WorkoutForm),
    /// A list entry was clicked
    ListClicked { id: WorkoutId, target: ClickTarget },
    /// The rename form was submitted
    SubmitRename(String),
    /// The rename form was closed without submitting
    CancelRename,
    /// The delete-all button was clicked
    DeleteAll,
    /// The sort dropdown changed
    ChangeSort(SortKey),
}

/// The workout tracker.
pub struct App {
    config: AppConfig,
    factory: WorkoutFactory,
    store: WorkoutStore<MapListSynchronizer>,
    notifier: Box<dyn Notifier>,
    /// Where the open workout form will place its workout
    pending_coordinates: Option<Coordinates>,
    /// Workout whose rename form is open
    rename_target: Option<WorkoutId>,
    sort_key: SortKey,
}

impl App {
    /// Wire up the application. Nothing is loaded until [`App::start`].
    pub fn new(
        config: AppConfig,
        storage: Box<dyn DurableStore>,
        list: Box<dyn ListRenderer>,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        let view = MapListSynchronizer::new(list);
        let store = WorkoutStore::with_key(storage, view, &config.storage.key);

        Self {
            config,
            factory: WorkoutFactory::new(),
            store,
            notifier,
            pending_coordinates: None,
            rename_target: None,
            sort_key: SortKey::Default,
        }
    }

    /// Load stored workouts, then wait for a position and bring up the map.
    ///
    /// The list is usable as soon as this starts. If no position arrives the
    /// user is told and the app stays in list-only mode.
    pub async fn start<G: GeolocationProvider>(
        &mut self,
        geolocation: &G,
        map: Box<dyn MapProvider>,
    ) -> Result<Coordinates, GeolocationError> {
        self.store.hydrate();

        let timeout = Duration::from_secs(self.config.location.timeout_secs);
        let position = match tokio::time::timeout(timeout, geolocation.current_position()).await {
            Ok(result) => result,
            Err(_) => Err(GeolocationError::Timeout),
        };

        match position {
            Ok(here) => {
                self.attach_map(map, here);
                Ok(here)
            }
            Err(e) => {
                tracing::warn!("Could not get current position: {}", e);
                self.notifier.show(Notice::LocationUnavailable);
                Err(e)
            }
        }
    }

    /// Attach the map centred on `here` and place markers for loaded workouts.
    pub fn attach_map(&mut self, map: Box<dyn MapProvider>, here: Coordinates) {
        let zoom = self.config.map.initial_zoom;
        self.store.view_mut().attach_map(map, here, zoom);
        let placed = self.store.restore_markers();

        tracing::info!("Map ready at {:?}, placed {} markers", here, placed);
    }

    /// Handle one user gesture.
    pub fn dispatch(&mut self, command: Command) {
        tracing::debug!("Dispatching {:?}", command);

        match command {
            Command::MapClicked(coordinates) => self.open_form(coordinates),
            Command::SubmitWorkout(form) => self.submit_workout(&form),
            Command::ListClicked { id, target } => self.list_clicked(id, target),
            Command::SubmitRename(text) => self.submit_rename(&text),
            Command::CancelRename => self.rename_target = None,
            Command::DeleteAll => self.store.remove_all(),
            Command::ChangeSort(key) => {
                self.sort_key = key;
                self.store.render_projection(key);
            }
        }
    }

    fn open_form(&mut self, coordinates: Coordinates) {
        if !self.store.view().has_map() {
            tracing::debug!("Ignoring map click without a map");
            return;
        }
        self.pending_coordinates = Some(coordinates);
    }

    fn submit_workout(&mut self, form: &WorkoutForm) {
        let Some(coordinates) = self.pending_coordinates else {
            tracing::debug!("Ignoring workout form without a map position");
            return;
        };

        match self.factory.create_from_form(coordinates, form) {
            Ok(workout) => {
                self.store.add(workout);
                self.pending_coordinates = None;
                if self.sort_key != SortKey::Default {
                    self.store.render_projection(self.sort_key);
                }
            }
            Err(e) => {
                tracing::info!("Rejected workout input: {}", e);
                self.notifier.show(Notice::InvalidInput);
            }
        }
    }

    fn list_clicked(&mut self, id: WorkoutId, target: ClickTarget) {
        match target {
            ClickTarget::Delete => self.store.remove(&id),
            ClickTarget::Edit => self.rename_target = Some(id),
            ClickTarget::Body => self.move_to(&id),
        }
    }

    fn submit_rename(&mut self, text: &str) {
        let Some(id) = self.rename_target.as_ref() else {
            return;
        };
        // blank input keeps the rename form open
        if text.trim().is_empty() {
            return;
        }
        self.store.rename(id, text);
        self.rename_target = None;
    }

    fn move_to(&mut self, id: &WorkoutId) {
        let Some(coordinates) = self.store.get(id).map(|w| w.coordinates()) else {
            return;
        };
        let zoom = self.config.map.zoom_level;
        self.store.view_mut().pan_to(coordinates, zoom);
    }

    pub fn store(&self) -> &WorkoutStore<MapListSynchronizer> {
        &self.store
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    /// Whether the workout form is open.
    pub fn form_open(&self) -> bool {
        self.pending_coordinates.is_some()
    }

    /// Workout whose rename form is open, if any.
    pub fn rename_target(&self) -> Option<&WorkoutId> {
        self.rename_target.as_ref()
    }
}
