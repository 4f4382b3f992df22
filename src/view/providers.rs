//! Interfaces of the external collaborators: map, list, notices and position.

use std::future::Future;
use thiserror::Error;

use crate::workouts::{Coordinates, WorkoutId};

/// Opaque reference to a marker placed by a [`MapProvider`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MarkerHandle(pub u64);

/// Map layer holding one marker per workout.
pub trait MapProvider {
    /// Place a marker for `id` at `coordinates`.
    fn place_marker(&mut self, id: &WorkoutId, coordinates: Coordinates) -> MarkerHandle;

    /// Take a marker off the map.
    fn remove_marker(&mut self, handle: &MarkerHandle);

    /// Replace the popup text of a marker.
    fn set_marker_text(&mut self, handle: &MarkerHandle, text: &str);

    /// Move the view to `coordinates` at `zoom`.
    fn pan_to(&mut self, coordinates: Coordinates, zoom: u8);
}

/// Workout list in the sidebar, keyed by workout id.
pub trait ListRenderer {
    fn append_item(&mut self, id: &WorkoutId, html: &str);

    fn remove_item(&mut self, id: &WorkoutId);

    fn clear_items(&mut self);

    /// Replace the title text of one item.
    fn patch_item_text(&mut self, id: &WorkoutId, text: &str);

    /// Show or hide the delete-all button and the sort dropdown.
    fn set_controls_visible(&mut self, visible: bool);
}

/// User-facing notices shown as blocking prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// The workout form contained bad or missing numbers
    InvalidInput,
    /// The current position could not be determined
    LocationUnavailable,
}

pub trait Notifier {
    fn show(&mut self, notice: Notice);
}

/// Errors acquiring the current position.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeolocationError {
    #[error("Position unavailable: {0}")]
    Unavailable(String),

    #[error("Timed out waiting for a position")]
    Timeout,
}

/// One-shot position source.
pub trait GeolocationProvider {
    fn current_position(
        &self,
    ) -> impl Future<Output = Result<Coordinates, GeolocationError>> + Send;
}

/// Position source answering with a configured position, or failing when
/// none is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedLocation {
    position: Option<Coordinates>,
}

impl FixedLocation {
    pub fn new(position: Option<Coordinates>) -> Self {
        Self { position }
    }
}

impl GeolocationProvider for FixedLocation {
    fn current_position(
        &self,
    ) -> impl Future<Output = Result<Coordinates, GeolocationError>> + Send {
        let position = self.position;
        async move {
            position.ok_or_else(|| GeolocationError::Unavailable("no position configured".into()))
        }
    }
}
