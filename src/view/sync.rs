//! Translation of store mutations into map and list updates.

use super::providers::{ListRenderer, MapProvider, MarkerHandle};
use super::render::{list_item_html, popup_text};
use crate::workouts::{Coordinates, Workout, WorkoutId};

/// Receiver of store mutations.
///
/// The store calls exactly one of these per mutation. Marker handles returned
/// from [`WorkoutView::on_added`] and [`WorkoutView::place_marker`] are kept by
/// the store and handed back when the workout goes away.
pub trait WorkoutView {
    /// Render a new workout. Returns the marker handle, or `None` without a map.
    fn on_added(&mut self, workout: &Workout) -> Option<MarkerHandle>;

    /// Drop the marker and list entry of a removed workout.
    fn on_removed(&mut self, id: &WorkoutId, marker: Option<MarkerHandle>);

    /// Drop every marker and every list entry.
    fn on_cleared_all(&mut self, markers: Vec<MarkerHandle>);

    /// Patch the list label and marker popup of a renamed workout in place.
    fn on_renamed(&mut self, id: &WorkoutId, marker: Option<&MarkerHandle>, description: &str);

    /// Rebuild the list, not the markers, in the given order.
    fn on_bulk_rendered(&mut self, workouts: &[&Workout]);

    /// Place a marker for a workout that is already listed.
    fn place_marker(&mut self, workout: &Workout) -> Option<MarkerHandle>;

    /// Show list controls only while there is something to act on.
    fn set_controls_visible(&mut self, visible: bool);
}

/// [`WorkoutView`] driving a map provider and a list renderer.
///
/// The map is optional: until a position is known (or when it never is) only
/// the list is kept up to date.
pub struct MapListSynchronizer {
    map: Option<Box<dyn MapProvider>>,
    list: Box<dyn ListRenderer>,
}

impl MapListSynchronizer {
    /// Create a synchronizer with only the list attached.
    pub fn new(list: Box<dyn ListRenderer>) -> Self {
        Self { map: None, list }
    }

    /// Create a synchronizer with both collaborators attached.
    pub fn with_map(map: Box<dyn MapProvider>, list: Box<dyn ListRenderer>) -> Self {
        Self {
            map: Some(map),
            list,
        }
    }

    /// Attach the map once it exists and centre it.
    pub fn attach_map(&mut self, mut map: Box<dyn MapProvider>, center: Coordinates, zoom: u8) {
        map.pan_to(center, zoom);
        self.map = Some(map);
    }

    pub fn has_map(&self) -> bool {
        self.map.is_some()
    }

    /// Move the map to `coordinates`. Returns `false` without a map.
    pub fn pan_to(&mut self, coordinates: Coordinates, zoom: u8) -> bool {
        match self.map.as_mut() {
            Some(map) => {
                map.pan_to(coordinates, zoom);
                true
            }
            None => false,
        }
    }
}

impl WorkoutView for MapListSynchronizer {
    fn on_added(&mut self, workout: &Workout) -> Option<MarkerHandle> {
        let marker = self.place_marker(workout);
        self.list.append_item(workout.id(), &list_item_html(workout));
        marker
    }

    fn on_removed(&mut self, id: &WorkoutId, marker: Option<MarkerHandle>) {
        if let (Some(map), Some(handle)) = (self.map.as_mut(), marker) {
            map.remove_marker(&handle);
        }
        self.list.remove_item(id);
    }

    fn on_cleared_all(&mut self, markers: Vec<MarkerHandle>) {
        if let Some(map) = self.map.as_mut() {
            for handle in &markers {
                map.remove_marker(handle);
            }
        }
        self.list.clear_items();
    }

    fn on_renamed(&mut self, id: &WorkoutId, marker: Option<&MarkerHandle>, description: &str) {
        if let (Some(map), Some(handle)) = (self.map.as_mut(), marker) {
            map.set_marker_text(handle, description);
        }
        self.list.patch_item_text(id, description);
    }

    fn on_bulk_rendered(&mut self, workouts: &[&Workout]) {
        self.list.clear_items();
        for workout in workouts {
            self.list.append_item(workout.id(), &list_item_html(workout));
        }
    }

    fn place_marker(&mut self, workout: &Workout) -> Option<MarkerHandle> {
        let map = self.map.as_mut()?;
        let handle = map.place_marker(workout.id(), workout.coordinates());
        map.set_marker_text(&handle, &popup_text(workout));
        Some(handle)
    }

    fn set_controls_visible(&mut self, visible: bool) {
        self.list.set_controls_visible(visible);
    }
}
