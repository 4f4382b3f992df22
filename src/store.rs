//! The workout store.
//!
//! Owns the ordered workout sequence and the marker registry, writes a full
//! snapshot to the durable store after each mutation and tells the view what
//! changed. Nothing else mutates the sequence.

use std::collections::HashMap;

use crate::storage::config::DEFAULT_STORAGE_KEY;
use crate::storage::{DurableStore, StorageError};
use crate::view::{MarkerHandle, WorkoutView};
use crate::workouts::{
    decode_records, encode_records, rehydrate_all, CodecError, SortKey, Workout, WorkoutId,
    WorkoutRecord,
};

/// Ordered collection of workouts kept in sync with storage and a view.
pub struct WorkoutStore<V: WorkoutView> {
    workouts: Vec<Workout>,
    markers: HashMap<WorkoutId, MarkerHandle>,
    storage: Box<dyn DurableStore>,
    storage_key: String,
    view: V,
}

impl<V: WorkoutView> WorkoutStore<V> {
    /// Create an empty store persisting under the default key.
    pub fn new(storage: Box<dyn DurableStore>, view: V) -> Self {
        Self::with_key(storage, view, DEFAULT_STORAGE_KEY)
    }

    /// Create an empty store persisting under `key`.
    pub fn with_key(storage: Box<dyn DurableStore>, view: V, key: &str) -> Self {
        Self {
            workouts: Vec::new(),
            markers: HashMap::new(),
            storage,
            storage_key: key.to_string(),
            view,
        }
    }

    /// Append a workout, persist and render it.
    pub fn add(&mut self, workout: Workout) {
        tracing::info!("Added workout {} ({})", workout.id(), workout.description());

        self.render_added(&workout);
        self.workouts.push(workout);
        self.persist();
        self.refresh_controls();
    }

    /// Remove a workout. Unknown ids are ignored.
    pub fn remove(&mut self, id: &WorkoutId) {
        let Some(index) = self.position(id) else {
            tracing::debug!("Ignoring removal of unknown workout {}", id);
            return;
        };

        self.workouts.remove(index);
        let marker = self.markers.remove(id);
        self.persist();
        self.view.on_removed(id, marker);
        self.refresh_controls();

        tracing::info!("Removed workout {}", id);
    }

    /// Remove every workout and the persisted snapshot.
    pub fn remove_all(&mut self) {
        let count = self.workouts.len();
        self.workouts.clear();
        let markers: Vec<MarkerHandle> = self.markers.drain().map(|(_, handle)| handle).collect();

        if let Err(e) = self.storage.remove(&self.storage_key) {
            tracing::warn!("Failed to clear stored workouts: {}", e);
        }
        self.view.on_cleared_all(markers);
        self.refresh_controls();

        tracing::info!("Removed all {} workouts", count);
    }

    /// Rename a workout. Blank names and unknown ids are ignored.
    pub fn rename(&mut self, id: &WorkoutId, description: &str) {
        if description.trim().is_empty() {
            tracing::debug!("Ignoring blank name for workout {}", id);
            return;
        }
        let Some(index) = self.position(id) else {
            tracing::debug!("Ignoring rename of unknown workout {}", id);
            return;
        };

        self.workouts[index].set_description(description.to_string());
        self.persist();
        self.view
            .on_renamed(id, self.markers.get(id), description);

        tracing::info!("Renamed workout {} to {:?}", id, description);
    }

    /// Read-only view of the workouts in the requested order.
    ///
    /// Numeric keys sort ascending and keep insertion order between equal values.
    pub fn project(&self, key: SortKey) -> Vec<&Workout> {
        project(&self.workouts, key)
    }

    /// Rebuild the list in the requested order. Markers are left alone.
    pub fn render_projection(&mut self, key: SortKey) {
        let projected = project(&self.workouts, key);
        self.view.on_bulk_rendered(&projected);

        tracing::debug!("Rendered {} workouts sorted by {:?}", projected.len(), key);
    }

    /// Append rehydrated records in order without writing them back.
    ///
    /// If any record is unusable, or an id appears twice, the whole batch is
    /// dropped and nothing is added. Returns the number of workouts loaded.
    pub fn load(&mut self, records: Vec<WorkoutRecord>) -> usize {
        let workouts = match rehydrate_all(records).and_then(|w| self.reject_known_ids(w)) {
            Ok(workouts) => workouts,
            Err(e) => {
                tracing::warn!("Discarding stored workouts: {}", e);
                return 0;
            }
        };

        let count = workouts.len();
        for workout in workouts {
            self.render_added(&workout);
            self.workouts.push(workout);
        }
        self.refresh_controls();

        tracing::info!("Loaded {} stored workouts", count);
        count
    }

    /// Load whatever snapshot the durable store holds.
    ///
    /// Missing, unreadable or malformed data all leave the store empty.
    pub fn hydrate(&mut self) -> usize {
        let json = match self.storage.get(&self.storage_key) {
            Ok(Some(json)) => json,
            Ok(None) => return 0,
            Err(e) => {
                tracing::warn!("Failed to read stored workouts: {}", e);
                return 0;
            }
        };

        match decode_records(&json) {
            Ok(records) => self.load(records),
            Err(e) => {
                tracing::warn!("Discarding stored workouts: {}", e);
                0
            }
        }
    }

    /// Snapshot of every workout in insertion order.
    pub fn to_persistable(&self) -> Vec<WorkoutRecord> {
        self.workouts.iter().map(WorkoutRecord::from).collect()
    }

    /// Place markers for workouts that do not have one yet.
    pub fn restore_markers(&mut self) -> usize {
        let mut placed = 0;
        for workout in &self.workouts {
            if self.markers.contains_key(workout.id()) {
                continue;
            }
            if let Some(handle) = self.view.place_marker(workout) {
                self.markers.insert(workout.id().clone(), handle);
                placed += 1;
            }
        }
        placed
    }

    pub fn get(&self, id: &WorkoutId) -> Option<&Workout> {
        self.workouts.iter().find(|w| w.id() == id)
    }

    /// Workouts in insertion order.
    pub fn workouts(&self) -> &[Workout] {
        &self.workouts
    }

    pub fn len(&self) -> usize {
        self.workouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workouts.is_empty()
    }

    pub fn marker(&self, id: &WorkoutId) -> Option<&MarkerHandle> {
        self.markers.get(id)
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// Access to the view for collaborator wiring. The sequence stays private.
    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    fn reject_known_ids(&self, workouts: Vec<Workout>) -> Result<Vec<Workout>, CodecError> {
        match workouts.iter().find(|w| self.position(w.id()).is_some()) {
            Some(known) => Err(CodecError::DuplicateId(known.id().to_string())),
            None => Ok(workouts),
        }
    }

    fn position(&self, id: &WorkoutId) -> Option<usize> {
        self.workouts.iter().position(|w| w.id() == id)
    }

    fn render_added(&mut self, workout: &Workout) {
        if let Some(handle) = self.view.on_added(workout) {
            self.markers.insert(workout.id().clone(), handle);
        }
    }

    fn refresh_controls(&mut self) {
        let visible = !self.workouts.is_empty();
        self.view.set_controls_visible(visible);
    }

    /// Overwrite the stored snapshot. Failures are logged and otherwise ignored.
    fn persist(&mut self) {
        if let Err(e) = self.write_snapshot() {
            tracing::warn!("Failed to persist workouts: {}", e);
        }
    }

    fn write_snapshot(&mut self) -> Result<(), StorageError> {
        let json = encode_records(&self.to_persistable())?;
        self.storage.set(&self.storage_key, &json)
    }
}

fn project(workouts: &[Workout], key: SortKey) -> Vec<&Workout> {
    let mut projected: Vec<&Workout> = workouts.iter().collect();
    if key != SortKey::Default {
        // sort_by is stable
        projected.sort_by(|a, b| {
            let a = a.sort_value(key).unwrap_or_default();
            let b = b.sort_value(key).unwrap_or_default();
            a.total_cmp(&b)
        });
    }
    projected
}
