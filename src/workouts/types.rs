//! Workout types and enums.
//!
//! A workout is one shared record of common fields plus an [`Activity`]
//! payload. The derived metric (pace or speed) is computed once when the
//! workout is assembled and cached alongside the inputs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::codec::StoredValues;

/// Identifier of a workout.
///
/// Assigned once at creation and never changed afterwards. It is the join
/// key between the store, the persisted record and the marker registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkoutId(String);

impl WorkoutId {
    /// Wrap an existing identifier string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkoutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WorkoutId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A map position, serialized as `[lat, lng]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinates {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl From<[f64; 2]> for Coordinates {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self { lat, lng }
    }
}

impl From<Coordinates> for [f64; 2] {
    fn from(coords: Coordinates) -> Self {
        [coords.lat, coords.lng]
    }
}

/// Kind of workout, used as the `type` discriminant in persisted records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutKind {
    Running,
    Cycling,
}

impl WorkoutKind {
    /// Lowercase label, as stored and as used in CSS class names.
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkoutKind::Running => "running",
            WorkoutKind::Cycling => "cycling",
        }
    }

    /// Emoji shown in marker popups and list items.
    pub fn icon(&self) -> &'static str {
        match self {
            WorkoutKind::Running => "🏃‍♂️",
            WorkoutKind::Cycling => "🚴‍♀️",
        }
    }
}

impl fmt::Display for WorkoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkoutKind::Running => write!(f, "Running"),
            WorkoutKind::Cycling => write!(f, "Cycling"),
        }
    }
}

impl FromStr for WorkoutKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "running" => Ok(WorkoutKind::Running),
            "cycling" => Ok(WorkoutKind::Cycling),
            other => Err(ValidationError::UnknownKind(other.to_string())),
        }
    }
}

/// Variant-specific input of a workout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activity {
    /// Running session with cadence in steps per minute
    Running { cadence_spm: f64 },
    /// Cycling session with elevation gain in meters
    Cycling { elevation_gain_m: f64 },
}

impl Activity {
    pub fn kind(&self) -> WorkoutKind {
        match self {
            Activity::Running { .. } => WorkoutKind::Running,
            Activity::Cycling { .. } => WorkoutKind::Cycling,
        }
    }
}

const MINUTES_PER_HOUR: f64 = 60.0;

/// Compute the derived metric for an activity.
///
/// Running yields pace in min/km, cycling yields speed in km/h.
pub fn derived_metric(kind: WorkoutKind, distance_km: f64, duration_min: f64) -> f64 {
    match kind {
        WorkoutKind::Running => duration_min / distance_km,
        WorkoutKind::Cycling => distance_km / (duration_min / MINUTES_PER_HOUR),
    }
}

/// A single logged exercise session.
#[derive(Debug, Clone, PartialEq)]
pub struct Workout {
    id: WorkoutId,
    created_at: DateTime<Utc>,
    coordinates: Coordinates,
    distance_km: f64,
    duration_min: f64,
    description: String,
    activity: Activity,
    metric: f64,
    stored: StoredValues,
}

impl Workout {
    /// Assemble a workout from already validated parts.
    pub(crate) fn assemble(
        id: WorkoutId,
        created_at: DateTime<Utc>,
        coordinates: Coordinates,
        distance_km: f64,
        duration_min: f64,
        description: String,
        activity: Activity,
    ) -> Self {
        let metric = derived_metric(activity.kind(), distance_km, duration_min);
        let stored =
            StoredValues::from_parts(created_at, coordinates, distance_km, duration_min, &activity);

        Self {
            id,
            created_at,
            coordinates,
            distance_km,
            duration_min,
            description,
            activity,
            metric,
            stored,
        }
    }

    /// Replace the stored form with the one read from a record.
    pub(crate) fn with_stored(mut self, stored: StoredValues) -> Self {
        self.stored = stored;
        self
    }

    pub(crate) fn stored(&self) -> &StoredValues {
        &self.stored
    }

    pub fn id(&self) -> &WorkoutId {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn coordinates(&self) -> Coordinates {
        self.coordinates
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_km
    }

    pub fn duration_min(&self) -> f64 {
        self.duration_min
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn activity(&self) -> Activity {
        self.activity
    }

    pub fn kind(&self) -> WorkoutKind {
        self.activity.kind()
    }

    /// Pace or speed, whichever applies to this kind.
    pub fn derived_metric(&self) -> f64 {
        self.metric
    }

    /// Pace in min/km (running only).
    pub fn pace_min_per_km(&self) -> Option<f64> {
        match self.activity {
            Activity::Running { .. } => Some(self.metric),
            Activity::Cycling { .. } => None,
        }
    }

    /// Speed in km/h (cycling only).
    pub fn speed_km_per_h(&self) -> Option<f64> {
        match self.activity {
            Activity::Cycling { .. } => Some(self.metric),
            Activity::Running { .. } => None,
        }
    }

    pub fn cadence_spm(&self) -> Option<f64> {
        match self.activity {
            Activity::Running { cadence_spm } => Some(cadence_spm),
            Activity::Cycling { .. } => None,
        }
    }

    pub fn elevation_gain_m(&self) -> Option<f64> {
        match self.activity {
            Activity::Cycling { elevation_gain_m } => Some(elevation_gain_m),
            Activity::Running { .. } => None,
        }
    }

    /// Overwrite the description. Only the store renames workouts.
    pub(crate) fn set_description(&mut self, description: String) {
        self.description = description;
    }

    /// Value of the given numeric sort field.
    pub(crate) fn sort_value(&self, key: SortKey) -> Option<f64> {
        match key {
            SortKey::Default => None,
            SortKey::DistanceKm => Some(self.distance_km),
            SortKey::DurationMin => Some(self.duration_min),
        }
    }
}

/// Ordering used when projecting the workout list for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Insertion order
    #[default]
    Default,
    /// Ascending by distance
    DistanceKm,
    /// Ascending by duration
    DurationMin,
}

impl FromStr for SortKey {
    type Err = ValidationError;

    /// Parse the values offered by the sort dropdown.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "default" => Ok(SortKey::Default),
            "distance" => Ok(SortKey::DistanceKm),
            "duration" => Ok(SortKey::DurationMin),
            other => Err(ValidationError::UnknownSortKey(other.to_string())),
        }
    }
}

/// Rejected user input. The store never sees a workout that failed these checks.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },

    #[error("{field} must be greater than zero")]
    NotPositive { field: &'static str },

    #[error("Unknown workout type: {0}")]
    UnknownKind(String),

    #[error("Unknown sort order: {0}")]
    UnknownSortKey(String),
}
