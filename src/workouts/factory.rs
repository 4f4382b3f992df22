//! Workout construction from user input.
//!
//! Validates form values, assigns a timestamp-derived id and generates the
//! default description.

use chrono::{DateTime, Datelike, SubsecRound, Utc};

use super::types::{Activity, Coordinates, ValidationError, Workout, WorkoutId, WorkoutKind};

/// Ids keep the last ten digits of the epoch-millisecond clock.
const ID_MODULUS: u64 = 10_000_000_000;

/// Candidates this close behind the last issued id are treated as collisions.
const COLLISION_WINDOW_MS: u64 = 1_000;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Values submitted through the new-workout form.
///
/// The form carries both variant fields; only the one matching `kind` is read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkoutForm {
    pub kind: WorkoutKind,
    pub distance_km: f64,
    pub duration_min: f64,
    pub cadence_spm: f64,
    pub elevation_gain_m: f64,
}

impl WorkoutForm {
    /// Parse a raw form field. Blank or malformed text becomes NaN, which
    /// validation then rejects.
    pub fn parse_field(raw: &str) -> f64 {
        raw.trim().parse::<f64>().unwrap_or(f64::NAN)
    }

    /// The variant-specific input selected by `kind`.
    pub fn activity(&self) -> Activity {
        match self.kind {
            WorkoutKind::Running => Activity::Running {
                cadence_spm: self.cadence_spm,
            },
            WorkoutKind::Cycling => Activity::Cycling {
                elevation_gain_m: self.elevation_gain_m,
            },
        }
    }
}

/// Check the numeric inputs of a workout.
///
/// Distance and duration must be finite and positive. Running cadence must be
/// finite and positive. Cycling elevation gain must be finite and may be zero
/// or negative (a net descent).
pub fn validate(
    distance_km: f64,
    duration_min: f64,
    activity: &Activity,
) -> Result<(), ValidationError> {
    finite("distance", distance_km)?;
    finite("duration", duration_min)?;
    match *activity {
        Activity::Running { cadence_spm } => finite("cadence", cadence_spm)?,
        Activity::Cycling { elevation_gain_m } => finite("elevation gain", elevation_gain_m)?,
    }

    positive("distance", distance_km)?;
    positive("duration", duration_min)?;
    if let Activity::Running { cadence_spm } = *activity {
        positive("cadence", cadence_spm)?;
    }

    Ok(())
}

fn finite(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::NotFinite { field })
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::NotPositive { field })
    }
}

/// Format the default description, e.g. `"Running on April 14"`.
///
/// Month and day are taken from the UTC creation timestamp.
pub fn describe(kind: WorkoutKind, created_at: DateTime<Utc>) -> String {
    let month = MONTH_NAMES[created_at.month0() as usize];
    format!("{} on {} {}", kind, month, created_at.day())
}

/// Builds new workouts and hands out their ids.
#[derive(Debug, Default)]
pub struct WorkoutFactory {
    last_issued: Option<u64>,
}

impl WorkoutFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a workout stamped with the current time.
    pub fn create(
        &mut self,
        coordinates: Coordinates,
        distance_km: f64,
        duration_min: f64,
        activity: Activity,
    ) -> Result<Workout, ValidationError> {
        self.create_at(coordinates, distance_km, duration_min, activity, Utc::now())
    }

    /// Create a workout from a submitted form.
    pub fn create_from_form(
        &mut self,
        coordinates: Coordinates,
        form: &WorkoutForm,
    ) -> Result<Workout, ValidationError> {
        self.create(coordinates, form.distance_km, form.duration_min, form.activity())
    }

    /// Create a workout with an explicit creation time.
    pub fn create_at(
        &mut self,
        coordinates: Coordinates,
        distance_km: f64,
        duration_min: f64,
        activity: Activity,
        created_at: DateTime<Utc>,
    ) -> Result<Workout, ValidationError> {
        validate(distance_km, duration_min, &activity)?;

        // stored timestamps carry milliseconds
        let created_at = created_at.trunc_subsecs(3);
        let id = self.next_id(created_at);
        let description = describe(activity.kind(), created_at);

        tracing::debug!("Created {} workout {}", activity.kind().as_str(), id);

        Ok(Workout::assemble(
            id,
            created_at,
            coordinates,
            distance_km,
            duration_min,
            description,
            activity,
        ))
    }

    /// Derive an id from the timestamp, stepping past the previous id when two
    /// workouts are created within the same clock resolution.
    fn next_id(&mut self, created_at: DateTime<Utc>) -> WorkoutId {
        let millis = created_at.timestamp_millis().unsigned_abs();
        let mut candidate = millis % ID_MODULUS;

        if let Some(last) = self.last_issued {
            if candidate <= last && last - candidate < COLLISION_WINDOW_MS {
                candidate = (last + 1) % ID_MODULUS;
            }
        }

        self.last_issued = Some(candidate);
        WorkoutId::new(format!("{:010}", candidate))
    }
}
