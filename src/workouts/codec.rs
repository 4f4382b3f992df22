//! Persisted workout records.
//!
//! The durable store keeps one JSON array of [`WorkoutRecord`]s. Records are
//! written from live workouts and rehydrated back into workouts with their id
//! and description copied verbatim and the derived metric recomputed.
//!
//! A rehydrated workout remembers the stored values it was built from (the
//! timestamp text, the JSON numbers and any fields this crate does not use),
//! so writing it back yields the record that was read.

use std::collections::HashSet;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use thiserror::Error;

use super::factory::validate;
use super::types::{Activity, Coordinates, ValidationError, Workout, WorkoutId, WorkoutKind};

/// Largest integer an `f64` holds exactly.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// One workout as stored in the durable store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutRecord {
    pub id: String,
    pub created_at: String,
    pub coordinates: [Number; 2],
    pub distance_km: Number,
    pub duration_min: Number,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: WorkoutKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cadence_spm: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation_gain_m: Option<Number>,
    /// Fields not read by this crate, written back unchanged
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Stored form of the immutable fields of a workout.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct StoredValues {
    created_at: String,
    coordinates: [Number; 2],
    distance_km: Number,
    duration_min: Number,
    /// Cadence or elevation gain, whichever the kind carries
    input: Number,
    extra: Map<String, Value>,
}

impl StoredValues {
    /// Stored form of freshly entered values.
    pub(crate) fn from_parts(
        created_at: DateTime<Utc>,
        coordinates: Coordinates,
        distance_km: f64,
        duration_min: f64,
        activity: &Activity,
    ) -> Self {
        let input = match *activity {
            Activity::Running { cadence_spm } => cadence_spm,
            Activity::Cycling { elevation_gain_m } => elevation_gain_m,
        };

        Self {
            created_at: created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            coordinates: [json_number(coordinates.lat), json_number(coordinates.lng)],
            distance_km: json_number(distance_km),
            duration_min: json_number(duration_min),
            input: json_number(input),
            extra: Map::new(),
        }
    }
}

/// JSON number for `value`, written as an integer when it is a whole number.
fn json_number(value: f64) -> Number {
    if value.fract() == 0.0 && value.abs() < MAX_EXACT_INTEGER {
        return Number::from(value as i64);
    }
    // non-finite values never pass validation
    Number::from_f64(value).unwrap_or_else(|| Number::from(0))
}

impl From<&Workout> for WorkoutRecord {
    fn from(workout: &Workout) -> Self {
        let stored = workout.stored();
        let (cadence_spm, elevation_gain_m) = match workout.kind() {
            WorkoutKind::Running => (Some(stored.input.clone()), None),
            WorkoutKind::Cycling => (None, Some(stored.input.clone())),
        };

        Self {
            id: workout.id().as_str().to_string(),
            created_at: stored.created_at.clone(),
            coordinates: stored.coordinates.clone(),
            distance_km: stored.distance_km.clone(),
            duration_min: stored.duration_min.clone(),
            description: workout.description().to_string(),
            kind: workout.kind(),
            cadence_spm,
            elevation_gain_m,
            extra: stored.extra.clone(),
        }
    }
}

/// Errors while decoding persisted workouts.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Malformed workout data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Workout {id} is missing field {field}")]
    MissingField { id: String, field: &'static str },

    #[error("Workout {id} has an invalid timestamp: {source}")]
    InvalidTimestamp {
        id: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Workout {id} is invalid: {source}")]
    Invalid {
        id: String,
        #[source]
        source: ValidationError,
    },

    #[error("Workout id {0} appears more than once")]
    DuplicateId(String),
}

/// Rebuild a workout from its record.
///
/// The id and description are taken as stored. Records that would not pass
/// the factory's validation are rejected.
pub fn rehydrate(record: WorkoutRecord) -> Result<Workout, CodecError> {
    let input = match record.kind {
        WorkoutKind::Running => record.cadence_spm.clone().ok_or_else(|| {
            CodecError::MissingField {
                id: record.id.clone(),
                field: "cadenceSpm",
            }
        })?,
        WorkoutKind::Cycling => record.elevation_gain_m.clone().ok_or_else(|| {
            CodecError::MissingField {
                id: record.id.clone(),
                field: "elevationGainM",
            }
        })?,
    };

    let created_at = DateTime::parse_from_rfc3339(&record.created_at)
        .map_err(|source| CodecError::InvalidTimestamp {
            id: record.id.clone(),
            source,
        })?
        .with_timezone(&Utc);

    let activity = match record.kind {
        WorkoutKind::Running => Activity::Running {
            cadence_spm: as_f64(&input),
        },
        WorkoutKind::Cycling => Activity::Cycling {
            elevation_gain_m: as_f64(&input),
        },
    };
    let distance_km = as_f64(&record.distance_km);
    let duration_min = as_f64(&record.duration_min);

    validate(distance_km, duration_min, &activity).map_err(|source| CodecError::Invalid {
        id: record.id.clone(),
        source,
    })?;

    let coordinates = Coordinates::new(
        as_f64(&record.coordinates[0]),
        as_f64(&record.coordinates[1]),
    );
    let stored = StoredValues {
        created_at: record.created_at,
        coordinates: record.coordinates,
        distance_km: record.distance_km,
        duration_min: record.duration_min,
        input,
        extra: record.extra,
    };

    Ok(Workout::assemble(
        WorkoutId::new(record.id),
        created_at,
        coordinates,
        distance_km,
        duration_min,
        record.description,
        activity,
    )
    .with_stored(stored))
}

/// Rebuild every record, failing on the first unusable one.
///
/// Ids must be unique within the batch.
pub fn rehydrate_all(records: Vec<WorkoutRecord>) -> Result<Vec<Workout>, CodecError> {
    let mut seen = HashSet::with_capacity(records.len());
    records
        .into_iter()
        .map(|record| {
            if !seen.insert(record.id.clone()) {
                return Err(CodecError::DuplicateId(record.id));
            }
            rehydrate(record)
        })
        .collect()
}

fn as_f64(number: &Number) -> f64 {
    number.as_f64().unwrap_or(f64::NAN)
}

/// Parse the stored JSON array.
pub fn decode_records(json: &str) -> Result<Vec<WorkoutRecord>, CodecError> {
    Ok(serde_json::from_str(json)?)
}

/// Serialize records to the stored JSON array.
pub fn encode_records(records: &[WorkoutRecord]) -> Result<String, serde_json::Error> {
    serde_json::to_string(records)
}
