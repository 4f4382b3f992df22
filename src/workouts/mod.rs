//! Workout entities, their construction and their persisted form.

pub mod codec;
pub mod factory;
pub mod types;

pub use codec::{
    decode_records, encode_records, rehydrate, rehydrate_all, CodecError, WorkoutRecord,
};
pub use factory::{describe, validate, WorkoutFactory, WorkoutForm};
pub use types::{
    derived_metric, Activity, Coordinates, SortKey, ValidationError, Workout, WorkoutId,
    WorkoutKind,
};
