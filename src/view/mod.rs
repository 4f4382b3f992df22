//! Views kept in step with the workout store: map markers and list items.

pub mod providers;
pub mod render;
pub mod sync;

pub use providers::{
    FixedLocation, GeolocationError, GeolocationProvider, ListRenderer, MapProvider,
    MarkerHandle, Notice, Notifier,
};
pub use sync::{MapListSynchronizer, WorkoutView};
