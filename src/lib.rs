//! Waymark - Workout Map Tracker
//!
//! Logs running and cycling workouts at places picked on a map, keeps them
//! across sessions and supports rename, delete, delete-all and sorting.
//! The map, the list markup host, the position source and the durable
//! key-value store are collaborators reached through traits.

pub mod app;
pub mod storage;
pub mod store;
pub mod view;
pub mod workouts;

// Re-export commonly used types
pub use app::{App, ClickTarget, Command};
pub use storage::config::AppConfig;
pub use store::WorkoutStore;
pub use view::{MapListSynchronizer, WorkoutView};
pub use workouts::{Workout, WorkoutFactory, WorkoutKind};
