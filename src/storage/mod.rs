//! Storage module for durable state and configuration.

pub mod config;
pub mod durable;

pub use config::{AppConfig, ConfigError, LocationSettings, MapSettings, StorageSettings};
pub use durable::{DurableStore, FileStore, MemoryStore, StorageError};
