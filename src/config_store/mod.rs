//! Layered settings store with per-path change observation.
//!
//! Resolves dot-separated key paths against a user settings tree laid over
//! built-in defaults, persists the user tree to a TOML file, reloads that
//! file when it changes on disk, and notifies observers whenever the
//! resolved value at an observed path changes.

mod changes;
mod coercion;
mod file_watcher;
mod file_watching;
mod observation;
pub mod path_ops;
mod persistence;
mod store;

#[cfg(test)]
mod tests;

pub use changes::{ConfigChange, ConfigError};
pub use file_watcher::{FileEvent, FileEventKind, FileWatcher};
pub use observation::{ObserveOptions, Subscription};
pub use persistence::{SettingsFile, TomlFile};
pub use store::ConfigStore;
