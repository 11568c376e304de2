//! Strata - hierarchical, observable settings for desktop applications.
//!
//! Settings live in two layers addressed by dot-separated key paths: package
//! defaults registered in code and user overrides persisted to a TOML file.
//! The main features include:
//!
//! - Typed reads with default fallback (`get`, `get_int`, `get_positive_int`)
//! - Writes that drop values equal to their default before persisting
//! - Path observers notified only when their resolved value changes
//! - Live reload of the settings file, tolerant of malformed edits
//! - CLI interface for settings management
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use strata::config_store::{ConfigStore, ObserveOptions};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let defaults: toml::Table = toml::from_str("[editor]\nfontSize = 12")?;
//! let store = ConfigStore::load(defaults, "/tmp/strata/settings.toml")?;
//!
//! let _subscription = store.observe("editor.fontSize", ObserveOptions::default(), |change| {
//!     println!("font size is now {:?}", change.new_value);
//! });
//!
//! store.set("editor.fontSize", 14)?;
//! # Ok(())
//! # }
//! ```

/// Config directory location and first-run bootstrap.
pub mod config;

/// Observable two-layer settings store.
pub mod config_store;

/// Command-line interface for settings management.
pub mod cli;

/// Logging setup shared by the binary and embedders.
pub mod tracing_config;
