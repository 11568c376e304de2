//! Locations of the settings files and first-run setup of the config directory.

pub mod bootstrap;
mod paths;

pub use bootstrap::{BOOTSTRAP_MARKER, BootstrapReport, bootstrap_config_dir, mirror_template};
pub use paths::ConfigPaths;
