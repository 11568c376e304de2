//! Command-line interface over the settings store.
//!
//! Commands are organized by category and generate their own help text
//! from metadata.

mod commands;
pub mod formatting;
mod parsing;
mod registry;
mod service;
mod types;

pub use commands::config::{
    DumpCommand, GetCommand, PushCommand, RemoveCommand, SetCommand, ToggleCommand, UnsetCommand,
    WatchCommand,
};
pub use parsing::parse_value;
pub use registry::CommandRegistry;
pub use service::CliService;
pub use types::{ArgType, CliError, Command, CommandArg, CommandMetadata, CommandResult};

#[cfg(test)]
mod tests;
