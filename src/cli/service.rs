use crate::config_store::ConfigStore;

use super::{CliError, CommandRegistry};

/// High-level service for managing and executing CLI commands.
///
/// Commands are organized by category and can be listed, described or
/// executed by name.
pub struct CliService {
    registry: CommandRegistry,
}

impl CliService {
    /// Creates a new CLI service with all built-in commands registered.
    pub fn new(config_store: ConfigStore) -> Self {
        let mut registry = CommandRegistry::new(config_store);
        registry.register_all_commands();

        CliService { registry }
    }

    /// Executes a command by category and name with the provided arguments.
    ///
    /// # Errors
    /// Returns `CliError::CommandNotFound` if the command doesn't exist, or
    /// whatever error the command itself produced.
    pub fn execute_command(
        &self,
        category: &str,
        command_name: &str,
        args: &[String],
    ) -> Result<String, CliError> {
        self.registry.execute(category, command_name, args)
    }

    /// Lists all available commands as (category, command names) pairs.
    pub fn list_all(&self) -> Vec<(String, Vec<String>)> {
        self.registry.list_commands()
    }

    /// One-line usage for a category, naming each of its commands.
    ///
    /// # Errors
    /// Returns `CliError::CommandNotFound` if the category doesn't exist.
    pub fn category_usage(&self, category: &str) -> Result<String, CliError> {
        self.list_all()
            .into_iter()
            .find(|(name, _)| name == category)
            .map(|(name, commands)| {
                format!("Usage: strata {name} <{}> [args...]", commands.join("|"))
            })
            .ok_or_else(|| {
                CliError::CommandNotFound(format!("Failed to find category '{category}'"))
            })
    }

    /// Help text for all commands, or for a single one.
    ///
    /// # Errors
    /// Returns `CliError::CommandNotFound` if a named command doesn't exist.
    pub fn help(&self, target: Option<(&str, &str)>) -> Result<String, CliError> {
        match target {
            Some((category, command_name)) => self.registry.command_help(category, command_name),
            None => Ok(self.registry.overview()),
        }
    }
}
