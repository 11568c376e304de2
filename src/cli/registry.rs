use std::collections::HashMap;

use crate::config_store::ConfigStore;

use super::{
    CliError, Command,
    commands::config,
    formatting::{format_category, format_command, format_description, format_header},
    types::CommandMetadata,
};

/// Registry for CLI commands organized by category.
///
/// Commands are grouped by logical category so new groups can be added
/// without growing a single dispatch match.
///
/// ```text
/// registry
/// └── config
///     ├── dump
///     ├── get
///     ├── push
///     ├── remove
///     ├── set
///     ├── toggle
///     ├── unset
///     └── watch
/// ```
pub struct CommandRegistry {
    /// category name -> (command name -> command implementation)
    categories: HashMap<String, HashMap<String, Box<dyn Command>>>,
    config_store: ConfigStore,
}

impl CommandRegistry {
    /// Creates a new empty command registry.
    ///
    /// Commands are added with `register_command` or all at once with
    /// `register_all_commands`.
    pub fn new(config_store: ConfigStore) -> Self {
        Self {
            categories: HashMap::new(),
            config_store,
        }
    }

    /// Registers a command in the specified category.
    ///
    /// The command's metadata name is the key within the category. A command
    /// with the same name replaces the earlier one.
    pub fn register_command(&mut self, category: &str, command: Box<dyn Command>) {
        self.categories
            .entry(category.to_string())
            .or_default()
            .insert(command.metadata().name, command);
    }

    /// Executes a command by category and name with the provided arguments.
    ///
    /// # Errors
    ///
    /// Returns `CliError::CommandNotFound` if the category or command doesn't
    /// exist, and `CliError::InvalidArguments` if the argument count doesn't
    /// match the command's metadata. Other errors come from the command.
    pub fn execute(
        &self,
        category: &str,
        command_name: &str,
        args: &[String],
    ) -> Result<String, CliError> {
        let found_command = self.find(category, command_name)?;

        Self::validate_args(&found_command.metadata(), args)?;

        found_command.execute(args)
    }

    /// Lists all registered commands organized by category.
    ///
    /// Categories and commands are sorted alphabetically for consistent display.
    pub fn list_commands(&self) -> Vec<(String, Vec<String>)> {
        let mut categories: Vec<(String, Vec<String>)> = self
            .categories
            .iter()
            .map(|(category, commands)| {
                let mut command_list: Vec<String> = commands.keys().cloned().collect();
                command_list.sort();

                (category.clone(), command_list)
            })
            .collect();

        categories.sort();

        categories
    }

    /// Renders help for every registered command.
    pub fn overview(&self) -> String {
        let mut out = format!("{}\n", format_header("Usage: strata <category> <command> [args...]"));

        for (category, commands) in self.list_commands() {
            out.push_str(&format!("\n{}\n", format_category(&category)));

            for name in commands {
                if let Ok(command) = self.find(&category, &name) {
                    let metadata = command.metadata();
                    out.push_str(&format!(
                        "  {} {}\n",
                        format_command(&format!("{:<32}", Self::usage(&metadata))),
                        format_description(&metadata.description)
                    ));
                }
            }
        }

        out
    }

    /// Renders detailed help for one command.
    ///
    /// # Errors
    ///
    /// Returns `CliError::CommandNotFound` if the command doesn't exist.
    pub fn command_help(&self, category: &str, command_name: &str) -> Result<String, CliError> {
        let metadata = self.find(category, command_name)?.metadata();

        let mut out = format!(
            "{}\n{}\n",
            format_header(&format!("strata {} {}", metadata.category, Self::usage(&metadata))),
            metadata.description
        );

        if !metadata.args.is_empty() {
            out.push_str(&format!("\n{}\n", format_category("Arguments")));
            for arg in &metadata.args {
                let required = if arg.required { "" } else { " (optional)" };
                out.push_str(&format!(
                    "  {:<12} {}{}\n",
                    format!("{} ({})", arg.name, arg.value_type.label()),
                    format_description(&arg.description),
                    required
                ));
            }
        }

        if !metadata.examples.is_empty() {
            out.push_str(&format!("\n{}\n", format_category("Examples")));
            for example in &metadata.examples {
                out.push_str(&format!("  {example}\n"));
            }
        }

        Ok(out)
    }

    fn find(&self, category: &str, command_name: &str) -> Result<&dyn Command, CliError> {
        let found_category = self.categories.get(category).ok_or_else(|| {
            CliError::CommandNotFound(format!("Failed to find category '{category}'"))
        })?;

        found_category
            .get(command_name)
            .map(|command| &**command)
            .ok_or_else(|| {
                CliError::CommandNotFound(format!("Failed to find command '{command_name}'"))
            })
    }

    fn usage(metadata: &CommandMetadata) -> String {
        metadata
            .args
            .iter()
            .fold(metadata.name.clone(), |mut usage, arg| {
                if arg.required {
                    usage.push_str(&format!(" <{}>", arg.name));
                } else {
                    usage.push_str(&format!(" [{}]", arg.name));
                }
                usage
            })
    }

    fn validate_args(metadata: &CommandMetadata, args: &[String]) -> Result<(), CliError> {
        let required_count = metadata.args.iter().filter(|arg| arg.required).count();
        let total_count = metadata.args.len();

        if args.len() < required_count {
            return Err(CliError::InvalidArguments(format!(
                "Expected at least {} arguments, got {}",
                required_count,
                args.len(),
            )));
        }

        if args.len() > total_count {
            return Err(CliError::InvalidArguments(format!(
                "Expected at most {} arguments, got {}",
                total_count,
                args.len(),
            )));
        }

        Ok(())
    }

    /// Registers all available CLI commands in their respective categories.
    pub fn register_all_commands(&mut self) {
        config::register_commands(self, self.config_store.clone());
    }
}
