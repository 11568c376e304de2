use crate::{
    cli::{Command, CommandResult, types::CommandMetadata},
    config_store::ConfigStore,
};

use super::{key_path_arg, required};

/// Flips the truthiness of the value at a key path.
pub struct ToggleCommand {
    config_store: ConfigStore,
}

impl ToggleCommand {
    /// Creates a new ToggleCommand with the provided config store.
    pub fn new(config_store: ConfigStore) -> Self {
        Self { config_store }
    }
}

impl Command for ToggleCommand {
    fn execute(&self, args: &[String]) -> CommandResult {
        let path = required(args, 0, "key-path", "toggle")?;
        let enabled = self.config_store.toggle(path)?;

        Ok(format!("{path}: {enabled}"))
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "toggle".to_string(),
            description: "Flip a boolean setting".to_string(),
            category: "config".to_string(),
            args: vec![key_path_arg("Dot-separated key path")],
            examples: vec!["strata config toggle editor.showInvisibles".to_string()],
        }
    }
}
