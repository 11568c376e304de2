use crate::{
    cli::{
        Command, CommandResult,
        formatting::format_toml_value,
        parse_value,
        types::CommandMetadata,
    },
    config_store::ConfigStore,
};

use super::{key_path_arg, required, value_arg};

/// Writes a value at a key path and persists the settings file.
pub struct SetCommand {
    config_store: ConfigStore,
}

impl SetCommand {
    /// Creates a new SetCommand with the provided config store.
    pub fn new(config_store: ConfigStore) -> Self {
        Self { config_store }
    }
}

impl Command for SetCommand {
    fn execute(&self, args: &[String]) -> CommandResult {
        let path = required(args, 0, "key-path", "set")?;
        let value = parse_value(required(args, 1, "value", "set")?);

        let stored = self.config_store.set(path, value)?;

        Ok(format!("Set '{path}' to {}", format_toml_value(&stored)))
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "set".to_string(),
            description: "Set a value at a key path".to_string(),
            category: "config".to_string(),
            args: vec![
                key_path_arg("Dot-separated key path"),
                value_arg("New value (inline TOML, otherwise a plain string)"),
            ],
            examples: vec![
                "strata config set editor.fontSize 14".to_string(),
                "strata config set editor.fontFamily \"Fira Code\"".to_string(),
                "strata config set core.themes '[\"one-dark-ui\", \"one-dark-syntax\"]'"
                    .to_string(),
            ],
        }
    }
}
