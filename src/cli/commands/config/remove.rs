use crate::{
    cli::{
        Command, CommandResult, formatting::format_toml_value, parse_value,
        types::CommandMetadata,
    },
    config_store::ConfigStore,
};

use super::{key_path_arg, required, value_arg};

/// Removes every element equal to a value from the array at a key path.
pub struct RemoveCommand {
    config_store: ConfigStore,
}

impl RemoveCommand {
    /// Creates a new RemoveCommand with the provided config store.
    pub fn new(config_store: ConfigStore) -> Self {
        Self { config_store }
    }
}

impl Command for RemoveCommand {
    fn execute(&self, args: &[String]) -> CommandResult {
        let path = required(args, 0, "key-path", "remove")?;
        let value = parse_value(required(args, 1, "value", "remove")?);

        let remaining = self.config_store.remove_at_key_path(path, value)?;
        let items: Vec<String> = remaining.iter().map(format_toml_value).collect();

        Ok(format!("{path}: [{}]", items.join(", ")))
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "remove".to_string(),
            description: "Remove a value from an array setting".to_string(),
            category: "config".to_string(),
            args: vec![
                key_path_arg("Dot-separated key path of an array"),
                value_arg("Value to remove"),
            ],
            examples: vec!["strata config remove core.disabledPackages spell-check".to_string()],
        }
    }
}
