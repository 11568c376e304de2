use crate::{
    cli::{Command, CommandResult, formatting::format_resolved, types::CommandMetadata},
    config_store::ConfigStore,
};

use super::{key_path_arg, required};

/// Prints the resolved value at a key path.
///
/// # Example Usage
///
/// ```bash
/// strata config get editor.fontSize
/// strata config get core.themes
/// ```
pub struct GetCommand {
    config_store: ConfigStore,
}

impl GetCommand {
    /// Creates a new GetCommand with the provided config store.
    pub fn new(config_store: ConfigStore) -> Self {
        Self { config_store }
    }
}

impl Command for GetCommand {
    fn execute(&self, args: &[String]) -> CommandResult {
        let path = required(args, 0, "key-path", "get")?;
        let value = self.config_store.get(path);

        Ok(format!("{path}: {}", format_resolved(value.as_ref())))
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "get".to_string(),
            description: "Get the resolved value at a key path".to_string(),
            category: "config".to_string(),
            args: vec![key_path_arg("Dot-separated key path (e.g., editor.fontSize)")],
            examples: vec![
                "strata config get editor.fontSize".to_string(),
                "strata config get core.themes".to_string(),
            ],
        }
    }
}
