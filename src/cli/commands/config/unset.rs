use crate::{
    cli::{Command, CommandResult, formatting::format_resolved, types::CommandMetadata},
    config_store::ConfigStore,
};

use super::{key_path_arg, required};

/// Removes the user's value at a key path so the default applies again.
pub struct UnsetCommand {
    config_store: ConfigStore,
}

impl UnsetCommand {
    /// Creates a new UnsetCommand with the provided config store.
    pub fn new(config_store: ConfigStore) -> Self {
        Self { config_store }
    }
}

impl Command for UnsetCommand {
    fn execute(&self, args: &[String]) -> CommandResult {
        let path = required(args, 0, "key-path", "unset")?;

        self.config_store.unset(path)?;

        let effective = self.config_store.get(path);
        Ok(format!(
            "Unset '{path}', now {}",
            format_resolved(effective.as_ref())
        ))
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "unset".to_string(),
            description: "Remove a user value, restoring the default".to_string(),
            category: "config".to_string(),
            args: vec![key_path_arg("Dot-separated key path")],
            examples: vec!["strata config unset editor.fontSize".to_string()],
        }
    }
}
