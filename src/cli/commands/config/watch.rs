use std::pin::pin;

use futures::StreamExt;

use crate::{
    cli::{
        CliError, Command, CommandResult, formatting::format_resolved, types::CommandMetadata,
    },
    config_store::ConfigStore,
};

use super::{key_path_arg, required};

/// Follows the settings file and prints every change to one key path.
///
/// Runs until interrupted with Ctrl+C.
pub struct WatchCommand {
    config_store: ConfigStore,
}

impl WatchCommand {
    /// Creates a new WatchCommand with the provided config store.
    pub fn new(config_store: ConfigStore) -> Self {
        Self { config_store }
    }
}

impl Command for WatchCommand {
    fn execute(&self, args: &[String]) -> CommandResult {
        let path = required(args, 0, "key-path", "watch")?.to_string();
        let config_store = self.config_store.clone();

        let runtime = tokio::runtime::Runtime::new()
            .map_err(|e| CliError::ServiceError(format!("Failed to create runtime: {e}")))?;

        runtime.block_on(async move {
            config_store.observe_user_config()?;

            println!(
                "Watching '{path}' in {} (currently {})",
                config_store.settings_path().display(),
                format_resolved(config_store.get(&path).as_ref())
            );
            println!("Press Ctrl+C to stop");

            let mut changes = pin!(config_store.subscribe_to_path(&path));

            loop {
                tokio::select! {
                    change = changes.next() => {
                        let Some(change) = change else { break };
                        println!(
                            "{}: {} -> {}",
                            change.path,
                            format_resolved(change.old_value.as_ref()),
                            format_resolved(change.new_value.as_ref())
                        );
                    }
                    _ = tokio::signal::ctrl_c() => break,
                }
            }

            config_store.unobserve_user_config();
            Ok::<_, CliError>(())
        })?;

        Ok("Watch ended".to_string())
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "watch".to_string(),
            description: "Print changes to a key path as the settings file is edited"
                .to_string(),
            category: "config".to_string(),
            args: vec![key_path_arg("Dot-separated key path to follow")],
            examples: vec!["strata config watch editor.fontSize".to_string()],
        }
    }
}
