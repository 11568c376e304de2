//! Settings management commands.
mod dump;
mod get;
mod push;
mod remove;
mod set;
mod toggle;
mod unset;
mod watch;

pub use dump::DumpCommand;
pub use get::GetCommand;
pub use push::PushCommand;
pub use remove::RemoveCommand;
pub use set::SetCommand;
pub use toggle::ToggleCommand;
pub use unset::UnsetCommand;
pub use watch::WatchCommand;

use crate::{
    cli::{ArgType, CliError, CommandArg, CommandRegistry},
    config_store::ConfigStore,
};

const CATEGORY_NAME: &str = "config";

/// Registers every command of the "config" category.
pub fn register_commands(registry: &mut CommandRegistry, config_store: ConfigStore) {
    registry.register_command(
        CATEGORY_NAME,
        Box::new(GetCommand::new(config_store.clone())),
    );
    registry.register_command(
        CATEGORY_NAME,
        Box::new(SetCommand::new(config_store.clone())),
    );
    registry.register_command(
        CATEGORY_NAME,
        Box::new(UnsetCommand::new(config_store.clone())),
    );
    registry.register_command(
        CATEGORY_NAME,
        Box::new(ToggleCommand::new(config_store.clone())),
    );
    registry.register_command(
        CATEGORY_NAME,
        Box::new(PushCommand::new(config_store.clone())),
    );
    registry.register_command(
        CATEGORY_NAME,
        Box::new(RemoveCommand::new(config_store.clone())),
    );
    registry.register_command(
        CATEGORY_NAME,
        Box::new(DumpCommand::new(config_store.clone())),
    );
    registry.register_command(CATEGORY_NAME, Box::new(WatchCommand::new(config_store)));
}

fn key_path_arg(description: &str) -> CommandArg {
    CommandArg {
        name: "key-path".to_string(),
        description: description.to_string(),
        required: true,
        value_type: ArgType::KeyPath,
    }
}

fn value_arg(description: &str) -> CommandArg {
    CommandArg {
        name: "value".to_string(),
        description: description.to_string(),
        required: true,
        value_type: ArgType::Value,
    }
}

fn required<'a>(
    args: &'a [String],
    index: usize,
    name: &str,
    command: &str,
) -> Result<&'a str, CliError> {
    args.get(index).map(String::as_str).ok_or_else(|| {
        CliError::InvalidArguments(format!("Expected <{name}> argument for '{command}' command"))
    })
}
