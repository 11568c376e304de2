use crate::{
    cli::{
        ArgType, CliError, Command, CommandArg, CommandResult, parse_value,
        types::CommandMetadata,
    },
    config_store::ConfigStore,
};

use super::{key_path_arg, required, value_arg};

const FRONT_FLAG: &str = "--front";

/// Appends a value to the array at a key path, or prepends it with `--front`.
pub struct PushCommand {
    config_store: ConfigStore,
}

impl PushCommand {
    /// Creates a new PushCommand with the provided config store.
    pub fn new(config_store: ConfigStore) -> Self {
        Self { config_store }
    }
}

impl Command for PushCommand {
    fn execute(&self, args: &[String]) -> CommandResult {
        let path = required(args, 0, "key-path", "push")?;
        let value = parse_value(required(args, 1, "value", "push")?);

        let len = match args.get(2).map(String::as_str) {
            None => self.config_store.push_at_key_path(path, value)?,
            Some(FRONT_FLAG) => self.config_store.unshift_at_key_path(path, value)?,
            Some(other) => {
                return Err(CliError::InvalidArguments(format!(
                    "Unknown flag '{other}', expected '{FRONT_FLAG}'"
                )));
            }
        };

        Ok(format!("{path} now has {len} entries"))
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "push".to_string(),
            description: "Add a value to an array setting".to_string(),
            category: "config".to_string(),
            args: vec![
                key_path_arg("Dot-separated key path of an array"),
                value_arg("Value to add"),
                CommandArg {
                    name: FRONT_FLAG.to_string(),
                    description: "Insert at the front instead of the end".to_string(),
                    required: false,
                    value_type: ArgType::Flag,
                },
            ],
            examples: vec![
                "strata config push core.disabledPackages spell-check".to_string(),
                "strata config push core.themes solarized --front".to_string(),
            ],
        }
    }
}
