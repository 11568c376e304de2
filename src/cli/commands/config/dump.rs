use crate::{
    cli::{ArgType, CliError, Command, CommandArg, CommandResult, types::CommandMetadata},
    config_store::{ConfigError, ConfigStore},
};

const JSON_FLAG: &str = "--json";

/// Prints the merged settings snapshot (defaults overlaid by user values).
pub struct DumpCommand {
    config_store: ConfigStore,
}

impl DumpCommand {
    /// Creates a new DumpCommand with the provided config store.
    pub fn new(config_store: ConfigStore) -> Self {
        Self { config_store }
    }
}

impl Command for DumpCommand {
    fn execute(&self, args: &[String]) -> CommandResult {
        let settings = self.config_store.get_settings();

        let rendered = match args.first().map(String::as_str) {
            None => toml::to_string_pretty(&settings).map_err(|e| {
                ConfigError::SerializationError {
                    content_type: "settings as TOML".to_string(),
                    details: e.to_string(),
                }
            })?,
            Some(JSON_FLAG) => serde_json::to_string_pretty(&settings).map_err(|e| {
                ConfigError::SerializationError {
                    content_type: "settings as JSON".to_string(),
                    details: e.to_string(),
                }
            })?,
            Some(other) => {
                return Err(CliError::InvalidArguments(format!(
                    "Unknown flag '{other}', expected '{JSON_FLAG}'"
                )));
            }
        };

        Ok(rendered.trim_end().to_string())
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "dump".to_string(),
            description: "Print all effective settings".to_string(),
            category: "config".to_string(),
            args: vec![CommandArg {
                name: JSON_FLAG.to_string(),
                description: "Print JSON instead of TOML".to_string(),
                required: false,
                value_type: ArgType::Flag,
            }],
            examples: vec![
                "strata config dump".to_string(),
                "strata config dump --json".to_string(),
            ],
        }
    }
}
