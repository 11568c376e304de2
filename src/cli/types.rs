use thiserror::Error;

use crate::config_store::ConfigError;

/// Errors that can occur during CLI command execution.
#[derive(Error, Debug)]
pub enum CliError {
    /// A command or category was not found in the registry.
    #[error("Command not found: {0}")]
    CommandNotFound(String),

    /// Invalid arguments were provided to a command.
    ///
    /// Returned when argument validation fails, such as missing required
    /// arguments or too many arguments.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// An error occurred in the settings store.
    #[error("Configuration error: {0}")]
    ConfigError(#[from] ConfigError),

    /// A general service error occurred, such as a runtime that failed to start.
    #[error("Service error: {0}")]
    ServiceError(String),
}

/// Type alias for command execution results.
///
/// All CLI commands return this type, providing either the text to print
/// or a CliError describing what went wrong.
pub type CommandResult = Result<String, CliError>;

/// Specification for a single command argument.
#[derive(Debug, Clone)]
pub struct CommandArg {
    /// The name of the argument (e.g., "path", "value").
    pub name: String,

    /// Human-readable description of what this argument does.
    pub description: String,

    /// Whether this argument is required for command execution.
    pub required: bool,

    /// The expected type of this argument for help display.
    pub value_type: ArgType,
}

/// Type classification for command arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgType {
    /// A dot-separated settings key path.
    KeyPath,

    /// A settings value, parsed as inline TOML with a plain-string fallback.
    Value,

    /// A literal flag such as `--json`.
    Flag,
}

impl ArgType {
    /// Short label shown in usage lines.
    pub fn label(&self) -> &'static str {
        match self {
            ArgType::KeyPath => "key-path",
            ArgType::Value => "value",
            ArgType::Flag => "flag",
        }
    }
}

/// Complete metadata for a CLI command.
///
/// Single source of truth for a command's identity, arguments and usage
/// examples. Used for help generation and argument-count validation.
#[derive(Debug, Clone)]
pub struct CommandMetadata {
    /// The command name (e.g., "get", "set", "watch").
    pub name: String,

    /// Brief description of what this command does.
    pub description: String,

    /// Specification of all arguments this command accepts.
    pub args: Vec<CommandArg>,

    /// Example usage strings to show in help text.
    pub examples: Vec<String>,

    /// Category this command belongs to (e.g., "config").
    pub category: String,
}

/// Trait defining the interface for all CLI commands.
///
/// Commands receive their dependencies through their constructors.
pub trait Command: Send + Sync {
    /// Executes the command with the provided arguments.
    ///
    /// The registry has already checked the argument count against
    /// [`Command::metadata`]; the command validates argument contents.
    ///
    /// # Errors
    ///
    /// Returns `CliError` for invalid argument values or store failures.
    fn execute(&self, args: &[String]) -> CommandResult;

    /// Returns the complete metadata for this command.
    fn metadata(&self) -> CommandMetadata;
}
