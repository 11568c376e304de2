//! Formatting utilities for CLI output.
//!
//! Provides consistent formatting for settings values and styled help text.

use toml::Value;

const RESET: &str = "\x1b[0m";

/// Terminal styles used by help and error output.
#[derive(Debug, Clone, Copy)]
enum Style {
    Header,
    Command,
    Category,
    Muted,
    Error,
}

impl Style {
    fn ansi(self) -> &'static str {
        match self {
            Style::Header => "\x1b[1;36m",
            Style::Command => "\x1b[1;32m",
            Style::Category => "\x1b[1;34m",
            Style::Muted => "\x1b[2m",
            Style::Error => "\x1b[1;31m",
        }
    }
}

/// Wraps `text` in `style`, or returns it untouched when `NO_COLOR` is set.
fn paint(style: Style, text: &str) -> String {
    if std::env::var_os("NO_COLOR").is_some() {
        return text.to_string();
    }

    format!("{}{text}{RESET}", style.ansi())
}

/// Formats section headers with styling
pub fn format_header(text: &str) -> String {
    paint(Style::Header, text)
}

/// Formats command names with styling
pub fn format_command(text: &str) -> String {
    paint(Style::Command, text)
}

/// Formats category names with styling
pub fn format_category(text: &str) -> String {
    paint(Style::Category, text)
}

/// Formats descriptions with muted styling
pub fn format_description(text: &str) -> String {
    paint(Style::Muted, text)
}

/// Formats error messages with red styling
pub fn format_error(text: &str) -> String {
    paint(Style::Error, text)
}

/// Formats a TOML value on a single line.
///
/// Strings are quoted, arrays and tables are written inline with their
/// contents.
///
/// # Examples
///
/// ```
/// use strata::cli::formatting::format_toml_value;
///
/// let value = toml::Value::String("hello".to_string());
/// assert_eq!(format_toml_value(&value), "\"hello\"");
///
/// let value = toml::Value::Array(vec![1.into(), 2.into()]);
/// assert_eq!(format_toml_value(&value), "[1, 2]");
/// ```
pub fn format_toml_value(value: &Value) -> String {
    match value {
        Value::String(s) => format!("\"{s}\""),
        Value::Integer(i) => i.to_string(),
        Value::Float(f) => f.to_string(),
        Value::Boolean(b) => b.to_string(),
        Value::Datetime(d) => d.to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_toml_value).collect();
            format!("[{}]", items.join(", "))
        }
        Value::Table(table) if table.is_empty() => "{}".to_string(),
        Value::Table(table) => {
            let entries: Vec<String> = table
                .iter()
                .map(|(key, value)| format!("{key} = {}", format_toml_value(value)))
                .collect();
            format!("{{ {} }}", entries.join(", "))
        }
    }
}

/// Formats a possibly-absent resolved value.
pub fn format_resolved(value: Option<&Value>) -> String {
    value.map_or_else(|| "<unset>".to_string(), format_toml_value)
}
