//! Unit tests for CLI module
//!
//! Tests command registry, formatting and the config commands against a
//! store backed by a temporary settings file.

#![allow(clippy::unwrap_used)]

use tempfile::TempDir;
use toml::{Table, Value};

use crate::cli::{
    CliError, CliService, CommandRegistry,
    formatting::{format_resolved, format_toml_value},
};
use crate::config_store::ConfigStore;

fn defaults() -> Table {
    toml::from_str(
        r#"
        [editor]
        fontSize = 12
        showInvisibles = false

        [core]
        themes = ["one-dark-ui", "one-dark-syntax"]
        "#,
    )
    .unwrap()
}

fn service() -> (CliService, ConfigStore, TempDir) {
    let dir = TempDir::new().unwrap();
    let store = ConfigStore::load(defaults(), dir.path().join("settings.toml")).unwrap();

    (CliService::new(store.clone()), store, dir)
}

fn run(service: &CliService, command: &str, args: &[&str]) -> Result<String, CliError> {
    let args: Vec<String> = args.iter().map(|arg| arg.to_string()).collect();
    service.execute_command("config", command, &args)
}

#[test]
fn format_toml_value_scalars() {
    assert_eq!(format_toml_value(&Value::String("hello world".into())), "\"hello world\"");
    assert_eq!(format_toml_value(&Value::String(String::new())), "\"\"");
    assert_eq!(format_toml_value(&Value::Integer(-42)), "-42");
    assert_eq!(format_toml_value(&Value::Float(1.5)), "1.5");
    assert_eq!(format_toml_value(&Value::Boolean(false)), "false");
}

#[test]
fn format_toml_value_nested_structures() {
    let value: Table = toml::from_str("a = [1, [2, 3]]\nt = { x = \"y\" }\ne = {}").unwrap();

    assert_eq!(format_toml_value(&value["a"]), "[1, [2, 3]]");
    assert_eq!(format_toml_value(&value["t"]), "{ x = \"y\" }");
    assert_eq!(format_toml_value(&value["e"]), "{}");
    assert_eq!(format_toml_value(&Value::Array(Vec::new())), "[]");
}

#[test]
fn format_resolved_marks_absent_values() {
    assert_eq!(format_resolved(None), "<unset>");
    assert_eq!(format_resolved(Some(&Value::Integer(3))), "3");
}

#[test]
fn registry_lists_config_commands_sorted() {
    let (service, _store, _dir) = service();

    assert_eq!(
        service.list_all(),
        vec![(
            "config".to_string(),
            ["dump", "get", "push", "remove", "set", "toggle", "unset", "watch"]
                .map(String::from)
                .to_vec()
        )]
    );
}

#[test]
fn registry_starts_empty() {
    let dir = TempDir::new().unwrap();
    let store = ConfigStore::load(Table::new(), dir.path().join("settings.toml")).unwrap();
    let registry = CommandRegistry::new(store);

    assert!(registry.list_commands().is_empty());
    assert!(matches!(
        registry.execute("config", "get", &["a".to_string()]),
        Err(CliError::CommandNotFound(_))
    ));
}

#[test]
fn unknown_command_and_category() {
    let (service, _store, _dir) = service();

    assert!(matches!(
        service.execute_command("nope", "get", &[]),
        Err(CliError::CommandNotFound(_))
    ));
    assert!(matches!(run(&service, "nope", &[]), Err(CliError::CommandNotFound(_))));
}

#[test]
fn argument_count_is_validated() {
    let (service, _store, _dir) = service();

    assert!(matches!(run(&service, "get", &[]), Err(CliError::InvalidArguments(_))));
    assert!(matches!(
        run(&service, "get", &["a", "b"]),
        Err(CliError::InvalidArguments(_))
    ));
    assert!(matches!(
        run(&service, "dump", &["--json", "extra"]),
        Err(CliError::InvalidArguments(_))
    ));
}

#[test]
fn get_reports_defaults_and_absent_paths() {
    let (service, _store, _dir) = service();

    assert_eq!(run(&service, "get", &["editor.fontSize"]).unwrap(), "editor.fontSize: 12");
    assert_eq!(run(&service, "get", &["editor.nope"]).unwrap(), "editor.nope: <unset>");
}

#[test]
fn set_parses_values_and_persists() {
    let (service, store, dir) = service();

    run(&service, "set", &["editor.fontSize", "14"]).unwrap();
    run(&service, "set", &["editor.fontFamily", "Fira Code"]).unwrap();

    assert_eq!(store.get("editor.fontSize"), Some(Value::Integer(14)));
    assert_eq!(store.get("editor.fontFamily"), Some(Value::String("Fira Code".into())));

    let written = std::fs::read_to_string(dir.path().join("settings.toml")).unwrap();
    assert!(written.contains("fontSize = 14"));
}

#[test]
fn set_with_malformed_path_is_config_error() {
    let (service, _store, _dir) = service();

    assert!(matches!(
        run(&service, "set", &["editor..fontSize", "1"]),
        Err(CliError::ConfigError(_))
    ));
}

#[test]
fn unset_restores_default() {
    let (service, store, _dir) = service();
    store.set("editor.fontSize", 20).unwrap();

    let output = run(&service, "unset", &["editor.fontSize"]).unwrap();

    assert_eq!(output, "Unset 'editor.fontSize', now 12");
    assert_eq!(store.get("editor.fontSize"), Some(Value::Integer(12)));
}

#[test]
fn toggle_flips_boolean() {
    let (service, store, _dir) = service();

    assert_eq!(
        run(&service, "toggle", &["editor.showInvisibles"]).unwrap(),
        "editor.showInvisibles: true"
    );
    assert_eq!(store.get("editor.showInvisibles"), Some(Value::Boolean(true)));
}

#[test]
fn push_and_remove_edit_arrays() {
    let (service, store, _dir) = service();

    assert_eq!(
        run(&service, "push", &["core.themes", "solarized", "--front"]).unwrap(),
        "core.themes now has 3 entries"
    );
    assert_eq!(
        store.get("core.themes").unwrap().as_array().unwrap()[0],
        Value::String("solarized".into())
    );

    let output = run(&service, "remove", &["core.themes", "one-dark-ui"]).unwrap();
    assert_eq!(output, "core.themes: [\"solarized\", \"one-dark-syntax\"]");

    assert!(matches!(
        run(&service, "push", &["core.themes", "x", "--back"]),
        Err(CliError::InvalidArguments(_))
    ));
}

#[test]
fn push_onto_scalar_is_config_error() {
    let (service, _store, _dir) = service();

    assert!(matches!(
        run(&service, "push", &["editor.fontSize", "1"]),
        Err(CliError::ConfigError(_))
    ));
}

#[test]
fn dump_renders_merged_settings() {
    let (service, store, _dir) = service();
    store.set("editor.fontSize", 16).unwrap();

    let as_toml: Table = toml::from_str(&run(&service, "dump", &[]).unwrap()).unwrap();
    assert_eq!(as_toml["editor"]["fontSize"], Value::Integer(16));
    assert_eq!(as_toml["editor"]["showInvisibles"], Value::Boolean(false));

    let as_json: serde_json::Value =
        serde_json::from_str(&run(&service, "dump", &["--json"]).unwrap()).unwrap();
    assert_eq!(as_json["editor"]["fontSize"], 16);
    assert_eq!(as_json["core"]["themes"][1], "one-dark-syntax");
}

#[test]
fn help_covers_every_command() {
    let (service, _store, _dir) = service();

    let overview = service.help(None).unwrap();
    for (_, commands) in service.list_all() {
        for command in commands {
            assert!(overview.contains(&command), "missing {command}");
        }
    }

    let push = service.help(Some(("config", "push"))).unwrap();
    assert!(push.contains("push <key-path> <value> [--front]"));
    assert!(push.contains("Examples"));

    assert!(matches!(
        service.help(Some(("config", "nope"))),
        Err(CliError::CommandNotFound(_))
    ));
}

#[test]
fn category_usage_names_every_command() {
    let (service, _store, _dir) = service();

    assert_eq!(
        service.category_usage("config").unwrap(),
        "Usage: strata config <dump|get|push|remove|set|toggle|unset|watch> [args...]"
    );
    assert!(matches!(
        service.category_usage("nope"),
        Err(CliError::CommandNotFound(_))
    ));
}

#[test]
fn command_line_values_with_comments_are_stored_literally() {
    let (service, store, _dir) = service();

    run(&service, "set", &["editor.fontSize", "14 # bigger"]).unwrap();

    assert_eq!(store.get("editor.fontSize"), Some(Value::String("14 # bigger".into())));
}
