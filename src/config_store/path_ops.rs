//! Key-path access into nested settings tables.
//!
//! A key path is a dot-separated list of table keys ("editor.fontSize").
//! Reads never fail: anything that cannot be walked resolves to absent.
//! Writes create intermediate tables on demand.

use toml::{Table, Value};

use super::ConfigError;

/// Splits a key path into its segments, rejecting empty paths and empty segments.
///
/// # Errors
/// * `ConfigError::InvalidPath` - If the path is empty or contains an empty segment
pub fn split_key_path(path: &str) -> Result<Vec<&str>, ConfigError> {
    if path.is_empty() {
        return Err(ConfigError::InvalidPath("Empty path".to_string()));
    }

    let parts: Vec<&str> = path.split('.').collect();

    if let Some(i) = parts.iter().position(|part| part.is_empty()) {
        return Err(ConfigError::InvalidPath(format!(
            "Empty segment at position {i} in path '{path}'"
        )));
    }

    Ok(parts)
}

/// Navigates through a settings tree following a dot-separated path
///
/// Returns `None` if any segment is missing, if an intermediate value is not
/// a table, or if the path itself is malformed.
///
/// # Arguments
/// * `tree` - The root table to navigate from
/// * `path` - Dot-separated path (e.g., "editor.fontSize")
pub fn value_at<'a>(tree: &'a Table, path: &str) -> Option<&'a Value> {
    let parts = split_key_path(path).ok()?;
    let (last, parents) = parts.split_last()?;

    let mut current = tree;
    for part in parents {
        current = current.get(*part)?.as_table()?;
    }

    current.get(*last)
}

/// Sets or removes the value at the specified path
///
/// A `Some` value is inserted, creating intermediate tables as needed. `None`
/// removes the final key instead, then prunes any tables the removal left
/// empty so the tree stays minimal. Removing a path that does not exist is a
/// no-op and creates nothing.
///
/// # Arguments
/// * `tree` - The root table to modify
/// * `path` - Dot-separated path to the target location
/// * `value` - The value to store, or `None` to remove
///
/// # Errors
/// * `ConfigError::InvalidPath` - If the path is malformed or an intermediate
///   segment holds a non-table value
pub fn set_value_at(
    tree: &mut Table,
    path: &str,
    value: Option<Value>,
) -> Result<(), ConfigError> {
    let parts = split_key_path(path)?;

    match value {
        Some(value) => insert_value(tree, &parts, value),
        None => {
            remove_value(tree, &parts);
            Ok(())
        }
    }
}

/// Deep merges two settings tables, overlay taking precedence
///
/// We start with overlay as base, then selectively add missing keys from
/// base. Nested tables merge key by key; for any other value the overlay
/// completely replaces base (arrays are not concatenated).
pub fn deep_merge(base: Table, overlay: Table) -> Table {
    let mut merged = overlay;

    for (key, base_value) in base {
        let value = match merged.remove(&key) {
            None => base_value,
            Some(overlay_value) => merge_values(base_value, overlay_value),
        };
        merged.insert(key, value);
    }

    merged
}

fn merge_values(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Table(base), Value::Table(overlay)) => Value::Table(deep_merge(base, overlay)),
        (_, overlay) => overlay,
    }
}

fn insert_value(tree: &mut Table, parts: &[&str], value: Value) -> Result<(), ConfigError> {
    let Some((last, parents)) = parts.split_last() else {
        return Err(ConfigError::InvalidPath("Empty path".to_string()));
    };

    let mut current = tree;
    for (i, part) in parents.iter().enumerate() {
        current = navigate_step_mut(current, part, &parts[..=i])?;
    }

    current.insert((*last).to_string(), value);
    Ok(())
}

/// Performs a single navigation step, creating the table when the key is missing
///
/// # Errors
/// * `ConfigError::InvalidPath` - If the key holds a non-table value
fn navigate_step_mut<'a>(
    current: &'a mut Table,
    key: &str,
    path_so_far: &[&str],
) -> Result<&'a mut Table, ConfigError> {
    let entry = current
        .entry(key.to_string())
        .or_insert_with(|| Value::Table(Table::new()));

    match entry {
        Value::Table(table) => Ok(table),
        other => Err(ConfigError::InvalidPath(format!(
            "Cannot navigate into {} at path '{}'",
            other.type_str(),
            path_so_far.join(".")
        ))),
    }
}

/// Removes the final key; returns whether `tree` is now empty.
fn remove_value(tree: &mut Table, parts: &[&str]) -> bool {
    match parts {
        [] => false,
        [last] => {
            tree.remove(*last);
            tree.is_empty()
        }
        [first, rest @ ..] => {
            let Some(Value::Table(child)) = tree.get_mut(*first) else {
                return false;
            };

            if remove_value(child, rest) {
                tree.remove(*first);
            }

            tree.is_empty()
        }
    }
}
