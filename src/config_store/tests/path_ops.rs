use toml::{Table, Value};

use super::{int, string, table};
use crate::config_store::{
    ConfigError,
    path_ops::{deep_merge, set_value_at, split_key_path, value_at},
};

#[test]
fn value_at_walks_nested_tables() {
    let tree = table("[editor]\nfontSize = 14\n[editor.gutter]\nvisible = true");

    assert_eq!(value_at(&tree, "editor.fontSize"), Some(&int(14)));
    assert_eq!(
        value_at(&tree, "editor.gutter.visible"),
        Some(&Value::Boolean(true))
    );
    assert!(value_at(&tree, "editor").unwrap().is_table());
}

#[test]
fn value_at_is_absent_for_missing_or_non_table_segments() {
    let tree = table("[editor]\nfontSize = 14");

    assert_eq!(value_at(&tree, "editor.missing"), None);
    assert_eq!(value_at(&tree, "nothing.here"), None);
    assert_eq!(value_at(&tree, "editor.fontSize.deeper"), None);
    assert_eq!(value_at(&tree, ""), None);
    assert_eq!(value_at(&tree, "editor..fontSize"), None);
}

#[test]
fn split_rejects_empty_segments() {
    assert_eq!(split_key_path("a.b").unwrap(), vec!["a", "b"]);
    assert!(matches!(split_key_path(""), Err(ConfigError::InvalidPath(_))));
    assert!(matches!(split_key_path("a..b"), Err(ConfigError::InvalidPath(_))));
    assert!(matches!(split_key_path(".a"), Err(ConfigError::InvalidPath(_))));
    assert!(matches!(split_key_path("a."), Err(ConfigError::InvalidPath(_))));
}

#[test]
fn set_creates_intermediate_tables() {
    let mut tree = Table::new();
    set_value_at(&mut tree, "a.b.c", Some(string("deep"))).unwrap();

    assert_eq!(value_at(&tree, "a.b.c"), Some(&string("deep")));
    assert!(tree["a"].is_table());
}

#[test]
fn set_through_scalar_is_rejected() {
    let mut tree = table("a = 1");
    let result = set_value_at(&mut tree, "a.b", Some(int(2)));

    assert!(matches!(result, Err(ConfigError::InvalidPath(_))));
    assert_eq!(tree["a"], int(1));
}

#[test]
fn removing_prunes_emptied_tables() {
    let mut tree = table("[a]\nkeep = true\n[a.b]\nc = 1");
    set_value_at(&mut tree, "a.b.c", None).unwrap();

    assert_eq!(value_at(&tree, "a.b"), None);
    assert_eq!(value_at(&tree, "a.keep"), Some(&Value::Boolean(true)));

    set_value_at(&mut tree, "a.keep", None).unwrap();
    assert!(tree.is_empty());
}

#[test]
fn removing_missing_path_creates_nothing() {
    let mut tree = table("x = 1");
    set_value_at(&mut tree, "a.b.c", None).unwrap();

    assert_eq!(tree, table("x = 1"));
}

#[test]
fn deep_merge_overlay_wins_and_tables_merge() {
    let base = table(
        r#"
list = [1, 2]
[editor]
fontSize = 12
tabLength = 2
"#,
    );
    let overlay = table(
        r#"
list = [3]
[editor]
fontSize = 16
"#,
    );

    let merged = deep_merge(base.clone(), overlay.clone());

    assert_eq!(value_at(&merged, "editor.fontSize"), Some(&int(16)));
    assert_eq!(value_at(&merged, "editor.tabLength"), Some(&int(2)));
    assert_eq!(merged["list"], Value::Array(vec![int(3)]));
    assert_eq!(value_at(&base, "editor.fontSize"), Some(&int(12)));
    assert_eq!(value_at(&overlay, "editor.tabLength"), None);
}

#[test]
fn deep_merge_scalar_replaces_table() {
    let merged = deep_merge(table("[a]\nb = 1"), table("a = 5"));
    assert_eq!(merged["a"], int(5));

    let merged = deep_merge(table("a = 5"), table("[a]\nb = 1"));
    assert_eq!(value_at(&merged, "a.b"), Some(&int(1)));
}
