use toml::{Table, Value};

/// Parses a command-line argument into a settings value.
///
/// Anything that reads as a single inline TOML value (`true`, `14`, `1.5`,
/// `["a", "b"]`, `{ x = 1 }`, `"quoted"`) keeps its type; everything else
/// becomes a plain string. Input spanning several lines or carrying a
/// `#` outside of quotes is always taken literally, so `#ff0000` stays a
/// colour and `1 # note` is not silently cut down to `1`.
pub fn parse_value(raw: &str) -> Value {
    if raw.contains(['\n', '\r']) || has_bare_hash(raw) {
        return Value::String(raw.to_string());
    }

    let document = format!("value = {raw}");

    toml::from_str::<Table>(&document)
        .ok()
        .filter(|table| table.len() == 1)
        .and_then(|mut table| table.remove("value"))
        .unwrap_or_else(|| Value::String(raw.to_string()))
}

/// Whether `raw` has a `#` outside of any quoted string.
fn has_bare_hash(raw: &str) -> bool {
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for c in raw.chars() {
        match quote {
            Some('"') if escaped => escaped = false,
            Some('"') if c == '\\' => escaped = true,
            Some(open) if c == open => quote = None,
            Some(_) => {}
            None if c == '"' || c == '\'' => quote = Some(c),
            None if c == '#' => return true,
            None => {}
        }
    }

    false
}
