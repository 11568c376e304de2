use toml::{Table, Value};

/// Reads a value as a base-10 integer.
///
/// Integers pass through, finite floats truncate toward zero, and strings
/// are read from their leading integer prefix after optional whitespace and
/// sign ("12px" reads as 12, "3.9" as 3). Anything else, including absence,
/// yields `None`.
pub(super) fn parse_int(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Integer(i) => Some(*i),
        Value::Float(f) if f.is_finite() => Some(f.trunc() as i64),
        Value::String(s) => parse_leading_int(s),
        _ => None,
    }
}

fn parse_leading_int(s: &str) -> Option<i64> {
    let trimmed = s.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let digits = &rest[..digits_end];

    if digits.is_empty() {
        return None;
    }

    let magnitude: i64 = digits.parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Truthiness used when toggling: absent, `false`, zero and empty strings are falsy.
pub(super) fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None => false,
        Some(Value::Boolean(b)) => *b,
        Some(Value::Integer(i)) => *i != 0,
        Some(Value::Float(f)) => *f != 0.0 && !f.is_nan(),
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

/// Deep equality that treats every NaN as equal to every other NaN.
///
/// Plain `PartialEq` on `Value` never matches a NaN float, which would make a
/// NaN setting look changed on every comparison.
pub(super) fn same_value(a: Option<&Value>, b: Option<&Value>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => values_match(a, b),
        _ => false,
    }
}

/// [`same_value`] over whole tables.
pub(super) fn same_table(a: &Table, b: &Table) -> bool {
    a.len() == b.len()
        && a.iter()
            .all(|(key, value)| b.get(key).is_some_and(|other| values_match(value, other)))
}

fn values_match(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Float(a), Value::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(a, b)| values_match(a, b))
        }
        (Value::Table(a), Value::Table(b)) => same_table(a, b),
        (a, b) => a == b,
    }
}
