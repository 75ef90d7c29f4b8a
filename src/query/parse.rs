use serde_json::Value;

/// Parses a loosely-typed number, returning `None` for anything that is not a
/// finite value. Blank strings count as absent.
pub fn parse_number(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse::<f64>().ok().filter(|n| n.is_finite())
}

pub fn parse_optional(raw: Option<&str>) -> Option<f64> {
    raw.and_then(parse_number)
}

/// Same rules as [`parse_number`], applied to a JSON value.
pub fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|n| n.is_finite()),
        Value::String(s) => parse_number(s),
        _ => None,
    }
}
