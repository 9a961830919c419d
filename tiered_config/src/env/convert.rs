//! Converting raw variable text according to the field it targets.

use serde_json::{Number, Value};

/// Overwrite `slot` with `raw`, converted to the type `slot` currently has.
///
/// Objects only reach here for fields holding whole maps, so a JSON object
/// replaces the current value. An absent optional field takes a JSON scalar
/// or collection, or the raw text otherwise; `null` is kept as text.
///
/// Returns a description of the expected type when `raw` does not convert.
pub(super) fn assign(slot: &mut Value, raw: &str) -> Result<(), String> {
    let converted = match &*slot {
        Value::String(_) => Value::String(raw.to_owned()),
        Value::Bool(_) => Value::Bool(parse_bool(raw).ok_or("boolean")?),
        Value::Number(current) => parse_number(raw, current.is_f64())?,
        Value::Array(_) => parse_json(raw).filter(Value::is_array).ok_or("JSON array")?,
        Value::Object(_) => parse_json(raw).filter(Value::is_object).ok_or("JSON object")?,
        Value::Null => parse_json(raw)
            .filter(|value| !value.is_null())
            .unwrap_or_else(|| Value::String(raw.to_owned())),
    };
    *slot = converted;
    Ok(())
}

/// Accepts `1`, `t`, `true`, `0`, `f` and `false` in any case.
fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "t" | "true" => Some(true),
        "0" | "f" | "false" => Some(false),
        _ => None,
    }
}

fn parse_number(raw: &str, float: bool) -> Result<Value, String> {
    let trimmed = raw.trim();
    if float {
        return trimmed
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| String::from("number"));
    }
    trimmed
        .parse::<i64>()
        .map(Value::from)
        .or_else(|_| trimmed.parse::<u64>().map(Value::from))
        .map_err(|_| String::from("integer"))
}

fn parse_json(raw: &str) -> Option<Value> {
    serde_json::from_str(raw.trim()).ok()
}
