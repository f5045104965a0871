//! Conversion between cell values and Firestore's typed JSON values.

use crate::error::{FirestoreError, FirestoreResult};
use requiva_core::{RawRow, Value};
use serde_json::{json, Map, Value as Json};

/// Encodes one cell.
///
/// Numbers are written as `doubleValue`. Non-finite numbers become null.
#[must_use]
pub fn encode_value(value: &Value) -> Json {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) if n.is_finite() => json!({ "doubleValue": n }),
        Value::Number(_) => json!({ "nullValue": null }),
        Value::Text(s) => json!({ "stringValue": s }),
    }
}

/// Decodes one typed value.
///
/// Scalar kinds map onto [`Value`]; timestamps keep their string form, and
/// other kinds (maps, arrays, references) are kept as their JSON text.
#[must_use]
pub fn decode_value(json: &Json) -> Value {
    let Some((kind, inner)) = json.as_object().and_then(|o| o.iter().next()) else {
        return Value::Null;
    };
    match kind.as_str() {
        "nullValue" => Value::Null,
        "booleanValue" => inner.as_bool().map_or(Value::Null, Value::Bool),
        "integerValue" => number(
            inner
                .as_str()
                .and_then(|s| s.parse::<i64>().ok())
                .map(|n| n as f64)
                .or_else(|| inner.as_f64()),
        ),
        "doubleValue" => number(inner.as_f64()),
        "stringValue" | "timestampValue" | "referenceValue" => {
            inner.as_str().map_or(Value::Null, Value::text)
        }
        _ => Value::Text(inner.to_string()),
    }
}

fn number(n: Option<f64>) -> Value {
    n.filter(|n| n.is_finite()).map_or(Value::Null, Value::Number)
}

/// Encodes field/value pairs into a `fields` object.
#[must_use]
pub fn encode_fields<'a, I>(fields: I) -> Map<String, Json>
where
    I: IntoIterator<Item = (&'a str, &'a Value)>,
{
    fields
        .into_iter()
        .map(|(name, value)| (name.to_string(), encode_value(value)))
        .collect()
}

/// Decodes a document resource into a row. A document without `fields` is
/// an empty row.
///
/// # Errors
///
/// Returns an error if `fields` is present but not an object.
pub fn decode_document(document: &Json) -> FirestoreResult<RawRow> {
    match document.get("fields") {
        None => Ok(RawRow::new()),
        Some(Json::Object(fields)) => Ok(fields
            .iter()
            .map(|(name, value)| (name.clone(), decode_value(value)))
            .collect()),
        Some(other) => Err(FirestoreError::decode(format!(
            "document fields is not an object: {other}"
        ))),
    }
}

/// Quotes a field name for use in a field path.
///
/// Simple identifiers are left alone; anything else is wrapped in
/// backticks with backticks and backslashes escaped.
#[must_use]
pub fn field_path(name: &str) -> String {
    if is_simple_identifier(name) {
        return name.to_string();
    }
    let mut quoted = String::with_capacity(name.len() + 2);
    quoted.push('`');
    for c in name.chars() {
        if c == '`' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('`');
    quoted
}

fn is_simple_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
