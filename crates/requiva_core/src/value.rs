//! Loosely-typed cell values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single cell of an order record.
///
/// Values arrive from schema-less documents and untyped CSV cells. `Null`
/// is the explicit "absent" marker.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Absent value.
    #[default]
    Null,
    /// Boolean value.
    Bool(bool),
    /// Numeric value.
    Number(f64),
    /// Text value.
    Text(String),
}

impl Value {
    /// Creates a text value.
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    /// Creates a text value, or `Null` when the text is empty.
    ///
    /// Form inputs leave optional fields as empty strings.
    pub fn text_or_null(s: impl Into<String>) -> Self {
        let s = s.into();
        if s.is_empty() {
            Value::Null
        } else {
            Value::Text(s)
        }
    }

    /// Returns true for `Null`.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the text if this is a text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Coerces the value to a finite number.
    ///
    /// Numbers pass through, booleans become 1 or 0 and text is trimmed and
    /// parsed. Null, unparseable text and non-finite numbers yield `None`.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        let n = match self {
            Value::Null => return None,
            Value::Bool(b) => f64::from(u8::from(*b)),
            Value::Number(n) => *n,
            Value::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        n.is_finite().then_some(n)
    }

    /// Whether this value cannot serve as a document key.
    ///
    /// True for null, blank text, the textual `nan` left behind by string
    /// coercion of missing numbers, and NaN itself.
    #[must_use]
    pub fn is_missing_key(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Bool(_) => false,
            Value::Number(n) => n.is_nan(),
            Value::Text(s) => {
                let s = s.trim();
                s.is_empty() || s.eq_ignore_ascii_case("nan")
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}
