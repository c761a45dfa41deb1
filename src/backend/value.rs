//! Tagged value model for user-supplied metadata.
//!
//! Replaces ordered runtime type checks with a sum type over the supported
//! primitive kinds, so every call site handles the full set exhaustively and
//! the unsupported case is a variant rather than an afterthought.

use serde_json::Value;

/// A metadata value of one of the supported primitive kinds.
///
/// Classification from JSON is total: every `serde_json::Value` maps to
/// exactly one variant. The boundary cannot tag 32-bit floats (JSON numbers
/// carry no width), so [`MetadataValue::Float`] is only reachable through the
/// typed constructors; non-integer numbers classify as `Double` and integers
/// as `Int` or `Long` depending on range.
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataValue {
    Text(String),
    Bool(bool),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    /// Anything outside the supported kinds (arrays, objects, null). Carries
    /// the raw value for diagnostics.
    Unsupported(Value),
}

impl MetadataValue {
    /// Numeric view of the value, when it has one.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            MetadataValue::Int(n) => Some(f64::from(*n)),
            MetadataValue::Long(n) => Some(*n as f64),
            MetadataValue::Float(n) => Some(f64::from(*n)),
            MetadataValue::Double(n) => Some(*n),
            MetadataValue::Text(_) | MetadataValue::Bool(_) | MetadataValue::Unsupported(_) => {
                None
            }
        }
    }
}

impl From<&Value> for MetadataValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::String(s) => Self::Text(s.clone()),
            Value::Bool(b) => Self::Bool(*b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    match i32::try_from(i) {
                        Ok(small) => Self::Int(small),
                        Err(_) => Self::Long(i),
                    }
                } else if let Some(f) = n.as_f64() {
                    Self::Double(f)
                } else {
                    Self::Unsupported(value.clone())
                }
            }
            other => Self::Unsupported(other.clone()),
        }
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<bool> for MetadataValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for MetadataValue {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<i64> for MetadataValue {
    fn from(value: i64) -> Self {
        Self::Long(value)
    }
}

impl From<f32> for MetadataValue {
    fn from(value: f32) -> Self {
        Self::Float(value)
    }
}

impl From<f64> for MetadataValue {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}
