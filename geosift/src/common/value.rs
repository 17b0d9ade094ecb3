use chrono::NaiveDateTime;
use std::fmt::{Debug, Display, Formatter};

/// Compare two floats with proper NaN handling.
#[inline]
fn num_eq(a: f64, b: f64) -> bool {
    if a.is_nan() && b.is_nan() {
        true
    } else {
        a == b
    }
}

/// Represents a single attribute value of a [Feature](crate::Feature).
///
/// # Purpose
/// Provides a unified representation for every value type a feature attribute
/// can carry: numbers, strings, booleans, dates, and null. The predicate
/// evaluator and the classification engine only ever see this type; the
/// external JSON shape is collapsed into it at the boundary.
///
/// # Variants
/// - Null: Absence of a value (also used for missing attributes)
/// - Bool(bool): Boolean true/false
/// - I64(i64): Integer value
/// - F64(f64): Floating point value
/// - String(String): Text value
/// - Date(NaiveDateTime): Timestamp value
///
/// # Characteristics
/// - **Comparable**: Cross-type numeric equality (`I64(2) == F64(2.0)`)
/// - **Coercible**: `as_number` parses numeric strings, `as_text` stringifies
/// - **Default**: Defaults to Null
///
/// # Usage
/// Create values using the `From` trait:
/// ```text
/// let v1: Value = 42.into();       // From i64
/// let v2 = Value::from("hello");   // From &str
/// let v3 = Value::from(13.5);      // From f64
/// ```
#[derive(Clone, Default)]
pub enum Value {
    /// Represents a null value.
    #[default]
    Null,
    /// Represents a boolean value.
    Bool(bool),
    /// Represents a signed 64-bit integer value.
    I64(i64),
    /// Represents a 64-bit floating point value.
    F64(f64),
    /// Represents a string value.
    String(String),
    /// Represents a date value.
    Date(NaiveDateTime),
}

impl Value {
    /// Checks whether this value is null.
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the numeric payload of a number variant without any coercion.
    #[inline]
    pub fn raw_number(&self) -> Option<f64> {
        match self {
            Value::I64(v) => Some(*v as f64),
            Value::F64(v) => Some(*v),
            _ => None,
        }
    }

    /// Coerces this value to a number.
    ///
    /// Numbers convert directly; strings are parsed as `f64` after trimming.
    /// Null, booleans, and dates do not coerce.
    ///
    /// # Returns
    ///
    /// `Some(f64)` when the value is numeric or a parseable numeric string,
    /// `None` otherwise.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::I64(v) => Some(*v as f64),
            Value::F64(v) => Some(*v),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    /// Stringifies this value for pattern matching and unique-value keys.
    ///
    /// Integral floats render without a trailing fraction (`13.0` → `"13"`)
    /// so that a key formed from `I64(13)` and one formed from `F64(13.0)`
    /// collide. Null renders as the literal `"null"` marker.
    pub fn as_text(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(v) => v.to_string(),
            Value::I64(v) => v.to_string(),
            Value::F64(v) => {
                if v.fract() == 0.0 && v.is_finite() && v.abs() < 9.007_199_254_740_992e15 {
                    format!("{}", *v as i64)
                } else {
                    v.to_string()
                }
            }
            Value::String(s) => s.clone(),
            Value::Date(d) => d.to_string(),
        }
    }
}

impl Debug for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Bool(v) => write!(f, "Bool({})", v),
            Value::I64(v) => write!(f, "I64({})", v),
            Value::F64(v) => write!(f, "F64({})", v),
            Value::String(v) => write!(f, "String({:?})", v),
            Value::Date(v) => write!(f, "Date({})", v),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_text())
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        if let (Some(a), Some(b)) = (self.raw_number(), other.raw_number()) {
            return num_eq(a, b);
        }

        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::I64(v as i64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::I64(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::I64(v as i64)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::F64(v as f64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::F64(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::Date(v)
    }
}

impl From<serde_json::Value> for Value {
    /// Lossy conversion from a JSON value.
    ///
    /// Objects and arrays are not valid attribute values and collapse to
    /// `Null`; the engine only deals in scalar attributes.
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::I64(i)
                } else {
                    Value::F64(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => Value::Null,
        }
    }
}
