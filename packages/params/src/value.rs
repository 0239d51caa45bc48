//! The dynamically-typed value held by a [`Params`] store.
//!
//! Every JSON shape maps onto exactly one [`Value`] variant. JSON objects always
//! become [`Value::Object`] holding a nested [`Params`], at every depth, so the
//! store operations work the same way no matter how deep a value lives.

use std::fmt;

use serde::Serialize;

use crate::Params;

/// A single dynamically-typed parameter value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// JSON `null`.
    Null,
    /// JSON `true` / `false`.
    Bool(bool),
    /// An integral JSON number that fits in an `i64`.
    Int(i64),
    /// Any other JSON number.
    Float(f64),
    /// A JSON string.
    String(String),
    /// A JSON array. Elements may be of mixed types.
    Array(Vec<Value>),
    /// A JSON object.
    Object(Params),
}

impl Value {
    /// Returns the string slice if this is a native [`Value::String`].
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(x) => Some(x),
            _ => None,
        }
    }

    /// Returns the nested store if this is a [`Value::Object`].
    #[must_use]
    pub const fn as_params(&self) -> Option<&Params> {
        match self {
            Self::Object(x) => Some(x),
            _ => None,
        }
    }

    /// Returns the elements if this is a [`Value::Array`].
    #[must_use]
    pub fn as_array(&self) -> Option<&[Self]> {
        match self {
            Self::Array(x) => Some(x),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Name of the JSON type this value was decoded from.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Int(_) | Self::Float(_) => "number",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
        }
    }

    /// Renders the value as text.
    ///
    /// Strings are returned verbatim, everything else goes through the
    /// [`Display`](fmt::Display) implementation.
    #[must_use]
    pub fn stringify(&self) -> String {
        match self {
            Self::String(x) => x.clone(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(x) => write!(f, "{x}"),
            Self::Int(x) => write!(f, "{x}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::String(x) => f.write_str(x),
            Self::Array(values) => {
                f.write_str("[")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{value}")?;
                }
                f.write_str("]")
            }
            Self::Object(params) => write!(f, "{params}"),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(x) => Self::Bool(x),
            serde_json::Value::Number(x) => x
                .as_i64()
                .map(Self::Int)
                .or_else(|| x.as_f64().map(Self::Float))
                .unwrap_or(Self::Null),
            serde_json::Value::String(x) => Self::String(x),
            serde_json::Value::Array(x) => Self::Array(x.into_iter().map(Self::from).collect()),
            serde_json::Value::Object(x) => Self::Object(x.into_iter().collect()),
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(x) => Self::Bool(x),
            Value::Int(x) => Self::from(x),
            Value::Float(x) => serde_json::Number::from_f64(x).map_or(Self::Null, Self::Number),
            Value::String(x) => Self::String(x),
            Value::Array(x) => Self::Array(x.into_iter().map(Self::from).collect()),
            Value::Object(x) => Self::Object(
                x.into_iter()
                    .map(|(key, value)| (key, Self::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<Params> for Value {
    fn from(value: Params) -> Self {
        Self::Object(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Self::Array(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Self::Float(f64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

macro_rules! impl_from_int {
    ($($t:ty),* $(,)?) => {
        $(
            impl From<$t> for Value {
                fn from(value: $t) -> Self {
                    Self::Int(i64::from(value))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);
