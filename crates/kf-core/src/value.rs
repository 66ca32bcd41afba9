//! Typed values for string-encoded solver settings.
//!
//! Algorithm parameter overrides arrive as untyped strings. Each catalog
//! setting declares a [`ValueType`]; [`validate_str_value`] decides whether a
//! string is acceptable for that type and [`parse_value`] converts it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{CoreError, CoreResult};

/// Declared type of a solver setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValueType {
    Boolean,
    Integer,
    Float,
    String,
    KisaoId,
    List,
    Object,
    Any,
}

impl ValueType {
    pub fn as_str(self) -> &'static str {
        match self {
            ValueType::Boolean => "boolean",
            ValueType::Integer => "integer",
            ValueType::Float => "float",
            ValueType::String => "string",
            ValueType::KisaoId => "kisaoId",
            ValueType::List => "list",
            ValueType::Object => "object",
            ValueType::Any => "any",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed setting value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Json(serde_json::Value),
}

impl Value {
    /// Numeric view of the value, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Boolean(v) => write!(f, "{v}"),
            Value::Integer(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::String(v) => f.write_str(v),
            Value::Json(v) => write!(f, "{v}"),
        }
    }
}

/// Whether `id` has the shape of a KiSAO term id (`KISAO_` + 7 digits).
pub fn is_kisao_id(id: &str) -> bool {
    id.strip_prefix("KISAO_")
        .is_some_and(|digits| digits.len() == 7 && digits.bytes().all(|b| b.is_ascii_digit()))
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

/// Strictly check that `value` can be read as `value_type`.
pub fn validate_str_value(value: &str, value_type: ValueType) -> bool {
    match value_type {
        ValueType::Boolean => parse_bool(value).is_some(),
        ValueType::Integer => value.trim().parse::<i64>().is_ok(),
        ValueType::Float => value.trim().parse::<f64>().is_ok(),
        ValueType::String => true,
        ValueType::KisaoId => is_kisao_id(value),
        ValueType::List => matches!(
            serde_json::from_str::<serde_json::Value>(value),
            Ok(serde_json::Value::Array(_))
        ),
        ValueType::Object => matches!(
            serde_json::from_str::<serde_json::Value>(value),
            Ok(serde_json::Value::Object(_))
        ),
        ValueType::Any => serde_json::from_str::<serde_json::Value>(value).is_ok(),
    }
}

/// Parse `value` into `value_type`.
pub fn parse_value(value: &str, value_type: ValueType) -> CoreResult<Value> {
    let invalid = || CoreError::InvalidValue {
        value: value.to_string(),
        value_type: value_type.to_string(),
    };

    match value_type {
        ValueType::Boolean => parse_bool(value).map(Value::Boolean).ok_or_else(invalid),
        ValueType::Integer => value
            .trim()
            .parse::<i64>()
            .map(Value::Integer)
            .map_err(|_| invalid()),
        ValueType::Float => value
            .trim()
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| invalid()),
        ValueType::String => Ok(Value::String(value.to_string())),
        ValueType::KisaoId => {
            if is_kisao_id(value) {
                Ok(Value::String(value.to_string()))
            } else {
                Err(invalid())
            }
        }
        ValueType::List | ValueType::Object | ValueType::Any => {
            if !validate_str_value(value, value_type) {
                return Err(invalid());
            }
            serde_json::from_str(value)
                .map(Value::Json)
                .map_err(|_| invalid())
        }
    }
}
