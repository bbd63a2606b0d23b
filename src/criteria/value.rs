use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A value bound to a `?` placeholder, or compared against a column's default.
///
/// Deserialization is untagged so YAML/JSON criteria can use plain scalars;
/// enum values are written as `{ enum: PAID }`. Strings in ISO form
/// (`2024-01-31T08:00:00`, `2024-01-31`) become temporal values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    /// Enum constant, bound by its symbolic name
    Enum {
        #[serde(rename = "enum")]
        name: String,
    },
    DateTime(NaiveDateTime),
    Date(NaiveDate),
    Text(String),
    Json(serde_json::Value),
}

impl SqlValue {
    pub fn enum_name(name: impl Into<String>) -> Self {
        SqlValue::Enum { name: name.into() }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null | SqlValue::Json(serde_json::Value::Null))
    }

    /// Null, or text that is empty
    pub fn is_null_or_empty(&self) -> bool {
        match self {
            SqlValue::Text(s) => s.is_empty(),
            other => other.is_null(),
        }
    }

    /// The form handed to the driver: enums collapse to their name
    pub fn into_bind(self) -> SqlValue {
        match self {
            SqlValue::Enum { name } => SqlValue::Text(name),
            other => other,
        }
    }

    /// The value as a JSON document, enums by name
    pub fn to_json_value(&self) -> serde_json::Value {
        match self {
            SqlValue::Json(v) => v.clone(),
            SqlValue::Enum { name } => serde_json::Value::String(name.clone()),
            other => serde_json::to_value(other).unwrap_or(serde_json::Value::Null),
        }
    }

    /// JSON text of the value, used for JSON-flagged columns
    pub fn to_json_text(&self) -> Result<String, serde_json::Error> {
        match self {
            SqlValue::Text(s) => Ok(s.clone()),
            SqlValue::Json(v) => serde_json::to_string(v),
            SqlValue::Enum { name } => serde_json::to_string(name),
            other => serde_json::to_string(other),
        }
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Int(value)
    }
}

impl From<i32> for SqlValue {
    fn from(value: i32) -> Self {
        SqlValue::Int(value.into())
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        SqlValue::Float(value)
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        SqlValue::Bool(value)
    }
}

impl From<NaiveDateTime> for SqlValue {
    fn from(value: NaiveDateTime) -> Self {
        SqlValue::DateTime(value)
    }
}

impl From<NaiveDate> for SqlValue {
    fn from(value: NaiveDate) -> Self {
        SqlValue::Date(value)
    }
}

impl From<serde_json::Value> for SqlValue {
    fn from(value: serde_json::Value) -> Self {
        SqlValue::Json(value)
    }
}
