//! Declared property types for entity metadata
//!
//! Every mapped property carries one of these types in the catalog YAML. The
//! type decides two things during compilation:
//!
//! - the *default value* of the column, used to prune no-op predicates and to
//!   elide unchanged assignments in UPDATE statements
//! - value coercion for refresh assignments (epoch millis → temporal values)
//!
//! # Default values
//!
//! | type       | default                       |
//! |------------|-------------------------------|
//! | `integer`  | `0`                           |
//! | `float`    | `0.0`                         |
//! | `boolean`  | `false`                       |
//! | `string`   | `""`                          |
//! | `datetime` | epoch (`0` or `1970-01-01 00:00:00`) |
//! | `date`     | epoch (`0` or `1970-01-01`)   |
//! | `uuid`     | none                          |
//! | `json`     | none                          |
//!
//! A property declared `nullable: true` has no scalar default at all. A null
//! operand always counts as the default.
//!
//! # Example
//!
//! ```yaml
//! properties:
//!   amount:
//!     column: amount
//!     type: integer
//! ```

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::criteria::SqlValue;

/// Simple, database-agnostic type of a mapped property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    /// Whole numbers (TINYINT..BIGINT, Int8..UInt64)
    Integer,

    /// Decimal numbers (FLOAT, DOUBLE, DECIMAL)
    Float,

    /// Text (VARCHAR, TEXT, String)
    String,

    /// True/False
    Boolean,

    /// Timestamps (DATETIME, TIMESTAMP, DateTime64)
    DateTime,

    /// Dates (DATE, Date32)
    Date,

    /// UUIDs
    Uuid,

    /// Structured value stored as JSON text
    Json,
}

impl SchemaType {
    /// Parse a type string from YAML configuration
    ///
    /// Case-insensitive and supports common aliases for convenience.
    ///
    /// # Supported aliases
    ///
    /// - `integer`: int, long
    /// - `float`: double, decimal
    /// - `string`: text, varchar
    /// - `boolean`: bool
    /// - `datetime`: timestamp
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().trim() {
            "integer" | "int" | "long" => Ok(SchemaType::Integer),
            "float" | "double" | "decimal" => Ok(SchemaType::Float),
            "string" | "text" | "varchar" => Ok(SchemaType::String),
            "boolean" | "bool" => Ok(SchemaType::Boolean),
            "datetime" | "timestamp" => Ok(SchemaType::DateTime),
            "date" => Ok(SchemaType::Date),
            "uuid" => Ok(SchemaType::Uuid),
            "json" => Ok(SchemaType::Json),
            _ => Err(format!(
                "Unknown type: '{}'. Supported: integer, float, string, boolean, datetime, date, uuid, json",
                s
            )),
        }
    }

    /// Whether `value` equals the default value of this type.
    ///
    /// `nullable` properties only treat an absent (null) value as default.
    pub fn is_default_value(&self, value: &SqlValue, nullable: bool) -> bool {
        if value.is_null() {
            return true;
        }
        if nullable {
            return false;
        }

        match (self, value) {
            (SchemaType::Integer, SqlValue::Int(i)) => *i == 0,
            (SchemaType::Integer, SqlValue::Float(f)) => *f == 0.0,
            (SchemaType::Float, SqlValue::Float(f)) => *f == 0.0,
            (SchemaType::Float, SqlValue::Int(i)) => *i == 0,
            (SchemaType::Boolean, SqlValue::Bool(b)) => !*b,
            (SchemaType::String, SqlValue::Text(s)) => s.is_empty(),
            (SchemaType::DateTime, SqlValue::Int(millis))
            | (SchemaType::Date, SqlValue::Int(millis)) => *millis == 0,
            (SchemaType::DateTime, SqlValue::DateTime(dt)) => Some(*dt) == epoch_datetime(),
            (SchemaType::Date, SqlValue::Date(d)) => Some(*d) == epoch_date(),
            _ => false,
        }
    }

    /// Whether the column stores a temporal value
    pub fn is_temporal(&self) -> bool {
        matches!(self, SchemaType::DateTime | SchemaType::Date)
    }

    /// Get the type name as a lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaType::Integer => "integer",
            SchemaType::Float => "float",
            SchemaType::String => "string",
            SchemaType::Boolean => "boolean",
            SchemaType::DateTime => "datetime",
            SchemaType::Date => "date",
            SchemaType::Uuid => "uuid",
            SchemaType::Json => "json",
        }
    }
}

fn epoch_date() -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(1970, 1, 1)
}

fn epoch_datetime() -> Option<NaiveDateTime> {
    epoch_date().and_then(|d| d.and_hms_opt(0, 0, 0))
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
