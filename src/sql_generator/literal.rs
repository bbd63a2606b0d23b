//! SQL literal rendering for values that are inlined instead of bound
//!
//! Only HAVING operands and the numeric members of IN lists are inlined;
//! everything else goes through `?` placeholders.

use crate::criteria::SqlValue;

use super::errors::CompileError;

/// How a dialect writes string and boolean literals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralStyle {
    /// `'O''Brien'`, `TRUE`/`FALSE`
    Standard,
    /// `'O\'Brien'`, `1`/`0`
    Backslash,
}

/// Escape a string by doubling single quotes (SQL standard, MySQL)
fn escape_quote_doubling(s: &str) -> String {
    s.replace('\\', "\\\\").replace('\'', "''")
}

/// Escape a string the ClickHouse way
///
/// - Backslash \ escapes special characters
/// - Single quotes must be escaped as \'
/// - Backslashes must be escaped as \\
/// - Newlines, tabs, etc. must be escaped
fn escape_backslash(s: &str) -> String {
    s.replace('\\', "\\\\") // Must be first!
        .replace('\'', "\\'")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
        .replace('\0', "\\0")
}

fn quote(s: &str, style: LiteralStyle) -> String {
    match style {
        LiteralStyle::Standard => format!("'{}'", escape_quote_doubling(s)),
        LiteralStyle::Backslash => format!("'{}'", escape_backslash(s)),
    }
}

/// Whether a value can be inlined without quoting
pub fn is_inline_safe(value: &SqlValue) -> bool {
    match value {
        SqlValue::Int(_) | SqlValue::Bool(_) => true,
        SqlValue::Float(f) => f.is_finite(),
        _ => false,
    }
}

/// Format a value as a SQL literal
pub fn format_literal(value: &SqlValue, style: LiteralStyle) -> Result<String, CompileError> {
    match value {
        SqlValue::Null => Ok("NULL".to_string()),
        SqlValue::Int(i) => Ok(i.to_string()),
        SqlValue::Float(f) if f.is_finite() => Ok(f.to_string()),
        SqlValue::Float(f) => Err(CompileError::syntax(format!(
            "non-finite float cannot be rendered as a literal: {}",
            f
        ))),
        SqlValue::Bool(b) => Ok(match (style, b) {
            (LiteralStyle::Standard, true) => "TRUE".to_string(),
            (LiteralStyle::Standard, false) => "FALSE".to_string(),
            (LiteralStyle::Backslash, true) => "1".to_string(),
            (LiteralStyle::Backslash, false) => "0".to_string(),
        }),
        SqlValue::Text(s) => Ok(quote(s, style)),
        SqlValue::Enum { name } => Ok(quote(name, style)),
        SqlValue::DateTime(dt) => Ok(quote(&dt.format("%Y-%m-%d %H:%M:%S").to_string(), style)),
        SqlValue::Date(d) => Ok(quote(&d.format("%Y-%m-%d").to_string(), style)),
        SqlValue::Json(serde_json::Value::Null) => Ok("NULL".to_string()),
        SqlValue::Json(v) => Ok(quote(&v.to_string(), style)),
    }
}
