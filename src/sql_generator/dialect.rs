//! Vendor-specific rendering rules
//!
//! The compiler only ever asks a dialect to render: column aliases for
//! projected expressions, IN lists, inline literals and index hints. Dialects
//! hold no per-call state and are shared across compilations.

use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

use crate::criteria::SqlValue;

use super::bind_values::BindValues;
use super::errors::CompileError;
use super::literal::{format_literal, is_inline_safe, LiteralStyle};
use super::result_mapping::ResultMapping;

pub trait Dialect: Send + Sync + fmt::Debug {
    fn name(&self) -> &'static str;

    fn literal_style(&self) -> LiteralStyle;

    /// Prefix of generated result aliases (`c0`, `c1`, ...)
    fn result_alias_prefix(&self) -> &str;

    /// Give a projected expression a legal alias.
    ///
    /// Dotted expressions without an explicit `AS` get `<prefix><n>`, where n
    /// is the number of aliases generated so far; the alias is recorded in the
    /// mapping so results can be decoded later.
    fn render_alias(&self, expression: &str, mapping: &mut ResultMapping) -> String {
        if expression.contains('.') && !has_alias(expression) {
            let alias = format!(
                "{}{}",
                self.result_alias_prefix(),
                mapping.result_key_alias_map.len()
            );
            mapping
                .result_key_alias_map
                .insert(alias.clone(), expression.to_string());
            return format!("{} AS {}", expression, alias);
        }
        expression.to_string()
    }

    /// Render `(a, b, ...)` for IN / NOT IN
    fn render_in_list(
        &self,
        values: &[SqlValue],
        binds: &mut BindValues,
    ) -> Result<String, CompileError> {
        render_in_list(self, values, binds)
    }

    fn render_literal(&self, value: &SqlValue) -> Result<String, CompileError> {
        format_literal(value, self.literal_style())
    }

    /// Index hint placed right after the FROM clause, if the vendor has one
    fn render_index_hint(&self, index: &str) -> Option<String>;
}

fn has_alias(expression: &str) -> bool {
    expression.to_ascii_uppercase().contains(" AS ")
}

/// Shared IN-list rendering.
///
/// Numbers and booleans are inlined; every other value becomes a `?` bound in
/// order. Null members are dropped.
pub fn render_in_list<D: Dialect + ?Sized>(
    dialect: &D,
    values: &[SqlValue],
    binds: &mut BindValues,
) -> Result<String, CompileError> {
    let mut items = Vec::with_capacity(values.len());
    for value in values.iter().filter(|v| !v.is_null()) {
        if is_inline_safe(value) {
            items.push(dialect.render_literal(value)?);
        } else {
            items.push("?".to_string());
            binds.push(value.clone());
        }
    }

    if items.is_empty() {
        return Err(CompileError::syntax("IN list has no non-null values"));
    }
    Ok(format!("({})", items.join(", ")))
}

#[derive(Debug, Clone)]
pub struct MySqlDialect {
    result_alias_prefix: String,
}

impl MySqlDialect {
    pub fn new(result_alias_prefix: impl Into<String>) -> Self {
        Self {
            result_alias_prefix: result_alias_prefix.into(),
        }
    }
}

impl Default for MySqlDialect {
    fn default() -> Self {
        Self::new("c")
    }
}

impl Dialect for MySqlDialect {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn literal_style(&self) -> LiteralStyle {
        LiteralStyle::Standard
    }

    fn result_alias_prefix(&self) -> &str {
        &self.result_alias_prefix
    }

    fn render_index_hint(&self, index: &str) -> Option<String> {
        Some(format!("FORCE INDEX({})", index))
    }
}

#[derive(Debug, Clone)]
pub struct ClickHouseDialect {
    result_alias_prefix: String,
}

impl ClickHouseDialect {
    pub fn new(result_alias_prefix: impl Into<String>) -> Self {
        Self {
            result_alias_prefix: result_alias_prefix.into(),
        }
    }
}

impl Default for ClickHouseDialect {
    fn default() -> Self {
        Self::new("c")
    }
}

impl Dialect for ClickHouseDialect {
    fn name(&self) -> &'static str {
        "clickhouse"
    }

    fn literal_style(&self) -> LiteralStyle {
        LiteralStyle::Backslash
    }

    fn result_alias_prefix(&self) -> &str {
        &self.result_alias_prefix
    }

    fn render_index_hint(&self, index: &str) -> Option<String> {
        warn!("ClickHouse has no index hints; ignoring FORCE INDEX({})", index);
        None
    }
}

#[derive(Debug, Error)]
#[error("Unknown SQL dialect: '{0}' (supported: mysql, clickhouse)")]
pub struct UnknownDialectError(String);

/// Dialect selector used by configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SqlDialect {
    #[serde(rename = "mysql")]
    #[default]
    MySql,

    #[serde(rename = "clickhouse")]
    ClickHouse,
}

impl SqlDialect {
    pub fn as_str(&self) -> &'static str {
        match self {
            SqlDialect::MySql => "mysql",
            SqlDialect::ClickHouse => "clickhouse",
        }
    }

    pub fn build(&self, result_alias_prefix: &str) -> Arc<dyn Dialect> {
        match self {
            SqlDialect::MySql => Arc::new(MySqlDialect::new(result_alias_prefix)),
            SqlDialect::ClickHouse => Arc::new(ClickHouseDialect::new(result_alias_prefix)),
        }
    }
}

impl FromStr for SqlDialect {
    type Err = UnknownDialectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mysql" => Ok(SqlDialect::MySql),
            "clickhouse" => Ok(SqlDialect::ClickHouse),
            _ => Err(UnknownDialectError(s.to_string())),
        }
    }
}

impl fmt::Display for SqlDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
