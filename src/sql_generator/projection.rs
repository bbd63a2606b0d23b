//! SELECT column list of result-mapped reads
//!
//! Sections are rendered in a fixed order: DISTINCT columns, then aggregates
//! (reduces), then plain result keys. Every rendered column goes through the
//! dialect's alias hook, and every generated alias is recorded in the
//! [`ResultMapping`] so result labels can be mapped back to logical keys.

use crate::criteria::{PredicateNode, Reduce, ResultMapped};

use super::dialect::Dialect;
use super::errors::CompileError;
use super::identifier::IdentifierResolver;
use super::result_mapping::ResultMapping;

/// Rendered projection plus what later clauses need from it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Projection {
    /// Comma-joined column list, without the SELECT keyword
    pub columns: String,
    /// `COUNT(DISTINCT ...)` when the projection is distinct
    pub count_expression: Option<String>,
    /// HAVING predicates rebound to their aggregate aliases, in reduce order
    pub having: Vec<(String, PredicateNode)>,
}

impl Projection {
    /// The implicit projection of a plain (non result-mapped) read
    pub fn all_columns() -> Self {
        Self {
            columns: "*".to_string(),
            ..Default::default()
        }
    }
}

/// Alias of an aggregate column: `o.amount` + SUM → `o$amount_sum`
pub fn reduce_alias(reduce: &Reduce, separator: &str) -> String {
    format!(
        "{}_{}",
        reduce_subject(reduce).replace('.', separator),
        reduce.reduce_type.alias_suffix()
    )
}

fn reduce_subject(reduce: &Reduce) -> &str {
    match reduce.property.trim() {
        "*" => "all",
        property => property,
    }
}

pub struct ProjectionBuilder<'a> {
    resolver: &'a IdentifierResolver<'a>,
    dialect: &'a dyn Dialect,
    alias_separator: &'a str,
}

impl<'a> ProjectionBuilder<'a> {
    pub fn new(
        resolver: &'a IdentifierResolver<'a>,
        dialect: &'a dyn Dialect,
        alias_separator: &'a str,
    ) -> Self {
        Self {
            resolver,
            dialect,
            alias_separator,
        }
    }

    /// Render the projection. `counting` is whether a COUNT statement will be
    /// generated alongside the select; it cannot coexist with HAVING.
    pub fn build(
        &self,
        result_mapped: &ResultMapped,
        counting: bool,
        mapping: &mut ResultMapping,
    ) -> Result<Projection, CompileError> {
        if result_mapped.is_empty() {
            return Err(CompileError::syntax(
                "result-mapped criteria needs at least one result key, distinct column or reduce",
            ));
        }

        let mut columns = Vec::new();
        let mut projection = Projection::default();

        if !result_mapped.distinct.is_empty() {
            let mut resolved = Vec::with_capacity(result_mapped.distinct.len());
            for key in &result_mapped.distinct {
                let column = self.resolver.resolve_key(key)?;
                mapping.property_mapping.insert(key.clone(), column.clone());
                resolved.push(column);
            }
            projection.count_expression = Some(format!("COUNT(DISTINCT {})", resolved.join(", ")));

            let aliased: Vec<String> = resolved
                .iter()
                .map(|column| self.dialect.render_alias(column, mapping))
                .collect();
            columns.push(format!("DISTINCT {}", aliased.join(", ")));
        }

        for reduce in &result_mapped.reduces {
            let alias = reduce_alias(reduce, self.alias_separator);
            let expression = format!("{} AS {}", self.render_aggregate(reduce)?, alias);
            mapping.result_key_alias_map.insert(
                alias.clone(),
                format!("{}_{}", reduce_subject(reduce), reduce.reduce_type.alias_suffix()),
            );
            columns.push(self.dialect.render_alias(&expression, mapping));

            if let Some(having) = &reduce.having {
                if counting {
                    return Err(CompileError::syntax(format!(
                        "HAVING on `{}` requires total_rows_ignored; the COUNT statement cannot share a HAVING-filtered aggregate",
                        alias
                    )));
                }
                let mut having = having.clone();
                having.key = alias.clone();
                projection.having.push((alias, having));
            }
        }

        for key in &result_mapped.result_keys {
            let column = self.resolver.resolve_key(key)?;
            mapping.property_mapping.insert(key.clone(), column.clone());
            columns.push(self.dialect.render_alias(&column, mapping));
        }

        projection.columns = columns.join(", ");
        Ok(projection)
    }

    fn render_aggregate(&self, reduce: &Reduce) -> Result<String, CompileError> {
        let column = match reduce.property.trim() {
            "*" => "*".to_string(),
            property => self.resolver.resolve_key(property)?,
        };
        let function = reduce.reduce_type.function();
        if reduce.reduce_type.is_distinct() {
            Ok(format!("{}(DISTINCT {})", function, column))
        } else {
            Ok(format!("{}({})", function, column))
        }
    }
}
