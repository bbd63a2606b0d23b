//! UPDATE statement compilation
//!
//! `UPDATE <table> SET <assignments> [WHERE <conditions>]`. SET values are
//! bound before WHERE values. Assignments whose value is empty or the column
//! default are elided; an UPDATE left with nothing to set is rejected.

use chrono::{DateTime, Utc};
use log::{debug, warn};
use std::collections::HashMap;

use crate::criteria::{Operand, Predicate, PredicateNode, RefreshCondition, SqlValue};
use crate::schema_catalog::{EntitySchema, PropertySchema, SchemaCatalog, SchemaType};

use super::bind_values::BindValues;
use super::dialect::Dialect;
use super::errors::CompileError;
use super::filter::prune_default_predicates;
use super::identifier::IdentifierResolver;
use super::predicate_compiler::{PredicateCompiler, RenderPosition};
use super::RefreshParsed;

const PLACEHOLDER: char = '?';

/// Replace the leading conjunction of a condition fragment with `WHERE`
pub fn promote_to_where(fragment: &str) -> String {
    let fragment = fragment.trim();
    if fragment.is_empty() {
        return String::new();
    }
    let body = ["AND ", "OR "]
        .iter()
        .find_map(|conjunction| {
            fragment
                .get(..conjunction.len())
                .filter(|head| head.eq_ignore_ascii_case(conjunction))
                .map(|_| &fragment[conjunction.len()..])
        })
        .unwrap_or(fragment);
    format!("WHERE {}", body.trim_start())
}

/// Coerce an assignment value to what the column stores
fn coerce_value(
    entity: &EntitySchema,
    property: &str,
    schema: &PropertySchema,
    value: &SqlValue,
) -> Result<SqlValue, CompileError> {
    if schema.json {
        return match value {
            SqlValue::Text(_) => Ok(value.clone()),
            other => other.to_json_text().map(SqlValue::Text).map_err(|e| {
                CompileError::syntax(format!(
                    "{}.{} cannot be serialized to JSON: {}",
                    entity.name, property, e
                ))
            }),
        };
    }

    match (schema.schema_type, value) {
        (schema_type, SqlValue::Int(millis)) if schema_type.is_temporal() => {
            let instant = DateTime::<Utc>::from_timestamp(
                millis.div_euclid(1000),
                (millis.rem_euclid(1000) * 1_000_000) as u32,
            )
            .ok_or_else(|| {
                CompileError::syntax(format!(
                    "{}.{}: epoch millis {} out of range",
                    entity.name, property, millis
                ))
            })?;
            if schema.schema_type == SchemaType::Date {
                Ok(SqlValue::Date(instant.date_naive()))
            } else {
                Ok(SqlValue::DateTime(instant.naive_utc()))
            }
        }
        _ => Ok(value.clone()),
    }
}

fn is_json_property(entity: &EntitySchema, property: &str) -> bool {
    entity.property(property).is_some_and(|schema| schema.json)
}

/// A list assigned to a JSON column, as a JSON array
fn json_array(list: &[SqlValue]) -> SqlValue {
    SqlValue::Json(serde_json::Value::Array(
        list.iter().map(SqlValue::to_json_value).collect(),
    ))
}

pub struct RefreshCompiler<'a> {
    catalog: &'a SchemaCatalog,
    dialect: &'a dyn Dialect,
}

impl<'a> RefreshCompiler<'a> {
    pub fn new(catalog: &'a SchemaCatalog, dialect: &'a dyn Dialect) -> Self {
        Self { catalog, dialect }
    }

    pub fn compile(&self, refresh: &RefreshCondition) -> Result<RefreshParsed, CompileError> {
        let entity = self
            .catalog
            .lookup(&refresh.entity)
            .ok_or_else(|| CompileError::unresolved_entity(&refresh.entity))?;
        let aliases = HashMap::new();
        let resolver = IdentifierResolver::new(self.catalog, entity, &aliases);

        let mut set_values = BindValues::new();
        let mut assignments = Vec::with_capacity(refresh.refresh_list.len());
        for node in &refresh.refresh_list {
            if let Some(assignment) = self.render_assignment(node, &resolver, &mut set_values)? {
                assignments.push(assignment);
            }
        }

        let conditions = prune_default_predicates(&refresh.conditions, &resolver);
        let mut where_values = BindValues::new();
        let fragment = PredicateCompiler::new(&resolver, self.dialect).render(
            &conditions,
            RenderPosition::Fragment,
            &mut where_values,
        )?;
        let where_clause = promote_to_where(&fragment);

        let mut sql = format!("UPDATE {} SET {}", entity.table_name, assignments.join(", "));
        if !where_clause.is_empty() {
            sql = format!("{} {}", sql, where_clause);
        }

        if assignments.is_empty() {
            return Err(CompileError::StatementBuild {
                reason: "UPDATE has no fields to set".to_string(),
                sql,
            });
        }
        if where_clause.is_empty() {
            warn!("UPDATE on {} has no WHERE clause: {}", entity.name, sql);
        }

        set_values.append(where_values);
        debug!(
            "Compiled {} refresh ({} bind values): {}",
            entity.name,
            set_values.len(),
            sql
        );

        Ok(RefreshParsed {
            sql,
            values: set_values.into_vec(),
        })
    }

    /// One SET assignment, or None when it is elided
    fn render_assignment(
        &self,
        node: &PredicateNode,
        resolver: &IdentifierResolver<'_>,
        values: &mut BindValues,
    ) -> Result<Option<String>, CompileError> {
        let key = node.key.trim();
        if key.is_empty() {
            return Ok(None);
        }

        // Raw script, inlined as written
        if node.predicate == Predicate::X {
            match &node.value {
                Some(Operand::List(list)) => values.extend(list.iter().cloned()),
                Some(Operand::Value(value)) => values.push(value.clone()),
                Some(Operand::Range { .. }) => {
                    return Err(CompileError::syntax(format!(
                        "raw refresh `{}` cannot bind a range",
                        key
                    )));
                }
                None => {}
            }
            return Ok(Some(resolver.resolve_script(key)?));
        }

        let value = match &node.value {
            None => SqlValue::Null,
            Some(Operand::Value(value)) => value.clone(),
            Some(Operand::List(list)) if is_json_property(resolver.entity(), key) => {
                json_array(list)
            }
            Some(_) => {
                return Err(CompileError::syntax(format!(
                    "refresh of `{}` needs a single value",
                    key
                )));
            }
        };
        let value = &value;

        // `version = version + ?`: inlined, value bound to the placeholder
        if key.contains(PLACEHOLDER) {
            values.push(value.clone());
            return Ok(Some(resolver.resolve_script(key)?));
        }

        let entity = resolver.entity();
        if value.is_null_or_empty() || entity.is_default_value(key, value) {
            debug!("Eliding refresh of {}.{}: default value", entity.name, key);
            return Ok(None);
        }

        let schema = entity
            .property(key)
            .ok_or_else(|| CompileError::UnresolvedPropertyMapper {
                entity: entity.name.clone(),
                property: key.to_string(),
            })?;
        values.push(coerce_value(entity, key, schema, value)?);
        Ok(Some(format!("{} = ?", schema.column)))
    }
}
