//! Read-path statement assembly
//!
//! Fixed pipeline: alias extraction → projection → FROM → index hint →
//! default-value pruning → WHERE → COUNT snapshot → GROUP BY → HAVING →
//! ORDER BY → SELECT.

use log::{debug, warn};
use std::collections::HashMap;

use crate::config::CompilerConfig;
use crate::criteria::{Conjunction, Criteria, Operand, Predicate, PredicateNode};
use crate::schema_catalog::SchemaCatalog;

use super::bind_values::BindValues;
use super::dialect::Dialect;
use super::errors::CompileError;
use super::filter::prune_default_predicates;
use super::identifier::IdentifierResolver;
use super::predicate_compiler::{PredicateCompiler, RenderPosition};
use super::projection::{Projection, ProjectionBuilder};
use super::result_mapping::ResultMapping;
use super::source_script::{parse_alias_map, strip_from_keyword};
use super::SqlParsed;

pub struct ClauseAssembler<'a> {
    catalog: &'a SchemaCatalog,
    dialect: &'a dyn Dialect,
    config: &'a CompilerConfig,
}

impl<'a> ClauseAssembler<'a> {
    pub fn new(
        catalog: &'a SchemaCatalog,
        dialect: &'a dyn Dialect,
        config: &'a CompilerConfig,
    ) -> Self {
        Self {
            catalog,
            dialect,
            config,
        }
    }

    pub fn assemble(&self, criteria: &Criteria) -> Result<SqlParsed, CompileError> {
        let entity = self
            .catalog
            .lookup(&criteria.entity)
            .ok_or_else(|| CompileError::unresolved_entity(&criteria.entity))?;

        let script = criteria
            .source_script
            .as_deref()
            .map(strip_from_keyword)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| entity.script_name());

        let alias_map = match criteria.result_mapped {
            Some(_) => parse_alias_map(&script),
            None => HashMap::new(),
        };
        let resolver = IdentifierResolver::new(self.catalog, entity, &alias_map);
        let counting = !criteria.total_rows_ignored;

        let mut binds = BindValues::new();
        let mut mapping = ResultMapping::default();

        let projection = match &criteria.result_mapped {
            Some(result_mapped) => {
                ProjectionBuilder::new(&resolver, self.dialect, &self.config.alias_separator)
                    .build(result_mapped, counting, &mut mapping)?
            }
            None => Projection::all_columns(),
        };

        let mut from = format!("FROM {}", resolver.resolve_script(&script)?);
        if let Some(index) = criteria.force_index.as_deref().filter(|i| !i.trim().is_empty()) {
            if let Some(hint) = self.dialect.render_index_hint(index.trim()) {
                from = format!("{} {}", from, hint);
            }
        }

        let pruned;
        let conditions: &[PredicateNode] = if criteria.is_result_mapped() {
            pruned = prune_default_predicates(&criteria.conditions, &resolver);
            &pruned
        } else {
            &criteria.conditions
        };
        let where_clause = PredicateCompiler::new(&resolver, self.dialect).render(
            conditions,
            RenderPosition::TopFirst,
            &mut binds,
        )?;

        let body = join_clauses(&[from.as_str(), where_clause.as_str()]);

        let count_sql = counting.then(|| {
            let expression = projection
                .count_expression
                .as_deref()
                .unwrap_or("COUNT(*)");
            format!("SELECT {} {} {}", expression, self.config.count_alias, body)
        });

        let group_by = self.render_group_by(criteria, &resolver)?;
        let having = self.render_having(&projection.having)?;
        let order_by = self.render_order_by(criteria, &resolver)?;

        let select_sql = format!(
            "SELECT {} {}",
            projection.columns,
            join_clauses(&[body.as_str(), group_by.as_str(), having.as_str(), order_by.as_str()])
        );

        debug!(
            "Compiled {} select ({} bind values): {}",
            entity.name,
            binds.len(),
            select_sql
        );
        if let Some(count_sql) = &count_sql {
            debug!("Compiled {} count: {}", entity.name, count_sql);
        }

        mapping.alias_map = alias_map;
        Ok(SqlParsed {
            select_sql,
            count_sql,
            values: binds.into_vec(),
            result_mapping: mapping,
        })
    }

    fn render_group_by(
        &self,
        criteria: &Criteria,
        resolver: &IdentifierResolver<'_>,
    ) -> Result<String, CompileError> {
        let Some(group_by) = criteria.group_by.as_deref().filter(|g| !g.trim().is_empty()) else {
            return Ok(String::new());
        };
        if !criteria.is_result_mapped() {
            warn!(
                "GROUP BY '{}' ignored on {}: only result-mapped reads are grouped",
                group_by, criteria.entity
            );
            return Ok(String::new());
        }

        let columns = group_by
            .split(',')
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(|key| resolver.resolve_key(key))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(format!("GROUP BY {}", columns.join(", ")))
    }

    /// HAVING values are inlined as literals, never bound
    fn render_having(&self, having: &[(String, PredicateNode)]) -> Result<String, CompileError> {
        let mut parts = Vec::with_capacity(having.len());

        for (alias, node) in having {
            let Some(operand) = node.value.as_ref().filter(|o| !o.is_absent()) else {
                continue;
            };
            let condition = match (node.predicate, operand) {
                (Predicate::Between, Operand::Range { min, max }) => format!(
                    "{} BETWEEN {} AND {}",
                    alias,
                    self.dialect.render_literal(min)?,
                    self.dialect.render_literal(max)?
                ),
                (Predicate::In | Predicate::NotIn, Operand::List(values)) => {
                    let literals = values
                        .iter()
                        .filter(|v| !v.is_null())
                        .map(|v| self.dialect.render_literal(v))
                        .collect::<Result<Vec<_>, _>>()?;
                    if literals.is_empty() {
                        return Err(CompileError::syntax(format!(
                            "HAVING {} on `{}` has no values",
                            node.predicate.sql(),
                            alias
                        )));
                    }
                    format!("{} {} ({})", alias, node.predicate.sql(), literals.join(", "))
                }
                (predicate, Operand::Value(value))
                    if predicate.is_comparison()
                        || matches!(predicate, Predicate::Like | Predicate::NotLike) =>
                {
                    format!(
                        "{} {} {}",
                        alias,
                        predicate.sql(),
                        self.dialect.render_literal(value)?
                    )
                }
                (predicate, _) => {
                    return Err(CompileError::syntax(format!(
                        "HAVING on `{}` does not support {}",
                        alias,
                        predicate.sql()
                    )))
                }
            };

            let keyword = if parts.is_empty() {
                "HAVING"
            } else {
                node.conjunction.unwrap_or(Conjunction::And).sql()
            };
            parts.push(format!("{} {}", keyword, condition));
        }

        Ok(parts.join(" "))
    }

    fn render_order_by(
        &self,
        criteria: &Criteria,
        resolver: &IdentifierResolver<'_>,
    ) -> Result<String, CompileError> {
        if criteria.fixed_sort || criteria.sorts.is_empty() {
            return Ok(String::new());
        }

        let sorts = criteria
            .sorts
            .iter()
            .filter(|sort| !sort.order_by.trim().is_empty())
            .map(|sort| {
                resolver
                    .resolve_script(&sort.order_by)
                    .map(|column| format!("{} {}", column, sort.direction()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        if sorts.is_empty() {
            return Ok(String::new());
        }
        Ok(format!("ORDER BY {}", sorts.join(", ")))
    }
}

fn join_clauses(clauses: &[&str]) -> String {
    clauses
        .iter()
        .filter(|clause| !clause.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}
