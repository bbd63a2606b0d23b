//! Predicate tree → boolean SQL
//!
//! Renders an ordered list of [`PredicateNode`]s into one expression, appending
//! bind values in the same order the `?` placeholders appear.
//!
//! Conjunction handling is driven by [`RenderPosition`]: the first fragment
//! emitted at top level is introduced by `WHERE`, the first fragment inside a
//! group by nothing, and every later fragment by its own conjunction.
//! Nodes that render nothing (absent operands, empty groups, structural
//! markers) do not consume the first position.

use log::trace;

use crate::criteria::{Conjunction, Operand, Predicate, PredicateNode, SqlValue};
use crate::criteria::predicate::RAW_LITERAL_DELIMITER;

use super::bind_values::BindValues;
use super::dialect::Dialect;
use super::errors::CompileError;
use super::identifier::IdentifierResolver;

/// Where the next emitted fragment sits in its expression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPosition {
    /// First fragment of a WHERE clause: introduced by `WHERE`
    TopFirst,
    TopSubsequent,
    /// First fragment inside parentheses: no conjunction
    NestedFirst,
    NestedSubsequent,
    /// Standalone condition text: every conjunction is kept
    Fragment,
}

impl RenderPosition {
    fn prefix(self, conjunction: Option<Conjunction>) -> Option<&'static str> {
        match self {
            RenderPosition::TopFirst => Some("WHERE"),
            RenderPosition::NestedFirst => None,
            RenderPosition::TopSubsequent
            | RenderPosition::NestedSubsequent
            | RenderPosition::Fragment => conjunction.map(|c| c.sql()),
        }
    }

    fn advance(self) -> Self {
        match self {
            RenderPosition::TopFirst => RenderPosition::TopSubsequent,
            RenderPosition::NestedFirst => RenderPosition::NestedSubsequent,
            other => other,
        }
    }
}

/// Text operand wrapped in `#...#`: the inner expression, inlined as SQL
pub fn raw_literal(value: &SqlValue) -> Option<&str> {
    match value {
        SqlValue::Text(s)
            if s.len() >= 2
                && s.starts_with(RAW_LITERAL_DELIMITER)
                && s.ends_with(RAW_LITERAL_DELIMITER) =>
        {
            Some(&s[1..s.len() - 1])
        }
        _ => None,
    }
}

pub struct PredicateCompiler<'a> {
    resolver: &'a IdentifierResolver<'a>,
    dialect: &'a dyn Dialect,
}

impl<'a> PredicateCompiler<'a> {
    pub fn new(resolver: &'a IdentifierResolver<'a>, dialect: &'a dyn Dialect) -> Self {
        Self { resolver, dialect }
    }

    /// Render `nodes` starting at `start`; returns "" when nothing is emitted
    pub fn render(
        &self,
        nodes: &[PredicateNode],
        start: RenderPosition,
        binds: &mut BindValues,
    ) -> Result<String, CompileError> {
        let mut parts = Vec::with_capacity(nodes.len());
        let mut position = start;

        for node in nodes {
            let Some(body) = self.render_node(node, binds)? else {
                trace!("predicate on `{}` rendered nothing", node.key);
                continue;
            };
            let fragment = match position.prefix(node.conjunction) {
                Some(prefix) => format!("{} {}", prefix, body),
                None => body,
            };
            parts.push(fragment);
            position = position.advance();
        }

        Ok(parts.join(" "))
    }

    /// Body of one node, without its conjunction
    fn render_node(
        &self,
        node: &PredicateNode,
        binds: &mut BindValues,
    ) -> Result<Option<String>, CompileError> {
        if node.is_group() {
            let inner = self.render(&node.sub_list, RenderPosition::NestedFirst, binds)?;
            if inner.is_empty() {
                return Ok(None);
            }
            return Ok(Some(format!("({})", inner)));
        }

        match node.predicate {
            Predicate::Sub | Predicate::SubBegin | Predicate::SubEnd => return Ok(None),
            Predicate::X => return self.render_raw(node, binds),
            Predicate::IsNull | Predicate::IsNotNull => return self.render_null_check(node),
            _ => {}
        }

        let operand = match &node.value {
            Some(operand) if !operand.is_absent() => operand,
            _ => return Ok(None),
        };
        if node.key.trim().is_empty() {
            return Ok(None);
        }
        let key = self.resolver.resolve_script(&node.key)?;

        match node.predicate {
            Predicate::In | Predicate::NotIn => {
                let values = match operand {
                    Operand::List(values) => values.as_slice(),
                    Operand::Value(value) => std::slice::from_ref(value),
                    Operand::Range { .. } => {
                        return Err(CompileError::syntax(format!(
                            "{} on `{}` needs a list, not a range",
                            node.predicate.sql(),
                            node.key
                        )))
                    }
                };
                let list = self.dialect.render_in_list(values, binds)?;
                Ok(Some(format!("{} {} {}", key, node.predicate.sql(), list)))
            }
            Predicate::Between => match operand {
                Operand::Range { min, max } => {
                    binds.push(min.clone());
                    binds.push(max.clone());
                    Ok(Some(format!("{} BETWEEN ? AND ?", key)))
                }
                _ => Err(CompileError::syntax(format!(
                    "BETWEEN on `{}` needs a min/max range",
                    node.key
                ))),
            },
            _ => {
                let Operand::Value(value) = operand else {
                    return Err(CompileError::syntax(format!(
                        "{} on `{}` needs a single value",
                        node.predicate.sql(),
                        node.key
                    )));
                };
                let rhs = match raw_literal(value) {
                    Some(expression) => self.resolver.resolve_script(expression)?,
                    None => {
                        binds.push(value.clone());
                        "?".to_string()
                    }
                };
                Ok(Some(format!("{} {} {}", key, node.predicate.sql(), rhs)))
            }
        }
    }

    /// Caller-supplied SQL; operand values bind to its placeholders
    fn render_raw(
        &self,
        node: &PredicateNode,
        binds: &mut BindValues,
    ) -> Result<Option<String>, CompileError> {
        let script = self.resolver.resolve_script(&node.key)?;
        if script.is_empty() {
            return Ok(None);
        }
        match &node.value {
            Some(Operand::List(values)) => binds.extend(values.iter().cloned()),
            Some(Operand::Value(value)) if !value.is_null() => binds.push(value.clone()),
            Some(Operand::Range { min, max }) => {
                binds.push(min.clone());
                binds.push(max.clone());
            }
            _ => {}
        }
        Ok(Some(script))
    }

    /// `operand IS [NOT] NULL`; the operand defaults to the key
    fn render_null_check(&self, node: &PredicateNode) -> Result<Option<String>, CompileError> {
        let operand = match node.scalar() {
            Some(SqlValue::Text(text)) if !text.trim().is_empty() => text.as_str(),
            _ => node.key.as_str(),
        };
        if operand.trim().is_empty() {
            return Ok(None);
        }
        let operand = self.resolver.resolve_script(operand)?;
        Ok(Some(format!("{} {}", operand, node.predicate.sql())))
    }
}
