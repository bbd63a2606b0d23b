use serde::{Deserialize, Serialize};
use std::fmt;

use super::value::SqlValue;

/// Key carried by group nodes
pub const SUB_KEY: &str = "SUB";

/// Delimiter marking a text operand as a raw SQL expression: `#price * 2#`
pub const RAW_LITERAL_DELIMITER: char = '#';

/// Boolean connective joining a predicate to its predecessor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Conjunction {
    And,
    Or,
}

impl Conjunction {
    pub fn sql(&self) -> &'static str {
        match self {
            Conjunction::And => "AND",
            Conjunction::Or => "OR",
        }
    }
}

impl fmt::Display for Conjunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sql())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Predicate {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    Like,
    NotLike,
    In,
    NotIn,
    Between,
    IsNull,
    IsNotNull,
    /// Caller-supplied SQL fragment, rendered verbatim
    X,
    /// Grouped sub-expression
    Sub,
    SubBegin,
    SubEnd,
}

impl Predicate {
    /// Operator text as it appears between key and operand
    pub fn sql(&self) -> &'static str {
        match self {
            Predicate::Eq => "=",
            Predicate::Ne => "<>",
            Predicate::Gt => ">",
            Predicate::Gte => ">=",
            Predicate::Lt => "<",
            Predicate::Lte => "<=",
            Predicate::Like => "LIKE",
            Predicate::NotLike => "NOT LIKE",
            Predicate::In => "IN",
            Predicate::NotIn => "NOT IN",
            Predicate::Between => "BETWEEN",
            Predicate::IsNull => "IS NULL",
            Predicate::IsNotNull => "IS NOT NULL",
            Predicate::X => "",
            Predicate::Sub => SUB_KEY,
            Predicate::SubBegin => "(",
            Predicate::SubEnd => ")",
        }
    }

    /// EQ/NE/GT/GTE/LT/LTE
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            Predicate::Eq
                | Predicate::Ne
                | Predicate::Gt
                | Predicate::Gte
                | Predicate::Lt
                | Predicate::Lte
        )
    }

    pub fn is_membership(&self) -> bool {
        matches!(self, Predicate::In | Predicate::NotIn)
    }
}

/// Right-hand side of a predicate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Operand {
    Range { min: SqlValue, max: SqlValue },
    List(Vec<SqlValue>),
    Value(SqlValue),
}

impl Operand {
    /// Absent operands make a predicate contribute nothing
    pub fn is_absent(&self) -> bool {
        matches!(self, Operand::Value(v) if v.is_null())
    }
}

fn default_conjunction() -> Option<Conjunction> {
    Some(Conjunction::And)
}

/// One node of a predicate tree.
///
/// A node with a non-empty `sub_list` is a group: its children render inside
/// parentheses, and the first child's conjunction is dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredicateNode {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub value: Option<Operand>,
    pub predicate: Predicate,
    #[serde(default = "default_conjunction")]
    pub conjunction: Option<Conjunction>,
    #[serde(default, rename = "sub", skip_serializing_if = "Vec::is_empty")]
    pub sub_list: Vec<PredicateNode>,
}

impl PredicateNode {
    pub fn new(key: impl Into<String>, predicate: Predicate, value: Option<Operand>) -> Self {
        Self {
            key: key.into(),
            value,
            predicate,
            conjunction: Some(Conjunction::And),
            sub_list: Vec::new(),
        }
    }

    fn compare(key: impl Into<String>, predicate: Predicate, value: impl Into<SqlValue>) -> Self {
        Self::new(key, predicate, Some(Operand::Value(value.into())))
    }

    pub fn eq(key: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        Self::compare(key, Predicate::Eq, value)
    }

    pub fn ne(key: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        Self::compare(key, Predicate::Ne, value)
    }

    pub fn gt(key: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        Self::compare(key, Predicate::Gt, value)
    }

    pub fn gte(key: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        Self::compare(key, Predicate::Gte, value)
    }

    pub fn lt(key: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        Self::compare(key, Predicate::Lt, value)
    }

    pub fn lte(key: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        Self::compare(key, Predicate::Lte, value)
    }

    pub fn like(key: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        Self::compare(key, Predicate::Like, value)
    }

    pub fn not_like(key: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        Self::compare(key, Predicate::NotLike, value)
    }

    pub fn in_list<V: Into<SqlValue>>(key: impl Into<String>, values: Vec<V>) -> Self {
        let values = values.into_iter().map(Into::into).collect();
        Self::new(key, Predicate::In, Some(Operand::List(values)))
    }

    pub fn not_in<V: Into<SqlValue>>(key: impl Into<String>, values: Vec<V>) -> Self {
        let values = values.into_iter().map(Into::into).collect();
        Self::new(key, Predicate::NotIn, Some(Operand::List(values)))
    }

    pub fn between(
        key: impl Into<String>,
        min: impl Into<SqlValue>,
        max: impl Into<SqlValue>,
    ) -> Self {
        let range = Operand::Range {
            min: min.into(),
            max: max.into(),
        };
        Self::new(key, Predicate::Between, Some(range))
    }

    /// `key IS NULL`; the key doubles as the operand
    pub fn is_null(key: impl Into<String>) -> Self {
        let key = key.into();
        Self::new(key.clone(), Predicate::IsNull, Some(Operand::Value(key.into())))
    }

    pub fn is_not_null(key: impl Into<String>) -> Self {
        let key = key.into();
        Self::new(key.clone(), Predicate::IsNotNull, Some(Operand::Value(key.into())))
    }

    /// Raw SQL fragment; `values` bind to the `?` placeholders it contains
    pub fn raw<V: Into<SqlValue>>(script: impl Into<String>, values: Vec<V>) -> Self {
        let value = match values.len() {
            0 => None,
            _ => Some(Operand::List(values.into_iter().map(Into::into).collect())),
        };
        Self::new(script, Predicate::X, value)
    }

    /// Parenthesized group of child predicates
    pub fn group(children: Vec<PredicateNode>) -> Self {
        let mut node = Self::new(SUB_KEY, Predicate::Sub, None);
        node.sub_list = children;
        node
    }

    /// Join this node with OR instead of AND
    pub fn or(mut self) -> Self {
        self.conjunction = Some(Conjunction::Or);
        self
    }

    pub fn with_conjunction(mut self, conjunction: Option<Conjunction>) -> Self {
        self.conjunction = conjunction;
        self
    }

    pub fn is_group(&self) -> bool {
        !self.sub_list.is_empty()
    }

    /// The scalar operand, if this node carries exactly one value
    pub fn scalar(&self) -> Option<&SqlValue> {
        match &self.value {
            Some(Operand::Value(v)) => Some(v),
            _ => None,
        }
    }
}
