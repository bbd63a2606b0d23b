//! In-memory query and refresh criteria
//!
//! A [`Criteria`] describes one read against a logical entity: predicates,
//! sorts, and (for result-mapped reads) an explicit projection with distinct
//! columns, aggregates and grouping. A [`RefreshCondition`] describes an UPDATE.
//!
//! Both are plain data. Compilation never mutates them, so one instance can be
//! compiled any number of times, from any number of threads.

pub mod predicate;
pub mod refresh;
pub mod value;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use predicate::{Conjunction, Operand, Predicate, PredicateNode, SUB_KEY};
pub use refresh::RefreshCondition;
pub use value::SqlValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Asc,
    Desc,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Asc => f.write_str("ASC"),
            Direction::Desc => f.write_str("DESC"),
        }
    }
}

/// ORDER BY directive; an unset direction sorts descending
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sort {
    pub order_by: String,
    #[serde(default)]
    pub direction: Option<Direction>,
}

impl Sort {
    pub fn new(order_by: impl Into<String>, direction: Option<Direction>) -> Self {
        Self {
            order_by: order_by.into(),
            direction,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction.unwrap_or(Direction::Desc)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReduceType {
    Count,
    CountDistinct,
    Sum,
    SumDistinct,
    Avg,
    Max,
    Min,
    GroupConcat,
    GroupConcatDistinct,
}

impl ReduceType {
    /// SQL aggregate function name
    pub fn function(&self) -> &'static str {
        match self {
            ReduceType::Count | ReduceType::CountDistinct => "COUNT",
            ReduceType::Sum | ReduceType::SumDistinct => "SUM",
            ReduceType::Avg => "AVG",
            ReduceType::Max => "MAX",
            ReduceType::Min => "MIN",
            ReduceType::GroupConcat | ReduceType::GroupConcatDistinct => "GROUP_CONCAT",
        }
    }

    pub fn is_distinct(&self) -> bool {
        matches!(
            self,
            ReduceType::CountDistinct | ReduceType::SumDistinct | ReduceType::GroupConcatDistinct
        )
    }

    /// Suffix of the generated alias: `amount` + `sum` → `amount_sum`
    pub fn alias_suffix(&self) -> &'static str {
        match self {
            ReduceType::Count => "count",
            ReduceType::CountDistinct => "count_distinct",
            ReduceType::Sum => "sum",
            ReduceType::SumDistinct => "sum_distinct",
            ReduceType::Avg => "avg",
            ReduceType::Max => "max",
            ReduceType::Min => "min",
            ReduceType::GroupConcat => "group_concat",
            ReduceType::GroupConcatDistinct => "group_concat_distinct",
        }
    }
}

/// Aggregate projection, optionally filtered by a HAVING predicate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reduce {
    pub property: String,
    #[serde(rename = "type")]
    pub reduce_type: ReduceType,
    #[serde(default)]
    pub having: Option<PredicateNode>,
}

impl Reduce {
    pub fn new(reduce_type: ReduceType, property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            reduce_type,
            having: None,
        }
    }

    /// Attach a HAVING filter. The key is replaced by the generated alias at
    /// compile time, so only predicate, operand and conjunction matter.
    pub fn having(mut self, having: PredicateNode) -> Self {
        self.having = Some(having);
        self
    }
}

/// Explicit projection of a result-mapped read
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResultMapped {
    pub result_keys: Vec<String>,
    pub distinct: Vec<String>,
    pub reduces: Vec<Reduce>,
}

impl ResultMapped {
    pub fn is_empty(&self) -> bool {
        self.result_keys.is_empty() && self.distinct.is_empty() && self.reduces.is_empty()
    }
}

/// A read query against one logical entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criteria {
    pub entity: String,
    /// FROM script with optional aliases and joins; defaults to the entity
    #[serde(default)]
    pub source_script: Option<String>,
    #[serde(default)]
    pub conditions: Vec<PredicateNode>,
    #[serde(default)]
    pub sorts: Vec<Sort>,
    /// Comma-separated GROUP BY keys (result-mapped reads only)
    #[serde(default)]
    pub group_by: Option<String>,
    #[serde(default)]
    pub force_index: Option<String>,
    /// Suppresses the COUNT statement
    #[serde(default)]
    pub total_rows_ignored: bool,
    /// The source script carries its own ordering; skip ORDER BY
    #[serde(default)]
    pub fixed_sort: bool,
    #[serde(default)]
    pub result_mapped: Option<ResultMapped>,
}

impl Criteria {
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            source_script: None,
            conditions: Vec::new(),
            sorts: Vec::new(),
            group_by: None,
            force_index: None,
            total_rows_ignored: false,
            fixed_sort: false,
            result_mapped: None,
        }
    }

    /// A result-mapped read with an explicit projection
    pub fn result_mapped(entity: impl Into<String>) -> Self {
        Self {
            result_mapped: Some(ResultMapped::default()),
            ..Self::new(entity)
        }
    }

    pub fn is_result_mapped(&self) -> bool {
        self.result_mapped.is_some()
    }

    pub fn source_script(mut self, script: impl Into<String>) -> Self {
        self.source_script = Some(script.into());
        self
    }

    /// Append a predicate as-is (its own conjunction applies)
    pub fn filter(mut self, node: PredicateNode) -> Self {
        self.conditions.push(node);
        self
    }

    pub fn and(self, node: PredicateNode) -> Self {
        self.filter(node.with_conjunction(Some(Conjunction::And)))
    }

    pub fn or(self, node: PredicateNode) -> Self {
        self.filter(node.or())
    }

    pub fn sort(mut self, order_by: impl Into<String>, direction: Direction) -> Self {
        self.sorts.push(Sort::new(order_by, Some(direction)));
        self
    }

    pub fn group_by(mut self, keys: impl Into<String>) -> Self {
        self.group_by = Some(keys.into());
        self
    }

    pub fn force_index(mut self, index: impl Into<String>) -> Self {
        self.force_index = Some(index.into());
        self
    }

    pub fn total_rows_ignored(mut self, ignored: bool) -> Self {
        self.total_rows_ignored = ignored;
        self
    }

    pub fn fixed_sort(mut self) -> Self {
        self.fixed_sort = true;
        self
    }

    fn projection_mut(&mut self) -> &mut ResultMapped {
        self.result_mapped.get_or_insert_with(ResultMapped::default)
    }

    /// Add a projected key; turns the criteria into a result-mapped one
    pub fn result_key(mut self, key: impl Into<String>) -> Self {
        self.projection_mut().result_keys.push(key.into());
        self
    }

    pub fn distinct<S: Into<String>>(mut self, keys: Vec<S>) -> Self {
        self.projection_mut()
            .distinct
            .extend(keys.into_iter().map(Into::into));
        self
    }

    pub fn reduce(mut self, reduce: Reduce) -> Self {
        self.projection_mut().reduces.push(reduce);
        self
    }
}
