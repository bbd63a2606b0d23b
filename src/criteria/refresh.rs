use serde::{Deserialize, Serialize};

use super::predicate::{Conjunction, Predicate, PredicateNode};
use super::value::SqlValue;

/// An UPDATE: SET assignments plus a WHERE filter over one entity.
///
/// Assignment entries come in three shapes:
/// - `property = value` pairs, skipped when the value is empty or the
///   column's default
/// - keys containing a `?` (`"version = version + ?"`), inlined with their value bound
/// - raw scripts (`"count = count + 1"`), inlined verbatim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshCondition {
    pub entity: String,
    #[serde(default)]
    pub refresh_list: Vec<PredicateNode>,
    #[serde(default)]
    pub conditions: Vec<PredicateNode>,
}

impl RefreshCondition {
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            refresh_list: Vec::new(),
            conditions: Vec::new(),
        }
    }

    /// `property = ?`, or an inlined placeholder script when `key` contains `?`
    pub fn refresh(mut self, key: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.refresh_list.push(PredicateNode::eq(key, value));
        self
    }

    /// Raw assignment, inlined after identifier resolution
    pub fn refresh_raw(mut self, script: impl Into<String>) -> Self {
        self.refresh_list
            .push(PredicateNode::new(script, Predicate::X, None));
        self
    }

    pub fn and(mut self, node: PredicateNode) -> Self {
        self.conditions
            .push(node.with_conjunction(Some(Conjunction::And)));
        self
    }

    pub fn or(mut self, node: PredicateNode) -> Self {
        self.conditions.push(node.or());
        self
    }
}
