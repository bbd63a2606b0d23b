//! Default-value pruning
//!
//! A comparison against the default of its column's declared type (0, "",
//! false, epoch) is treated as "filter not set" and removed before rendering.
//! Works on a copy; the caller's predicate list is never touched.

use log::debug;

use crate::criteria::{Operand, PredicateNode, SqlValue};

use super::identifier::IdentifierResolver;

fn single_candidate(node: &PredicateNode) -> Option<&SqlValue> {
    match &node.value {
        Some(Operand::Value(value)) => Some(value),
        Some(Operand::List(values)) if values.len() == 1 => values.first(),
        _ => None,
    }
}

fn holds_default(node: &PredicateNode, resolver: &IdentifierResolver<'_>) -> bool {
    let candidate = if node.predicate.is_comparison() {
        node.scalar()
    } else if node.predicate.is_membership() {
        single_candidate(node)
    } else {
        None
    };

    let Some(value) = candidate else {
        return false;
    };
    // Absent operands are skipped by the renderer, not pruned here
    if value.is_null() {
        return false;
    }

    resolver
        .property_owner(&node.key)
        .is_some_and(|(schema, property)| schema.is_default_value(property, value))
}

/// Copy of `nodes` without predicates on default values, recursing into groups.
/// Groups left without children are dropped.
pub fn prune_default_predicates(
    nodes: &[PredicateNode],
    resolver: &IdentifierResolver<'_>,
) -> Vec<PredicateNode> {
    let mut kept = Vec::with_capacity(nodes.len());

    for node in nodes {
        if node.is_group() {
            let children = prune_default_predicates(&node.sub_list, resolver);
            if children.is_empty() {
                debug!("dropping group whose predicates all hold default values");
                continue;
            }
            let mut group = node.clone();
            group.sub_list = children;
            kept.push(group);
        } else if holds_default(node, resolver) {
            debug!(
                "pruning {} {} on default value",
                node.key,
                node.predicate.sql()
            );
        } else {
            kept.push(node.clone());
        }
    }

    kept
}
