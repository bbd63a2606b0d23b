//! Plain (non result-mapped) reads: WHERE composition, COUNT, ORDER BY

use super::*;
use crate::criteria::{Criteria, Direction, Operand, Predicate, PredicateNode, SqlValue};
use crate::sql_generator::CompileError;

#[test]
fn test_order_status_scenario() {
    let criteria = Criteria::new("Order").and(PredicateNode::eq("status", "PAID"));

    let parsed = compiler().compile(&criteria).unwrap();

    assert_eq!(parsed.select_sql, "SELECT * FROM t_order WHERE status = ?");
    assert_eq!(
        parsed.count_sql.as_deref(),
        Some("SELECT COUNT(*) count FROM t_order WHERE status = ?")
    );
    assert_eq!(parsed.values, vec![SqlValue::Text("PAID".into())]);
}

#[test]
fn test_count_suppressed_when_total_rows_ignored() {
    let criteria = Criteria::new("Order")
        .and(PredicateNode::eq("status", "PAID"))
        .total_rows_ignored(true);

    let parsed = compiler().compile(&criteria).unwrap();
    assert_eq!(parsed.count_sql, None);
}

#[test]
fn test_single_where_even_when_first_node_is_or() {
    let criteria = Criteria::new("Order")
        .or(PredicateNode::eq("status", "PAID"))
        .or(PredicateNode::gt("amount", 10.5))
        .and(PredicateNode::lt("userId", 3));

    let sql = compiler().compile(&criteria).unwrap().select_sql;

    assert_eq!(
        sql,
        "SELECT * FROM t_order WHERE status = ? OR amount > ? AND user_id < ?"
    );
    assert_eq!(sql.matches("WHERE").count(), 1);
    assert!(!sql.contains("WHERE AND") && !sql.contains("WHERE OR"));
}

#[test]
fn test_absent_values_contribute_nothing() {
    let criteria = Criteria::new("Order")
        .and(PredicateNode::eq("status", SqlValue::Null))
        .and(PredicateNode::new("amount", Predicate::Gt, None))
        .or(PredicateNode::eq("userId", 7));

    let parsed = compiler().compile(&criteria).unwrap();

    assert_eq!(parsed.select_sql, "SELECT * FROM t_order WHERE user_id = ?");
    assert_eq!(parsed.values, vec![SqlValue::Int(7)]);
}

#[test]
fn test_no_conditions_means_no_where() {
    let parsed = compiler().compile(&Criteria::new("Order")).unwrap();
    assert_eq!(parsed.select_sql, "SELECT * FROM t_order");
    assert!(parsed.values.is_empty());
}

#[test]
fn test_nested_groups_are_parenthesized() {
    let criteria = Criteria::new("Order")
        .and(PredicateNode::eq("status", "PAID"))
        .and(PredicateNode::group(vec![
            PredicateNode::gt("amount", 100).or(),
            PredicateNode::group(vec![
                PredicateNode::eq("userId", 1),
                PredicateNode::eq("userId", 2).or(),
            ])
            .or(),
        ]));

    let parsed = compiler().compile(&criteria).unwrap();

    assert_eq!(
        parsed.select_sql,
        "SELECT * FROM t_order WHERE status = ? AND (amount > ? OR (user_id = ? OR user_id = ?))"
    );
    assert_eq!(parsed.values.len(), 4);
    let sql = &parsed.select_sql;
    assert_eq!(sql.matches('(').count(), sql.matches(')').count());
    assert!(!sql.contains("( OR") && !sql.contains("(OR") && !sql.contains("(AND"));
}

#[test]
fn test_group_as_first_predicate_takes_where() {
    let criteria = Criteria::new("Order").or(PredicateNode::group(vec![
        PredicateNode::eq("status", "A").or(),
        PredicateNode::eq("status", "B").or(),
    ]));

    let sql = compiler().compile(&criteria).unwrap().select_sql;
    assert_eq!(sql, "SELECT * FROM t_order WHERE (status = ? OR status = ?)");
}

#[test]
fn test_between_binds_min_then_max() {
    let criteria = Criteria::new("Order").and(PredicateNode::between("amount", 10, 20));

    let parsed = compiler().compile(&criteria).unwrap();

    assert_eq!(
        parsed.select_sql,
        "SELECT * FROM t_order WHERE amount BETWEEN ? AND ?"
    );
    assert_eq!(parsed.values, vec![SqlValue::Int(10), SqlValue::Int(20)]);
}

#[test]
fn test_in_lists_null_checks_and_raw_scripts() {
    let criteria = Criteria::new("Order")
        .and(PredicateNode::in_list("userId", vec![1, 2, 3]))
        .and(PredicateNode::not_in("status", vec!["CANCELLED", "REFUNDED"]))
        .and(PredicateNode::is_not_null("createdAt"))
        .and(PredicateNode::raw("amount > ? * 2", vec![50]));

    let parsed = compiler().compile(&criteria).unwrap();

    assert_eq!(
        parsed.select_sql,
        "SELECT * FROM t_order WHERE user_id IN (1, 2, 3) AND status NOT IN (?, ?) AND created_at IS NOT NULL AND amount > ? * 2"
    );
    assert_eq!(
        parsed.values,
        vec![
            SqlValue::Text("CANCELLED".into()),
            SqlValue::Text("REFUNDED".into()),
            SqlValue::Int(50)
        ]
    );
}

#[test]
fn test_raw_literal_operand_is_inlined() {
    let criteria = Criteria::new("Order").and(PredicateNode::lt("createdAt", "#NOW()#"));

    let parsed = compiler().compile(&criteria).unwrap();

    assert_eq!(parsed.select_sql, "SELECT * FROM t_order WHERE created_at < NOW()");
    assert!(parsed.values.is_empty());
}

#[test]
fn test_enum_values_bind_by_name() {
    let criteria = Criteria::new("Order").and(PredicateNode::eq("status", SqlValue::enum_name("PAID")));

    let parsed = compiler().compile(&criteria).unwrap();
    assert_eq!(parsed.values, vec![SqlValue::Text("PAID".into())]);
}

#[test]
fn test_plain_reads_do_not_prune_defaults() {
    let criteria = Criteria::new("Order").and(PredicateNode::eq("userId", 0));

    let parsed = compiler().compile(&criteria).unwrap();
    assert_eq!(parsed.select_sql, "SELECT * FROM t_order WHERE user_id = ?");
    assert_eq!(parsed.values, vec![SqlValue::Int(0)]);
}

#[test]
fn test_order_by_defaults_to_desc() {
    let mut criteria = Criteria::new("Order").sort("createdAt", Direction::Asc);
    criteria.sorts.push(crate::criteria::Sort::new("id", None));

    let parsed = compiler().compile(&criteria).unwrap();

    assert_eq!(
        parsed.select_sql,
        "SELECT * FROM t_order ORDER BY created_at ASC, id DESC"
    );
    assert_eq!(parsed.count_sql.as_deref(), Some("SELECT COUNT(*) count FROM t_order"));
}

#[test]
fn test_fixed_sort_skips_order_by() {
    let criteria = Criteria::new("Order")
        .sort("createdAt", Direction::Asc)
        .fixed_sort();

    let parsed = compiler().compile(&criteria).unwrap();
    assert_eq!(parsed.select_sql, "SELECT * FROM t_order");
}

#[test]
fn test_force_index_per_dialect() {
    let criteria = Criteria::new("Order")
        .force_index("idx_status")
        .and(PredicateNode::eq("status", "PAID"));

    let mysql = compiler().compile(&criteria).unwrap();
    assert_eq!(
        mysql.select_sql,
        "SELECT * FROM t_order FORCE INDEX(idx_status) WHERE status = ?"
    );

    let clickhouse = clickhouse_compiler().compile(&criteria).unwrap();
    assert_eq!(clickhouse.select_sql, "SELECT * FROM t_order WHERE status = ?");
}

#[test]
fn test_source_script_with_from_keyword() {
    let criteria = Criteria::new("Order").source_script("FROM order");

    let parsed = compiler().compile(&criteria).unwrap();
    assert_eq!(parsed.select_sql, "SELECT * FROM t_order");
}

#[test]
fn test_compiling_twice_is_identical() {
    let criteria = Criteria::new("Order")
        .and(PredicateNode::eq("status", "PAID"))
        .and(PredicateNode::between("amount", 1, 2))
        .and(PredicateNode::group(vec![
            PredicateNode::eq("userId", 5),
            PredicateNode::in_list("status", vec!["A"]).or(),
        ]));
    let before = criteria.clone();
    let compiler = compiler();

    let first = compiler.compile(&criteria).unwrap();
    let second = compiler.compile(&criteria).unwrap();

    assert_eq!(first, second);
    assert_eq!(criteria, before);
}

#[test]
fn test_unknown_entity_fails() {
    let err = compiler().compile(&Criteria::new("invoice")).unwrap_err();
    assert_eq!(
        err,
        CompileError::UnresolvedEntity {
            entity: "Invoice".to_string()
        }
    );
}

#[test]
fn test_malformed_operands_are_syntax_errors() {
    let criteria = Criteria::new("Order").and(PredicateNode::new(
        "amount",
        Predicate::Gt,
        Some(Operand::List(vec![1.into(), 2.into()])),
    ));
    assert!(matches!(
        compiler().compile(&criteria),
        Err(CompileError::CriteriaSyntax(_))
    ));

    let criteria = Criteria::new("Order").and(PredicateNode::in_list::<SqlValue>("status", vec![]));
    assert!(matches!(
        compiler().compile(&criteria),
        Err(CompileError::CriteriaSyntax(_))
    ));
}

#[test]
fn test_compile_condition_keeps_leading_conjunction() {
    let (sql, values) = compiler()
        .compile_condition(
            "Order",
            &[
                PredicateNode::eq("status", "PAID"),
                PredicateNode::gte("amount", 5).or(),
            ],
        )
        .unwrap();

    assert_eq!(sql, "AND status = ? OR amount >= ?");
    assert_eq!(values, vec![SqlValue::Text("PAID".into()), SqlValue::Int(5)]);
}
