/// Integration test for end-to-end compilation of YAML-described criteria
///
/// Mirrors what the `criteria-sql` binary does: load the catalog from disk,
/// deserialize criteria/refresh documents, compile with a configured dialect.
use super::catalog_loading_tests::{write_catalog, SHOP_CATALOG};
use chrono::NaiveDate;
use criteria_sql::config::CompilerConfig;
use criteria_sql::criteria::{Criteria, RefreshCondition, SqlValue};
use criteria_sql::schema_catalog::load_catalog;
use criteria_sql::sql_generator::{CompileError, CriteriaCompiler, SqlDialect};
use std::sync::Arc;

fn compiler(dialect: SqlDialect) -> CriteriaCompiler {
    let file = write_catalog(SHOP_CATALOG);
    let catalog = load_catalog(file.path()).expect("Failed to load catalog");
    let config = CompilerConfig {
        dialect,
        ..Default::default()
    };
    CriteriaCompiler::new(Arc::new(catalog), &config)
}

#[test]
fn test_result_mapped_criteria_from_yaml() {
    let criteria: Criteria = serde_yaml::from_str(
        r#"
entity: Order
source_script: "FROM order o INNER JOIN orderItem i ON i.orderId = o.id"
group_by: o.userId
total_rows_ignored: true
result_mapped:
  result_keys: [o.userId]
  reduces:
    - property: o.amount
      type: SUM
      having: { key: o.amount, predicate: GTE, value: 10 }
conditions:
  - { key: o.status, predicate: IN, value: [PAID, SHIPPED] }
  - { key: o.userId, predicate: EQ, value: 0 }
  - key: SUB
    predicate: SUB
    sub:
      - { key: i.sku, predicate: LIKE, value: "A%" }
      - { key: o.createdAt, predicate: BETWEEN, value: { min: "2024-01-01", max: "2024-12-31" }, conjunction: OR }
sorts:
  - { order_by: o.userId, direction: ASC }
"#,
    )
    .expect("Failed to parse criteria");

    let parsed = compiler(SqlDialect::MySql)
        .compile(&criteria)
        .expect("Failed to compile criteria");

    assert_eq!(
        parsed.select_sql,
        "SELECT SUM(o.amount) AS o$amount_sum, o.user_id AS c1 \
         FROM t_order o INNER JOIN t_order_item i ON i.order_id = o.id \
         WHERE o.status IN (?, ?) AND (i.sku LIKE ? OR o.created_at BETWEEN ? AND ?) \
         GROUP BY o.user_id HAVING o$amount_sum >= 10 ORDER BY o.user_id ASC"
    );
    assert_eq!(parsed.count_sql, None);
    assert_eq!(
        parsed.values,
        vec![
            SqlValue::Text("PAID".into()),
            SqlValue::Text("SHIPPED".into()),
            SqlValue::Text("A%".into()),
            SqlValue::Date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()),
            SqlValue::Date(NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()),
        ]
    );
    assert_eq!(parsed.result_mapping.property_for_label("c1"), "o.userId");
}

#[test]
fn test_refresh_from_yaml() {
    let refresh: RefreshCondition = serde_yaml::from_str(
        r#"
entity: User
refresh_list:
  - { key: name, predicate: EQ, value: Bob }
  - { key: age, predicate: EQ, value: 0 }
  - { key: profile, predicate: EQ, value: { vip: true } }
  - { key: "age = age + 1", predicate: X }
conditions:
  - { key: id, predicate: EQ, value: 7 }
"#,
    )
    .expect("Failed to parse refresh");

    let parsed = compiler(SqlDialect::ClickHouse)
        .compile_refresh(&refresh)
        .expect("Failed to compile refresh");

    assert_eq!(
        parsed.sql,
        "UPDATE t_user SET name = ?, profile_json = ?, age = age + 1 WHERE id = ?"
    );
    assert_eq!(
        parsed.values,
        vec![
            SqlValue::Text("Bob".into()),
            SqlValue::Text(r#"{"vip":true}"#.into()),
            SqlValue::Int(7),
        ]
    );
}

#[test]
fn test_errors_surface_through_public_api() {
    let criteria: Criteria = serde_yaml::from_str(
        r#"
entity: Order
result_mapped:
  reduces:
    - { property: amount, type: SUM, having: { predicate: GT, value: 100 } }
"#,
    )
    .expect("Failed to parse criteria");

    let err = compiler(SqlDialect::MySql).compile(&criteria).unwrap_err();
    assert!(matches!(err, CompileError::CriteriaSyntax(_)));
    assert!(err.to_string().contains("HAVING"));
}

#[test]
fn test_parsed_output_serializes_for_cli() {
    let criteria: Criteria = serde_yaml::from_str(
        r#"
entity: Order
conditions:
  - { key: status, predicate: EQ, value: PAID }
"#,
    )
    .expect("Failed to parse criteria");

    let parsed = compiler(SqlDialect::MySql).compile(&criteria).unwrap();
    let json = serde_json::to_value(&parsed).unwrap();

    assert_eq!(json["select_sql"], "SELECT * FROM t_order WHERE status = ?");
    assert_eq!(
        json["count_sql"],
        "SELECT COUNT(*) count FROM t_order WHERE status = ?"
    );
    assert_eq!(json["values"], serde_json::json!(["PAID"]));
    assert!(json.get("result_mapping").is_none());
}

#[test]
fn test_refresh_from_yaml_with_null_and_json_list() {
    let refresh: RefreshCondition = serde_yaml::from_str(
        r#"
entity: User
refresh_list:
  - { key: name, predicate: EQ, value: Bob }
  - { key: birthday, predicate: EQ, value: null }
  - { key: profile, predicate: EQ, value: [a, b] }
conditions:
  - { key: id, predicate: EQ, value: 7 }
"#,
    )
    .expect("Failed to parse refresh");

    let parsed = compiler(SqlDialect::MySql)
        .compile_refresh(&refresh)
        .expect("Failed to compile refresh");

    assert_eq!(
        parsed.sql,
        "UPDATE t_user SET name = ?, profile_json = ? WHERE id = ?"
    );
    assert_eq!(
        parsed.values,
        vec![
            SqlValue::Text("Bob".into()),
            SqlValue::Text(r#"["a","b"]"#.into()),
            SqlValue::Int(7),
        ]
    );
}

#[test]
fn test_epoch_datetime_from_yaml_is_pruned() {
    let criteria: Criteria = serde_yaml::from_str(
        r#"
entity: Order
result_mapped:
  result_keys: [id]
conditions:
  - { key: createdAt, predicate: EQ, value: "1970-01-01T00:00:00" }
  - { key: status, predicate: EQ, value: PAID }
"#,
    )
    .expect("Failed to parse criteria");

    let parsed = compiler(SqlDialect::MySql)
        .compile(&criteria)
        .expect("Failed to compile criteria");

    assert_eq!(parsed.select_sql, "SELECT id FROM t_order WHERE status = ?");
    assert_eq!(parsed.values, vec![SqlValue::Text("PAID".into())]);
}
