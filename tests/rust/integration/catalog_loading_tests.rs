/// Integration test for catalog loading from YAML files
///
/// Validates that a catalog written to disk loads into a registry the
/// compiler can resolve entities against, and that bad files fail cleanly.
use criteria_sql::schema_catalog::{load_catalog, SchemaCatalogError, SchemaType};
use criteria_sql::{CompileError, CompilerConfig, CriteriaCompiler};
use std::io::Write;
use tempfile::NamedTempFile;

pub const SHOP_CATALOG: &str = r#"
name: shop
entities:
  - name: Order
    table: t_order
    properties:
      id: { type: integer }
      userId: { column: user_id, type: integer }
      status: { type: string }
      amount: { type: float }
      createdAt: { column: created_at, type: datetime }
  - name: OrderItem
    table: t_order_item
    properties:
      orderId: { column: order_id, type: integer }
      sku: { type: string }
  - name: User
    table: t_user
    properties:
      id: { type: integer }
      name: { type: string }
      age: { type: integer }
      profile: { column: profile_json, type: json }
      birthday: { type: date }
"#;

pub fn write_catalog(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write catalog");
    file
}

#[test]
fn test_load_catalog_from_file() {
    let file = write_catalog(SHOP_CATALOG);

    let catalog = load_catalog(file.path()).expect("Failed to load catalog");

    assert_eq!(catalog.len(), 3);
    let order = catalog.lookup("Order").expect("Order must be registered");
    assert_eq!(order.table_name, "t_order");
    assert_eq!(order.column("userId"), Some("user_id"));
    assert_eq!(order.column("status"), Some("status"));

    let user = catalog.lookup("user").expect("lookup by script name");
    let profile = user.property("profile").unwrap();
    assert!(profile.json);
    assert_eq!(profile.schema_type, SchemaType::Json);
}

#[test]
fn test_missing_file_is_read_error() {
    let err = load_catalog("/nonexistent/catalog.yaml").unwrap_err();
    assert!(matches!(err, SchemaCatalogError::ConfigReadError { .. }));
}

#[test]
fn test_duplicate_entity_is_rejected() {
    let file = write_catalog(
        r#"
entities:
  - { name: Order, table: t_order, properties: {} }
  - { name: order, table: t_order_2, properties: {} }
"#,
    );

    let err = load_catalog(file.path()).unwrap_err();
    assert!(matches!(err, SchemaCatalogError::DuplicateEntity { .. }));
}

#[test]
fn test_malformed_yaml_is_parse_error() {
    let file = write_catalog("entities: [ {name: Order");

    let err = load_catalog(file.path()).unwrap_err();
    assert!(matches!(err, SchemaCatalogError::ConfigParseError { .. }));
}

#[test]
fn test_compiler_from_catalog_file() {
    let file = write_catalog(SHOP_CATALOG);

    let compiler = CriteriaCompiler::from_catalog_file(file.path(), &CompilerConfig::default())
        .expect("Failed to build compiler");
    assert_eq!(compiler.catalog().len(), 3);

    let err = CriteriaCompiler::from_catalog_file("/nonexistent/catalog.yaml", &CompilerConfig::default())
        .unwrap_err();
    assert!(matches!(
        err,
        CompileError::Catalog(SchemaCatalogError::ConfigReadError { .. })
    ));
}
