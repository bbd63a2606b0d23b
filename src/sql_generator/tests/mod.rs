//! Scenario tests for the compiler, run against a small order/user catalog

mod read_path_tests;

use std::sync::Arc;

use crate::config::CompilerConfig;
use crate::schema_catalog::{EntitySchema, PropertySchema, SchemaCatalog, SchemaType};
use crate::sql_generator::dialect::SqlDialect;
use crate::sql_generator::CriteriaCompiler;

pub(super) fn setup_test_catalog() -> SchemaCatalog {
    let mut catalog = SchemaCatalog::new();
    catalog
        .register(
            EntitySchema::new("Order", "t_order")
                .with_property("id", PropertySchema::new("id", SchemaType::Integer))
                .with_property("userId", PropertySchema::new("user_id", SchemaType::Integer))
                .with_property("status", PropertySchema::new("status", SchemaType::String))
                .with_property("amount", PropertySchema::new("amount", SchemaType::Float))
                .with_property("createdAt", PropertySchema::new("created_at", SchemaType::DateTime)),
        )
        .unwrap();
    catalog
        .register(
            EntitySchema::new("OrderItem", "t_order_item")
                .with_property("id", PropertySchema::new("id", SchemaType::Integer))
                .with_property("orderId", PropertySchema::new("order_id", SchemaType::Integer))
                .with_property("sku", PropertySchema::new("sku", SchemaType::String))
                .with_property("quantity", PropertySchema::new("qty", SchemaType::Integer)),
        )
        .unwrap();
    catalog
        .register(
            EntitySchema::new("User", "t_user")
                .with_property("id", PropertySchema::new("id", SchemaType::Integer))
                .with_property("name", PropertySchema::new("name", SchemaType::String))
                .with_property("age", PropertySchema::new("age", SchemaType::Integer))
                .with_property("version", PropertySchema::new("version", SchemaType::Integer))
                .with_property("birthday", PropertySchema::new("birthday", SchemaType::Date))
                .with_property(
                    "nickname",
                    PropertySchema::new("nick_name", SchemaType::String).nullable(),
                )
                .with_property("tags", PropertySchema::new("tags", SchemaType::Json).json()),
        )
        .unwrap();
    catalog
}

pub(super) fn compiler() -> CriteriaCompiler {
    CriteriaCompiler::new(Arc::new(setup_test_catalog()), &CompilerConfig::default())
}

pub(super) fn clickhouse_compiler() -> CriteriaCompiler {
    let config = CompilerConfig {
        dialect: SqlDialect::ClickHouse,
        ..Default::default()
    };
    CriteriaCompiler::new(Arc::new(setup_test_catalog()), &config)
}
