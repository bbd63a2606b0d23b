//! criteria-sql - structured criteria to parameterized SQL
//!
//! This crate compiles in-memory query descriptions into SQL text plus an
//! ordered list of bind values:
//! - Entity catalog mapping logical entities/properties to tables/columns
//! - Criteria data model (predicate trees, projections, sorts, refreshes)
//! - SELECT/COUNT and UPDATE compilation for MySQL and ClickHouse

pub mod utils;

pub mod config;
pub mod criteria;
pub mod schema_catalog;
pub mod sql_generator;

pub use config::CompilerConfig;
pub use criteria::{Criteria, PredicateNode, RefreshCondition, SqlValue};
pub use schema_catalog::{load_catalog, SchemaCatalog};
pub use sql_generator::{CompileError, CriteriaCompiler, RefreshParsed, SqlParsed};
