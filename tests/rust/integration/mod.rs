//! Integration tests - catalog YAML on disk through to compiled SQL
//!
//! These tests exercise the public API only: load a catalog file, deserialize
//! criteria the way the CLI does, and compile them.

mod catalog_loading_tests;
mod criteria_yaml_tests;
