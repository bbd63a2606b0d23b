//! # Schema Catalog Error Types
//!
//! Errors raised while building the entity catalog from definitions or YAML.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SchemaCatalogError {
    #[error("Entity `{entity}` is registered more than once")]
    DuplicateEntity { entity: String },
    #[error("Entity `{entity}` maps property `{property}` to an empty column")]
    EmptyColumn { entity: String, property: String },
    #[error("Failed to read catalog file: {error}")]
    ConfigReadError { error: String },
    #[error("Failed to parse catalog: {error}")]
    ConfigParseError { error: String },
    #[error("Invalid catalog: {message}")]
    InvalidConfig { message: String },
}
