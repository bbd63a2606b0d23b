use thiserror::Error;

use crate::schema_catalog::SchemaCatalogError;
use crate::utils::upper_first;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CompileError {
    #[error("Entity metadata not found: {entity}")]
    UnresolvedEntity { entity: String },

    #[error("Property `{property}` of `{entity}` has no column mapping")]
    UnresolvedPropertyMapper { entity: String, property: String },

    #[error("Criteria syntax error: {0}")]
    CriteriaSyntax(String),

    #[error("Statement build error ({reason}): {sql}")]
    StatementBuild { reason: String, sql: String },

    #[error("Catalog error: {0}")]
    Catalog(#[from] SchemaCatalogError),
}

impl CompileError {
    /// Entities are reported by their declared (upper-first) name
    pub fn unresolved_entity(name: &str) -> Self {
        CompileError::UnresolvedEntity {
            entity: upper_first(name),
        }
    }

    pub fn syntax(message: impl Into<String>) -> Self {
        CompileError::CriteriaSyntax(message.into())
    }
}
