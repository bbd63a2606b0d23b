//! Criteria → parameterized SQL
//!
//! [`CriteriaCompiler`] is the entry point. It owns nothing mutable: the
//! catalog and dialect are shared read-only, and every compilation builds its
//! own bind-value accumulator, so one compiler (and one criteria) can be used
//! from any number of threads.
//!
//! ```ignore
//! let compiler = CriteriaCompiler::new(catalog, &CompilerConfig::default());
//! let parsed = compiler.compile(&Criteria::new("Order").and(PredicateNode::eq("status", "PAID")))?;
//! // parsed.select_sql == "SELECT * FROM t_order WHERE status = ?"
//! ```

use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

use crate::config::CompilerConfig;
use crate::criteria::{Criteria, PredicateNode, RefreshCondition, SqlValue};
use crate::schema_catalog::{load_catalog, SchemaCatalog};

mod bind_values;
mod clause_assembler;
pub mod dialect;
mod errors;
mod filter;
mod identifier;
mod literal;
mod predicate_compiler;
mod projection;
mod refresh_compiler;
mod result_mapping;
mod source_script;

#[cfg(test)]
mod tests;

pub use bind_values::BindValues;
pub use dialect::{ClickHouseDialect, Dialect, MySqlDialect, SqlDialect};
pub use errors::CompileError;
pub use identifier::IdentifierResolver;
pub use literal::LiteralStyle;
pub use predicate_compiler::{PredicateCompiler, RenderPosition};
pub use result_mapping::ResultMapping;

use clause_assembler::ClauseAssembler;
use refresh_compiler::RefreshCompiler;

/// Output of a read compilation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SqlParsed {
    pub select_sql: String,
    /// Present unless the criteria ignores total rows
    pub count_sql: Option<String>,
    /// Bind values, in placeholder order; shared by select and count
    pub values: Vec<SqlValue>,
    #[serde(skip_serializing_if = "is_plain_mapping")]
    pub result_mapping: ResultMapping,
}

fn is_plain_mapping(mapping: &ResultMapping) -> bool {
    *mapping == ResultMapping::default()
}

/// Output of a refresh compilation: SET values first, then WHERE values
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RefreshParsed {
    pub sql: String,
    pub values: Vec<SqlValue>,
}

#[derive(Debug, Clone)]
pub struct CriteriaCompiler {
    catalog: Arc<SchemaCatalog>,
    dialect: Arc<dyn Dialect>,
    config: CompilerConfig,
}

impl CriteriaCompiler {
    /// Compiler for the dialect named in `config`
    pub fn new(catalog: Arc<SchemaCatalog>, config: &CompilerConfig) -> Self {
        Self {
            catalog,
            dialect: config.dialect.build(&config.result_alias_prefix),
            config: config.clone(),
        }
    }

    /// Compiler over a catalog loaded from a YAML file
    pub fn from_catalog_file<P: AsRef<Path>>(
        path: P,
        config: &CompilerConfig,
    ) -> Result<Self, CompileError> {
        let catalog = load_catalog(path)?;
        Ok(Self::new(Arc::new(catalog), config))
    }

    pub fn catalog(&self) -> &SchemaCatalog {
        &self.catalog
    }

    /// Compile a read into SELECT (and COUNT) SQL
    pub fn compile(&self, criteria: &Criteria) -> Result<SqlParsed, CompileError> {
        ClauseAssembler::new(&self.catalog, self.dialect.as_ref(), &self.config).assemble(criteria)
    }

    /// Compile bare conditions against `entity`. Every conjunction is kept,
    /// including the first one: `AND status = ? OR amount > ?`.
    pub fn compile_condition(
        &self,
        entity: &str,
        conditions: &[PredicateNode],
    ) -> Result<(String, Vec<SqlValue>), CompileError> {
        let schema = self
            .catalog
            .lookup(entity)
            .ok_or_else(|| CompileError::unresolved_entity(entity))?;
        let aliases = Default::default();
        let resolver = IdentifierResolver::new(&self.catalog, schema, &aliases);

        let mut binds = BindValues::new();
        let sql = PredicateCompiler::new(&resolver, self.dialect.as_ref()).render(
            conditions,
            RenderPosition::Fragment,
            &mut binds,
        )?;
        Ok((sql, binds.into_vec()))
    }

    /// Compile an UPDATE
    pub fn compile_refresh(&self, refresh: &RefreshCondition) -> Result<RefreshParsed, CompileError> {
        RefreshCompiler::new(&self.catalog, self.dialect.as_ref()).compile(refresh)
    }
}
