pub mod config;
pub mod entity_schema;
pub mod errors;
pub mod schema_types;

pub use config::{load_catalog, CatalogConfig, EntityDefinition, PropertyDefinition};
pub use entity_schema::{EntitySchema, PropertySchema, SchemaCatalog};
pub use errors::SchemaCatalogError;
pub use schema_types::SchemaType;
