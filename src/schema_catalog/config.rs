use super::entity_schema::{EntitySchema, PropertySchema, SchemaCatalog};
use super::errors::SchemaCatalogError;
use super::schema_types::SchemaType;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Entity catalogs are defined in YAML with the following structure:
///
/// ```yaml
/// name: shop                # Optional catalog name
/// entities:
///   - name: Order           # Logical entity name
///     table: t_order        # Physical table
///     properties:
///       id:
///         type: integer     # column defaults to the property name
///       userId:
///         column: user_id
///         type: integer
///       remark:
///         column: remark
///         type: string
///         nullable: true    # no scalar default, never pruned
///       extra:
///         column: extra_json
///         type: json        # serialized to JSON text on UPDATE
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub name: Option<String>,
    pub entities: Vec<EntityDefinition>,
}

/// Entity definition in catalog config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityDefinition {
    pub name: String,
    pub table: String,
    #[serde(default)]
    pub properties: HashMap<String, PropertyDefinition>,
}

/// Property definition in catalog config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyDefinition {
    /// Physical column. Defaults to the property name.
    #[serde(default)]
    pub column: Option<String>,
    /// Declared type, parsed with [`SchemaType::from_str`] so aliases work
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default)]
    pub json: bool,
}

impl CatalogConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, SchemaCatalogError> {
        serde_yaml::from_str(yaml).map_err(|e| SchemaCatalogError::ConfigParseError {
            error: e.to_string(),
        })
    }

    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, SchemaCatalogError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| SchemaCatalogError::ConfigReadError {
            error: format!("{}: {}", path.display(), e),
        })?;
        Self::from_yaml_str(&content)
    }

    /// Build the runtime catalog, validating every declared type
    pub fn to_catalog(&self) -> Result<SchemaCatalog, SchemaCatalogError> {
        let mut catalog = SchemaCatalog::new();
        for entity in &self.entities {
            catalog.register(entity.to_entity_schema()?)?;
        }
        Ok(catalog)
    }
}

impl EntityDefinition {
    pub fn to_entity_schema(&self) -> Result<EntitySchema, SchemaCatalogError> {
        if self.name.trim().is_empty() || self.table.trim().is_empty() {
            return Err(SchemaCatalogError::InvalidConfig {
                message: format!(
                    "entity name and table must be non-empty (name: '{}', table: '{}')",
                    self.name, self.table
                ),
            });
        }

        let mut schema = EntitySchema::new(self.name.trim(), self.table.trim());
        for (property, def) in &self.properties {
            let schema_type = SchemaType::from_str(&def.type_name).map_err(|message| {
                SchemaCatalogError::InvalidConfig {
                    message: format!("{}.{}: {}", self.name, property, message),
                }
            })?;
            let column = def.column.clone().unwrap_or_else(|| property.clone());
            schema.properties.insert(
                property.clone(),
                PropertySchema {
                    column,
                    schema_type,
                    nullable: def.nullable,
                    json: def.json || schema_type == SchemaType::Json,
                },
            );
        }
        Ok(schema)
    }
}

/// Load a catalog straight from a YAML file
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<SchemaCatalog, SchemaCatalogError> {
    CatalogConfig::from_yaml_file(path)?.to_catalog()
}
