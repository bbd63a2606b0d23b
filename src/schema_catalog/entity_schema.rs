use std::collections::HashMap;
use std::sync::Arc;

use log::info;
use serde::{Deserialize, Serialize};

use super::errors::SchemaCatalogError;
use super::schema_types::SchemaType;
use crate::criteria::SqlValue;
use crate::utils::lower_first;

/// Physical mapping of one logical property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySchema {
    pub column: String,
    pub schema_type: SchemaType,
    /// Nullable properties have no scalar default value
    pub nullable: bool,
    /// Values are stored as JSON text
    pub json: bool,
}

impl PropertySchema {
    pub fn new(column: impl Into<String>, schema_type: SchemaType) -> Self {
        Self {
            column: column.into(),
            schema_type,
            nullable: false,
            json: false,
        }
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn json(mut self) -> Self {
        self.json = true;
        self
    }
}

/// Metadata of one logical entity: its table and its property → column mapping.
///
/// Immutable once registered in a [`SchemaCatalog`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySchema {
    /// Logical entity name, e.g. `Order`
    pub name: String,
    /// Physical table name, e.g. `t_order`
    pub table_name: String,
    pub properties: HashMap<String, PropertySchema>,
}

impl EntitySchema {
    pub fn new(name: impl Into<String>, table_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table_name: table_name.into(),
            properties: HashMap::new(),
        }
    }

    pub fn with_property(mut self, property: impl Into<String>, schema: PropertySchema) -> Self {
        self.properties.insert(property.into(), schema);
        self
    }

    /// The name an entity is written as inside source scripts (`orderItem`)
    pub fn script_name(&self) -> String {
        lower_first(&self.name)
    }

    /// Whether `name` addresses this entity itself rather than an alias of it
    pub fn is_self_reference(&self, name: &str) -> bool {
        name == self.name || name == self.script_name()
    }

    /// Table qualifier for `alias.property` references.
    ///
    /// A real alias (`o` in `FROM order o`) is kept; the entity's own name
    /// becomes the physical table name.
    pub fn table_name_for<'a>(&'a self, alias: &'a str) -> &'a str {
        if alias.is_empty() || self.is_self_reference(alias) {
            &self.table_name
        } else {
            alias
        }
    }

    pub fn property(&self, property: &str) -> Option<&PropertySchema> {
        self.properties.get(property)
    }

    pub fn column(&self, property: &str) -> Option<&str> {
        self.properties.get(property).map(|p| p.column.as_str())
    }

    /// Whether `value` is the default of the property's declared type.
    ///
    /// Unknown properties never have a default, except for a null value.
    pub fn is_default_value(&self, property: &str, value: &SqlValue) -> bool {
        match self.properties.get(property) {
            Some(p) => p.schema_type.is_default_value(value, p.nullable),
            None => value.is_null(),
        }
    }
}

/// Registry of entity metadata, keyed by the script form of the entity name.
///
/// Built once at startup and shared read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct SchemaCatalog {
    entities: HashMap<String, Arc<EntitySchema>>,
}

impl SchemaCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity. Names are unique regardless of first-letter case.
    pub fn register(&mut self, entity: EntitySchema) -> Result<(), SchemaCatalogError> {
        let key = entity.script_name();
        if self.entities.contains_key(&key) {
            return Err(SchemaCatalogError::DuplicateEntity {
                entity: entity.name.clone(),
            });
        }
        if let Some((property, _)) = entity
            .properties
            .iter()
            .find(|(_, p)| p.column.trim().is_empty())
        {
            return Err(SchemaCatalogError::EmptyColumn {
                entity: entity.name.clone(),
                property: property.clone(),
            });
        }

        info!(
            "Registered entity {} -> {} ({} properties)",
            entity.name,
            entity.table_name,
            entity.properties.len()
        );
        self.entities.insert(key, Arc::new(entity));
        Ok(())
    }

    /// Look an entity up by its name (`Order`) or its script form (`order`)
    pub fn lookup(&self, name: &str) -> Option<&Arc<EntitySchema>> {
        self.entities.get(&lower_first(name))
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
