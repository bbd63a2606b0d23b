//! Logical → physical identifier resolution
//!
//! Keys in criteria are written against the logical model (`o.userId`,
//! `createdAt`, `orderItem`). The resolver rewrites them to the physical
//! names registered in the [`SchemaCatalog`]:
//!
//! - `alias.property`: alias → entity through the source-script alias map,
//!   then `table_or_alias.column`
//! - a bare entity name from the source script → its table name
//! - a bare property of the primary entity → its column
//! - anything else passes through untouched (SQL keywords, literals, `?`)

use std::collections::HashMap;

use crate::schema_catalog::{EntitySchema, SchemaCatalog};

use super::errors::CompileError;
use super::source_script::is_identifier;

const TRAILING_PUNCTUATION: &[char] = &[',', ')', ';'];

pub struct IdentifierResolver<'a> {
    catalog: &'a SchemaCatalog,
    entity: &'a EntitySchema,
    alias_map: &'a HashMap<String, String>,
}

impl<'a> IdentifierResolver<'a> {
    pub fn new(
        catalog: &'a SchemaCatalog,
        entity: &'a EntitySchema,
        alias_map: &'a HashMap<String, String>,
    ) -> Self {
        Self {
            catalog,
            entity,
            alias_map,
        }
    }

    /// The primary entity of the statement being compiled
    pub fn entity(&self) -> &'a EntitySchema {
        self.entity
    }

    fn entity_for_alias(&self, alias: &str) -> Result<&'a EntitySchema, CompileError> {
        let name = self
            .alias_map
            .get(alias)
            .map(String::as_str)
            .unwrap_or(alias);
        self.catalog
            .lookup(name)
            .map(|schema| schema.as_ref())
            .ok_or_else(|| CompileError::unresolved_entity(name))
    }

    /// Resolve a single key
    pub fn resolve_key(&self, key: &str) -> Result<String, CompileError> {
        let key = key.trim();

        if let Some((alias, property)) = key.split_once('.') {
            if !is_identifier(alias) || !is_identifier(property) {
                return Ok(key.to_string());
            }
            let schema = self.entity_for_alias(alias)?;
            let column = schema.column(property).unwrap_or(property);
            return Ok(format!("{}.{}", schema.table_name_for(alias), column));
        }

        // Entities named in the source script map to themselves
        if self.alias_map.get(key).is_some_and(|entity| entity == key) {
            if let Some(schema) = self.catalog.lookup(key) {
                return Ok(schema.table_name.clone());
            }
        }

        if self.entity.is_self_reference(key) {
            return Ok(self.entity.table_name.clone());
        }

        Ok(self
            .entity
            .column(key)
            .map(str::to_string)
            .unwrap_or_else(|| key.to_string()))
    }

    /// Resolve a whitespace-delimited script token by token
    pub fn resolve_script(&self, script: &str) -> Result<String, CompileError> {
        let tokens = script
            .split_whitespace()
            .map(|token| self.resolve_token(token))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tokens.join(" "))
    }

    /// Resolve one token, keeping surrounding parentheses and separators.
    /// Inside a call (`COUNT(o.id)`) only the innermost argument is resolved.
    fn resolve_token(&self, token: &str) -> Result<String, CompileError> {
        let start = token.rfind('(').map_or(0, |open| open + 1);
        let core = token[start..].trim_end_matches(TRAILING_PUNCTUATION);
        if core.is_empty() {
            return Ok(token.to_string());
        }

        let end = start + core.len();
        Ok(format!(
            "{}{}{}",
            &token[..start],
            self.resolve_key(core)?,
            &token[end..]
        ))
    }

    /// Entity and property a key refers to, when the key names a known
    /// property. Used to look up declared types for default-value checks.
    pub fn property_owner<'k>(&self, key: &'k str) -> Option<(&'a EntitySchema, &'k str)> {
        let key = key.trim();
        let (schema, property) = match key.split_once('.') {
            Some((alias, property)) => (self.entity_for_alias(alias).ok()?, property),
            None => (self.entity, key),
        };
        schema.property(property).map(|_| (schema, property))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema_catalog::{PropertySchema, SchemaType};
    use crate::sql_generator::source_script::parse_alias_map;

    fn catalog() -> SchemaCatalog {
        let mut catalog = SchemaCatalog::new();
        catalog
            .register(
                EntitySchema::new("Order", "t_order")
                    .with_property("id", PropertySchema::new("id", SchemaType::Integer))
                    .with_property("userId", PropertySchema::new("user_id", SchemaType::Integer))
                    .with_property("status", PropertySchema::new("order_status", SchemaType::String)),
            )
            .unwrap();
        catalog
            .register(
                EntitySchema::new("OrderItem", "t_order_item")
                    .with_property("orderId", PropertySchema::new("order_id", SchemaType::Integer))
                    .with_property("sku", PropertySchema::new("sku", SchemaType::String)),
            )
            .unwrap();
        catalog
    }

    #[test]
    fn test_resolve_plain_keys() {
        let catalog = catalog();
        let order = catalog.lookup("Order").unwrap();
        let aliases = HashMap::new();
        let resolver = IdentifierResolver::new(&catalog, order, &aliases);

        assert_eq!(resolver.resolve_key("status").unwrap(), "order_status");
        assert_eq!(resolver.resolve_key("order").unwrap(), "t_order");
        assert_eq!(resolver.resolve_key("unmapped").unwrap(), "unmapped");
        assert_eq!(resolver.resolve_key("?").unwrap(), "?");
        assert_eq!(resolver.resolve_key("1.5").unwrap(), "1.5");
        assert_eq!(resolver.resolve_key("order.userId").unwrap(), "t_order.user_id");
    }

    #[test]
    fn test_resolve_aliased_keys() {
        let catalog = catalog();
        let order = catalog.lookup("Order").unwrap();
        let aliases = parse_alias_map("order o INNER JOIN orderItem i ON i.orderId = o.id");
        let resolver = IdentifierResolver::new(&catalog, order, &aliases);

        assert_eq!(resolver.resolve_key("o.userId").unwrap(), "o.user_id");
        assert_eq!(resolver.resolve_key("i.orderId").unwrap(), "i.order_id");
        assert_eq!(
            resolver
                .resolve_script("order o INNER JOIN orderItem i ON i.orderId = o.id")
                .unwrap(),
            "t_order o INNER JOIN t_order_item i ON i.order_id = o.id"
        );
    }

    #[test]
    fn test_unknown_alias_fails() {
        let catalog = catalog();
        let order = catalog.lookup("Order").unwrap();
        let aliases = HashMap::new();
        let resolver = IdentifierResolver::new(&catalog, order, &aliases);

        assert_eq!(
            resolver.resolve_key("x.name").unwrap_err(),
            CompileError::UnresolvedEntity {
                entity: "X".to_string()
            }
        );
    }

    #[test]
    fn test_resolve_script_keeps_punctuation() {
        let catalog = catalog();
        let order = catalog.lookup("Order").unwrap();
        let aliases = HashMap::new();
        let resolver = IdentifierResolver::new(&catalog, order, &aliases);

        assert_eq!(
            resolver.resolve_script("(status = ? OR  userId IN (1, 2))").unwrap(),
            "(order_status = ? OR user_id IN (1, 2))"
        );
    }

    #[test]
    fn test_resolve_script_inside_function_calls() {
        let catalog = catalog();
        let order = catalog.lookup("Order").unwrap();
        let aliases = parse_alias_map("order o");
        let resolver = IdentifierResolver::new(&catalog, order, &aliases);

        assert_eq!(
            resolver
                .resolve_script("COUNT(o.id) > 1 AND IFNULL(o.userId, 0) = NOW()")
                .unwrap(),
            "COUNT(o.id) > 1 AND IFNULL(o.user_id, 0) = NOW()"
        );
        assert_eq!(
            resolver.resolve_script("UPPER(TRIM(status))").unwrap(),
            "UPPER(TRIM(order_status))"
        );
    }

    #[test]
    fn test_property_owner() {
        let catalog = catalog();
        let order = catalog.lookup("Order").unwrap();
        let aliases = parse_alias_map("order o, orderItem i");
        let resolver = IdentifierResolver::new(&catalog, order, &aliases);

        let (schema, property) = resolver.property_owner("i.sku").unwrap();
        assert_eq!(schema.name, "OrderItem");
        assert_eq!(property, "sku");
        assert!(resolver.property_owner("status").is_some());
        assert!(resolver.property_owner("missing").is_none());
        assert!(resolver.property_owner("zz.status").is_none());
    }
}
