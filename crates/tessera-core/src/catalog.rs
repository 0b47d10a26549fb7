#![forbid(unsafe_code)]

//! Read-only entity catalog supplied by the host application.
//!
//! The catalog lists the data entities (and their fields) available for
//! data-bound widgets. It populates `entity`/`field` configuration options
//! and drives kind-specific validation. The core never mutates it; the host
//! replaces the whole catalog when its model changes.

use serde::{Deserialize, Serialize};

/// One field of a host entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub id: String,
    pub name: String,
    pub display_name: String,
    /// Host-side type name (opaque to the core).
    pub field_type: String,
    #[serde(default)]
    pub required: bool,
}

impl FieldDescriptor {
    /// Create a field descriptor whose display name mirrors its name.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, field_type: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: id.into(),
            display_name: name.clone(),
            name,
            field_type: field_type.into(),
            required: false,
        }
    }
}

/// One host entity with its fields, in host-declared order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityDescriptor {
    pub id: String,
    pub name: String,
    pub display_name: String,
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
}

impl EntityDescriptor {
    /// Create an entity descriptor whose display name mirrors its name.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: id.into(),
            display_name: name.clone(),
            name,
            fields: Vec::new(),
        }
    }

    /// Append a field, preserving declaration order.
    #[must_use]
    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Look up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// The ordered list of entities the host exposes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityCatalog {
    entities: Vec<EntityDescriptor>,
}

impl EntityCatalog {
    /// Build a catalog from an ordered entity list.
    #[must_use]
    pub fn new(entities: Vec<EntityDescriptor>) -> Self {
        Self { entities }
    }

    /// A catalog with no entities.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Entities in host-declared order.
    #[must_use]
    pub fn entities(&self) -> &[EntityDescriptor] {
        &self.entities
    }

    /// Look up an entity by id.
    #[must_use]
    pub fn entity(&self, id: &str) -> Option<&EntityDescriptor> {
        self.entities.iter().find(|e| e.id == id)
    }

    /// Look up an entity by name.
    #[must_use]
    pub fn entity_by_name(&self, name: &str) -> Option<&EntityDescriptor> {
        self.entities.iter().find(|e| e.name == name)
    }

    /// Whether an entity with this id exists.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.entity(id).is_some()
    }

    /// Whether any entity carries a field with this name.
    #[must_use]
    pub fn any_entity_has_field(&self, field_name: &str) -> bool {
        self.entities.iter().any(|e| e.field(field_name).is_some())
    }

    /// Number of entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the catalog has no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> EntityCatalog {
        EntityCatalog::new(vec![
            EntityDescriptor::new("e-orders", "orders")
                .with_field(FieldDescriptor::new("f-1", "id", "uuid"))
                .with_field(FieldDescriptor::new("f-2", "total", "float")),
            EntityDescriptor::new("e-customers", "customers")
                .with_field(FieldDescriptor::new("f-3", "name", "string")),
        ])
    }

    #[test]
    fn lookup_by_id_and_name() {
        let catalog = sample();
        assert_eq!(catalog.entity("e-orders").unwrap().name, "orders");
        assert_eq!(catalog.entity_by_name("customers").unwrap().id, "e-customers");
        assert!(catalog.entity("missing").is_none());
    }

    #[test]
    fn contains_and_len() {
        let catalog = sample();
        assert!(catalog.contains("e-customers"));
        assert!(!catalog.contains("e-none"));
        assert_eq!(catalog.len(), 2);
        assert!(!catalog.is_empty());
        assert!(EntityCatalog::empty().is_empty());
    }

    #[test]
    fn field_lookup() {
        let catalog = sample();
        let orders = catalog.entity("e-orders").unwrap();
        assert_eq!(orders.field("total").unwrap().field_type, "float");
        assert!(orders.field("missing").is_none());
        assert!(catalog.any_entity_has_field("name"));
        assert!(!catalog.any_entity_has_field("ghost"));
    }

    #[test]
    fn order_is_preserved() {
        let catalog = sample();
        let names: Vec<_> = catalog.entities().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["orders", "customers"]);
    }

    #[test]
    fn serde_transparent_list() {
        let catalog = sample();
        let json = serde_json::to_string(&catalog).unwrap();
        assert!(json.starts_with('['));
        let back: EntityCatalog = serde_json::from_str(&json).unwrap();
        assert_eq!(catalog, back);
    }
}
