#![forbid(unsafe_code)]

//! The widget instance model.
//!
//! A [`WidgetInstance`] is one placed, configured element of a composed
//! screen. Instances are owned by the editing session: created on drop from
//! the palette, mutated on move/configure, destroyed on delete. The
//! `configuration` value is kind-specific structured data interpreted by
//! the plugin that registered the kind, never by this crate.

use crate::diagnostic::Diagnostic;
use crate::geometry::GridPosition;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Opaque unique widget identifier.
///
/// Ids are minted by the editing session and are unique for the session's
/// lifetime; duplicating a widget mints a fresh id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WidgetId(String);

impl WidgetId {
    /// Wrap an id string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WidgetId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Palette grouping for a widget kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetCategory {
    Data,
    Forms,
    Actions,
    Layout,
    Media,
    Custom,
}

impl fmt::Display for WidgetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Data => "data",
            Self::Forms => "forms",
            Self::Actions => "actions",
            Self::Layout => "layout",
            Self::Media => "media",
            Self::Custom => "custom",
        };
        f.write_str(name)
    }
}

/// Binding of a data-bound widget to an entity from the host catalog.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EntityBinding {
    /// Id of the bound entity.
    pub entity_id: String,
    /// Bound field names, when the widget selects a subset.
    #[serde(default)]
    pub fields: Vec<String>,
    /// Bound relationship names, when the widget traverses relations.
    #[serde(default)]
    pub relationships: Vec<String>,
}

impl EntityBinding {
    /// Bind to an entity with no field selection.
    #[must_use]
    pub fn to_entity(entity_id: impl Into<String>) -> Self {
        Self {
            entity_id: entity_id.into(),
            fields: Vec::new(),
            relationships: Vec::new(),
        }
    }
}

/// One placed, configured widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetInstance {
    /// Session-unique id.
    pub id: WidgetId,
    /// Registered widget kind name.
    pub kind: String,
    /// Occupied grid rectangle.
    pub position: GridPosition,
    /// Kind-specific configuration (a JSON object).
    #[serde(default)]
    pub configuration: serde_json::Value,
    /// Optional binding to a catalog entity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_binding: Option<EntityBinding>,
    /// Opaque per-breakpoint position overrides, carried through untouched
    /// for the host's responsive layer.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub breakpoint_overrides: BTreeMap<String, GridPosition>,
    /// Latest validation findings for this widget. Transient: omitted from
    /// serialization when empty, and a consumer may drop them entirely.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

impl WidgetInstance {
    /// Create a widget with empty binding, overrides, and diagnostics.
    #[must_use]
    pub fn new(
        id: WidgetId,
        kind: impl Into<String>,
        position: GridPosition,
        configuration: serde_json::Value,
    ) -> Self {
        Self {
            id,
            kind: kind.into(),
            position,
            configuration,
            entity_binding: None,
            breakpoint_overrides: BTreeMap::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Attach an entity binding.
    #[must_use]
    pub fn with_binding(mut self, binding: EntityBinding) -> Self {
        self.entity_binding = Some(binding);
        self
    }

    /// Whether any current diagnostic is an error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{GridPosition, GridSpan};
    use serde_json::json;

    fn widget(id: &str) -> WidgetInstance {
        WidgetInstance::new(
            WidgetId::from(id),
            "data_grid",
            GridPosition::new(0, 0, GridSpan::new(4, 6).unwrap()),
            json!({"entity_id": "orders", "columns": ["id"]}),
        )
    }

    #[test]
    fn widget_id_display_and_str() {
        let id = WidgetId::new("w-7");
        assert_eq!(id.as_str(), "w-7");
        assert_eq!(id.to_string(), "w-7");
    }

    #[test]
    fn category_serde_is_snake_case() {
        assert_eq!(
            serde_json::to_string(&WidgetCategory::Forms).unwrap(),
            "\"forms\""
        );
        let cat: WidgetCategory = serde_json::from_str("\"custom\"").unwrap();
        assert_eq!(cat, WidgetCategory::Custom);
    }

    #[test]
    fn binding_to_entity_is_minimal() {
        let b = EntityBinding::to_entity("orders");
        assert_eq!(b.entity_id, "orders");
        assert!(b.fields.is_empty());
        assert!(b.relationships.is_empty());
    }

    #[test]
    fn has_errors_reflects_diagnostics() {
        let mut w = widget("w-1");
        assert!(!w.has_errors());
        w.diagnostics.push(Diagnostic::warning("columns", "empty"));
        assert!(!w.has_errors());
        w.diagnostics.push(Diagnostic::error("entity_id", "missing"));
        assert!(w.has_errors());
    }

    #[test]
    fn serialization_omits_transient_fields_when_empty() {
        let w = widget("w-1");
        let json = serde_json::to_string(&w).unwrap();
        assert!(!json.contains("diagnostics"));
        assert!(!json.contains("breakpoint_overrides"));
        assert!(!json.contains("entity_binding"));
    }

    #[test]
    fn round_trip_with_binding_and_overrides() {
        let mut w = widget("w-1").with_binding(EntityBinding::to_entity("orders"));
        w.breakpoint_overrides.insert(
            "mobile".to_string(),
            GridPosition::new(0, 0, GridSpan::new(2, 12).unwrap()),
        );
        let json = serde_json::to_string(&w).unwrap();
        let back: WidgetInstance = serde_json::from_str(&json).unwrap();
        assert_eq!(w, back);
    }
}
