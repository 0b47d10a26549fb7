#![forbid(unsafe_code)]

//! Declarative configuration schemas.
//!
//! A schema is pure data: sections of typed fields that an external
//! configuration panel renders and the validator checks values against.
//! Field kinds are a closed sum ([`FieldType`]) with per-variant data, so
//! consumers dispatch by `match` and an unhandled kind fails to compile
//! instead of falling through a string comparison.
//!
//! `Entity` and `EntityField` fields are special: their option lists come
//! from the host's entity catalog at render/validation time, never from the
//! schema itself ([`entity_options`], [`entity_field_options`]).

use serde::{Deserialize, Serialize};
use tessera_core::catalog::EntityCatalog;

/// One choice of a select/multiselect field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    /// Create an option whose label mirrors its value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            label: value.clone(),
            value,
        }
    }

    /// Create an option with a distinct display label.
    #[must_use]
    pub fn labeled(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// The closed set of configuration field kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldType {
    /// Free-form text.
    Text,
    /// A numeric value.
    Number,
    /// A true/false toggle.
    Boolean,
    /// One value out of a fixed option list.
    Select { options: Vec<SelectOption> },
    /// Any subset of a fixed option list. An empty option list means the
    /// options are supplied externally (catalog-driven fields).
    MultiSelect { options: Vec<SelectOption> },
    /// Reference to a catalog entity; options come from the catalog.
    Entity,
    /// Reference to a field of a catalog entity; options come from the
    /// catalog.
    EntityField,
    /// A hex color such as `#1f6feb`.
    Color,
    /// A number constrained to `[min, max]` with a UI step hint.
    Range { min: f64, max: f64, step: f64 },
}

/// Declarative value constraints on a field.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FieldConstraints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    /// Literal pattern: `^`/`$` anchor to start/end, everything else is
    /// matched verbatim. Not a regular expression.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

/// Comparison operator of a visibility condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionOperator {
    Equals,
    NotEquals,
    Contains,
    NotContains,
}

/// Makes a field's visibility depend on another field's value.
///
/// Evaluated by the configuration-panel renderer; the validator only uses
/// it to avoid requiring values for hidden fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisibilityCondition {
    /// Id of the field the condition reads.
    pub field: String,
    pub operator: ConditionOperator,
    pub value: serde_json::Value,
}

impl VisibilityCondition {
    /// Evaluate the condition against a configuration object.
    ///
    /// `Contains` means substring for strings and membership for arrays;
    /// any other value shape does not contain anything.
    #[must_use]
    pub fn is_met(&self, config: &serde_json::Value) -> bool {
        let actual = config.get(&self.field).unwrap_or(&serde_json::Value::Null);
        match self.operator {
            ConditionOperator::Equals => actual == &self.value,
            ConditionOperator::NotEquals => actual != &self.value,
            ConditionOperator::Contains => contains(actual, &self.value),
            ConditionOperator::NotContains => !contains(actual, &self.value),
        }
    }
}

fn contains(haystack: &serde_json::Value, needle: &serde_json::Value) -> bool {
    match haystack {
        serde_json::Value::String(s) => needle.as_str().is_some_and(|n| s.contains(n)),
        serde_json::Value::Array(items) => items.contains(needle),
        _ => false,
    }
}

/// One configurable field of a widget kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationField {
    pub id: String,
    pub label: String,
    #[serde(flatten)]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<FieldConstraints>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<VisibilityCondition>,
}

impl ConfigurationField {
    /// Create an optional field with no constraints.
    #[must_use]
    pub fn new(id: impl Into<String>, label: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            field_type,
            required: false,
            default_value: None,
            validation: None,
            condition: None,
        }
    }

    /// Mark the field required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Attach a default value.
    #[must_use]
    pub fn with_default(mut self, value: serde_json::Value) -> Self {
        self.default_value = Some(value);
        self
    }

    /// Attach declarative constraints.
    #[must_use]
    pub fn with_validation(mut self, constraints: FieldConstraints) -> Self {
        self.validation = Some(constraints);
        self
    }

    /// Attach a visibility condition.
    #[must_use]
    pub fn with_condition(mut self, condition: VisibilityCondition) -> Self {
        self.condition = Some(condition);
        self
    }
}

/// A titled group of fields in the configuration panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaSection {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub fields: Vec<ConfigurationField>,
}

impl SchemaSection {
    /// Create a section with the given fields.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        fields: Vec<ConfigurationField>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            icon: None,
            fields,
        }
    }
}

/// The full declarative schema of one widget kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationSchema {
    pub version: String,
    pub sections: Vec<SchemaSection>,
}

impl ConfigurationSchema {
    /// Create a schema from sections.
    #[must_use]
    pub fn new(version: impl Into<String>, sections: Vec<SchemaSection>) -> Self {
        Self {
            version: version.into(),
            sections,
        }
    }

    /// Iterate every field across all sections, in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &ConfigurationField> {
        self.sections.iter().flat_map(|s| s.fields.iter())
    }

    /// Look up a field by id across all sections.
    #[must_use]
    pub fn field(&self, id: &str) -> Option<&ConfigurationField> {
        self.fields().find(|f| f.id == id)
    }
}

/// Options for an `Entity` field: one per catalog entity, labeled with the
/// entity's display name.
#[must_use]
pub fn entity_options(catalog: &EntityCatalog) -> Vec<SelectOption> {
    catalog
        .entities()
        .iter()
        .map(|e| SelectOption::labeled(e.id.clone(), e.display_name.clone()))
        .collect()
}

/// Options for an `EntityField` field: one per field of the bound entity,
/// or empty when the entity is unknown.
#[must_use]
pub fn entity_field_options(catalog: &EntityCatalog, entity_id: &str) -> Vec<SelectOption> {
    catalog
        .entity(entity_id)
        .map(|entity| {
            entity
                .fields
                .iter()
                .map(|f| SelectOption::labeled(f.name.clone(), f.display_name.clone()))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tessera_core::catalog::{EntityDescriptor, FieldDescriptor};

    fn sample_schema() -> ConfigurationSchema {
        ConfigurationSchema::new(
            "1",
            vec![
                SchemaSection::new(
                    "data",
                    "Data",
                    vec![
                        ConfigurationField::new("entity_id", "Entity", FieldType::Entity).required(),
                        ConfigurationField::new(
                            "columns",
                            "Columns",
                            FieldType::MultiSelect { options: vec![] },
                        ),
                    ],
                ),
                SchemaSection::new(
                    "appearance",
                    "Appearance",
                    vec![ConfigurationField::new("color", "Color", FieldType::Color)],
                ),
            ],
        )
    }

    // ---- Schema structure ----

    #[test]
    fn fields_iterates_all_sections() {
        let schema = sample_schema();
        let ids: Vec<_> = schema.fields().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["entity_id", "columns", "color"]);
    }

    #[test]
    fn field_lookup_crosses_sections() {
        let schema = sample_schema();
        assert!(schema.field("color").is_some());
        assert!(schema.field("missing").is_none());
    }

    // ---- Serde ----

    #[test]
    fn field_type_is_internally_tagged() {
        let field = ConfigurationField::new(
            "variant",
            "Variant",
            FieldType::Select {
                options: vec![SelectOption::new("primary"), SelectOption::new("danger")],
            },
        );
        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(json["type"], "select");
        assert_eq!(json["options"][0]["value"], "primary");
        let back: ConfigurationField = serde_json::from_value(json).unwrap();
        assert_eq!(field, back);
    }

    #[test]
    fn schema_round_trips() {
        let schema = sample_schema();
        let json = serde_json::to_string(&schema).unwrap();
        let back: ConfigurationSchema = serde_json::from_str(&json).unwrap();
        assert_eq!(schema, back);
    }

    #[test]
    fn unknown_field_type_is_rejected() {
        let err = serde_json::from_value::<ConfigurationField>(json!({
            "id": "x", "label": "X", "type": "hologram"
        }));
        assert!(err.is_err());
    }

    // ---- Conditions ----

    #[test]
    fn equals_condition() {
        let cond = VisibilityCondition {
            field: "action".to_string(),
            operator: ConditionOperator::Equals,
            value: json!("navigate"),
        };
        assert!(cond.is_met(&json!({"action": "navigate"})));
        assert!(!cond.is_met(&json!({"action": "submit"})));
        assert!(!cond.is_met(&json!({})));
    }

    #[test]
    fn not_equals_condition_on_missing_field() {
        let cond = VisibilityCondition {
            field: "mode".to_string(),
            operator: ConditionOperator::NotEquals,
            value: json!("compact"),
        };
        // Missing field reads as null, which is not equal to "compact".
        assert!(cond.is_met(&json!({})));
    }

    #[test]
    fn contains_condition_string_and_array() {
        let cond = VisibilityCondition {
            field: "tags".to_string(),
            operator: ConditionOperator::Contains,
            value: json!("beta"),
        };
        assert!(cond.is_met(&json!({"tags": "alpha beta"})));
        assert!(cond.is_met(&json!({"tags": ["alpha", "beta"]})));
        assert!(!cond.is_met(&json!({"tags": ["alpha"]})));
        assert!(!cond.is_met(&json!({"tags": 42})));
    }

    #[test]
    fn not_contains_condition() {
        let cond = VisibilityCondition {
            field: "tags".to_string(),
            operator: ConditionOperator::NotContains,
            value: json!("beta"),
        };
        assert!(cond.is_met(&json!({"tags": ["alpha"]})));
        assert!(!cond.is_met(&json!({"tags": ["beta"]})));
    }

    // ---- Catalog-driven options ----

    #[test]
    fn entity_options_from_catalog() {
        let catalog = EntityCatalog::new(vec![
            EntityDescriptor::new("e-1", "orders"),
            EntityDescriptor::new("e-2", "customers"),
        ]);
        let options = entity_options(&catalog);
        assert_eq!(options.len(), 2);
        assert_eq!(options[0].value, "e-1");
        assert_eq!(options[0].label, "orders");
    }

    #[test]
    fn entity_field_options_for_known_and_unknown_entity() {
        let catalog = EntityCatalog::new(vec![
            EntityDescriptor::new("e-1", "orders")
                .with_field(FieldDescriptor::new("f-1", "id", "uuid"))
                .with_field(FieldDescriptor::new("f-2", "total", "float")),
        ]);
        let options = entity_field_options(&catalog, "e-1");
        assert_eq!(options.len(), 2);
        assert_eq!(options[1].value, "total");
        assert!(entity_field_options(&catalog, "e-404").is_empty());
    }
}
