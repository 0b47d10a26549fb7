#![forbid(unsafe_code)]

//! Built-in widget kinds and the behavior strategy they implement.
//!
//! [`WidgetBehavior`] is the per-kind capability a registry entry carries:
//! default configuration, default span, and validation. Built-in kinds are
//! the exhaustive [`BuiltinKind`] enum, so adding a kind without wiring its
//! schema, defaults, and rules fails to compile. Third-party plugins supply
//! their own `Arc<dyn WidgetBehavior>` implementations.

use crate::schema::{
    ConditionOperator, ConfigurationField, ConfigurationSchema, FieldConstraints, FieldType,
    SchemaSection, SelectOption, VisibilityCondition,
};
use crate::validate::validate_against_schema;
use serde_json::{Value, json};
use tessera_core::catalog::EntityCatalog;
use tessera_core::diagnostic::Diagnostic;
use tessera_core::geometry::GridSpan;
use tessera_core::widget::WidgetCategory;

/// Per-kind capabilities carried by a registry entry.
pub trait WidgetBehavior: Send + Sync {
    /// Configuration a freshly placed widget of this kind starts with.
    fn default_configuration(&self) -> Value;

    /// Grid rectangle a freshly placed widget of this kind occupies.
    fn default_span(&self) -> GridSpan;

    /// Validate a configuration value into field-level diagnostics.
    ///
    /// Must be total: never panic, never error.
    fn validate(&self, config: &Value, catalog: &EntityCatalog) -> Vec<Diagnostic>;
}

/// The widget kinds registered at registry construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinKind {
    DataGrid,
    Form,
    Button,
    Text,
    Container,
    Modal,
}

impl BuiltinKind {
    /// Every built-in kind, in palette order.
    pub const ALL: [Self; 6] = [
        Self::DataGrid,
        Self::Form,
        Self::Button,
        Self::Text,
        Self::Container,
        Self::Modal,
    ];

    /// Stable kind name (also the built-in plugin id).
    #[must_use]
    pub const fn kind_name(self) -> &'static str {
        match self {
            Self::DataGrid => "data_grid",
            Self::Form => "form",
            Self::Button => "button",
            Self::Text => "text",
            Self::Container => "container",
            Self::Modal => "modal",
        }
    }

    /// Palette label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::DataGrid => "Data grid",
            Self::Form => "Form",
            Self::Button => "Button",
            Self::Text => "Text",
            Self::Container => "Container",
            Self::Modal => "Modal",
        }
    }

    /// Palette description.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::DataGrid => "Tabular view over a bound entity",
            Self::Form => "Create or edit records of a bound entity",
            Self::Button => "Trigger an action",
            Self::Text => "Static text block",
            Self::Container => "Groups other widgets",
            Self::Modal => "Overlay dialog opened by a trigger",
        }
    }

    /// Palette icon name.
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::DataGrid => "table",
            Self::Form => "clipboard",
            Self::Button => "square",
            Self::Text => "type",
            Self::Container => "box",
            Self::Modal => "layers",
        }
    }

    /// Palette category.
    #[must_use]
    pub const fn category(self) -> WidgetCategory {
        match self {
            Self::DataGrid => WidgetCategory::Data,
            Self::Form => WidgetCategory::Forms,
            Self::Button => WidgetCategory::Actions,
            Self::Text => WidgetCategory::Media,
            Self::Container | Self::Modal => WidgetCategory::Layout,
        }
    }

    /// The declarative configuration schema of this kind.
    #[must_use]
    pub fn schema(self) -> ConfigurationSchema {
        match self {
            Self::DataGrid => ConfigurationSchema::new(
                "1",
                vec![
                    SchemaSection::new(
                        "data",
                        "Data",
                        vec![
                            ConfigurationField::new("entity_id", "Entity", FieldType::Entity)
                                .required(),
                            ConfigurationField::new(
                                "columns",
                                "Columns",
                                FieldType::MultiSelect { options: vec![] },
                            ),
                            ConfigurationField::new("page_size", "Page size", FieldType::Number)
                                .with_default(json!(25))
                                .with_validation(FieldConstraints {
                                    min: Some(1.0),
                                    max: Some(200.0),
                                    ..FieldConstraints::default()
                                }),
                        ],
                    ),
                    SchemaSection::new(
                        "appearance",
                        "Appearance",
                        vec![
                            ConfigurationField::new("show_header", "Show header", FieldType::Boolean)
                                .with_default(json!(true)),
                            ConfigurationField::new(
                                "density",
                                "Density",
                                FieldType::Select {
                                    options: vec![
                                        SelectOption::new("compact"),
                                        SelectOption::new("regular"),
                                        SelectOption::new("comfortable"),
                                    ],
                                },
                            )
                            .with_default(json!("regular")),
                        ],
                    ),
                ],
            ),
            Self::Form => ConfigurationSchema::new(
                "1",
                vec![
                    SchemaSection::new(
                        "data",
                        "Data",
                        vec![
                            ConfigurationField::new("entity_id", "Entity", FieldType::Entity)
                                .required(),
                            ConfigurationField::new(
                                "fields",
                                "Fields",
                                FieldType::MultiSelect { options: vec![] },
                            ),
                        ],
                    ),
                    SchemaSection::new(
                        "behavior",
                        "Behavior",
                        vec![
                            ConfigurationField::new(
                                "layout",
                                "Layout",
                                FieldType::Select {
                                    options: vec![
                                        SelectOption::new("single"),
                                        SelectOption::new("two_column"),
                                        SelectOption::new("wizard"),
                                    ],
                                },
                            )
                            .with_default(json!("single")),
                            ConfigurationField::new("confirmation", "Ask for confirmation", FieldType::Boolean)
                                .with_default(json!(false)),
                            ConfigurationField::new("redirect", "Redirect after save", FieldType::Text)
                                .with_condition(VisibilityCondition {
                                    field: "confirmation".to_string(),
                                    operator: ConditionOperator::Equals,
                                    value: json!(true),
                                }),
                        ],
                    ),
                ],
            ),
            Self::Button => ConfigurationSchema::new(
                "1",
                vec![
                    SchemaSection::new(
                        "appearance",
                        "Appearance",
                        vec![
                            ConfigurationField::new("label", "Label", FieldType::Text)
                                .with_validation(FieldConstraints {
                                    max_length: Some(40),
                                    ..FieldConstraints::default()
                                }),
                            ConfigurationField::new(
                                "variant",
                                "Variant",
                                FieldType::Select {
                                    options: vec![
                                        SelectOption::new("primary"),
                                        SelectOption::new("secondary"),
                                        SelectOption::new("danger"),
                                    ],
                                },
                            )
                            .with_default(json!("primary")),
                        ],
                    ),
                    SchemaSection::new(
                        "behavior",
                        "Behavior",
                        vec![
                            ConfigurationField::new(
                                "action",
                                "Action",
                                FieldType::Select {
                                    options: vec![
                                        SelectOption::new("submit"),
                                        SelectOption::new("navigate"),
                                        SelectOption::new("custom"),
                                    ],
                                },
                            )
                            .with_default(json!("submit")),
                            ConfigurationField::new("target", "Target", FieldType::Text)
                                .with_condition(VisibilityCondition {
                                    field: "action".to_string(),
                                    operator: ConditionOperator::Equals,
                                    value: json!("navigate"),
                                }),
                        ],
                    ),
                ],
            ),
            Self::Text => ConfigurationSchema::new(
                "1",
                vec![SchemaSection::new(
                    "content",
                    "Content",
                    vec![
                        ConfigurationField::new("content", "Content", FieldType::Text),
                        ConfigurationField::new(
                            "align",
                            "Alignment",
                            FieldType::Select {
                                options: vec![
                                    SelectOption::new("left"),
                                    SelectOption::new("center"),
                                    SelectOption::new("right"),
                                ],
                            },
                        )
                        .with_default(json!("left")),
                        ConfigurationField::new("color", "Color", FieldType::Color),
                    ],
                )],
            ),
            Self::Container => ConfigurationSchema::new(
                "1",
                vec![SchemaSection::new(
                    "appearance",
                    "Appearance",
                    vec![
                        ConfigurationField::new("title", "Title", FieldType::Text),
                        ConfigurationField::new("collapsible", "Collapsible", FieldType::Boolean)
                            .with_default(json!(false)),
                        ConfigurationField::new("background", "Background", FieldType::Color),
                    ],
                )],
            ),
            Self::Modal => ConfigurationSchema::new(
                "1",
                vec![SchemaSection::new(
                    "behavior",
                    "Behavior",
                    vec![
                        ConfigurationField::new("title", "Title", FieldType::Text),
                        ConfigurationField::new("trigger", "Trigger", FieldType::Text),
                        ConfigurationField::new("dismissible", "Dismissible", FieldType::Boolean)
                            .with_default(json!(true)),
                    ],
                )],
            ),
        }
    }
}

impl WidgetBehavior for BuiltinKind {
    fn default_configuration(&self) -> Value {
        match self {
            Self::DataGrid => json!({
                "entity_id": "",
                "columns": [],
                "page_size": 25,
                "show_header": true,
                "density": "regular",
            }),
            Self::Form => json!({
                "entity_id": "",
                "fields": [],
                "layout": "single",
                "confirmation": false,
            }),
            Self::Button => json!({
                "label": "Button",
                "variant": "primary",
                "action": "submit",
            }),
            Self::Text => json!({
                "content": "",
                "align": "left",
            }),
            Self::Container => json!({
                "title": "",
                "collapsible": false,
            }),
            Self::Modal => json!({
                "title": "",
                "trigger": "",
                "dismissible": true,
            }),
        }
    }

    fn default_span(&self) -> GridSpan {
        let (rows, columns) = match self {
            Self::DataGrid => (4, 6),
            Self::Form => (6, 4),
            Self::Button => (1, 2),
            Self::Text => (1, 4),
            Self::Container => (4, 6),
            Self::Modal => (6, 6),
        };
        // Spans above are non-zero by construction.
        GridSpan::new(rows, columns).unwrap_or_default()
    }

    fn validate(&self, config: &Value, catalog: &EntityCatalog) -> Vec<Diagnostic> {
        let mut diagnostics = validate_against_schema(&self.schema(), config, catalog);
        match self {
            Self::DataGrid => {
                if array_is_missing_or_empty(config, "columns") {
                    diagnostics.push(Diagnostic::warning(
                        "columns",
                        "no columns configured; every entity field will be shown",
                    ));
                }
            }
            Self::Form => {
                if array_is_missing_or_empty(config, "fields") {
                    diagnostics.push(Diagnostic::error(
                        "fields",
                        "a form needs at least one field",
                    ));
                }
            }
            Self::Button => {
                if string_is_missing_or_empty(config, "label") {
                    diagnostics.push(Diagnostic::warning("label", "button has no label"));
                }
            }
            Self::Modal => {
                if string_is_missing_or_empty(config, "trigger") {
                    diagnostics.push(Diagnostic::warning(
                        "trigger",
                        "modal has no trigger and can never open",
                    ));
                }
            }
            Self::Text | Self::Container => {}
        }
        diagnostics
    }
}

fn array_is_missing_or_empty(config: &Value, key: &str) -> bool {
    match config.get(key) {
        Some(Value::Array(items)) => items.is_empty(),
        Some(_) => false,
        None => true,
    }
}

fn string_is_missing_or_empty(config: &Value, key: &str) -> bool {
    match config.get(key) {
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
        None => true,
    }
}
