//! End-to-end registry lifecycle: third-party registration, palette
//! queries, live change notification, and validator totality.

use serde_json::{Value, json};
use std::sync::Arc;
use tessera_core::catalog::{EntityCatalog, EntityDescriptor, FieldDescriptor};
use tessera_core::diagnostic::{Diagnostic, Severity};
use tessera_core::geometry::GridSpan;
use tessera_plugins::{
    ComponentPlugin, ConfigurationField, ConfigurationSchema, FieldType, PluginRegistry,
    SchemaSection, WidgetBehavior, WidgetCategory,
};

struct ChartBehavior;

impl WidgetBehavior for ChartBehavior {
    fn default_configuration(&self) -> Value {
        json!({"entity_id": "", "series": []})
    }

    fn default_span(&self) -> GridSpan {
        GridSpan::new(4, 4).unwrap()
    }

    fn validate(&self, config: &Value, catalog: &EntityCatalog) -> Vec<Diagnostic> {
        let mut diags = Vec::new();
        match config.get("entity_id").and_then(Value::as_str) {
            Some(id) if !id.is_empty() => {
                if !catalog.is_empty() && !catalog.contains(id) {
                    diags.push(Diagnostic::error("entity_id", format!("unknown entity `{id}`")));
                }
            }
            _ => diags.push(Diagnostic::error("entity_id", "Entity is required")),
        }
        diags
    }
}

fn chart_plugin() -> ComponentPlugin {
    ComponentPlugin::new(
        "chart",
        "chart",
        "Chart",
        WidgetCategory::Custom,
        ConfigurationSchema::new(
            "1",
            vec![SchemaSection::new(
                "data",
                "Data",
                vec![
                    ConfigurationField::new("entity_id", "Entity", FieldType::Entity).required(),
                    ConfigurationField::new(
                        "series",
                        "Series",
                        FieldType::MultiSelect { options: vec![] },
                    ),
                ],
            )],
        ),
        Arc::new(ChartBehavior),
    )
    .with_description("Plot a series per selected field")
    .with_icon("activity")
}

fn catalog() -> EntityCatalog {
    EntityCatalog::new(vec![
        EntityDescriptor::new("e-orders", "orders")
            .with_field(FieldDescriptor::new("f-1", "id", "uuid"))
            .with_field(FieldDescriptor::new("f-2", "total", "float")),
    ])
}

#[test]
fn third_party_plugin_full_lifecycle() {
    // Register "chart", find it by category and search, then unregister
    // and observe it gone.
    let mut registry = PluginRegistry::with_builtins();
    let watcher = registry.subscribe();

    registry.register(chart_plugin()).unwrap();
    assert!(
        registry
            .by_category(WidgetCategory::Custom)
            .iter()
            .any(|p| p.id == "chart")
    );
    assert!(registry.search("chart").iter().any(|p| p.id == "chart"));

    assert!(registry.unregister("chart"));
    assert!(registry.plugins().iter().all(|p| p.id != "chart"));
    assert!(registry.get("chart").is_none());

    // The palette watcher saw both mutations, newest last, each carrying
    // the full plugin list it can render directly.
    let events = watcher.drain();
    assert_eq!(events.len(), 2);
    assert!(events[0].contains("chart"));
    assert!(!events[1].contains("chart"));
    assert_eq!(events[1].plugins.len(), 6);
}

#[test]
fn data_grid_validation_matches_documented_contract() {
    // An unbound data grid with zero columns yields exactly one error
    // (entity) and one warning (columns).
    let registry = PluginRegistry::with_builtins();
    let diags = registry.validate_configuration(
        "data_grid",
        &json!({"entity_id": "", "columns": []}),
        &catalog(),
    );
    assert_eq!(diags.len(), 2);
    assert_eq!(
        (diags[0].field.as_str(), diags[0].severity),
        ("entity_id", Severity::Error)
    );
    assert_eq!(
        (diags[1].field.as_str(), diags[1].severity),
        ("columns", Severity::Warning)
    );
}

#[test]
fn validator_is_total_for_unknown_plugin() {
    let registry = PluginRegistry::with_builtins();
    let diags = registry.validate_configuration("ghost", &json!({}), &catalog());
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].field, "plugin");
    assert_eq!(diags[0].severity, Severity::Error);
}

#[test]
fn custom_validator_consults_the_catalog() {
    let mut registry = PluginRegistry::with_builtins();
    registry.register(chart_plugin()).unwrap();
    let ok = registry.validate_configuration(
        "chart",
        &json!({"entity_id": "e-orders", "series": ["total"]}),
        &catalog(),
    );
    assert!(ok.is_empty(), "{ok:?}");
    let unknown = registry.validate_configuration(
        "chart",
        &json!({"entity_id": "e-ghost"}),
        &catalog(),
    );
    assert_eq!(unknown.len(), 1);
    assert!(unknown[0].message.contains("unknown entity"));
}

#[test]
fn isolated_registries_do_not_share_state() {
    let mut a = PluginRegistry::empty();
    let b = PluginRegistry::empty();
    a.register(chart_plugin()).unwrap();
    assert!(a.contains("chart"));
    assert!(!b.contains("chart"));
    assert_eq!(b.revision(), 0);
}
