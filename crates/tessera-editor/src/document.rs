#![forbid(unsafe_code)]

//! Validation of externally supplied layout/model export documents.
//!
//! A host may import a whole model document (entities, layouts, and their
//! widgets) produced elsewhere. [`validate_document`] walks the untrusted
//! JSON and reports findings with dotted paths, without deserializing into
//! the typed model first: missing required identity fields are errors,
//! wrong collection shapes are warnings, and the function is total.

use serde_json::{Map, Value};
use tessera_core::diagnostic::Diagnostic;

/// Keys every entity, field, layout, and component entry must carry.
const REQUIRED_KEYS: [&str; 3] = ["id", "name", "type"];

/// Validate an export document.
///
/// Checks, for each entry of `entities` (and its `fields`), `layouts`, and
/// each layout's `components`: non-empty `id`, `name`, and `type`.
/// Collections that are present but not arrays (`entities`, `layouts`,
/// `fields`, `relationships`, `components`) are warnings; absent
/// collections are fine (an empty model is a valid model).
#[must_use]
pub fn validate_document(document: &Value) -> Vec<Diagnostic> {
    let Some(root) = document.as_object() else {
        return vec![Diagnostic::error(
            "document",
            "export document must be a JSON object",
        )];
    };

    let mut diagnostics = Vec::new();

    if let Some(entities) = expect_array(root, "entities", "entities", &mut diagnostics) {
        for (index, entity) in entities.iter().enumerate() {
            let path = format!("entities[{index}]");
            let Some(entity) = expect_object(entity, &path, &mut diagnostics) else {
                continue;
            };
            require_identity(entity, &path, &mut diagnostics);
            if let Some(fields) =
                expect_array(entity, "fields", &format!("{path}.fields"), &mut diagnostics)
            {
                for (field_index, field) in fields.iter().enumerate() {
                    let field_path = format!("{path}.fields[{field_index}]");
                    if let Some(field) = expect_object(field, &field_path, &mut diagnostics) {
                        require_identity(field, &field_path, &mut diagnostics);
                    }
                }
            }
            // Relationships are carried opaquely, but their shape still
            // has to be a list.
            let _ = expect_array(
                entity,
                "relationships",
                &format!("{path}.relationships"),
                &mut diagnostics,
            );
        }
    }

    if let Some(layouts) = expect_array(root, "layouts", "layouts", &mut diagnostics) {
        for (index, layout) in layouts.iter().enumerate() {
            let path = format!("layouts[{index}]");
            let Some(layout) = expect_object(layout, &path, &mut diagnostics) else {
                continue;
            };
            require_identity(layout, &path, &mut diagnostics);
            if let Some(components) = expect_array(
                layout,
                "components",
                &format!("{path}.components"),
                &mut diagnostics,
            ) {
                for (component_index, component) in components.iter().enumerate() {
                    let component_path = format!("{path}.components[{component_index}]");
                    if let Some(component) =
                        expect_object(component, &component_path, &mut diagnostics)
                    {
                        require_identity(component, &component_path, &mut diagnostics);
                    }
                }
            }
        }
    }

    diagnostics
}

fn expect_array<'v>(
    parent: &'v Map<String, Value>,
    key: &str,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<&'v Vec<Value>> {
    match parent.get(key) {
        None => None,
        Some(Value::Array(items)) => Some(items),
        Some(other) => {
            diagnostics.push(Diagnostic::warning(
                path.to_string(),
                format!("expected an array, found {}", json_kind(other)),
            ));
            None
        }
    }
}

fn expect_object<'v>(
    value: &'v Value,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<&'v Map<String, Value>> {
    match value.as_object() {
        Some(object) => Some(object),
        None => {
            diagnostics.push(Diagnostic::warning(
                path.to_string(),
                format!("expected an object, found {}", json_kind(value)),
            ));
            None
        }
    }
}

fn require_identity(object: &Map<String, Value>, path: &str, diagnostics: &mut Vec<Diagnostic>) {
    for key in REQUIRED_KEYS {
        let missing = match object.get(key) {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => s.is_empty(),
            Some(_) => false,
        };
        if missing {
            diagnostics.push(Diagnostic::error(
                format!("{path}.{key}"),
                format!("missing required field `{key}`"),
            ));
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
