#![forbid(unsafe_code)]

//! Generic schema-driven configuration validation.
//!
//! [`validate_against_schema`] turns a configuration value into field-level
//! diagnostics. It is total: any input yields a (possibly empty) diagnostic
//! list, never a panic or an error return. Missing and `null` values are
//! treated alike, and an empty string counts as absent so a cleared text
//! input behaves like an unset one.
//!
//! Fields hidden by an unmet [`VisibilityCondition`] are skipped entirely:
//! a renderer never shows them, so requiring a value there would produce
//! diagnostics the user cannot act on.

use crate::schema::{ConfigurationField, ConfigurationSchema, FieldType, SelectOption};
use serde_json::Value;
use tessera_core::catalog::EntityCatalog;
use tessera_core::diagnostic::Diagnostic;

/// Validate `config` against `schema`, resolving entity references through
/// `catalog`.
#[must_use]
pub fn validate_against_schema(
    schema: &ConfigurationSchema,
    config: &Value,
    catalog: &EntityCatalog,
) -> Vec<Diagnostic> {
    if !config.is_object() {
        return vec![Diagnostic::error(
            "configuration",
            "configuration must be a JSON object",
        )];
    }

    let mut diagnostics = Vec::new();
    for field in schema.fields() {
        if let Some(condition) = &field.condition
            && !condition.is_met(config)
        {
            continue;
        }

        let value = config.get(&field.id);
        if is_absent(value) {
            if field.required {
                diagnostics.push(Diagnostic::error(
                    field.id.clone(),
                    format!("{} is required", field.label),
                ));
            }
            continue;
        }
        // Absent values were handled above, so the lookup is `Some` here.
        let Some(value) = value else { continue };
        check_value(field, value, catalog, &mut diagnostics);
    }
    diagnostics
}

fn is_absent(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

fn check_value(
    field: &ConfigurationField,
    value: &Value,
    catalog: &EntityCatalog,
    diagnostics: &mut Vec<Diagnostic>,
) {
    match &field.field_type {
        FieldType::Text => {
            let Some(text) = expect_string(field, value, diagnostics) else {
                return;
            };
            check_text_constraints(field, text, diagnostics);
        }
        FieldType::Number => {
            let Some(number) = expect_number(field, value, diagnostics) else {
                return;
            };
            check_number_bounds(field, number, diagnostics);
        }
        FieldType::Boolean => {
            if !value.is_boolean() {
                push_type_error(field, "a boolean", diagnostics);
            }
        }
        FieldType::Select { options } => {
            let Some(text) = expect_string(field, value, diagnostics) else {
                return;
            };
            if !options.is_empty() && !option_exists(options, text) {
                diagnostics.push(Diagnostic::error(
                    field.id.clone(),
                    format!("`{text}` is not one of the allowed options for {}", field.label),
                ));
            }
        }
        FieldType::MultiSelect { options } => {
            let Some(items) = value.as_array() else {
                push_type_error(field, "an array", diagnostics);
                return;
            };
            for item in items {
                let Some(text) = item.as_str() else {
                    push_type_error(field, "an array of strings", diagnostics);
                    return;
                };
                if !options.is_empty() && !option_exists(options, text) {
                    diagnostics.push(Diagnostic::error(
                        field.id.clone(),
                        format!(
                            "`{text}` is not one of the allowed options for {}",
                            field.label
                        ),
                    ));
                }
            }
            check_selection_count(field, items.len(), diagnostics);
        }
        FieldType::Entity => {
            let Some(id) = expect_string(field, value, diagnostics) else {
                return;
            };
            if !catalog.is_empty() && !catalog.contains(id) {
                diagnostics.push(Diagnostic::error(
                    field.id.clone(),
                    format!("unknown entity `{id}`"),
                ));
            }
        }
        FieldType::EntityField => {
            let Some(name) = expect_string(field, value, diagnostics) else {
                return;
            };
            if !catalog.is_empty() && !catalog.any_entity_has_field(name) {
                diagnostics.push(Diagnostic::error(
                    field.id.clone(),
                    format!("no entity has a field named `{name}`"),
                ));
            }
        }
        FieldType::Color => {
            let Some(text) = expect_string(field, value, diagnostics) else {
                return;
            };
            if !is_hex_color(text) {
                diagnostics.push(Diagnostic::error(
                    field.id.clone(),
                    format!("`{text}` is not a hex color like #1f6feb"),
                ));
            }
        }
        FieldType::Range { min, max, .. } => {
            let Some(number) = expect_number(field, value, diagnostics) else {
                return;
            };
            if number < *min || number > *max {
                diagnostics.push(Diagnostic::error(
                    field.id.clone(),
                    format!("{} must be between {min} and {max}", field.label),
                ));
            }
        }
    }
}

fn expect_string<'v>(
    field: &ConfigurationField,
    value: &'v Value,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<&'v str> {
    match value.as_str() {
        Some(s) => Some(s),
        None => {
            push_type_error(field, "a string", diagnostics);
            None
        }
    }
}

fn expect_number(
    field: &ConfigurationField,
    value: &Value,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<f64> {
    match value.as_f64() {
        Some(n) => Some(n),
        None => {
            push_type_error(field, "a number", diagnostics);
            None
        }
    }
}

fn push_type_error(field: &ConfigurationField, expected: &str, diagnostics: &mut Vec<Diagnostic>) {
    diagnostics.push(Diagnostic::error(
        field.id.clone(),
        format!("{} must be {expected}", field.label),
    ));
}

fn option_exists(options: &[SelectOption], value: &str) -> bool {
    options.iter().any(|o| o.value == value)
}

fn check_text_constraints(field: &ConfigurationField, text: &str, diagnostics: &mut Vec<Diagnostic>) {
    let Some(constraints) = &field.validation else {
        return;
    };
    let chars = text.chars().count();
    if let Some(min_length) = constraints.min_length
        && chars < min_length
    {
        diagnostics.push(Diagnostic::error(
            field.id.clone(),
            format!("{} must be at least {min_length} characters", field.label),
        ));
    }
    if let Some(max_length) = constraints.max_length
        && chars > max_length
    {
        diagnostics.push(Diagnostic::error(
            field.id.clone(),
            format!("{} must be at most {max_length} characters", field.label),
        ));
    }
    if let Some(pattern) = &constraints.pattern
        && !literal_pattern_matches(pattern, text)
    {
        diagnostics.push(Diagnostic::error(
            field.id.clone(),
            format!("{} does not match `{pattern}`", field.label),
        ));
    }
}

fn check_number_bounds(field: &ConfigurationField, number: f64, diagnostics: &mut Vec<Diagnostic>) {
    let Some(constraints) = &field.validation else {
        return;
    };
    if let Some(min) = constraints.min
        && number < min
    {
        diagnostics.push(Diagnostic::error(
            field.id.clone(),
            format!("{} must be at least {min}", field.label),
        ));
    }
    if let Some(max) = constraints.max
        && number > max
    {
        diagnostics.push(Diagnostic::error(
            field.id.clone(),
            format!("{} must be at most {max}", field.label),
        ));
    }
}

fn check_selection_count(field: &ConfigurationField, count: usize, diagnostics: &mut Vec<Diagnostic>) {
    let Some(constraints) = &field.validation else {
        return;
    };
    if let Some(min_length) = constraints.min_length
        && count < min_length
    {
        diagnostics.push(Diagnostic::error(
            field.id.clone(),
            format!("{} needs at least {min_length} selections", field.label),
        ));
    }
    if let Some(max_length) = constraints.max_length
        && count > max_length
    {
        diagnostics.push(Diagnostic::error(
            field.id.clone(),
            format!("{} allows at most {max_length} selections", field.label),
        ));
    }
}

/// Literal pattern match: `^` anchors the start, `$` the end, and the rest
/// is compared verbatim. `^abc$` is an exact match, `abc` a substring one.
fn literal_pattern_matches(pattern: &str, value: &str) -> bool {
    let starts = pattern.starts_with('^');
    let ends = pattern.ends_with('$') && pattern.len() > usize::from(starts);
    let needle = &pattern[usize::from(starts)..pattern.len() - usize::from(ends)];
    match (starts, ends) {
        (true, true) => value == needle,
        (true, false) => value.starts_with(needle),
        (false, true) => value.ends_with(needle),
        (false, false) => value.contains(needle),
    }
}

fn is_hex_color(text: &str) -> bool {
    let Some(digits) = text.strip_prefix('#') else {
        return false;
    };
    (digits.len() == 3 || digits.len() == 6) && digits.chars().all(|c| c.is_ascii_hexdigit())
}
