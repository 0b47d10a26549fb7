#![forbid(unsafe_code)]

//! Placement engine: free-rectangle search and widget list transitions.
//!
//! All operations are plain functions over the widget list; the list stays
//! the single source of truth and occupancy is re-derived per call.
//!
//! # Placement policy
//!
//! - [`find_available_position`] scans in row-major order and returns the
//!   first rectangle whose cells are all free, so identical inputs always
//!   yield identical results. When nothing fits it falls back to the origin
//!   with the requested span; the caller gets an overlapping rectangle and
//!   [`layout_diagnostics`] will surface the conflict.
//! - [`place_widget`] accepts the dropped cell as-is, without a collision
//!   re-check. The drop target is whatever cell the pointer was over;
//!   forcing auto-layout there would fight direct manipulation.
//! - [`move_widget`] updates only the origin and never rejects or
//!   auto-corrects: a move onto occupied cells is permitted, and the
//!   resulting overlap is reported by [`layout_diagnostics`] instead.
//! - [`duplicate_widget`] places the clone via the free-rectangle scan, so
//!   duplication never introduces overlap.

use crate::occupancy::{CellOwnership, overlapping_pairs};
use tessera_core::diagnostic::Diagnostic;
use tessera_core::geometry::{GridDimensions, GridPosition, GridSpan};
use tessera_core::widget::{WidgetId, WidgetInstance};

/// First free rectangle of `span` cells in row-major scan order.
///
/// Falls back to the origin with the requested span when no free rectangle
/// exists (including when the span is larger than the grid).
#[must_use]
pub fn find_available_position(
    widgets: &[WidgetInstance],
    span: GridSpan,
    dims: GridDimensions,
) -> GridPosition {
    let occupancy = CellOwnership::derive(widgets, dims);
    if span.rows() <= dims.rows() && span.columns() <= dims.columns() {
        for row in 0..=dims.rows() - span.rows() {
            for column in 0..=dims.columns() - span.columns() {
                let candidate = GridPosition::new(row, column, span);
                if occupancy.is_free_rect(candidate) {
                    return candidate;
                }
            }
        }
    }
    GridPosition::new(0, 0, span)
}

/// Create a widget at exactly the dropped cell and append it to the list.
///
/// No collision check is performed at the drop cell; see the module policy.
pub fn place_widget(
    widgets: &mut Vec<WidgetInstance>,
    id: WidgetId,
    kind: impl Into<String>,
    row: u16,
    column: u16,
    span: GridSpan,
    configuration: serde_json::Value,
) -> &WidgetInstance {
    let instance = WidgetInstance::new(id, kind, GridPosition::new(row, column, span), configuration);
    widgets.push(instance);
    // Just pushed, so the list is non-empty.
    &widgets[widgets.len() - 1]
}

/// Update the origin of the matching widget, keeping its span.
///
/// Returns `false` when no widget has the given id. Never checks overlap.
pub fn move_widget(widgets: &mut [WidgetInstance], id: &WidgetId, row: u16, column: u16) -> bool {
    match widgets.iter_mut().find(|w| &w.id == id) {
        Some(widget) => {
            widget.position = widget.position.moved_to(row, column);
            true
        }
        None => false,
    }
}

/// Clone the matching widget under `new_id`, placed at the first free
/// rectangle of the same span.
///
/// Configuration, entity binding, and breakpoint overrides are copied;
/// diagnostics are not (the clone has not been validated yet). Returns the
/// new instance, or `None` when the source id is unknown.
pub fn duplicate_widget<'a>(
    widgets: &'a mut Vec<WidgetInstance>,
    source: &WidgetId,
    new_id: WidgetId,
    dims: GridDimensions,
) -> Option<&'a WidgetInstance> {
    let original = widgets.iter().find(|w| &w.id == source)?.clone();
    let position = find_available_position(widgets, original.position.span(), dims);
    let mut clone = WidgetInstance::new(new_id, original.kind, position, original.configuration);
    clone.entity_binding = original.entity_binding;
    clone.breakpoint_overrides = original.breakpoint_overrides;
    widgets.push(clone);
    Some(&widgets[widgets.len() - 1])
}

/// Remove the matching widget. Returns `false` when the id is unknown.
pub fn remove_widget(widgets: &mut Vec<WidgetInstance>, id: &WidgetId) -> bool {
    let before = widgets.len();
    widgets.retain(|w| &w.id != id);
    widgets.len() != before
}

/// Layout findings for the whole list: boundary violations as errors,
/// overlapping pairs as warnings.
///
/// A widget extending past the grid edge is reported, not rejected; the
/// user can still save and fix it later.
#[must_use]
pub fn layout_diagnostics(widgets: &[WidgetInstance], dims: GridDimensions) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for widget in widgets {
        let pos = widget.position;
        if pos.bottom() > dims.rows() {
            diagnostics.push(Diagnostic::error(
                "position",
                format!(
                    "widget {} extends past the bottom edge: row {} + span {} exceeds {} rows",
                    widget.id,
                    pos.row,
                    pos.row_span(),
                    dims.rows()
                ),
            ));
        }
        if pos.right() > dims.columns() {
            diagnostics.push(Diagnostic::error(
                "position",
                format!(
                    "widget {} extends past the right edge: column {} + span {} exceeds {} columns",
                    widget.id,
                    pos.column,
                    pos.col_span(),
                    dims.columns()
                ),
            ));
        }
    }
    for (a, b) in overlapping_pairs(widgets) {
        diagnostics.push(Diagnostic::warning(
            "position",
            format!("widgets {a} and {b} occupy overlapping cells"),
        ));
    }
    diagnostics
}
