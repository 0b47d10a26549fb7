#![forbid(unsafe_code)]

//! The editing session: the in-memory widget list and every operation a
//! host surface performs on it.
//!
//! One session owns one screen's widget list, the selection, the drag
//! machine, and the auto-save debounce. The plugin registry and entity
//! catalog are injected at construction (no globals); the host reaches the
//! registry through [`EditorSession::registry_mut`] so a palette and the
//! third-party plugin API observe the same instance.
//!
//! # Validation delivery
//!
//! Diagnostics may be computed away from the session (a host can run a
//! validator off-thread or consult remote state). Each widget carries a
//! validation generation: [`EditorSession::begin_validation`] hands out a
//! token, and [`EditorSession::apply_validation`] stamps results only when
//! the token is still current. Stale deliveries are dropped, so the last
//! started validation wins and racing results cannot interleave.

use crate::autosave::AutosaveTimer;
use crate::drag::{DragDropMachine, DragEffect, DragNoopReason, DragState, DragTransition};
use std::collections::HashMap;
use std::fmt;
use tessera_core::catalog::EntityCatalog;
use tessera_core::diagnostic::Diagnostic;
use tessera_core::geometry::GridDimensions;
use tessera_core::widget::{EntityBinding, WidgetId, WidgetInstance};
use tessera_layout::{
    duplicate_widget, find_available_position, layout_diagnostics, move_widget, place_widget,
    remove_widget,
};
use tessera_plugins::PluginRegistry;

/// Callback invoked with the full widget list when a save fires.
pub type SaveCallback = Box<dyn FnMut(&[WidgetInstance]) + Send>;

/// Errors from session operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorError {
    /// The palette payload named a plugin the registry does not have.
    UnknownKind { kind: String },
}

impl fmt::Display for EditorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownKind { kind } => write!(f, "no registered widget kind `{kind}`"),
        }
    }
}

impl std::error::Error for EditorError {}

/// Keyboard repositioning direction (accessibility parity with pointer
/// drag).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NudgeDirection {
    Up,
    Down,
    Left,
    Right,
}

/// Result of a drop, after the session applied the classified effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// A widget was created and selected.
    Created { widget_id: WidgetId },
    /// An existing widget was repositioned.
    Moved { widget_id: WidgetId },
    /// Nothing changed.
    Ignored { reason: DragNoopReason },
}

/// One screen's editing state.
pub struct EditorSession {
    registry: PluginRegistry,
    catalog: EntityCatalog,
    dims: GridDimensions,
    widgets: Vec<WidgetInstance>,
    selection: Option<WidgetId>,
    drag: DragDropMachine,
    autosave: AutosaveTimer,
    save_callback: Option<SaveCallback>,
    validation_generations: HashMap<WidgetId, u64>,
    next_widget: u64,
}

impl EditorSession {
    /// Create a session over an injected registry and catalog.
    #[must_use]
    pub fn new(registry: PluginRegistry, catalog: EntityCatalog, dims: GridDimensions) -> Self {
        Self {
            registry,
            catalog,
            dims,
            widgets: Vec::new(),
            selection: None,
            drag: DragDropMachine::new(),
            autosave: AutosaveTimer::default(),
            save_callback: None,
            validation_generations: HashMap::new(),
            next_widget: 0,
        }
    }

    /// Install the save callback invoked by auto-save and [`save_now`](Self::save_now).
    #[must_use]
    pub fn with_save_callback(mut self, callback: SaveCallback) -> Self {
        self.save_callback = Some(callback);
        self
    }

    /// Replace the auto-save timer (custom debounce delay).
    #[must_use]
    pub fn with_autosave(mut self, autosave: AutosaveTimer) -> Self {
        self.autosave = autosave;
        self
    }

    // ---- Accessors -------------------------------------------------------

    /// The injected plugin registry.
    #[must_use]
    pub fn registry(&self) -> &PluginRegistry {
        &self.registry
    }

    /// Mutable registry access for the host's plugin API and palette.
    pub fn registry_mut(&mut self) -> &mut PluginRegistry {
        &mut self.registry
    }

    /// The entity catalog currently in use.
    #[must_use]
    pub fn catalog(&self) -> &EntityCatalog {
        &self.catalog
    }

    /// Replace the catalog when the host model changes.
    pub fn set_catalog(&mut self, catalog: EntityCatalog) {
        self.catalog = catalog;
    }

    /// Grid bounds of this session.
    #[must_use]
    pub const fn dimensions(&self) -> GridDimensions {
        self.dims
    }

    /// The widget list, in placement order.
    #[must_use]
    pub fn widgets(&self) -> &[WidgetInstance] {
        &self.widgets
    }

    /// Look up one widget.
    #[must_use]
    pub fn widget(&self, id: &WidgetId) -> Option<&WidgetInstance> {
        self.widgets.iter().find(|w| &w.id == id)
    }

    /// The selected widget, if any.
    #[must_use]
    pub fn selection(&self) -> Option<&WidgetId> {
        self.selection.as_ref()
    }

    /// Select a widget. Returns `false` for unknown ids.
    pub fn select(&mut self, id: &WidgetId) -> bool {
        if self.widget(id).is_some() {
            self.selection = Some(id.clone());
            true
        } else {
            false
        }
    }

    /// Clear the selection.
    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    // ---- Widget operations ----------------------------------------------

    /// Create a widget of the given plugin's kind at exactly `(row, column)`
    /// with the kind's default span and configuration, and select it.
    pub fn place_from_palette(
        &mut self,
        plugin_id: &str,
        row: u16,
        column: u16,
    ) -> Result<WidgetId, EditorError> {
        let Some(plugin) = self.registry.get(plugin_id) else {
            return Err(EditorError::UnknownKind {
                kind: plugin_id.to_string(),
            });
        };
        let kind = plugin.kind.clone();
        let span = plugin.default_span();
        let configuration = plugin.default_configuration();
        let id = self.mint_id();
        place_widget(
            &mut self.widgets,
            id.clone(),
            kind,
            row,
            column,
            span,
            configuration,
        );
        self.selection = Some(id.clone());
        self.note_change("place");
        Ok(id)
    }

    /// Create a widget of the given plugin's kind at the first free
    /// rectangle, and select it.
    pub fn auto_place(&mut self, plugin_id: &str) -> Result<WidgetId, EditorError> {
        let Some(plugin) = self.registry.get(plugin_id) else {
            return Err(EditorError::UnknownKind {
                kind: plugin_id.to_string(),
            });
        };
        let span = plugin.default_span();
        let position = find_available_position(&self.widgets, span, self.dims);
        let kind = plugin.kind.clone();
        let configuration = plugin.default_configuration();
        let id = self.mint_id();
        place_widget(
            &mut self.widgets,
            id.clone(),
            kind,
            position.row,
            position.column,
            span,
            configuration,
        );
        self.selection = Some(id.clone());
        self.note_change("auto-place");
        Ok(id)
    }

    /// Reposition a widget (pointer drop or explicit row/column entry).
    ///
    /// The move is applied as-is; any resulting overlap or boundary
    /// violation shows up in [`layout_diagnostics`](Self::layout_diagnostics).
    pub fn move_widget(&mut self, id: &WidgetId, row: u16, column: u16) -> bool {
        let moved = move_widget(&mut self.widgets, id, row, column);
        if moved {
            self.note_change("move");
        }
        moved
    }

    /// Clone a widget (fresh id, same size and configuration), placed at
    /// the first free rectangle, and select the clone.
    pub fn duplicate(&mut self, id: &WidgetId) -> Option<WidgetId> {
        let new_id = self.mint_id();
        let created =
            duplicate_widget(&mut self.widgets, id, new_id.clone(), self.dims).is_some();
        if !created {
            return None;
        }
        self.selection = Some(new_id.clone());
        self.note_change("duplicate");
        Some(new_id)
    }

    /// Delete a widget, clearing the selection if it pointed there.
    pub fn remove(&mut self, id: &WidgetId) -> bool {
        let removed = remove_widget(&mut self.widgets, id);
        if removed {
            if self.selection.as_ref() == Some(id) {
                self.selection = None;
            }
            self.validation_generations.remove(id);
            self.note_change("remove");
        }
        removed
    }

    /// Move a widget one cell in the given direction, keeping its full
    /// rectangle inside the grid. A nudge at the edge is a silent no-op.
    pub fn nudge(&mut self, id: &WidgetId, direction: NudgeDirection) -> bool {
        let Some(widget) = self.widgets.iter().find(|w| &w.id == id) else {
            return false;
        };
        let pos = widget.position;
        let down = pos.row.saturating_add(1);
        let right = pos.column.saturating_add(1);
        let target = match direction {
            NudgeDirection::Up if pos.row > 0 => Some((pos.row - 1, pos.column)),
            NudgeDirection::Down if pos.moved_to(down, pos.column).fits(self.dims) => {
                Some((down, pos.column))
            }
            NudgeDirection::Left if pos.column > 0 => Some((pos.row, pos.column - 1)),
            NudgeDirection::Right if pos.moved_to(pos.row, right).fits(self.dims) => {
                Some((pos.row, right))
            }
            _ => None,
        };
        match target {
            Some((row, column)) => self.move_widget(id, row, column),
            None => false,
        }
    }

    /// Replace a widget's configuration value.
    pub fn update_configuration(&mut self, id: &WidgetId, configuration: serde_json::Value) -> bool {
        let Some(widget) = self.widgets.iter_mut().find(|w| &w.id == id) else {
            return false;
        };
        widget.configuration = configuration;
        self.note_change("configure");
        true
    }

    /// Set or clear a widget's entity binding.
    pub fn set_entity_binding(&mut self, id: &WidgetId, binding: Option<EntityBinding>) -> bool {
        let Some(widget) = self.widgets.iter_mut().find(|w| &w.id == id) else {
            return false;
        };
        widget.entity_binding = binding;
        self.note_change("bind");
        true
    }

    // ---- Validation ------------------------------------------------------

    /// Validate a widget's configuration synchronously and stamp the
    /// result. Returns `false` for unknown ids.
    pub fn validate_widget(&mut self, id: &WidgetId) -> bool {
        let Some(widget) = self.widget(id) else {
            return false;
        };
        let kind = widget.kind.clone();
        let configuration = widget.configuration.clone();
        let Some(token) = self.begin_validation(id) else {
            return false;
        };
        // Resolve the kind back to its plugin id; third-party plugins may
        // register under a namespaced id distinct from the kind name.
        let plugin_id = self
            .registry
            .get(&kind)
            .or_else(|| self.registry.get_by_kind(&kind))
            .map(|p| p.id.clone())
            .unwrap_or(kind);
        let diagnostics =
            self.registry
                .validate_configuration(&plugin_id, &configuration, &self.catalog);
        self.apply_validation(id, token, diagnostics)
    }

    /// Start a validation round for a widget and get its delivery token.
    ///
    /// Returns `None` for unknown ids. Starting a new round invalidates
    /// every token handed out before it.
    pub fn begin_validation(&mut self, id: &WidgetId) -> Option<u64> {
        self.widget(id)?;
        let generation = self
            .validation_generations
            .entry(id.clone())
            .and_modify(|g| *g += 1)
            .or_insert(1);
        Some(*generation)
    }

    /// Deliver diagnostics for a validation round.
    ///
    /// Stamps the widget and returns `true` only when `token` is still the
    /// current generation; stale deliveries are dropped so the last started
    /// round wins.
    pub fn apply_validation(
        &mut self,
        id: &WidgetId,
        token: u64,
        diagnostics: Vec<Diagnostic>,
    ) -> bool {
        if self.validation_generations.get(id) != Some(&token) {
            tracing::trace!(widget = %id, token, "dropping stale validation result");
            return false;
        }
        let Some(widget) = self.widgets.iter_mut().find(|w| &w.id == id) else {
            return false;
        };
        widget.diagnostics = diagnostics;
        true
    }

    /// Boundary and overlap findings for the whole widget list.
    #[must_use]
    pub fn layout_diagnostics(&self) -> Vec<Diagnostic> {
        layout_diagnostics(&self.widgets, self.dims)
    }

    // ---- Drag/drop -------------------------------------------------------

    /// Begin dragging a palette entry.
    pub fn begin_palette_drag(&mut self, plugin_id: &str) -> DragTransition {
        self.drag.begin_palette_drag(plugin_id)
    }

    /// Begin dragging an existing canvas widget.
    pub fn begin_canvas_drag(&mut self, widget_id: WidgetId) -> DragTransition {
        self.drag.begin_canvas_drag(widget_id)
    }

    /// Drop the active drag on a grid cell and apply the classified effect.
    pub fn drop_on_cell(&mut self, row: u16, column: u16) -> Result<DropOutcome, EditorError> {
        let transition = self.drag.drop_on_cell(row, column, self.dims);
        match transition.effect {
            DragEffect::CreateRequested {
                plugin_id,
                row,
                column,
            } => {
                let widget_id = self.place_from_palette(&plugin_id, row, column)?;
                Ok(DropOutcome::Created { widget_id })
            }
            DragEffect::MoveRequested {
                widget_id,
                row,
                column,
            } => {
                if self.move_widget(&widget_id, row, column) {
                    Ok(DropOutcome::Moved { widget_id })
                } else {
                    Ok(DropOutcome::Ignored {
                        reason: DragNoopReason::MissingWidget,
                    })
                }
            }
            DragEffect::Noop { reason } => Ok(DropOutcome::Ignored { reason }),
            // Starts and cancels are not produced by a drop.
            DragEffect::Started { .. } | DragEffect::Cancelled => Ok(DropOutcome::Ignored {
                reason: DragNoopReason::NoActiveDrag,
            }),
        }
    }

    /// Drop on no target; the drag is discarded.
    pub fn drop_outside(&mut self) -> DragTransition {
        self.drag.drop_outside()
    }

    /// Cancel the active drag.
    pub fn cancel_drag(&mut self) -> DragTransition {
        self.drag.cancel()
    }

    /// Current drag lifecycle state.
    #[must_use]
    pub fn drag_state(&self) -> &DragState {
        self.drag.state()
    }

    // ---- Saving ----------------------------------------------------------

    /// Advance the auto-save debounce by one tick, saving when it fires.
    /// Returns `true` when a save ran.
    pub fn tick(&mut self) -> bool {
        if self.autosave.tick() {
            self.flush_save();
            true
        } else {
            false
        }
    }

    /// Save immediately and disarm the pending auto-save.
    pub fn save_now(&mut self) {
        self.autosave.cancel();
        self.flush_save();
    }

    /// Whether an auto-save is pending.
    #[must_use]
    pub fn autosave_armed(&self) -> bool {
        self.autosave.is_armed()
    }

    /// Tear the session down: cancel the pending auto-save and the active
    /// drag so nothing fires after the editor closed.
    pub fn close(&mut self) {
        self.autosave.cancel();
        self.drag.cancel();
    }

    fn flush_save(&mut self) {
        if let Some(callback) = &mut self.save_callback {
            tracing::debug!(widgets = self.widgets.len(), "saving widget list");
            callback(&self.widgets);
        }
    }

    fn note_change(&mut self, operation: &'static str) {
        tracing::trace!(operation, widgets = self.widgets.len(), "widget list changed");
        self.autosave.note_change();
    }

    fn mint_id(&mut self) -> WidgetId {
        self.next_widget += 1;
        WidgetId::new(format!("w-{}", self.next_widget))
    }
}

impl fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditorSession")
            .field("widgets", &self.widgets.len())
            .field("selection", &self.selection)
            .field("dims", &self.dims)
            .field("drag", &self.drag)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tessera_core::catalog::{EntityDescriptor, FieldDescriptor};

    fn catalog() -> EntityCatalog {
        EntityCatalog::new(vec![
            EntityDescriptor::new("e-orders", "orders")
                .with_field(FieldDescriptor::new("f-1", "id", "uuid")),
        ])
    }

    fn session() -> EditorSession {
        EditorSession::new(
            PluginRegistry::with_builtins(),
            catalog(),
            GridDimensions::default(),
        )
    }

    // ---- Placement and selection ----

    #[test]
    fn place_from_palette_uses_kind_defaults_and_selects() {
        let mut s = session();
        let id = s.place_from_palette("data_grid", 0, 0).unwrap();
        let widget = s.widget(&id).unwrap();
        assert_eq!(widget.kind, "data_grid");
        assert_eq!(widget.position.row_span(), 4);
        assert_eq!(widget.position.col_span(), 6);
        assert_eq!(widget.configuration["page_size"], 25);
        assert_eq!(s.selection(), Some(&id));
    }

    #[test]
    fn place_unknown_kind_is_an_error() {
        let mut s = session();
        assert_eq!(
            s.place_from_palette("hologram", 0, 0),
            Err(EditorError::UnknownKind {
                kind: "hologram".to_string()
            })
        );
        assert!(s.widgets().is_empty());
    }

    #[test]
    fn ids_are_unique_and_sequential() {
        let mut s = session();
        let a = s.place_from_palette("button", 0, 0).unwrap();
        let b = s.place_from_palette("button", 2, 0).unwrap();
        assert_ne!(a, b);
        assert_eq!(a.as_str(), "w-1");
        assert_eq!(b.as_str(), "w-2");
    }

    #[test]
    fn auto_place_avoids_occupied_cells() {
        let mut s = session();
        s.place_from_palette("data_grid", 0, 0).unwrap();
        let form = s.auto_place("form").unwrap();
        let pos = s.widget(&form).unwrap().position;
        assert_eq!((pos.row, pos.column), (0, 6));
    }

    #[test]
    fn remove_clears_matching_selection() {
        let mut s = session();
        let id = s.place_from_palette("text", 0, 0).unwrap();
        assert_eq!(s.selection(), Some(&id));
        assert!(s.remove(&id));
        assert!(s.selection().is_none());
        assert!(!s.remove(&id));
    }

    #[test]
    fn remove_keeps_unrelated_selection() {
        let mut s = session();
        let a = s.place_from_palette("text", 0, 0).unwrap();
        let b = s.place_from_palette("text", 2, 0).unwrap();
        s.select(&b);
        assert!(s.remove(&a));
        assert_eq!(s.selection(), Some(&b));
    }

    #[test]
    fn duplicate_selects_the_clone() {
        let mut s = session();
        let id = s.place_from_palette("data_grid", 0, 0).unwrap();
        let clone = s.duplicate(&id).unwrap();
        assert_ne!(id, clone);
        assert_eq!(s.selection(), Some(&clone));
        let a = s.widget(&id).unwrap().position;
        let b = s.widget(&clone).unwrap().position;
        assert!(!a.overlaps(b));
    }

    // ---- Keyboard repositioning ----

    #[test]
    fn nudge_moves_one_cell() {
        let mut s = session();
        let id = s.place_from_palette("button", 5, 5).unwrap();
        assert!(s.nudge(&id, NudgeDirection::Up));
        assert!(s.nudge(&id, NudgeDirection::Left));
        let pos = s.widget(&id).unwrap().position;
        assert_eq!((pos.row, pos.column), (4, 4));
    }

    #[test]
    fn nudge_stops_at_the_edges() {
        let mut s = session();
        // Button is 1x2; at the top-left corner no up/left nudge applies.
        let id = s.place_from_palette("button", 0, 0).unwrap();
        assert!(!s.nudge(&id, NudgeDirection::Up));
        assert!(!s.nudge(&id, NudgeDirection::Left));
        // At column 10 a 1x2 widget touches the right edge.
        assert!(s.move_widget(&id, 0, 10));
        assert!(!s.nudge(&id, NudgeDirection::Right));
        assert_eq!(s.widget(&id).unwrap().position.column, 10);
    }

    #[test]
    fn nudge_unknown_widget_is_false() {
        let mut s = session();
        assert!(!s.nudge(&WidgetId::from("ghost"), NudgeDirection::Down));
    }

    // ---- Validation ----

    #[test]
    fn validate_widget_stamps_diagnostics() {
        let mut s = session();
        let id = s.place_from_palette("data_grid", 0, 0).unwrap();
        assert!(s.validate_widget(&id));
        let widget = s.widget(&id).unwrap();
        // Default data grid has an unbound entity and zero columns.
        assert!(widget.has_errors());
        assert_eq!(widget.diagnostics.len(), 2);
    }

    #[test]
    fn stale_validation_delivery_is_dropped() {
        let mut s = session();
        let id = s.place_from_palette("text", 0, 0).unwrap();
        let first = s.begin_validation(&id).unwrap();
        let second = s.begin_validation(&id).unwrap();
        assert!(first < second);
        // The older round resolves late; its result must not land.
        assert!(!s.apply_validation(&id, first, vec![Diagnostic::error("content", "stale")]));
        assert!(s.widget(&id).unwrap().diagnostics.is_empty());
        // The newest round still applies.
        assert!(s.apply_validation(&id, second, vec![Diagnostic::info("content", "fresh")]));
        assert_eq!(s.widget(&id).unwrap().diagnostics[0].message, "fresh");
    }

    #[test]
    fn validation_after_unregister_reports_unknown_plugin() {
        let mut s = session();
        let id = s.place_from_palette("form", 0, 0).unwrap();
        s.registry_mut().unregister("form");
        assert!(s.validate_widget(&id));
        let widget = s.widget(&id).unwrap();
        assert_eq!(widget.diagnostics.len(), 1);
        assert_eq!(widget.diagnostics[0].field, "plugin");
    }

    // ---- Saving ----

    #[test]
    fn autosave_debounces_and_fires_once() {
        let saves = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&saves);
        let mut s = EditorSession::new(
            PluginRegistry::with_builtins(),
            catalog(),
            GridDimensions::default(),
        )
        .with_save_callback(Box::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        s.place_from_palette("text", 0, 0).unwrap();
        assert!(!s.tick());
        assert!(!s.tick());
        // A further change rewinds the debounce.
        s.move_widget(&WidgetId::from("w-1"), 1, 1);
        assert!(!s.tick());
        assert!(!s.tick());
        assert!(s.tick());
        assert_eq!(saves.load(Ordering::SeqCst), 1);
        // No change since the save: no further fires.
        for _ in 0..5 {
            assert!(!s.tick());
        }
        assert_eq!(saves.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn close_cancels_pending_autosave() {
        let saves = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&saves);
        let mut s = EditorSession::new(
            PluginRegistry::with_builtins(),
            catalog(),
            GridDimensions::default(),
        )
        .with_save_callback(Box::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        s.place_from_palette("text", 0, 0).unwrap();
        s.close();
        for _ in 0..5 {
            assert!(!s.tick());
        }
        assert_eq!(saves.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn save_now_flushes_and_disarms() {
        let saves = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&saves);
        let mut s = EditorSession::new(
            PluginRegistry::with_builtins(),
            catalog(),
            GridDimensions::default(),
        )
        .with_save_callback(Box::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        s.place_from_palette("text", 0, 0).unwrap();
        s.save_now();
        assert_eq!(saves.load(Ordering::SeqCst), 1);
        assert!(!s.autosave_armed());
    }
}
