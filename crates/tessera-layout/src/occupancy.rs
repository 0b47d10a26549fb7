#![forbid(unsafe_code)]

//! Cell-ownership index derived from the widget list.
//!
//! Answers "which widget, if any, occupies cell `(row, column)`?" by
//! rebuilding the full mapping from the widget list on every derivation.
//! The index is never stored across mutations; [`CellOwnership::derive`] is
//! the only way to obtain one, so it cannot diverge from the list it was
//! built from. Re-scanning the whole list is intentional simplicity at
//! 12x12 scale.
//!
//! # Invariants
//!
//! 1. Every in-bounds cell covered by some widget has an owner; cells
//!    outside the grid are never indexed.
//! 2. When widgets overlap (legal after a move), the widget later in list
//!    order owns the contested cells.

use rustc_hash::FxHashMap;
use tessera_core::geometry::{GridDimensions, GridPosition};
use tessera_core::widget::{WidgetId, WidgetInstance};

/// Mapping from grid cell to the owning widget.
#[derive(Debug, Clone)]
pub struct CellOwnership {
    cells: FxHashMap<(u16, u16), WidgetId>,
    dims: GridDimensions,
}

impl CellOwnership {
    /// Build the index from the current widget list.
    ///
    /// Walks every widget's covered cells in list order; a later widget
    /// overwrites earlier claims on contested cells. Cells outside `dims`
    /// are skipped.
    #[must_use]
    pub fn derive(widgets: &[WidgetInstance], dims: GridDimensions) -> Self {
        let mut cells = FxHashMap::default();
        for widget in widgets {
            for (row, column) in widget.position.cells() {
                if dims.contains(row, column) {
                    cells.insert((row, column), widget.id.clone());
                }
            }
        }
        Self { cells, dims }
    }

    /// The widget owning `(row, column)`, if any.
    #[must_use]
    pub fn owner_of(&self, row: u16, column: u16) -> Option<&WidgetId> {
        self.cells.get(&(row, column))
    }

    /// Whether the cell is inside the grid and unclaimed.
    #[must_use]
    pub fn is_free(&self, row: u16, column: u16) -> bool {
        self.dims.contains(row, column) && !self.cells.contains_key(&(row, column))
    }

    /// Whether every cell of `position` is inside the grid and unclaimed.
    #[must_use]
    pub fn is_free_rect(&self, position: GridPosition) -> bool {
        position.fits(self.dims) && position.cells().all(|(r, c)| !self.cells.contains_key(&(r, c)))
    }

    /// Number of claimed cells.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.cells.len()
    }

    /// Iterate claimed cells and their owners in arbitrary order.
    pub fn occupied_cells(&self) -> impl Iterator<Item = ((u16, u16), &WidgetId)> {
        self.cells.iter().map(|(&cell, id)| (cell, id))
    }

    /// The grid bounds this index was derived against.
    #[must_use]
    pub const fn dimensions(&self) -> GridDimensions {
        self.dims
    }
}

/// Every pair of widgets whose covered cells intersect, in list order.
#[must_use]
pub fn overlapping_pairs(widgets: &[WidgetInstance]) -> Vec<(&WidgetId, &WidgetId)> {
    let mut pairs = Vec::new();
    for (i, a) in widgets.iter().enumerate() {
        for b in &widgets[i + 1..] {
            if a.position.overlaps(b.position) {
                pairs.push((&a.id, &b.id));
            }
        }
    }
    pairs
}
