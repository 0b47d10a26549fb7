#![forbid(unsafe_code)]

//! Grid geometry primitives.
//!
//! The placement grid is a bounded matrix of cells addressed by
//! `(row, column)`, 0-indexed with the origin at the top-left. A widget
//! occupies an axis-aligned rectangle of cells described by a
//! [`GridPosition`].
//!
//! # Invariants
//!
//! 1. [`GridDimensions`] are never zero on either axis (enforced by
//!    [`GridDimensions::new`]).
//! 2. A [`GridSpan`] covers at least one cell on each axis (enforced by
//!    [`GridSpan::new`]).
//! 3. A [`GridPosition`] may extend past the grid edge. Out-of-bounds
//!    positions are representable on purpose: boundary violations are
//!    reported as diagnostics by the layout crate, not rejected at
//!    construction, so a user can keep editing and fix them later.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Errors from constructing grid geometry values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryError {
    /// Grid dimensions must be non-zero on both axes.
    ZeroDimension { rows: u16, columns: u16 },
    /// A span must cover at least one cell on both axes.
    ZeroSpan { rows: u16, columns: u16 },
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroDimension { rows, columns } => {
                write!(f, "grid dimensions {rows}x{columns} must be non-zero")
            }
            Self::ZeroSpan { rows, columns } => {
                write!(f, "span {rows}x{columns} must cover at least one cell")
            }
        }
    }
}

impl std::error::Error for GeometryError {}

/// Bounds of the placement grid.
///
/// Defaults to 12x12, the standard composition grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridDimensions {
    rows: u16,
    columns: u16,
}

impl GridDimensions {
    /// Create grid dimensions, rejecting zero on either axis.
    pub fn new(rows: u16, columns: u16) -> Result<Self, GeometryError> {
        if rows == 0 || columns == 0 {
            return Err(GeometryError::ZeroDimension { rows, columns });
        }
        Ok(Self { rows, columns })
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(self) -> u16 {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub const fn columns(self) -> u16 {
        self.columns
    }

    /// Whether `(row, column)` addresses a cell inside the grid.
    #[must_use]
    pub const fn contains(self, row: u16, column: u16) -> bool {
        row < self.rows && column < self.columns
    }
}

impl Default for GridDimensions {
    fn default() -> Self {
        Self {
            rows: 12,
            columns: 12,
        }
    }
}

/// The size of a widget rectangle in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSpan {
    rows: u16,
    columns: u16,
}

impl GridSpan {
    /// Create a span, rejecting zero on either axis.
    pub fn new(rows: u16, columns: u16) -> Result<Self, GeometryError> {
        if rows == 0 || columns == 0 {
            return Err(GeometryError::ZeroSpan { rows, columns });
        }
        Ok(Self { rows, columns })
    }

    /// Rows covered (always > 0).
    #[must_use]
    pub const fn rows(self) -> u16 {
        self.rows
    }

    /// Columns covered (always > 0).
    #[must_use]
    pub const fn columns(self) -> u16 {
        self.columns
    }

    /// Cells covered.
    #[must_use]
    pub const fn area(self) -> u32 {
        self.rows as u32 * self.columns as u32
    }
}

impl Default for GridSpan {
    fn default() -> Self {
        Self {
            rows: 1,
            columns: 1,
        }
    }
}

/// A placed widget rectangle: top-left cell plus span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridPosition {
    /// Top row (inclusive).
    pub row: u16,
    /// Left column (inclusive).
    pub column: u16,
    span: GridSpan,
}

impl GridPosition {
    /// Place a span at the given top-left cell.
    #[must_use]
    pub const fn new(row: u16, column: u16, span: GridSpan) -> Self {
        Self { row, column, span }
    }

    /// The span of this rectangle.
    #[must_use]
    pub const fn span(self) -> GridSpan {
        self.span
    }

    /// Rows covered.
    #[must_use]
    pub const fn row_span(self) -> u16 {
        self.span.rows
    }

    /// Columns covered.
    #[must_use]
    pub const fn col_span(self) -> u16 {
        self.span.columns
    }

    /// Row just past the bottom edge (exclusive).
    #[must_use]
    pub const fn bottom(self) -> u16 {
        self.row.saturating_add(self.span.rows)
    }

    /// Column just past the right edge (exclusive).
    #[must_use]
    pub const fn right(self) -> u16 {
        self.column.saturating_add(self.span.columns)
    }

    /// The same span with a new top-left cell.
    #[must_use]
    pub const fn moved_to(self, row: u16, column: u16) -> Self {
        Self {
            row,
            column,
            span: self.span,
        }
    }

    /// Whether a cell lies inside this rectangle.
    #[must_use]
    pub const fn covers(self, row: u16, column: u16) -> bool {
        row >= self.row && row < self.bottom() && column >= self.column && column < self.right()
    }

    /// Whether the full rectangle lies inside the grid.
    #[must_use]
    pub const fn fits(self, dims: GridDimensions) -> bool {
        self.bottom() <= dims.rows() && self.right() <= dims.columns()
    }

    /// Whether the covered cell sets of two rectangles intersect.
    #[must_use]
    pub const fn overlaps(self, other: GridPosition) -> bool {
        self.row < other.bottom()
            && other.row < self.bottom()
            && self.column < other.right()
            && other.column < self.right()
    }

    /// Iterate the covered `(row, column)` cells in row-major order.
    pub fn cells(self) -> impl Iterator<Item = (u16, u16)> {
        (self.row..self.bottom())
            .flat_map(move |r| (self.column..self.right()).map(move |c| (r, c)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(rows: u16, columns: u16) -> GridSpan {
        GridSpan::new(rows, columns).unwrap()
    }

    // ---- Construction ----

    #[test]
    fn dimensions_default_is_12x12() {
        let dims = GridDimensions::default();
        assert_eq!(dims.rows(), 12);
        assert_eq!(dims.columns(), 12);
    }

    #[test]
    fn dimensions_reject_zero() {
        assert!(matches!(
            GridDimensions::new(0, 12),
            Err(GeometryError::ZeroDimension { rows: 0, columns: 12 })
        ));
        assert!(matches!(
            GridDimensions::new(12, 0),
            Err(GeometryError::ZeroDimension { .. })
        ));
    }

    #[test]
    fn span_rejects_zero() {
        assert!(matches!(
            GridSpan::new(0, 3),
            Err(GeometryError::ZeroSpan { .. })
        ));
        assert!(matches!(
            GridSpan::new(3, 0),
            Err(GeometryError::ZeroSpan { .. })
        ));
    }

    #[test]
    fn span_area() {
        assert_eq!(span(4, 6).area(), 24);
        assert_eq!(GridSpan::default().area(), 1);
    }

    // ---- Coverage ----

    #[test]
    fn covers_edges_are_half_open() {
        let pos = GridPosition::new(2, 3, span(4, 5));
        assert!(pos.covers(2, 3));
        assert!(pos.covers(5, 7));
        assert!(!pos.covers(6, 3));
        assert!(!pos.covers(2, 8));
    }

    #[test]
    fn cells_row_major() {
        let pos = GridPosition::new(1, 2, span(2, 2));
        let cells: Vec<_> = pos.cells().collect();
        assert_eq!(cells, vec![(1, 2), (1, 3), (2, 2), (2, 3)]);
    }

    #[test]
    fn cells_count_matches_area() {
        let pos = GridPosition::new(0, 0, span(4, 6));
        assert_eq!(pos.cells().count() as u32, pos.span().area());
    }

    // ---- Bounds ----

    #[test]
    fn fits_inside_grid() {
        let dims = GridDimensions::default();
        assert!(GridPosition::new(0, 0, span(12, 12)).fits(dims));
        assert!(GridPosition::new(8, 6, span(4, 6)).fits(dims));
    }

    #[test]
    fn fits_rejects_overflow() {
        // Row 10 + span 4 > 12 rows.
        let dims = GridDimensions::default();
        assert!(!GridPosition::new(10, 0, span(4, 2)).fits(dims));
        assert!(!GridPosition::new(0, 11, span(1, 2)).fits(dims));
    }

    // ---- Overlap ----

    #[test]
    fn overlaps_is_cell_intersection() {
        let a = GridPosition::new(0, 0, span(4, 6));
        let b = GridPosition::new(3, 5, span(2, 2));
        let c = GridPosition::new(4, 0, span(2, 2));
        assert!(a.overlaps(b));
        assert!(b.overlaps(a));
        assert!(!a.overlaps(c));
    }

    #[test]
    fn adjacent_rectangles_do_not_overlap() {
        let a = GridPosition::new(0, 0, span(2, 2));
        let right = GridPosition::new(0, 2, span(2, 2));
        let below = GridPosition::new(2, 0, span(2, 2));
        assert!(!a.overlaps(right));
        assert!(!a.overlaps(below));
    }

    #[test]
    fn overlap_agrees_with_cell_sets() {
        let a = GridPosition::new(1, 1, span(3, 4));
        let b = GridPosition::new(3, 4, span(2, 2));
        let cells_a: std::collections::HashSet<_> = a.cells().collect();
        let intersects = b.cells().any(|c| cells_a.contains(&c));
        assert_eq!(a.overlaps(b), intersects);
    }

    // ---- Moves ----

    #[test]
    fn moved_to_keeps_span() {
        let pos = GridPosition::new(0, 0, span(4, 6)).moved_to(5, 2);
        assert_eq!(pos.row, 5);
        assert_eq!(pos.column, 2);
        assert_eq!(pos.row_span(), 4);
        assert_eq!(pos.col_span(), 6);
    }

    // ---- Serde ----

    #[test]
    fn position_round_trips() {
        let pos = GridPosition::new(2, 3, span(4, 6));
        let json = serde_json::to_string(&pos).unwrap();
        let back: GridPosition = serde_json::from_str(&json).unwrap();
        assert_eq!(pos, back);
    }

    #[test]
    fn error_display() {
        let err = GeometryError::ZeroSpan { rows: 0, columns: 3 };
        assert!(err.to_string().contains("0x3"));
    }
}
