#![forbid(unsafe_code)]

//! Grid occupancy and placement for Tessera.
//!
//! The widget list is the single source of truth. [`occupancy`] derives a
//! cell-ownership index from it on demand; [`placement`] scans that index to
//! find free rectangles and performs the move/duplicate/remove transitions.
//! Nothing here stores layout state of its own, so the derived view can
//! never drift from the list.

pub mod occupancy;
pub mod placement;

pub use occupancy::{CellOwnership, overlapping_pairs};
pub use placement::{
    duplicate_widget, find_available_position, layout_diagnostics, move_widget, place_widget,
    remove_widget,
};

pub use tessera_core::geometry::{GridDimensions, GridPosition, GridSpan};
