#![forbid(unsafe_code)]

//! Core types for Tessera: grid geometry, the widget instance model,
//! validation diagnostics, and the read-only entity catalog supplied by the
//! host application.
//!
//! This crate carries no behavior beyond what the types themselves need;
//! placement, validation, and interaction logic live in `tessera-layout`,
//! `tessera-plugins`, and `tessera-editor`.

pub mod catalog;
pub mod diagnostic;
pub mod geometry;
pub mod widget;

pub use catalog::{EntityCatalog, EntityDescriptor, FieldDescriptor};
pub use diagnostic::{Diagnostic, Severity};
pub use geometry::{GeometryError, GridDimensions, GridPosition, GridSpan};
pub use widget::{EntityBinding, WidgetCategory, WidgetId, WidgetInstance};
