#![forbid(unsafe_code)]

//! Tessera public facade crate.
//!
//! Re-exports the stable surface area of the grid composition core: the
//! data model (`tessera-core`), the placement engine (`tessera-layout`),
//! the widget-kind registry (`tessera-plugins`), and the editing runtime
//! (`tessera-editor`). Hosts that want just one dependency use this crate
//! and its [`prelude`].

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use tessera_core::catalog::{EntityCatalog, EntityDescriptor, FieldDescriptor};
pub use tessera_core::diagnostic::{Diagnostic, Severity, max_severity};
pub use tessera_core::geometry::{GeometryError, GridDimensions, GridPosition, GridSpan};
pub use tessera_core::widget::{EntityBinding, WidgetCategory, WidgetId, WidgetInstance};

// --- Layout re-exports -----------------------------------------------------

pub use tessera_layout::{
    CellOwnership, duplicate_widget, find_available_position, layout_diagnostics, move_widget,
    overlapping_pairs, place_widget, remove_widget,
};

// --- Plugin re-exports -----------------------------------------------------

pub use tessera_plugins::{
    BuiltinKind, ComponentPlugin, ConditionOperator, ConfigurationField, ConfigurationSchema,
    FieldConstraints, FieldType, PluginRegistry, RegistryError, RegistryEvent, RegistryWatcher,
    SchemaSection, SelectOption, VisibilityCondition, WidgetBehavior, validate_against_schema,
};

// --- Editor re-exports -----------------------------------------------------

pub use tessera_editor::{
    AutosaveError, AutosaveTimer, DEFAULT_AUTOSAVE_DELAY_TICKS, DragDropMachine, DragEffect,
    DragNoopReason, DragSource, DragState, DragTransition, DropOutcome, EditorError, EditorSession,
    NudgeDirection, SaveCallback, validate_document,
};

// --- Errors ----------------------------------------------------------------

/// Top-level error type for hosts that funnel every fallible call through
/// one `Result`.
#[derive(Debug)]
pub enum Error {
    /// Invalid grid geometry.
    Geometry(GeometryError),
    /// Plugin registration failure.
    Registry(RegistryError),
    /// Editing session failure.
    Editor(EditorError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Geometry(err) => write!(f, "{err}"),
            Self::Registry(err) => write!(f, "{err}"),
            Self::Editor(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<GeometryError> for Error {
    fn from(err: GeometryError) -> Self {
        Self::Geometry(err)
    }
}

impl From<RegistryError> for Error {
    fn from(err: RegistryError) -> Self {
        Self::Registry(err)
    }
}

impl From<EditorError> for Error {
    fn from(err: EditorError) -> Self {
        Self::Editor(err)
    }
}

/// Standard result type for Tessera APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude ---------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Diagnostic, EditorSession, EntityCatalog, Error, GridDimensions, GridPosition, GridSpan,
        NudgeDirection, PluginRegistry, Result, Severity, WidgetCategory, WidgetId,
        WidgetInstance,
    };
}
