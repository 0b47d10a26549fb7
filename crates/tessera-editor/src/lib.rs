#![forbid(unsafe_code)]

//! The Tessera editing runtime: session state, drag/drop interaction, and
//! auto-save.
//!
//! An [`session::EditorSession`] is the single mutator of one screen's
//! widget list. Pointer drags flow through the [`drag::DragDropMachine`];
//! keyboard users reach the same operations through
//! [`session::EditorSession::nudge`] and explicit repositioning. Saving is
//! debounced by the tick-driven [`autosave::AutosaveTimer`] and delivered
//! to the host's save callback. [`document::validate_document`] guards the
//! import boundary for whole model exports.

pub mod autosave;
pub mod document;
pub mod drag;
pub mod session;

pub use autosave::{AutosaveError, AutosaveTimer, DEFAULT_AUTOSAVE_DELAY_TICKS};
pub use document::validate_document;
pub use drag::{
    DragDropMachine, DragEffect, DragNoopReason, DragSource, DragState, DragTransition,
};
pub use session::{DropOutcome, EditorError, EditorSession, NudgeDirection, SaveCallback};
