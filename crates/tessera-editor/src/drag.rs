#![forbid(unsafe_code)]

//! Deterministic drag/drop lifecycle machine.
//!
//! ```text
//! Idle -> Dragging(source) -> Idle (dropped on a cell)
//!                          -> Idle (dropped on nothing / cancelled)
//! ```
//!
//! A drag starts from the palette (payload: plugin id) or from a widget
//! already on the canvas (payload: widget id). Drop targets are grid cells
//! only. The machine classifies each event into an explicit [`DragEffect`];
//! it never touches the widget list itself, so the session applies create/
//! move requests and maps failures to their own no-op reasons. Every
//! safely-ignored event is an explicit `Noop` with a reason instead of a
//! silent branch.

use tessera_core::geometry::GridDimensions;
use tessera_core::widget::WidgetId;

/// What is being dragged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragSource {
    /// A palette entry; dropping creates a widget of this plugin's kind.
    Palette { plugin_id: String },
    /// An existing canvas widget; dropping repositions it.
    Canvas { widget_id: WidgetId },
}

/// Lifecycle state of the interaction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        source: DragSource,
    },
}

/// Why an event was safely ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragNoopReason {
    /// Drop or cancel arrived with no drag in progress.
    NoActiveDrag,
    /// A second drag start arrived while one was active.
    DragAlreadyActive,
    /// The drop landed outside any grid cell.
    OutsideGrid,
    /// The dragged canvas widget no longer exists.
    MissingWidget,
}

/// Classified result of one lifecycle event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragEffect {
    /// A drag session began.
    Started { source: DragSource },
    /// Palette drop on a cell: create a widget of this kind there.
    CreateRequested {
        plugin_id: String,
        row: u16,
        column: u16,
    },
    /// Canvas drop on a cell: reposition the widget there.
    MoveRequested {
        widget_id: WidgetId,
        row: u16,
        column: u16,
    },
    /// The drag was cancelled; its payload is discarded.
    Cancelled,
    /// Nothing happened; the reason says why that is fine.
    Noop { reason: DragNoopReason },
}

/// One state-machine transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragTransition {
    /// Monotone transition counter, for interaction telemetry.
    pub transition_id: u64,
    pub from: DragState,
    pub to: DragState,
    pub effect: DragEffect,
}

/// The drag/drop lifecycle machine.
#[derive(Debug, Clone, Default)]
pub struct DragDropMachine {
    state: DragState,
    transition_counter: u64,
}

impl DragDropMachine {
    /// A machine in the `Idle` state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> &DragState {
        &self.state
    }

    /// Whether a drag is in progress.
    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Begin dragging a palette entry.
    pub fn begin_palette_drag(&mut self, plugin_id: impl Into<String>) -> DragTransition {
        self.begin(DragSource::Palette {
            plugin_id: plugin_id.into(),
        })
    }

    /// Begin dragging an existing canvas widget.
    pub fn begin_canvas_drag(&mut self, widget_id: WidgetId) -> DragTransition {
        self.begin(DragSource::Canvas { widget_id })
    }

    /// Drop on the cell `(row, column)`.
    ///
    /// Cells outside `dims` discard the drag as [`DragNoopReason::OutsideGrid`].
    pub fn drop_on_cell(&mut self, row: u16, column: u16, dims: GridDimensions) -> DragTransition {
        let from = self.state.clone();
        match std::mem::take(&mut self.state) {
            DragState::Idle => self.transition(
                from,
                DragState::Idle,
                DragEffect::Noop {
                    reason: DragNoopReason::NoActiveDrag,
                },
            ),
            DragState::Dragging { source } => {
                let effect = if !dims.contains(row, column) {
                    DragEffect::Noop {
                        reason: DragNoopReason::OutsideGrid,
                    }
                } else {
                    match source {
                        DragSource::Palette { plugin_id } => DragEffect::CreateRequested {
                            plugin_id,
                            row,
                            column,
                        },
                        DragSource::Canvas { widget_id } => DragEffect::MoveRequested {
                            widget_id,
                            row,
                            column,
                        },
                    }
                };
                self.transition(from, DragState::Idle, effect)
            }
        }
    }

    /// Drop on no target at all; the drag is discarded.
    pub fn drop_outside(&mut self) -> DragTransition {
        let from = self.state.clone();
        let effect = match self.state {
            DragState::Idle => DragEffect::Noop {
                reason: DragNoopReason::NoActiveDrag,
            },
            DragState::Dragging { .. } => DragEffect::Noop {
                reason: DragNoopReason::OutsideGrid,
            },
        };
        self.state = DragState::Idle;
        self.transition(from, DragState::Idle, effect)
    }

    /// Cancel the drag (Escape, focus loss, teardown).
    pub fn cancel(&mut self) -> DragTransition {
        let from = self.state.clone();
        let effect = match self.state {
            DragState::Idle => DragEffect::Noop {
                reason: DragNoopReason::NoActiveDrag,
            },
            DragState::Dragging { .. } => DragEffect::Cancelled,
        };
        self.state = DragState::Idle;
        self.transition(from, DragState::Idle, effect)
    }

    fn begin(&mut self, source: DragSource) -> DragTransition {
        let from = self.state.clone();
        if self.is_dragging() {
            let to = self.state.clone();
            return self.transition(
                from,
                to,
                DragEffect::Noop {
                    reason: DragNoopReason::DragAlreadyActive,
                },
            );
        }
        self.state = DragState::Dragging {
            source: source.clone(),
        };
        let to = self.state.clone();
        self.transition(from, to, DragEffect::Started { source })
    }

    fn transition(&mut self, from: DragState, to: DragState, effect: DragEffect) -> DragTransition {
        self.transition_counter = self.transition_counter.saturating_add(1);
        tracing::trace!(id = self.transition_counter, ?effect, "drag transition");
        DragTransition {
            transition_id: self.transition_counter,
            from,
            to,
            effect,
        }
    }
}
