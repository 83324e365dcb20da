//! Input model: tools and the gesture state machine.
//!
//! `Tool` captures the operator's intent and persists across gestures;
//! `Gesture` is the active pointer interaction being tracked between
//! pointer-down and pointer-up, carrying all context needed to compute
//! incremental deltas and commit the result on release.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::geom::{Point, Rect};
use crate::hit::ResizeAnchor;
use crate::product::ZoneKind;

/// Which tool is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// Pointer / selection tool (default).
    #[default]
    Select,
    /// Draw a new print area.
    DrawPrint,
    /// Draw a new restriction area.
    DrawRestriction,
}

impl Tool {
    /// The zone kind this tool draws, or `None` for the select tool.
    #[must_use]
    pub fn draw_kind(self) -> Option<ZoneKind> {
        match self {
            Self::Select => None,
            Self::DrawPrint => Some(ZoneKind::Print),
            Self::DrawRestriction => Some(ZoneKind::Restriction),
        }
    }
}

/// The active pointer gesture. Transient; always resets to `Idle` on
/// pointer-up (or pointer-leave, which is treated as an implicit release).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    /// No gesture in progress; waiting for the next pointer-down.
    Idle,
    /// Dragging out a new zone from an anchor corner.
    Drawing {
        /// Kind of zone being drawn, from the active tool.
        kind: ZoneKind,
        /// Canvas point where the drag started.
        anchor: Point,
        /// Canvas point of the most recent pointer event, clamped to canvas.
        current: Point,
    },
    /// Moving an existing zone across the canvas.
    Moving {
        kind: ZoneKind,
        index: usize,
        /// Pointer position relative to the zone origin at grab time, so the
        /// zone doesn't jump to the cursor.
        grab_offset: Point,
    },
    /// Resizing a zone by one of its eight handles.
    Resizing {
        kind: ZoneKind,
        index: usize,
        /// Which handle is being dragged.
        anchor: ResizeAnchor,
        /// Zone rect at the start of the gesture; every update recomputes
        /// from this snapshot plus the total delta.
        orig: Rect,
        /// Canvas point where the drag started.
        start: Point,
    },
}

impl Gesture {
    /// Whether a gesture is in progress.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }
}

impl Default for Gesture {
    fn default() -> Self {
        Self::Idle
    }
}
