//! Drag-to-reorder for the assembled script.
//!
//! A drag gesture is a small state machine. Every pointer-move over a list
//! entry becomes a [`HoverEvent`]; the gesture decides whether the pointer
//! has crossed the hovered entry's vertical midpoint and, if so, applies one
//! splice move to the [`ScriptSequence`] and follows the dragged entry to its
//! new index. There is no commit on drop: the sequence is already in its
//! final order when the pointer is released.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::AppError;
use crate::model::ScriptSequence;

/// Vertical screen extent of a rendered list entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS, JsonSchema)]
#[ts(export)]
pub struct EntryBounds {
    pub top: f64,
    pub bottom: f64,
}

impl EntryBounds {
    /// Half the entry's height, measured from its top edge.
    pub fn midpoint(&self) -> f64 {
        (self.bottom - self.top) / 2.0
    }
}

/// One pointer-move over a list entry while a drag may be active.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS, JsonSchema)]
#[ts(export)]
pub struct HoverEvent {
    /// Index of the entry under the pointer.
    pub target: usize,
    /// Pointer's vertical screen coordinate. None reads as offset zero.
    #[serde(default)]
    pub pointer_y: Option<f64>,
    /// None while the hovered entry is not mounted; such hovers are ignored.
    #[serde(default)]
    pub bounds: Option<EntryBounds>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(tag = "outcome")]
#[ts(export)]
pub enum HoverOutcome {
    Ignored,
    Moved { from: usize, to: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, TS)]
#[serde(tag = "state")]
#[ts(export)]
pub enum DragGesture {
    #[default]
    Idle,
    /// `source` is the dragged entry's current index; it follows every move.
    Dragging { source: usize },
}

impl DragGesture {
    pub fn start_drag(&mut self, index: usize) {
        *self = DragGesture::Dragging { source: index };
    }

    /// Apply the midpoint rule for one hover event. Moves at most one entry.
    pub fn hover(
        &mut self,
        script: &mut ScriptSequence,
        event: HoverEvent,
    ) -> Result<HoverOutcome, AppError> {
        let DragGesture::Dragging { source } = *self else {
            return Ok(HoverOutcome::Ignored);
        };
        let target = event.target;
        if source == target {
            return Ok(HoverOutcome::Ignored);
        }
        let Some(bounds) = event.bounds else {
            return Ok(HoverOutcome::Ignored);
        };

        let middle = bounds.midpoint();
        let offset = event.pointer_y.map_or(0.0, |y| y - bounds.top);

        // Downward: wait until the pointer is past the hovered entry's middle.
        if source < target && offset < middle {
            return Ok(HoverOutcome::Ignored);
        }
        // Upward: wait until the pointer is above it.
        if source > target && offset > middle {
            return Ok(HoverOutcome::Ignored);
        }

        script.move_to(source, target)?;
        *self = DragGesture::Dragging { source: target };
        tracing::debug!(from = source, to = target, "reordered script entry");
        Ok(HoverOutcome::Moved {
            from: source,
            to: target,
        })
    }

    /// Keep `source` on the dragged entry after an outside `move_to(from, to)`.
    pub fn follow_move(&mut self, from: usize, to: usize) {
        let DragGesture::Dragging { source } = *self else {
            return;
        };
        let source = if source == from {
            to
        } else if from < source && source <= to {
            source - 1
        } else if to <= source && source < from {
            source + 1
        } else {
            source
        };
        *self = DragGesture::Dragging { source };
    }

    /// End the gesture. Returns the dragged entry's final index, if any.
    pub fn release(&mut self) -> Option<usize> {
        let last = self.source();
        *self = DragGesture::Idle;
        last
    }

    pub fn source(&self) -> Option<usize> {
        match self {
            DragGesture::Idle => None,
            DragGesture::Dragging { source } => Some(*source),
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, DragGesture::Dragging { .. })
    }
}
