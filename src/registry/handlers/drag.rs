#![allow(clippy::needless_pass_by_value)]

use std::sync::Arc;

use crate::error::AppError;
use crate::registry::params::IndexParams;
use crate::registry::{CommandOutput, CommandResult};
use crate::reorder::{HoverEvent, HoverOutcome};
use crate::state::AppState;

pub fn start_drag(state: &Arc<AppState>, p: IndexParams) -> Result<CommandOutput, AppError> {
    let mut drag = state.drag.lock();
    state.with_script(|script| script.check_index(p.index))?;
    drag.start_drag(p.index);
    Ok(CommandOutput::new(
        format!("Dragging entry {}.", p.index),
        CommandResult::StartDrag,
    ))
}

pub fn hover_drag(state: &Arc<AppState>, event: HoverEvent) -> Result<CommandOutput, AppError> {
    let mut drag = state.drag.lock();
    let outcome = state.with_script_mut(|script| drag.hover(script, event))?;
    let message = match outcome {
        HoverOutcome::Ignored => "No move.".to_string(),
        HoverOutcome::Moved { from, to } => format!("Moved entry {from} to {to}."),
    };
    Ok(CommandOutput::new(message, CommandResult::HoverDrag(outcome)))
}

pub fn drop_drag(state: &Arc<AppState>) -> Result<CommandOutput, AppError> {
    let last = state.drag.lock().release();
    let message = match last {
        Some(index) => format!("Dropped entry at {index}."),
        None => "No drag in progress.".to_string(),
    };
    Ok(CommandOutput::new(message, CommandResult::DropDrag(last)))
}

pub fn get_drag_state(state: &Arc<AppState>) -> Result<CommandOutput, AppError> {
    let drag = *state.drag.lock();
    let message = match drag.source() {
        Some(index) => format!("Dragging entry {index}."),
        None => "Idle.".to_string(),
    };
    Ok(CommandOutput::new(message, CommandResult::GetDragState(drag)))
}
