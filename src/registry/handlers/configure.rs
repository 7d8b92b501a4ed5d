#![allow(clippy::needless_pass_by_value)]

use std::sync::Arc;

use crate::error::AppError;
use crate::format::render_entry;
use crate::registry::params::{CommandRefParams, SetDraftParamParams};
use crate::registry::{CommandOutput, CommandResult};
use crate::state::{AppState, Selection};

fn draft_line(selection: &Selection) -> String {
    selection
        .to_entry()
        .map(|e| render_entry(&e))
        .unwrap_or_else(|_| selection.definition.name.clone())
}

pub fn select_command(
    state: &Arc<AppState>,
    p: CommandRefParams,
) -> Result<CommandOutput, AppError> {
    let selection = state.select_command(&p.name, p.category.as_deref())?;
    Ok(CommandOutput::new(
        format!("Selected {}", draft_line(&selection)),
        CommandResult::SelectCommand(selection),
    ))
}

pub fn set_draft_param(
    state: &Arc<AppState>,
    p: SetDraftParamParams,
) -> Result<CommandOutput, AppError> {
    let selection = state.set_draft_param(&p.name, p.value)?;
    Ok(CommandOutput::new(
        format!("Draft: {}", draft_line(&selection)),
        CommandResult::SetDraftParam(selection),
    ))
}

pub fn get_selection(state: &Arc<AppState>) -> Result<CommandOutput, AppError> {
    let selection = state.selection.lock().clone();
    let message = match &selection {
        Some(sel) => format!("Draft: {}", draft_line(sel)),
        None => "Select a command to configure parameters".to_string(),
    };
    Ok(CommandOutput::new(message, CommandResult::GetSelection(selection)))
}

pub fn add_selected_to_script(state: &Arc<AppState>) -> Result<CommandOutput, AppError> {
    let index = state.add_selected_to_script()?;
    Ok(CommandOutput::new(
        format!("Added entry {index}."),
        CommandResult::AddSelectedToScript(index),
    ))
}
