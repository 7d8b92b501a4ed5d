#![allow(clippy::needless_pass_by_value)]

use std::sync::Arc;

use crate::error::AppError;
use crate::format::render_entry;
use crate::model::ScriptEntry;
use crate::registry::params::{AppendEntryParams, IndexParams, MoveEntryParams};
use crate::registry::{CommandOutput, CommandResult};
use crate::state::AppState;

pub fn append_entry(
    state: &Arc<AppState>,
    p: AppendEntryParams,
) -> Result<CommandOutput, AppError> {
    let definition = state.catalog.resolve(&p.command, p.category.as_deref())?;
    let entry = ScriptEntry::new(definition, p.parameters)?;
    let line = render_entry(&entry);
    let index = state.with_script_mut(|script| {
        script.append(entry);
        script.len() - 1
    });
    Ok(CommandOutput::new(
        format!("Appended entry {index}: {line}"),
        CommandResult::AppendEntry(index),
    ))
}

pub fn remove_entry(state: &Arc<AppState>, p: IndexParams) -> Result<CommandOutput, AppError> {
    let removed = state.remove_entry(p.index)?;
    Ok(CommandOutput::new(
        format!("Removed entry {}: {}", p.index, removed.name()),
        CommandResult::RemoveEntry(removed),
    ))
}

pub fn move_entry(state: &Arc<AppState>, p: MoveEntryParams) -> Result<CommandOutput, AppError> {
    state.move_entry(p.source, p.target)?;
    Ok(CommandOutput::new(
        format!("Moved entry {} to {}.", p.source, p.target),
        CommandResult::MoveEntry,
    ))
}

pub fn get_script(state: &Arc<AppState>) -> Result<CommandOutput, AppError> {
    let script = state.with_script(Clone::clone);
    let message = if script.is_empty() {
        "Add commands to build your script".to_string()
    } else {
        script
            .iter()
            .enumerate()
            .map(|(i, e)| format!("{i}: {}", render_entry(e)))
            .collect::<Vec<_>>()
            .join("\n")
    };
    Ok(CommandOutput::new(message, CommandResult::GetScript(script)))
}

pub fn clear_script(state: &Arc<AppState>) -> Result<CommandOutput, AppError> {
    state.clear_script();
    Ok(CommandOutput::new("Script cleared.", CommandResult::ClearScript))
}
