#![allow(clippy::needless_pass_by_value)]

use std::sync::Arc;

use crate::error::AppError;
use crate::model::ParamKind;
use crate::registry::params::{CommandRefParams, SearchCatalogParams};
use crate::registry::{CommandOutput, CommandResult};
use crate::state::AppState;

pub fn list_catalog(state: &Arc<AppState>) -> Result<CommandOutput, AppError> {
    let views = state.catalog.views();
    let lines: Vec<String> = views
        .iter()
        .map(|v| format!("{} ({})", v.name, v.commands.len()))
        .collect();
    Ok(CommandOutput::new(
        format!(
            "{} commands in {} categories:\n{}",
            state.catalog.command_count(),
            views.len(),
            lines.join("\n")
        ),
        CommandResult::ListCatalog(views),
    ))
}

pub fn search_catalog(
    state: &Arc<AppState>,
    p: SearchCatalogParams,
) -> Result<CommandOutput, AppError> {
    let views = state.catalog.search(&p.term);
    let message = if views.is_empty() {
        "No commands found".to_string()
    } else {
        let mut lines = Vec::new();
        for view in &views {
            lines.push(view.name.clone());
            for cmd in &view.commands {
                lines.push(format!("  {}: {}", cmd.name, cmd.description));
            }
        }
        lines.join("\n")
    };
    Ok(CommandOutput::new(message, CommandResult::SearchCatalog(views)))
}

pub fn describe_command(
    state: &Arc<AppState>,
    p: CommandRefParams,
) -> Result<CommandOutput, AppError> {
    let def = state.catalog.resolve(&p.name, p.category.as_deref())?;
    let mut lines = vec![format!("{}: {}", def.name, def.description)];
    if def.parameters.is_empty() {
        lines.push("This command has no parameters.".to_string());
    }
    for param in &def.parameters {
        let mut line = format!(
            "  -{}{} <{}>",
            param.name,
            if param.required { "*" } else { "" },
            param.kind.label()
        );
        if let Some(desc) = &param.description {
            line.push_str(&format!("  {desc}"));
        }
        if matches!(param.kind, ParamKind::Text | ParamKind::Path) {
            line.push_str(&format!(" \"{}\"", param.placeholder_text()));
        }
        if !param.choices.is_empty() {
            line.push_str(&format!(" [{}]", param.choices.join(", ")));
        }
        if let Some(default) = &param.default {
            line.push_str(&format!(" (default: {default})"));
        }
        lines.push(line);
    }
    Ok(CommandOutput::new(
        lines.join("\n"),
        CommandResult::DescribeCommand(def),
    ))
}
