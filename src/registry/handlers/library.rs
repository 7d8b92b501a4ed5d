#![allow(clippy::needless_pass_by_value)]

use std::sync::Arc;

use crate::error::AppError;
use crate::model::CommandDefinition;
use crate::registry::params::CommandRefParams;
use crate::registry::{CommandOutput, CommandResult};
use crate::state::AppState;

fn list_lines<'a>(
    commands: impl Iterator<Item = &'a Arc<CommandDefinition>>,
    empty: &str,
) -> String {
    let lines: Vec<String> = commands
        .map(|c| format!("  {}: {}", c.name, c.description))
        .collect();
    if lines.is_empty() {
        empty.to_string()
    } else {
        lines.join("\n")
    }
}

pub fn toggle_favorite(
    state: &Arc<AppState>,
    p: CommandRefParams,
) -> Result<CommandOutput, AppError> {
    let added = state.toggle_favorite(&p.name, p.category.as_deref())?;
    let message = if added {
        format!("Added {} to favorites.", p.name)
    } else {
        format!("Removed {} from favorites.", p.name)
    };
    Ok(CommandOutput::new(message, CommandResult::ToggleFavorite(added)))
}

pub fn list_favorites(state: &Arc<AppState>) -> Result<CommandOutput, AppError> {
    let favorites = state.library.lock().favorites.clone();
    Ok(CommandOutput::new(
        list_lines(favorites.iter(), "No favorite commands yet"),
        CommandResult::ListFavorites(favorites),
    ))
}

pub fn list_recent(state: &Arc<AppState>) -> Result<CommandOutput, AppError> {
    let recent = state.library.lock().recent.clone();
    Ok(CommandOutput::new(
        list_lines(recent.iter(), "No recent commands yet"),
        CommandResult::ListRecent(recent),
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::state::tests::test_state;

    fn by_name(name: &str) -> CommandRefParams {
        CommandRefParams {
            name: name.into(),
            category: None,
        }
    }

    #[test]
    fn toggle_twice_restores() {
        let state = Arc::new(test_state());
        let out = toggle_favorite(&state, by_name("Get-Service")).unwrap();
        assert_eq!(out.message, "Added Get-Service to favorites.");
        assert!(list_favorites(&state).unwrap().message.contains("Get-Service"));

        let out = toggle_favorite(&state, by_name("Get-Service")).unwrap();
        assert!(matches!(out.result, CommandResult::ToggleFavorite(false)));
        assert_eq!(list_favorites(&state).unwrap().message, "No favorite commands yet");
    }

    #[test]
    fn recent_follows_selection() {
        let state = Arc::new(test_state());
        assert_eq!(list_recent(&state).unwrap().message, "No recent commands yet");
        state.select_command("Get-Process", None).unwrap();
        state.select_command("Get-Service", None).unwrap();
        let out = list_recent(&state).unwrap();
        let CommandResult::ListRecent(recent) = out.result else {
            panic!("unexpected result");
        };
        let names: Vec<&str> = recent.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Get-Service", "Get-Process"]);
    }

    #[test]
    fn toggle_unknown_command_fails() {
        let state = Arc::new(test_state());
        assert!(matches!(
            toggle_favorite(&state, by_name("Nope")),
            Err(AppError::NotFound { .. })
        ));
    }
}
