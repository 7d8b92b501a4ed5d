use std::sync::Arc;

use crate::error::AppError;
use crate::state::AppState;

use super::{Command, CommandOutput};

/// Execute a Command against the session state.
/// This is the single dispatch point for all surfaces (CLI, session reader, REST).
pub fn execute(state: &Arc<AppState>, cmd: Command) -> Result<CommandOutput, AppError> {
    let name = cmd.info().name;
    let result = cmd.dispatch(state);
    if let Err(e) = &result {
        tracing::debug!(command = name, error = %e, "command failed");
    }
    result
}

/// Parse a `(name, params)` pair and execute it.
pub fn execute_named(
    state: &Arc<AppState>,
    name: &str,
    params: &serde_json::Value,
) -> Result<CommandOutput, AppError> {
    let cmd = Command::from_tool_call(name, params)?;
    execute(state, cmd)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::registry::CommandResult;
    use crate::state::tests::test_state;

    #[test]
    fn build_reorder_and_render_by_name() {
        let state = Arc::new(test_state());
        let run = |name: &str, params: serde_json::Value| execute_named(&state, name, &params).unwrap();

        run("select_command", json!({ "name": "Get-Process" }));
        run("set_draft_param", json!({ "name": "Name", "value": "chrome" }));
        run("add_selected_to_script", json!(null));
        run(
            "append_entry",
            json!({ "command": "Test-Connection", "parameters": { "ComputerName": "host", "Count": 4 } }),
        );

        run("start_drag", json!({ "index": 1 }));
        let out = run(
            "hover_drag",
            json!({ "target": 0, "pointer_y": 5.0, "bounds": { "top": 0.0, "bottom": 40.0 } }),
        );
        assert_eq!(out.message, "Moved entry 1 to 0.");
        run("drop_drag", json!(null));

        let out = run("run_script", json!(null));
        assert_eq!(
            out.message,
            "Test-Connection -ComputerName host -Count 4\nGet-Process -Name chrome"
        );

        let out = run("list_recent", json!(null));
        assert!(matches!(out.result, CommandResult::ListRecent(r) if r.len() == 1));
    }

    #[test]
    fn errors_surface_as_app_errors() {
        let state = Arc::new(test_state());
        assert!(matches!(
            execute_named(&state, "remove_entry", &json!({ "index": 0 })),
            Err(AppError::InvalidIndex { index: 0, .. })
        ));
        assert!(matches!(
            execute_named(&state, "teleport", &json!({})),
            Err(AppError::ValidationError { .. })
        ));
    }
}
