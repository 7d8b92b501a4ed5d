#![allow(clippy::needless_pass_by_value)]

use std::path::PathBuf;
use std::sync::Arc;

use crate::error::AppError;
use crate::format::{ImportedScript, ScriptExport};
use crate::registry::params::{ExportToFileParams, ImportScriptParams};
use crate::registry::{CommandOutput, CommandResult};
use crate::state::AppState;

pub fn render_script(state: &Arc<AppState>) -> Result<CommandOutput, AppError> {
    let preview = state.preview();
    let message = if preview.count == 0 {
        preview.summary.clone()
    } else {
        format!("{}\n\n{}", preview.text, preview.summary)
    };
    Ok(CommandOutput::new(message, CommandResult::RenderScript(preview)))
}

/// Nothing is executed: the output of a run is the script text itself.
pub fn run_script(state: &Arc<AppState>) -> Result<CommandOutput, AppError> {
    let text = state.preview().text;
    *state.last_output.lock() = Some(text.clone());
    tracing::info!(bytes = text.len(), "ran script");
    Ok(CommandOutput::new(text.clone(), CommandResult::RunScript(text)))
}

pub fn export_script(state: &Arc<AppState>) -> Result<CommandOutput, AppError> {
    let export = state.with_script(ScriptExport::from_script);
    Ok(CommandOutput::new(
        export.contents.clone(),
        CommandResult::ExportScript(export),
    ))
}

pub fn export_to_file(
    state: &Arc<AppState>,
    p: ExportToFileParams,
) -> Result<CommandOutput, AppError> {
    let dir = match p.dir {
        Some(dir) => PathBuf::from(dir),
        None => state.settings.lock().export_dir().to_path_buf(),
    };
    let export = state.with_script(ScriptExport::from_script);
    let path = export.write_to_dir(&dir)?;
    let path = path.display().to_string();
    Ok(CommandOutput::new(
        format!("Exported to {path}"),
        CommandResult::ExportToFile(path),
    ))
}

pub fn import_script(
    state: &Arc<AppState>,
    p: ImportScriptParams,
) -> Result<CommandOutput, AppError> {
    let imported = ImportedScript::select(&PathBuf::from(&p.path))?;
    *state.last_import.lock() = Some(imported.clone());
    Ok(CommandOutput::new(
        format!("Selected {} for import. Script parsing is not supported.", imported.file_name),
        CommandResult::ImportScript(imported),
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::model::ParamValue;
    use crate::state::tests::test_state;

    fn state_with_process() -> Arc<AppState> {
        let state = Arc::new(test_state());
        state.select_command("Get-Process", None).unwrap();
        state
            .set_draft_param("Name", Some(ParamValue::Text("chrome".into())))
            .unwrap();
        state.add_selected_to_script().unwrap();
        state
    }

    #[test]
    fn render_shows_text_and_summary() {
        let state = state_with_process();
        let out = render_script(&state).unwrap();
        assert_eq!(out.message, "Get-Process -Name chrome\n\n1 command in script");
    }

    #[test]
    fn run_records_output() {
        let state = state_with_process();
        run_script(&state).unwrap();
        assert_eq!(
            state.last_output.lock().as_deref(),
            Some("Get-Process -Name chrome")
        );
    }

    #[test]
    fn export_writes_script_file() {
        let state = state_with_process();
        let dir = tempfile::tempdir().unwrap();
        let out = export_to_file(
            &state,
            ExportToFileParams {
                dir: Some(dir.path().display().to_string()),
            },
        )
        .unwrap();
        assert!(out.message.ends_with("script.ps1"));
        let written = std::fs::read_to_string(dir.path().join("script.ps1")).unwrap();
        assert_eq!(written, "Get-Process -Name chrome");
    }

    #[test]
    fn import_rejects_other_extensions() {
        let state = Arc::new(test_state());
        assert!(import_script(&state, ImportScriptParams { path: "notes.txt".into() }).is_err());
        assert!(state.last_import.lock().is_none());

        import_script(&state, ImportScriptParams { path: "/tmp/setup.PS1".into() }).unwrap();
        assert_eq!(state.last_import.lock().as_ref().unwrap().file_name, "setup.PS1");
        assert!(state.with_script(|s| s.is_empty()));
    }
}
