//! Script text rendering and export payloads.
//!
//! One line per entry, `<Command> -<Param> <Value> ...`, parameters in the
//! definition's declared order, unset and empty values left out, lines joined
//! by `\n` with no trailing newline.

use std::path::{Path, PathBuf};

use serde::Serialize;
use ts_rs::TS;

use crate::model::{ScriptEntry, ScriptSequence};
use crate::paths::{export_path, EXPORT_FILE, EXPORT_MIME, SCRIPT_EXTENSION};
use crate::storage::{atomic_write, StorageError};

/// Render one entry as a single script line.
pub fn render_entry(entry: &ScriptEntry) -> String {
    let mut line = entry.name().to_string();
    for decl in &entry.definition.parameters {
        if let Some(value) = entry.parameters.rendered(&decl.name) {
            line.push_str(&format!(" -{} {value}", decl.name));
        }
    }
    line
}

/// Render the whole script. Recomputed on every call.
pub fn render_script(script: &ScriptSequence) -> String {
    script
        .iter()
        .map(render_entry)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Text shown by the preview panel next to the script body.
pub fn summary_line(count: usize) -> String {
    format!(
        "{count} command{} in script",
        if count == 1 { "" } else { "s" }
    )
}

/// Everything a client needs to offer the script as a download or to put it
/// on the clipboard.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct ScriptExport {
    pub file_name: String,
    pub mime_type: String,
    pub contents: String,
}

impl ScriptExport {
    pub fn from_script(script: &ScriptSequence) -> Self {
        Self {
            file_name: EXPORT_FILE.to_string(),
            mime_type: EXPORT_MIME.to_string(),
            contents: render_script(script),
        }
    }

    /// Write `script.ps1` into `dir`, replacing any previous export.
    pub fn write_to_dir(&self, dir: &Path) -> Result<PathBuf, StorageError> {
        std::fs::create_dir_all(dir)?;
        let path = export_path(dir);
        atomic_write(&path, self.contents.as_bytes())?;
        tracing::info!(path = %path.display(), bytes = self.contents.len(), "exported script");
        Ok(path)
    }
}

/// Preview panel contents.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct ScriptPreview {
    pub text: String,
    pub count: usize,
    pub summary: String,
}

impl ScriptPreview {
    pub fn from_script(script: &ScriptSequence) -> Self {
        Self {
            text: render_script(script),
            count: script.len(),
            summary: summary_line(script.len()),
        }
    }
}

/// A script file picked for import. Only the reference is kept; the file's
/// contents are not read back into entries.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct ImportedScript {
    pub file_name: String,
    pub path: PathBuf,
}

impl ImportedScript {
    pub fn select(path: &Path) -> Result<Self, crate::error::AppError> {
        let is_script = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(SCRIPT_EXTENSION));
        if !is_script {
            return Err(crate::error::AppError::ValidationError {
                message: format!("Not a .{SCRIPT_EXTENSION} file: {}", path.display()),
            });
        }
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        tracing::info!(file = %file_name, "script selected for import");
        Ok(Self {
            file_name,
            path: path.to_path_buf(),
        })
    }
}
