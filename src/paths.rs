//! Centralized path definitions for all data files and directories.
//!
//! Leaf filenames live here and nowhere else. Functions accept `&Path` so the
//! CLI, the HTTP server and tests can all point them at their own directories.

use std::path::{Path, PathBuf};

// ── Application identity ─────────────────────────────────────────

pub const APP_ID: &str = "com.scriptdesigner.app";

// ── Leaf filenames ───────────────────────────────────────────────

pub const SETTINGS_FILE: &str = "settings.json";
/// Storage key of the favorites list.
pub const FAVORITES_KEY: &str = "favorites";
/// Storage key of the recent-commands list.
pub const RECENT_KEY: &str = "recentCommands";
pub const EXPORT_FILE: &str = "script.ps1";
pub const EXPORT_MIME: &str = "text/plain";
pub const SCRIPT_EXTENSION: &str = "ps1";

// ── Config-dir functions (take app_config_dir) ───────────────────

pub fn settings_path(app_config_dir: &Path) -> PathBuf {
    app_config_dir.join(SETTINGS_FILE)
}

/// Platform config directory for this app, e.g. `~/.config/com.scriptdesigner.app`.
/// Falls back to the working directory when the platform reports none.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_ID)
}

// ── Data-dir functions (take data_dir) ───────────────────────────

/// File backing one storage key, e.g. `favorites` → `<data_dir>/favorites.json`.
pub fn library_key_path(data_dir: &Path, key: &str) -> PathBuf {
    data_dir.join(format!("{key}.json"))
}

pub fn export_path(dir: &Path) -> PathBuf {
    dir.join(EXPORT_FILE)
}
