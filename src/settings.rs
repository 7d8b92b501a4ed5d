use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::storage::{read_json, write_json, StorageError};

// ── App settings ─────────────────────────────────────────────────

/// Application-level settings stored in the OS config directory.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AppSettings {
    pub version: u32,
    /// Where the favorites and recent-command lists are kept.
    pub data_dir: PathBuf,
    /// Default directory for `script.ps1` exports. None = data dir.
    #[serde(default)]
    pub export_dir: Option<PathBuf>,
}

const SETTINGS_VERSION: u32 = 1;

impl AppSettings {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            version: SETTINGS_VERSION,
            data_dir,
            export_dir: None,
        }
    }

    pub fn export_dir(&self) -> &Path {
        self.export_dir.as_deref().unwrap_or(&self.data_dir)
    }
}

/// Load settings from the app config directory. Returns None if no settings
/// file exists or it cannot be parsed.
pub fn load_settings(app_config_dir: &Path) -> Option<AppSettings> {
    let path = crate::paths::settings_path(app_config_dir);
    if !path.exists() {
        return None;
    }
    match read_json::<AppSettings>(&path) {
        Ok(settings) => Some(settings),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable settings");
            None
        }
    }
}

/// Save settings to the app config directory.
pub fn save_settings(app_config_dir: &Path, settings: &AppSettings) -> Result<(), StorageError> {
    std::fs::create_dir_all(app_config_dir)?;
    write_json(&crate::paths::settings_path(app_config_dir), settings)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_round_trip() {
        let dir = tempfile::tempdir().unwrap();

        let settings = AppSettings::new(PathBuf::from("/some/data/dir"));
        save_settings(dir.path(), &settings).unwrap();

        let loaded = load_settings(dir.path()).expect("should load");
        assert_eq!(loaded.data_dir, PathBuf::from("/some/data/dir"));
        assert_eq!(loaded.export_dir, None);
        assert_eq!(loaded.export_dir(), Path::new("/some/data/dir"));
    }

    #[test]
    fn test_export_dir_override() {
        let mut settings = AppSettings::new(PathBuf::from("/data"));
        settings.export_dir = Some(PathBuf::from("/exports"));
        assert_eq!(settings.export_dir(), Path::new("/exports"));
    }

    #[test]
    fn test_load_missing_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_settings(&dir.path().join("nope")).is_none());
    }

    #[test]
    fn test_load_garbage_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(crate::paths::settings_path(dir.path()), "][").unwrap();
        assert!(load_settings(dir.path()).is_none());
    }
}
