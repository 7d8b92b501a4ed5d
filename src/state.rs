use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use ts_rs::TS;

use crate::error::AppError;
use crate::format::{ImportedScript, ScriptPreview};
use crate::library::{CommandLibrary, LibraryStore};
use crate::model::{
    Catalog, CommandDefinition, ParamValue, ResolvedParameters, ScriptEntry, ScriptSequence,
};
use crate::reorder::DragGesture;
use crate::settings::AppSettings;

// ── Selection ─────────────────────────────────────────────────────

/// The command open in the parameter panel and its not-yet-added values.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct Selection {
    pub definition: Arc<CommandDefinition>,
    pub draft: ResolvedParameters,
}

impl Selection {
    /// Start a draft: declared defaults are filled in, everything else unset.
    pub fn new(definition: Arc<CommandDefinition>) -> Self {
        let mut draft = ResolvedParameters::new();
        for p in &definition.parameters {
            if let Some(default) = &p.default {
                draft.set(p.name.clone(), Some(default.clone()));
            }
        }
        Self { definition, draft }
    }

    pub fn set(&mut self, name: &str, value: Option<ParamValue>) -> Result<(), AppError> {
        let Some(decl) = self.definition.parameter(name) else {
            return Err(AppError::NotFound {
                what: format!("Parameter \"{name}\" on \"{}\"", self.definition.name),
            });
        };
        if let Some(v) = &value {
            decl.check(v)?;
        }
        self.draft.set(name, value);
        Ok(())
    }

    pub fn to_entry(&self) -> Result<ScriptEntry, AppError> {
        ScriptEntry::new(self.definition.clone(), self.draft.clone())
    }
}

// ── Application State ──────────────────────────────────────────────

/// One designer session, shared by the CLI and the HTTP API.
///
/// Every handler locks only what it touches. When both are needed, `drag` is
/// locked before `script`.
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub script: Mutex<ScriptSequence>,
    pub drag: Mutex<DragGesture>,
    pub selection: Mutex<Option<Selection>>,
    pub library: Mutex<CommandLibrary>,
    pub store: Box<dyn LibraryStore>,
    pub settings: Mutex<AppSettings>,
    /// Output of the last "run": the rendered script text.
    pub last_output: Mutex<Option<String>>,
    pub last_import: Mutex<Option<ImportedScript>>,
}

impl AppState {
    /// Build a session. The command library is loaded from `store` once, here.
    pub fn new(catalog: Arc<Catalog>, store: Box<dyn LibraryStore>, settings: AppSettings) -> Self {
        let library = store.load();
        Self {
            catalog,
            script: Mutex::new(ScriptSequence::new()),
            drag: Mutex::new(DragGesture::Idle),
            selection: Mutex::new(None),
            library: Mutex::new(library),
            store,
            settings: Mutex::new(settings),
            last_output: Mutex::new(None),
            last_import: Mutex::new(None),
        }
    }

    /// Read-only access to the script. Locks the mutex for the duration of `f`.
    pub fn with_script<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&ScriptSequence) -> R,
    {
        let guard = self.script.lock();
        f(&guard)
    }

    /// Mutating access to the script. Locks the mutex for the duration of `f`.
    pub fn with_script_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut ScriptSequence) -> R,
    {
        let mut guard = self.script.lock();
        f(&mut guard)
    }

    /// Mutate the command library and write it through to the store. The
    /// in-memory change stands even when the write fails.
    pub fn with_library_mut<F, R>(&self, f: F) -> Result<R, AppError>
    where
        F: FnOnce(&mut CommandLibrary) -> (R, bool),
    {
        let mut library = self.library.lock();
        let (result, changed) = f(&mut library);
        if changed {
            if let Err(e) = self.store.save(&library) {
                tracing::error!(error = %e, "failed to save command library");
                return Err(e.into());
            }
        }
        Ok(result)
    }

    pub fn preview(&self) -> ScriptPreview {
        self.with_script(ScriptPreview::from_script)
    }

    /// Open a command in the parameter panel and note it as recently used.
    pub fn select_command(
        &self,
        name: &str,
        category: Option<&str>,
    ) -> Result<Selection, AppError> {
        let definition = self.catalog.resolve(name, category)?;
        let selection = Selection::new(definition.clone());
        *self.selection.lock() = Some(selection.clone());
        self.with_library_mut(|lib| ((), lib.recent.record(definition)))?;
        Ok(selection)
    }

    pub fn set_draft_param(
        &self,
        name: &str,
        value: Option<ParamValue>,
    ) -> Result<Selection, AppError> {
        let mut guard = self.selection.lock();
        let selection = guard.as_mut().ok_or(AppError::NoSelection)?;
        selection.set(name, value)?;
        Ok(selection.clone())
    }

    /// Append the selected command with its draft values. Returns the new index.
    pub fn add_selected_to_script(&self) -> Result<usize, AppError> {
        let entry = self
            .selection
            .lock()
            .as_ref()
            .ok_or(AppError::NoSelection)?
            .to_entry()?;
        Ok(self.with_script_mut(|script| {
            script.append(entry);
            script.len() - 1
        }))
    }

    /// Remove an entry. An active drag is abandoned since its index may now
    /// point at a different entry.
    pub fn remove_entry(&self, index: usize) -> Result<ScriptEntry, AppError> {
        let mut drag = self.drag.lock();
        let removed = self.script.lock().remove_at(index)?;
        if drag.is_dragging() {
            drag.release();
        }
        Ok(removed)
    }

    /// Splice-move an entry. An active drag keeps following the entry it
    /// started on.
    pub fn move_entry(&self, source: usize, target: usize) -> Result<(), AppError> {
        let mut drag = self.drag.lock();
        self.script.lock().move_to(source, target)?;
        drag.follow_move(source, target);
        Ok(())
    }

    pub fn clear_script(&self) {
        let mut drag = self.drag.lock();
        self.script.lock().clear();
        drag.release();
    }

    pub fn toggle_favorite(&self, name: &str, category: Option<&str>) -> Result<bool, AppError> {
        let definition = self.catalog.resolve(name, category)?;
        self.with_library_mut(|lib| (lib.favorites.toggle(definition), true))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
pub(crate) mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::library::MemoryStore;

    pub(crate) fn test_state() -> AppState {
        AppState::new(
            Arc::new(Catalog::builtin().unwrap()),
            Box::new(MemoryStore::default()),
            AppSettings::new(PathBuf::from("/tmp/script-designer-test")),
        )
    }

    #[test]
    fn selection_starts_from_defaults() {
        let state = test_state();
        let sel = state.select_command("Test-Connection", None).unwrap();
        assert_eq!(sel.draft.get("Count"), Some(&ParamValue::Number(4.0)));
        assert_eq!(sel.draft.get("TimeoutSeconds"), Some(&ParamValue::Number(2.0)));
        assert!(sel.draft.get("ComputerName").is_none());
    }

    #[test]
    fn configure_and_add_selected() {
        let state = test_state();
        state.select_command("Get-Process", None).unwrap();
        state
            .set_draft_param("Name", Some(ParamValue::Text("chrome".into())))
            .unwrap();
        assert_eq!(state.add_selected_to_script().unwrap(), 0);
        assert_eq!(state.add_selected_to_script().unwrap(), 1);
        assert_eq!(state.preview().text, "Get-Process -Name chrome\nGet-Process -Name chrome");
    }

    #[test]
    fn draft_rejects_unknown_and_mistyped() {
        let state = test_state();
        assert!(matches!(
            state.set_draft_param("Name", None),
            Err(AppError::NoSelection)
        ));
        state.select_command("Get-Process", None).unwrap();
        assert!(state.set_draft_param("Bogus", None).is_err());
        assert!(state
            .set_draft_param("Id", Some(ParamValue::Text("x".into())))
            .is_err());
    }

    #[test]
    fn add_without_selection_fails() {
        let state = test_state();
        assert!(matches!(state.add_selected_to_script(), Err(AppError::NoSelection)));
    }

    #[test]
    fn selecting_records_recent_and_writes_through() {
        let store = Arc::new(MemoryStore::default());
        let state = AppState::new(
            Arc::new(Catalog::builtin().unwrap()),
            Box::new(SharedStore(store.clone())),
            AppSettings::new(PathBuf::from("/tmp")),
        );
        state.select_command("Get-Process", None).unwrap();
        state.select_command("Get-Process", None).unwrap();
        assert_eq!(store.save_count(), 1);
        assert_eq!(store.saved().recent.len(), 1);

        assert!(state.toggle_favorite("Get-Service", None).unwrap());
        assert_eq!(store.save_count(), 2);
        assert!(store.saved().favorites.contains("Get-Service"));
    }

    #[test]
    fn library_is_loaded_at_startup() {
        let mut library = CommandLibrary::default();
        library
            .favorites
            .toggle(Arc::new(CommandDefinition::new("Get-Date", "Gets the date")));
        let state = AppState::new(
            Arc::new(Catalog::builtin().unwrap()),
            Box::new(MemoryStore::with(library)),
            AppSettings::new(PathBuf::from("/tmp")),
        );
        assert!(state.library.lock().favorites.contains("Get-Date"));
    }

    #[test]
    fn remove_abandons_drag() {
        let state = test_state();
        state.select_command("Get-Service", None).unwrap();
        state.add_selected_to_script().unwrap();
        state.add_selected_to_script().unwrap();
        state.drag.lock().start_drag(1);
        state.remove_entry(0).unwrap();
        assert!(!state.drag.lock().is_dragging());
        assert!(state.remove_entry(3).is_err());
    }

    #[test]
    fn move_keeps_drag_on_its_entry() {
        let state = test_state();
        for name in ["Get-Process", "Get-Service", "Stop-Process"] {
            state.select_command(name, None).unwrap();
            state.add_selected_to_script().unwrap();
        }
        state.drag.lock().start_drag(0);
        state.move_entry(0, 2).unwrap();
        assert_eq!(state.drag.lock().source(), Some(2));

        let event = crate::reorder::HoverEvent {
            target: 1,
            pointer_y: Some(5.0),
            bounds: Some(crate::reorder::EntryBounds {
                top: 0.0,
                bottom: 40.0,
            }),
        };
        let mut drag = state.drag.lock();
        state.with_script_mut(|s| drag.hover(s, event)).unwrap();
        let order: Vec<String> =
            state.with_script(|s| s.iter().map(|e| e.name().to_string()).collect());
        assert_eq!(order, ["Get-Service", "Get-Process", "Stop-Process"]);
        assert_eq!(drag.source(), Some(1));
    }

    #[test]
    fn failed_save_is_reported_and_change_kept() {
        let state = AppState::new(
            Arc::new(Catalog::builtin().unwrap()),
            Box::new(FailingStore),
            AppSettings::new(PathBuf::from("/tmp")),
        );
        let err = state.toggle_favorite("Get-Service", None).unwrap_err();
        assert!(matches!(err, AppError::IoError { .. }));
        assert!(state.library.lock().favorites.contains("Get-Service"));

        let err = state.select_command("Get-Process", None).unwrap_err();
        assert!(matches!(err, AppError::IoError { .. }));
        assert!(state.library.lock().recent.contains("Get-Process"));
    }

    struct FailingStore;

    impl LibraryStore for FailingStore {
        fn load(&self) -> CommandLibrary {
            CommandLibrary::default()
        }

        fn save(&self, _library: &CommandLibrary) -> Result<(), crate::storage::StorageError> {
            Err(std::io::Error::other("disk full").into())
        }
    }

    /// Lets a test keep a handle on the store the session owns.
    struct SharedStore(Arc<MemoryStore>);

    impl LibraryStore for SharedStore {
        fn load(&self) -> CommandLibrary {
            self.0.load()
        }

        fn save(&self, library: &CommandLibrary) -> Result<(), crate::storage::StorageError> {
            self.0.save(library)
        }
    }
}
