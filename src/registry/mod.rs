pub mod catalog;
pub mod execute;
pub mod handlers;
pub mod params;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ── Param types (used in Command enum) ──────────────────────────
use params::{
    AppendEntryParams, CommandRefParams, ExportToFileParams, HelpParams, ImportScriptParams,
    IndexParams, MoveEntryParams, SearchCatalogParams, SetDraftParamParams,
};

// ── Return types (used in CommandResult enum) ───────────────────
use crate::format::{ImportedScript, ScriptExport, ScriptPreview};
use crate::library::{FavoriteSet, RecentList};
use crate::model::{CategoryView, CommandDefinition, ScriptEntry, ScriptSequence};
use crate::reorder::{DragGesture, HoverEvent, HoverOutcome};
use crate::state::Selection;

// ── Handler modules (dispatch targets) ──────────────────────────
use handlers::{browse, configure, drag, export, library, query, script};

// ── Command metadata ────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum CommandCategory {
    Catalog,
    Configure,
    Script,
    Reorder,
    Export,
    Library,
    Query,
}

impl CommandCategory {
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Catalog => "catalog",
            Self::Configure => "configure",
            Self::Script => "script",
            Self::Reorder => "reorder",
            Self::Export => "export",
            Self::Library => "library",
            Self::Query => "query",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Catalog => "Browse and search the command catalog",
            Self::Configure => "Select a command and fill in its parameters",
            Self::Script => "Append, remove, move and inspect script entries",
            Self::Reorder => "Drag-and-drop reordering with the midpoint rule",
            Self::Export => "Preview, run, export and import script text",
            Self::Library => "Favorite and recently used commands",
            Self::Query => "Help and command discovery",
        }
    }

    pub fn all() -> &'static [CommandCategory] {
        &[
            Self::Catalog,
            Self::Configure,
            Self::Script,
            Self::Reorder,
            Self::Export,
            Self::Library,
            Self::Query,
        ]
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::all().iter().copied().find(|c| c.slug() == slug)
    }
}

pub struct CommandInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub category: CommandCategory,
}

// ── Command output ──────────────────────────────────────────────

/// Internal result of executing a Command.
/// `message` serves the CLI, `result` carries typed data for the frontend.
#[derive(Debug, Clone, Serialize)]
pub struct CommandOutput {
    pub message: String,
    pub result: CommandResult,
}

impl CommandOutput {
    pub fn new(message: impl Into<String>, result: CommandResult) -> Self {
        Self {
            message: message.into(),
            result,
        }
    }
}

// ── define_commands! macro ──────────────────────────────────────

/// Single source of truth for all commands. Generates:
/// 1. `Command` enum (serde-tagged, ts-rs exported)
/// 2. `CommandResult` enum (serde-tagged, ts-rs exported)
/// 3. `Command::info()`: metadata (name, description, category)
/// 4. `Command::dispatch()`: run the handler
/// 5. `Command::registry_entries()`: catalog entries with JSON schemas
/// 6. `Command::from_tool_call()`: deserialize from (name, JSON) pair
macro_rules! define_commands {
    (
        params {
            $(
                [ $pc:expr ]
                $pv:ident ( $pp:ty ) $( -> $pr:ty )?
                => $ph:path, $pn:literal : $pd:literal ;
            )*
        }
        no_params {
            $(
                [ $nc:expr ]
                $nv:ident $( -> $nr:ty )?
                => $nh:path, $nn:literal : $nd:literal ;
            )*
        }
    ) => {
        // ── 1. Command enum ──
        /// Unified command type. The CLI, the session reader and the HTTP API
        /// all dispatch through the same executor.
        #[derive(Debug, Clone, Serialize, Deserialize, TS)]
        #[ts(export)]
        #[serde(tag = "command", content = "params")]
        pub enum Command {
            $( $pv($pp), )*
            $( $nv, )*
        }

        // ── 2. CommandResult enum ──
        /// Typed result for every command, a discriminated union on `command`.
        #[derive(Debug, Clone, Serialize, TS)]
        #[ts(export)]
        #[serde(tag = "command", content = "data")]
        pub enum CommandResult {
            $( $pv $( ($pr) )?, )*
            $( $nv $( ($nr) )?, )*
        }

        // ── 3. Command::info() ──
        impl Command {
            pub fn info(&self) -> CommandInfo {
                match self {
                    $( Command::$pv(_) => CommandInfo {
                        name: $pn,
                        description: $pd,
                        category: $pc,
                    }, )*
                    $( Command::$nv => CommandInfo {
                        name: $nn,
                        description: $nd,
                        category: $nc,
                    }, )*
                }
            }
        }

        // ── 4. Command::dispatch() ──
        impl Command {
            pub(crate) fn dispatch(
                self,
                state: &std::sync::Arc<crate::state::AppState>,
            ) -> Result<CommandOutput, crate::error::AppError> {
                match self {
                    $( Command::$pv(p) => $ph(state, p), )*
                    $( Command::$nv => $nh(state), )*
                }
            }
        }

        // ── 5. Command::registry_entries() ──
        impl Command {
            pub(crate) fn registry_entries() -> Vec<catalog::CommandRegistryEntry> {
                vec![
                    $( catalog::entry(
                        CommandInfo { name: $pn, description: $pd, category: $pc },
                        catalog::schema_value::<$pp>(),
                    ), )*
                    $( catalog::entry(
                        CommandInfo { name: $nn, description: $nd, category: $nc },
                        catalog::empty_object_schema(),
                    ), )*
                ]
            }
        }

        // ── 6. Command::from_tool_call() ──
        impl Command {
            pub fn from_tool_call(
                name: &str,
                input: &serde_json::Value,
            ) -> Result<Command, String> {
                match name {
                    $( $pn => Ok(Command::$pv(catalog::de(input)?)), )*
                    $( $nn => Ok(Command::$nv), )*
                    _ => Err(format!("Unknown command: {name}")),
                }
            }
        }
    };
}

// ── Command definitions ─────────────────────────────────────────

define_commands! {
    params {
        // ── Catalog (2) ─────────────────────────────────────────
        [CommandCategory::Catalog]
        SearchCatalog(SearchCatalogParams) -> Vec<CategoryView>
        => browse::search_catalog, "search_catalog": "Search command names and descriptions. Categories without matches are left out.";

        [CommandCategory::Catalog]
        DescribeCommand(CommandRefParams) -> Arc<CommandDefinition>
        => browse::describe_command, "describe_command": "Show a catalog command with its parameter definitions.";

        // ── Configure (2) ───────────────────────────────────────
        [CommandCategory::Configure]
        SelectCommand(CommandRefParams) -> Selection
        => configure::select_command, "select_command": "Open a command for configuration. Defaults are pre-filled and the command is added to the recent list.";

        [CommandCategory::Configure]
        SetDraftParam(SetDraftParamParams) -> Selection
        => configure::set_draft_param, "set_draft_param": "Set or clear one parameter of the selected command.";

        // ── Script (3) ──────────────────────────────────────────
        [CommandCategory::Script]
        AppendEntry(AppendEntryParams) -> usize
        => script::append_entry, "append_entry": "Append a configured command to the end of the script. Returns its index.";

        [CommandCategory::Script]
        RemoveEntry(IndexParams) -> ScriptEntry
        => script::remove_entry, "remove_entry": "Remove the script entry at an index. Later entries shift up.";

        [CommandCategory::Script]
        MoveEntry(MoveEntryParams)
        => script::move_entry, "move_entry": "Move an entry from source to target index (splice out, splice in).";

        // ── Reorder (2) ─────────────────────────────────────────
        [CommandCategory::Reorder]
        StartDrag(IndexParams)
        => drag::start_drag, "start_drag": "Begin dragging the entry at an index.";

        [CommandCategory::Reorder]
        HoverDrag(HoverEvent) -> HoverOutcome
        => drag::hover_drag, "hover_drag": "Report the pointer over an entry. Moves the dragged entry once the pointer crosses the entry's midpoint.";

        // ── Export (2) ──────────────────────────────────────────
        [CommandCategory::Export]
        ExportToFile(ExportToFileParams) -> String
        => export::export_to_file, "export_to_file": "Write the script to script.ps1 in a directory. Returns the file path.";

        [CommandCategory::Export]
        ImportScript(ImportScriptParams) -> ImportedScript
        => export::import_script, "import_script": "Pick a .ps1 file for import. The file is recorded but not parsed.";

        // ── Library (1) ─────────────────────────────────────────
        [CommandCategory::Library]
        ToggleFavorite(CommandRefParams) -> bool
        => library::toggle_favorite, "toggle_favorite": "Star or unstar a command. Returns whether it is now a favorite.";

        // ── Query (1) ───────────────────────────────────────────
        [CommandCategory::Query]
        Help(HelpParams) -> String
        => query::help, "help": "Discover available commands and categories. Call with no args for all categories, or with a topic for details.";
    }
    no_params {
        [CommandCategory::Catalog]
        ListCatalog -> Vec<CategoryView>
        => browse::list_catalog, "list_catalog": "List every catalog category and its commands.";

        [CommandCategory::Configure]
        GetSelection -> Option<Selection>
        => configure::get_selection, "get_selection": "Get the selected command and its draft parameters.";

        [CommandCategory::Configure]
        AddSelectedToScript -> usize
        => configure::add_selected_to_script, "add_selected_to_script": "Append the selected command with its draft parameters. Returns the new index.";

        [CommandCategory::Script]
        GetScript -> ScriptSequence
        => script::get_script, "get_script": "Get every script entry in order.";

        [CommandCategory::Script]
        ClearScript
        => script::clear_script, "clear_script": "Remove every entry from the script.";

        [CommandCategory::Reorder]
        DropDrag -> Option<usize>
        => drag::drop_drag, "drop_drag": "Release the dragged entry. Returns its final index.";

        [CommandCategory::Reorder]
        GetDragState -> DragGesture
        => drag::get_drag_state, "get_drag_state": "Get the current drag gesture state.";

        [CommandCategory::Export]
        RenderScript -> ScriptPreview
        => export::render_script, "render_script": "Render the script text with its command count.";

        [CommandCategory::Export]
        RunScript -> String
        => export::run_script, "run_script": "Produce the script output. Nothing is executed; the output is the script text.";

        [CommandCategory::Export]
        ExportScript -> ScriptExport
        => export::export_script, "export_script": "Get the script as a script.ps1 text/plain payload for download or clipboard.";

        [CommandCategory::Library]
        ListFavorites -> FavoriteSet
        => library::list_favorites, "list_favorites": "List favorite commands.";

        [CommandCategory::Library]
        ListRecent -> RecentList
        => library::list_recent, "list_recent": "List recently selected commands, newest first.";
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn command_names_are_unique() {
        let entries = catalog::command_registry();
        let mut names: Vec<&str> = entries.iter().map(|e| e.name).collect();
        names.sort_unstable();
        let before = names.len();
        names.dedup();
        assert_eq!(before, names.len());
    }

    #[test]
    fn every_category_has_commands() {
        let entries = catalog::command_registry();
        for cat in CommandCategory::all() {
            assert!(entries.iter().any(|e| e.category == *cat), "{cat:?} is empty");
            assert_eq!(CommandCategory::from_slug(cat.slug()), Some(*cat));
        }
    }

    #[test]
    fn from_tool_call_parses_params() {
        let cmd = Command::from_tool_call(
            "move_entry",
            &serde_json::json!({ "source": 0, "target": 2 }),
        )
        .unwrap();
        assert!(matches!(cmd, Command::MoveEntry(MoveEntryParams { source: 0, target: 2 })));
        assert_eq!(cmd.info().name, "move_entry");

        let cmd = Command::from_tool_call("render_script", &serde_json::Value::Null).unwrap();
        assert!(matches!(cmd, Command::RenderScript));
    }

    #[test]
    fn from_tool_call_rejects_unknown_and_bad_params() {
        assert!(Command::from_tool_call("rm_rf", &serde_json::json!({})).is_err());
        assert!(Command::from_tool_call("move_entry", &serde_json::json!({ "source": "x" })).is_err());
    }

    #[test]
    fn command_enum_is_tagged() {
        let cmd: Command = serde_json::from_value(serde_json::json!({
            "command": "AppendEntry",
            "params": { "command": "Get-Process", "parameters": { "Name": "chrome" } }
        }))
        .unwrap();
        assert_eq!(cmd.info().category, CommandCategory::Script);
    }
}
