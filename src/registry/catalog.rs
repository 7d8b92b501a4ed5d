#![allow(clippy::needless_pass_by_value)]

use schemars::schema_for;
use serde::Serialize;
use serde_json::Value;

use super::{CommandCategory, CommandInfo};

/// A registry entry: metadata + JSON schema for the params.
#[derive(Debug, Clone, Serialize)]
pub struct CommandRegistryEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub category: CommandCategory,
    pub param_schema: Value,
}

pub(super) fn empty_object_schema() -> Value {
    serde_json::json!({ "type": "object", "properties": {} })
}

pub(super) fn schema_value<T: schemars::JsonSchema>() -> Value {
    let root = schema_for!(T);
    serde_json::to_value(root).unwrap_or(empty_object_schema())
}

pub(super) fn entry(info: CommandInfo, param_schema: Value) -> CommandRegistryEntry {
    CommandRegistryEntry {
        name: info.name,
        description: info.description,
        category: info.category,
        param_schema,
    }
}

/// Missing params (`null`) are read as an empty object so commands whose
/// params are all optional can be called bare.
pub(super) fn de<T: serde::de::DeserializeOwned>(input: &Value) -> Result<T, String> {
    let input = if input.is_null() {
        serde_json::json!({})
    } else {
        input.clone()
    };
    serde_json::from_value(input).map_err(|e| e.to_string())
}

/// The complete command registry, generated from param struct schemas.
pub fn command_registry() -> Vec<CommandRegistryEntry> {
    super::Command::registry_entries()
}

/// Help text for command discovery.
/// Three tiers: no topic → categories, category → command list, command → full schema.
pub fn help_text(topic: Option<&str>) -> String {
    let registry = command_registry();

    match topic.map(str::trim).filter(|t| !t.is_empty()) {
        None => {
            let mut lines = vec!["Available command categories:".to_string()];
            for cat in CommandCategory::all() {
                let count = registry.iter().filter(|e| e.category == *cat).count();
                if count > 0 {
                    lines.push(format!("  {} ({count}) - {}", cat.slug(), cat.description()));
                }
            }
            lines.push(String::new());
            lines.push("Use help with a category (e.g. \"script\") to list its commands.".to_string());
            lines.push("Use help with a command (e.g. \"move_entry\") for parameter details.".to_string());
            lines.join("\n")
        }
        Some(topic) => {
            if let Some(entry) = registry.iter().find(|e| e.name == topic) {
                let schema_str = serde_json::to_string_pretty(&entry.param_schema)
                    .unwrap_or_else(|_| "{}".to_string());
                return format!(
                    "{}: {}\nCategory: {}\n\nParameters:\n{}",
                    entry.name,
                    entry.description,
                    entry.category.slug(),
                    schema_str,
                );
            }

            let Some(category) = CommandCategory::from_slug(&topic.to_lowercase()) else {
                return format!("Unknown topic: \"{topic}\". Use help to see categories and commands.");
            };
            let mut lines = vec![format!("{} commands:", category.slug())];
            for entry in registry.iter().filter(|e| e.category == category) {
                lines.push(format!("  - {}: {}", entry.name, entry.description));
            }
            lines.push(String::new());
            lines.push("Use help with a command name for parameter details.".to_string());
            lines.join("\n")
        }
    }
}

/// JSON Schema formatted command list (for REST clients).
pub fn to_json_schema() -> Value {
    Value::Array(
        command_registry()
            .iter()
            .map(|e| {
                serde_json::json!({
                    "name": e.name,
                    "description": e.description,
                    "category": e.category,
                    "inputSchema": e.param_schema,
                })
            })
            .collect(),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn help_lists_categories() {
        let text = help_text(None);
        assert!(text.starts_with("Available command categories:"));
        assert!(text.contains("reorder ("));
        assert_eq!(help_text(Some("  ")), text);
    }

    #[test]
    fn help_for_category_lists_commands() {
        let text = help_text(Some("Reorder"));
        assert!(text.contains("start_drag"));
        assert!(text.contains("hover_drag"));
        assert!(!text.contains("append_entry"));
    }

    #[test]
    fn help_for_command_shows_schema() {
        let text = help_text(Some("move_entry"));
        assert!(text.starts_with("move_entry:"));
        assert!(text.contains("\"source\""));
        assert!(text.contains("\"target\""));
    }

    #[test]
    fn help_for_unknown_topic() {
        assert!(help_text(Some("teleport")).starts_with("Unknown topic"));
    }

    #[test]
    fn json_schema_covers_registry() {
        let schema = to_json_schema();
        let list = schema.as_array().unwrap();
        assert_eq!(list.len(), command_registry().len());
        assert!(list.iter().any(|e| e["name"] == "hover_drag"));
    }
}
