use std::collections::HashSet;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::params::ParamValue;
use crate::error::AppError;

const BUILTIN_CATALOG: &str = include_str!("../catalog/powershell.json");

/// Which input widget a parameter gets, and which values it accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum ParamKind {
    Text,
    Number,
    Boolean,
    /// One of `ParameterDefinition::choices`.
    Choice,
    /// Filesystem path, entered as text.
    Path,
}

impl ParamKind {
    pub fn label(self) -> &'static str {
        match self {
            ParamKind::Text => "text",
            ParamKind::Number => "number",
            ParamKind::Boolean => "boolean",
            ParamKind::Choice => "choice",
            ParamKind::Path => "path",
        }
    }
}

/// One declared parameter of a catalog command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ParameterDefinition {
    pub name: String,
    pub kind: ParamKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<ParamValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<String>,
}

impl ParameterDefinition {
    pub fn new(name: impl Into<String>, kind: ParamKind) -> Self {
        Self {
            name: name.into(),
            kind,
            description: None,
            required: false,
            default: None,
            placeholder: None,
            choices: Vec::new(),
        }
    }

    /// Check that `value` fits this parameter's kind. Empty text is accepted
    /// for every text-like kind (it means "not provided").
    pub fn check(&self, value: &ParamValue) -> Result<(), AppError> {
        let ok = match (self.kind, value) {
            (ParamKind::Text | ParamKind::Path, ParamValue::Text(_))
            | (ParamKind::Number, ParamValue::Number(_))
            | (ParamKind::Boolean, ParamValue::Bool(_)) => true,
            (ParamKind::Choice, ParamValue::Text(v)) => {
                v.is_empty() || self.choices.iter().any(|c| c == v)
            }
            _ => false,
        };
        if ok {
            Ok(())
        } else {
            Err(AppError::ValidationError {
                message: format!(
                    "Parameter \"{}\" expects {}, got {} \"{value}\"",
                    self.name,
                    self.kind.label(),
                    value.type_name(),
                ),
            })
        }
    }

    /// Input hint shown in an empty field.
    pub fn placeholder_text(&self) -> String {
        self.placeholder
            .clone()
            .unwrap_or_else(|| format!("Enter {}", self.name))
    }
}

/// A command the user can place in a script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CommandDefinition {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub parameters: Vec<ParameterDefinition>,
}

impl CommandDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
        }
    }

    pub fn param(mut self, param: ParameterDefinition) -> Self {
        self.parameters.push(param);
        self
    }

    pub fn parameter(&self, name: &str) -> Option<&ParameterDefinition> {
        self.parameters.iter().find(|p| p.name == name)
    }

    fn matches(&self, needle_lower: &str) -> bool {
        self.name.to_lowercase().contains(needle_lower)
            || self.description.to_lowercase().contains(needle_lower)
    }
}

/// One catalog category as sent to a client.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct CategoryView {
    pub name: String,
    pub commands: Vec<Arc<CommandDefinition>>,
}

/// Read-only table of commands grouped by category, in document order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    categories: IndexMap<String, Vec<Arc<CommandDefinition>>>,
}

impl Catalog {
    /// The catalog shipped with the binary.
    pub fn builtin() -> Result<Self, AppError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    /// Parse a catalog from a JSON object of `category → [command]`.
    pub fn from_json(json: &str) -> Result<Self, AppError> {
        let raw: IndexMap<String, Vec<CommandDefinition>> =
            serde_json::from_str(json).map_err(|e| AppError::ValidationError {
                message: format!("Invalid catalog: {e}"),
            })?;
        let mut categories = IndexMap::with_capacity(raw.len());
        for (category, commands) in raw {
            validate_category(&category, &commands)?;
            categories.insert(category, commands.into_iter().map(Arc::new).collect());
        }
        Ok(Self { categories })
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    pub fn commands_in(&self, category: &str) -> Option<&[Arc<CommandDefinition>]> {
        self.categories.get(category).map(Vec::as_slice)
    }

    /// First command with this name, in category order.
    pub fn find(&self, name: &str) -> Option<&Arc<CommandDefinition>> {
        self.categories
            .values()
            .flat_map(|cmds| cmds.iter())
            .find(|c| c.name == name)
    }

    /// Lookup scoped to one category, or the first match when `category` is None.
    pub fn resolve(
        &self,
        name: &str,
        category: Option<&str>,
    ) -> Result<Arc<CommandDefinition>, AppError> {
        let found = match category {
            Some(cat) => self
                .commands_in(cat)
                .and_then(|cmds| cmds.iter().find(|c| c.name == name)),
            None => self.find(name),
        };
        found.cloned().ok_or_else(|| AppError::NotFound {
            what: match category {
                Some(cat) => format!("Command \"{name}\" in category \"{cat}\""),
                None => format!("Command \"{name}\""),
            },
        })
    }

    /// Case-insensitive substring search over names and descriptions.
    /// Categories with no match are dropped; an empty term returns everything.
    pub fn search(&self, term: &str) -> Vec<CategoryView> {
        let needle = term.trim().to_lowercase();
        self.categories
            .iter()
            .filter_map(|(name, cmds)| {
                let commands: Vec<_> = cmds
                    .iter()
                    .filter(|c| needle.is_empty() || c.matches(&needle))
                    .cloned()
                    .collect();
                (!commands.is_empty()).then(|| CategoryView {
                    name: name.clone(),
                    commands,
                })
            })
            .collect()
    }

    pub fn views(&self) -> Vec<CategoryView> {
        self.search("")
    }

    pub fn command_count(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }
}

fn validate_category(category: &str, commands: &[CommandDefinition]) -> Result<(), AppError> {
    let mut names = HashSet::new();
    for cmd in commands {
        if !names.insert(cmd.name.as_str()) {
            return Err(AppError::ValidationError {
                message: format!("Duplicate command \"{}\" in category \"{category}\"", cmd.name),
            });
        }
        let mut params = HashSet::new();
        for p in &cmd.parameters {
            if !params.insert(p.name.as_str()) {
                return Err(AppError::ValidationError {
                    message: format!("Duplicate parameter \"{}\" on \"{}\"", p.name, cmd.name),
                });
            }
        }
    }
    Ok(())
}
