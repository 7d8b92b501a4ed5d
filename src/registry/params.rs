use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::model::{ParamValue, ResolvedParameters};

// ── Catalog params ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, TS)]
#[ts(export)]
pub struct SearchCatalogParams {
    /// Case-insensitive text matched against command names and descriptions.
    #[serde(default)]
    pub term: String,
}

/// Names a catalog command. `category` disambiguates commands listed in
/// more than one category; without it the first match wins.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, TS)]
#[ts(export)]
pub struct CommandRefParams {
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
}

// ── Configure params ────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, TS)]
#[ts(export)]
pub struct SetDraftParamParams {
    pub name: String,
    /// Omit or send null to unset the parameter.
    #[serde(default)]
    pub value: Option<ParamValue>,
}

// ── Script params ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, TS)]
#[ts(export)]
pub struct AppendEntryParams {
    pub command: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub parameters: ResolvedParameters,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, TS)]
#[ts(export)]
pub struct IndexParams {
    pub index: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, TS)]
#[ts(export)]
pub struct MoveEntryParams {
    pub source: usize,
    pub target: usize,
}

// ── Export params ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, TS)]
#[ts(export)]
pub struct ExportToFileParams {
    /// Target directory. Defaults to the configured export directory.
    #[serde(default)]
    pub dir: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, TS)]
#[ts(export)]
pub struct ImportScriptParams {
    pub path: String,
}

// ── Query params ────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, TS)]
#[ts(export)]
pub struct HelpParams {
    #[serde(default)]
    pub topic: Option<String>,
}
