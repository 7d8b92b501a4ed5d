use std::collections::BTreeMap;
use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A resolved parameter value. Serializes as a bare JSON scalar so stored
/// blobs and request bodies read naturally (`{"Name": "chrome", "Force": true}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, JsonSchema)]
#[serde(untagged)]
#[ts(export)]
pub enum ParamValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl ParamValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParamValue::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            ParamValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Empty text counts as "not provided" everywhere a value is rendered.
    pub fn is_blank(&self) -> bool {
        matches!(self, ParamValue::Text(v) if v.is_empty())
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            ParamValue::Bool(_) => "boolean",
            ParamValue::Number(_) => "number",
            ParamValue::Text(_) => "text",
        }
    }
}

/// Script-text rendering: numbers use the shortest decimal form (`4`, `2.5`).
impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Bool(v) => write!(f, "{v}"),
            ParamValue::Number(v) => write!(f, "{v}"),
            ParamValue::Text(v) => f.write_str(v),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Text(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::Text(v)
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Number(v)
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Bool(v)
    }
}

/// Parameter name → value for one configured command. A parameter that is
/// absent here is unset. Serializes as a flat JSON object.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS, JsonSchema)]
#[serde(transparent)]
#[ts(export)]
pub struct ResolvedParameters(BTreeMap<String, ParamValue>);

impl ResolvedParameters {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Builder form of [`ResolvedParameters::set`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    /// Set or, with `None`, unset a parameter.
    pub fn set(&mut self, name: impl Into<String>, value: Option<ParamValue>) {
        let name = name.into();
        match value {
            Some(v) => {
                self.0.insert(name, v);
            }
            None => {
                self.0.remove(&name);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.0.get(name)
    }

    /// The value to render for `name`, skipping unset and blank values.
    pub fn rendered(&self, name: &str) -> Option<&ParamValue> {
        self.get(name).filter(|v| !v.is_blank())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn untagged_json_shape() {
        let params: ResolvedParameters =
            serde_json::from_str(r#"{"Name": "chrome", "Id": 42, "Force": true}"#).unwrap();
        assert_eq!(params.get("Name"), Some(&ParamValue::Text("chrome".into())));
        assert_eq!(params.get("Id"), Some(&ParamValue::Number(42.0)));
        assert_eq!(params.get("Force"), Some(&ParamValue::Bool(true)));
    }

    #[test]
    fn numbers_render_without_trailing_zero() {
        assert_eq!(ParamValue::Number(4.0).to_string(), "4");
        assert_eq!(ParamValue::Number(2.5).to_string(), "2.5");
        assert_eq!(ParamValue::Number(-1.0).to_string(), "-1");
    }

    #[test]
    fn set_none_unsets() {
        let mut params = ResolvedParameters::new().with("Path", "C:\\temp");
        params.set("Path", None);
        assert!(params.is_empty());
    }

    #[test]
    fn blank_text_is_not_rendered() {
        let params = ResolvedParameters::new().with("Filter", "").with("Force", false);
        assert!(params.rendered("Filter").is_none());
        assert_eq!(params.rendered("Force"), Some(&ParamValue::Bool(false)));
        assert!(params.rendered("Missing").is_none());
    }
}
