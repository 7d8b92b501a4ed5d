use std::sync::Arc;

use serde::Serialize;
use ts_rs::TS;

use super::catalog::CommandDefinition;
use super::params::ResolvedParameters;
use crate::error::AppError;

/// One configured command placed in the script: a shared catalog definition
/// plus the parameter values this entry owns.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct ScriptEntry {
    pub definition: Arc<CommandDefinition>,
    pub parameters: ResolvedParameters,
}

impl ScriptEntry {
    /// Build an entry, rejecting parameters the definition does not declare
    /// and values that do not fit their declared kind.
    pub fn new(
        definition: Arc<CommandDefinition>,
        parameters: ResolvedParameters,
    ) -> Result<Self, AppError> {
        for name in parameters.names() {
            let Some(decl) = definition.parameter(name) else {
                return Err(AppError::ValidationError {
                    message: format!("\"{}\" has no parameter \"{name}\"", definition.name),
                });
            };
            if let Some(value) = parameters.get(name) {
                decl.check(value)?;
            }
        }
        Ok(Self {
            definition,
            parameters,
        })
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }
}

/// The ordered list of configured commands. Identity is positional: the same
/// command may appear any number of times. `append`, `remove_at` and
/// `move_to` are the only mutators.
#[derive(Debug, Clone, Default, PartialEq, Serialize, TS)]
#[serde(transparent)]
#[ts(export)]
pub struct ScriptSequence(Vec<ScriptEntry>);

impl ScriptSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, entry: ScriptEntry) {
        self.0.push(entry);
    }

    /// Remove the entry at `index`; later entries shift down by one.
    pub fn remove_at(&mut self, index: usize) -> Result<ScriptEntry, AppError> {
        self.check_index(index)?;
        Ok(self.0.remove(index))
    }

    /// Splice the entry at `source` out, then back in at `target` of the
    /// shortened sequence. Not a swap: `[A, B, C, D]` with `move_to(0, 2)`
    /// becomes `[B, C, A, D]`. Equal indices leave the sequence unchanged.
    pub fn move_to(&mut self, source: usize, target: usize) -> Result<(), AppError> {
        self.check_index(source)?;
        self.check_index(target)?;
        if source == target {
            return Ok(());
        }
        let entry = self.0.remove(source);
        self.0.insert(target, entry);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn get(&self, index: usize) -> Option<&ScriptEntry> {
        self.0.get(index)
    }

    pub fn entries(&self) -> &[ScriptEntry] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScriptEntry> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn check_index(&self, index: usize) -> Result<(), AppError> {
        if index < self.0.len() {
            Ok(())
        } else {
            Err(AppError::InvalidIndex {
                what: "script entry".to_string(),
                index,
            })
        }
    }
}

impl<'a> IntoIterator for &'a ScriptSequence {
    type Item = &'a ScriptEntry;
    type IntoIter = std::slice::Iter<'a, ScriptEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
pub(crate) mod tests {
    use super::*;
    use crate::model::{ParamKind, ParameterDefinition};

    pub(crate) fn entry(name: &str) -> ScriptEntry {
        ScriptEntry::new(
            Arc::new(CommandDefinition::new(name, format!("{name} command"))),
            ResolvedParameters::new(),
        )
        .unwrap()
    }

    pub(crate) fn sequence(names: &[&str]) -> ScriptSequence {
        let mut seq = ScriptSequence::new();
        for name in names {
            seq.append(entry(name));
        }
        seq
    }

    pub(crate) fn names(seq: &ScriptSequence) -> Vec<&str> {
        seq.iter().map(ScriptEntry::name).collect()
    }

    #[test]
    fn append_goes_to_the_end() {
        let mut seq = sequence(&["A", "B"]);
        seq.append(entry("C"));
        assert_eq!(names(&seq), ["A", "B", "C"]);
        assert_eq!(seq.len(), 3);
    }

    #[test]
    fn duplicates_are_positional() {
        let seq = sequence(&["A", "A", "A"]);
        assert_eq!(seq.len(), 3);
    }

    #[test]
    fn remove_keeps_survivor_order() {
        let mut seq = sequence(&["A", "B", "C", "D"]);
        let removed = seq.remove_at(1).unwrap();
        assert_eq!(removed.name(), "B");
        assert_eq!(names(&seq), ["A", "C", "D"]);

        seq.remove_at(2).unwrap();
        assert_eq!(names(&seq), ["A", "C"]);
    }

    #[test]
    fn remove_out_of_range_is_rejected_without_change() {
        let mut seq = sequence(&["A"]);
        assert!(matches!(
            seq.remove_at(1),
            Err(AppError::InvalidIndex { index: 1, .. })
        ));
        assert_eq!(names(&seq), ["A"]);
    }

    #[test]
    fn move_is_splice_not_swap() {
        let mut seq = sequence(&["A", "B", "C", "D"]);
        seq.move_to(0, 2).unwrap();
        assert_eq!(names(&seq), ["B", "C", "A", "D"]);

        seq.move_to(3, 0).unwrap();
        assert_eq!(names(&seq), ["D", "B", "C", "A"]);
    }

    #[test]
    fn move_to_same_index_is_noop() {
        for i in 0..4 {
            let mut seq = sequence(&["A", "B", "C", "D"]);
            seq.move_to(i, i).unwrap();
            assert_eq!(names(&seq), ["A", "B", "C", "D"]);
        }
    }

    #[test]
    fn move_out_of_range_is_rejected() {
        let mut seq = sequence(&["A", "B"]);
        assert!(seq.move_to(0, 2).is_err());
        assert!(seq.move_to(5, 0).is_err());
        assert_eq!(names(&seq), ["A", "B"]);
    }

    #[test]
    fn entry_rejects_undeclared_or_mistyped_params() {
        let def = Arc::new(
            CommandDefinition::new("Get-Process", "Gets processes")
                .param(ParameterDefinition::new("Name", ParamKind::Text))
                .param(ParameterDefinition::new("Id", ParamKind::Number)),
        );
        assert!(ScriptEntry::new(def.clone(), ResolvedParameters::new().with("Name", "x")).is_ok());
        assert!(ScriptEntry::new(def.clone(), ResolvedParameters::new().with("Bogus", "x")).is_err());
        assert!(ScriptEntry::new(def, ResolvedParameters::new().with("Id", "seven")).is_err());
    }
}
