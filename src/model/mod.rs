pub mod catalog;
pub mod params;
pub mod script;

// Re-export commonly used types at the model level.
pub use catalog::{Catalog, CategoryView, CommandDefinition, ParamKind, ParameterDefinition};
pub use params::{ParamValue, ResolvedParameters};
pub use script::{ScriptEntry, ScriptSequence};
