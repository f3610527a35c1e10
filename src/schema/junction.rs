//! Junction (association) table detection.
//!
//! A junction schema models only a relation, so the compiler suppresses its
//! standard `_id`/`created_at` columns. Detection is a plain function value so
//! the DDL emitter never needs to know which rule is in force.

use crate::spec::SchemaDefinition;
use serde::Deserialize;

/// Decides whether a named object schema is a junction table
pub type JunctionPredicate = fn(&str, &SchemaDefinition) -> bool;

fn has_array_of_ref(definition: &SchemaDefinition) -> bool {
    definition
        .properties
        .values()
        .any(|p| p.array_item_ref().is_some())
}

/// Naming convention: the name contains `_` and some property is an array of `$ref`
pub fn is_junction_by_naming(name: &str, definition: &SchemaDefinition) -> bool {
    name.contains('_') && has_array_of_ref(definition)
}

/// Explicit opt-in: the schema carries `x-junction: true`
pub fn is_junction_by_extension(_name: &str, definition: &SchemaDefinition) -> bool {
    definition.x_junction == Some(true)
}

/// Either rule
pub fn is_junction_by_either(name: &str, definition: &SchemaDefinition) -> bool {
    is_junction_by_extension(name, definition) || is_junction_by_naming(name, definition)
}

/// Configurable selection of a built-in predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JunctionDetection {
    #[default]
    Naming,
    Extension,
    Either,
}

impl JunctionDetection {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "naming" => Some(JunctionDetection::Naming),
            "extension" => Some(JunctionDetection::Extension),
            "either" => Some(JunctionDetection::Either),
            _ => None,
        }
    }

    pub fn predicate(self) -> JunctionPredicate {
        match self {
            JunctionDetection::Naming => is_junction_by_naming,
            JunctionDetection::Extension => is_junction_by_extension,
            JunctionDetection::Either => is_junction_by_either,
        }
    }
}
