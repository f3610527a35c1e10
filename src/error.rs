use std::fmt;

/// Fatal compilation error
///
/// Returned by the extractor, the relational schema compiler and artifact
/// assembly. A run that produces one of these emits nothing; the run is a pure
/// function of its input, so none of them are retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// The document is structurally unusable
    ///
    /// Covers a missing `paths` object, missing `components.schemas` when
    /// schema compilation was requested, a missing or duplicate `operationId`
    /// and vendor extensions of the wrong shape.
    MalformedSpecification {
        /// Where the problem is (e.g. `/widgets/{id} get`, `schema:Order.items`)
        location: String,
        /// What is wrong at that location
        reason: String,
    },
    /// A `$ref` or array-of-`$ref` names a schema that did not compile to a table
    UnresolvableReference {
        /// Schema (or table) holding the reference
        owner: String,
        /// Property carrying the reference
        property: String,
        /// Referenced schema name
        target: String,
    },
}

impl CompileError {
    pub(crate) fn malformed(location: impl Into<String>, reason: impl Into<String>) -> Self {
        CompileError::MalformedSpecification {
            location: location.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::MalformedSpecification { location, reason } => {
                write!(f, "malformed specification at {location}: {reason}")
            }
            CompileError::UnresolvableReference {
                owner,
                property,
                target,
            } => {
                write!(
                    f,
                    "unresolvable reference: {owner}.{property} refers to '{target}', \
                    which is not a compiled table with an _id key"
                )
            }
        }
    }
}

impl std::error::Error for CompileError {}

/// A second registration for a key that is already registered
///
/// Non-fatal: the caller reports it and the earlier registration is retained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationConflict {
    /// Registry that rejected the entry (e.g. `validation`, `security`)
    pub registry: String,
    /// Key that was already taken
    pub key: String,
}

impl fmt::Display for RegistrationConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "duplicate {} registration for '{}'; keeping the earlier one",
            self.registry, self.key
        )
    }
}

impl std::error::Error for RegistrationConflict {}
