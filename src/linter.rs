//! # Specification Linter
//!
//! Reports problems in a specification that compile to something surprising
//! rather than failing outright, plus the fatal ones in a friendlier form.
//!
//! ## Checks Performed
//!
//! 1. **unknown_security_scheme** - a requirement names a scheme that
//!    `components.securitySchemes` does not declare
//! 2. **unsupported_type** - a property has no column type for the target
//!    dialect and degrades to text
//! 3. **invalid_validation_schema** - a derived validator schema is not a
//!    valid JSON Schema document
//! 4. **no_content_stub** - a route will answer "no content" because its
//!    `200`/`201` response carries no JSON example
//! 5. **dangling_reference** - a `$ref` names a schema that does not exist
//! 6. **operation_id_casing** - operationIds double as registry keys and
//!    should be snake_case
//!
//! ## Usage
//!
//! ```rust,ignore
//! use foundry::assembly::CompileOptions;
//! use foundry::linter::{lint_spec, print_lint_issues};
//! use foundry::spec::load_spec;
//!
//! let spec = load_spec("openapi.yaml".as_ref())?;
//! let issues = lint_spec(&spec, &CompileOptions::default());
//! print_lint_issues(&issues);
//! ```

use crate::assembly::CompileOptions;
use crate::naming::{ref_name, to_snake_case, SCHEMA_REF_PREFIX};
use crate::routes::{compile_routes, ResponseStub};
use crate::schema::compile_spec_schemas;
use crate::spec::{extract_model, SchemaDefinition, SpecModel, Specification};
use crate::validation::derive_validation_config;
use serde_json::Value;
use std::fmt;


/// Severity level for lint issues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintSeverity {
    /// Error - Compilation will fail or emit unusable output
    Error,
    /// Warning - Output is produced but probably not what was meant
    Warning,
    /// Info - Worth knowing
    Info,
}

impl fmt::Display for LintSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LintSeverity::Error => write!(f, "error"),
            LintSeverity::Warning => write!(f, "warning"),
            LintSeverity::Info => write!(f, "info"),
        }
    }
}

/// A lint issue found in a specification
#[derive(Debug, Clone)]
pub struct LintIssue {
    /// Where the issue occurred (e.g., "/users/{id} get get_user", "schema:User.address")
    pub location: String,
    pub severity: LintSeverity,
    /// Type of lint issue (e.g., "dangling_reference")
    pub kind: String,
    /// Human-readable description of the problem
    pub message: String,
    /// Optional suggestion for how to fix it
    pub suggestion: Option<String>,
}

impl LintIssue {
    /// Create a new lint issue
    pub fn new(
        location: impl Into<String>,
        severity: LintSeverity,
        kind: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        LintIssue {
            location: location.into(),
            severity,
            kind: kind.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    /// Add a suggestion for fixing the issue
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// Lint a parsed specification
///
/// Extraction failures are reported as a single `malformed_specification`
/// error since nothing downstream can be checked without the route model.
pub fn lint_spec(spec: &Specification, options: &CompileOptions) -> Vec<LintIssue> {
    let mut issues = Vec::new();

    lint_schema_refs(spec, &mut issues);

    let model = match extract_model(spec) {
        Ok(model) => model,
        Err(err) => {
            issues.push(LintIssue::new(
                "specification",
                LintSeverity::Error,
                "malformed_specification",
                err.to_string(),
            ));
            return issues;
        }
    };

    lint_operations(spec, &model, &mut issues);
    lint_routes(spec, &model, options, &mut issues);

    if let Some(dialect) = &options.dialect {
        match compile_spec_schemas(spec, dialect, options.junction) {
            Ok(schema) => {
                for degraded in &schema.degraded {
                    issues.push(
                        LintIssue::new(
                            format!("schema:{}.{}", degraded.schema, degraded.property),
                            LintSeverity::Info,
                            "unsupported_type",
                            format!(
                                "type '{}'{} has no {} column type; stored as {}",
                                degraded.json_type.as_deref().unwrap_or("<none>"),
                                degraded
                                    .format
                                    .as_deref()
                                    .map(|f| format!(" (format '{f}')"))
                                    .unwrap_or_default(),
                                dialect,
                                dialect.text_type()
                            ),
                        )
                        .with_suggestion("Declare a supported type or accept text storage"),
                    );
                }
            }
            Err(err) => issues.push(LintIssue::new(
                "components.schemas",
                LintSeverity::Error,
                "malformed_specification",
                err.to_string(),
            )),
        }
    }

    issues
}

fn lint_operations(spec: &Specification, model: &SpecModel, issues: &mut Vec<LintIssue>) {
    let schemes = spec.security_schemes();

    for (item, operation) in model.operations() {
        let location = format!("{} {} {}", item.path, operation.method, operation.operation_id);

        if to_snake_case(&operation.operation_id) != operation.operation_id {
            issues.push(
                LintIssue::new(
                    &location,
                    LintSeverity::Info,
                    "operation_id_casing",
                    format!(
                        "operationId '{}' should be snake_case",
                        operation.operation_id
                    ),
                )
                .with_suggestion(format!(
                    "Change to: {}",
                    to_snake_case(&operation.operation_id)
                )),
            );
        }

        for requirement in &operation.security {
            for scheme in requirement.keys() {
                if schemes.is_some_and(|s| s.contains_key(scheme)) {
                    continue;
                }
                issues.push(
                    LintIssue::new(
                        &location,
                        LintSeverity::Warning,
                        "unknown_security_scheme",
                        format!(
                            "Security scheme '{scheme}' is not declared in components.securitySchemes"
                        ),
                    )
                    .with_suggestion(format!(
                        "Declare '{scheme}' or register a provider named '{scheme}' at run time"
                    )),
                );
            }
        }

        let config = derive_validation_config(operation);
        for (bucket, schema) in config.schemas() {
            if !jsonschema::meta::is_valid(schema) {
                issues.push(LintIssue::new(
                    &location,
                    LintSeverity::Error,
                    "invalid_validation_schema",
                    format!("The {bucket} validator schema is not a valid JSON Schema"),
                ));
            }
        }

        if let Some(schema) = operation
            .request_body
            .as_ref()
            .and_then(|b| b.json_schema.as_ref())
        {
            lint_value_refs(spec, schema, &format!("{location} requestBody"), issues);
        }
    }
}

fn lint_routes(
    spec: &Specification,
    model: &SpecModel,
    options: &CompileOptions,
    issues: &mut Vec<LintIssue>,
) {
    let (routes, _) = compile_routes(model, spec.security_schemes(), options.router_syntax);
    for route in routes.routes() {
        if route.response == ResponseStub::NoContent {
            issues.push(
                LintIssue::new(
                    format!("{} {} {}", route.template, route.method, route.operation_id),
                    LintSeverity::Info,
                    "no_content_stub",
                    "No JSON example on the 200/201 response; the stub responds with no content",
                )
                .with_suggestion("Add an `example` or `examples` entry to the JSON response"),
            );
        }
    }
}

fn schema_exists(spec: &Specification, name: &str) -> bool {
    spec.schemas().is_some_and(|s| s.contains_key(name))
}

fn dangling(location: &str, target: &str) -> LintIssue {
    LintIssue::new(
        location,
        LintSeverity::Error,
        "dangling_reference",
        format!("Schema reference '{target}' not found in components.schemas"),
    )
    .with_suggestion(format!("Add '{target}' to components.schemas"))
}

/// `$ref`s in component schemas, one level deep (properties and their items)
fn lint_schema_refs(spec: &Specification, issues: &mut Vec<LintIssue>) {
    let Some(schemas) = spec.schemas() else {
        return;
    };
    for (name, definition) in schemas.iter() {
        for (prop_name, prop) in definition.properties.iter() {
            let location = format!("schema:{name}.{prop_name}");
            for target in property_refs(prop) {
                if !schema_exists(spec, ref_name(target)) {
                    issues.push(dangling(&location, ref_name(target)));
                }
            }
        }
    }
}

fn property_refs(prop: &SchemaDefinition) -> impl Iterator<Item = &str> {
    prop.reference
        .as_deref()
        .into_iter()
        .chain(prop.items.as_ref().and_then(|i| i.reference.as_deref()))
}

/// Every local schema `$ref` anywhere inside `value`
fn lint_value_refs(spec: &Specification, value: &Value, location: &str, issues: &mut Vec<LintIssue>) {
    match value {
        Value::Object(map) => {
            if let Some(target) = map
                .get("$ref")
                .and_then(Value::as_str)
                .and_then(|r| r.strip_prefix(SCHEMA_REF_PREFIX))
            {
                if !schema_exists(spec, target) {
                    issues.push(dangling(location, target));
                }
            }
            for child in map.values() {
                lint_value_refs(spec, child, location, issues);
            }
        }
        Value::Array(items) => {
            for child in items {
                lint_value_refs(spec, child, location, issues);
            }
        }
        _ => {}
    }
}

/// Whether any issue is an error
pub fn has_errors(issues: &[LintIssue]) -> bool {
    issues.iter().any(|i| i.severity == LintSeverity::Error)
}

/// Print lint issues in a formatted way
pub fn print_lint_issues(issues: &[LintIssue]) {
    if issues.is_empty() {
        println!("✅ No lint issues found!");
        return;
    }

    let count = |severity: LintSeverity| issues.iter().filter(|i| i.severity == severity).count();
    println!("\n📋 Lint Results:");
    println!(
        "   {} error(s), {} warning(s), {} info(s)\n",
        count(LintSeverity::Error),
        count(LintSeverity::Warning),
        count(LintSeverity::Info)
    );

    for (severity, heading) in [
        (LintSeverity::Error, "❌ Errors (must fix):"),
        (LintSeverity::Warning, "⚠️  Warnings (should fix):"),
        (LintSeverity::Info, "ℹ️  Info:"),
    ] {
        let group: Vec<_> = issues.iter().filter(|i| i.severity == severity).collect();
        if group.is_empty() {
            continue;
        }
        println!("{heading}");
        for issue in group {
            println!("   [{}] {}", issue.kind, issue.location);
            println!("      {}", issue.message);
            if let Some(suggestion) = &issue.suggestion {
                println!("      💡 Suggestion: {suggestion}");
            }
        }
        println!();
    }
}
