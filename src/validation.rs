//! Validation config deriver.
//!
//! Each operation's parameters are bucketed by location into synthesized
//! object schemas; the request body's JSON schema is taken verbatim. The
//! result is configuration for a runtime validator registry keyed by
//! operationId; nothing here executes validation.

use crate::error::RegistrationConflict;
use crate::registry::Registry;
use crate::spec::{Operation, ParameterLocation, SpecModel};
use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::warn;

/// Registry of validator configs keyed by operationId, in source order
pub type ValidationArtifact = Registry<ValidationConfig>;

/// The four validator schemas of one operation
///
/// `path`, `query` and `headers` are always present; an empty object schema
/// accepts anything. `body` is `None` when the operation has no request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationConfig {
    pub path: Value,
    pub query: Value,
    pub headers: Value,
    pub body: Option<Value>,
}

impl ValidationConfig {
    /// Every present schema with its location label
    pub fn schemas(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        [
            ("path", Some(&self.path)),
            ("query", Some(&self.query)),
            ("headers", Some(&self.headers)),
            ("body", self.body.as_ref()),
        ]
        .into_iter()
        .filter_map(|(label, schema)| schema.map(|s| (label, s)))
    }
}

#[derive(Default)]
struct Bucket {
    properties: Map<String, Value>,
    required: Vec<String>,
}

impl Bucket {
    fn add(&mut self, name: String, schema: Value, required: bool) {
        if required && !self.required.contains(&name) {
            self.required.push(name.clone());
        }
        self.properties.insert(name, schema);
    }

    fn into_schema(self) -> Value {
        json!({
            "type": "object",
            "properties": Value::Object(self.properties),
            "required": self.required,
        })
    }
}

fn string_schema() -> Value {
    json!({ "type": "string" })
}

/// Synthesize the validator schemas for one operation
pub fn derive_validation_config(operation: &Operation) -> ValidationConfig {
    let mut path = Bucket::default();
    let mut query = Bucket::default();
    let mut headers = Bucket::default();

    for param in &operation.parameters {
        let schema = param.schema.clone().unwrap_or_else(string_schema);
        match param.location {
            ParameterLocation::Path => path.add(param.name.clone(), schema, param.required),
            ParameterLocation::Query => query.add(param.name.clone(), schema, param.required),
            ParameterLocation::Header => {
                headers.add(param.name.to_ascii_lowercase(), schema, param.required)
            }
            ParameterLocation::Cookie => {}
        }
    }

    ValidationConfig {
        path: path.into_schema(),
        query: query.into_schema(),
        headers: headers.into_schema(),
        body: operation
            .request_body
            .as_ref()
            .and_then(|b| b.json_schema.clone()),
    }
}

/// Derive configs for every operation in source order
///
/// Conflicting registrations are logged and returned; the first one stays.
pub fn derive_validation_configs(
    model: &SpecModel,
) -> (ValidationArtifact, Vec<RegistrationConflict>) {
    let mut artifact = ValidationArtifact::new("validation");
    let mut conflicts = Vec::new();
    for (_, operation) in model.operations() {
        let config = derive_validation_config(operation);
        if let Err(conflict) = artifact.register(operation.operation_id.as_str(), config) {
            warn!(%conflict, "validation registration rejected");
            conflicts.push(conflict);
        }
    }
    (artifact, conflicts)
}
