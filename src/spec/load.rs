use super::types::Specification;
use anyhow::Context;
use serde_json::{Map, Number, Value};
use std::path::Path;

/// Serialization of a specification document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecFormat {
    Yaml,
    Json,
}

impl SpecFormat {
    /// Pick the format from a file extension; anything but `.yaml`/`.yml` is JSON
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => SpecFormat::Yaml,
            _ => SpecFormat::Json,
        }
    }
}

/// Read and parse a specification file
///
/// A single read; a read or parse failure aborts the run.
pub fn load_spec(path: &Path) -> anyhow::Result<Specification> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read specification: {}", path.display()))?;
    parse_spec(&content, SpecFormat::from_path(path))
        .with_context(|| format!("Failed to parse specification: {}", path.display()))
}

/// Parse a specification from text
pub fn parse_spec(content: &str, format: SpecFormat) -> anyhow::Result<Specification> {
    let value = parse_document(content, format)?;
    spec_from_value(value)
}

/// Build a [`Specification`] from already-parsed structured data
pub fn spec_from_value(value: Value) -> anyhow::Result<Specification> {
    if !value.is_object() {
        anyhow::bail!("specification root must be an object");
    }
    Ok(serde_json::from_value(value)?)
}

/// Parse a document into an order-preserving JSON value
pub fn parse_document(content: &str, format: SpecFormat) -> anyhow::Result<Value> {
    match format {
        SpecFormat::Json => Ok(serde_json::from_str(content)?),
        SpecFormat::Yaml => {
            let yaml: serde_yaml::Value = serde_yaml::from_str(content)?;
            Ok(yaml_to_json(yaml))
        }
    }
}

/// Convert YAML to JSON, stringifying non-string mapping keys
///
/// Unquoted status codes (`200:`) are integers in YAML but keys in OpenAPI.
fn yaml_to_json(value: serde_yaml::Value) -> Value {
    match value {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => yaml_number(&n),
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(seq) => Value::Array(seq.into_iter().map(yaml_to_json).collect()),
        serde_yaml::Value::Mapping(mapping) => {
            let mut out = Map::with_capacity(mapping.len());
            for (k, v) in mapping {
                out.insert(yaml_key(k), yaml_to_json(v));
            }
            Value::Object(out)
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json(tagged.value),
    }
}

fn yaml_number(n: &serde_yaml::Number) -> Value {
    if let Some(i) = n.as_i64() {
        Value::Number(i.into())
    } else if let Some(u) = n.as_u64() {
        Value::Number(u.into())
    } else {
        n.as_f64()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

fn yaml_key(key: serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s,
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Null => "null".to_string(),
        other => serde_yaml::to_string(&other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}
