use super::ordered::OrderedMap;
use super::types::{
    HttpMethod, MiddlewareRef, Operation, Parameter, ParameterLocation, PathItem, RequestBody,
    SecurityRequirement, Specification, SpecModel,
};
use crate::error::CompileError;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

const JSON_MEDIA_TYPE: &str = "application/json";

/// The subset of an operation object the extractor reads
#[derive(Debug, Default, Deserialize)]
struct RawOperation {
    #[serde(default, rename = "operationId")]
    operation_id: Option<String>,
    #[serde(default)]
    parameters: Vec<Value>,
    #[serde(default, rename = "requestBody")]
    request_body: Option<Value>,
    #[serde(default)]
    responses: OrderedMap<Value>,
    #[serde(default)]
    security: Option<Vec<SecurityRequirement>>,
    #[serde(default, rename = "x-service")]
    x_service: Option<Value>,
    #[serde(default, rename = "x-middleware")]
    x_middleware: Option<Value>,
}

/// Normalise a specification into the shared route/operation model
///
/// PathItems keep declaration order, and so do their operations. Only
/// `get`, `post`, `put`, `delete` and `patch` become operations; every
/// other PathItem key (shared `parameters`, `summary`, `$ref`, ...) is ignored.
///
/// # Errors
///
/// `MalformedSpecification` when `paths` is absent, an operation has no
/// `operationId`, an `operationId` repeats, or a vendor extension has the
/// wrong shape.
pub fn extract_model(spec: &Specification) -> Result<SpecModel, CompileError> {
    let paths = spec
        .paths
        .as_ref()
        .ok_or_else(|| CompileError::malformed("paths", "specification has no `paths` object"))?;

    let mut seen: HashMap<String, String> = HashMap::new();
    let mut path_items = Vec::with_capacity(paths.len());

    for (path, item) in paths.iter() {
        let Some(item_obj) = item.as_object() else {
            return Err(CompileError::malformed(path, "path item must be an object"));
        };

        let mut operations = Vec::new();
        for (key, raw) in item_obj {
            let Some(method) = HttpMethod::from_key(key) else {
                continue;
            };
            let location = format!("{path} {method}");
            let operation = extract_operation(spec, method, raw, &location)?;

            if let Some(first) = seen.get(&operation.operation_id) {
                return Err(CompileError::malformed(
                    &location,
                    format!(
                        "duplicate operationId '{}' (first declared at {first})",
                        operation.operation_id
                    ),
                ));
            }
            seen.insert(operation.operation_id.clone(), location);
            operations.push(operation);
        }

        path_items.push(PathItem {
            path: path.to_string(),
            service: service_hint(item_obj.get("x-service"), path)?,
            middleware: normalize_middleware(item_obj.get("x-middleware"), path)?,
            operations,
        });
    }

    debug!(
        path_items = path_items.len(),
        operations = seen.len(),
        "extracted route model"
    );
    Ok(SpecModel { path_items })
}

fn extract_operation(
    spec: &Specification,
    method: HttpMethod,
    raw: &Value,
    location: &str,
) -> Result<Operation, CompileError> {
    let op: RawOperation = serde_json::from_value(raw.clone())
        .map_err(|e| CompileError::malformed(location, format!("invalid operation: {e}")))?;

    let operation_id = op
        .operation_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| CompileError::malformed(location, "operation has no operationId"))?;

    let security = op
        .security
        .or_else(|| spec.security.clone())
        .unwrap_or_default();

    Ok(Operation {
        method,
        parameters: extract_parameters(spec, &op.parameters, location)?,
        request_body: extract_request_body(spec, op.request_body.as_ref(), location)?,
        responses: resolve_responses(spec, &op.responses, location)?,
        security,
        service: service_hint(op.x_service.as_ref(), location)?,
        middleware: normalize_middleware(op.x_middleware.as_ref(), location)?,
        operation_id,
    })
}

/// Normalise an `x-middleware` value into an ordered reference list
///
/// Absent or `null` is empty; a string or `{name: ..}` object is a single
/// reference; an array holds any mix of the two.
pub fn normalize_middleware(
    value: Option<&Value>,
    location: &str,
) -> Result<Vec<MiddlewareRef>, CompileError> {
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| middleware_ref(item, location))
            .collect(),
        Some(single) => Ok(vec![middleware_ref(single, location)?]),
    }
}

fn middleware_ref(value: &Value, location: &str) -> Result<MiddlewareRef, CompileError> {
    named_value(value)
        .map(MiddlewareRef::new)
        .ok_or_else(|| {
            CompileError::malformed(
                location,
                format!("x-middleware entries must be a name or {{name: ..}}, found {value}"),
            )
        })
}

/// Read an `x-service` hint given as a string or `{name: ..}`
pub fn service_hint(value: Option<&Value>, location: &str) -> Result<Option<String>, CompileError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(v) => named_value(v).map(Some).ok_or_else(|| {
            CompileError::malformed(
                location,
                format!("x-service must be a name or {{name: ..}}, found {v}"),
            )
        }),
    }
}

fn named_value(value: &Value) -> Option<String> {
    let name = match value {
        Value::String(s) => s.as_str(),
        Value::Object(obj) => obj.get("name")?.as_str()?,
        _ => return None,
    };
    let name = name.trim();
    (!name.is_empty()).then(|| name.to_string())
}

/// Follow a local `$ref` into one `components` section
///
/// Non-reference values are returned as they are.
fn resolve_local<'a>(
    value: &'a Value,
    section: Option<&'a OrderedMap<Value>>,
    prefix: &str,
    location: &str,
) -> Result<&'a Value, CompileError> {
    let Some(ref_path) = value.get("$ref").and_then(Value::as_str) else {
        return Ok(value);
    };
    ref_path
        .strip_prefix(prefix)
        .and_then(|name| section?.get(name))
        .ok_or_else(|| {
            CompileError::malformed(location, format!("cannot resolve reference '{ref_path}'"))
        })
}

fn extract_parameters(
    spec: &Specification,
    params: &[Value],
    location: &str,
) -> Result<Vec<Parameter>, CompileError> {
    let section = spec.components.as_ref().map(|c| &c.parameters);
    let mut out = Vec::with_capacity(params.len());
    for raw in params {
        let param = resolve_local(raw, section, "#/components/parameters/", location)?;
        let name = param
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| CompileError::malformed(location, "parameter has no name"))?;
        let param_in = param.get("in").and_then(Value::as_str).unwrap_or_default();
        let param_location = ParameterLocation::from_key(param_in).ok_or_else(|| {
            CompileError::malformed(
                location,
                format!("parameter '{name}' has unsupported location '{param_in}'"),
            )
        })?;

        out.push(Parameter {
            name: name.to_string(),
            location: param_location,
            required: param.get("required").and_then(Value::as_bool).unwrap_or(false),
            schema: param.get("schema").cloned(),
        });
    }
    Ok(out)
}

fn extract_request_body(
    spec: &Specification,
    raw: Option<&Value>,
    location: &str,
) -> Result<Option<RequestBody>, CompileError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let section = spec.components.as_ref().map(|c| &c.request_bodies);
    let body = resolve_local(raw, section, "#/components/requestBodies/", location)?;
    Ok(Some(RequestBody {
        required: body.get("required").and_then(Value::as_bool).unwrap_or(false),
        json_schema: body
            .get("content")
            .and_then(|c| c.get(JSON_MEDIA_TYPE))
            .and_then(|m| m.get("schema"))
            .cloned(),
    }))
}

/// Resolve response and named-example `$ref`s so each operation is self-contained
fn resolve_responses(
    spec: &Specification,
    responses: &OrderedMap<Value>,
    location: &str,
) -> Result<OrderedMap<Value>, CompileError> {
    let components = spec.components.as_ref();
    let mut out = OrderedMap::new();
    for (status, raw) in responses.iter() {
        let mut response = resolve_local(
            raw,
            components.map(|c| &c.responses),
            "#/components/responses/",
            location,
        )?
        .clone();

        if let Some(content) = response.get_mut("content").and_then(Value::as_object_mut) {
            for media in content.values_mut() {
                let Some(examples) = media.get_mut("examples").and_then(Value::as_object_mut)
                else {
                    continue;
                };
                for example in examples.values_mut() {
                    let resolved = resolve_local(
                        example,
                        components.map(|c| &c.examples),
                        "#/components/examples/",
                        location,
                    )?
                    .clone();
                    *example = resolved;
                }
            }
        }
        out.insert(status.clone(), response);
    }
    Ok(out)
}
