use crate::spec::{Operation, OrderedMap};
use serde::Serialize;
use serde_json::Value;

/// Success statuses searched for an example, in order
const STUB_STATUSES: [u16; 2] = [200, 201];
const JSON_MEDIA_TYPE: &str = "application/json";

/// What a generated handler returns before it is implemented
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResponseStub {
    /// Respond with the declared example
    Json { status: u16, body: Value },
    /// Respond with an explicit "no content" outcome
    NoContent,
}

impl ResponseStub {
    pub fn is_no_content(&self) -> bool {
        matches!(self, ResponseStub::NoContent)
    }
}

/// Example body of one response object
///
/// A single `example` wins over the `examples` map, whose first entry's
/// `value` is used otherwise. A `null` example counts as absent.
fn json_example(response: &Value) -> Option<&Value> {
    let media = response.get("content")?.get(JSON_MEDIA_TYPE)?;
    if let Some(example) = media.get("example").filter(|v| !v.is_null()) {
        return Some(example);
    }
    media
        .get("examples")?
        .as_object()?
        .values()
        .next()?
        .get("value")
        .filter(|v| !v.is_null())
}

fn find_response(responses: &OrderedMap<Value>, status: u16) -> Option<&Value> {
    responses.get(&status.to_string())
}

/// Resolve the stub for an operation from its `200`, then `201`, response
pub fn response_stub(operation: &Operation) -> ResponseStub {
    STUB_STATUSES
        .iter()
        .find_map(|&status| {
            find_response(&operation.responses, status)
                .and_then(json_example)
                .map(|body| ResponseStub::Json {
                    status,
                    body: body.clone(),
                })
        })
        .unwrap_or(ResponseStub::NoContent)
}
