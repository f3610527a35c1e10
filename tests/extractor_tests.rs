#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{shop_spec, yaml_spec};
use foundry::spec::{extract_model, HttpMethod, MiddlewareRef, ParameterLocation};
use foundry::CompileError;

#[test]
fn test_path_items_keep_declaration_order() {
    let model = extract_model(&shop_spec()).unwrap();
    let paths: Vec<_> = model.path_items.iter().map(|p| p.path.as_str()).collect();
    assert_eq!(
        paths,
        vec![
            "/customers",
            "/orders",
            "/orders/{orderId}/lines/{lineId}",
            "/health"
        ]
    );
}

#[test]
fn test_only_allowed_methods_become_operations() {
    let model = extract_model(&shop_spec()).unwrap();
    let lines = &model.path_items[2];
    assert_eq!(lines.operations.len(), 1);
    assert_eq!(lines.operations[0].method, HttpMethod::Get);
    assert!(model.operation("head_order_line").is_none());
}

#[test]
fn test_middleware_and_service_hints() {
    let model = extract_model(&shop_spec()).unwrap();
    let orders = &model.path_items[1];
    assert_eq!(orders.middleware, vec![MiddlewareRef::new("tenant")]);
    assert_eq!(
        orders.operations[0].middleware,
        vec![MiddlewareRef::new("audit"), MiddlewareRef::new("rateLimit")]
    );
    assert!(orders.operations[1].middleware.is_empty());

    assert_eq!(model.path_items[0].service.as_deref(), Some("crmService"));
    let line = model.operation("get_order_line").unwrap();
    assert_eq!(line.service.as_deref(), Some("fulfilmentService"));
}

#[test]
fn test_parameters_and_bodies() {
    let model = extract_model(&shop_spec()).unwrap();
    let list = model.operation("list_customers").unwrap();
    assert_eq!(list.parameters.len(), 2);
    assert_eq!(list.parameters[1].location, ParameterLocation::Header);
    assert!(list.parameters[1].schema.is_none());
    assert!(list.request_body.is_none());

    let create = model.operation("create_customer").unwrap();
    let body = create.request_body.as_ref().unwrap();
    assert!(body.required);
    assert_eq!(
        body.json_schema.as_ref().unwrap()["$ref"],
        "#/components/schemas/Customer"
    );
}

#[test]
fn test_security_inherits_document_level() {
    let model = extract_model(&shop_spec()).unwrap();
    let list = model.operation("list_customers").unwrap();
    assert!(list.security[0].contains_key("apiKey"));
    let create = model.operation("create_order").unwrap();
    assert_eq!(
        create.security[0].get("oauth"),
        Some(&vec!["orders:write".to_string()])
    );
    assert!(model.operation("health").unwrap().security.is_empty());
}

#[test]
fn test_missing_paths_is_malformed() {
    let err = extract_model(&yaml_spec("openapi: 3.1.0\ncomponents: {}\n")).unwrap_err();
    assert!(matches!(err, CompileError::MalformedSpecification { ref location, .. } if location == "paths"));
}

#[test]
fn test_duplicate_operation_id_names_both_locations() {
    let err = extract_model(&yaml_spec(
        r#"
paths:
  /a:
    get: { operationId: fetch }
  /b:
    post: { operationId: fetch }
"#,
    ))
    .unwrap_err();
    let message = err.to_string();
    assert!(message.contains("/b post"), "{message}");
    assert!(message.contains("duplicate operationId 'fetch'"), "{message}");
    assert!(message.contains("/a get"), "{message}");
}

#[test]
fn test_missing_operation_id_is_malformed() {
    let err = extract_model(&yaml_spec("paths:\n  /a:\n    get:\n      summary: no id\n")).unwrap_err();
    assert!(err.to_string().contains("/a get"));
}

#[test]
fn test_component_parameter_and_body_refs() {
    let model = extract_model(&yaml_spec(
        r#"
paths:
  /notes/{noteId}:
    put:
      operationId: update_note
      parameters:
        - $ref: '#/components/parameters/NoteId'
      requestBody:
        $ref: '#/components/requestBodies/NoteBody'
components:
  parameters:
    NoteId: { name: noteId, in: path, required: true, schema: { type: string } }
  requestBodies:
    NoteBody:
      content:
        application/json:
          schema: { type: object }
"#,
    ))
    .unwrap();
    let op = model.operation("update_note").unwrap();
    assert_eq!(op.parameters[0].name, "noteId");
    assert!(op.parameters[0].required);
    assert_eq!(op.request_body.as_ref().unwrap().json_schema.as_ref().unwrap()["type"], "object");
}

#[test]
fn test_unresolvable_parameter_ref_is_malformed() {
    let err = extract_model(&yaml_spec(
        r#"
paths:
  /notes:
    get:
      operationId: list_notes
      parameters:
        - $ref: '#/components/parameters/Missing'
"#,
    ))
    .unwrap_err();
    assert!(err.to_string().contains("#/components/parameters/Missing"), "{err}");
}
