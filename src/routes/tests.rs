#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use crate::spec::{extract_model, parse_spec, SpecFormat, Specification};

fn load(yaml: &str) -> (Specification, SpecModel) {
    let spec = parse_spec(yaml, SpecFormat::Yaml).unwrap();
    let model = extract_model(&spec).unwrap();
    (spec, model)
}

const SPEC: &str = r#"
openapi: 3.1.0
info: { title: Shop, version: "1.0" }
security:
  - apiKey: []
paths:
  /widgets:
    x-middleware: [tenant]
    get:
      operationId: list_widgets
      x-middleware: audit
      responses:
        "200":
          content:
            application/json:
              example: [{ id: 1 }]
    post:
      operationId: create_widget
      security:
        - oauth: [widgets:write]
          apiKey: []
      responses:
        "201":
          description: created
  /widgets/{id}:
    x-service: inventoryService
    get:
      operationId: get_widget
      responses:
        "200":
          content:
            application/json:
              examples:
                a: { value: { id: 1 } }
  /{tenant}:
    get:
      operationId: tenant_home
      security: []
      responses: {}
components:
  securitySchemes:
    apiKey: { type: apiKey, name: X-Api-Key, in: header }
    oauth: { type: oauth2 }
"#;

#[test]
fn test_grouping_and_order() {
    let (spec, model) = load(SPEC);
    let (routes, conflicts) = compile_routes(&model, spec.security_schemes(), RouterSyntax::Colon);
    assert!(conflicts.is_empty());

    let names: Vec<_> = routes.resources.iter().map(|r| r.resource.as_str()).collect();
    assert_eq!(names, vec!["widgets", ROOT_RESOURCE]);

    let widgets = routes.resource("widgets").unwrap();
    assert_eq!(widgets.router_name, "WidgetsRouter");
    assert_eq!(widgets.service, "widgetsService");
    let ids: Vec<_> = widgets.routes.iter().map(|r| r.operation_id.as_str()).collect();
    assert_eq!(ids, vec!["list_widgets", "create_widget", "get_widget"]);
    assert_eq!(widgets.routes[2].path, "/widgets/:id");
    assert_eq!(widgets.routes[2].template, "/widgets/{id}");
}

#[test]
fn test_handler_precedence() {
    let (spec, model) = load(SPEC);
    let (routes, _) = compile_routes(&model, spec.security_schemes(), RouterSyntax::Colon);
    let list = &routes.resource("widgets").unwrap().routes[0];
    assert_eq!(
        list.lookups(),
        vec![
            "security.apiKey",
            "validation.list_widgets",
            "middleware.tenant",
            "middleware.audit"
        ]
    );
    assert_eq!(list.handlers[0].kind.as_deref(), Some("apiKey"));

    let create = &routes.resource("widgets").unwrap().routes[1];
    assert_eq!(
        create.lookups(),
        vec![
            "security.oauth",
            "security.apiKey",
            "validation.create_widget",
            "middleware.tenant"
        ]
    );
    assert_eq!(create.handlers[0].scopes, vec!["widgets:write"]);
}

#[test]
fn test_empty_security_override_has_no_auth_steps() {
    let (spec, model) = load(SPEC);
    let (routes, _) = compile_routes(&model, spec.security_schemes(), RouterSyntax::Colon);
    let home = &routes.resource(ROOT_RESOURCE).unwrap().routes[0];
    assert_eq!(home.lookups(), vec!["validation.tenant_home"]);
    assert_eq!(home.path, "/:tenant");
    assert!(home.response.is_no_content());
}

#[test]
fn test_service_resolution() {
    let (spec, model) = load(SPEC);
    let (routes, _) = compile_routes(&model, spec.security_schemes(), RouterSyntax::Brace);
    let widgets = routes.resource("widgets").unwrap();
    assert_eq!(widgets.routes[0].service, "widgetsService");
    assert_eq!(widgets.routes[2].service, "inventoryService");
    assert_eq!(widgets.routes[2].path, "/widgets/{id}");
}

#[test]
fn test_response_stubs() {
    let (spec, model) = load(SPEC);
    let (routes, _) = compile_routes(&model, spec.security_schemes(), RouterSyntax::Colon);
    let widgets = routes.resource("widgets").unwrap();
    assert_eq!(
        widgets.routes[0].response,
        ResponseStub::Json {
            status: 200,
            body: serde_json::json!([{"id": 1}])
        }
    );
    assert!(widgets.routes[1].response.is_no_content());
    assert_eq!(
        widgets.routes[2].response,
        ResponseStub::Json {
            status: 200,
            body: serde_json::json!({"id": 1})
        }
    );
}

#[test]
fn test_repeated_scheme_is_rejected() {
    let (spec, model) = load(
        r#"
paths:
  /a:
    get:
      operationId: get_a
      security:
        - basic: []
        - basic: []
          bearer: []
"#,
    );
    let (routes, conflicts) = compile_routes(&model, spec.security_schemes(), RouterSyntax::Colon);
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].registry, "security");
    assert_eq!(conflicts[0].key, "get_a.basic");
    let lookups = routes.routes().next().unwrap().lookups();
    assert_eq!(
        lookups,
        vec!["security.basic", "security.bearer", "validation.get_a"]
    );
    assert_eq!(routes.routes().next().unwrap().handlers[0].kind, None);
}

#[test]
fn test_handler_step_serialization() {
    let mut step = HandlerStep::new(StepRegistry::Security, "oauth");
    step.kind = Some("oauth2".into());
    step.scopes = vec!["read".into()];
    let value = serde_json::to_value(&step).unwrap();
    assert_eq!(
        value,
        serde_json::json!({
            "registry": "security",
            "lookup": "security.oauth",
            "kind": "oauth2",
            "scopes": ["read"]
        })
    );
}
