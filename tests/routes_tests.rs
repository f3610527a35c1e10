#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{shop_spec, yaml_spec};
use foundry::routes::{compile_routes, ResponseStub, RouterSyntax};
use foundry::spec::{extract_model, HttpMethod};
use serde_json::json;

fn shop_routes(syntax: RouterSyntax) -> foundry::routes::RouteArtifact {
    let spec = shop_spec();
    let model = extract_model(&spec).unwrap();
    let (routes, conflicts) = compile_routes(&model, spec.security_schemes(), syntax);
    assert!(conflicts.is_empty());
    routes
}

#[test]
fn test_widget_path_translation() {
    let spec = yaml_spec(
        r#"
paths:
  /widgets/{id}:
    get:
      operationId: get_widget
"#,
    );
    let model = extract_model(&spec).unwrap();
    let (routes, _) = compile_routes(&model, None, RouterSyntax::Colon);
    let widgets = routes.resource("widgets").unwrap();
    assert_eq!(widgets.router_name, "WidgetsRouter");
    assert_eq!(widgets.service, "widgetsService");
    assert_eq!(widgets.routes[0].method, HttpMethod::Get);
    assert_eq!(widgets.routes[0].path, "/widgets/:id");
    assert_eq!(widgets.routes[0].template, "/widgets/{id}");
}

#[test]
fn test_resources_in_order_of_first_appearance() {
    let routes = shop_routes(RouterSyntax::Colon);
    let resources: Vec<_> = routes.resources.iter().map(|r| r.resource.as_str()).collect();
    assert_eq!(resources, vec!["customers", "orders", "health"]);
    let orders: Vec<_> = routes
        .resource("orders")
        .unwrap()
        .routes
        .iter()
        .map(|r| r.operation_id.as_str())
        .collect();
    assert_eq!(orders, vec!["list_orders", "create_order", "get_order_line"]);
    assert_eq!(routes.syntax, "colon");
}

#[test]
fn test_middleware_order_follows_precedence() {
    let routes = shop_routes(RouterSyntax::Colon);
    let list = routes.routes().find(|r| r.operation_id == "list_orders").unwrap();
    assert_eq!(
        list.lookups(),
        vec![
            "security.apiKey",
            "validation.list_orders",
            "middleware.tenant",
            "middleware.audit",
            "middleware.rateLimit"
        ]
    );
}

#[test]
fn test_operation_security_overrides_document_level() {
    let routes = shop_routes(RouterSyntax::Colon);
    let create = routes.routes().find(|r| r.operation_id == "create_order").unwrap();
    assert_eq!(create.lookups(), vec!["security.oauth", "validation.create_order", "middleware.tenant"]);
    assert_eq!(create.handlers[0].kind.as_deref(), Some("oauth2"));
    assert_eq!(create.handlers[0].scopes, vec!["orders:write"]);
    assert_eq!(
        serde_json::to_value(&create.handlers[0]).unwrap(),
        json!({
            "registry": "security",
            "lookup": "security.oauth",
            "kind": "oauth2",
            "scopes": ["orders:write"]
        })
    );
}

#[test]
fn test_response_stubs() {
    let routes = shop_routes(RouterSyntax::Colon);
    let stub = |id: &str| routes.routes().find(|r| r.operation_id == id).unwrap().response.clone();

    assert_eq!(
        stub("list_orders"),
        ResponseStub::Json { status: 200, body: json!({ "id": 1 }) }
    );
    assert_eq!(
        stub("create_customer"),
        ResponseStub::Json { status: 201, body: json!({ "_id": "c-1", "name": "Ada" }) }
    );
    assert_eq!(
        stub("list_customers"),
        ResponseStub::Json {
            status: 200,
            body: json!([{ "name": "Ada", "email": "ada@example.com" }])
        }
    );
    assert!(stub("create_order").is_no_content());
    assert!(stub("get_order_line").is_no_content());
}

#[test]
fn test_unsecured_health_route() {
    let routes = shop_routes(RouterSyntax::Colon);
    let health = routes.resource("health").unwrap();
    assert_eq!(health.routes.len(), 1);
    assert_eq!(health.routes[0].lookups(), vec!["validation.health"]);
    assert_eq!(health.routes[0].response, ResponseStub::NoContent);
    assert_eq!(
        serde_json::to_value(&health.routes[0].response).unwrap(),
        json!({ "kind": "no_content" })
    );
}

#[test]
fn test_service_hints() {
    let routes = shop_routes(RouterSyntax::Colon);
    let service = |id: &str| routes.routes().find(|r| r.operation_id == id).unwrap().service.clone();
    assert_eq!(service("list_customers"), "crmService");
    assert_eq!(service("get_order_line"), "fulfilmentService");
    assert_eq!(service("list_orders"), "ordersService");
}

#[test]
fn test_alternative_router_syntax() {
    let brace = shop_routes(RouterSyntax::Brace);
    let line = brace.routes().find(|r| r.operation_id == "get_order_line").unwrap();
    assert_eq!(line.path, "/orders/{orderId}/lines/{lineId}");

    let angle = shop_routes(RouterSyntax::Angle);
    let line = angle.routes().find(|r| r.operation_id == "get_order_line").unwrap();
    assert_eq!(line.path, "/orders/<orderId>/lines/<lineId>");
}
