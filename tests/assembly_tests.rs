#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{shop_spec, yaml_spec};
use foundry::assembly::{compile, compile_schema, CompileOptions};
use foundry::schema::{is_junction_by_naming, Dialect};
use foundry::CompileError;

#[test]
fn test_compile_twice_is_byte_identical() {
    let spec = shop_spec();
    let options = CompileOptions::with_dialect(Dialect::Postgres);
    let first = compile(&spec, &options).unwrap();
    let second = compile(&spec, &options).unwrap();

    let (a, b) = (first.schema.unwrap(), second.schema.unwrap());
    assert_eq!(a.ddl(), b.ddl());
    assert_eq!(a.migrations, b.migrations);
    assert_eq!(
        serde_json::to_string(&first.validation).unwrap(),
        serde_json::to_string(&second.validation).unwrap()
    );
    assert_eq!(
        serde_json::to_string(&first.routes).unwrap(),
        serde_json::to_string(&second.routes).unwrap()
    );
}

#[test]
fn test_artifacts_agree_on_operations() {
    let artifacts = compile(&shop_spec(), &CompileOptions::with_dialect(Dialect::Sqlite)).unwrap();
    assert!(artifacts.conflicts.is_empty());
    assert_eq!(artifacts.validation.len(), artifacts.routes.routes().count());
    for route in artifacts.routes.routes() {
        assert!(artifacts.validation.contains(&route.operation_id), "{}", route.operation_id);
    }
    let schema = artifacts.schema.as_ref().unwrap();
    assert_eq!(schema.tables.len(), 5);
    assert_eq!(schema.migrations.len(), 1);
}

#[test]
fn test_schema_stage_is_optional() {
    let artifacts = compile(&shop_spec(), &CompileOptions::default()).unwrap();
    assert!(artifacts.schema.is_none());
    assert_eq!(artifacts.routes.resources.len(), 3);
}

#[test]
fn test_table_for_resource_requires_exact_match() {
    let artifacts = compile(&shop_spec(), &CompileOptions::with_dialect(Dialect::Sqlite)).unwrap();
    assert!(artifacts.table_for_resource("customers").is_none());
    assert!(artifacts.table_for_resource("health").is_none());
    assert_eq!(artifacts.table_for_resource("OrderLine").unwrap().name, "order_line");
}

#[test]
fn test_dangling_foreign_key_is_unresolvable() {
    let spec = yaml_spec(
        r#"
paths: {}
components:
  schemas:
    Invoice:
      type: object
      properties:
        account: { $ref: '#/components/schemas/Account' }
"#,
    );
    let err = compile(&spec, &CompileOptions::with_dialect(Dialect::Sqlite)).unwrap_err();
    match err {
        CompileError::UnresolvableReference { owner, property, target } => {
            assert_eq!(owner, "Invoice");
            assert_eq!(property, "account");
            assert_eq!(target, "Account");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_dangling_relation_is_unresolvable() {
    let spec = yaml_spec(
        r#"
components:
  schemas:
    Playlist:
      type: object
      properties:
        songs: { type: array, items: { $ref: '#/components/schemas/Song' } }
"#,
    );
    let err = compile_schema(&spec, &Dialect::Sqlite, is_junction_by_naming).unwrap_err();
    assert!(matches!(err, CompileError::UnresolvableReference { ref target, .. } if target == "Song"));
}

#[test]
fn test_reference_to_junction_table_is_unresolvable() {
    let spec = yaml_spec(
        r#"
paths: {}
components:
  schemas:
    Note:
      type: object
      properties:
        link: { $ref: '#/components/schemas/post_tags' }
    post_tags:
      type: object
      properties:
        tags: { type: array, items: { $ref: '#/components/schemas/Tag' } }
    Tag:
      type: object
      properties:
        label: { type: string }
"#,
    );
    let err = compile(&spec, &CompileOptions::with_dialect(Dialect::Postgres)).unwrap_err();
    match err {
        CompileError::UnresolvableReference { owner, property, target } => {
            assert_eq!(owner, "Note");
            assert_eq!(property, "link");
            assert_eq!(target, "post_tags");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_relation_to_junction_table_is_unresolvable() {
    let spec = yaml_spec(
        r#"
components:
  schemas:
    Post:
      type: object
      properties:
        links: { type: array, items: { $ref: '#/components/schemas/post_tags' } }
    post_tags:
      type: object
      properties:
        tags: { type: array, items: { $ref: '#/components/schemas/Tag' } }
    Tag: { type: object, properties: { label: { type: string } } }
"#,
    );
    let err = compile_schema(&spec, &Dialect::Sqlite, is_junction_by_naming).unwrap_err();
    assert!(
        matches!(err, CompileError::UnresolvableReference { ref owner, ref target, .. } if owner == "Post" && target == "post_tags"),
        "{err}"
    );
}

#[test]
fn test_junction_table_with_relation_compiles_consistently() {
    let spec = yaml_spec(
        r#"
components:
  schemas:
    post_tags:
      type: object
      properties:
        tags: { type: array, items: { $ref: '#/components/schemas/Tag' } }
    Tag: { type: object, properties: { label: { type: string } } }
"#,
    );
    let schema = compile_schema(&spec, &Dialect::Postgres, is_junction_by_naming).unwrap();
    let ddl = schema.ddl();
    assert!(ddl.contains("CREATE TABLE IF NOT EXISTS post_tags ("));
    assert!(!ddl.contains("REFERENCES post_tags"));
    assert!(schema.migrations.is_empty());
}

#[test]
fn test_colliding_table_names_are_malformed() {
    let spec = yaml_spec(
        r#"
components:
  schemas:
    OrderLine: { type: object, properties: { sku: { type: string } } }
    order_line: { type: object, properties: { qty: { type: integer } } }
"#,
    );
    let err = compile_schema(&spec, &Dialect::Sqlite, is_junction_by_naming).unwrap_err();
    match err {
        CompileError::MalformedSpecification { location, reason } => {
            assert_eq!(location, "components.schemas.order_line");
            assert!(reason.contains("'OrderLine'"), "{reason}");
            assert!(reason.contains("'order_line'"), "{reason}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_repeated_security_scheme_is_reported_not_fatal() {
    let spec = yaml_spec(
        r#"
paths:
  /reports:
    get:
      operationId: list_reports
      security:
        - apiKey: []
        - apiKey: []
          oauth: [read]
components:
  schemas: {}
"#,
    );
    let artifacts = compile(&spec, &CompileOptions::default()).unwrap();
    assert_eq!(artifacts.conflicts.len(), 1);
    assert_eq!(artifacts.conflicts[0].registry, "security");
    assert_eq!(artifacts.conflicts[0].key, "list_reports.apiKey");
    let route = artifacts.routes.routes().next().unwrap();
    assert_eq!(
        route.lookups(),
        vec!["security.apiKey", "security.oauth", "validation.list_reports"]
    );
}

#[test]
fn test_schema_only_documents_compile_without_paths() {
    let spec = yaml_spec(
        r#"
components:
  schemas:
    Note: { type: object, properties: { body: { type: string } } }
"#,
    );
    let schema = compile_schema(&spec, &Dialect::Mysql, is_junction_by_naming).unwrap();
    assert!(schema.ddl().contains("CREATE TABLE IF NOT EXISTS note"));
    assert!(compile(&spec, &CompileOptions::default()).is_err());
}
