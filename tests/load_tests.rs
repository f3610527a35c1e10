#![allow(clippy::unwrap_used, clippy::expect_used)]

use foundry::routes::{response_stub, ResponseStub};
use foundry::spec::{extract_model, load_spec, parse_spec, SpecFormat};
use serde_json::json;
use std::fs;
use tempfile::tempdir;

const MINIMAL_JSON: &str = r#"{
  "info": { "title": "Pet Store!" },
  "paths": {
    "/pets": { "get": { "operationId": "list_pets" } }
  }
}"#;

#[test]
fn test_load_yaml_and_json_files() {
    let dir = tempdir().unwrap();

    let yaml_path = dir.path().join("api.yml");
    fs::write(&yaml_path, "info: { title: Pets }\npaths: {}\n").unwrap();
    let yaml = load_spec(&yaml_path).unwrap();
    assert_eq!(yaml.slug(), "pets");

    let json_path = dir.path().join("api.json");
    fs::write(&json_path, MINIMAL_JSON).unwrap();
    let spec = load_spec(&json_path).unwrap();
    assert_eq!(spec.slug(), "pet_store");
    assert_eq!(extract_model(&spec).unwrap().operations().count(), 1);
}

#[test]
fn test_unknown_extension_is_read_as_json() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("openapi.spec");
    fs::write(&path, MINIMAL_JSON).unwrap();
    assert!(load_spec(&path).is_ok());

    fs::write(&path, "paths: {}\n").unwrap();
    let err = load_spec(&path).unwrap_err();
    assert!(format!("{err:#}").contains("Failed to parse specification"));
}

#[test]
fn test_missing_file_reports_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("absent.yaml");
    let err = load_spec(&path).unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("Failed to read specification"), "{message}");
    assert!(message.contains("absent.yaml"), "{message}");
}

#[test]
fn test_root_must_be_an_object() {
    assert!(parse_spec("- a\n- b\n", SpecFormat::Yaml).is_err());
    assert!(parse_spec("[1, 2]", SpecFormat::Json).is_err());
}

#[test]
fn test_integer_response_codes_become_keys() {
    let spec = parse_spec(
        r#"
paths:
  /pets:
    get:
      operationId: list_pets
      responses:
        200:
          content:
            application/json:
              example: { count: 2 }
"#,
        SpecFormat::Yaml,
    )
    .unwrap();
    let model = extract_model(&spec).unwrap();
    let operation = model.operation("list_pets").unwrap();
    assert!(operation.responses.contains_key("200"));
    assert_eq!(
        response_stub(operation),
        ResponseStub::Json { status: 200, body: json!({ "count": 2 }) }
    );
}

#[test]
fn test_yaml_preserves_declaration_order() {
    let spec = parse_spec(
        r#"
paths:
  /zebras: { get: { operationId: zebras } }
  /apples: { get: { operationId: apples } }
components:
  schemas:
    Zebra: { type: object }
    Apple: { type: object }
"#,
        SpecFormat::Yaml,
    )
    .unwrap();
    let names: Vec<_> = spec.schemas().unwrap().keys().collect();
    assert_eq!(names, vec!["Zebra", "Apple"]);
    let ids: Vec<_> = extract_model(&spec)
        .unwrap()
        .operations()
        .map(|(_, op)| op.operation_id.clone())
        .collect();
    assert_eq!(ids, vec!["zebras", "apples"]);
}
