use std::io::Write;

use http::Method;
use serde_json::json;

use super::{
  ComponentKind, ComponentRef, Document, ObjectOrReference, ParameterLocation, SchemaType, SchemaTypeSet, SpecFormat,
  SpecLoader, parse_document,
};

#[test]
fn test_paths_and_content_keep_declaration_order() -> anyhow::Result<()> {
  let doc: Document = serde_json::from_value(json!({
    "openapi": "3.1.0",
    "info": { "title": "Ordering", "version": "1" },
    "paths": {
      "/zebra": { "get": { "operationId": "z", "responses": {} } },
      "/apple": {
        "post": {
          "operationId": "a",
          "requestBody": {
            "content": {
              "application/xml": { "schema": { "type": "string" } },
              "application/json": { "schema": { "type": "string" } }
            }
          },
          "responses": { "500": { "description": "" }, "200": { "description": "" } }
        }
      }
    }
  }))?;

  let paths: Vec<_> = doc.paths.keys().map(String::as_str).collect();
  assert_eq!(paths, ["/zebra", "/apple"]);

  let op = doc.paths["/apple"].post.as_ref().unwrap();
  let Some(ObjectOrReference::Object(body)) = op.request_body.as_ref() else {
    panic!("expected inline request body");
  };
  let media: Vec<_> = body.content.keys().map(String::as_str).collect();
  assert_eq!(media, ["application/xml", "application/json"]);

  let statuses: Vec<_> = op.responses.keys().map(String::as_str).collect();
  assert_eq!(statuses, ["500", "200"]);
  Ok(())
}

#[test]
fn test_ref_and_inline_schemas_are_distinguished() -> anyhow::Result<()> {
  let doc: Document = serde_json::from_value(json!({
    "components": {
      "schemas": {
        "Alias": { "$ref": "#/components/schemas/Item" },
        "Item": { "type": ["string", "null"], "minLength": 1 }
      }
    }
  }))?;

  assert_eq!(
    doc.components.schemas["Alias"].as_ref_path(),
    Some("#/components/schemas/Item")
  );
  let ObjectOrReference::Object(item) = &doc.components.schemas["Item"] else {
    panic!("Item should be inline");
  };
  assert!(item.is_nullable());
  assert_eq!(
    item.schema_type,
    Some(SchemaTypeSet::Multiple(vec![SchemaType::String, SchemaType::Null]))
  );
  assert_eq!(item.schema_type.as_ref().unwrap().single_non_null(), Some(SchemaType::String));
  assert_eq!(item.min_length, Some(1));
  Ok(())
}

#[test]
fn test_path_item_operation_order() -> anyhow::Result<()> {
  let doc: Document = serde_json::from_value(json!({
    "paths": {
      "/things": {
        "delete": { "responses": {} },
        "options": { "responses": {} },
        "get": { "responses": {} },
        "post": { "responses": {} }
      }
    }
  }))?;

  let methods: Vec<Method> = doc.operations().map(|(_, method, _)| method).collect();
  assert_eq!(methods, [Method::GET, Method::POST, Method::DELETE, Method::OPTIONS]);
  Ok(())
}

#[test]
fn test_parameter_location() -> anyhow::Result<()> {
  let doc: Document = serde_json::from_value(json!({
    "components": {
      "parameters": {
        "Limit": { "name": "limit", "in": "query", "schema": { "type": "integer" } }
      }
    }
  }))?;

  let ObjectOrReference::Object(param) = &doc.components.parameters["Limit"] else {
    panic!("Limit should be inline");
  };
  assert_eq!(param.location, ParameterLocation::Query);
  assert_eq!(param.location.to_string(), "query");
  assert!(!param.required);
  Ok(())
}

#[test]
fn test_component_ref_parsing() {
  let cases = [
    (
      "#/components/schemas/Pet",
      Some(ComponentRef {
        kind: ComponentKind::Schemas,
        name: "Pet".to_string(),
      }),
    ),
    (
      "#/components/requestBodies/NewPet",
      Some(ComponentRef {
        kind: ComponentKind::RequestBodies,
        name: "NewPet".to_string(),
      }),
    ),
    (
      "#/components/schemas/a~1b~0c",
      Some(ComponentRef {
        kind: ComponentKind::Schemas,
        name: "a/b~c".to_string(),
      }),
    ),
    (
      "#/components/schemas/My%20Type",
      Some(ComponentRef {
        kind: ComponentKind::Schemas,
        name: "My Type".to_string(),
      }),
    ),
    ("#/components/schemas/Pet/properties/name", None),
    ("#/components/widgets/Pet", None),
    ("other.yaml#/components/schemas/Pet", None),
    ("#/components/schemas/", None),
  ];

  for (input, expected) in cases {
    assert_eq!(ComponentRef::parse(input), expected, "failed for input {input:?}");
  }

  assert_eq!(
    ComponentRef::canonical_path(ComponentKind::RequestBodies, "NewPet"),
    "#/components/requestBodies/NewPet"
  );
  assert_eq!(
    ComponentRef::parse_as("#/components/headers/X-Rate", ComponentKind::Parameters),
    None
  );
}

#[test]
fn test_parse_document_reports_path() {
  let err = parse_document(br#"{"paths": {"/a": {"get": {"parameters": [{"in": "query"}]}}}}"#, SpecFormat::Json)
    .expect_err("parameter without a name must fail");
  assert!(err.to_string().contains("invalid JSON document"), "unexpected error: {err}");
}

#[test]
fn test_spec_format_from_extension() {
  assert_eq!(SpecFormat::from_extension("yaml"), SpecFormat::Yaml);
  assert_eq!(SpecFormat::from_extension("yml"), SpecFormat::Yaml);
  assert_eq!(SpecFormat::from_extension("json"), SpecFormat::Json);
  assert_eq!(SpecFormat::from_extension("txt"), SpecFormat::Json);
}

#[tokio::test]
async fn test_loader_reads_yaml_files() -> anyhow::Result<()> {
  let mut file = tempfile::Builder::new().suffix(".yaml").tempfile()?;
  writeln!(
    file,
    r"openapi: 3.0.3
info:
  title: Yaml
  version: '1'
paths:
  /items:
    get:
      operationId: listItems
      responses:
        '200':
          description: ok
"
  )?;

  let loader = SpecLoader::open(file.path()).await?;
  assert_eq!(loader.format(), SpecFormat::Yaml);

  let doc = loader.parse()?;
  assert_eq!(doc.info.title, "Yaml");
  let op = doc.paths["/items"].get.as_ref().unwrap();
  assert_eq!(op.operation_id.as_deref(), Some("listItems"));
  assert!(op.responses.contains_key("200"));
  Ok(())
}
