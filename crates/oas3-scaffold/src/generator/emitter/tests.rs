use serde_json::json;

use super::{Emitter, FileRole, RustEmitter, Visibility};
use crate::{
  document::Document,
  generator::orchestrator::{CompiledApi, GeneratorConfig, Orchestrator},
};

fn compile(value: serde_json::Value, config: &GeneratorConfig) -> anyhow::Result<CompiledApi> {
  let document: Document = serde_json::from_value(value)?;
  Orchestrator::new(document, config.clone()).compile()
}

fn items() -> serde_json::Value {
  json!({
    "info": { "title": "Items API", "version": "1.2.0", "description": "Stores items." },
    "paths": {
      "/items": {
        "post": {
          "operationId": "createItems",
          "requestBody": {
            "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Item" } } }
          },
          "responses": {
            "201": {
              "description": "created",
              "content": {
                "application/json": { "schema": { "type": "array", "items": { "$ref": "#/components/schemas/Item" } } }
              }
            }
          }
        }
      }
    },
    "components": {
      "schemas": { "Item": { "type": "object", "properties": { "name": { "type": "string" } } } }
    }
  })
}

fn contents(files: &[super::GeneratedFile], role: FileRole) -> &str {
  files
    .iter()
    .find(|file| file.role == role)
    .map(|file| file.contents.as_str())
    .unwrap_or_default()
}

#[test]
fn test_visibility_parse() {
  let cases = [
    ("public", Some(Visibility::Public)),
    ("crate", Some(Visibility::Crate)),
    ("file", Some(Visibility::File)),
    ("private", None),
  ];
  for (input, expected) in cases {
    assert_eq!(Visibility::parse(input), expected, "failed for input {input:?}");
  }
}

#[test]
fn test_rust_emitter_end_to_end() -> anyhow::Result<()> {
  let config = GeneratorConfig::default();
  let api = compile(items(), &config)?;
  let files = RustEmitter::new(&config).emit(&api)?;

  let component = contents(&files, FileRole::Component);
  assert!(component.starts_with("//! AUTO-GENERATED CODE - DO NOT EDIT!"));
  assert!(component.contains("//! Items API 1.2.0"));
  assert!(component.contains("use serde::{Deserialize, Serialize};"));
  assert!(component.contains("pub struct Item {"), "{component}");
  assert!(component.contains("pub name: Option<String>"), "{component}");

  let operation = contents(&files, FileRole::Operation);
  assert!(operation.contains("pub trait CreateItemsHandler: Send + Sync"), "{operation}");
  assert!(operation.contains("body: super::component::Item"), "{operation}");
  assert!(
    operation.contains("pub type CreateItems201Response = Vec<super::component::Item>;"),
    "{operation}"
  );
  assert!(operation.contains("pub enum CreateItemsResponse"), "{operation}");
  assert!(operation.contains("Status201 {"), "{operation}");
  assert!(operation.contains("body: CreateItems201Response"), "{operation}");

  let routes = contents(&files, FileRole::Routes);
  assert!(routes.contains("method: \"POST\""), "{routes}");
  assert!(routes.contains("path: \"/items\""), "{routes}");
  assert!(routes.contains("handlers: &[\"CreateItemsHandler\"]"), "{routes}");

  let module = contents(&files, FileRole::Module);
  assert!(module.contains("//! Stores items."));
  assert!(module.contains("pub mod component;"));
  assert!(module.contains("pub mod operation;"));
  assert!(module.contains("pub mod routes;"));
  Ok(())
}

#[test]
fn test_custom_packages_and_visibility() -> anyhow::Result<()> {
  let config = GeneratorConfig::builder()
    .component_package("models")
    .operation_package("handlers")
    .visibility(Visibility::Crate)
    .build();
  let api = compile(items(), &config)?;
  let files = RustEmitter::new(&config).emit(&api)?;

  let paths: Vec<_> = files.iter().map(|file| file.path.display().to_string()).collect();
  assert_eq!(paths, ["models.rs", "handlers.rs", "routes.rs", "mod.rs"]);

  let operation = contents(&files, FileRole::Operation);
  assert!(operation.contains("pub(crate) trait CreateItemsHandler"), "{operation}");
  assert!(operation.contains("body: super::models::Item"), "{operation}");
  assert!(contents(&files, FileRole::Module).contains("pub(crate) mod models;"));
  Ok(())
}

#[test]
fn test_render_struct_fields_and_parameters() -> anyhow::Result<()> {
  let config = GeneratorConfig::default();
  let api = compile(
    json!({
      "paths": {
        "/pets/{petId}": {
          "get": {
            "operationId": "getPet",
            "parameters": [
              { "name": "petId", "in": "path", "schema": { "type": "integer", "format": "int64" } },
              { "name": "type", "in": "query", "schema": { "type": "string" } }
            ],
            "responses": { "404": { "description": "missing" } }
          }
        }
      },
      "components": {
        "schemas": {
          "Pet": {
            "type": "object",
            "required": ["petId"],
            "properties": {
              "petId": { "type": "string", "format": "uuid" },
              "born": { "type": "string", "format": "date-time", "description": "Birth time." }
            }
          }
        }
      }
    }),
    &config,
  )?;
  let emitter = RustEmitter::new(&config);

  let pet = emitter.render_component(&api.components[0])?;
  assert!(pet.contains("#[serde(rename = \"petId\")]"), "{pet}");
  assert!(pet.contains("pub pet_id: uuid::Uuid"), "{pet}");
  assert!(pet.contains("/// Birth time."), "{pet}");
  assert!(pet.contains("pub born: Option<chrono::DateTime<chrono::Utc>>"), "{pet}");

  let operation = emitter.render_operation(&api.operations[0])?;
  assert!(operation.contains("pub struct GetPetParameters"), "{operation}");
  assert!(operation.contains("pub pet_id: i64"), "{operation}");
  assert!(operation.contains("pub r#type: Option<String>"), "{operation}");
  assert!(operation.contains("Status404,"), "{operation}");
  assert!(operation.contains("parameters: GetPetParameters"), "{operation}");
  assert!(operation.contains("anyhow::Result<GetPetResponse>"), "{operation}");
  Ok(())
}

#[test]
fn test_render_unions() -> anyhow::Result<()> {
  let config = GeneratorConfig::default();
  let api = compile(
    json!({
      "components": {
        "schemas": {
          "Cat": { "type": "object", "properties": { "kind": { "type": "string" } } },
          "Dog": { "type": "object", "properties": { "kind": { "type": "string" } } },
          "Pet": {
            "oneOf": [{ "$ref": "#/components/schemas/Cat" }, { "$ref": "#/components/schemas/Dog" }],
            "discriminator": { "propertyName": "kind", "mapping": { "cat": "#/components/schemas/Cat" } }
          },
          "Id": { "anyOf": [{ "type": "string" }, { "type": "integer" }] }
        }
      }
    }),
    &config,
  )?;
  let emitter = RustEmitter::new(&config);
  let rendered = |name: &str| -> anyhow::Result<String> {
    let schema = api
      .components
      .iter()
      .find(|schema| schema.declared_type_name == name)
      .ok_or_else(|| anyhow::anyhow!("missing {name}"))?;
    emitter.render_component(schema)
  };

  let pet = rendered("Pet")?;
  assert!(pet.contains("#[serde(tag = \"kind\")]"), "{pet}");
  assert!(pet.contains("#[serde(rename = \"cat\")]"), "{pet}");
  assert!(pet.contains("Cat(Cat)"), "{pet}");
  assert!(pet.contains("Dog(Dog)"), "{pet}");

  let id = rendered("Id")?;
  assert!(id.contains("#[serde(untagged)]"), "{id}");
  assert!(id.contains("String1(String)"), "{id}");
  assert!(id.contains("Integer2(i64)"), "{id}");
  Ok(())
}
