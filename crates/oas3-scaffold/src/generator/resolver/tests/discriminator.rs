use serde_json::json;

use super::schemas;
use crate::generator::{
  errors::GeneratorError,
  resolver::ResolverSession,
  schema::{SchemaModel, UnionKind},
};

#[test]
fn test_implicit_mapping_uses_component_names() -> anyhow::Result<()> {
  let doc = schemas(json!({
    "Shape": {
      "oneOf": [{ "$ref": "#/components/schemas/Circle" }, { "$ref": "#/components/schemas/Square" }],
      "discriminator": { "propertyName": "kind" }
    },
    "Circle": { "type": "object", "properties": { "radius": { "type": "number" } } },
    "Square": { "type": "object", "properties": { "side": { "type": "number" } } }
  }))?;
  let mut session = ResolverSession::for_document(&doc);
  let shape = session.resolve_component("Shape")?;
  let graph = session.finish()?;

  let union = graph[shape].union().expect("Shape is a union");
  assert_eq!(union.kind, UnionKind::OneOf);
  assert_eq!(union.variants.len(), 2);

  let discriminator = union.discriminator.as_ref().expect("discriminator is declared");
  assert_eq!(discriminator.property_name, "kind");
  let keys: Vec<_> = discriminator.mapping.keys().map(String::as_str).collect();
  assert_eq!(keys, ["Circle", "Square"]);
  assert_eq!(discriminator.mapping["Circle"], union.variants[0]);
  assert_eq!(discriminator.mapping["Square"], union.variants[1]);
  Ok(())
}

#[test]
fn test_explicit_entries_are_kept_and_gaps_filled() -> anyhow::Result<()> {
  let doc = schemas(json!({
    "Event": {
      "oneOf": [
        { "$ref": "#/components/schemas/Created" },
        { "$ref": "#/components/schemas/Deleted" },
        { "type": "object", "properties": { "other": { "type": "string" } } }
      ],
      "discriminator": {
        "propertyName": "type",
        "mapping": { "created": "#/components/schemas/Created", "new": "#/components/schemas/Created" }
      }
    },
    "Created": { "type": "object" },
    "Deleted": { "type": "object" }
  }))?;
  let mut session = ResolverSession::for_document(&doc);
  let event = session.resolve_component("Event")?;
  let graph = session.finish()?;

  let union = graph[event].union().expect("Event is a union");
  let discriminator = union.discriminator.as_ref().expect("discriminator is declared");
  let keys: Vec<_> = discriminator.mapping.keys().map(String::as_str).collect();
  assert_eq!(keys, ["created", "new", "Deleted"]);
  assert_eq!(discriminator.mapping["created"], discriminator.mapping["new"]);
  assert_eq!(union.variants.len(), 3);
  Ok(())
}

#[test]
fn test_conflicting_implicit_tag_is_ambiguous() -> anyhow::Result<()> {
  let doc = schemas(json!({
    "Animal": {
      "oneOf": [{ "$ref": "#/components/schemas/Cat" }, { "$ref": "#/components/schemas/Dog" }],
      "discriminator": { "propertyName": "kind", "mapping": { "Cat": "#/components/schemas/Dog" } }
    },
    "Cat": { "type": "object" },
    "Dog": { "type": "object" }
  }))?;
  let mut session = ResolverSession::for_document(&doc);

  let err = session.resolve_component("Animal").unwrap_err();
  assert_eq!(
    err,
    GeneratorError::AmbiguousDiscriminatorMapping {
      location: "#/components/schemas/Animal".to_string(),
      tag: "Cat".to_string(),
    }
  );
  Ok(())
}

#[test]
fn test_union_without_discriminator_has_no_mapping() -> anyhow::Result<()> {
  let doc = schemas(json!({
    "Value": {
      "oneOf": [{ "$ref": "#/components/schemas/Text" }, { "type": "integer" }]
    },
    "Text": { "type": "string" }
  }))?;
  let mut session = ResolverSession::for_document(&doc);
  let value = session.resolve_component("Value")?;
  let graph = session.finish()?;

  let union = graph[value].union().expect("Value is a union");
  assert!(union.discriminator.is_none());
  assert!(graph[union.variants[1]].is_primitive());
  Ok(())
}

#[test]
fn test_any_of_takes_precedence_over_one_of() -> anyhow::Result<()> {
  let doc = schemas(json!({
    "Mixed": {
      "type": "string",
      "oneOf": [{ "type": "string" }],
      "anyOf": [{ "type": "string" }, { "type": "string", "format": "uuid" }]
    }
  }))?;
  let mut session = ResolverSession::for_document(&doc);
  let mixed = session.resolve_component("Mixed")?;
  let graph = session.finish()?;

  let SchemaModel::Primitive(primitive) = &graph[mixed] else {
    panic!("Mixed is typed as a string");
  };
  let union = primitive.union.as_ref().expect("anyOf decoration");
  assert_eq!(union.kind, UnionKind::AnyOf);
  assert_eq!(union.variants.len(), 2);
  Ok(())
}

#[test]
fn test_unknown_mapping_target_is_unresolved() -> anyhow::Result<()> {
  let doc = schemas(json!({
    "Base": {
      "type": "object",
      "discriminator": { "propertyName": "kind", "mapping": { "ghost": "Ghost" } }
    }
  }))?;
  let mut session = ResolverSession::for_document(&doc);

  let err = session.resolve_component("Base").unwrap_err();
  assert_eq!(
    err,
    GeneratorError::UnresolvedReference {
      reference: "#/components/schemas/Ghost".to_string(),
      location: "#/components/schemas/Base/discriminator/mapping/ghost".to_string(),
    }
  );
  Ok(())
}
