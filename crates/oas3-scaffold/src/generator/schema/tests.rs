use indexmap::{IndexMap, IndexSet};
use serde_json::json;

use super::{DependencyGraph, PrimitiveKind, SchemaGraph, detect_cycles};
use crate::{document::Document, generator::resolver::ResolverSession};

fn resolve_all(value: serde_json::Value) -> anyhow::Result<SchemaGraph> {
  let doc: Document = serde_json::from_value(json!({ "components": { "schemas": value } }))?;
  let mut session = ResolverSession::for_document(&doc);
  for name in doc.components.schemas.keys() {
    session.resolve_component(name)?;
  }
  Ok(session.finish()?)
}

#[test]
fn test_detect_cycles_reports_sccs_and_self_loops() {
  let mut deps: IndexMap<String, IndexSet<String>> = IndexMap::new();
  deps.insert("A".into(), IndexSet::from(["B".to_string()]));
  deps.insert("B".into(), IndexSet::from(["A".to_string()]));
  deps.insert("C".into(), IndexSet::from(["C".to_string()]));
  deps.insert("D".into(), IndexSet::from(["A".to_string()]));

  let cycles = detect_cycles(&deps);
  assert_eq!(
    cycles,
    vec![vec!["A".to_string(), "B".to_string()], vec!["C".to_string()]]
  );
}

#[test]
fn test_dependency_graph_stops_at_components() -> anyhow::Result<()> {
  let graph = resolve_all(json!({
    "Order": {
      "type": "object",
      "properties": {
        "lines": { "type": "array", "items": { "$ref": "#/components/schemas/Line" } },
        "note": { "type": "string" }
      }
    },
    "Line": {
      "type": "object",
      "properties": { "product": { "$ref": "#/components/schemas/Product" } }
    },
    "Product": { "type": "object", "properties": { "name": { "type": "string" } } }
  }))?;

  let deps = DependencyGraph::from_schema_graph(&graph);
  let order: Vec<_> = deps.dependencies_of("Order").unwrap().iter().map(String::as_str).collect();
  assert_eq!(order, ["Line"]);
  let line: Vec<_> = deps.dependencies_of("Line").unwrap().iter().map(String::as_str).collect();
  assert_eq!(line, ["Product"]);
  assert!(deps.dependencies_of("Product").unwrap().is_empty());
  assert!(deps.cycles().is_empty());
  Ok(())
}

#[test]
fn test_dependency_graph_finds_reference_cycles() -> anyhow::Result<()> {
  let graph = resolve_all(json!({
    "Parent": {
      "type": "object",
      "properties": { "children": { "type": "array", "items": { "$ref": "#/components/schemas/Child" } } }
    },
    "Child": { "type": "object", "properties": { "parent": { "$ref": "#/components/schemas/Parent" } } },
    "Tree": { "type": "object", "properties": { "nodes": { "type": "array", "items": { "$ref": "#/components/schemas/Tree" } } } }
  }))?;

  let cycles = DependencyGraph::from_schema_graph(&graph).cycles();
  assert_eq!(
    cycles,
    vec![
      vec!["Child".to_string(), "Parent".to_string()],
      vec!["Tree".to_string()]
    ]
  );
  Ok(())
}

#[test]
fn test_graph_iteration_and_labels() -> anyhow::Result<()> {
  let graph = resolve_all(json!({
    "Tags": { "type": "array", "items": { "type": "string" } }
  }))?;

  assert_eq!(graph.len(), 2);
  let labels: Vec<_> = graph.iter().map(|(_, model)| model.kind_label()).collect();
  assert_eq!(labels, ["Array", "String"]);
  assert_eq!(PrimitiveKind::Integer.to_string(), "integer");
  assert_eq!(graph.lookup("#/components/schemas/Tags"), graph.component("Tags"));
  Ok(())
}
