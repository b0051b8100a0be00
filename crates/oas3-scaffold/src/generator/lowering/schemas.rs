use std::collections::{HashMap, HashSet};

use tracing::trace;

use super::{GenKind, GenProperty, GenSchema, GenUnion, GenVariant, ScalarType};
use crate::generator::{
  naming::{
    identifiers::{ensure_unique, to_pascal_case, to_rust_type_name},
    synthesis::{item_receiver, property_receiver, variant_receiver},
  },
  schema::{Discriminated, SchemaGraph, SchemaHeader, SchemaId, SchemaModel},
};

/// Lowers nodes of a frozen [`SchemaGraph`].
///
/// Lowering is a pure function of the node, the receiver name and the package: the same inputs always
/// produce the same tree.
pub struct TypeModelGenerator<'a> {
  graph: &'a SchemaGraph,
  component_package: String,
  component_names: HashMap<String, String>,
}

impl<'a> TypeModelGenerator<'a> {
  pub fn new(graph: &'a SchemaGraph, component_package: impl Into<String>) -> Self {
    let mut used = HashSet::new();
    let mut component_names = HashMap::new();
    for (name, _) in graph.components() {
      let type_name = ensure_unique(&to_pascal_case(name), |candidate| {
        used.contains(&to_rust_type_name(candidate))
      });
      used.insert(to_rust_type_name(&type_name));
      component_names.insert(name.to_string(), type_name);
    }

    Self {
      graph,
      component_package: component_package.into(),
      component_names,
    }
  }

  /// Type name a component is declared under. Components whose names render alike are suffixed in
  /// document order.
  pub fn component_type_name(&self, name: &str) -> String {
    self
      .component_names
      .get(name)
      .cloned()
      .unwrap_or_else(|| to_pascal_case(name))
  }

  /// Full declaration of a component, named after the component itself.
  pub fn lower_component(&self, name: &str) -> Option<GenSchema> {
    let id = self.graph.component(name)?;
    let receiver = self.component_type_name(name);
    trace!(component = %name, receiver = %receiver, "lowering component");
    let mut schema = self.lower_body(id, &receiver, &self.component_package);
    schema.is_component = true;
    Some(schema)
  }

  /// Lowers `id` under `receiver`. A component node yields a thin reference to its declaration.
  pub fn lower(&self, id: SchemaId, receiver: &str, package: &str) -> GenSchema {
    match self.graph.get(id) {
      Some(model) if model.is_component() => self.reference(model),
      _ => self.lower_body(id, receiver, package),
    }
  }

  fn reference(&self, model: &SchemaModel) -> GenSchema {
    let name = self.component_type_name(model.component_name().unwrap_or_default());
    GenSchema::builder()
      .package(self.component_package.clone())
      .receiver_name(name.clone())
      .declared_type_name(name)
      .is_externally_defined(true)
      .kind(self.classify(model))
      .nullable(model.header().nullable)
      .build()
  }

  fn classify(&self, model: &SchemaModel) -> GenKind {
    match model {
      SchemaModel::Primitive(schema) => {
        GenKind::Primitive(ScalarType::from_primitive(schema.kind, schema.format.as_deref()))
      }
      SchemaModel::Object(_) => GenKind::Object,
      SchemaModel::Array(_) => GenKind::Collection,
    }
  }

  fn lower_body(&self, id: SchemaId, receiver: &str, package: &str) -> GenSchema {
    let model = &self.graph[id];
    let header = model.header();

    match model {
      SchemaModel::Primitive(schema) => GenSchema::builder()
        .package(package)
        .receiver_name(receiver)
        .declared_type_name(receiver)
        .kind(self.classify(model))
        .nullable(header.nullable)
        .maybe_union(self.lower_union(schema.union.as_ref(), receiver, package))
        .maybe_docs(docs(header))
        .build(),
      SchemaModel::Object(schema) => {
        let properties = schema
          .properties
          .iter()
          .map(|(name, &property)| GenProperty {
            name: name.clone(),
            required: schema.is_required(name),
            schema: self.lower(property, &property_receiver(receiver, name), package),
          })
          .collect();

        GenSchema::builder()
          .package(package)
          .receiver_name(receiver)
          .declared_type_name(receiver)
          .kind(GenKind::Object)
          .nullable(header.nullable)
          .properties(properties)
          .maybe_union(self.lower_union(schema.union.as_ref(), receiver, package))
          .maybe_docs(docs(header))
          .build()
      }
      SchemaModel::Array(schema) => {
        let item_label = self.graph.get(schema.items).map_or("Any", SchemaModel::kind_label);
        let items = self.lower(schema.items, &item_receiver(receiver, item_label), package);

        GenSchema::builder()
          .package(package)
          .receiver_name(receiver)
          .declared_type_name(receiver)
          .kind(GenKind::Collection)
          .nullable(header.nullable)
          .items(Box::new(items))
          .maybe_docs(docs(header))
          .build()
      }
    }
  }

  fn lower_union(&self, union: Option<&Discriminated>, receiver: &str, package: &str) -> Option<GenUnion> {
    let union = union?;
    let discriminator = union.discriminator.as_ref();

    let variants = union
      .variants
      .iter()
      .enumerate()
      .map(|(index, &variant)| {
        let label = self.graph.get(variant).map_or("Any", SchemaModel::kind_label);
        let tag = discriminator.and_then(|discriminator| {
          discriminator
            .mapping
            .iter()
            .find_map(|(tag, &target)| (target == variant).then(|| tag.clone()))
        });
        GenVariant {
          tag,
          schema: self.lower(variant, &variant_receiver(receiver, label, index), package),
        }
      })
      .collect();

    Some(GenUnion {
      kind: union.kind,
      property_name: discriminator.map(|discriminator| discriminator.property_name.clone()),
      variants,
    })
  }
}

fn docs(header: &SchemaHeader) -> Option<String> {
  header.description.clone().or_else(|| header.title.clone())
}
