//! Schema resolution.
//!
//! A [`ResolverSession`] owns the component cache for one document. Every node reserves its arena
//! slot before its children are resolved, and a component's slot is cached under its canonical
//! reference path before its body is walked. A schema that reaches itself again through `$ref`
//! therefore gets its own id back instead of recursing.
//!
//! `allOf` merges are recorded while walking and applied by [`ResolverSession::finish`], once every
//! node exists. That lets a variant compose its own polymorphic parent.

mod composition;
mod discriminator;

#[cfg(test)]
mod tests;

use std::collections::HashSet;

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::{
  document::{ComponentKind, ComponentRef, Document, ObjectOrReference, Schema, SchemaOrRef, SchemaType, SchemaTypeSet},
  generator::{
    errors::{GeneratorError, Result},
    schema::{
      ArraySchema, ObjectSchema, PrimitiveKind, PrimitiveSchema, SchemaGraph, SchemaHeader, SchemaId, SchemaModel,
    },
  },
};

struct Slot {
  component_name: Option<String>,
  model: Option<SchemaModel>,
}

struct PendingMerge {
  target: SchemaId,
  parts: Vec<SchemaId>,
  location: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
  Primitive(PrimitiveKind),
  Object,
  Array,
}

impl Shape {
  fn of(schema: &Schema) -> Self {
    match schema.schema_type.as_ref().map(SchemaTypeSet::single_non_null) {
      Some(Some(SchemaType::Object)) => Self::Object,
      Some(Some(SchemaType::Array)) => Self::Array,
      Some(Some(SchemaType::String)) => Self::Primitive(PrimitiveKind::String),
      Some(Some(SchemaType::Number)) => Self::Primitive(PrimitiveKind::Number),
      Some(Some(SchemaType::Integer)) => Self::Primitive(PrimitiveKind::Integer),
      Some(Some(SchemaType::Boolean)) => Self::Primitive(PrimitiveKind::Boolean),
      Some(Some(SchemaType::Null) | None) => Self::Primitive(PrimitiveKind::Any),
      None if !schema.properties.is_empty() || !schema.all_of.is_empty() => Self::Object,
      None if schema.items.is_some() => Self::Array,
      None => Self::Primitive(PrimitiveKind::Any),
    }
  }
}

/// Resolution state scoped to a single document.
pub struct ResolverSession<'a> {
  components: &'a IndexMap<String, SchemaOrRef>,
  slots: Vec<Slot>,
  cache: IndexMap<String, SchemaId>,
  aliases_in_flight: HashSet<String>,
  merges: Vec<PendingMerge>,
  scope: Vec<String>,
}

impl<'a> ResolverSession<'a> {
  pub fn new(components: &'a IndexMap<String, SchemaOrRef>) -> Self {
    Self {
      components,
      slots: Vec::new(),
      cache: IndexMap::new(),
      aliases_in_flight: HashSet::new(),
      merges: Vec::new(),
      scope: Vec::new(),
    }
  }

  pub fn for_document(document: &'a Document) -> Self {
    Self::new(&document.components.schemas)
  }

  /// Resolves a schema or reference. `context` labels the location in error messages.
  pub fn resolve(&mut self, schema: &SchemaOrRef, context: Option<&str>) -> Result<SchemaId> {
    match context {
      Some(context) => self.scoped(context, |session| session.resolve_schema_or_ref(schema)),
      None => self.resolve_schema_or_ref(schema),
    }
  }

  /// Resolves a `#/components/schemas/...` reference through the cache.
  pub fn resolve_reference(&mut self, reference: &str) -> Result<SchemaId> {
    let Some(name) = ComponentRef::parse_as(reference, ComponentKind::Schemas) else {
      return Err(GeneratorError::unresolved(reference, self.location()));
    };
    self.resolve_named(&name, reference)
  }

  /// Resolves a component by its dictionary name.
  pub fn resolve_component(&mut self, name: &str) -> Result<SchemaId> {
    let reference = ComponentRef::canonical_path(ComponentKind::Schemas, name);
    self.resolve_named(name, &reference)
  }

  /// Model behind `id`, if its resolution has completed.
  pub fn model(&self, id: SchemaId) -> Option<&SchemaModel> {
    self.slots.get(id.index()).and_then(|slot| slot.model.as_ref())
  }

  pub fn cached(&self, reference: &str) -> Option<SchemaId> {
    self.cache.get(reference).copied()
  }

  /// Applies pending `allOf` merges and freezes the arena.
  pub fn finish(self) -> Result<SchemaGraph> {
    let Self {
      mut slots,
      cache,
      merges,
      ..
    } = self;

    if let Some(index) = slots.iter().position(|slot| slot.model.is_none()) {
      return Err(GeneratorError::UnfinishedSchema {
        location: SchemaId::new(index).to_string(),
      });
    }

    composition::merge_compositions(&mut slots, &merges)?;

    let nodes = slots.into_iter().filter_map(|slot| slot.model).collect();
    Ok(SchemaGraph::new(nodes, cache))
  }

  pub(crate) fn with_root_scope<T>(
    &mut self,
    root: impl Into<String>,
    f: impl FnOnce(&mut Self) -> Result<T>,
  ) -> Result<T> {
    let saved = std::mem::replace(&mut self.scope, vec![root.into()]);
    let result = f(self);
    self.scope = saved;
    result
  }

  pub(crate) fn location(&self) -> String {
    if self.scope.is_empty() {
      "#".to_string()
    } else {
      self.scope.join("/")
    }
  }

  fn scoped<T>(&mut self, segment: impl Into<String>, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
    self.scope.push(segment.into());
    let result = f(self);
    self.scope.pop();
    result
  }

  fn resolve_schema_or_ref(&mut self, schema: &SchemaOrRef) -> Result<SchemaId> {
    match schema {
      ObjectOrReference::Ref { ref_path } => self.resolve_reference(ref_path),
      ObjectOrReference::Object(schema) => {
        let id = self.reserve(None);
        self.resolve_into(id, schema, None)?;
        Ok(id)
      }
    }
  }

  fn find_component(&self, name: &str) -> Option<(&'a str, &'a SchemaOrRef)> {
    let components = self.components;
    components
      .get_key_value(name)
      .or_else(|| {
        let lowered = name.to_lowercase();
        components.iter().find(|(declared, _)| declared.to_lowercase() == lowered)
      })
      .map(|(declared, schema)| (declared.as_str(), schema))
  }

  /// Shape of `schema`, looking through an untyped union at its variants.
  ///
  /// A union with no declared type is an object when it carries a discriminator or when any variant
  /// is object-shaped. A union of scalars stays a primitive decorated with its variants.
  fn shape_of(&self, schema: &Schema) -> Shape {
    let shape = Shape::of(schema);
    if shape == Shape::Primitive(PrimitiveKind::Any)
      && schema.schema_type.is_none()
      && self.union_is_structured(schema, &mut HashSet::new())
    {
      return Shape::Object;
    }
    shape
  }

  fn union_is_structured(&self, schema: &Schema, visited: &mut HashSet<String>) -> bool {
    if !schema.has_union() {
      return false;
    }
    schema.discriminator.is_some()
      || schema
        .one_of
        .iter()
        .chain(&schema.any_of)
        .any(|variant| self.variant_is_structured(variant, visited))
  }

  fn variant_is_structured(&self, variant: &SchemaOrRef, visited: &mut HashSet<String>) -> bool {
    match variant {
      ObjectOrReference::Ref { ref_path } => {
        let Some((declared, target)) = ComponentRef::parse_as(ref_path, ComponentKind::Schemas)
          .and_then(|name| self.find_component(&name))
        else {
          return false;
        };
        visited.insert(declared.to_string()) && self.variant_is_structured(target, visited)
      }
      ObjectOrReference::Object(schema) => match Shape::of(schema) {
        Shape::Object => true,
        Shape::Array => false,
        Shape::Primitive(_) => schema.schema_type.is_none() && self.union_is_structured(schema, visited),
      },
    }
  }

  fn resolve_named(&mut self, name: &str, reference: &str) -> Result<SchemaId> {
    let Some((declared, raw)) = self.find_component(name) else {
      return Err(GeneratorError::unresolved(reference, self.location()));
    };

    let canonical = ComponentRef::canonical_path(ComponentKind::Schemas, declared);
    if let Some(&id) = self.cache.get(&canonical) {
      trace!(reference = %canonical, id = %id, "component cache hit");
      return Ok(id);
    }

    match raw {
      ObjectOrReference::Ref { ref_path } => self.resolve_alias(canonical, ref_path),
      ObjectOrReference::Object(schema) => {
        let id = self.reserve(Some(declared));
        self.cache.insert(canonical.clone(), id);
        debug!(component = %declared, id = %id, "registered component schema");

        self.with_root_scope(canonical, |session| session.resolve_into(id, schema, Some(declared)))?;
        Ok(id)
      }
    }
  }

  fn resolve_alias(&mut self, canonical: String, target: &str) -> Result<SchemaId> {
    if !self.aliases_in_flight.insert(canonical.clone()) {
      return Err(GeneratorError::UnresolvableCycle { reference: canonical });
    }

    let resolved = self.with_root_scope(canonical.clone(), |session| session.resolve_reference(target));
    self.aliases_in_flight.remove(&canonical);

    let id = resolved?;
    debug!(alias = %canonical, id = %id, "registered component alias");
    self.cache.insert(canonical, id);
    Ok(id)
  }

  fn reserve(&mut self, component_name: Option<&str>) -> SchemaId {
    let id = SchemaId::new(self.slots.len());
    self.slots.push(Slot {
      component_name: component_name.map(str::to_string),
      model: None,
    });
    id
  }

  fn resolve_into(&mut self, id: SchemaId, schema: &Schema, component_name: Option<&str>) -> Result<()> {
    let header = SchemaHeader {
      component_name: component_name.map(str::to_string),
      title: schema.title.clone(),
      description: schema.description.clone(),
      nullable: schema.is_nullable(),
    };

    let model = match self.shape_of(schema) {
      Shape::Array => SchemaModel::Array(self.resolve_array(schema, header)?),
      Shape::Object => SchemaModel::Object(self.resolve_object(id, schema, header)?),
      Shape::Primitive(kind) => SchemaModel::Primitive(PrimitiveSchema {
        header,
        kind,
        format: schema.format.clone(),
        min_length: schema.min_length,
        max_length: schema.max_length,
        union: self.resolve_union(schema)?,
      }),
    };

    self.slots[id.index()].model = Some(model);
    Ok(())
  }

  fn resolve_array(&mut self, schema: &Schema, header: SchemaHeader) -> Result<ArraySchema> {
    let Some(items) = schema.items.as_deref() else {
      return Err(GeneratorError::MissingItemsSchema {
        location: self.location(),
      });
    };

    let items = self.scoped("items", |session| session.resolve_schema_or_ref(items))?;

    Ok(ArraySchema {
      header,
      items,
      min_items: schema.min_items,
      max_items: schema.max_items,
    })
  }

  fn resolve_object(&mut self, id: SchemaId, schema: &Schema, header: SchemaHeader) -> Result<ObjectSchema> {
    let mut properties = IndexMap::with_capacity(schema.properties.len());
    for (name, property) in &schema.properties {
      let property_id = self.scoped(format!("properties/{name}"), |session| {
        session.resolve_schema_or_ref(property)
      })?;
      properties.insert(name.clone(), property_id);
    }

    if !schema.all_of.is_empty() {
      let mut parts = Vec::with_capacity(schema.all_of.len());
      for (index, part) in schema.all_of.iter().enumerate() {
        parts.push(self.scoped(format!("allOf/{index}"), |session| session.resolve_schema_or_ref(part))?);
      }
      self.merges.push(PendingMerge {
        target: id,
        parts,
        location: self.location(),
      });
    }

    let union = self.resolve_union(schema)?;
    let discriminator = match union {
      Some(_) => None,
      None => self.resolve_discriminator(schema.discriminator.as_ref())?,
    };

    Ok(ObjectSchema {
      header,
      properties,
      required: schema.required.iter().cloned().collect(),
      discriminator,
      union,
    })
  }
}
