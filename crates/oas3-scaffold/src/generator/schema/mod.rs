//! Resolved schema model.
//!
//! Nodes live in a [`SchemaGraph`] arena and point at each other through [`SchemaId`] handles, so a
//! cyclic document becomes a cyclic graph instead of an infinitely deep tree. Two references to the
//! same component always carry the same id.

pub mod dependencies;
pub mod graph;

#[cfg(test)]
mod tests;

use std::fmt;

use indexmap::{IndexMap, IndexSet};
use strum::Display;

pub use dependencies::{DependencyGraph, detect_cycles};
pub use graph::SchemaGraph;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SchemaId(usize);

impl SchemaId {
  pub(crate) const fn new(index: usize) -> Self {
    Self(index)
  }

  pub const fn index(self) -> usize {
    self.0
  }
}

impl fmt::Display for SchemaId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "#{}", self.0)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum PrimitiveKind {
  String,
  Number,
  Integer,
  Boolean,
  /// No type and no structure declared.
  Any,
}

impl PrimitiveKind {
  pub const fn label(self) -> &'static str {
    match self {
      Self::String => "String",
      Self::Number => "Number",
      Self::Integer => "Integer",
      Self::Boolean => "Boolean",
      Self::Any => "Any",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum UnionKind {
  #[strum(to_string = "oneOf")]
  OneOf,
  #[strum(to_string = "anyOf")]
  AnyOf,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaHeader {
  /// Set only for schemas declared in the component dictionary.
  pub component_name: Option<String>,
  pub title: Option<String>,
  pub description: Option<String>,
  pub nullable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discriminator {
  pub property_name: String,
  pub mapping: IndexMap<String, SchemaId>,
}

/// A oneOf/anyOf decoration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discriminated {
  pub kind: UnionKind,
  pub variants: Vec<SchemaId>,
  pub discriminator: Option<Discriminator>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimitiveSchema {
  pub header: SchemaHeader,
  pub kind: PrimitiveKind,
  pub format: Option<String>,
  pub min_length: Option<u64>,
  pub max_length: Option<u64>,
  pub union: Option<Discriminated>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectSchema {
  pub header: SchemaHeader,
  pub properties: IndexMap<String, SchemaId>,
  pub required: IndexSet<String>,
  /// A discriminator declared without a oneOf/anyOf list, as on a polymorphic base.
  pub discriminator: Option<Discriminator>,
  pub union: Option<Discriminated>,
}

impl ObjectSchema {
  pub fn is_required(&self, property: &str) -> bool {
    self.required.contains(property)
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArraySchema {
  pub header: SchemaHeader,
  pub items: SchemaId,
  pub min_items: Option<u64>,
  pub max_items: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaModel {
  Primitive(PrimitiveSchema),
  Object(ObjectSchema),
  Array(ArraySchema),
}

impl SchemaModel {
  pub fn header(&self) -> &SchemaHeader {
    match self {
      Self::Primitive(schema) => &schema.header,
      Self::Object(schema) => &schema.header,
      Self::Array(schema) => &schema.header,
    }
  }

  pub fn component_name(&self) -> Option<&str> {
    self.header().component_name.as_deref()
  }

  pub fn is_component(&self) -> bool {
    self.component_name().is_some()
  }

  pub fn is_object(&self) -> bool {
    matches!(self, Self::Object(_))
  }

  pub fn is_array(&self) -> bool {
    matches!(self, Self::Array(_))
  }

  pub fn is_primitive(&self) -> bool {
    matches!(self, Self::Primitive(_))
  }

  pub fn union(&self) -> Option<&Discriminated> {
    match self {
      Self::Primitive(schema) => schema.union.as_ref(),
      Self::Object(schema) => schema.union.as_ref(),
      Self::Array(_) => None,
    }
  }

  /// Structural label used when naming anonymous nested declarations.
  pub fn kind_label(&self) -> &'static str {
    match self {
      Self::Primitive(schema) => schema.kind.label(),
      Self::Object(_) => "Object",
      Self::Array(_) => "Array",
    }
  }

  /// Every node this one points at directly, in a stable order.
  pub fn children(&self) -> Vec<SchemaId> {
    let mut children = Vec::new();
    match self {
      Self::Primitive(_) => {}
      Self::Object(schema) => {
        children.extend(schema.properties.values().copied());
        if let Some(discriminator) = &schema.discriminator {
          children.extend(discriminator.mapping.values().copied());
        }
      }
      Self::Array(schema) => children.push(schema.items),
    }
    if let Some(union) = self.union() {
      children.extend(union.variants.iter().copied());
      if let Some(discriminator) = &union.discriminator {
        children.extend(discriminator.mapping.values().copied());
      }
    }
    children
  }
}
