use std::{collections::HashSet, ops::Index};

use indexmap::IndexMap;

use super::{SchemaId, SchemaModel};

/// Frozen output of one resolver session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaGraph {
  nodes: Vec<SchemaModel>,
  references: IndexMap<String, SchemaId>,
}

impl SchemaGraph {
  pub(crate) fn new(nodes: Vec<SchemaModel>, references: IndexMap<String, SchemaId>) -> Self {
    Self { nodes, references }
  }

  pub fn get(&self, id: SchemaId) -> Option<&SchemaModel> {
    self.nodes.get(id.index())
  }

  pub fn len(&self) -> usize {
    self.nodes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = (SchemaId, &SchemaModel)> {
    self.nodes.iter().enumerate().map(|(index, model)| (SchemaId::new(index), model))
  }

  /// Id cached under a canonical reference path such as `#/components/schemas/Pet`.
  pub fn lookup(&self, reference: &str) -> Option<SchemaId> {
    self.references.get(reference).copied()
  }

  /// Every cached reference path, aliases included, in the order first encountered.
  pub fn references(&self) -> impl Iterator<Item = (&str, SchemaId)> {
    self.references.iter().map(|(path, id)| (path.as_str(), *id))
  }

  /// Named components in the order first encountered, each listed once.
  pub fn components(&self) -> Vec<(&str, SchemaId)> {
    let mut seen = HashSet::new();
    self
      .references
      .values()
      .filter(|id| seen.insert(**id))
      .filter_map(|id| self[*id].component_name().map(|name| (name, *id)))
      .collect()
  }

  pub fn component(&self, name: &str) -> Option<SchemaId> {
    self
      .references
      .values()
      .copied()
      .find(|id| self[*id].component_name() == Some(name))
  }
}

impl Index<SchemaId> for SchemaGraph {
  type Output = SchemaModel;

  fn index(&self, id: SchemaId) -> &Self::Output {
    &self.nodes[id.index()]
  }
}
