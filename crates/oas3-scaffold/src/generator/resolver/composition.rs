use std::collections::{HashMap, HashSet};

use indexmap::{IndexMap, IndexSet};

use super::{PendingMerge, Slot};
use crate::generator::{
  errors::{GeneratorError, Result},
  schema::{SchemaId, SchemaModel},
};

type Merged = (IndexMap<String, SchemaId>, IndexSet<String>);

#[derive(Default)]
struct MergeAccumulator {
  properties: IndexMap<String, SchemaId>,
  required: IndexSet<String>,
}

impl MergeAccumulator {
  fn seeded((properties, required): Merged) -> Self {
    Self { properties, required }
  }

  /// Later parts overwrite earlier ones by exact property name and keep the first position.
  fn absorb(&mut self, (properties, required): Merged) {
    for (name, id) in properties {
      self.properties.insert(name, id);
    }
    self.required.extend(required);
  }

  fn finish(self) -> Merged {
    (self.properties, self.required)
  }
}

struct Flattener<'s> {
  slots: &'s [Slot],
  pending: HashMap<SchemaId, &'s PendingMerge>,
  done: HashMap<SchemaId, Merged>,
  visiting: HashSet<SchemaId>,
}

impl Flattener<'_> {
  /// Own properties followed by each `allOf` part in order. Non-object parts contribute nothing.
  fn flatten(&mut self, id: SchemaId) -> Result<Option<Merged>> {
    if let Some(merged) = self.done.get(&id) {
      return Ok(Some(merged.clone()));
    }

    let Some(SchemaModel::Object(object)) = self.slots[id.index()].model.as_ref() else {
      return Ok(None);
    };
    let own = (object.properties.clone(), object.required.clone());

    let Some(merge) = self.pending.get(&id).copied() else {
      return Ok(Some(own));
    };

    if !self.visiting.insert(id) {
      return Err(GeneratorError::UnresolvableCycle {
        reference: merge.location.clone(),
      });
    }

    let mut acc = MergeAccumulator::seeded(own);
    for part in &merge.parts {
      if let Some(merged) = self.flatten(*part)? {
        acc.absorb(merged);
      }
    }

    self.visiting.remove(&id);
    let merged = acc.finish();
    self.done.insert(id, merged.clone());
    Ok(Some(merged))
  }
}

pub(super) fn merge_compositions(slots: &mut [Slot], merges: &[PendingMerge]) -> Result<()> {
  if merges.is_empty() {
    return Ok(());
  }

  let results = {
    let mut flattener = Flattener {
      slots: &*slots,
      pending: merges.iter().map(|merge| (merge.target, merge)).collect(),
      done: HashMap::new(),
      visiting: HashSet::new(),
    };

    let mut results = Vec::with_capacity(merges.len());
    for merge in merges {
      if let Some(merged) = flattener.flatten(merge.target)? {
        results.push((merge.target, merged));
      }
    }
    results
  };

  for (target, (properties, required)) in results {
    if let Some(SchemaModel::Object(object)) = slots[target.index()].model.as_mut() {
      object.properties = properties;
      object.required = required;
    }
  }

  Ok(())
}
