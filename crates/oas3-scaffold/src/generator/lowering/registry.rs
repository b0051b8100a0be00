use std::collections::HashMap;

use tracing::debug;

use super::{GenOperation, GenSchema};
use crate::generator::naming::identifiers::to_rust_type_name;

enum Owner {
  /// Declared by the emitter itself, or by a model whose children are still being claimed.
  Reserved,
  /// Inline model as lowered, and as it ended up after its names were claimed.
  Declared { original: GenSchema, resolved: GenSchema },
}

/// Keeps declared type names unique within each package.
///
/// Names are compared as the Rust identifiers they render to. The first inline model lowered under a
/// name owns it. A later model under the same name reuses the declaration of a structurally identical
/// model, suffixed or not, and otherwise takes the first free `{name}{n}` with n from 2.
#[derive(Default)]
pub struct DeclarationRegistry {
  packages: HashMap<String, HashMap<String, Owner>>,
}

impl DeclarationRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Reserves `name` in `package` for an item no inline model may take.
  pub fn reserve(&mut self, package: &str, name: &str) {
    self
      .names_mut(package)
      .entry(to_rust_type_name(name))
      .or_insert(Owner::Reserved);
  }

  /// Reserves the parameter struct, response enum and handler traits of `operation`.
  pub fn reserve_operation(&mut self, operation: &GenOperation) {
    for name in operation.item_names() {
      self.reserve(&operation.package, &name);
    }
  }

  /// Claims a name for every inline declaration under `root`. A component root keeps its own name.
  pub fn claim(&mut self, root: &mut GenSchema) {
    if root.is_component {
      self.claim_children(root);
    } else {
      self.claim_node(root);
    }
  }

  fn claim_node(&mut self, schema: &mut GenSchema) {
    if schema.is_externally_defined {
      return;
    }
    if !schema.needs_declaration() {
      self.claim_children(schema);
      return;
    }

    let original = schema.clone();
    let names = self.names_mut(&schema.package);
    let mut suffix = 1;
    let name = loop {
      let candidate = match suffix {
        1 => schema.declared_type_name.clone(),
        n => format!("{}{n}", schema.declared_type_name),
      };
      match names.get(&to_rust_type_name(&candidate)) {
        None => break candidate,
        Some(Owner::Declared { original: existing, resolved }) if *existing == original => {
          *schema = resolved.clone();
          return;
        }
        Some(_) => suffix += 1,
      }
    };
    if name != schema.declared_type_name {
      debug!(
        package = %schema.package,
        name = %schema.declared_type_name,
        renamed = %name,
        "renamed colliding declaration"
      );
      schema.declared_type_name = name;
    }

    let key = to_rust_type_name(&schema.declared_type_name);
    names.insert(key.clone(), Owner::Reserved);
    self.claim_children(schema);
    let resolved = schema.clone();
    self
      .names_mut(&schema.package)
      .insert(key, Owner::Declared { original, resolved });
  }

  fn claim_children(&mut self, schema: &mut GenSchema) {
    for property in &mut schema.properties {
      self.claim_node(&mut property.schema);
    }
    if let Some(union) = &mut schema.union {
      for variant in &mut union.variants {
        self.claim_node(&mut variant.schema);
      }
    }
    if let Some(items) = schema.items.as_deref_mut() {
      self.claim_node(items);
    }
  }

  fn names_mut(&mut self, package: &str) -> &mut HashMap<String, Owner> {
    self.packages.entry(package.to_string()).or_default()
  }
}
