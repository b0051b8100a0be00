use std::collections::HashSet;

use super::GenSchema;

/// Anonymous models nested inside a collection that need their own top-level declaration.
///
/// Objects and primitives contribute nothing: objects declare themselves and inline primitives are
/// rendered in place. A collection contributes an inline object or union item, or an inline
/// collection item followed by whatever that inner collection contributes.
pub fn collect_nested(root: &GenSchema) -> Vec<&GenSchema> {
  let mut nested = Vec::new();
  let mut current = root;

  while current.is_collection() {
    let Some(items) = current.items.as_deref() else {
      break;
    };
    if items.is_externally_defined {
      break;
    }
    if items.is_collection() {
      nested.push(items);
      current = items;
      continue;
    }
    if items.needs_declaration() {
      nested.push(items);
    }
    break;
  }

  nested
}

/// Every declaration `root` needs: the root itself when it is declared, then each inline model reachable
/// through properties, union variants and collections. De-duplicated by declared name, first seen wins.
pub fn collect_declarations(root: &GenSchema) -> Vec<GenSchema> {
  let mut seen = HashSet::new();
  let mut declarations = Vec::new();
  visit(root, &mut seen, &mut declarations);
  declarations
}

fn visit(schema: &GenSchema, seen: &mut HashSet<String>, declarations: &mut Vec<GenSchema>) {
  if schema.is_externally_defined {
    return;
  }
  if schema.needs_declaration() {
    if !seen.insert(schema.declared_type_name.clone()) {
      return;
    }
    declarations.push(schema.clone());
  }

  for property in &schema.properties {
    visit(&property.schema, seen, declarations);
  }
  if let Some(union) = &schema.union {
    for variant in &union.variants {
      visit(&variant.schema, seen, declarations);
    }
  }
  if schema.is_collection() {
    for nested in collect_nested(schema) {
      visit(nested, seen, declarations);
    }
  }
}
