use std::collections::HashSet;

use super::GenSchema;

/// Marks direct references to `cyclic` components inside one declaration as boxed.
///
/// Only fields and union variants are touched. Collections already hold their items on the heap and
/// nested inline models are declarations of their own.
pub fn box_cyclic_references(declaration: &mut GenSchema, cyclic: &HashSet<String>) {
  let direct = declaration
    .properties
    .iter_mut()
    .map(|property| &mut property.schema)
    .chain(
      declaration
        .union
        .iter_mut()
        .flat_map(|union| union.variants.iter_mut().map(|variant| &mut variant.schema)),
    );

  for schema in direct {
    if schema.is_externally_defined && !schema.is_collection() && cyclic.contains(&schema.declared_type_name) {
      schema.boxed = true;
    }
  }
}
