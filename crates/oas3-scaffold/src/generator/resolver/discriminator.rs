use indexmap::IndexMap;

use super::ResolverSession;
use crate::{
  document::{self, ComponentKind, ComponentRef, Schema},
  generator::{
    errors::{GeneratorError, Result},
    schema::{Discriminated, Discriminator, SchemaId, UnionKind},
  },
};

impl ResolverSession<'_> {
  /// Resolves a oneOf/anyOf list. anyOf wins when both are present.
  pub(super) fn resolve_union(&mut self, schema: &Schema) -> Result<Option<Discriminated>> {
    let (kind, keyword, members) = if !schema.any_of.is_empty() {
      (UnionKind::AnyOf, "anyOf", &schema.any_of)
    } else if !schema.one_of.is_empty() {
      (UnionKind::OneOf, "oneOf", &schema.one_of)
    } else {
      return Ok(None);
    };

    let explicit = self.resolve_explicit_mapping(schema.discriminator.as_ref())?;

    let mut variants = Vec::with_capacity(members.len());
    for (index, member) in members.iter().enumerate() {
      variants.push(self.scoped(format!("{keyword}/{index}"), |session| {
        session.resolve_schema_or_ref(member)
      })?);
    }

    let discriminator = match (schema.discriminator.as_ref(), explicit) {
      (Some(declared), Some(mapping)) => Some(self.complete_mapping(declared, mapping, &variants)?),
      _ => None,
    };

    Ok(Some(Discriminated {
      kind,
      variants,
      discriminator,
    }))
  }

  /// A discriminator on an object without a variant list keeps only its explicit mapping.
  pub(super) fn resolve_discriminator(
    &mut self,
    declared: Option<&document::Discriminator>,
  ) -> Result<Option<Discriminator>> {
    let Some(declared) = declared else {
      return Ok(None);
    };
    let mapping = self.resolve_explicit_mapping(Some(declared))?.unwrap_or_default();

    Ok(Some(Discriminator {
      property_name: declared.property_name.clone(),
      mapping,
    }))
  }

  fn resolve_explicit_mapping(
    &mut self,
    declared: Option<&document::Discriminator>,
  ) -> Result<Option<IndexMap<String, SchemaId>>> {
    let Some(declared) = declared else {
      return Ok(None);
    };

    let mut mapping = IndexMap::with_capacity(declared.mapping.len());
    for (tag, target) in &declared.mapping {
      let reference = if target.starts_with('#') {
        target.clone()
      } else {
        ComponentRef::canonical_path(ComponentKind::Schemas, target)
      };
      let id = self.scoped(format!("discriminator/mapping/{tag}"), |session| {
        session.resolve_reference(&reference)
      })?;
      mapping.insert(tag.clone(), id);
    }

    Ok(Some(mapping))
  }

  /// Adds an entry named after each component variant the explicit mapping does not already cover.
  fn complete_mapping(
    &self,
    declared: &document::Discriminator,
    mut mapping: IndexMap<String, SchemaId>,
    variants: &[SchemaId],
  ) -> Result<Discriminator> {
    for &variant in variants {
      let Some(name) = self.slots[variant.index()].component_name.as_deref() else {
        continue;
      };
      if mapping.values().any(|mapped| *mapped == variant) {
        continue;
      }
      if mapping.contains_key(name) {
        return Err(GeneratorError::AmbiguousDiscriminatorMapping {
          location: self.location(),
          tag: name.to_string(),
        });
      }
      mapping.insert(name.to_string(), variant);
    }

    Ok(Discriminator {
      property_name: declared.property_name.clone(),
      mapping,
    })
  }
}
