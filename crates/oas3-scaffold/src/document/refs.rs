use std::borrow::Cow;

use percent_encoding::percent_decode_str;
use strum::{Display, EnumString};

pub const COMPONENTS_PREFIX: &str = "#/components/";
pub const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";

/// The component dictionaries a local `$ref` may point into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "camelCase")]
pub enum ComponentKind {
  Schemas,
  Parameters,
  RequestBodies,
  Responses,
  Headers,
}

/// A parsed `#/components/<kind>/<name>` reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComponentRef {
  pub kind: ComponentKind,
  pub name: String,
}

impl ComponentRef {
  /// Parses a local component reference.
  ///
  /// Returns `None` for external documents, pointers outside `#/components`, and pointers that
  /// descend below a component (e.g. `#/components/schemas/Pet/properties/name`). The name is
  /// percent-decoded and JSON-pointer unescaped (`~1` to `/`, `~0` to `~`).
  pub fn parse(ref_path: &str) -> Option<Self> {
    let rest = ref_path.strip_prefix(COMPONENTS_PREFIX)?;
    let (kind, name) = rest.split_once('/')?;
    if name.is_empty() || name.contains('/') {
      return None;
    }

    let kind = kind.parse::<ComponentKind>().ok()?;
    let decoded = percent_decode_str(name).decode_utf8().ok()?;
    let name = unescape_pointer(&decoded).into_owned();

    Some(Self { kind, name })
  }

  /// Parses a reference that must point into `kind`.
  pub fn parse_as(ref_path: &str, kind: ComponentKind) -> Option<String> {
    Self::parse(ref_path).filter(|r| r.kind == kind).map(|r| r.name)
  }

  /// Canonical reference path for a declared component name.
  pub fn canonical_path(kind: ComponentKind, name: &str) -> String {
    format!("{COMPONENTS_PREFIX}{kind}/{name}")
  }
}

fn unescape_pointer(segment: &str) -> Cow<'_, str> {
  if segment.contains('~') {
    Cow::Owned(segment.replace("~1", "/").replace("~0", "~"))
  } else {
    Cow::Borrowed(segment)
  }
}
