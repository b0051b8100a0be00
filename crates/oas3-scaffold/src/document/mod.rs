//! In-memory OpenAPI document tree.
//!
//! Only the subset of OpenAPI 3.0/3.1 the scaffold generator reads is modelled here. Every map keeps
//! the declaration order of the source file, which is what makes request and response ordering stable.

pub mod loader;
pub mod refs;

#[cfg(test)]
mod tests;

use http::Method;
use indexmap::IndexMap;
use serde::Deserialize;
use strum::Display;

pub use loader::{SpecFormat, SpecLoader, parse_document};
pub use refs::{ComponentKind, ComponentRef};

pub type SchemaOrRef = ObjectOrReference<Schema>;

/// HTTP methods the operation builder turns into operations, in visiting order.
pub const SUPPORTED_METHODS: [Method; 5] = [Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE];

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
  #[serde(default)]
  pub openapi: String,
  #[serde(default)]
  pub info: Info,
  #[serde(default)]
  pub paths: IndexMap<String, PathItem>,
  #[serde(default)]
  pub components: Components,
}

impl Document {
  /// Iterates every declared operation in document order, including methods the builder skips.
  pub fn operations(&self) -> impl Iterator<Item = (&str, Method, &Operation)> {
    self
      .paths
      .iter()
      .flat_map(|(path, item)| item.operations().map(move |(method, op)| (path.as_str(), method, op)))
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Info {
  #[serde(default)]
  pub title: String,
  #[serde(default)]
  pub version: String,
  pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Components {
  #[serde(default)]
  pub schemas: IndexMap<String, SchemaOrRef>,
  #[serde(default)]
  pub parameters: IndexMap<String, ObjectOrReference<Parameter>>,
  #[serde(default)]
  pub request_bodies: IndexMap<String, ObjectOrReference<RequestBody>>,
  #[serde(default)]
  pub responses: IndexMap<String, ObjectOrReference<Response>>,
  #[serde(default)]
  pub headers: IndexMap<String, ObjectOrReference<Header>>,
}

/// Either an inline object or a `$ref` pointing somewhere else in the document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ObjectOrReference<T> {
  Ref {
    #[serde(rename = "$ref")]
    ref_path: String,
  },
  Object(T),
}

impl<T> ObjectOrReference<T> {
  pub fn as_ref_path(&self) -> Option<&str> {
    match self {
      Self::Ref { ref_path } => Some(ref_path),
      Self::Object(_) => None,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
  String,
  Number,
  Integer,
  Boolean,
  Object,
  Array,
  Null,
}

/// `type` is a single keyword in OAS 3.0 and may be a list in OAS 3.1.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SchemaTypeSet {
  Single(SchemaType),
  Multiple(Vec<SchemaType>),
}

impl SchemaTypeSet {
  pub fn contains(&self, ty: SchemaType) -> bool {
    match self {
      Self::Single(single) => *single == ty,
      Self::Multiple(types) => types.contains(&ty),
    }
  }

  /// The declared type once `null` is set aside, if exactly one remains.
  pub fn single_non_null(&self) -> Option<SchemaType> {
    match self {
      Self::Single(SchemaType::Null) => None,
      Self::Single(single) => Some(*single),
      Self::Multiple(types) => {
        let mut non_null = types.iter().copied().filter(|ty| *ty != SchemaType::Null);
        match (non_null.next(), non_null.next()) {
          (Some(ty), None) => Some(ty),
          _ => None,
        }
      }
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
  #[serde(rename = "type")]
  pub schema_type: Option<SchemaTypeSet>,
  pub format: Option<String>,
  pub title: Option<String>,
  pub description: Option<String>,
  #[serde(default)]
  pub nullable: bool,
  #[serde(default)]
  pub properties: IndexMap<String, SchemaOrRef>,
  #[serde(default)]
  pub required: Vec<String>,
  pub items: Option<Box<SchemaOrRef>>,
  #[serde(default)]
  pub all_of: Vec<SchemaOrRef>,
  #[serde(default)]
  pub one_of: Vec<SchemaOrRef>,
  #[serde(default)]
  pub any_of: Vec<SchemaOrRef>,
  pub discriminator: Option<Discriminator>,
  pub min_length: Option<u64>,
  pub max_length: Option<u64>,
  pub min_items: Option<u64>,
  pub max_items: Option<u64>,
}

impl Schema {
  pub fn is_nullable(&self) -> bool {
    self.nullable || self.schema_type.as_ref().is_some_and(|ty| ty.contains(SchemaType::Null))
  }

  pub fn has_union(&self) -> bool {
    !self.one_of.is_empty() || !self.any_of.is_empty()
  }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discriminator {
  pub property_name: String,
  #[serde(default)]
  pub mapping: IndexMap<String, String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathItem {
  pub summary: Option<String>,
  pub description: Option<String>,
  #[serde(default)]
  pub parameters: Vec<ObjectOrReference<Parameter>>,
  pub get: Option<Operation>,
  pub put: Option<Operation>,
  pub post: Option<Operation>,
  pub delete: Option<Operation>,
  pub options: Option<Operation>,
  pub head: Option<Operation>,
  pub patch: Option<Operation>,
  pub trace: Option<Operation>,
}

impl PathItem {
  /// Declared operations, supported methods first in their fixed order, then the rest.
  pub fn operations(&self) -> impl Iterator<Item = (Method, &Operation)> {
    [
      (Method::GET, &self.get),
      (Method::POST, &self.post),
      (Method::PUT, &self.put),
      (Method::PATCH, &self.patch),
      (Method::DELETE, &self.delete),
      (Method::HEAD, &self.head),
      (Method::OPTIONS, &self.options),
      (Method::TRACE, &self.trace),
    ]
    .into_iter()
    .filter_map(|(method, operation)| operation.as_ref().map(|op| (method, op)))
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
  pub operation_id: Option<String>,
  pub summary: Option<String>,
  pub description: Option<String>,
  #[serde(default)]
  pub tags: Vec<String>,
  #[serde(default)]
  pub parameters: Vec<ObjectOrReference<Parameter>>,
  pub request_body: Option<ObjectOrReference<RequestBody>>,
  #[serde(default)]
  pub responses: IndexMap<String, ObjectOrReference<Response>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ParameterLocation {
  Path,
  Query,
  Header,
  Cookie,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Parameter {
  pub name: String,
  #[serde(rename = "in")]
  pub location: ParameterLocation,
  #[serde(default)]
  pub required: bool,
  pub description: Option<String>,
  pub schema: Option<SchemaOrRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RequestBody {
  pub description: Option<String>,
  #[serde(default)]
  pub required: bool,
  #[serde(default)]
  pub content: IndexMap<String, MediaType>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Response {
  pub description: Option<String>,
  #[serde(default)]
  pub content: IndexMap<String, MediaType>,
  #[serde(default)]
  pub headers: IndexMap<String, ObjectOrReference<Header>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Header {
  pub description: Option<String>,
  #[serde(default)]
  pub required: bool,
  pub schema: Option<SchemaOrRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MediaType {
  pub schema: Option<SchemaOrRef>,
}
