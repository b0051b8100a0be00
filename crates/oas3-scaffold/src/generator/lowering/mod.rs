//! Lowering of resolved schemas into codegen-ready descriptors.
//!
//! [`TypeModelGenerator`] turns a [`SchemaModel`](crate::generator::schema::SchemaModel) into a
//! [`GenSchema`] tree under a receiver name. Named components are never lowered in place: every
//! reference to one becomes a thin descriptor pointing at the declaration in the component package.
//! A [`DeclarationRegistry`] then settles the names inline models are declared under.

mod nested;
mod operations;
mod recursion;
mod registry;
mod schemas;


use http::Method;
use strum::Display;

pub use nested::{collect_declarations, collect_nested};
pub use recursion::box_cyclic_references;
pub use registry::DeclarationRegistry;
pub use schemas::TypeModelGenerator;

use crate::{
  document::ParameterLocation,
  generator::schema::{PrimitiveKind, UnionKind},
};

/// Concrete scalar a primitive schema maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ScalarType {
  #[strum(to_string = "String")]
  String,
  #[strum(to_string = "chrono::DateTime<chrono::Utc>")]
  DateTime,
  #[strum(to_string = "chrono::NaiveDate")]
  Date,
  #[strum(to_string = "uuid::Uuid")]
  Uuid,
  #[strum(to_string = "Vec<u8>")]
  Bytes,
  #[strum(to_string = "i64")]
  I64,
  #[strum(to_string = "i32")]
  I32,
  #[strum(to_string = "i16")]
  I16,
  #[strum(to_string = "i8")]
  I8,
  #[strum(to_string = "u64")]
  U64,
  #[strum(to_string = "u32")]
  U32,
  #[strum(to_string = "f64")]
  F64,
  #[strum(to_string = "f32")]
  F32,
  #[strum(to_string = "bool")]
  Bool,
  #[strum(to_string = "serde_json::Value")]
  Value,
}

impl ScalarType {
  pub fn from_primitive(kind: PrimitiveKind, format: Option<&str>) -> Self {
    match (kind, format) {
      (PrimitiveKind::String, Some("date-time")) => Self::DateTime,
      (PrimitiveKind::String, Some("date")) => Self::Date,
      (PrimitiveKind::String, Some("uuid")) => Self::Uuid,
      (PrimitiveKind::String, Some("byte" | "binary")) => Self::Bytes,
      (PrimitiveKind::String, _) => Self::String,
      (PrimitiveKind::Integer, Some("int32")) => Self::I32,
      (PrimitiveKind::Integer, Some("int16")) => Self::I16,
      (PrimitiveKind::Integer, Some("int8")) => Self::I8,
      (PrimitiveKind::Integer, Some("uint64")) => Self::U64,
      (PrimitiveKind::Integer, Some("uint32")) => Self::U32,
      (PrimitiveKind::Integer, _) => Self::I64,
      (PrimitiveKind::Number, Some("float")) => Self::F32,
      (PrimitiveKind::Number, _) => Self::F64,
      (PrimitiveKind::Boolean, _) => Self::Bool,
      (PrimitiveKind::Any, _) => Self::Value,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenKind {
  Primitive(ScalarType),
  Object,
  Collection,
}

/// Type descriptor handed to an emitter.
#[derive(Debug, Clone, PartialEq, Eq, bon::Builder)]
pub struct GenSchema {
  #[builder(into)]
  pub package: String,
  #[builder(into)]
  pub receiver_name: String,
  #[builder(into)]
  pub declared_type_name: String,
  /// Declared elsewhere; only the package and name are meaningful.
  #[builder(default)]
  pub is_externally_defined: bool,
  /// Root of a component declaration.
  #[builder(default)]
  pub is_component: bool,
  pub kind: GenKind,
  #[builder(default)]
  pub nullable: bool,
  /// Held behind a pointer because the reference closes a cycle.
  #[builder(default)]
  pub boxed: bool,
  #[builder(default)]
  pub properties: Vec<GenProperty>,
  pub items: Option<Box<GenSchema>>,
  pub union: Option<GenUnion>,
  pub docs: Option<String>,
}

impl GenSchema {
  pub fn is_object(&self) -> bool {
    self.kind == GenKind::Object
  }

  pub fn is_collection(&self) -> bool {
    self.kind == GenKind::Collection
  }

  pub fn is_primitive(&self) -> bool {
    matches!(self.kind, GenKind::Primitive(_))
  }

  pub fn scalar(&self) -> Option<ScalarType> {
    match self.kind {
      GenKind::Primitive(scalar) => Some(scalar),
      GenKind::Object | GenKind::Collection => None,
    }
  }

  /// Whether this descriptor is rendered as its own top-level item.
  pub fn needs_declaration(&self) -> bool {
    !self.is_externally_defined && (self.is_component || self.union.is_some() || !self.is_primitive())
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenProperty {
  /// Name as written in the document.
  pub name: String,
  pub required: bool,
  pub schema: GenSchema,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenUnion {
  pub kind: UnionKind,
  /// Tag property when a discriminator is declared.
  pub property_name: Option<String>,
  pub variants: Vec<GenVariant>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenVariant {
  pub tag: Option<String>,
  pub schema: GenSchema,
}

/// Lowered operation: handlers, parameter and response descriptors, and the inline models it needs.
#[derive(Debug, Clone, PartialEq, Eq, bon::Builder)]
pub struct GenOperation {
  #[builder(into)]
  pub name: String,
  pub operation_id: Option<String>,
  pub method: Method,
  #[builder(into)]
  pub path: String,
  #[builder(into)]
  pub package: String,
  pub docs: Option<String>,
  /// Set when the operation declares parameters.
  pub parameters_type_name: Option<String>,
  #[builder(default)]
  pub parameters: Vec<GenParameter>,
  #[builder(default)]
  pub handlers: Vec<GenHandler>,
  #[builder(default)]
  pub responses: Vec<GenResponse>,
  #[builder(default)]
  pub models: Vec<GenSchema>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenParameter {
  pub name: String,
  pub location: ParameterLocation,
  pub required: bool,
  pub docs: Option<String>,
  pub schema: GenSchema,
}

/// One handler variant per accepted request media type, or a single body-less one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenHandler {
  pub name: String,
  pub media_type: Option<String>,
  pub body: Option<GenSchema>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenResponse {
  pub status_code: String,
  pub content_type: Option<String>,
  pub body: Option<GenSchema>,
  pub headers: Vec<GenHeader>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenHeader {
  pub name: String,
  pub schema: GenSchema,
}
