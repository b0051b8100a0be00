//! Operation descriptors built from the document's path table.

mod builder;


use http::Method;
use indexmap::IndexMap;

pub use builder::OperationBuilder;

use crate::{document::ParameterLocation, generator::schema::SchemaId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
  /// Normalized identifier, e.g. `CreateItems`.
  pub name: String,
  pub operation_id: Option<String>,
  pub method: Method,
  pub path: String,
  pub summary: Option<String>,
  pub description: Option<String>,
  pub tags: Vec<String>,
  pub parameters: Vec<Parameter>,
  /// One per accepted media type, in declaration order.
  pub requests: Vec<Request>,
  /// One per status code and content type, in declaration order.
  pub responses: Vec<Response>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
  pub name: String,
  pub location: ParameterLocation,
  pub required: bool,
  pub description: Option<String>,
  pub schema: SchemaId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
  pub media_type: String,
  pub body: SchemaId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
  pub status_code: String,
  pub content_type: Option<String>,
  pub body: Option<SchemaId>,
  pub headers: IndexMap<String, SchemaId>,
}
