use std::collections::HashSet;

use http::Method;
use indexmap::IndexMap;
use tracing::debug;

use super::{Operation, Parameter, Request, Response};
use crate::{
  document::{self, ComponentKind, ComponentRef, Document, ObjectOrReference, ParameterLocation, PathItem, SUPPORTED_METHODS},
  generator::{
    errors::{GeneratorError, Result},
    metrics::GenerationWarning,
    naming::{identifiers::ensure_unique, synthesis::operation_name},
    resolver::ResolverSession,
    schema::{SchemaId, SchemaModel},
  },
};

/// Walks the path table and resolves every operation's schemas through a shared session.
pub struct OperationBuilder<'a> {
  document: &'a Document,
  names: IndexMap<String, String>,
  warnings: Vec<GenerationWarning>,
}

impl<'a> OperationBuilder<'a> {
  pub fn new(document: &'a Document) -> Self {
    Self {
      document,
      names: IndexMap::new(),
      warnings: Vec::new(),
    }
  }

  /// Paths in document order; per path GET, POST, PUT, PATCH, DELETE. Other methods are skipped
  /// with a warning.
  pub fn build_operations(&mut self, session: &mut ResolverSession<'_>) -> Result<Vec<Operation>> {
    let document = self.document;
    let mut operations = Vec::new();

    for (path, item) in &document.paths {
      for (method, operation) in item.operations() {
        if !SUPPORTED_METHODS.contains(&method) {
          self.warnings.push(GenerationWarning::UnsupportedMethod {
            method: method.to_string(),
            path: path.clone(),
          });
          continue;
        }
        operations.push(self.build_operation(path, method, item, operation, session)?);
      }
    }

    Ok(operations)
  }

  pub fn build_operation(
    &mut self,
    path: &str,
    method: Method,
    item: &PathItem,
    operation: &document::Operation,
    session: &mut ResolverSession<'_>,
  ) -> Result<Operation> {
    let label = format!("{method} {path}");
    let name = self.claim_name(operation_name(operation.operation_id.as_deref(), &method, path), &label);
    debug!(operation = %name, %label, "building operation");

    let parameters = self.build_parameters(&name, &label, item, operation, session)?;
    let requests = self.build_requests(&name, &label, operation, session)?;
    let responses = self.build_responses(&label, operation, session)?;

    Ok(Operation {
      name,
      operation_id: operation.operation_id.clone(),
      method,
      path: path.to_string(),
      summary: operation.summary.clone(),
      description: operation.description.clone(),
      tags: operation.tags.clone(),
      parameters,
      requests,
      responses,
    })
  }

  pub fn into_warnings(self) -> Vec<GenerationWarning> {
    self.warnings
  }

  /// Registers `name` for `label`. A name already taken is suffixed until it is free.
  fn claim_name(&mut self, name: String, label: &str) -> String {
    let unique = ensure_unique(&name, |candidate| self.names.contains_key(candidate));
    if let Some(first) = self.names.get(&name) {
      self.warnings.push(GenerationWarning::DuplicateOperationName {
        name,
        first: first.clone(),
        second: label.to_string(),
        renamed: unique.clone(),
      });
    }
    self.names.insert(unique.clone(), label.to_string());
    unique
  }

  /// Path-level parameters first; an operation parameter with the same name and location replaces one.
  fn build_parameters(
    &self,
    name: &str,
    label: &str,
    item: &PathItem,
    operation: &document::Operation,
    session: &mut ResolverSession<'_>,
  ) -> Result<Vec<Parameter>> {
    let location = format!("{label}/parameters");
    let mut merged: IndexMap<(&str, ParameterLocation), &document::Parameter> = IndexMap::new();
    for parameter in item.parameters.iter().chain(&operation.parameters) {
      let parameter = resolve_component(
        &self.document.components.parameters,
        ComponentKind::Parameters,
        parameter,
        &location,
      )?;
      merged.insert((parameter.name.as_str(), parameter.location), parameter);
    }

    merged
      .into_values()
      .map(|parameter| {
        let Some(schema) = parameter.schema.as_ref() else {
          return Err(GeneratorError::MissingParameterSchema {
            operation: name.to_string(),
            parameter: parameter.name.clone(),
          });
        };

        let id = session.with_root_scope(format!("{location}/{}", parameter.name), |session| {
          session.resolve(schema, None)
        })?;
        if session.model(id).is_some_and(SchemaModel::is_object) {
          return Err(GeneratorError::InvalidParameterShape {
            operation: name.to_string(),
            parameter: parameter.name.clone(),
          });
        }

        Ok(Parameter {
          name: parameter.name.clone(),
          location: parameter.location,
          required: parameter.required || parameter.location == ParameterLocation::Path,
          description: parameter.description.clone(),
          schema: id,
        })
      })
      .collect()
  }

  fn build_requests(
    &self,
    name: &str,
    label: &str,
    operation: &document::Operation,
    session: &mut ResolverSession<'_>,
  ) -> Result<Vec<Request>> {
    let Some(body) = operation.request_body.as_ref() else {
      return Ok(Vec::new());
    };

    let location = format!("{label}/requestBody");
    let body = resolve_component(
      &self.document.components.request_bodies,
      ComponentKind::RequestBodies,
      body,
      &location,
    )?;

    body
      .content
      .iter()
      .map(|(media_type, media)| {
        let Some(schema) = media.schema.as_ref() else {
          return Err(GeneratorError::MissingBodySchema {
            operation: name.to_string(),
            media_type: media_type.clone(),
          });
        };

        let body = session.with_root_scope(format!("{location}/{media_type}"), |session| {
          session.resolve(schema, None)
        })?;

        Ok(Request {
          media_type: media_type.clone(),
          body,
        })
      })
      .collect()
  }

  fn build_responses(
    &self,
    label: &str,
    operation: &document::Operation,
    session: &mut ResolverSession<'_>,
  ) -> Result<Vec<Response>> {
    let mut responses = Vec::new();

    for (status_code, response) in &operation.responses {
      let location = format!("{label}/responses/{status_code}");
      let response = resolve_component(
        &self.document.components.responses,
        ComponentKind::Responses,
        response,
        &location,
      )?;
      let headers = self.build_headers(&location, response, session)?;

      if response.content.is_empty() {
        responses.push(Response {
          status_code: status_code.clone(),
          content_type: None,
          body: None,
          headers,
        });
        continue;
      }

      for (content_type, media) in &response.content {
        let body = media
          .schema
          .as_ref()
          .map(|schema| {
            session.with_root_scope(format!("{location}/{content_type}"), |session| {
              session.resolve(schema, None)
            })
          })
          .transpose()?;

        responses.push(Response {
          status_code: status_code.clone(),
          content_type: Some(content_type.clone()),
          body,
          headers: headers.clone(),
        });
      }
    }

    Ok(responses)
  }

  /// Headers declared without a schema carry no type and are left out.
  fn build_headers(
    &self,
    location: &str,
    response: &document::Response,
    session: &mut ResolverSession<'_>,
  ) -> Result<IndexMap<String, SchemaId>> {
    let mut headers = IndexMap::with_capacity(response.headers.len());

    for (header_name, header) in &response.headers {
      let header_location = format!("{location}/headers/{header_name}");
      let header = resolve_component(
        &self.document.components.headers,
        ComponentKind::Headers,
        header,
        &header_location,
      )?;
      let Some(schema) = header.schema.as_ref() else {
        continue;
      };
      let id = session.with_root_scope(header_location, |session| session.resolve(schema, None))?;
      headers.insert(header_name.clone(), id);
    }

    Ok(headers)
  }
}

/// Follows `$ref` chains through one component dictionary.
fn resolve_component<'c, T>(
  dictionary: &'c IndexMap<String, ObjectOrReference<T>>,
  kind: ComponentKind,
  item: &'c ObjectOrReference<T>,
  location: &str,
) -> Result<&'c T> {
  let mut current = item;
  let mut seen = HashSet::new();

  loop {
    match current {
      ObjectOrReference::Object(object) => return Ok(object),
      ObjectOrReference::Ref { ref_path } => {
        if !seen.insert(ref_path.as_str()) {
          return Err(GeneratorError::UnresolvableCycle {
            reference: ref_path.clone(),
          });
        }
        current = ComponentRef::parse_as(ref_path, kind)
          .and_then(|name| dictionary.get(&name))
          .ok_or_else(|| GeneratorError::unresolved(ref_path, location))?;
      }
    }
  }
}
