use itertools::Itertools;
use tracing::debug;

use super::{
  GenHandler, GenHeader, GenOperation, GenParameter, GenResponse, GenSchema, TypeModelGenerator, collect_declarations,
};
use crate::generator::{
  naming::synthesis::{
    handler_name, parameter_receiver, parameters_type_name, request_body_receiver, response_body_receiver,
    response_header_receiver, response_type_name,
  },
  operations::Operation,
};

impl TypeModelGenerator<'_> {
  /// Lowers every schema an operation touches under `package` and gathers the inline models it needs.
  pub fn lower_operation(&self, operation: &Operation, package: &str) -> GenOperation {
    let name = operation.name.as_str();

    let parameters: Vec<_> = operation
      .parameters
      .iter()
      .map(|parameter| GenParameter {
        name: parameter.name.clone(),
        location: parameter.location,
        required: parameter.required,
        docs: parameter.description.clone(),
        schema: self.lower(parameter.schema, &parameter_receiver(name, &parameter.name), package),
      })
      .collect();

    let handlers: Vec<_> = if operation.requests.is_empty() {
      vec![GenHandler {
        name: handler_name(name, None),
        media_type: None,
        body: None,
      }]
    } else {
      operation
        .requests
        .iter()
        .map(|request| GenHandler {
          name: handler_name(name, Some(&request.media_type)),
          media_type: Some(request.media_type.clone()),
          body: Some(self.lower(
            request.body,
            &request_body_receiver(name, &request.media_type),
            package,
          )),
        })
        .collect()
    };

    let responses: Vec<_> = operation
      .responses
      .iter()
      .map(|response| GenResponse {
        status_code: response.status_code.clone(),
        content_type: response.content_type.clone(),
        body: response.body.map(|body| {
          let receiver = response_body_receiver(name, &response.status_code, response.content_type.as_deref());
          self.lower(body, &receiver, package)
        }),
        headers: response
          .headers
          .iter()
          .map(|(header, &schema)| GenHeader {
            name: header.clone(),
            schema: self.lower(
              schema,
              &response_header_receiver(name, &response.status_code, header),
              package,
            ),
          })
          .collect(),
      })
      .collect();

    let mut lowered = GenOperation::builder()
      .name(name)
      .maybe_operation_id(operation.operation_id.clone())
      .method(operation.method.clone())
      .path(operation.path.clone())
      .package(package)
      .maybe_docs(operation.description.clone().or_else(|| operation.summary.clone()))
      .maybe_parameters_type_name((!parameters.is_empty()).then(|| parameters_type_name(name)))
      .parameters(parameters)
      .handlers(handlers)
      .responses(responses)
      .build();
    lowered.refresh_models();
    debug!(
      operation = %name,
      models = lowered.models.len(),
      handlers = lowered.handlers.len(),
      "lowered operation"
    );
    lowered
  }
}

impl GenOperation {
  /// Parameter, request body, response body and response header schemas, in that order.
  pub fn schemas(&self) -> impl Iterator<Item = &GenSchema> {
    self
      .parameters
      .iter()
      .map(|parameter| &parameter.schema)
      .chain(self.handlers.iter().filter_map(|handler| handler.body.as_ref()))
      .chain(self.responses.iter().flat_map(|response| {
        response
          .body
          .iter()
          .chain(response.headers.iter().map(|header| &header.schema))
      }))
  }

  pub fn schemas_mut(&mut self) -> impl Iterator<Item = &mut GenSchema> {
    self
      .parameters
      .iter_mut()
      .map(|parameter| &mut parameter.schema)
      .chain(self.handlers.iter_mut().filter_map(|handler| handler.body.as_mut()))
      .chain(self.responses.iter_mut().flat_map(|response| {
        let GenResponse { body, headers, .. } = response;
        body.iter_mut().chain(headers.iter_mut().map(|header| &mut header.schema))
      }))
  }

  /// Names of the items rendered for this operation besides its models.
  pub fn item_names(&self) -> Vec<String> {
    self
      .parameters_type_name
      .iter()
      .cloned()
      .chain(std::iter::once(response_type_name(&self.name)))
      .chain(self.handlers.iter().map(|handler| handler.name.clone()))
      .collect()
  }

  /// Recollects the inline models from the current schemas, first declaration of a name wins.
  pub fn refresh_models(&mut self) {
    self.models = self
      .schemas()
      .flat_map(collect_declarations)
      .unique_by(|model| model.declared_type_name.clone())
      .collect();
  }
}
