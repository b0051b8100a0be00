use std::path::PathBuf;

use quote::quote;

use super::{
  Emitter, FileRole, Visibility, format_tokens,
  fragments::{
    DeclarationFragment, HandlerTraitFragment, ParametersFragment, ResponseEnumFragment, RoutesFragment, field_ident,
  },
};
use crate::generator::{
  lowering::{GenOperation, GenSchema},
  orchestrator::{CompiledApi, GeneratorConfig},
};

/// Renders descriptors as Rust modules: serde data types, handler traits and a routing table.
#[derive(Debug, Clone)]
pub struct RustEmitter {
  visibility: Visibility,
  component_package: String,
  operation_package: String,
}

impl RustEmitter {
  pub fn new(config: &GeneratorConfig) -> Self {
    Self {
      visibility: config.visibility,
      component_package: config.component_package.clone(),
      operation_package: config.operation_package.clone(),
    }
  }

  fn module_name(&self, role: FileRole) -> String {
    match role {
      FileRole::Component => field_ident(&self.component_package).to_string(),
      FileRole::Operation => field_ident(&self.operation_package).to_string(),
      FileRole::Routes => "routes".to_string(),
      FileRole::Module => "mod".to_string(),
    }
  }
}

impl Emitter for RustEmitter {
  fn render_component(&self, schema: &GenSchema) -> anyhow::Result<String> {
    let declaration = DeclarationFragment::new(schema, self.visibility);
    format_tokens(quote! { #declaration })
  }

  fn render_operation(&self, operation: &GenOperation) -> anyhow::Result<String> {
    let vis = self.visibility;
    let models = operation
      .models
      .iter()
      .map(|schema| DeclarationFragment::new(schema, vis));
    let parameters = ParametersFragment { operation, vis };
    let responses = ResponseEnumFragment { operation, vis };
    let handlers = operation
      .handlers
      .iter()
      .map(|handler| HandlerTraitFragment { operation, handler, vis });

    format_tokens(quote! {
      #(#models)*
      #parameters
      #responses
      #(#handlers)*
    })
  }

  fn render_routes(&self, operations: &[GenOperation]) -> anyhow::Result<String> {
    let routes = RoutesFragment {
      operations,
      vis: self.visibility,
    };
    format_tokens(quote! { #routes })
  }

  fn render_module(&self, _api: &CompiledApi) -> anyhow::Result<String> {
    let vis = self.visibility.to_tokens();
    let component = field_ident(&self.component_package);
    let operation = field_ident(&self.operation_package);

    format_tokens(quote! {
      #vis mod #component;
      #vis mod #operation;
      #vis mod routes;
    })
  }

  fn file_path(&self, role: FileRole) -> PathBuf {
    PathBuf::from(format!("{}.rs", self.module_name(role)))
  }

  fn assemble(&self, role: FileRole, api: &CompiledApi, items: Vec<String>) -> anyhow::Result<String> {
    let mut header = format!(
      "//! AUTO-GENERATED CODE - DO NOT EDIT!\n//!\n//! {} {}\n",
      api.info.title, api.info.version
    );
    if role == FileRole::Module
      && let Some(description) = api.info.description.as_deref()
    {
      header.push_str("//!\n");
      for line in description.lines() {
        header.push_str(format!("//! {line}").trim_end());
        header.push('\n');
      }
    }

    let prelude = match role {
      FileRole::Component | FileRole::Operation => {
        "#![allow(unused_imports)]\n\nuse serde::{Deserialize, Serialize};\n"
      }
      FileRole::Routes | FileRole::Module => "",
    };

    Ok(format!("{header}{prelude}\n{}", items.join("\n")))
  }
}
