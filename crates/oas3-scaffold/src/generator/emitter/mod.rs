//! Rendering of lowered descriptors.
//!
//! An [`Emitter`] renders declarations for two roles, component types and operation types, plus the
//! routing table. [`Emitter::emit`] assembles the rendered items into files.

mod fragments;
mod rust;

#[cfg(test)]
mod tests;

use std::path::PathBuf;

use proc_macro2::TokenStream;
use quote::quote;
use strum::Display;

pub use rust::RustEmitter;

use crate::generator::{
  lowering::{GenOperation, GenSchema},
  orchestrator::CompiledApi,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
  #[default]
  Public,
  Crate,
  File,
}

impl Visibility {
  pub fn parse(s: &str) -> Option<Self> {
    match s {
      "public" => Some(Visibility::Public),
      "crate" => Some(Visibility::Crate),
      "file" => Some(Visibility::File),
      _ => None,
    }
  }

  pub(crate) fn to_tokens(self) -> TokenStream {
    match self {
      Visibility::Public => quote! { pub },
      Visibility::Crate => quote! { pub(crate) },
      Visibility::File => quote! {},
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum FileRole {
  Component,
  Operation,
  Routes,
  Module,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
  pub role: FileRole,
  /// Relative to the output directory.
  pub path: PathBuf,
  pub contents: String,
}

pub trait Emitter {
  /// Renders one component declaration.
  fn render_component(&self, schema: &GenSchema) -> anyhow::Result<String>;

  /// Renders everything one operation declares: inline models, parameters, responses and handlers.
  fn render_operation(&self, operation: &GenOperation) -> anyhow::Result<String>;

  fn render_routes(&self, operations: &[GenOperation]) -> anyhow::Result<String>;

  fn render_module(&self, api: &CompiledApi) -> anyhow::Result<String>;

  fn file_path(&self, role: FileRole) -> PathBuf;

  /// Joins the items rendered for one file. The default separates them with a blank line.
  fn assemble(&self, _role: FileRole, _api: &CompiledApi, items: Vec<String>) -> anyhow::Result<String> {
    Ok(items.join("\n"))
  }

  fn emit(&self, api: &CompiledApi) -> anyhow::Result<Vec<GeneratedFile>> {
    let components = api
      .components
      .iter()
      .map(|schema| self.render_component(schema))
      .collect::<anyhow::Result<Vec<_>>>()?;
    let operations = api
      .operations
      .iter()
      .map(|operation| self.render_operation(operation))
      .collect::<anyhow::Result<Vec<_>>>()?;
    let routes = vec![self.render_routes(&api.operations)?];
    let module = vec![self.render_module(api)?];

    [
      (FileRole::Component, components),
      (FileRole::Operation, operations),
      (FileRole::Routes, routes),
      (FileRole::Module, module),
    ]
    .into_iter()
    .map(|(role, items)| {
      Ok(GeneratedFile {
        role,
        path: self.file_path(role),
        contents: self.assemble(role, api, items)?,
      })
    })
    .collect()
  }
}

/// Parses and pretty-prints a token stream as a complete file.
pub(crate) fn format_tokens(tokens: TokenStream) -> anyhow::Result<String> {
  let syntax_tree = syn::parse2(tokens)?;
  Ok(prettyplease::unparse(&syntax_tree))
}
