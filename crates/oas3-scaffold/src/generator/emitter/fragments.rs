use proc_macro2::TokenStream;
use quote::{ToTokens, format_ident, quote};

use super::Visibility;
use crate::generator::{
  lowering::{GenHandler, GenOperation, GenResponse, GenSchema, GenUnion, GenVariant},
  naming::{
    identifiers::{to_rust_field_name, to_rust_type_name},
    synthesis::{media_type_title, response_type_name, status_title},
  },
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(super) struct Documentation {
  lines: Vec<String>,
}

impl Documentation {
  pub(super) fn from_optional(text: Option<&str>) -> Self {
    text.map_or_else(Self::default, |text| Self::from_lines(text.lines()))
  }

  pub(super) fn from_lines(lines: impl IntoIterator<Item = impl Into<String>>) -> Self {
    Self {
      lines: lines.into_iter().map(Into::into).collect(),
    }
  }

  pub(super) fn push(&mut self, line: impl Into<String>) {
    self.lines.push(line.into());
  }

  fn extend_text(&mut self, text: &str) {
    self.lines.extend(text.lines().map(String::from));
  }
}

impl ToTokens for Documentation {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let doc_lines = self.lines.iter().map(|line| {
      let line = format!(" {}", line.trim_end());
      quote! { #[doc = #line] }
    });
    quote! { #(#doc_lines)* }.to_tokens(tokens);
  }
}

pub(super) fn type_ident(name: &str) -> syn::Ident {
  format_ident!("{}", to_rust_type_name(name))
}

pub(super) fn field_ident(name: &str) -> syn::Ident {
  format_ident!("{}", to_rust_field_name(name))
}

fn derives() -> TokenStream {
  quote! { #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)] }
}

/// Type expression for `schema` as seen from a file rendering `package`.
pub(super) struct TypeExpr<'a> {
  schema: &'a GenSchema,
  package: &'a str,
}

impl<'a> TypeExpr<'a> {
  pub(super) fn new(schema: &'a GenSchema, package: &'a str) -> Self {
    Self { schema, package }
  }
}

impl ToTokens for TypeExpr<'_> {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let schema = self.schema;
    let name = type_ident(&schema.declared_type_name);

    let base = if schema.is_externally_defined && schema.package != self.package {
      let package = field_ident(&schema.package);
      quote! { super::#package::#name }
    } else if schema.is_externally_defined || schema.needs_declaration() {
      quote! { #name }
    } else {
      let scalar = schema.scalar().map(|scalar| scalar.to_string()).unwrap_or_default();
      scalar.parse().unwrap_or_else(|_| quote! { serde_json::Value })
    };

    if schema.boxed {
      quote! { Box<#base> }.to_tokens(tokens);
    } else {
      base.to_tokens(tokens);
    }
  }
}

/// Named field of a struct or struct-like variant.
pub(super) struct FieldFragment<'a> {
  pub(super) name: &'a str,
  pub(super) required: bool,
  pub(super) docs: Option<&'a str>,
  pub(super) schema: &'a GenSchema,
  pub(super) package: &'a str,
  pub(super) vis: Option<Visibility>,
  pub(super) serde: bool,
}

impl ToTokens for FieldFragment<'_> {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let ident = field_ident(self.name);
    let docs = Documentation::from_optional(self.docs);
    let vis = self.vis.map(Visibility::to_tokens);
    let ty = TypeExpr::new(self.schema, self.package);
    let optional = !self.required || self.schema.nullable;

    let rename = (self.serde && ident.to_string().trim_start_matches("r#") != self.name).then(|| {
      let name = self.name;
      quote! { #[serde(rename = #name)] }
    });
    let skip = (self.serde && optional).then(|| {
      quote! { #[serde(default, skip_serializing_if = "Option::is_none")] }
    });
    let ty = if optional { quote! { Option<#ty> } } else { quote! { #ty } };

    tokens.extend(quote! {
      #docs
      #rename
      #skip
      #vis #ident: #ty
    });
  }
}

/// Top-level declaration of a lowered schema: a struct, an enum or a type alias.
pub(super) struct DeclarationFragment<'a> {
  schema: &'a GenSchema,
  vis: Visibility,
}

impl<'a> DeclarationFragment<'a> {
  pub(super) fn new(schema: &'a GenSchema, vis: Visibility) -> Self {
    Self { schema, vis }
  }
}

impl ToTokens for DeclarationFragment<'_> {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let schema = self.schema;
    let package = schema.package.as_str();
    let name = type_ident(&schema.declared_type_name);
    let docs = Documentation::from_optional(schema.docs.as_deref());
    let vis = self.vis.to_tokens();

    if let Some(union) = &schema.union {
      UnionFragment {
        name: &schema.declared_type_name,
        receiver: &schema.receiver_name,
        union,
        package,
        vis: self.vis,
        docs,
      }
      .to_tokens(tokens);
      return;
    }

    if schema.is_object() {
      let derives = derives();
      let fields = schema.properties.iter().map(|property| FieldFragment {
        name: &property.name,
        required: property.required,
        docs: property.schema.docs.as_deref(),
        schema: &property.schema,
        package,
        vis: Some(self.vis),
        serde: true,
      });
      tokens.extend(quote! {
        #docs
        #derives
        #vis struct #name {
          #(#fields),*
        }
      });
      return;
    }

    let target = match schema.items.as_deref() {
      Some(items) => {
        let items = TypeExpr::new(items, package);
        quote! { Vec<#items> }
      }
      None => {
        let scalar = schema.scalar().map(|scalar| scalar.to_string()).unwrap_or_default();
        scalar.parse().unwrap_or_else(|_| quote! { serde_json::Value })
      }
    };
    tokens.extend(quote! {
      #docs
      #vis type #name = #target;
    });
  }
}

struct UnionFragment<'a> {
  name: &'a str,
  receiver: &'a str,
  union: &'a GenUnion,
  package: &'a str,
  vis: Visibility,
  docs: Documentation,
}

impl UnionFragment<'_> {
  /// Internally tagged only when every variant is a tagged object.
  fn is_tagged(&self) -> bool {
    self.union.property_name.is_some()
      && self
        .union
        .variants
        .iter()
        .all(|variant| variant.tag.is_some() && variant.schema.is_object() && !variant.schema.boxed)
  }

  fn variant_ident(&self, variant: &GenVariant) -> syn::Ident {
    let declared = variant.schema.declared_type_name.as_str();
    let short = match variant.schema.receiver_name.strip_prefix(self.receiver) {
      Some(rest) if !variant.schema.is_externally_defined && !rest.is_empty() => rest,
      _ => declared,
    };
    type_ident(short)
  }
}

impl ToTokens for UnionFragment<'_> {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let name = type_ident(self.name);
    let docs = &self.docs;
    let vis = self.vis.to_tokens();
    let derives = derives();
    let tagged = self.is_tagged();

    let serde = match (&self.union.property_name, tagged) {
      (Some(property), true) => quote! { #[serde(tag = #property)] },
      _ => quote! { #[serde(untagged)] },
    };

    let variants = self.union.variants.iter().map(|variant| {
      let ident = self.variant_ident(variant);
      let ty = TypeExpr::new(&variant.schema, self.package);
      let rename = variant
        .tag
        .as_deref()
        .filter(|_| tagged)
        .map(|tag| quote! { #[serde(rename = #tag)] });
      quote! {
        #rename
        #ident(#ty)
      }
    });

    tokens.extend(quote! {
      #docs
      #derives
      #serde
      #vis enum #name {
        #(#variants),*
      }
    });
  }
}

/// Aggregate of an operation's path, query, header and cookie parameters.
pub(super) struct ParametersFragment<'a> {
  pub(super) operation: &'a GenOperation,
  pub(super) vis: Visibility,
}

impl ToTokens for ParametersFragment<'_> {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let Some(type_name) = self.operation.parameters_type_name.as_deref() else {
      return;
    };
    let name = type_ident(type_name);
    let vis = self.vis.to_tokens();
    let derives = derives();
    let docs = Documentation::from_lines([format!(
      "Parameters of `{} {}`.",
      self.operation.method, self.operation.path
    )]);

    let fields = self.operation.parameters.iter().map(|parameter| {
      let mut docs = Documentation::from_lines([format!("`{}` {} parameter.", parameter.name, parameter.location)]);
      if let Some(text) = parameter.docs.as_deref() {
        docs.push("");
        docs.extend_text(text);
      }
      let field = FieldFragment {
        name: &parameter.name,
        required: parameter.required,
        docs: None,
        schema: &parameter.schema,
        package: &self.operation.package,
        vis: Some(self.vis),
        serde: true,
      };
      quote! {
        #docs
        #field
      }
    });

    tokens.extend(quote! {
      #docs
      #derives
      #vis struct #name {
        #(#fields),*
      }
    });
  }
}

fn response_variant_ident(response: &GenResponse) -> syn::Ident {
  let media = response.content_type.as_deref().map(media_type_title).unwrap_or_default();
  type_ident(&format!("Status{}{media}", status_title(&response.status_code)))
}

/// One variant per declared status code and content type.
pub(super) struct ResponseEnumFragment<'a> {
  pub(super) operation: &'a GenOperation,
  pub(super) vis: Visibility,
}

impl ToTokens for ResponseEnumFragment<'_> {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let name = type_ident(&response_type_name(&self.operation.name));
    let vis = self.vis.to_tokens();
    let package = self.operation.package.as_str();
    let docs = Documentation::from_lines([format!(
      "Responses of `{} {}`.",
      self.operation.method, self.operation.path
    )]);

    let variants = self.operation.responses.iter().map(|response| {
      let ident = response_variant_ident(response);
      let docs = Documentation::from_lines([match response.content_type.as_deref() {
        Some(content_type) => format!("{} `{content_type}`", response.status_code),
        None => response.status_code.clone(),
      }]);

      let body = response.body.as_ref().map(|body| FieldFragment {
        name: "body",
        required: true,
        docs: None,
        schema: body,
        package,
        vis: None,
        serde: false,
      });
      let headers = response.headers.iter().map(|header| FieldFragment {
        name: &header.name,
        required: false,
        docs: None,
        schema: &header.schema,
        package,
        vis: None,
        serde: false,
      });
      let fields: Vec<_> = body
        .into_iter()
        .map(|field| field.into_token_stream())
        .chain(headers.map(|field| field.into_token_stream()))
        .collect();

      if fields.is_empty() {
        quote! {
          #docs
          #ident
        }
      } else {
        quote! {
          #docs
          #ident { #(#fields),* }
        }
      }
    });

    tokens.extend(quote! {
      #docs
      #[derive(Debug, Clone, PartialEq)]
      #vis enum #name {
        #(#variants),*
      }
    });
  }
}

/// Trait a server implements to handle one operation for one request media type.
pub(super) struct HandlerTraitFragment<'a> {
  pub(super) operation: &'a GenOperation,
  pub(super) handler: &'a GenHandler,
  pub(super) vis: Visibility,
}

impl ToTokens for HandlerTraitFragment<'_> {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let operation = self.operation;
    let name = type_ident(&self.handler.name);
    let vis = self.vis.to_tokens();
    let response = type_ident(&response_type_name(&operation.name));

    let mut docs = Documentation::from_lines([match self.handler.media_type.as_deref() {
      Some(media_type) => format!("Handles `{} {}` with a `{media_type}` body.", operation.method, operation.path),
      None => format!("Handles `{} {}`.", operation.method, operation.path),
    }]);
    if let Some(text) = operation.docs.as_deref() {
      docs.push("");
      docs.extend_text(text);
    }

    let parameters = operation.parameters_type_name.as_deref().map(|type_name| {
      let ty = type_ident(type_name);
      quote! { parameters: #ty, }
    });
    let body = self.handler.body.as_ref().map(|body| {
      let ty = TypeExpr::new(body, &operation.package);
      quote! { body: #ty, }
    });

    tokens.extend(quote! {
      #docs
      #vis trait #name: Send + Sync {
        fn handle(&self, #parameters #body) -> impl std::future::Future<Output = anyhow::Result<#response>> + Send;
      }
    });
  }
}

/// Static routing table: one entry per operation, listing its handler traits.
pub(super) struct RoutesFragment<'a> {
  pub(super) operations: &'a [GenOperation],
  pub(super) vis: Visibility,
}

impl ToTokens for RoutesFragment<'_> {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let vis = self.vis.to_tokens();

    let routes = self.operations.iter().map(|operation| {
      let method = operation.method.as_str();
      let path = operation.path.as_str();
      let name = operation.name.as_str();
      let handlers = operation.handlers.iter().map(|handler| handler.name.as_str());
      quote! {
        Route {
          method: #method,
          path: #path,
          operation: #name,
          handlers: &[#(#handlers),*],
        }
      }
    });

    tokens.extend(quote! {
      #[derive(Debug, Clone, Copy, PartialEq, Eq)]
      #vis struct Route {
        #vis method: &'static str,
        #vis path: &'static str,
        #vis operation: &'static str,
        #vis handlers: &'static [&'static str],
      }

      #vis const ROUTES: &[Route] = &[
        #(#routes),*
      ];
    });
  }
}
