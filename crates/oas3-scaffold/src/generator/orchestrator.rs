//! One compilation session per document.
//!
//! The [`Orchestrator`] resolves every component, builds the operations through the same resolver
//! session, freezes the graph, reports reference cycles, lowers everything and collects the final
//! declarations. An [`Emitter`] then turns the [`CompiledApi`] into files.
//!
//! ```no_run
//! use oas3_scaffold::{
//!   document::SpecLoader,
//!   generator::{
//!     emitter::RustEmitter,
//!     orchestrator::{GeneratorConfig, Orchestrator},
//!   },
//! };
//!
//! # async fn example() -> anyhow::Result<()> {
//! let document = SpecLoader::open(std::path::Path::new("openapi.yaml")).await?.parse()?;
//! let config = GeneratorConfig::default();
//! let emitter = RustEmitter::new(&config);
//!
//! let (files, stats) = Orchestrator::new(document, config).generate(&emitter)?;
//! println!("{} files, {} types", files.len(), stats.types_generated);
//! # Ok(())
//! # }
//! ```

use std::collections::HashSet;

use tracing::debug;

use crate::{
  document::{Document, Info},
  generator::{
    emitter::{Emitter, GeneratedFile, Visibility},
    lowering::{
      DeclarationRegistry, GenOperation, GenSchema, TypeModelGenerator, box_cyclic_references, collect_declarations,
    },
    metrics::GenerationStats,
    operations::OperationBuilder,
    resolver::ResolverSession,
    schema::{DependencyGraph, SchemaGraph},
  },
};

pub const DEFAULT_COMPONENT_PACKAGE: &str = "component";
pub const DEFAULT_OPERATION_PACKAGE: &str = "operation";

#[derive(Debug, Clone, PartialEq, Eq, bon::Builder)]
pub struct GeneratorConfig {
  #[builder(into, default = DEFAULT_COMPONENT_PACKAGE.to_string())]
  pub component_package: String,
  #[builder(into, default = DEFAULT_OPERATION_PACKAGE.to_string())]
  pub operation_package: String,
  #[builder(default)]
  pub visibility: Visibility,
}

impl Default for GeneratorConfig {
  fn default() -> Self {
    Self::builder().build()
  }
}

/// Everything one document compiles to.
#[derive(Debug, Clone)]
pub struct CompiledApi {
  pub info: Info,
  pub graph: SchemaGraph,
  /// Component declarations followed by the inline models they need.
  pub components: Vec<GenSchema>,
  pub operations: Vec<GenOperation>,
  pub stats: GenerationStats,
}

pub struct Orchestrator {
  document: Document,
  config: GeneratorConfig,
}

impl Orchestrator {
  pub fn new(document: Document, config: GeneratorConfig) -> Self {
    Self { document, config }
  }

  /// Runs the whole pipeline. The first error aborts the compilation.
  pub fn compile(&self) -> anyhow::Result<CompiledApi> {
    let mut stats = GenerationStats::default();

    let mut session = ResolverSession::for_document(&self.document);
    for name in self.document.components.schemas.keys() {
      session.resolve_component(name)?;
    }

    let mut builder = OperationBuilder::new(&self.document);
    let operations = builder.build_operations(&mut session)?;
    stats.record_warnings(builder.into_warnings());

    let graph = session.finish()?;
    let generator = TypeModelGenerator::new(&graph, &self.config.component_package);
    let cycles = DependencyGraph::from_schema_graph(&graph).cycles();
    let cyclic: HashSet<String> = cycles
      .iter()
      .flatten()
      .map(|name| generator.component_type_name(name))
      .collect();
    stats.record_resolution(graph.components().len(), graph.len());
    stats.record_cycles(cycles);

    let mut registry = DeclarationRegistry::new();
    let component_names: Vec<_> = graph.components().into_iter().map(|(name, _)| name).collect();
    for name in &component_names {
      registry.reserve(&self.config.component_package, &generator.component_type_name(name));
    }

    let mut seen = HashSet::new();
    let mut components = Vec::new();
    for name in component_names {
      let Some(mut schema) = generator.lower_component(name) else {
        continue;
      };
      registry.claim(&mut schema);
      for mut declaration in collect_declarations(&schema) {
        if seen.insert(declaration.declared_type_name.clone()) {
          box_cyclic_references(&mut declaration, &cyclic);
          components.push(declaration);
        }
      }
    }

    let mut operations: Vec<_> = operations
      .iter()
      .map(|operation| generator.lower_operation(operation, &self.config.operation_package))
      .collect();
    for operation in &operations {
      registry.reserve_operation(operation);
    }
    let mut declared = HashSet::new();
    for operation in &mut operations {
      for schema in operation.schemas_mut() {
        registry.claim(schema);
      }
      operation.refresh_models();
      operation
        .models
        .retain(|model| declared.insert(model.declared_type_name.clone()));
    }

    stats.record_declarations(&components);
    stats.record_operations(&operations);
    debug!(
      components = components.len(),
      operations = operations.len(),
      cycles = stats.cycles_detected,
      "compiled document"
    );

    Ok(CompiledApi {
      info: self.document.info.clone(),
      graph,
      components,
      operations,
      stats,
    })
  }

  pub fn generate(&self, emitter: &impl Emitter) -> anyhow::Result<(Vec<GeneratedFile>, GenerationStats)> {
    let api = self.compile()?;
    let files = emitter.emit(&api)?;
    Ok((files, api.stats))
  }
}
