use strum::Display;

use crate::generator::lowering::{GenKind, GenOperation, GenSchema};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GenerationStats {
  pub types_generated: usize,
  pub structs_generated: usize,
  pub enums_generated: usize,
  pub type_aliases_generated: usize,
  pub components_resolved: usize,
  pub schemas_resolved: usize,
  pub operations_converted: usize,
  pub handlers_generated: usize,
  pub cycles_detected: usize,
  pub cycle_details: Vec<Vec<String>>,
  pub warnings: Vec<GenerationWarning>,
}

impl GenerationStats {
  pub fn record_struct(&mut self) {
    self.structs_generated += 1;
    self.types_generated += 1;
  }

  pub fn record_enum(&mut self) {
    self.enums_generated += 1;
    self.types_generated += 1;
  }

  pub fn record_type_alias(&mut self) {
    self.type_aliases_generated += 1;
    self.types_generated += 1;
  }

  /// Counts a declaration the way the Rust emitter renders it.
  pub fn record_declaration(&mut self, schema: &GenSchema) {
    if schema.union.is_some() {
      self.record_enum();
      return;
    }
    match schema.kind {
      GenKind::Object => self.record_struct(),
      GenKind::Primitive(_) | GenKind::Collection => self.record_type_alias(),
    }
  }

  pub fn record_declarations<'a>(&mut self, schemas: impl IntoIterator<Item = &'a GenSchema>) {
    for schema in schemas {
      self.record_declaration(schema);
    }
  }

  pub fn record_operation(&mut self, operation: &GenOperation) {
    self.operations_converted += 1;
    self.handlers_generated += operation.handlers.len();
    self.record_declarations(&operation.models);
  }

  pub fn record_operations(&mut self, operations: &[GenOperation]) {
    for operation in operations {
      self.record_operation(operation);
    }
  }

  pub fn record_resolution(&mut self, components: usize, schemas: usize) {
    self.components_resolved += components;
    self.schemas_resolved += schemas;
  }

  pub fn record_cycle(&mut self, cycle: Vec<String>) {
    self.cycles_detected += 1;
    self.warnings.push(GenerationWarning::ReferenceCycle {
      members: cycle.join(" -> "),
    });
    self.cycle_details.push(cycle);
  }

  pub fn record_cycles(&mut self, cycles: Vec<Vec<String>>) {
    for cycle in cycles {
      self.record_cycle(cycle);
    }
  }

  pub fn record_warning(&mut self, warning: GenerationWarning) {
    self.warnings.push(warning);
  }

  pub fn record_warnings(&mut self, warnings: impl IntoIterator<Item = GenerationWarning>) {
    self.warnings.extend(warnings);
  }
}

/// Findings that do not stop generation.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum GenerationWarning {
  #[strum(to_string = "Skipped '{method} {path}': only GET, POST, PUT, PATCH and DELETE are scaffolded")]
  UnsupportedMethod { method: String, path: String },
  #[strum(to_string = "Operation name '{name}' is shared by '{first}' and '{second}', the latter is renamed to '{renamed}'")]
  DuplicateOperationName {
    name: String,
    first: String,
    second: String,
    renamed: String,
  },
  #[strum(to_string = "Components reference each other in a cycle: {members}")]
  ReferenceCycle { members: String },
}

impl GenerationWarning {
  pub fn is_skipped_item(&self) -> bool {
    matches!(self, Self::UnsupportedMethod { .. })
  }
}
