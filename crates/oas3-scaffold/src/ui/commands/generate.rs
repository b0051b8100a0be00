use std::path::PathBuf;

use chrono::{Local, Timelike};
use crossterm::style::Stylize;
use oas3_scaffold::{
  document::{Document, SpecLoader},
  generator::{
    emitter::{GeneratedFile, RustEmitter},
    metrics::GenerationStats,
    orchestrator::{GeneratorConfig, Orchestrator},
  },
};

use crate::ui::{Colors, GenerateCommand};

fn format_timestamp() -> String {
  let now = Local::now();
  format!("[{:02}:{:02}:{:02}]", now.hour(), now.minute(), now.second())
}

#[derive(Debug, Clone)]
pub struct GenerateConfig {
  pub input: PathBuf,
  pub output: PathBuf,
  pub generator: GeneratorConfig,
  pub verbose: bool,
  pub quiet: bool,
}

impl GenerateConfig {
  pub fn from_command(command: GenerateCommand) -> anyhow::Result<Self> {
    let GenerateCommand {
      input,
      output,
      visibility,
      component_package,
      operation_package,
      verbose,
      quiet,
    } = command;

    if component_package == operation_package {
      anyhow::bail!("Component and operation packages must differ, both are '{component_package}'");
    }

    let generator = GeneratorConfig::builder()
      .component_package(component_package)
      .operation_package(operation_package)
      .visibility(visibility)
      .build();

    Ok(Self {
      input,
      output,
      generator,
      verbose,
      quiet,
    })
  }

  async fn load_document(&self) -> anyhow::Result<Document> {
    SpecLoader::open(&self.input).await?.parse()
  }

  async fn write_files(&self, files: &[GeneratedFile]) -> anyhow::Result<Vec<PathBuf>> {
    tokio::fs::create_dir_all(&self.output).await?;
    let mut written = Vec::with_capacity(files.len());
    for file in files {
      let path = self.output.join(&file.path);
      tokio::fs::write(&path, &file.contents).await?;
      written.push(path);
    }
    Ok(written)
  }
}

struct GenerateLogger<'a> {
  config: &'a GenerateConfig,
  colors: &'a Colors,
}

impl<'a> GenerateLogger<'a> {
  fn new(config: &'a GenerateConfig, colors: &'a Colors) -> Self {
    Self { config, colors }
  }

  fn info(&self, message: &str) {
    if !self.config.quiet {
      println!("{} {message}", format_timestamp().with(self.colors.timestamp()));
    }
  }

  fn stat(&self, label: &str, value: String) {
    if !self.config.quiet {
      println!(
        "            {:<25} {}",
        label.with(self.colors.label()),
        value.with(self.colors.value())
      );
    }
  }

  fn log_loading(&self) {
    self.info(
      &format!("Loading OpenAPI document from: {}", self.config.input.display())
        .with(self.colors.primary())
        .to_string(),
    );
  }

  fn log_generating(&self, document: &Document) {
    let message = if document.info.title.is_empty() {
      "Generating Rust scaffolding...".to_string()
    } else {
      format!(
        "Generating Rust scaffolding for {} {}...",
        document.info.title, document.info.version
      )
    };
    self.info(&message.with(self.colors.primary()).to_string());
  }

  fn print_statistics(&self, stats: &GenerationStats) {
    if self.config.quiet {
      return;
    }

    self.stat("Components resolved:", stats.components_resolved.to_string());
    if self.config.verbose {
      self.stat("", format!("{} schemas in graph", stats.schemas_resolved));
    }
    self.stat("Types generated:", stats.types_generated.to_string());
    self.stat("", format!("{} structs", stats.structs_generated));
    self.stat("", format!("{} enums", stats.enums_generated));
    self.stat("", format!("{} type aliases", stats.type_aliases_generated));
    self.stat("Operations converted:", stats.operations_converted.to_string());
    self.stat("Handlers generated:", stats.handlers_generated.to_string());
    if !stats.warnings.is_empty() {
      self.stat("Warnings:", stats.warnings.len().to_string());
    }

    self.print_cycles(stats);
    self.print_warnings(stats);
  }

  fn print_cycles(&self, stats: &GenerationStats) {
    if stats.cycles_detected == 0 {
      return;
    }

    self.stat("Cycles:", stats.cycles_detected.to_string());

    if self.config.verbose {
      for (i, cycle) in stats.cycle_details.iter().enumerate() {
        println!(
          "              {}: {}",
          format!("Cycle {}", i + 1).with(self.colors.accent()),
          cycle.join(" -> ").with(self.colors.info())
        );
      }
    }
  }

  fn print_warnings(&self, stats: &GenerationStats) {
    if stats.warnings.is_empty() || self.config.quiet {
      return;
    }

    let mut printed_header = false;
    for warning in &stats.warnings {
      if !warning.is_skipped_item() && !self.config.verbose {
        continue;
      }

      if !printed_header {
        println!();
        printed_header = true;
      }

      let prefix = if warning.is_skipped_item() { "Skipped:" } else { "Warning:" };
      eprintln!(
        "{} {}",
        prefix.with(self.colors.accent()),
        warning.to_string().with(self.colors.primary())
      );
    }
  }

  fn log_writing(&self) {
    self.info(
      &format!("Writing to: {}", self.config.output.display())
        .with(self.colors.primary())
        .to_string(),
    );
  }

  fn log_written(&self, paths: &[PathBuf]) {
    if self.config.verbose {
      for path in paths {
        self.stat("", path.display().to_string());
      }
    }
  }

  fn log_success(&self) {
    if !self.config.quiet {
      println!();
      println!(
        "{} {}",
        format_timestamp().with(self.colors.timestamp()),
        "Successfully generated Rust scaffolding".with(self.colors.success())
      );
    }
  }
}

pub async fn generate_code(config: GenerateConfig, colors: &Colors) -> anyhow::Result<()> {
  let logger = GenerateLogger::new(&config, colors);

  logger.log_loading();
  let document = config.load_document().await?;

  logger.log_generating(&document);
  let emitter = RustEmitter::new(&config.generator);
  let (files, stats) = Orchestrator::new(document, config.generator.clone()).generate(&emitter)?;
  logger.print_statistics(&stats);

  logger.log_writing();
  let written = config.write_files(&files).await?;
  logger.log_written(&written);

  logger.log_success();
  Ok(())
}
