use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use oas3_scaffold::generator::{
  emitter::Visibility,
  orchestrator::{DEFAULT_COMPONENT_PACKAGE, DEFAULT_OPERATION_PACKAGE},
};

use super::colors::{ColorMode, Colors, ThemeMode};

#[derive(Parser, Debug)]
#[command(name = "oas3-scaffold")]
#[command(author, version, about = "OpenAPI to Rust server scaffolding generator")]
#[command(styles = Colors::clap_styles())]
pub struct Cli {
  #[command(subcommand)]
  pub command: Commands,

  /// Control color output
  #[arg(long, value_enum, default_value = "auto", global = true)]
  pub color: ColorMode,

  /// Terminal theme (dark or light background)
  #[arg(long, value_enum, default_value = "auto", global = true)]
  pub theme: ThemeMode,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
  /// List information from an OpenAPI document
  List {
    #[command(subcommand)]
    list_command: ListCommands,
  },
  /// Generate handler traits, data types and a routing table from an OpenAPI document
  Generate(GenerateCommand),
}

impl Commands {
  pub fn is_verbose(&self) -> bool {
    matches!(self, Commands::Generate(command) if command.verbose)
  }
}

#[derive(Args, Debug, Clone)]
pub struct GenerateCommand {
  /// Path to the OpenAPI document (.json, .yaml or .yml)
  #[arg(short, long, value_name = "FILE")]
  pub input: PathBuf,

  /// Directory the generated modules are written to
  #[arg(short, long, value_name = "DIR")]
  pub output: PathBuf,

  /// Visibility level for generated items (public, crate or file)
  #[arg(long, value_name = "VISIBILITY", default_value = "public", value_parser = parse_visibility)]
  pub visibility: Visibility,

  /// Module holding the component types
  #[arg(long, value_name = "NAME", default_value = DEFAULT_COMPONENT_PACKAGE)]
  pub component_package: String,

  /// Module holding the operation types and handler traits
  #[arg(long, value_name = "NAME", default_value = DEFAULT_OPERATION_PACKAGE)]
  pub operation_package: String,

  /// Enable verbose output with detailed progress information
  #[arg(short, long, default_value_t = false)]
  pub verbose: bool,

  /// Suppress non-essential output (errors only)
  #[arg(short, long, default_value_t = false, conflicts_with = "verbose")]
  pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum ListCommands {
  /// List all operations declared in the OpenAPI document
  Operations {
    /// Path to the OpenAPI document (.json, .yaml or .yml)
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,
  },
}

fn parse_visibility(value: &str) -> Result<Visibility, String> {
  Visibility::parse(value).ok_or_else(|| format!("invalid visibility '{value}': expected public, crate or file"))
}

#[cfg(test)]
mod tests {
  use clap::CommandFactory;

  use super::*;

  #[test]
  fn test_cli_definition_is_valid() {
    Cli::command().debug_assert();
  }

  #[test]
  fn test_generate_defaults() -> anyhow::Result<()> {
    let cli = Cli::try_parse_from(["oas3-scaffold", "generate", "-i", "api.yaml", "-o", "out"])?;
    let Commands::Generate(command) = cli.command else {
      anyhow::bail!("expected the generate command");
    };

    assert_eq!(command.input, PathBuf::from("api.yaml"));
    assert_eq!(command.output, PathBuf::from("out"));
    assert_eq!(command.visibility, Visibility::Public);
    assert_eq!(command.component_package, "component");
    assert_eq!(command.operation_package, "operation");
    assert!(!command.verbose);
    assert!(!command.quiet);
    Ok(())
  }

  #[test]
  fn test_generate_overrides() -> anyhow::Result<()> {
    let cli = Cli::try_parse_from([
      "oas3-scaffold",
      "generate",
      "-i",
      "api.json",
      "-o",
      "src/api",
      "--visibility",
      "crate",
      "--component-package",
      "models",
      "--operation-package",
      "handlers",
      "-v",
    ])?;
    assert!(cli.command.is_verbose());

    let Commands::Generate(command) = cli.command else {
      anyhow::bail!("expected the generate command");
    };
    assert_eq!(command.visibility, Visibility::Crate);
    assert_eq!(command.component_package, "models");
    assert_eq!(command.operation_package, "handlers");
    Ok(())
  }

  #[test]
  fn test_invalid_arguments_rejected() {
    let cases: [&[&str]; 3] = [
      &["oas3-scaffold", "generate", "-i", "api.yaml", "-o", "out", "--visibility", "private"],
      &["oas3-scaffold", "generate", "-i", "api.yaml", "-o", "out", "-v", "-q"],
      &["oas3-scaffold", "generate", "-i", "api.yaml"],
    ];
    for args in cases {
      assert!(Cli::try_parse_from(args.iter().copied()).is_err(), "failed for input {args:?}");
    }
  }

  #[test]
  fn test_list_operations() -> anyhow::Result<()> {
    let cli = Cli::try_parse_from(["oas3-scaffold", "list", "operations", "--input", "api.yaml"])?;
    assert!(!cli.command.is_verbose());
    let Commands::List {
      list_command: ListCommands::Operations { input },
    } = cli.command
    else {
      anyhow::bail!("expected the list command");
    };
    assert_eq!(input, PathBuf::from("api.yaml"));
    Ok(())
  }
}
