use std::path::Path;

use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Row, Table};
use oas3_scaffold::{
  document::{Document, SUPPORTED_METHODS, SpecLoader},
  generator::naming::synthesis::operation_name,
};

use crate::ui::{Colors, colors::to_comfy, term_width};

#[derive(Debug, Clone, PartialEq, Eq)]
struct OperationRow {
  name: String,
  method: String,
  path: String,
  supported: bool,
}

/// One row per declared operation, in document order.
fn operation_rows(document: &Document) -> Vec<OperationRow> {
  document
    .operations()
    .map(|(path, method, operation)| OperationRow {
      name: operation_name(operation.operation_id.as_deref(), &method, path),
      supported: SUPPORTED_METHODS.contains(&method),
      method: method.to_string(),
      path: path.to_string(),
    })
    .collect()
}

pub async fn list_operations(input: &Path, colors: &Colors) -> anyhow::Result<()> {
  let document = SpecLoader::open(input).await?.parse()?;

  let mut table = Table::new();
  table
    .load_preset("  ── ──            ")
    .set_content_arrangement(ContentArrangement::Dynamic)
    .set_width(term_width());

  let mut row = Row::new();
  row.add_cell(Cell::new("OPERATION").fg(to_comfy(colors.label())));
  row.add_cell(Cell::new("METHOD").fg(to_comfy(colors.label())));
  row.add_cell(Cell::new("PATH").fg(to_comfy(colors.label())));
  table.set_header(row);

  for operation in operation_rows(&document) {
    let mut row = Row::new();
    let mut name = Cell::new(operation.name).fg(to_comfy(colors.value()));
    name = if operation.supported {
      name.add_attribute(Attribute::Bold)
    } else {
      name.add_attribute(Attribute::CrossedOut)
    };
    row.add_cell(name);
    row.add_cell(
      Cell::new(operation.method)
        .fg(to_comfy(colors.accent()))
        .set_alignment(CellAlignment::Right),
    );
    row.add_cell(Cell::new(operation.path).fg(to_comfy(colors.primary())));
    table.add_row(row);
  }

  println!("{table}");

  Ok(())
}
