mod discriminator;

use serde_json::Value;

use crate::document::Document;

fn schemas(schemas: Value) -> anyhow::Result<Document> {
  Ok(serde_json::from_value(serde_json::json!({
    "openapi": "3.1.0",
    "components": { "schemas": schemas }
  }))?)
}
