use std::path::{Path, PathBuf};

use oas3_scaffold::{
  document::{Document, SpecLoader},
  generator::{
    emitter::{Emitter, FileRole, GeneratedFile, RustEmitter},
    errors::GeneratorError,
    lowering::collect_declarations,
    metrics::GenerationWarning,
    operations::OperationBuilder,
    orchestrator::{CompiledApi, GeneratorConfig, Orchestrator},
    resolver::ResolverSession,
    schema::SchemaModel,
  },
};

fn fixture(name: &str) -> PathBuf {
  Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures").join(name)
}

async fn load(name: &str) -> anyhow::Result<Document> {
  SpecLoader::open(&fixture(name)).await?.parse()
}

fn file<'a>(files: &'a [GeneratedFile], role: FileRole) -> anyhow::Result<&'a str> {
  files
    .iter()
    .find(|file| file.role == role)
    .map(|file| file.contents.as_str())
    .ok_or_else(|| anyhow::anyhow!("no {role} file emitted"))
}

fn component_names(api: &CompiledApi) -> Vec<&str> {
  let mut names: Vec<_> = api.components.iter().map(|c| c.declared_type_name.as_str()).collect();
  names.sort_unstable();
  names
}

#[tokio::test]
async fn test_items_document_end_to_end() -> anyhow::Result<()> {
  let document = load("items.json").await?;

  let mut session = ResolverSession::for_document(&document);
  let mut builder = OperationBuilder::new(&document);
  let operations = builder.build_operations(&mut session)?;
  let graph = session.finish()?;

  assert_eq!(operations.len(), 1);
  let operation = &operations[0];
  assert_eq!(operation.name, "CreateItems");
  assert_eq!(operation.requests.len(), 1);
  assert_eq!(operation.responses.len(), 1);

  let item = graph.component("Item").ok_or_else(|| anyhow::anyhow!("Item was not resolved"))?;
  assert_eq!(operation.requests[0].body, item);
  let Some(SchemaModel::Array(collection)) = operation.responses[0].body.and_then(|id| graph.get(id)) else {
    anyhow::bail!("expected a collection response body");
  };
  assert_eq!(collection.items, item);

  let api = Orchestrator::new(document, GeneratorConfig::default()).compile()?;
  assert_eq!(component_names(&api), ["Item"]);
  assert!(api.components[0].is_object());
  assert_eq!(api.components[0].properties.len(), 1);
  Ok(())
}

#[tokio::test]
async fn test_items_document_renders_scaffolding() -> anyhow::Result<()> {
  let config = GeneratorConfig::default();
  let emitter = RustEmitter::new(&config);
  let (files, stats) = Orchestrator::new(load("items.json").await?, config).generate(&emitter)?;

  assert_eq!(stats.operations_converted, 1);
  assert!(file(&files, FileRole::Component)?.contains("pub struct Item {"));
  assert!(file(&files, FileRole::Operation)?.contains("pub trait CreateItemsHandler: Send + Sync"));
  let routes = file(&files, FileRole::Routes)?;
  assert!(routes.contains("method: \"POST\""));
  assert!(routes.contains("path: \"/items\""));
  assert!(file(&files, FileRole::Module)?.contains("//! Items API 0.1.0"));
  Ok(())
}

#[tokio::test]
async fn test_petstore_compiles() -> anyhow::Result<()> {
  let api = Orchestrator::new(load("petstore.yaml").await?, GeneratorConfig::default()).compile()?;

  assert_eq!(
    component_names(&api),
    ["Cat", "Dog", "NewPet", "Owner", "OwnerPets", "Pet", "PetBase"]
  );

  let names: Vec<_> = api.operations.iter().map(|op| op.name.as_str()).collect();
  assert_eq!(names, ["ListPets", "CreatePet", "GetPet"]);
  assert_eq!(api.stats.operations_converted, 3);
  assert_eq!(api.stats.handlers_generated, 3);

  let get_pet = &api.operations[2];
  assert_eq!(get_pet.parameters.len(), 1);
  assert!(get_pet.parameters[0].required);
  assert_eq!(get_pet.responses.len(), 2);
  assert!(get_pet.responses[1].body.is_none());

  let new_pet = api
    .components
    .iter()
    .find(|c| c.declared_type_name == "NewPet")
    .ok_or_else(|| anyhow::anyhow!("NewPet was not declared"))?;
  let properties: Vec<_> = new_pet.properties.iter().map(|p| (p.name.as_str(), p.required)).collect();
  assert_eq!(properties, [("name", true), ("kind", false)]);

  assert_eq!(
    api.stats.cycle_details,
    vec![vec!["Cat".to_string(), "Owner".to_string(), "Pet".to_string()]]
  );
  assert_eq!(
    api.stats.warnings,
    vec![
      GenerationWarning::UnsupportedMethod {
        method: "HEAD".to_string(),
        path: "/pets/{petId}".to_string(),
      },
      GenerationWarning::ReferenceCycle {
        members: "Cat -> Owner -> Pet".to_string(),
      },
    ]
  );
  Ok(())
}

#[tokio::test]
async fn test_petstore_declarations_are_stable() -> anyhow::Result<()> {
  let document = load("petstore.yaml").await?;
  let first = Orchestrator::new(document.clone(), GeneratorConfig::default()).compile()?;
  let second = Orchestrator::new(document, GeneratorConfig::default()).compile()?;

  assert_eq!(first.components, second.components);
  assert_eq!(first.operations, second.operations);

  for component in &first.components {
    let nested = collect_declarations(component);
    assert_eq!(
      nested.first().map(|c| c.declared_type_name.as_str()),
      Some(component.declared_type_name.as_str()),
      "failed for input {:?}",
      component.declared_type_name
    );
  }
  Ok(())
}

#[tokio::test]
async fn test_petstore_renders_with_custom_packages() -> anyhow::Result<()> {
  let config = GeneratorConfig::builder()
    .component_package("models")
    .operation_package("handlers")
    .build();
  let emitter = RustEmitter::new(&config);
  let document = load("petstore.yaml").await?;
  let api = Orchestrator::new(document, config).compile()?;
  let files = emitter.emit(&api)?;

  let paths: Vec<_> = files.iter().map(|f| f.path.display().to_string()).collect();
  assert_eq!(paths, ["models.rs", "handlers.rs", "routes.rs", "mod.rs"]);

  let models = file(&files, FileRole::Component)?;
  assert!(models.contains("pub enum Pet"));
  assert!(models.contains("pub struct NewPet {"));
  assert!(models.contains("pub owner: Option<Box<Owner>>"));
  assert!(models.contains("pub type OwnerPets = Vec<Pet>;"));

  let handlers = file(&files, FileRole::Operation)?;
  assert!(handlers.contains("pub struct GetPetParameters"));
  assert!(handlers.contains("pub pet_id: uuid::Uuid"));
  assert!(handlers.contains("super::models::NewPet"));
  assert!(handlers.contains("pub trait ListPetsHandler: Send + Sync"));

  let routes = file(&files, FileRole::Routes)?;
  assert!(routes.contains("path: \"/pets/{petId}\""));
  assert!(!routes.contains("HEAD"));
  Ok(())
}

#[tokio::test]
async fn test_missing_component_fails_compilation() -> anyhow::Result<()> {
  let mut document = load("items.json").await?;
  document.components.schemas.clear();

  let err = Orchestrator::new(document, GeneratorConfig::default())
    .compile()
    .unwrap_err();
  let Some(GeneratorError::UnresolvedReference { reference, .. }) = err.downcast_ref::<GeneratorError>() else {
    panic!("expected an unresolved reference, got {err}");
  };
  assert_eq!(reference, "#/components/schemas/Item");
  Ok(())
}
