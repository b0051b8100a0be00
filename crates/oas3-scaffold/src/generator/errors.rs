use thiserror::Error;

pub type Result<T> = std::result::Result<T, GeneratorError>;

/// Failures that abort a compilation. Nothing is partially emitted once one of these is raised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeneratorError {
  #[error("unresolved reference `{reference}` at {location}")]
  UnresolvedReference { reference: String, location: String },

  #[error("parameter `{parameter}` of operation `{operation}` resolves to an object schema")]
  InvalidParameterShape { operation: String, parameter: String },

  #[error("media type `{media_type}` of operation `{operation}` declares no schema")]
  MissingBodySchema { operation: String, media_type: String },

  #[error("discriminator tag `{tag}` at {location} maps to more than one variant")]
  AmbiguousDiscriminatorMapping { location: String, tag: String },

  #[error("array schema at {location} declares no items")]
  MissingItemsSchema { location: String },

  #[error("parameter `{parameter}` of operation `{operation}` declares no schema")]
  MissingParameterSchema { operation: String, parameter: String },

  #[error("reference `{reference}` expands into itself")]
  UnresolvableCycle { reference: String },

  #[error("schema at {location} was left unresolved by an earlier failure")]
  UnfinishedSchema { location: String },
}

impl GeneratorError {
  pub(crate) fn unresolved(reference: impl Into<String>, location: impl Into<String>) -> Self {
    Self::UnresolvedReference {
      reference: reference.into(),
      location: location.into(),
    }
  }
}
