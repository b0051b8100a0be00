#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::too_many_lines)]
//! Compiles OpenAPI 3.x descriptions into a resolved schema graph, operation descriptors and
//! codegen-ready type models.
//!
//! [`document`] is the input boundary. [`generator::orchestrator::Orchestrator`] runs one compilation
//! per document and hands the result to an [`generator::emitter::Emitter`].

pub mod document;
pub mod generator;
