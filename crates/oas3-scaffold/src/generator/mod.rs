pub mod emitter;
pub mod errors;
pub mod lowering;
pub mod metrics;
pub mod naming;
pub mod operations;
pub mod orchestrator;
pub mod resolver;
pub mod schema;
