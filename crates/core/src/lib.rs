//! fcg-core
//!
//! Uniform "function source" and "call graph" queries over Solidity projects.
//!
//! Parsing and analysis are delegated to an external analyzer behind the
//! [`engine::AnalysisBackend`] trait. This crate defines the canonical model
//! backends are normalized into, the engine registry, the Slither adapter,
//! and the [`services::query::QueryService`] facade used by frontends.

pub mod config;
pub mod engine;
pub mod model;
pub mod services;

pub use engine::registry::{register_builtin_engines, EngineRegistry};
pub use engine::{Engine, EngineCapabilities, EngineError, EngineParams};
pub use services::query::{QueryError, QueryService};

/// Returns the library version as encoded at compile time.
///
/// Useful for tests and for frontends to report consistent version info.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
