//! Engine contract shared by every analyzer backend.
//!
//! A backend only knows how to analyze a project once and hand back a
//! [`LoadedProject`]. [`Engine`] wraps a backend with the lazy, at-most-once
//! load cache and the capability-gated lookups the query layer relies on.

pub mod registry;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{CallGraphEdge, ContractInfo, FunctionIdentifier, FunctionInfo, ProjectModel};

/// Parameter key carrying the compiler-version hint.
pub const SOLC_VERSION_PARAM: &str = "solc_version";

/// Optional features a backend may support.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineCapabilities {
    pub call_graph: bool,
    pub state_modifiers: bool,
    pub inheritance_resolution: bool,
}

impl EngineCapabilities {
    pub fn all() -> Self {
        Self { call_graph: true, state_modifiers: true, inheritance_resolution: true }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The analyzer (or something it needs) could not be invoked.
    #[error("{0}")]
    Unavailable(String),
    /// The analyzer ran but failed (compiler error, unsupported version, bad output).
    #[error("{0}")]
    Analysis(String),
    #[error("Engine {engine} does not support {capability}")]
    Unsupported { engine: String, capability: &'static str },
}

/// Raised by an engine factory when it rejects its construction parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Engine {engine} does not accept provided parameters: {message}")]
pub struct ParameterError {
    pub engine: String,
    pub message: String,
}

/// Construction input for a backend: project path plus keyword options.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EngineParams {
    pub project_path: PathBuf,
    pub options: BTreeMap<String, String>,
}

impl EngineParams {
    pub fn new(project_path: impl Into<PathBuf>) -> Self {
        Self { project_path: project_path.into(), options: BTreeMap::new() }
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    pub fn with_solc_version(self, version: impl Into<String>) -> Self {
        self.with_option(SOLC_VERSION_PARAM, version)
    }

    pub fn option(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }

    pub fn solc_version(&self) -> Option<&str> {
        self.option(SOLC_VERSION_PARAM)
    }

    /// Fail on the first option key not in `accepted`.
    pub fn reject_unknown(&self, engine: &str, accepted: &[&str]) -> Result<(), ParameterError> {
        match self.options.keys().find(|key| !accepted.contains(&key.as_str())) {
            Some(key) => Err(ParameterError {
                engine: engine.to_string(),
                message: format!("unexpected parameter '{key}'"),
            }),
            None => Ok(()),
        }
    }
}

/// Result of one successful backend analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedProject {
    pub model: ProjectModel,
    pub call_graph: Vec<CallGraphEdge>,
}

impl LoadedProject {
    /// Derive the call graph from a fully registered model.
    pub fn from_model(model: ProjectModel) -> Self {
        let call_graph = model.collect_call_edges();
        Self { model, call_graph }
    }
}

/// Trait implemented by analyzer backends (e.g., Slither).
pub trait AnalysisBackend: Send + Sync {
    fn name(&self) -> &str;

    fn capabilities(&self) -> EngineCapabilities;

    fn project_path(&self) -> &Path;

    /// Run the analysis. All-or-nothing: either a complete project or an error.
    fn load(&self) -> Result<LoadedProject, EngineError>;
}

/// A backend plus its load cache.
pub struct Engine {
    backend: Box<dyn AnalysisBackend>,
    loaded: OnceCell<LoadedProject>,
}

impl Engine {
    pub fn new(backend: Box<dyn AnalysisBackend>) -> Self {
        Self { backend, loaded: OnceCell::new() }
    }

    pub fn name(&self) -> &str {
        self.backend.name()
    }

    pub fn capabilities(&self) -> EngineCapabilities {
        self.backend.capabilities()
    }

    pub fn project_path(&self) -> &Path {
        self.backend.project_path()
    }

    /// Run the backend analysis without touching the cache.
    pub fn load(&self) -> Result<LoadedProject, EngineError> {
        self.backend.load()
    }

    /// Load at most once per engine; later calls return the cached model.
    ///
    /// Concurrent callers block until the first load finishes. A failed load
    /// leaves the cache empty.
    pub fn ensure_loaded(&self) -> Result<&ProjectModel, EngineError> {
        Ok(&self.loaded_project()?.model)
    }

    fn loaded_project(&self) -> Result<&LoadedProject, EngineError> {
        self.loaded.get_or_try_init(|| {
            tracing::debug!(
                engine = self.name(),
                project = %self.project_path().display(),
                "loading project"
            );
            let loaded = self.backend.load()?;
            tracing::info!(
                engine = self.name(),
                contracts = loaded.model.contracts.len(),
                edges = loaded.call_graph.len(),
                "project loaded"
            );
            Ok(loaded)
        })
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.get().is_some()
    }

    pub fn get_contract(&self, name: &str) -> Result<Option<&ContractInfo>, EngineError> {
        Ok(self.ensure_loaded()?.get_contract(name))
    }

    pub fn get_function(
        &self,
        identifier: &FunctionIdentifier,
    ) -> Result<Option<&FunctionInfo>, EngineError> {
        Ok(self.ensure_loaded()?.get_function(identifier))
    }

    pub fn iter_contracts(&self) -> Result<impl Iterator<Item = &ContractInfo>, EngineError> {
        Ok(self.ensure_loaded()?.iter_contracts())
    }

    /// Precomputed call-graph edges in backend order.
    pub fn iter_call_graph(&self) -> Result<&[CallGraphEdge], EngineError> {
        if !self.capabilities().call_graph {
            return Err(EngineError::Unsupported {
                engine: self.name().to_string(),
                capability: "call graph generation",
            });
        }
        Ok(&self.loaded_project()?.call_graph)
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("name", &self.name())
            .field("project_path", &self.project_path())
            .field("loaded", &self.is_loaded())
            .finish()
    }
}
