use std::path::Path;

use thiserror::Error;

use crate::engine::registry::{self, EngineRegistry, RegistryError};
use crate::engine::{Engine, EngineCapabilities, EngineError, EngineParams, ParameterError};
use crate::model::{
    CallGraphEdge, CallGraphRecord, ContractInfo, FunctionIdentifier, FunctionInfo, FunctionPayload,
    ProjectModel,
};

pub const DEFAULT_ENGINE_NAME: &str = "slither";

/// The only error kind emitted at the consumer boundary.
///
/// Lower-level failures are wrapped with their message text intact.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Parameters(#[from] ParameterError),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("Contract {0} not found")]
    ContractNotFound(String),
    #[error("Function {signature} not found in contract {contract}")]
    FunctionNotFound { contract: String, signature: String },
}

/// Optional caller filters for call-graph queries; both apply conjunctively.
/// An empty string filters nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallGraphFilter<'a> {
    pub caller_contract: Option<&'a str>,
    pub caller_signature: Option<&'a str>,
}

impl<'a> CallGraphFilter<'a> {
    pub fn new(caller_contract: Option<&'a str>, caller_signature: Option<&'a str>) -> Self {
        Self {
            caller_contract: active(caller_contract),
            caller_signature: active(caller_signature),
        }
    }

    pub fn matches(&self, edge: &CallGraphEdge) -> bool {
        active(self.caller_contract).map_or(true, |c| edge.caller.contract == c)
            && active(self.caller_signature).map_or(true, |s| edge.caller.signature == s)
    }
}

fn active(filter: Option<&str>) -> Option<&str> {
    filter.filter(|value| !value.is_empty())
}

/// Entrypoint for querying analysis data through a named engine.
#[derive(Debug)]
pub struct QueryService {
    engine_name: String,
    engine: Engine,
}

impl QueryService {
    /// Resolve `engine_name` in the process-wide registry and build the engine.
    pub fn new(engine_name: &str, params: EngineParams) -> Result<Self, QueryError> {
        let registration = registry::resolve_engine(engine_name)?;
        let backend = registration.build(&params)?;
        Ok(Self::from_engine(engine_name, Engine::new(backend)))
    }

    /// Same as [`QueryService::new`] against an explicit registry.
    pub fn with_registry(
        registry: &EngineRegistry,
        engine_name: &str,
        params: EngineParams,
    ) -> Result<Self, QueryError> {
        let backend = registry.get(engine_name)?.build(&params)?;
        Ok(Self::from_engine(engine_name, Engine::new(backend)))
    }

    pub fn from_engine(engine_name: impl Into<String>, engine: Engine) -> Self {
        Self { engine_name: engine_name.into(), engine }
    }

    pub fn engine_name(&self) -> &str {
        &self.engine_name
    }

    pub fn capabilities(&self) -> EngineCapabilities {
        self.engine.capabilities()
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Loaded project; the analysis runs on first use only.
    pub fn project(&self) -> Result<&ProjectModel, QueryError> {
        Ok(self.engine.ensure_loaded()?)
    }

    pub fn list_contracts(&self) -> Result<Vec<String>, QueryError> {
        Ok(self.project()?.contract_names())
    }

    pub fn get_contract(&self, name: &str) -> Result<&ContractInfo, QueryError> {
        self.engine.get_contract(name)?.ok_or_else(|| QueryError::ContractNotFound(name.to_string()))
    }

    pub fn get_function(&self, contract: &str, signature: &str) -> Result<&FunctionInfo, QueryError> {
        let identifier = FunctionIdentifier::new(contract, signature);
        self.engine.get_function(&identifier)?.ok_or_else(|| QueryError::FunctionNotFound {
            contract: contract.to_string(),
            signature: signature.to_string(),
        })
    }

    /// Serialized function plus `metadata` (engine name and engine metadata).
    pub fn get_function_source(
        &self,
        contract: &str,
        signature: &str,
    ) -> Result<FunctionPayload, QueryError> {
        let project = self.project()?;
        let function = self.get_function(contract, signature)?;
        let mut payload = function.to_payload(project, format_path);
        payload.metadata = project.engine_metadata.clone();
        payload.metadata.insert("engine".into(), self.engine_name.clone().into());
        Ok(payload)
    }

    /// Edges matching `filter`, in engine order.
    pub fn iter_call_graph<'s>(
        &'s self,
        filter: CallGraphFilter<'s>,
    ) -> Result<impl Iterator<Item = &'s CallGraphEdge> + 's, QueryError> {
        let edges = self.engine.iter_call_graph()?;
        Ok(edges.iter().filter(move |edge| filter.matches(edge)))
    }

    pub fn get_call_graph(
        &self,
        caller_contract: Option<&str>,
        caller_signature: Option<&str>,
    ) -> Result<Vec<CallGraphRecord>, QueryError> {
        let filter = CallGraphFilter::new(caller_contract, caller_signature);
        let edges = self.engine.iter_call_graph()?;
        Ok(edges.iter().filter(|edge| filter.matches(edge)).map(CallGraphRecord::from).collect())
    }
}

/// Absolute, symlink-resolved form of `raw`; `raw` unchanged when that fails.
pub fn format_path(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }
    match Path::new(raw).canonicalize() {
        Ok(resolved) => resolved.display().to_string(),
        Err(_) => raw.to_string(),
    }
}

/// One-shot helper mirroring [`QueryService::get_function_source`].
pub fn get_function_source(
    engine_name: &str,
    params: EngineParams,
    contract: &str,
    signature: &str,
) -> Result<FunctionPayload, QueryError> {
    QueryService::new(engine_name, params)?.get_function_source(contract, signature)
}
