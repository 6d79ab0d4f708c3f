#![cfg(feature = "slither-backend")]

mod support;

use std::path::{Path, PathBuf};

use fcg_core::engine::registry::{builtin_registry, register_builtin_engines, EngineRegistration};
use fcg_core::engine::{
    AnalysisBackend, Engine, EngineCapabilities, EngineError, EngineParams, LoadedProject,
};
use fcg_core::model::ProjectModel;
use fcg_core::services::query::{
    format_path, get_function_source, CallGraphFilter, QueryError, QueryService,
};
use tempfile::tempdir;

fn service_for(export: &Path) -> QueryService {
    QueryService::with_registry(&builtin_registry(), "slither-json", EngineParams::new(export))
        .expect("service")
}

#[test]
fn unknown_engine_fails_construction() {
    register_builtin_engines();
    let err = QueryService::new("nonexistent", EngineParams::new(".")).unwrap_err();
    assert!(matches!(err, QueryError::Registry(_)));
    assert_eq!(err.to_string(), "Engine nonexistent is not registered");
}

#[test]
fn rejected_parameters_are_query_errors() {
    let params = EngineParams::new("export.json").with_solc_version("0.8.19");
    let err = QueryService::with_registry(&builtin_registry(), "slither-json", params).unwrap_err();
    assert!(matches!(err, QueryError::Parameters(_)));
    assert!(err.to_string().contains("does not accept provided parameters"));
}

#[test]
fn get_function_source_end_to_end() {
    let temp = tempdir().unwrap();
    let fixture = support::write_fixture(temp.path());
    let service = service_for(&fixture.export_path);
    assert_eq!(service.engine_name(), "slither-json");

    let payload = service.get_function_source("SimpleToken", "transfer(address,uint256)").unwrap();
    assert_eq!(payload.function, "transfer(address,uint256)");
    assert_eq!(payload.contract, "SimpleToken");
    assert!(payload.source.contains("function transfer"));
    assert!(payload.calls.iter().any(|c| c.function.contains("_performTransfer")));
    assert_eq!(payload.metadata["engine"], "slither-json");
    assert_eq!(payload.metadata["solc_version"], "0.8.19");

    let canonical = fixture.sol_path.canonicalize().unwrap().display().to_string();
    assert_eq!(payload.location.as_ref().unwrap().file, canonical);
    assert_eq!(payload.calls[0].file.as_deref(), Some(canonical.as_str()));
    assert!(payload.location.unwrap().file.ends_with("SimpleToken.sol"));
}

#[test]
fn payload_serializes_to_expected_json_shape() {
    let temp = tempdir().unwrap();
    let fixture = support::write_fixture(temp.path());
    let service = service_for(&fixture.export_path);

    let payload = service.get_function_source("Relay", "forward(address,uint256)").unwrap();
    let value = serde_json::to_value(&payload).unwrap();
    assert_eq!(value["function"], "forward(address,uint256)");
    assert_eq!(value["source"], "");
    // The missing file cannot be canonicalized, so the original path is kept.
    assert_eq!(value["location"]["file"], fixture.missing_path.display().to_string());
    assert_eq!(value["calls"][1]["module"], "IOracle");
    assert_eq!(value["calls"][1]["function"], "latest()");
    assert_eq!(
        value["parameter"],
        serde_json::json!([{ "name": "to", "type": "address" }, { "name": "amount", "type": "uint256" }])
    );
    assert!(value["calls"][1].get("file").is_none());
    assert_eq!(value["metadata"]["engine"], "slither-json");
}

#[test]
fn missing_function_names_contract_and_signature() {
    let temp = tempdir().unwrap();
    let fixture = support::write_fixture(temp.path());
    let service = service_for(&fixture.export_path);

    let err = service.get_function_source("SimpleToken", "mint(uint256)").unwrap_err();
    assert_eq!(err.to_string(), "Function mint(uint256) not found in contract SimpleToken");
    let err = service.get_function("Ghost", "transfer(address,uint256)").unwrap_err();
    assert!(matches!(err, QueryError::FunctionNotFound { .. }));
    assert!(matches!(service.get_contract("Ghost"), Err(QueryError::ContractNotFound(_))));
}

#[test]
fn list_contracts_includes_sample() {
    let temp = tempdir().unwrap();
    let fixture = support::write_fixture(temp.path());
    let service = service_for(&fixture.export_path);
    assert!(service.list_contracts().unwrap().contains(&"SimpleToken".to_string()));
}

#[test]
fn call_graph_filtered_by_caller_contract() {
    let temp = tempdir().unwrap();
    let fixture = support::write_fixture(temp.path());
    let service = service_for(&fixture.export_path);

    let edges = service.get_call_graph(Some("SimpleToken"), None).unwrap();
    assert!(!edges.is_empty());
    assert!(edges.iter().all(|e| e.caller.starts_with("SimpleToken.")));
    assert!(edges.iter().any(|e| e.callee.contains("_performTransfer")));
}

#[test]
fn call_graph_filters_are_conjunctive_and_order_preserving() {
    let temp = tempdir().unwrap();
    let fixture = support::write_fixture(temp.path());
    let service = service_for(&fixture.export_path);
    let all: Vec<_> = service.engine().iter_call_graph().unwrap().to_vec();

    let filters = [
        (None, None),
        (Some("Relay"), None),
        (None, Some("transfer(address,uint256)")),
        (Some("Relay"), Some("forward(address,uint256)")),
        (Some("Relay"), Some("transfer(address,uint256)")),
        (Some("Nobody"), None),
    ];
    for (contract, signature) in filters {
        let expected: Vec<_> = all
            .iter()
            .filter(|e| contract.map_or(true, |c| e.caller.contract == c))
            .filter(|e| signature.map_or(true, |s| e.caller.signature == s))
            .cloned()
            .collect();
        let filtered: Vec<_> = service
            .iter_call_graph(CallGraphFilter::new(contract, signature))
            .unwrap()
            .cloned()
            .collect();
        assert_eq!(filtered, expected, "filter {contract:?}/{signature:?}");
    }

    let unfiltered = service.get_call_graph(None, None).unwrap();
    assert_eq!(unfiltered.len(), all.len());
    assert_eq!(unfiltered[0].caller, all[0].caller.display_name());
    assert!(service.get_call_graph(Some("Relay"), Some("transfer(address,uint256)")).unwrap().is_empty());
}

#[test]
fn empty_filter_strings_select_every_edge() {
    let temp = tempdir().unwrap();
    let fixture = support::write_fixture(temp.path());
    let service = service_for(&fixture.export_path);

    let unfiltered = service.get_call_graph(None, None).unwrap();
    assert!(!unfiltered.is_empty());
    assert_eq!(service.get_call_graph(Some(""), None).unwrap(), unfiltered);
    assert_eq!(service.get_call_graph(Some(""), Some("")).unwrap(), unfiltered);
    assert_eq!(CallGraphFilter::new(Some(""), Some("")), CallGraphFilter::default());

    let by_contract = service.get_call_graph(Some("Relay"), Some("")).unwrap();
    assert_eq!(by_contract.len(), 2);
    assert!(by_contract.iter().all(|e| e.caller == "Relay.forward(address,uint256)"));

    let literal = CallGraphFilter { caller_contract: Some(""), caller_signature: None };
    let edge = &service.engine().iter_call_graph().unwrap()[0];
    assert!(literal.matches(edge));
}

struct NoGraphBackend(PathBuf);

impl AnalysisBackend for NoGraphBackend {
    fn name(&self) -> &str {
        "no-graph"
    }

    fn capabilities(&self) -> EngineCapabilities {
        EngineCapabilities { call_graph: false, state_modifiers: true, inheritance_resolution: false }
    }

    fn project_path(&self) -> &Path {
        &self.0
    }

    fn load(&self) -> Result<LoadedProject, EngineError> {
        Ok(LoadedProject::from_model(ProjectModel::new()))
    }
}

#[test]
fn unsupported_call_graph_surfaces_as_query_error() {
    let service =
        QueryService::from_engine("no-graph", Engine::new(Box::new(NoGraphBackend(".".into()))));
    let err = service.get_call_graph(None, None).unwrap_err();
    assert!(matches!(err, QueryError::Engine(EngineError::Unsupported { .. })));
    assert_eq!(err.to_string(), "Engine no-graph does not support call graph generation");
}

#[test]
fn engine_failures_keep_their_message() {
    let temp = tempdir().unwrap();
    let service = service_for(&temp.path().join("absent.json"));
    let err = service.list_contracts().unwrap_err();
    assert!(matches!(err, QueryError::Engine(EngineError::Analysis(_))));
    assert!(err.to_string().starts_with("failed to read Slither export"));
}

#[test]
fn custom_engines_resolve_through_an_explicit_registry() {
    let mut registry = builtin_registry();
    registry
        .register(
            EngineRegistration::new("no-graph", |params: &EngineParams| {
                params.reject_unknown("no-graph", &[])?;
                Ok(Box::new(NoGraphBackend(params.project_path.clone())) as Box<dyn AnalysisBackend>)
            }),
            false,
        )
        .unwrap();
    let service = QueryService::with_registry(&registry, "no-graph", EngineParams::new(".")).unwrap();
    assert!(!service.capabilities().call_graph);
    assert!(service.list_contracts().unwrap().is_empty());
}

#[test]
fn one_shot_helper_uses_global_registry() {
    register_builtin_engines();
    let temp = tempdir().unwrap();
    let fixture = support::write_fixture(temp.path());
    let payload = get_function_source(
        "slither-json",
        EngineParams::new(&fixture.export_path),
        "SimpleToken",
        "balanceOf(address)",
    )
    .unwrap();
    assert_eq!(payload.function, "balanceOf(address)");
}

#[test]
fn format_path_resolves_or_falls_back() {
    let temp = tempdir().unwrap();
    let file = temp.path().join("A.sol");
    std::fs::write(&file, "contract A {}").unwrap();
    let expected = file.canonicalize().unwrap().display().to_string();
    assert_eq!(format_path(&file.display().to_string()), expected);

    assert_eq!(format_path("relative/does/not/exist.sol"), "relative/does/not/exist.sol");
    assert_eq!(format_path(""), "");
}
