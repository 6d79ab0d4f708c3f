use anyhow::Result;
use serde::Serialize;

use fcg_core::config::ConnectionSettings;
use fcg_core::model::CallGraphRecord;

use crate::commands::util::{open_service, print_json};

#[derive(Debug, Serialize)]
pub struct CallGraphOutput {
    pub edges: Vec<CallGraphRecord>,
    pub metadata: CallGraphMetadata,
}

#[derive(Debug, Serialize)]
pub struct CallGraphMetadata {
    pub engine: String,
}

/// Call-graph edges, optionally restricted to one caller contract and/or signature.
pub fn call_graph(
    settings: &ConnectionSettings,
    contract: Option<&str>,
    function: Option<&str>,
) -> Result<CallGraphOutput> {
    let service = open_service(settings)?;
    let edges = service.get_call_graph(contract, function)?;
    tracing::debug!(edges = edges.len(), "call graph filtered");
    Ok(CallGraphOutput {
        edges,
        metadata: CallGraphMetadata { engine: service.engine_name().to_string() },
    })
}

pub fn call_graph_command(
    settings: &ConnectionSettings,
    contract: Option<&str>,
    function: Option<&str>,
) -> Result<()> {
    let output = call_graph(settings, contract, function)?;
    print_json(&output)
}
