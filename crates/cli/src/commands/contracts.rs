use anyhow::Result;
use serde::Serialize;

use fcg_core::config::ConnectionSettings;

use crate::commands::util::{open_service, print_json};

#[derive(Debug, Serialize)]
pub struct ContractsOutput {
    pub contracts: Vec<String>,
    pub metadata: ContractsMetadata,
}

#[derive(Debug, Serialize)]
pub struct ContractsMetadata {
    pub engine: String,
}

pub fn list_contracts(settings: &ConnectionSettings) -> Result<ContractsOutput> {
    let service = open_service(settings)?;
    Ok(ContractsOutput {
        contracts: service.list_contracts()?,
        metadata: ContractsMetadata { engine: service.engine_name().to_string() },
    })
}

/// List contract names found in the project.
pub fn contracts_command(settings: &ConnectionSettings) -> Result<()> {
    print_json(&list_contracts(settings)?)
}
