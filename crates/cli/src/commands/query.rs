use anyhow::Result;

use fcg_core::config::ConnectionSettings;
use fcg_core::model::FunctionPayload;

use crate::commands::util::{open_service, print_json};

/// Source, location and outgoing calls of one function.
pub fn function_source(
    settings: &ConnectionSettings,
    contract: &str,
    function: &str,
) -> Result<FunctionPayload> {
    let service = open_service(settings)?;
    Ok(service.get_function_source(contract, function)?)
}

pub fn query_command(settings: &ConnectionSettings, contract: &str, function: &str) -> Result<()> {
    let payload = function_source(settings, contract, function)?;
    print_json(&payload)
}
