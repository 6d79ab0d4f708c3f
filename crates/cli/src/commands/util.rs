use anyhow::Result;
use serde::Serialize;

use fcg_core::config::{load_tool_config, ConnectionSettings};
use fcg_core::{register_builtin_engines, QueryService};

use crate::canonicalize_or_current;

/// Resolve engine name and parameters for `project` from flags and the
/// project config file.
pub fn connection_settings(
    project: &str,
    engine: Option<&str>,
    solc_version: Option<&str>,
) -> Result<ConnectionSettings> {
    let project_path = canonicalize_or_current(project)?;
    let config = load_tool_config(&project_path)?;
    let settings = config.resolve(&project_path, engine, solc_version);
    tracing::debug!(
        engine = %settings.engine,
        project = %settings.params.project_path.display(),
        "resolved connection settings"
    );
    Ok(settings)
}

/// Build a query service from resolved settings (registers the built-in engines first).
pub fn open_service(settings: &ConnectionSettings) -> Result<QueryService> {
    register_builtin_engines();
    Ok(QueryService::new(&settings.engine, settings.params.clone())?)
}

/// Print `value` as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
