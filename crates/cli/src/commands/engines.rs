use anyhow::Result;

use fcg_core::engine::registry::{global_registry, EngineInfo};
use fcg_core::register_builtin_engines;

use crate::commands::util::print_json;

/// Engines known to this binary, sorted by name.
pub fn list_engines() -> Vec<EngineInfo> {
    register_builtin_engines();
    global_registry().registrations().into_iter().map(|r| r.info()).collect()
}

pub fn engines_command() -> Result<()> {
    print_json(&list_engines())
}
