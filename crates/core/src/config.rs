//! Optional per-project configuration.
//!
//! Looked up next to the project (the project directory, or the parent
//! directory when the project path is a file) as `.solidity-fcg.json`,
//! `.solidity-fcg.yaml` or `.solidity-fcg.yml`. Command-line flags win over
//! the file, the file wins over built-in defaults.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::engine::EngineParams;
use crate::services::query::DEFAULT_ENGINE_NAME;

pub const CONFIG_FILE_NAMES: [&str; 3] =
    [".solidity-fcg.json", ".solidity-fcg.yaml", ".solidity-fcg.yml"];

/// Engines that run the analyzer themselves and accept `solc_version` and
/// `python`. File-provided analyzer settings only reach these.
const ANALYZER_ENGINES: &[&str] = &["slither"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolConfig {
    /// Engine used when `--engine` is not given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_engine: Option<String>,
    /// Compiler-version hint used when `--solc-version` is not given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solc_version: Option<String>,
    /// Python interpreter with slither-analyzer installed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub python: Option<String>,
}

/// Engine name and construction parameters after applying precedence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSettings {
    pub engine: String,
    pub params: EngineParams,
}

impl ToolConfig {
    pub fn resolve(
        &self,
        project: &Path,
        engine_flag: Option<&str>,
        solc_flag: Option<&str>,
    ) -> ConnectionSettings {
        let engine = engine_flag
            .map(str::to_string)
            .or_else(|| self.default_engine.clone())
            .unwrap_or_else(|| DEFAULT_ENGINE_NAME.to_string());

        let analyzer = ANALYZER_ENGINES.contains(&engine.as_str());
        let mut params = EngineParams::new(project);
        // An explicit flag always passes through so the engine can reject it.
        let solc_version = match solc_flag {
            Some(version) => Some(version.to_string()),
            None if analyzer => self.solc_version.clone(),
            None => None,
        };
        if let Some(version) = solc_version {
            params = params.with_solc_version(version);
        }
        if let (true, Some(python)) = (analyzer, &self.python) {
            params = params.with_option("python", python.clone());
        }
        ConnectionSettings { engine, params }
    }
}

/// Directory searched for the config file.
pub fn config_dir(project: &Path) -> PathBuf {
    if project.is_file() {
        project.parent().map(Path::to_path_buf).unwrap_or_default()
    } else {
        project.to_path_buf()
    }
}

/// First config file present for `project`, if any.
pub fn find_config_file(project: &Path) -> Option<PathBuf> {
    let dir = config_dir(project);
    CONFIG_FILE_NAMES.iter().map(|name| dir.join(name)).find(|candidate| candidate.is_file())
}

/// Parse one config file; the extension selects JSON or YAML.
pub fn load_config_file(path: &Path) -> Result<ToolConfig> {
    let body = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config at {}", path.display()))?;
    let is_json = path.extension().and_then(|e| e.to_str()) == Some("json");
    let config = if is_json {
        serde_json::from_str(&body)
            .with_context(|| format!("Failed to parse config JSON {}", path.display()))?
    } else {
        serde_yaml::from_str(&body)
            .with_context(|| format!("Failed to parse config YAML {}", path.display()))?
    };
    Ok(config)
}

/// Config for `project`, or the defaults when no file exists.
pub fn load_tool_config(project: &Path) -> Result<ToolConfig> {
    match find_config_file(project) {
        Some(path) => {
            tracing::debug!(config = %path.display(), "loading project config");
            load_config_file(&path)
        }
        None => Ok(ToolConfig::default()),
    }
}
