//! Slither-backed engines.
//!
//! `slither` shells out to a Python interpreter running the bundled exporter
//! script; `slither-json` replays a document that script produced earlier.
//! Both feed the same adapter.

pub mod adapter;
pub mod export;

use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::engine::registry::EngineRegistration;
use crate::engine::{
    AnalysisBackend, EngineCapabilities, EngineError, EngineParams, LoadedProject, ParameterError,
    SOLC_VERSION_PARAM,
};
use export::SlitherExport;

pub const SLITHER_ENGINE: &str = "slither";
pub const SLITHER_JSON_ENGINE: &str = "slither-json";

/// Parameter naming the Python interpreter that has slither installed.
pub const PYTHON_PARAM: &str = "python";

const EXPORT_SCRIPT: &str = include_str!("../../../../scripts/slither_export.py");

/// Live Slither analysis through the exporter script.
#[derive(Debug, Clone)]
pub struct SlitherBackend {
    project_path: PathBuf,
    solc_version: Option<String>,
    python: Option<PathBuf>,
}

impl SlitherBackend {
    pub fn new(project_path: impl Into<PathBuf>) -> Self {
        Self { project_path: project_path.into(), solc_version: None, python: None }
    }

    pub fn from_params(params: &EngineParams) -> Result<Self, ParameterError> {
        params.reject_unknown(SLITHER_ENGINE, &[SOLC_VERSION_PARAM, PYTHON_PARAM])?;
        Ok(Self {
            project_path: params.project_path.clone(),
            solc_version: params.solc_version().map(str::to_string),
            python: params.option(PYTHON_PARAM).map(PathBuf::from),
        })
    }

    pub fn with_solc_version(mut self, version: impl Into<String>) -> Self {
        self.solc_version = Some(version.into());
        self
    }

    pub fn with_python(mut self, python: impl Into<PathBuf>) -> Self {
        self.python = Some(python.into());
        self
    }

    /// Explicit parameter, then `FCG_SLITHER_PYTHON`, then `python3` on PATH.
    pub fn python_path(&self) -> PathBuf {
        self.python
            .clone()
            .or_else(|| std::env::var_os("FCG_SLITHER_PYTHON").map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("python3"))
    }

    fn export_args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> =
            vec!["-c".into(), EXPORT_SCRIPT.into(), self.project_path.clone().into_os_string()];
        if let Some(version) = &self.solc_version {
            args.push("--solc".into());
            args.push(version.into());
        }
        args
    }

    fn run_export(&self) -> Result<SlitherExport, EngineError> {
        let python = self.python_path();
        let output = Command::new(&python).args(self.export_args()).output().map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                EngineError::Unavailable(format!(
                    "Slither engine requires a Python interpreter; {} was not found",
                    python.display()
                ))
            } else {
                EngineError::Unavailable(format!("failed to spawn {}: {e}", python.display()))
            }
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        // The exporter reports its own failures in-band; prefer that message.
        match serde_json::from_str::<SlitherExport>(stdout.trim()) {
            Ok(export) => Ok(export),
            Err(_) if !output.status.success() => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                Err(EngineError::Analysis(format!(
                    "Slither exporter exited with {}: {}",
                    output.status,
                    stderr.trim()
                )))
            }
            Err(e) => {
                Err(EngineError::Analysis(format!("failed to parse Slither exporter output: {e}")))
            }
        }
    }
}

impl AnalysisBackend for SlitherBackend {
    fn name(&self) -> &str {
        SLITHER_ENGINE
    }

    fn capabilities(&self) -> EngineCapabilities {
        EngineCapabilities::all()
    }

    fn project_path(&self) -> &Path {
        &self.project_path
    }

    fn load(&self) -> Result<LoadedProject, EngineError> {
        let export = self.run_export()?;
        adapter::build_project(export, self.name())
    }
}

/// Replays a captured exporter document from disk.
#[derive(Debug, Clone)]
pub struct SlitherJsonBackend {
    export_path: PathBuf,
}

impl SlitherJsonBackend {
    pub fn new(export_path: impl Into<PathBuf>) -> Self {
        Self { export_path: export_path.into() }
    }

    pub fn from_params(params: &EngineParams) -> Result<Self, ParameterError> {
        params.reject_unknown(SLITHER_JSON_ENGINE, &[])?;
        Ok(Self::new(params.project_path.clone()))
    }
}

impl AnalysisBackend for SlitherJsonBackend {
    fn name(&self) -> &str {
        SLITHER_JSON_ENGINE
    }

    fn capabilities(&self) -> EngineCapabilities {
        EngineCapabilities::all()
    }

    fn project_path(&self) -> &Path {
        &self.export_path
    }

    fn load(&self) -> Result<LoadedProject, EngineError> {
        let body = fs::read_to_string(&self.export_path).map_err(|e| {
            EngineError::Analysis(format!(
                "failed to read Slither export {}: {e}",
                self.export_path.display()
            ))
        })?;
        let export: SlitherExport = serde_json::from_str(&body).map_err(|e| {
            EngineError::Analysis(format!(
                "failed to parse Slither export {}: {e}",
                self.export_path.display()
            ))
        })?;
        adapter::build_project(export, self.name())
    }
}

/// Registry entries for both Slither engines.
pub fn registrations() -> Vec<EngineRegistration> {
    vec![
        EngineRegistration::new(SLITHER_ENGINE, |params: &EngineParams| {
            Ok(Box::new(SlitherBackend::from_params(params)?) as Box<dyn AnalysisBackend>)
        })
        .with_description("Solidity static analysis powered by slither-analyzer.")
        .with_capabilities(EngineCapabilities::all()),
        EngineRegistration::new(SLITHER_JSON_ENGINE, |params: &EngineParams| {
            Ok(Box::new(SlitherJsonBackend::from_params(params)?) as Box<dyn AnalysisBackend>)
        })
        .with_description("Replays a captured Slither export (--project points at the JSON file).")
        .with_capabilities(EngineCapabilities::all()),
    ]
}
