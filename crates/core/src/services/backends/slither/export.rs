//! Raw document emitted by the Slither exporter script.
//!
//! Field names follow Slither's own object attributes. Everything except the
//! contract name is optional; the adapter decides what a missing field means.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlitherExport {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    /// `unavailable` when slither could not be imported, `analysis` otherwise.
    #[serde(default)]
    pub error_kind: Option<String>,
    #[serde(default)]
    pub slither_version: Option<String>,
    #[serde(default)]
    pub compiler_version: Option<String>,
    #[serde(default)]
    pub contracts: Vec<SlitherContract>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlitherContract {
    pub name: String,
    #[serde(default)]
    pub contract_kind: Option<String>,
    #[serde(default)]
    pub source_mapping: Option<SlitherSourceMapping>,
    #[serde(default)]
    pub inheritance: Vec<String>,
    #[serde(default)]
    pub source_code: Option<String>,
    #[serde(default)]
    pub functions: Vec<SlitherFunction>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlitherFunction {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub canonical_name: Option<String>,
    #[serde(default)]
    pub signature_str: Option<String>,
    #[serde(default)]
    pub visibility: Option<String>,
    #[serde(default)]
    pub mutability: Option<String>,
    #[serde(default)]
    pub parameters: Vec<SlitherParameter>,
    #[serde(default)]
    pub state_variables_read: Vec<SlitherVariable>,
    #[serde(default)]
    pub state_variables_written: Vec<SlitherVariable>,
    #[serde(default)]
    pub source_code: Option<String>,
    #[serde(default)]
    pub source_mapping: Option<SlitherSourceMapping>,
    #[serde(default)]
    pub internal_calls: Vec<SlitherCallee>,
    #[serde(default)]
    pub external_calls: Vec<SlitherCallee>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlitherParameter {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub type_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlitherVariable {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub canonical_name: Option<String>,
}

/// Target of one call site. `contract` is absent for builtins and calls
/// the analyzer could not resolve.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlitherCallee {
    #[serde(default)]
    pub contract: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub canonical_name: Option<String>,
    #[serde(default)]
    pub signature_str: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlitherSourceMapping {
    #[serde(default)]
    pub filename: Option<SlitherFilename>,
    #[serde(default)]
    pub lines: Vec<i64>,
    #[serde(default)]
    pub starting_column: Option<u32>,
    #[serde(default)]
    pub ending_column: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlitherFilename {
    #[serde(default)]
    pub absolute: Option<String>,
    #[serde(default)]
    pub used: Option<String>,
    #[serde(default)]
    pub relative: Option<String>,
    #[serde(default)]
    pub short: Option<String>,
}

impl SlitherFilename {
    /// Most specific non-empty name: absolute, used, relative, short.
    pub fn preferred(&self) -> Option<&str> {
        [&self.absolute, &self.used, &self.relative, &self.short]
            .into_iter()
            .filter_map(|candidate| candidate.as_deref())
            .find(|candidate| !candidate.is_empty())
    }
}

impl SlitherSourceMapping {
    pub fn filename(&self) -> Option<&str> {
        self.filename.as_ref().and_then(SlitherFilename::preferred)
    }
}
