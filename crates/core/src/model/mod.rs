//! Canonical, analyzer-independent data model.
//!
//! Every backend maps its native analysis objects into these types. The
//! model is produced once by a successful load and treated as read-only by
//! every consumer afterwards.

use std::collections::BTreeMap;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Line number used when a backend reports a source mapping without lines.
pub const UNKNOWN_LINE: i64 = -1;

/// Span of a fragment inside one source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    pub file: String,
    pub start_line: i64,
    pub start_column: u32,
    pub end_line: i64,
    pub end_column: u32,
}

impl SourceLocation {
    /// True when both line bounds are known and a file is attached.
    pub fn is_resolved(&self) -> bool {
        !self.file.is_empty() && self.start_line >= 0 && self.end_line >= 0
    }
}

/// Identifies a function by owning contract and canonical signature.
///
/// Equality is exact on both fields; overloads are distinct signatures.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FunctionIdentifier {
    pub contract: String,
    pub signature: String,
}

impl FunctionIdentifier {
    pub fn new(contract: impl Into<String>, signature: impl Into<String>) -> Self {
        Self { contract: contract.into(), signature: signature.into() }
    }

    /// `Contract.signature`, as shown in call-graph output.
    pub fn display_name(&self) -> String {
        format!("{}.{}", self.contract, self.signature)
    }
}

impl fmt::Display for FunctionIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.contract, self.signature)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionParameter {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

/// Normalized metadata for one function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionInfo {
    pub identifier: FunctionIdentifier,
    pub visibility: String,
    pub mutability: Option<String>,
    pub parameters: Vec<FunctionParameter>,
    pub state_variables_read: Vec<String>,
    pub state_variables_written: Vec<String>,
    pub source: String,
    pub location: Option<SourceLocation>,
    /// Callees in first-seen order, already deduplicated by the adapter.
    pub calls: Vec<FunctionIdentifier>,
}

impl FunctionInfo {
    /// Render this function for consumers.
    ///
    /// `format_path` is applied to every file path that ends up in the
    /// payload. Callees that resolve inside `project` carry their file path;
    /// unresolved callees keep only the identifier fields.
    pub fn to_payload<F>(&self, project: &ProjectModel, format_path: F) -> FunctionPayload
    where
        F: Fn(&str) -> String,
    {
        let location = self.location.as_ref().map(|loc| LocationPayload {
            file: if loc.file.is_empty() { String::new() } else { format_path(&loc.file) },
            start_line: loc.start_line,
            start_column: loc.start_column,
            end_line: loc.end_line,
            end_column: loc.end_column,
        });

        let calls = self
            .calls
            .iter()
            .map(|callee| {
                let file = project
                    .get_function(callee)
                    .and_then(|info| info.location.as_ref())
                    .filter(|loc| !loc.file.is_empty())
                    .map(|loc| format_path(&loc.file));
                CallPayload {
                    contract: callee.contract.clone(),
                    function: callee.signature.clone(),
                    file,
                }
            })
            .collect();

        FunctionPayload {
            contract: self.identifier.contract.clone(),
            function: self.identifier.signature.clone(),
            visibility: self.visibility.clone(),
            mutability: self.mutability.clone(),
            parameters: self.parameters.clone(),
            state_variables_read: self.state_variables_read.clone(),
            state_variables_written: self.state_variables_written.clone(),
            source: self.source.clone(),
            location,
            calls,
            metadata: BTreeMap::new(),
        }
    }
}

/// A contract, interface or library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractInfo {
    pub name: String,
    pub kind: String,
    pub filepath: String,
    /// Base contracts in declaration order.
    pub inheritance: Vec<String>,
    /// Keyed by signature, in declaration order.
    pub functions: IndexMap<String, FunctionInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_source: Option<String>,
}

impl ContractInfo {
    pub fn new(name: impl Into<String>, kind: impl Into<String>, filepath: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            filepath: filepath.into(),
            inheritance: Vec::new(),
            functions: IndexMap::new(),
            raw_source: None,
        }
    }

    pub fn get_function(&self, signature: &str) -> Option<&FunctionInfo> {
        self.functions.get(signature)
    }

    /// Insert keyed by signature; a duplicate signature replaces the earlier
    /// entry and keeps its position.
    pub fn insert_function(&mut self, function: FunctionInfo) {
        self.functions.insert(function.identifier.signature.clone(), function);
    }

    pub fn iter_functions(&self) -> impl Iterator<Item = &FunctionInfo> {
        self.functions.values()
    }
}

/// Aggregate root for one analyzed project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectModel {
    /// Contracts in the order the backend reported them.
    pub contracts: IndexMap<String, ContractInfo>,
    pub engine_metadata: BTreeMap<String, serde_json::Value>,
}

impl ProjectModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_contract(&mut self, contract: ContractInfo) {
        self.contracts.insert(contract.name.clone(), contract);
    }

    pub fn get_contract(&self, name: &str) -> Option<&ContractInfo> {
        self.contracts.get(name)
    }

    /// `None` when either the contract or the signature is unknown.
    pub fn get_function(&self, identifier: &FunctionIdentifier) -> Option<&FunctionInfo> {
        self.get_contract(&identifier.contract)?.get_function(&identifier.signature)
    }

    pub fn iter_contracts(&self) -> impl Iterator<Item = &ContractInfo> {
        self.contracts.values()
    }

    pub fn contract_names(&self) -> Vec<String> {
        self.contracts.keys().cloned().collect()
    }

    /// One pass over every function's call list, contracts and functions in
    /// declaration order. Only meaningful once every contract is registered.
    pub fn collect_call_edges(&self) -> Vec<CallGraphEdge> {
        let mut edges = Vec::new();
        for contract in self.iter_contracts() {
            for function in contract.iter_functions() {
                for callee in &function.calls {
                    edges.push(CallGraphEdge {
                        caller: function.identifier.clone(),
                        callee: callee.clone(),
                    });
                }
            }
        }
        edges
    }
}

/// Directed caller → callee edge at function granularity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallGraphEdge {
    pub caller: FunctionIdentifier,
    pub callee: FunctionIdentifier,
}

/// Serializable `{caller, callee}` pair using display names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallGraphRecord {
    pub caller: String,
    pub callee: String,
}

impl From<&CallGraphEdge> for CallGraphRecord {
    fn from(edge: &CallGraphEdge) -> Self {
        Self { caller: edge.caller.display_name(), callee: edge.callee.display_name() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationPayload {
    pub file: String,
    pub start_line: i64,
    pub start_column: u32,
    pub end_line: i64,
    pub end_column: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallPayload {
    #[serde(rename = "module")]
    pub contract: String,
    pub function: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

/// External representation of a [`FunctionInfo`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionPayload {
    pub contract: String,
    pub function: String,
    pub visibility: String,
    pub mutability: Option<String>,
    #[serde(rename = "parameter")]
    pub parameters: Vec<FunctionParameter>,
    pub state_variables_read: Vec<String>,
    pub state_variables_written: Vec<String>,
    pub source: String,
    /// Always present; `null` when the backend reported no location.
    pub location: Option<LocationPayload>,
    pub calls: Vec<CallPayload>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, serde_json::Value>,
}
