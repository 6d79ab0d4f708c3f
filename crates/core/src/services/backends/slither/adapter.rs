//! Maps a [`SlitherExport`] into the canonical model.
//!
//! Every best-effort field is handled by an explicit branch:
//! - missing source text falls back to reading the mapped line range, and an
//!   unreadable file yields an empty snippet;
//! - a call site without an owning contract or signature is dropped;
//! - a mapping without lines gets [`UNKNOWN_LINE`] bounds.

use std::collections::HashSet;
use std::fs;

use chrono::Utc;

use crate::engine::{EngineError, LoadedProject};
use crate::model::{
    ContractInfo, FunctionIdentifier, FunctionInfo, FunctionParameter, ProjectModel,
    SourceLocation, UNKNOWN_LINE,
};
use crate::services::backends::slither::export::{
    SlitherCallee, SlitherContract, SlitherExport, SlitherFunction, SlitherParameter,
    SlitherSourceMapping, SlitherVariable,
};

const RETURNS_MARKER: &str = " returns";
const DEFAULT_COLUMN: u32 = 1;

/// Strip the return clause and surrounding whitespace.
pub fn normalize_signature(signature: &str) -> String {
    let head = match signature.find(RETURNS_MARKER) {
        Some(idx) => &signature[..idx],
        None => signature,
    };
    head.trim().to_string()
}

/// Pick the signature source in preference order: signature string, then
/// canonical name without its `Contract.` qualifier, then the bare name.
///
/// `None` when every candidate is empty.
pub fn canonical_signature(
    signature_str: Option<&str>,
    canonical_name: Option<&str>,
    name: Option<&str>,
) -> Option<String> {
    if let Some(signature) = signature_str.filter(|s| !s.trim().is_empty()) {
        return Some(normalize_signature(signature));
    }
    if let Some(canonical) = canonical_name.filter(|s| !s.trim().is_empty()) {
        let unqualified = match canonical.split_once('.') {
            Some((_, rest)) => rest,
            None => canonical,
        };
        return Some(normalize_signature(unqualified));
    }
    name.filter(|s| !s.trim().is_empty()).map(normalize_signature)
}

/// Build a location from the mapped line list; `None` without a mapping.
pub fn resolve_location(mapping: Option<&SlitherSourceMapping>) -> Option<SourceLocation> {
    let mapping = mapping?;
    let mut lines = mapping.lines.clone();
    lines.sort_unstable();
    let start_line = lines.first().copied().unwrap_or(UNKNOWN_LINE);
    let end_line = lines.last().copied().unwrap_or(UNKNOWN_LINE);

    Some(SourceLocation {
        file: mapping.filename().unwrap_or_default().to_string(),
        start_line,
        start_column: mapping.starting_column.unwrap_or(DEFAULT_COLUMN),
        end_line,
        end_column: mapping.ending_column.unwrap_or(DEFAULT_COLUMN),
    })
}

/// Inclusive line range of the location's file; empty when unavailable.
pub fn read_source_snippet(location: &SourceLocation) -> String {
    if !location.is_resolved() {
        return String::new();
    }
    let body = match fs::read_to_string(&location.file) {
        Ok(body) => body,
        Err(err) => {
            tracing::debug!(file = %location.file, error = %err, "source snippet unavailable");
            return String::new();
        }
    };

    let start = usize::try_from(location.start_line - 1).unwrap_or(0);
    let end = usize::try_from(location.end_line).unwrap_or(0).max(start + 1);
    body.split_inclusive('\n').skip(start).take(end - start).collect()
}

/// Canonical names in reported order, first occurrence kept.
pub fn normalize_state_variables(variables: &[SlitherVariable]) -> Vec<String> {
    let mut seen = HashSet::new();
    variables
        .iter()
        .filter_map(|variable| {
            variable
                .canonical_name
                .as_deref()
                .filter(|name| !name.is_empty())
                .or_else(|| variable.name.as_deref().filter(|name| !name.is_empty()))
        })
        .filter(|name| seen.insert(name.to_string()))
        .map(str::to_string)
        .collect()
}

/// Resolve a call site to `(contract, signature)`; `None` drops it.
pub fn resolve_callee(callee: &SlitherCallee) -> Option<FunctionIdentifier> {
    let contract = callee.contract.as_deref().filter(|c| !c.is_empty())?;
    let signature = canonical_signature(
        callee.signature_str.as_deref(),
        callee.canonical_name.as_deref(),
        callee.name.as_deref(),
    )?;
    Some(FunctionIdentifier::new(contract, signature))
}

/// Internal then external call sites, resolved and deduplicated in
/// first-seen order. Identical `(contract, signature)` pairs collapse even if
/// the analyzer reported them for distinct functions.
pub fn extract_calls(function: &SlitherFunction) -> Vec<FunctionIdentifier> {
    let mut seen = HashSet::new();
    let mut calls = Vec::new();
    for callee in function.internal_calls.iter().chain(function.external_calls.iter()) {
        let Some(identifier) = resolve_callee(callee) else {
            tracing::trace!(callee = ?callee.name, "dropping unresolved call site");
            continue;
        };
        if seen.insert(identifier.clone()) {
            calls.push(identifier);
        }
    }
    calls
}

fn convert_parameters(parameters: &[SlitherParameter]) -> Vec<FunctionParameter> {
    parameters
        .iter()
        .map(|parameter| FunctionParameter {
            name: parameter.name.clone().unwrap_or_default(),
            type_name: parameter.type_name.clone().unwrap_or_default(),
        })
        .collect()
}

pub fn convert_function(contract: &str, function: &SlitherFunction) -> FunctionInfo {
    let signature = canonical_signature(
        function.signature_str.as_deref(),
        function.canonical_name.as_deref(),
        function.name.as_deref(),
    )
    .unwrap_or_else(|| "<unknown>".to_string());

    let location = resolve_location(function.source_mapping.as_ref());
    let provided = function.source_code.as_deref().map(str::trim).unwrap_or_default();
    let source = match (&location, provided.is_empty()) {
        (_, false) => provided.to_string(),
        (Some(loc), true) => read_source_snippet(loc),
        (None, true) => String::new(),
    };

    FunctionInfo {
        identifier: FunctionIdentifier::new(contract, signature),
        visibility: function.visibility.clone().unwrap_or_else(|| "public".to_string()),
        mutability: function.mutability.clone(),
        parameters: convert_parameters(&function.parameters),
        state_variables_read: normalize_state_variables(&function.state_variables_read),
        state_variables_written: normalize_state_variables(&function.state_variables_written),
        source,
        location,
        calls: extract_calls(function),
    }
}

pub fn convert_contract(contract: &SlitherContract) -> ContractInfo {
    let filepath = contract
        .source_mapping
        .as_ref()
        .and_then(SlitherSourceMapping::filename)
        .unwrap_or_default();
    let mut info = ContractInfo::new(
        contract.name.clone(),
        contract.contract_kind.clone().unwrap_or_else(|| "contract".to_string()),
        filepath,
    );
    info.inheritance = contract.inheritance.clone();
    info.raw_source = contract.source_code.clone();
    for function in &contract.functions {
        info.insert_function(convert_function(&contract.name, function));
    }
    info
}

/// Turn a whole export into a loaded project, or the exporter's failure into
/// an engine error. Edges are materialized after every contract is registered.
pub fn build_project(export: SlitherExport, engine: &str) -> Result<LoadedProject, EngineError> {
    if !export.success {
        let message = export.error.unwrap_or_else(|| "unknown error".to_string());
        return Err(match export.error_kind.as_deref() {
            Some("unavailable") => EngineError::Unavailable(message),
            _ => EngineError::Analysis(format!("Failed to analyze project with Slither: {message}")),
        });
    }

    let mut model = ProjectModel::new();
    model.engine_metadata.insert("engine".into(), engine.into());
    model.engine_metadata.insert("timestamp".into(), Utc::now().to_rfc3339().into());
    if let Some(version) = export.slither_version {
        model.engine_metadata.insert("slither_version".into(), version.into());
    }
    if let Some(version) = export.compiler_version {
        model.engine_metadata.insert("solc_version".into(), version.into());
    }

    for contract in &export.contracts {
        model.register_contract(convert_contract(contract));
    }
    Ok(LoadedProject::from_model(model))
}
