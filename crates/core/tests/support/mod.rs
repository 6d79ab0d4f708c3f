//! Shared fixtures: the SimpleToken sample plus a captured Slither export.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{json, Value};

pub const SIMPLE_TOKEN_SOURCE: &str = include_str!("../../../../samples/SimpleToken.sol");

pub struct Fixture {
    pub sol_path: PathBuf,
    pub missing_path: PathBuf,
    pub export_path: PathBuf,
}

fn mapping(file: &Path, lines: &[i64]) -> Value {
    json!({
        "filename": {
            "absolute": file.display().to_string(),
            "relative": file.file_name().map(|n| n.to_string_lossy().to_string())
        },
        "lines": lines
    })
}

fn callee(contract: Option<&str>, signature: &str) -> Value {
    json!({ "contract": contract, "name": signature.split('(').next(), "signature_str": signature })
}

/// Export document as the exporter script would print it for the fixture.
pub fn simple_token_export(sol: &Path, missing: &Path) -> Value {
    let balances = json!({ "name": "balances", "canonical_name": "SimpleToken.balances" });
    let contract_lines: Vec<i64> = (4..=27).collect();
    let total = json!({ "name": "totalSupply", "canonical_name": "SimpleToken.totalSupply" });
    json!({
        "success": true,
        "slither_version": "0.10.0",
        "compiler_version": "0.8.19",
        "contracts": [
            {
                "name": "SimpleToken",
                "contract_kind": "contract",
                "source_mapping": mapping(sol, &contract_lines),
                "inheritance": [],
                "functions": [
                    {
                        "name": "constructor",
                        "canonical_name": "SimpleToken.constructor(uint256)",
                        "signature_str": "constructor(uint256) returns()",
                        "visibility": "public",
                        "mutability": "nonpayable",
                        "parameters": [{ "name": "supply", "type": "uint256" }],
                        "state_variables_written": [balances, total],
                        "source_mapping": mapping(sol, &[8, 9, 10, 11])
                    },
                    {
                        "name": "transfer",
                        "canonical_name": "SimpleToken.transfer(address,uint256)",
                        "signature_str": "transfer(address,uint256) returns(bool)",
                        "visibility": "external",
                        "mutability": "nonpayable",
                        "parameters": [
                            { "name": "to", "type": "address" },
                            { "name": "amount", "type": "uint256" }
                        ],
                        "source_mapping": mapping(sol, &[16, 13, 15, 14]),
                        "internal_calls": [
                            callee(Some("SimpleToken"), "_performTransfer(address,address,uint256)"),
                            callee(None, "require(bool,string)"),
                            callee(Some("SimpleToken"), "_performTransfer(address,address,uint256)")
                        ]
                    },
                    {
                        "name": "_performTransfer",
                        "canonical_name": "SimpleToken._performTransfer(address,address,uint256)",
                        "signature_str": "_performTransfer(address,address,uint256) returns()",
                        "visibility": "internal",
                        "mutability": "nonpayable",
                        "parameters": [
                            { "name": "from", "type": "address" },
                            { "name": "to", "type": "address" },
                            { "name": "amount", "type": "uint256" }
                        ],
                        "state_variables_read": [balances],
                        "state_variables_written": [balances],
                        "source_mapping": mapping(sol, &[18, 19, 20, 21, 22]),
                        "internal_calls": [callee(None, "require(bool,string)")]
                    },
                    {
                        "name": "balanceOf",
                        "canonical_name": "SimpleToken.balanceOf(address)",
                        "signature_str": "balanceOf(address) returns(uint256)",
                        "visibility": "external",
                        "mutability": "view",
                        "parameters": [{ "name": "account", "type": "address" }],
                        "state_variables_read": [balances],
                        "source_code": "function balanceOf(address account) external view returns (uint256) {\n        return balances[account];\n    }",
                        "source_mapping": mapping(sol, &[24, 25, 26])
                    }
                ]
            },
            {
                "name": "Relay",
                "contract_kind": "contract",
                "source_mapping": mapping(missing, &[1, 2, 3, 4, 5, 6, 7, 8]),
                "inheritance": ["Ownable"],
                "functions": [
                    {
                        "name": "forward",
                        "canonical_name": "Relay.forward(address,uint256)",
                        "visibility": "public",
                        "parameters": [
                            { "name": "to", "type": "address" },
                            { "name": "amount", "type": "uint256" }
                        ],
                        "source_mapping": mapping(missing, &[5, 6, 7]),
                        "external_calls": [
                            { "contract": "SimpleToken", "name": "transfer", "canonical_name": "SimpleToken.transfer(address,uint256)" },
                            callee(Some("IOracle"), "latest() returns(uint256)")
                        ]
                    },
                    {
                        "name": "ping",
                        "canonical_name": "Relay.ping()",
                        "signature_str": "ping()",
                        "visibility": "external"
                    }
                ]
            }
        ]
    })
}

/// Write the sample contract and its export into `dir`.
pub fn write_fixture(dir: &Path) -> Fixture {
    let sol_path = dir.join("SimpleToken.sol");
    fs::write(&sol_path, SIMPLE_TOKEN_SOURCE).expect("write sample");
    let missing_path = dir.join("Relay.sol");
    let export_path = dir.join("slither-export.json");
    let export = simple_token_export(&sol_path, &missing_path);
    fs::write(&export_path, serde_json::to_string_pretty(&export).expect("serialize export"))
        .expect("write export");
    Fixture { sol_path, missing_path, export_path }
}
