//! Fixture project for CLI runs: the SimpleToken sample and a captured
//! `slither-json` export that points at it.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{json, Value};

pub const SIMPLE_TOKEN_SOURCE: &str = include_str!("../../../../samples/SimpleToken.sol");

pub struct Fixture {
    pub root: PathBuf,
    pub sol_path: PathBuf,
    pub export_path: PathBuf,
}

impl Fixture {
    pub fn export_arg(&self) -> String {
        self.export_path.to_string_lossy().to_string()
    }
}

fn mapping(file: &Path, lines: &[i64]) -> Value {
    json!({ "filename": { "absolute": file.display().to_string() }, "lines": lines })
}

fn export_for(sol: &Path) -> Value {
    let balances = json!({ "name": "balances", "canonical_name": "SimpleToken.balances" });
    json!({
        "success": true,
        "slither_version": "0.10.0",
        "compiler_version": "0.8.19",
        "contracts": [{
            "name": "SimpleToken",
            "contract_kind": "contract",
            "source_mapping": mapping(sol, &[4, 5, 6, 7, 8]),
            "functions": [
                {
                    "name": "transfer",
                    "signature_str": "transfer(address,uint256) returns(bool)",
                    "visibility": "external",
                    "parameters": [
                        { "name": "to", "type": "address" },
                        { "name": "amount", "type": "uint256" }
                    ],
                    "source_mapping": mapping(sol, &[13, 14, 15, 16]),
                    "internal_calls": [{
                        "contract": "SimpleToken",
                        "signature_str": "_performTransfer(address,address,uint256) returns()"
                    }]
                },
                {
                    "name": "_performTransfer",
                    "signature_str": "_performTransfer(address,address,uint256) returns()",
                    "visibility": "internal",
                    "state_variables_read": [balances],
                    "state_variables_written": [balances],
                    "source_mapping": mapping(sol, &[18, 19, 20, 21, 22])
                },
                {
                    "name": "balanceOf",
                    "signature_str": "balanceOf(address) returns(uint256)",
                    "visibility": "external",
                    "mutability": "view",
                    "source_mapping": mapping(sol, &[24, 25, 26])
                }
            ]
        }]
    })
}

/// Write `SimpleToken.sol` and `export.json` into `dir`.
pub fn write_fixture(dir: &Path) -> Fixture {
    let sol_path = dir.join("SimpleToken.sol");
    fs::write(&sol_path, SIMPLE_TOKEN_SOURCE).expect("write sample");
    let export_path = dir.join("export.json");
    let export = export_for(&sol_path);
    fs::write(&export_path, serde_json::to_string_pretty(&export).expect("serialize export"))
        .expect("write export");
    Fixture { root: dir.to_path_buf(), sol_path, export_path }
}
