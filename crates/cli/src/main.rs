use std::process::ExitCode;

use anyhow::Result;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand};
use solidity_fcg::commands::{
    call_graph_command, connection_settings, contracts_command, engines_command, query_command,
};
use solidity_fcg::init_tracing;

/// Solidity function source and call graph queries.
///
/// This CLI is a thin wrapper around `fcg-core` (exposed in code as `fcg_core`).
/// Results are printed as a single JSON document on stdout; diagnostics go to stderr.
#[derive(Parser, Debug)]
#[command(
    name = "solidity-fcg",
    version,
    about = "Solidity function call graph and source extraction tool",
    long_about = None
)]
struct Cli {
    /// Path to the Solidity project or single .sol file
    /// (a captured export .json for the slither-json engine).
    #[arg(long)]
    project: Option<String>,

    /// Registered engine name (default: slither, or `default_engine` from the project config).
    #[arg(long)]
    engine: Option<String>,

    /// Optional explicit solc version passed to the engine.
    #[arg(long = "solc-version")]
    solc_version: Option<String>,

    /// Enable debug logging on stderr (RUST_LOG overrides).
    #[arg(short, long, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch function source by contract and function signature.
    Query {
        /// Contract name.
        #[arg(long)]
        contract: String,

        /// Function signature, e.g. transfer(address,uint256).
        #[arg(long)]
        function: String,
    },

    /// Emit call graph edges, optionally filtered by caller.
    CallGraph {
        /// Filter by caller contract.
        #[arg(long)]
        contract: Option<String>,

        /// Filter by caller function signature.
        #[arg(long)]
        function: Option<String>,
    },

    /// List contracts found in the project.
    Contracts,

    /// List registered analysis engines.
    Engines,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    if let Command::Engines = cli.command {
        return engines_command();
    }

    let project = require_project(cli.project.as_deref());
    let settings =
        connection_settings(project, cli.engine.as_deref(), cli.solc_version.as_deref())?;

    match cli.command {
        Command::Query { contract, function } => query_command(&settings, &contract, &function),
        Command::CallGraph { contract, function } => {
            call_graph_command(&settings, contract.as_deref(), function.as_deref())
        }
        Command::Contracts => contracts_command(&settings),
        Command::Engines => engines_command(),
    }
}

/// `--project` is mandatory for every project command; misuse exits like any clap error.
fn require_project(project: Option<&str>) -> &str {
    match project {
        Some(project) => project,
        None => Cli::command()
            .error(
                ErrorKind::MissingRequiredArgument,
                "the following required arguments were not provided:\n  --project <PROJECT>",
            )
            .exit(),
    }
}
