//! Sapo CLI - run the Sapo connectors from the command line.
//!
//! # Usage
//!
//! ```bash
//! # List the connectors in the package manifest
//! sapo nodes
//!
//! # Show the parameter form of a connector (or of `sapoApi`)
//! sapo describe sapoOrder
//!
//! # List open orders on the configured store
//! sapo run sapoOrder --params '{"operation": "getMany", "additionalFields": {"status": "open"}}'
//!
//! # Check the configured credentials
//! sapo test-credentials
//! ```
//!
//! # Environment Variables
//!
//! - `SAPO_STORE`, `SAPO_API_KEY`, `SAPO_SECRET_KEY` - Private app credentials
//! - `SAPO_ACCESS_TOKEN` - Optional access token header
//! - `SAPO_TIMEOUT_SECS` - HTTP timeout (default 30)
//! - `SAPO_LOG_FORMAT` - `json` or `text`
//! - `SENTRY_DSN` - Enables error tracking

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use sapo_connectors::config::TelemetryConfig;

mod commands;
mod telemetry;

use commands::CliError;
use commands::run::RunArgs;

#[derive(Parser)]
#[command(name = "sapo")]
#[command(author, version, about = "Sapo connector host")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the package manifest
    Nodes,
    /// Print the description of a connector or credential type
    Describe {
        /// Connector type (`sapoOrder`, `SapoOrder`) or `sapoApi`
        type_name: String,
    },
    /// Execute one connector against the configured store
    Run {
        /// Connector type (`sapoOrder`, `SapoOrder`)
        type_name: String,

        /// Node parameters as a JSON object
        #[arg(short, long, conflicts_with = "params_file")]
        params: Option<String>,

        /// Read the node parameters from a JSON file
        #[arg(long)]
        params_file: Option<PathBuf>,

        /// Emit an error record instead of failing
        #[arg(long)]
        continue_on_fail: bool,

        /// Node name reported in errors
        #[arg(long)]
        name: Option<String>,
    },
    /// Check the configured credentials against the store
    TestCredentials,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let telemetry = TelemetryConfig::from_env();
    let _sentry_guard = telemetry::init_sentry(&telemetry);
    telemetry::init_tracing(&telemetry);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Nodes => commands::describe::manifest(),
        Commands::Describe { type_name } => commands::describe::describe(&type_name),
        Commands::Run {
            type_name,
            params,
            params_file,
            continue_on_fail,
            name,
        } => {
            commands::run::run(RunArgs {
                type_name,
                params,
                params_file,
                continue_on_fail,
                name,
            })
            .await
        }
        Commands::TestCredentials => commands::credentials::test().await,
    }
}
