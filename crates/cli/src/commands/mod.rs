//! Subcommand implementations.

pub mod credentials;
pub mod describe;
pub mod run;

use std::io::Write;

use sapo_connectors::config::ConfigError;
use sapo_connectors::sapo::SapoError;
use sapo_connectors::{ConnectorError, NodeApiError};
use serde::Serialize;
use thiserror::Error;

/// Errors that end a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Environment configuration is missing or invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// No connector has this type name.
    #[error("Unknown node type: {0}")]
    UnknownType(String),

    /// The parameters could not be read.
    #[error("Invalid parameters: {0}")]
    Parameters(#[from] ConnectorError),

    /// The HTTP transport could not be built.
    #[error("Transport error: {0}")]
    Transport(#[from] SapoError),

    /// The execution raised a node error.
    #[error("{0}")]
    Execution(#[from] NodeApiError),

    /// The credential smoke test failed.
    #[error("Credential test failed: {0}")]
    CredentialTest(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Write `value` to stdout as pretty JSON.
fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let mut out = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}
