//! Error types at the connector/host boundary.

use std::error::Error as StdError;

use serde::Serialize;
use thiserror::Error;

use crate::sapo::SapoError;

/// Failure of a single connector run.
#[derive(Debug, Error)]
pub enum ConnectorError {
    /// The Sapo API call failed.
    #[error(transparent)]
    Api(#[from] SapoError),

    /// A parameter is missing or has the wrong shape.
    #[error("Invalid parameter: {0}")]
    Parameter(String),

    /// A value failed local validation.
    #[error("Validation failed: {0}")]
    Validation(String),
}

impl From<serde_json::Error> for ConnectorError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parameter(err.to_string())
    }
}

/// Credential lookup failure.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// No credentials of the requested type are configured.
    #[error("No credentials of type {0} are configured")]
    Missing(String),

    /// The stored credentials could not be decoded.
    #[error("Credentials could not be read: {0}")]
    Invalid(String),
}

/// Error raised to the host; stops the workflow.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{message}")]
pub struct NodeApiError {
    /// Name of the failing node.
    pub node: String,
    /// Short message shown to the user.
    pub message: String,
    /// Details: the error and its causes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl NodeApiError {
    #[must_use]
    pub fn new(
        node: impl Into<String>,
        message: impl Into<String>,
        description: Option<String>,
    ) -> Self {
        Self {
            node: node.into(),
            message: message.into(),
            description,
        }
    }

    /// Raise `err` for `node`, describing it with its source chain.
    #[must_use]
    pub fn from_error(node: impl Into<String>, err: &(dyn StdError + 'static)) -> Self {
        Self::new(node, err.to_string(), Some(error_chain(err)))
    }
}

/// `err` followed by each of its sources, one per line.
pub(crate) fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut chain = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        chain.push_str("\ncaused by: ");
        chain.push_str(&cause.to_string());
        source = cause.source();
    }
    chain
}
