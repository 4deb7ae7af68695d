//! Sapo connectors library.
//!
//! Workflow-automation connectors for the Sapo e-commerce Admin REST API: one
//! connector per resource family (products, orders, customers, collections,
//! inventory, price rules, fulfillments, metafields, pages, blogs, webhooks).
//!
//! # Security
//!
//! This crate handles HIGH PRIVILEGE credentials:
//! - Sapo private app API key and secret key (full store access)
//! - Optional access token
//!
//! Credentials are held as `SecretString`, redacted from `Debug` output and
//! never logged.
//!
//! # Modules
//!
//! - [`sapo`] - API client, transport and per-resource sub-clients
//! - [`node`] - Host contract: execution context, parameters, schema, errors
//! - [`facade`] - Per-execution client construction
//! - [`connectors`] - The eleven connectors
//! - [`credentials`] - The `sapoApi` credential type and its smoke test
//! - [`registry`] - Package manifest and connector lookup
//! - [`config`] - Environment configuration for command-line hosts

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod connectors;
pub mod credentials;
pub mod facade;
pub mod node;
pub mod registry;
pub mod sapo;

#[cfg(test)]
mod testing;

pub use credentials::{
    CREDENTIAL_TYPE, CredentialDescriptor, CredentialTestResult, test_credentials,
};
pub use facade::{INIT_FAILURE_MESSAGE, SapoApi};
pub use node::{
    Connector, ConnectorError, CredentialProvider, ExecutionContext, NodeApiError, NodeIdentity,
    ParameterSet, StaticCredentials, execute,
};
pub use registry::Registry;
