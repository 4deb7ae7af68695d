//! Contract between the connectors and the workflow host.
//!
//! The host hands each execution an [`ExecutionContext`]: the node identity,
//! the input items (one [`ParameterSet`] each), the continue-on-fail flag, a
//! [`CredentialProvider`] and the HTTP [`Transport`](crate::sapo::Transport).
//! A [`Connector`] declares its parameters as a [`NodeDescription`] and runs
//! one operation per execution; [`execute`] wraps that run in the uniform
//! guarded flow and produces the output batches.

mod context;
mod error;
mod execute;
mod params;
mod schema;

pub use context::{CredentialProvider, ExecutionContext, NodeIdentity, StaticCredentials};
pub use error::{ConnectorError, CredentialError, NodeApiError};
pub use execute::{Connector, execute};
pub use params::{JsonDocument, ParameterSet};
pub use schema::{
    CredentialRequirement, DisplayOptions, NodeDefaults, NodeDescription, NodeProperty,
    PropertyOption, PropertyType,
};

pub(crate) use error::error_chain;
