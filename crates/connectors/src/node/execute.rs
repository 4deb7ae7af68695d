//! The guarded execution flow shared by every connector.

use async_trait::async_trait;
use sapo_core::OutputRecord;
use tracing::{Span, instrument};

use super::context::ExecutionContext;
use super::error::{ConnectorError, NodeApiError};
use super::params::ParameterSet;
use super::schema::NodeDescription;
use crate::facade::SapoApi;

/// A Sapo connector: a parameter schema plus one operation per run.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Connector type name (e.g. `sapoOrder`).
    fn type_name(&self) -> &'static str;

    /// Parameter schema shown by the host.
    fn description(&self) -> NodeDescription;

    /// Run the operation selected in `params` against the API.
    ///
    /// Returns `{}` for an operation it does not recognise.
    async fn run(&self, api: &SapoApi, params: &ParameterSet)
    -> Result<OutputRecord, ConnectorError>;
}

/// Execute `connector` once for `ctx`.
///
/// Builds the API facade, reads the parameters of item 0 (with schema
/// defaults applied), runs the operation and returns a single batch holding a
/// single record. A failed run becomes an `{error}` record when the context
/// continues on failure and a [`NodeApiError`] otherwise. A facade failure is
/// always raised.
///
/// # Errors
///
/// Returns `NodeApiError` if the client cannot be built, or if the run fails
/// and continue-on-fail is off.
#[instrument(
    skip_all,
    fields(
        node_type = %ctx.node().type_name,
        execution_id = %ctx.execution_id(),
        operation = tracing::field::Empty,
    )
)]
pub async fn execute(
    connector: &dyn Connector,
    ctx: &ExecutionContext,
) -> Result<Vec<Vec<OutputRecord>>, NodeApiError> {
    let api = SapoApi::connect(ctx).await?;

    if ctx.items().len() > 1 {
        tracing::debug!(
            items = ctx.items().len(),
            "Only the first input item is read"
        );
    }
    let params = ctx
        .node_parameters(0)
        .cloned()
        .unwrap_or_default()
        .with_defaults(&connector.description());
    if let Some(operation) = params.operation() {
        Span::current().record("operation", operation);
    }

    let record = match connector.run(&api, &params).await {
        Ok(record) => record,
        Err(err) if ctx.continue_on_fail() => {
            tracing::warn!(error = %err, "Operation failed, continuing");
            OutputRecord::error(err.to_string())
        }
        Err(err) => {
            tracing::error!(error = %err, "Operation failed");
            return Err(NodeApiError::from_error(ctx.node().name.clone(), &err));
        }
    };

    Ok(vec![vec![record]])
}
