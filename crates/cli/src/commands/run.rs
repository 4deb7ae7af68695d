//! `sapo run`: one execution against the configured store.

use std::path::PathBuf;
use std::sync::Arc;

use sapo_connectors::config::SapoConfig;
use sapo_connectors::sapo::HttpTransport;
use sapo_connectors::{
    ExecutionContext, NodeIdentity, ParameterSet, Registry, StaticCredentials, execute,
};
use serde_json::Value;
use tracing::instrument;

use super::{CliError, print_json};

/// Arguments of `sapo run`.
#[derive(Debug)]
pub struct RunArgs {
    pub type_name: String,
    pub params: Option<String>,
    pub params_file: Option<PathBuf>,
    pub continue_on_fail: bool,
    pub name: Option<String>,
}

/// Execute the connector once and print the output batches.
#[instrument(skip_all, fields(node_type = %args.type_name))]
pub async fn run(args: RunArgs) -> Result<(), CliError> {
    let connector = Registry::connector(&args.type_name)
        .ok_or_else(|| CliError::UnknownType(args.type_name.clone()))?;
    let params = read_params(args.params.as_deref(), args.params_file.as_ref())?;

    let config = SapoConfig::from_env()?;
    let transport = Arc::new(HttpTransport::with_timeout(config.timeout)?);
    let description = connector.description();
    let node = NodeIdentity::new(
        args.name.unwrap_or(description.defaults.name),
        connector.type_name(),
    );

    let ctx = ExecutionContext::new(
        node,
        Arc::new(StaticCredentials::new(config.credentials())),
        transport,
    )
    .with_item(params)
    .with_continue_on_fail(args.continue_on_fail);

    tracing::info!(execution_id = %ctx.execution_id(), "Executing node");
    let batches = execute(connector, &ctx).await?;
    print_json(&batches)
}

/// Parameters from `--params`, `--params-file`, or none.
fn read_params(
    inline: Option<&str>,
    file: Option<&PathBuf>,
) -> Result<ParameterSet, CliError> {
    let text = match (inline, file) {
        (Some(text), _) => text.to_owned(),
        (None, Some(path)) => std::fs::read_to_string(path)?,
        (None, None) => return Ok(ParameterSet::new()),
    };
    let value: Value = serde_json::from_str(&text)?;
    Ok(ParameterSet::from_value(value)?)
}
