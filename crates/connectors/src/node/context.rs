//! Per-execution context supplied by the host.

use std::sync::Arc;

use async_trait::async_trait;
use sapo_core::SapoCredentials;
use serde::Serialize;
use uuid::Uuid;

use super::error::CredentialError;
use super::params::ParameterSet;
use crate::credentials::CREDENTIAL_TYPE;
use crate::sapo::Transport;

/// Which node instance is executing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeIdentity {
    /// User-visible node name in the workflow.
    pub name: String,
    /// Connector type (e.g. `sapoOrder`).
    #[serde(rename = "type")]
    pub type_name: String,
}

impl NodeIdentity {
    #[must_use]
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

/// Source of decrypted credentials.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Fetch the credentials of the given type.
    async fn credentials(&self, type_name: &str) -> Result<SapoCredentials, CredentialError>;
}

/// Provider holding one fixed set of `sapoApi` credentials.
#[derive(Debug, Clone)]
pub struct StaticCredentials {
    credentials: SapoCredentials,
}

impl StaticCredentials {
    #[must_use]
    pub const fn new(credentials: SapoCredentials) -> Self {
        Self { credentials }
    }
}

#[async_trait]
impl CredentialProvider for StaticCredentials {
    async fn credentials(&self, type_name: &str) -> Result<SapoCredentials, CredentialError> {
        if type_name == CREDENTIAL_TYPE {
            Ok(self.credentials.clone())
        } else {
            Err(CredentialError::Missing(type_name.to_owned()))
        }
    }
}

/// Everything one execution of a connector needs.
///
/// Dependencies are passed in explicitly; nothing is looked up globally.
pub struct ExecutionContext {
    node: NodeIdentity,
    execution_id: Uuid,
    items: Vec<ParameterSet>,
    continue_on_fail: bool,
    credentials: Arc<dyn CredentialProvider>,
    transport: Arc<dyn Transport>,
}

impl ExecutionContext {
    /// Create a context with a fresh execution ID and no input items.
    #[must_use]
    pub fn new(
        node: NodeIdentity,
        credentials: Arc<dyn CredentialProvider>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            node,
            execution_id: Uuid::new_v4(),
            items: Vec::new(),
            continue_on_fail: false,
            credentials,
            transport,
        }
    }

    /// Append an input item.
    #[must_use]
    pub fn with_item(mut self, item: ParameterSet) -> Self {
        self.items.push(item);
        self
    }

    /// Replace the input items.
    #[must_use]
    pub fn with_items(mut self, items: Vec<ParameterSet>) -> Self {
        self.items = items;
        self
    }

    /// Emit `{error}` records instead of failing the execution.
    #[must_use]
    pub const fn with_continue_on_fail(mut self, continue_on_fail: bool) -> Self {
        self.continue_on_fail = continue_on_fail;
        self
    }

    #[must_use]
    pub const fn with_execution_id(mut self, execution_id: Uuid) -> Self {
        self.execution_id = execution_id;
        self
    }

    #[must_use]
    pub const fn node(&self) -> &NodeIdentity {
        &self.node
    }

    #[must_use]
    pub const fn execution_id(&self) -> Uuid {
        self.execution_id
    }

    #[must_use]
    pub fn items(&self) -> &[ParameterSet] {
        &self.items
    }

    /// Parameters of the item at `index`.
    #[must_use]
    pub fn node_parameters(&self, index: usize) -> Option<&ParameterSet> {
        self.items.get(index)
    }

    #[must_use]
    pub const fn continue_on_fail(&self) -> bool {
        self.continue_on_fail
    }

    #[must_use]
    pub fn credential_provider(&self) -> &dyn CredentialProvider {
        self.credentials.as_ref()
    }

    #[must_use]
    pub fn transport(&self) -> Arc<dyn Transport> {
        Arc::clone(&self.transport)
    }
}

impl std::fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("node", &self.node)
            .field("execution_id", &self.execution_id)
            .field("items", &self.items.len())
            .field("continue_on_fail", &self.continue_on_fail)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::testing::{MockTransport, credentials, test_context};

    #[tokio::test]
    async fn test_static_credentials_only_serve_sapo_api() {
        let provider = StaticCredentials::new(credentials());

        let creds = provider.credentials("sapoApi").await.expect("credentials");
        assert_eq!(creds.store, "shop.mysapo.net");

        let missing = provider.credentials("otherApi").await;
        assert!(matches!(missing, Err(CredentialError::Missing(t)) if t == "otherApi"));
    }

    #[test]
    fn test_node_parameters_by_index() {
        let transport = MockTransport::shared();
        let ctx = test_context("sapoOrder", json!({"operation": "count"}), &transport);

        assert_eq!(ctx.items().len(), 1);
        assert_eq!(
            ctx.node_parameters(0).and_then(ParameterSet::operation),
            Some("count")
        );
        assert!(ctx.node_parameters(1).is_none());
        assert!(!ctx.continue_on_fail());
    }

    #[test]
    fn test_debug_omits_dependencies() {
        let transport = MockTransport::shared();
        let ctx = test_context("sapoOrder", json!({}), &transport);
        let debug = format!("{ctx:?}");
        assert!(debug.contains("sapoOrder"));
        assert!(!debug.contains("secret-key"));
    }
}
