//! Integration test harness for the Sapo connectors.
//!
//! Connectors run through the same `execute` entry point a host uses, over a
//! [`RecordingTransport`] instead of HTTP. Every request is captured so tests
//! can assert on method, path, query and body.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p sapo-integration-tests
//! ```

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use reqwest::Method;
use sapo_connectors::node::CredentialError;
use sapo_connectors::sapo::{ApiRequest, SapoError, Transport};
use sapo_connectors::{
    CREDENTIAL_TYPE, CredentialProvider, ExecutionContext, NodeApiError, NodeIdentity,
    ParameterSet, Registry, execute,
};
use sapo_core::{OutputRecord, SapoCredentials};
use serde_json::{Value, json};

/// Store every test request targets.
pub const STORE: &str = "test-shop.mysapo.net";

/// Node name reported in errors.
pub const NODE_NAME: &str = "Sapo";

/// Records every request and replays queued responses.
///
/// Once the queue is drained every request answers `{}`.
#[derive(Default)]
pub struct RecordingTransport {
    requests: Mutex<Vec<ApiRequest>>,
    responses: Mutex<VecDeque<Result<Value, SapoError>>>,
}

impl RecordingTransport {
    #[must_use]
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond_with(&self, response: Value) {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(Ok(response));
    }

    pub fn fail_with(&self, error: SapoError) {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(Err(error));
    }

    #[must_use]
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn last_request(&self) -> Option<ApiRequest> {
        self.requests().pop()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, request: ApiRequest) -> Result<Value, SapoError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| Ok(json!({})))
    }
}

/// Credential store keyed by credential type, like a host's vault.
#[derive(Debug, Default)]
pub struct CredentialVault {
    entries: HashMap<String, SapoCredentials>,
}

impl CredentialVault {
    /// A vault holding [`store_credentials`] under `sapoApi`.
    #[must_use]
    pub fn with_store() -> Self {
        Self::default().insert(CREDENTIAL_TYPE, store_credentials())
    }

    #[must_use]
    pub fn insert(mut self, type_name: &str, credentials: SapoCredentials) -> Self {
        self.entries.insert(type_name.to_owned(), credentials);
        self
    }
}

#[async_trait]
impl CredentialProvider for CredentialVault {
    async fn credentials(&self, type_name: &str) -> Result<SapoCredentials, CredentialError> {
        self.entries
            .get(type_name)
            .cloned()
            .ok_or_else(|| CredentialError::Missing(type_name.to_owned()))
    }
}

#[must_use]
pub fn store_credentials() -> SapoCredentials {
    SapoCredentials::new(STORE, "0f3a9c2be71d4a58", "8d6e1f04b2c94a7e")
}

/// One connector execution over a recording transport.
pub struct Harness {
    pub transport: Arc<RecordingTransport>,
    vault: Arc<CredentialVault>,
    continue_on_fail: bool,
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

impl Harness {
    #[must_use]
    pub fn new() -> Self {
        Self::with_vault(CredentialVault::with_store())
    }

    #[must_use]
    pub fn with_vault(vault: CredentialVault) -> Self {
        Self {
            transport: RecordingTransport::shared(),
            vault: Arc::new(vault),
            continue_on_fail: false,
        }
    }

    #[must_use]
    pub const fn continue_on_fail(mut self) -> Self {
        self.continue_on_fail = true;
        self
    }

    /// Execute the connector registered as `type_name` with `params` as the
    /// single input item.
    ///
    /// # Errors
    ///
    /// Returns the node error raised by the execution.
    ///
    /// # Panics
    ///
    /// Panics if no connector is registered as `type_name` or `params` is not
    /// an object.
    pub async fn run(
        &self,
        type_name: &str,
        params: Value,
    ) -> Result<Vec<Vec<OutputRecord>>, NodeApiError> {
        let connector = Registry::connector(type_name)
            .unwrap_or_else(|| panic!("no connector registered as {type_name}"));
        let params = ParameterSet::from_value(params)
            .unwrap_or_else(|e| panic!("parameters must be an object: {e}"));

        let ctx = ExecutionContext::new(
            NodeIdentity::new(NODE_NAME, type_name),
            self.vault.clone(),
            self.transport.clone(),
        )
        .with_item(params)
        .with_continue_on_fail(self.continue_on_fail);

        execute(connector, &ctx).await
    }

    /// The single output record of a successful execution.
    ///
    /// # Panics
    ///
    /// Panics if the execution fails or does not emit exactly one batch of one
    /// record.
    pub async fn output(&self, type_name: &str, params: Value) -> Value {
        let batches = self
            .run(type_name, params)
            .await
            .unwrap_or_else(|e| panic!("{type_name} failed: {e}"));
        match batches.as_slice() {
            [batch] => match batch.as_slice() {
                [record] => record.json.clone(),
                other => panic!("expected one record, got {}", other.len()),
            },
            other => panic!("expected one batch, got {}", other.len()),
        }
    }
}

/// The operation values a connector declares in its schema.
///
/// # Panics
///
/// Panics if `type_name` is not registered.
#[must_use]
pub fn declared_operations(type_name: &str) -> Vec<String> {
    let connector = Registry::connector(type_name)
        .unwrap_or_else(|| panic!("no connector registered as {type_name}"));
    let description = connector.description();
    let mut operations: Vec<String> = description
        .properties_named("operation")
        .flat_map(|p| p.options.iter())
        .filter_map(|o| o.value.as_str().map(str::to_owned))
        .collect();
    operations.sort();
    operations.dedup();
    operations
}

/// Expected outcome of one operation.
#[derive(Debug, Clone)]
pub struct Route {
    pub operation: &'static str,
    pub params: Value,
    /// Response queued before the run.
    pub response: Option<Value>,
    /// Method and path of the last request; `None` for offline operations.
    pub request: Option<(Method, String)>,
}

impl Route {
    /// `operation` with extra `params` merged in.
    ///
    /// # Panics
    ///
    /// Panics if `params` is not an object.
    #[must_use]
    pub fn new(operation: &'static str, params: Value) -> Self {
        let mut merged = json!({ "operation": operation });
        if let (Some(target), Value::Object(extra)) = (merged.as_object_mut(), params) {
            target.extend(extra);
        }
        Self {
            operation,
            params: merged,
            response: None,
            request: None,
        }
    }

    #[must_use]
    pub fn expect(mut self, method: Method, path: &str) -> Self {
        self.request = Some((method, path.to_owned()));
        self
    }

    #[must_use]
    pub fn respond(mut self, response: Value) -> Self {
        self.response = Some(response);
        self
    }
}

/// Run every route against a fresh harness and check the request it sends.
///
/// # Panics
///
/// Panics on the first route whose execution fails or whose last request
/// differs from the expectation.
pub async fn assert_routes(type_name: &str, routes: &[Route]) {
    for route in routes {
        let harness = Harness::new();
        if let Some(response) = &route.response {
            harness.transport.respond_with(response.clone());
        }

        let output = harness.output(type_name, route.params.clone()).await;
        assert!(
            output.get("error").is_none(),
            "{type_name}.{} emitted an error: {output}",
            route.operation
        );

        let last = harness.transport.last_request();
        match &route.request {
            Some((method, path)) => {
                let request = last.unwrap_or_else(|| {
                    panic!("{type_name}.{} sent no request", route.operation)
                });
                assert_eq!(
                    (&request.method, request.path()),
                    (method, path.as_str()),
                    "{type_name}.{}",
                    route.operation
                );
            }
            None => assert!(
                last.is_none(),
                "{type_name}.{} should not call the API",
                route.operation
            ),
        }
    }
}

/// Operations covered by `routes`, sorted and deduplicated.
#[must_use]
pub fn covered_operations(routes: &[Route]) -> Vec<String> {
    let mut operations: Vec<String> = routes.iter().map(|r| r.operation.to_owned()).collect();
    operations.sort();
    operations.dedup();
    operations
}
