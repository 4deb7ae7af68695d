//! Test doubles shared by the unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use sapo_core::SapoCredentials;
use serde_json::{Value, json};

use crate::node::{ExecutionContext, NodeIdentity, ParameterSet, StaticCredentials};
use crate::sapo::{ApiRequest, ClientConfig, SapoClient, SapoError, Transport};

/// Records every request and replays queued responses (`{}` once drained).
#[derive(Default)]
pub struct MockTransport {
    requests: Mutex<Vec<ApiRequest>>,
    responses: Mutex<VecDeque<Result<Value, SapoError>>>,
}

impl MockTransport {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond_with(&self, response: Value) {
        self.responses
            .lock()
            .expect("responses lock")
            .push_back(Ok(response));
    }

    pub fn fail_with(&self, error: SapoError) {
        self.responses
            .lock()
            .expect("responses lock")
            .push_back(Err(error));
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().expect("requests lock").clone()
    }

    pub fn last_request(&self) -> Option<ApiRequest> {
        self.requests().pop()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<Value, SapoError> {
        self.requests.lock().expect("requests lock").push(request);
        self.responses
            .lock()
            .expect("responses lock")
            .pop_front()
            .unwrap_or_else(|| Ok(json!({})))
    }
}

pub fn credentials() -> SapoCredentials {
    SapoCredentials::new("shop.mysapo.net", "api-key", "secret-key")
}

pub fn test_client(transport: &Arc<MockTransport>) -> SapoClient {
    SapoClient::new(ClientConfig::private(&credentials()), transport.clone()).expect("client")
}

/// Context for one execution of `type_name` with a single input item.
pub fn test_context(
    type_name: &str,
    params: Value,
    transport: &Arc<MockTransport>,
) -> ExecutionContext {
    ExecutionContext::new(
        NodeIdentity::new("Test node", type_name),
        Arc::new(StaticCredentials::new(credentials())),
        transport.clone(),
    )
    .with_item(ParameterSet::from_value(params).expect("object parameters"))
}
