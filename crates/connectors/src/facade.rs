//! Per-execution API facade.
//!
//! [`SapoApi::connect`] reads the `sapoApi` credentials from the execution
//! context, builds a private-app [`SapoClient`] over the host transport and
//! attaches the access token when one is configured. The facade is built once
//! per execution and handed to the connector; connectors reach resource
//! families through its accessors.

use std::sync::Arc;

use sapo_core::SapoCredentials;
use thiserror::Error;
use tracing::instrument;

use crate::credentials::CREDENTIAL_TYPE;
use crate::node::{CredentialError, ExecutionContext, NodeApiError, error_chain};
use crate::sapo::resources::{
    Blogs, Collections, Customers, Fulfillments, Inventory, Metafields, Orders, Pages, PriceRules,
    Products, Webhooks,
};
use crate::sapo::{ClientConfig, SapoClient, SapoError, Transport};

/// Message of the host error raised when the client cannot be built.
pub const INIT_FAILURE_MESSAGE: &str = "Failed to initialize Sapo client";

#[derive(Debug, Error)]
enum ConnectError {
    #[error(transparent)]
    Credentials(#[from] CredentialError),
    #[error(transparent)]
    Client(#[from] SapoError),
}

/// Entry point to the Sapo API for one execution.
#[derive(Debug)]
pub struct SapoApi {
    client: SapoClient,
}

impl SapoApi {
    /// Build the facade for `ctx`.
    ///
    /// # Errors
    ///
    /// Returns `NodeApiError` with message `Failed to initialize Sapo client`
    /// and the cause as description if the credentials are unavailable or the
    /// client rejects them.
    #[instrument(skip_all, fields(node = %ctx.node().name))]
    pub async fn connect(ctx: &ExecutionContext) -> Result<Self, NodeApiError> {
        let connected = match ctx.credential_provider().credentials(CREDENTIAL_TYPE).await {
            Ok(credentials) => {
                Self::from_credentials(&credentials, ctx.transport()).map_err(ConnectError::from)
            }
            Err(err) => Err(ConnectError::from(err)),
        };

        connected.map_err(|cause| {
            tracing::error!(error = %cause, "Failed to initialize Sapo client");
            NodeApiError::new(
                ctx.node().name.clone(),
                INIT_FAILURE_MESSAGE,
                Some(error_chain(&cause)),
            )
        })
    }

    /// Build the facade from credentials directly.
    ///
    /// # Errors
    ///
    /// Returns `SapoError::InvalidConfig` if the credentials are unusable.
    pub fn from_credentials(
        credentials: &SapoCredentials,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, SapoError> {
        let mut client = SapoClient::new(ClientConfig::private(credentials), transport)?;
        if let Some(token) = &credentials.access_token {
            client.set_access_token(token.clone());
        }
        tracing::debug!(
            store = %client.store(),
            access_token = client.has_access_token(),
            "Sapo client ready"
        );
        Ok(Self { client })
    }

    /// The underlying client.
    #[must_use]
    pub const fn client(&self) -> &SapoClient {
        &self.client
    }

    #[must_use]
    pub const fn products(&self) -> Products<'_> {
        self.client.products()
    }

    #[must_use]
    pub const fn orders(&self) -> Orders<'_> {
        self.client.orders()
    }

    #[must_use]
    pub const fn customers(&self) -> Customers<'_> {
        self.client.customers()
    }

    #[must_use]
    pub const fn collections(&self) -> Collections<'_> {
        self.client.collections()
    }

    #[must_use]
    pub const fn inventory(&self) -> Inventory<'_> {
        self.client.inventory()
    }

    #[must_use]
    pub const fn price_rules(&self) -> PriceRules<'_> {
        self.client.price_rules()
    }

    #[must_use]
    pub const fn fulfillments(&self) -> Fulfillments<'_> {
        self.client.fulfillments()
    }

    #[must_use]
    pub const fn metafields(&self) -> Metafields<'_> {
        self.client.metafields()
    }

    #[must_use]
    pub const fn pages(&self) -> Pages<'_> {
        self.client.pages()
    }

    #[must_use]
    pub const fn blogs(&self) -> Blogs<'_> {
        self.client.blogs()
    }

    #[must_use]
    pub const fn webhooks(&self) -> Webhooks<'_> {
        self.client.webhooks()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::node::{NodeIdentity, StaticCredentials};
    use crate::sapo::Auth;
    use crate::testing::{MockTransport, credentials, test_context};

    #[tokio::test]
    async fn test_connect_uses_basic_auth_without_token() {
        let transport = MockTransport::shared();
        let ctx = test_context("sapoProduct", json!({}), &transport);

        let api = SapoApi::connect(&ctx).await.expect("connect");
        assert!(!api.client().has_access_token());
        transport.respond_with(json!({"count": 1}));
        assert_eq!(api.products().count().await.expect("count"), 1);

        let request = transport.last_request().expect("request");
        assert!(matches!(request.auth, Auth::Basic { .. }));
    }

    #[tokio::test]
    async fn test_connect_attaches_access_token() {
        let transport = MockTransport::shared();
        let ctx = ExecutionContext::new(
            NodeIdentity::new("Products", "sapoProduct"),
            Arc::new(StaticCredentials::new(
                credentials().with_access_token("tok"),
            )),
            transport.clone(),
        );

        let api = SapoApi::connect(&ctx).await.expect("connect");
        assert!(api.client().has_access_token());
    }

    #[tokio::test]
    async fn test_connect_failure_is_a_host_error() {
        let transport = MockTransport::shared();
        let ctx = ExecutionContext::new(
            NodeIdentity::new("Products", "sapoProduct"),
            Arc::new(StaticCredentials::new(SapoCredentials::new(
                "https://shop.mysapo.net/admin",
                "k",
                "s",
            ))),
            transport.clone(),
        );

        let err = SapoApi::connect(&ctx).await.expect_err("invalid store");
        assert_eq!(err.node, "Products");
        assert_eq!(err.message, INIT_FAILURE_MESSAGE);
        assert!(
            err.description
                .as_deref()
                .is_some_and(|d| d.contains("bare domain"))
        );
    }
}
