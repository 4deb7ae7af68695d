//! Sapo API client: store, credentials and request construction.

use std::sync::Arc;

use reqwest::Method;
use sapo_core::SapoCredentials;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use url::Url;

use super::resources::{
    Blogs, Collections, Customers, Fulfillments, Inventory, Metafields, Orders, Pages, PriceRules,
    Products, Webhooks,
};
use super::transport::{ApiRequest, Auth, Transport};
use super::SapoError;

/// Application type the keys belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClientMode {
    /// Private app: API key + secret key issued by the store owner.
    #[default]
    Private,
}

/// Construction parameters for [`SapoClient`].
///
/// Implements `Debug` manually to redact the keys.
#[derive(Clone)]
pub struct ClientConfig {
    /// Application type.
    pub mode: ClientMode,
    /// Private app API key.
    pub api_key: SecretString,
    /// Private app secret key.
    pub secret_key: SecretString,
    /// Store domain (e.g., your-store.mysapo.net).
    pub store: String,
}

impl ClientConfig {
    /// Private-app configuration from decrypted credentials.
    #[must_use]
    pub fn private(credentials: &SapoCredentials) -> Self {
        Self {
            mode: ClientMode::Private,
            api_key: credentials.api_key.clone(),
            secret_key: credentials.secret_key.clone(),
            store: credentials.store.clone(),
        }
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("mode", &self.mode)
            .field("api_key", &"[REDACTED]")
            .field("secret_key", &"[REDACTED]")
            .field("store", &self.store)
            .finish()
    }
}

/// Sapo Admin REST API client.
///
/// Built once per execution and handed to the connector explicitly. Resource
/// families are reached through borrowed sub-clients.
pub struct SapoClient {
    mode: ClientMode,
    store: String,
    base_url: Url,
    api_key: SecretString,
    secret_key: SecretString,
    access_token: Option<SecretString>,
    transport: Arc<dyn Transport>,
}

impl SapoClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns `SapoError::InvalidConfig` if the store is not a bare domain
    /// or a key is empty.
    pub fn new(config: ClientConfig, transport: Arc<dyn Transport>) -> Result<Self, SapoError> {
        let base_url = store_base_url(&config.store)?;
        if config.api_key.expose_secret().trim().is_empty() {
            return Err(SapoError::InvalidConfig("API key is empty".to_string()));
        }
        if config.secret_key.expose_secret().trim().is_empty() {
            return Err(SapoError::InvalidConfig("secret key is empty".to_string()));
        }

        Ok(Self {
            mode: config.mode,
            store: config.store.trim().to_owned(),
            base_url,
            api_key: config.api_key,
            secret_key: config.secret_key,
            access_token: None,
            transport,
        })
    }

    /// Authenticate subsequent requests with an access token instead of
    /// basic auth.
    pub fn set_access_token(&mut self, token: SecretString) {
        self.access_token = Some(token);
    }

    /// Get the store domain.
    #[must_use]
    pub fn store(&self) -> &str {
        &self.store
    }

    /// Get the application type.
    #[must_use]
    pub const fn mode(&self) -> ClientMode {
        self.mode
    }

    /// Whether requests carry an access token.
    #[must_use]
    pub const fn has_access_token(&self) -> bool {
        self.access_token.is_some()
    }

    // =========================================================================
    // Resource families
    // =========================================================================

    /// Products.
    #[must_use]
    pub const fn products(&self) -> Products<'_> {
        Products::new(self)
    }

    /// Orders.
    #[must_use]
    pub const fn orders(&self) -> Orders<'_> {
        Orders::new(self)
    }

    /// Customers.
    #[must_use]
    pub const fn customers(&self) -> Customers<'_> {
        Customers::new(self)
    }

    /// Custom and smart collections.
    #[must_use]
    pub const fn collections(&self) -> Collections<'_> {
        Collections::new(self)
    }

    /// Inventory levels, transfers and locations.
    #[must_use]
    pub const fn inventory(&self) -> Inventory<'_> {
        Inventory::new(self)
    }

    /// Price rules.
    #[must_use]
    pub const fn price_rules(&self) -> PriceRules<'_> {
        PriceRules::new(self)
    }

    /// Order fulfillments and their events.
    #[must_use]
    pub const fn fulfillments(&self) -> Fulfillments<'_> {
        Fulfillments::new(self)
    }

    /// Metafields on any owner resource.
    #[must_use]
    pub const fn metafields(&self) -> Metafields<'_> {
        Metafields::new(self)
    }

    /// Static pages.
    #[must_use]
    pub const fn pages(&self) -> Pages<'_> {
        Pages::new(self)
    }

    /// Blogs, articles and comments.
    #[must_use]
    pub const fn blogs(&self) -> Blogs<'_> {
        Blogs::new(self)
    }

    /// Webhook subscriptions.
    #[must_use]
    pub const fn webhooks(&self) -> Webhooks<'_> {
        Webhooks::new(self)
    }

    // =========================================================================
    // Request plumbing
    // =========================================================================

    fn auth(&self) -> Auth {
        self.access_token.as_ref().map_or_else(
            || Auth::Basic {
                username: self.api_key.expose_secret().to_owned(),
                password: self.secret_key.clone(),
            },
            |token| Auth::AccessToken(token.clone()),
        )
    }

    /// Send a request to `/admin/{path}`.
    pub(crate) async fn request(
        &self,
        method: Method,
        path: &str,
        query: Vec<(String, String)>,
        body: Option<Value>,
    ) -> Result<Value, SapoError> {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| SapoError::InvalidConfig(format!("invalid API path {path}: {e}")))?;

        tracing::debug!(method = %method, path = %url.path(), "Sapo API request");

        self.transport
            .send(ApiRequest {
                method,
                url,
                query,
                body,
                auth: self.auth(),
            })
            .await
    }

    pub(crate) async fn get(
        &self,
        path: &str,
        query: Vec<(String, String)>,
    ) -> Result<Value, SapoError> {
        self.request(Method::GET, path, query, None).await
    }

    pub(crate) async fn post(&self, path: &str, body: Value) -> Result<Value, SapoError> {
        self.request(Method::POST, path, Vec::new(), Some(body)).await
    }

    pub(crate) async fn put(&self, path: &str, body: Value) -> Result<Value, SapoError> {
        self.request(Method::PUT, path, Vec::new(), Some(body)).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<Value, SapoError> {
        self.request(Method::DELETE, path, Vec::new(), None).await
    }
}

impl std::fmt::Debug for SapoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SapoClient")
            .field("mode", &self.mode)
            .field("store", &self.store)
            .field("has_access_token", &self.has_access_token())
            .finish_non_exhaustive()
    }
}

/// `https://{store}/admin/` for a bare store domain.
fn store_base_url(store: &str) -> Result<Url, SapoError> {
    let store = store.trim();
    if store.is_empty() {
        return Err(SapoError::InvalidConfig("store domain is empty".to_string()));
    }
    if store.contains("://") || store.contains(['/', '@', '?', '#']) {
        return Err(SapoError::InvalidConfig(format!(
            "store must be a bare domain like your-store.mysapo.net, got {store}"
        )));
    }

    let url = Url::parse(&format!("https://{store}/admin/"))
        .map_err(|e| SapoError::InvalidConfig(format!("invalid store domain {store}: {e}")))?;
    if url.host_str().is_none_or(str::is_empty) {
        return Err(SapoError::InvalidConfig(format!(
            "invalid store domain {store}"
        )));
    }
    Ok(url)
}
