//! Sapo API credential types.
//!
//! Credentials are created and edited by the host user. They are decrypted
//! once per execution and never persisted by the connectors.

use secrecy::SecretString;

/// Decrypted `sapoApi` credentials.
///
/// Implements `Debug` manually to redact the private app keys.
#[derive(Clone)]
pub struct SapoCredentials {
    /// Store domain (e.g., your-store.mysapo.net)
    pub store: String,
    /// Private app API key
    pub api_key: SecretString,
    /// Private app secret key
    pub secret_key: SecretString,
    /// Optional access token, sent as `X-Sapo-Access-Token` when present
    pub access_token: Option<SecretString>,
}

impl SapoCredentials {
    /// Create credentials without an access token.
    #[must_use]
    pub fn new(
        store: impl Into<String>,
        api_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        Self {
            store: store.into(),
            api_key: SecretString::from(api_key.into()),
            secret_key: SecretString::from(secret_key.into()),
            access_token: None,
        }
    }

    /// Attach an access token.
    #[must_use]
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(SecretString::from(token.into()));
        self
    }
}

impl std::fmt::Debug for SapoCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SapoCredentials")
            .field("store", &self.store)
            .field("api_key", &"[REDACTED]")
            .field("secret_key", &"[REDACTED]")
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}
