//! The `sapoApi` credential type: its form, how it authenticates and how it
//! is smoke-tested.

use std::collections::BTreeMap;
use std::sync::Arc;

use sapo_core::SapoCredentials;
use serde::Serialize;
use tracing::instrument;

use crate::sapo::resources::extract_count;
use crate::sapo::{ACCESS_TOKEN_HEADER, ClientConfig, SapoClient, Transport};

/// Credential type name.
pub const CREDENTIAL_TYPE: &str = "sapoApi";

/// Path requested by the credential test, relative to `/admin/`.
pub const TEST_PATH: &str = "products/count.json";

/// One field of the credential form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialProperty {
    pub display_name: String,
    pub name: String,
    #[serde(rename = "type")]
    pub property_type: String,
    pub default: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    pub required: bool,
    /// Masked input.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub password: bool,
}

/// Generic authentication applied to every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Authenticate {
    pub headers: BTreeMap<String, String>,
}

/// Request the host issues to check a credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialTestRequest {
    pub base_url: String,
    pub url: String,
    pub method: String,
}

/// Declarative description of the `sapoApi` credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialDescriptor {
    pub name: String,
    pub display_name: String,
    pub documentation_url: String,
    pub properties: Vec<CredentialProperty>,
    pub authenticate: Authenticate,
    pub test: CredentialTestRequest,
}

impl CredentialDescriptor {
    /// The `sapoApi` descriptor.
    #[must_use]
    pub fn sapo_api() -> Self {
        let field = |display_name: &str, name: &str, password: bool| CredentialProperty {
            display_name: display_name.to_string(),
            name: name.to_string(),
            property_type: "string".to_string(),
            default: String::new(),
            placeholder: None,
            required: true,
            password,
        };

        Self {
            name: CREDENTIAL_TYPE.to_string(),
            display_name: "Sapo API".to_string(),
            documentation_url: "https://developers.sapo.vn/".to_string(),
            properties: vec![
                CredentialProperty {
                    placeholder: Some("your-store.mysapo.net".to_string()),
                    ..field("Store", "store", false)
                },
                field("API Key", "apiKey", true),
                field("Secret Key", "secretKey", true),
            ],
            authenticate: Authenticate {
                headers: BTreeMap::from([(
                    ACCESS_TOKEN_HEADER.to_string(),
                    "={{$credentials.accessToken}}".to_string(),
                )]),
            },
            test: CredentialTestRequest {
                base_url: "=https://{{$credentials.apiKey}}:{{$credentials.secretKey}}@{{$credentials.store}}"
                    .to_string(),
                url: format!("/admin/{TEST_PATH}"),
                method: "GET".to_string(),
            },
        }
    }
}

/// Outcome of a credential test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum CredentialTestResult {
    /// The store answered; `product_count` is present when it returned one.
    Ok {
        #[serde(skip_serializing_if = "Option::is_none")]
        product_count: Option<u64>,
    },
    /// The request failed.
    Failed { message: String },
}

impl CredentialTestResult {
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        matches!(self, Self::Ok { .. })
    }
}

/// Check `credentials` by counting products with basic auth.
///
/// The access token is not attached: the test proves the key pair.
#[instrument(skip_all, fields(store = %credentials.store))]
pub async fn test_credentials(
    credentials: &SapoCredentials,
    transport: Arc<dyn Transport>,
) -> CredentialTestResult {
    let response = match SapoClient::new(ClientConfig::private(credentials), transport) {
        Ok(client) => client.get(TEST_PATH, Vec::new()).await,
        Err(err) => Err(err),
    };

    match response {
        Ok(response) => {
            tracing::info!("Credential test succeeded");
            CredentialTestResult::Ok {
                product_count: extract_count(&response).ok(),
            }
        }
        Err(err) => {
            tracing::warn!(error = %err, "Credential test failed");
            CredentialTestResult::Failed {
                message: err.to_string(),
            }
        }
    }
}
