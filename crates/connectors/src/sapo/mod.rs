//! Sapo Admin REST API client.
//!
//! # Security
//!
//! The client carries private app keys with full access to the store:
//! products, orders, customers, inventory, content and webhooks. Keys are held
//! as `SecretString` and never logged.
//!
//! # Architecture
//!
//! - [`SapoClient`] knows the store and the credentials and builds requests
//! - [`Transport`] performs the HTTP exchange ([`HttpTransport`] in production,
//!   a recording double in tests)
//! - One borrowed sub-client per resource family (`client.orders()`, ...)
//!
//! # Example
//!
//! ```rust,ignore
//! use sapo_connectors::sapo::{ClientConfig, HttpTransport, SapoClient};
//!
//! let client = SapoClient::new(ClientConfig::private(&credentials), transport)?;
//!
//! // Get a specific order
//! let order = client.orders().get(OrderId::new(123)).await?;
//!
//! // Count products
//! let count = client.products().count().await?;
//! ```

mod client;
pub mod resources;
mod transport;

pub use client::{ClientConfig, ClientMode, SapoClient};
pub use transport::{ACCESS_TOKEN_HEADER, ApiRequest, Auth, HttpTransport, Transport};

use serde_json::Value;
use thiserror::Error;

/// Errors that can occur when interacting with the Sapo Admin API.
#[derive(Debug, Error)]
pub enum SapoError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by Sapo.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Authentication/authorization failed.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The API rejected the submitted document.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Any other non-success response.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from the response body.
        message: String,
    },

    /// Client configuration is unusable (bad store domain, ...).
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The response did not have the expected shape.
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

/// Flatten a Sapo `errors` field into one message.
///
/// Sapo returns either `{"errors": "message"}` or
/// `{"errors": {"field": ["message", ...]}}`.
pub(crate) fn format_api_errors(body: &Value) -> Option<String> {
    match body.get("errors")? {
        Value::String(message) => Some(message.clone()),
        Value::Object(fields) => Some(
            fields
                .iter()
                .map(|(field, messages)| match messages {
                    Value::Array(list) => format!(
                        "{field}: {}",
                        list.iter()
                            .map(|m| m.as_str().map_or_else(|| m.to_string(), String::from))
                            .collect::<Vec<_>>()
                            .join(", ")
                    ),
                    Value::String(message) => format!("{field}: {message}"),
                    other => format!("{field}: {other}"),
                })
                .collect::<Vec<_>>()
                .join("; "),
        ),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_sapo_error_display() {
        let err = SapoError::NotFound("/admin/orders/1.json".to_string());
        assert_eq!(err.to_string(), "Not found: /admin/orders/1.json");

        let err = SapoError::Api {
            status: 500,
            message: "Internal error".to_string(),
        };
        assert_eq!(err.to_string(), "API error (500): Internal error");
    }

    #[test]
    fn test_rate_limited_error() {
        let err = SapoError::RateLimited(60);
        assert_eq!(err.to_string(), "Rate limited, retry after 60 seconds");
    }

    #[test]
    fn test_format_api_errors_string() {
        let body = json!({"errors": "Not Found"});
        assert_eq!(format_api_errors(&body).as_deref(), Some("Not Found"));
    }

    #[test]
    fn test_format_api_errors_fields() {
        let body = json!({
            "errors": {"title": ["can't be blank"], "handle": ["is taken", "is too short"]}
        });
        let message = format_api_errors(&body).expect("errors present");
        assert!(message.contains("title: can't be blank"));
        assert!(message.contains("handle: is taken, is too short"));
    }

    #[test]
    fn test_format_api_errors_absent() {
        assert_eq!(format_api_errors(&json!({"order": {}})), None);
    }
}
