//! HTTP transport for the Sapo Admin API.
//!
//! [`SapoClient`](super::SapoClient) turns every resource call into an
//! [`ApiRequest`]; a [`Transport`] performs it. The production transport is
//! [`HttpTransport`] (reqwest); tests substitute a recording double.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderValue, RETRY_AFTER};
use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::instrument;
use url::Url;

use super::{SapoError, format_api_errors};

/// Header carrying the access token on authenticated requests.
pub const ACCESS_TOKEN_HEADER: &str = "X-Sapo-Access-Token";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Seconds to wait when a 429 carries no usable `Retry-After`.
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// How a request authenticates.
#[derive(Clone)]
pub enum Auth {
    /// `X-Sapo-Access-Token: <token>`.
    AccessToken(SecretString),
    /// HTTP basic auth with the private app key pair.
    Basic {
        /// API key (basic-auth user).
        username: String,
        /// Secret key (basic-auth password).
        password: SecretString,
    },
}

impl std::fmt::Debug for Auth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AccessToken(_) => f.write_str("AccessToken([REDACTED])"),
            Self::Basic { .. } => f
                .debug_struct("Basic")
                .field("username", &"[REDACTED]")
                .field("password", &"[REDACTED]")
                .finish(),
        }
    }
}

/// A fully-resolved API request.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute URL, without query string.
    pub url: Url,
    /// Query parameters, in order.
    pub query: Vec<(String, String)>,
    /// JSON body, if any.
    pub body: Option<Value>,
    /// Authentication to apply.
    pub auth: Auth,
}

impl ApiRequest {
    /// Path component of the URL (e.g. `/admin/orders/1.json`).
    #[must_use]
    pub fn path(&self) -> &str {
        self.url.path()
    }

    /// Look up a query parameter by name.
    #[must_use]
    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Performs API requests.
///
/// Implementations return the decoded JSON body (`null` for an empty body)
/// or a [`SapoError`] for any non-success response.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one request.
    async fn send(&self, request: ApiRequest) -> Result<Value, SapoError>;
}

/// reqwest-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport with the default 30 second timeout.
    ///
    /// # Errors
    ///
    /// Returns `SapoError::Http` if the HTTP client cannot be built.
    pub fn new() -> Result<Self, SapoError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Create a transport with a custom request timeout.
    ///
    /// # Errors
    ///
    /// Returns `SapoError::Http` if the HTTP client cannot be built.
    pub fn with_timeout(timeout: Duration) -> Result<Self, SapoError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("sapo-connectors/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(
        skip(self, request),
        fields(method = %request.method, path = %request.url.path())
    )]
    async fn send(&self, request: ApiRequest) -> Result<Value, SapoError> {
        let path = request.url.path().to_owned();
        let mut builder = self.client.request(request.method, request.url);

        builder = match &request.auth {
            Auth::AccessToken(token) => builder.header(ACCESS_TOKEN_HEADER, token.expose_secret()),
            Auth::Basic { username, password } => {
                builder.basic_auth(username, Some(password.expose_secret()))
            }
        };
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        tracing::debug!(status = status.as_u16(), "Sapo API response");

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = parse_retry_after(response.headers().get(RETRY_AFTER));
            return Err(SapoError::RateLimited(retry_after));
        }

        let text = response.text().await?;
        decode_response(status, path, &text)
    }
}

/// Map a response status and body to the decoded JSON or an error.
///
/// Error bodies are parsed only to pull out Sapo's `errors`; a body that is
/// not JSON (an HTML error page from a proxy) falls back to the status reason.
fn decode_response(status: StatusCode, path: String, text: &str) -> Result<Value, SapoError> {
    if status.is_success() {
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        return Ok(serde_json::from_str(text)?);
    }

    let message = serde_json::from_str::<Value>(text)
        .ok()
        .and_then(|body| format_api_errors(&body))
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string());

    Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => SapoError::Unauthorized(message),
        StatusCode::NOT_FOUND => SapoError::NotFound(path),
        StatusCode::UNPROCESSABLE_ENTITY => SapoError::Validation(message),
        _ => SapoError::Api {
            status: status.as_u16(),
            message,
        },
    })
}

// Filtered to finite, non-negative values.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn parse_retry_after(value: Option<&HeaderValue>) -> u64 {
    value
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|secs| secs.is_finite() && *secs >= 0.0)
        .map_or(DEFAULT_RETRY_AFTER_SECS, |secs| secs.ceil() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_retry_after() {
        assert_eq!(parse_retry_after(None), 60);
        assert_eq!(parse_retry_after(Some(&HeaderValue::from_static("2.0"))), 2);
        assert_eq!(parse_retry_after(Some(&HeaderValue::from_static("1.5"))), 2);
        assert_eq!(parse_retry_after(Some(&HeaderValue::from_static("soon"))), 60);
    }

    #[test]
    fn test_auth_debug_redacts() {
        let auth = Auth::Basic {
            username: "key-abc".to_string(),
            password: SecretString::from("secret-xyz"),
        };
        let debug = format!("{auth:?}");
        assert!(!debug.contains("key-abc"));
        assert!(!debug.contains("secret-xyz"));

        let auth = Auth::AccessToken(SecretString::from("token-123"));
        assert!(!format!("{auth:?}").contains("token-123"));
    }

    #[test]
    fn test_query_value() {
        let request = ApiRequest {
            method: Method::GET,
            url: Url::parse("https://shop.mysapo.net/admin/orders.json").expect("url"),
            query: vec![("limit".to_string(), "5".to_string())],
            body: None,
            auth: Auth::AccessToken(SecretString::from("t")),
        };
        assert_eq!(request.path(), "/admin/orders.json");
        assert_eq!(request.query_value("limit"), Some("5"));
        assert_eq!(request.query_value("status"), None);
    }

    #[test]
    fn test_decode_success_bodies() {
        let body = decode_response(StatusCode::OK, String::new(), r#"{"count": 3}"#)
            .expect("json body");
        assert_eq!(body["count"], 3);
        assert_eq!(
            decode_response(StatusCode::OK, String::new(), "  ").expect("empty body"),
            Value::Null
        );
        assert!(matches!(
            decode_response(StatusCode::OK, String::new(), "<html>"),
            Err(SapoError::Parse(_))
        ));
    }

    #[test]
    fn test_decode_non_json_error_keeps_status() {
        let err = decode_response(
            StatusCode::NOT_FOUND,
            "/admin/orders/9.json".to_string(),
            "<html>Not Found</html>",
        )
        .expect_err("404");
        assert!(matches!(err, SapoError::NotFound(ref path) if path == "/admin/orders/9.json"));

        let err = decode_response(
            StatusCode::BAD_GATEWAY,
            String::new(),
            "<html><body>502 Bad Gateway</body></html>",
        )
        .expect_err("502");
        match err {
            SapoError::Api { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "Bad Gateway");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_decode_error_uses_sapo_errors() {
        let err = decode_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            String::new(),
            r#"{"errors": {"title": ["can't be blank"]}}"#,
        )
        .expect_err("422");
        match err {
            SapoError::Validation(message) => assert!(message.contains("can't be blank")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_http_transport_builds() {
        assert!(HttpTransport::with_timeout(Duration::from_secs(5)).is_ok());
    }
}
