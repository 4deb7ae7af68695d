//! Host configuration loaded from environment variables.
//!
//! Used by command-line hosts that run connectors outside a workflow engine;
//! the credentials it yields stand in for the engine's credential store.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SAPO_STORE` - Store domain (e.g., your-store.mysapo.net)
//! - `SAPO_API_KEY` - Private app API key (HIGH PRIVILEGE)
//! - `SAPO_SECRET_KEY` - Private app secret key (HIGH PRIVILEGE)
//!
//! ## Optional
//! - `SAPO_ACCESS_TOKEN` - Access token, sent instead of basic auth when set
//! - `SAPO_TIMEOUT_SECS` - HTTP request timeout (default: 30)
//! - `SAPO_LOG_FORMAT` - `json` for JSON logs, anything else for text
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Sentry error sample rate (default: 1.0)

use std::collections::HashMap;
use std::time::Duration;

use sapo_core::SapoCredentials;
use secrecy::SecretString;
use thiserror::Error;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.0;

/// Store name used in setup docs; never a real shop.
const STORE_PLACEHOLDER: &str = "your-store";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Connector host configuration.
#[derive(Debug, Clone)]
pub struct SapoConfig {
    /// Store credentials
    pub api: SapoApiConfig,
    /// HTTP request timeout
    pub timeout: Duration,
    pub telemetry: TelemetryConfig,
}

/// Logging and error tracking settings.
///
/// Loaded separately so commands that never touch the store can still log.
#[derive(Debug, Clone, Default)]
pub struct TelemetryConfig {
    pub log_format: LogFormat,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
}

/// Sapo private app credentials.
///
/// Implements `Debug` manually to redact the HIGH PRIVILEGE keys.
#[derive(Clone)]
pub struct SapoApiConfig {
    /// Store domain (e.g., your-store.mysapo.net)
    pub store: String,
    pub api_key: SecretString,
    pub secret_key: SecretString,
    pub access_token: Option<SecretString>,
}

impl std::fmt::Debug for SapoApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SapoApiConfig")
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

impl SapoConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api = SapoApiConfig::from_env()?;
        let timeout = get_env_or_default("SAPO_TIMEOUT_SECS", &DEFAULT_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| {
                ConfigError::InvalidEnvVar("SAPO_TIMEOUT_SECS".to_string(), e.to_string())
            })?;

        Ok(Self {
            api,
            timeout,
            telemetry: TelemetryConfig::from_env(),
        })
    }

    /// The store credentials in the form the connectors consume.
    #[must_use]
    pub fn credentials(&self) -> SapoCredentials {
        SapoCredentials {
            store: self.api.store.clone(),
            api_key: self.api.api_key.clone(),
            secret_key: self.api.secret_key.clone(),
            access_token: self.api.access_token.clone(),
        }
    }
}

impl TelemetryConfig {
    /// Load telemetry settings; never fails.
    #[must_use]
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        let log_format = match get_optional_env("SAPO_LOG_FORMAT").as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Self {
            log_format,
            sentry_dsn: get_optional_env("SENTRY_DSN").filter(|dsn| !dsn.is_empty()),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: get_optional_env("SENTRY_SAMPLE_RATE")
                .and_then(|s| s.parse().ok())
                .unwrap_or(1.0),
        }
    }
}

impl SapoApiConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let store = get_required_env("SAPO_STORE")?;
        validate_store(&store, "SAPO_STORE")?;

        let access_token = get_optional_env("SAPO_ACCESS_TOKEN")
            .filter(|token| !token.trim().is_empty())
            .map(|token| {
                validate_secret_strength(&token, "SAPO_ACCESS_TOKEN")?;
                Ok::<_, ConfigError>(SecretString::from(token))
            })
            .transpose()?;

        Ok(Self {
            store: store.trim().to_string(),
            api_key: get_validated_secret("SAPO_API_KEY")?,
            secret_key: get_validated_secret("SAPO_SECRET_KEY")?,
            access_token,
        })
    }
}

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// A store must be a bare domain: no scheme, path or credentials.
fn validate_store(store: &str, var_name: &str) -> Result<(), ConfigError> {
    let store = store.trim();
    if store.is_empty() || store.contains("://") || store.contains(['/', '@', '?', '#', ' ']) {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("must be a bare domain like shop.mysapo.net, got '{store}'"),
        ));
    }
    let subdomain = store.split('.').next().unwrap_or_default();
    if subdomain.eq_ignore_ascii_case(STORE_PLACEHOLDER) {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            "appears to be a placeholder".to_string(),
        ));
    }
    Ok(())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has reasonable entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Real private app keys are random hex
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Copy the key from the Sapo admin."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}
