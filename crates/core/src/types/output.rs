//! Output records returned to the workflow host.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// A single JSON payload wrapped for the host (`{"json": <payload>}`).
///
/// The payload is either the raw API response or one of the synthesized
/// shapes below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputRecord {
    /// The payload handed to the next node.
    pub json: Value,
}

impl OutputRecord {
    /// Wrap a raw payload.
    #[must_use]
    pub const fn new(json: Value) -> Self {
        Self { json }
    }

    /// `{"success": true}` for operations whose API call returns no body.
    #[must_use]
    pub fn success() -> Self {
        Self::new(json!({ "success": true }))
    }

    /// `{"count": n}` for count operations.
    #[must_use]
    pub fn count(count: u64) -> Self {
        Self::new(json!({ "count": count }))
    }

    /// `{"error": message}` for failures suppressed by continue-on-fail.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(json!({ "error": message.into() }))
    }

    /// `{}`, emitted when the operation value is not recognised.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(Value::Object(serde_json::Map::new()))
    }

    /// Whether this record carries a suppressed error.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.json.get("error").is_some()
    }
}
