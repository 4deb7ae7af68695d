//! Parameter values of one input item and the declarative binder.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::error::ConnectorError;
use super::schema::NodeDescription;

/// Parameter name → value for one input item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterSet(Map<String, Value>);

impl ParameterSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a JSON object.
    ///
    /// # Errors
    ///
    /// Returns `ConnectorError::Parameter` if `value` is not an object.
    pub fn from_value(value: Value) -> Result<Self, ConnectorError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(ConnectorError::Parameter(format!(
                "parameters must be a JSON object, got {other}"
            ))),
        }
    }

    /// Set a parameter.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: Value) -> Self {
        self.0.insert(name.into(), value);
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// A string-valued parameter.
    #[must_use]
    pub fn string(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    /// The selected operation.
    #[must_use]
    pub fn operation(&self) -> Option<&str> {
        self.string("operation")
    }

    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Bind the parameters into a typed struct.
    ///
    /// # Errors
    ///
    /// Returns `ConnectorError::Parameter` naming the offending field if a
    /// parameter is missing or has the wrong type.
    pub fn bind<T: DeserializeOwned>(&self) -> Result<T, ConnectorError> {
        serde_json::from_value(Value::Object(self.0.clone()))
            .map_err(|e| ConnectorError::Parameter(e.to_string()))
    }

    /// Fill in the default of every property that is visible but unset.
    ///
    /// Visibility can depend on other defaults (`operation`, `resource`), so
    /// this repeats until nothing changes.
    #[must_use]
    pub fn with_defaults(mut self, description: &NodeDescription) -> Self {
        loop {
            let missing: Vec<_> = description
                .properties
                .iter()
                .filter(|p| !self.0.contains_key(&p.name) && p.is_visible(&self))
                .map(|p| (p.name.clone(), p.default.clone()))
                .collect();
            if missing.is_empty() {
                return self;
            }
            self.0.extend(missing);
        }
    }
}

impl From<Map<String, Value>> for ParameterSet {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// A JSON document parameter (`data`, `validationData`).
///
/// Accepts a JSON value, or a string holding JSON text. Only the syntax is
/// checked; the API judges the content.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct JsonDocument(Value);

impl JsonDocument {
    #[must_use]
    pub const fn new(value: Value) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn as_value(&self) -> &Value {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> Value {
        self.0
    }
}

impl<'de> Deserialize<'de> for JsonDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::String(text) => serde_json::from_str(&text)
                .map(Self)
                .map_err(|e| serde::de::Error::custom(format!("invalid JSON document: {e}"))),
            value => Ok(Self(value)),
        }
    }
}
