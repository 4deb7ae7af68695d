//! Declarative node descriptions: the parameter form a host renders.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use super::params::ParameterSet;

/// Kind of input a property renders as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PropertyType {
    String,
    Number,
    Boolean,
    Options,
    /// Optional sub-fields, added one at a time.
    Collection,
    Json,
    DateTime,
}

/// One choice of an `options` property.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyOption {
    pub name: String,
    pub value: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PropertyOption {
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            description: None,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// When a property is shown: every listed parameter must hold one of its
/// listed values.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DisplayOptions {
    pub show: BTreeMap<String, Vec<Value>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
struct TypeOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    min_value: Option<i64>,
}

/// A single parameter of a node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeProperty {
    pub display_name: String,
    pub name: String,
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    pub default: Value,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub no_data_expression: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_options: Option<DisplayOptions>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<PropertyOption>,
    /// Sub-fields of a `collection` property.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<Self>,
    #[serde(skip_serializing_if = "Option::is_none")]
    type_options: Option<TypeOptions>,
}

impl NodeProperty {
    /// A property with a `null` default, shown unconditionally.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        display_name: impl Into<String>,
        property_type: PropertyType,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            name: name.into(),
            property_type,
            default: Value::Null,
            required: false,
            no_data_expression: false,
            description: None,
            placeholder: None,
            display_options: None,
            options: Vec::new(),
            fields: Vec::new(),
            type_options: None,
        }
    }

    #[must_use]
    pub fn default(mut self, default: Value) -> Self {
        self.default = default;
        self
    }

    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// The value must be a literal, not an expression.
    #[must_use]
    pub const fn no_data_expression(mut self) -> Self {
        self.no_data_expression = true;
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    #[must_use]
    pub fn options(mut self, options: Vec<PropertyOption>) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn fields(mut self, fields: Vec<Self>) -> Self {
        self.fields = fields;
        self
    }

    #[must_use]
    pub const fn min_value(mut self, min: i64) -> Self {
        self.type_options = Some(TypeOptions {
            min_value: Some(min),
        });
        self
    }

    /// Only show this property when `parameter` holds one of `values`.
    #[must_use]
    pub fn show<I>(mut self, parameter: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        self.display_options
            .get_or_insert_with(DisplayOptions::default)
            .show
            .insert(
                parameter.into(),
                values.into_iter().map(Into::into).collect(),
            );
        self
    }

    /// Minimum numeric value, if declared.
    #[must_use]
    pub fn min(&self) -> Option<i64> {
        self.type_options.as_ref().and_then(|t| t.min_value)
    }

    /// Whether the property is shown for the given parameter values.
    #[must_use]
    pub fn is_visible(&self, params: &ParameterSet) -> bool {
        self.display_options.as_ref().is_none_or(|display| {
            display.show.iter().all(|(parameter, allowed)| {
                params
                    .get(parameter)
                    .is_some_and(|value| allowed.contains(value))
            })
        })
    }
}

/// Default values for a newly placed node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeDefaults {
    pub name: String,
}

/// Credential type a node needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CredentialRequirement {
    pub name: String,
    pub required: bool,
}

/// Full declarative description of a connector.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDescription {
    pub display_name: String,
    pub name: String,
    pub icon: String,
    pub group: Vec<String>,
    pub version: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    pub description: String,
    pub defaults: NodeDefaults,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
    pub credentials: Vec<CredentialRequirement>,
    pub properties: Vec<NodeProperty>,
}

impl NodeDescription {
    /// A version 1 transform node with one main input and output and no
    /// properties yet.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        display_name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        let display_name = display_name.into();
        Self {
            defaults: NodeDefaults {
                name: display_name.clone(),
            },
            display_name,
            name: name.into(),
            icon: "file:sapo.svg".to_string(),
            group: vec!["transform".to_string()],
            version: 1,
            subtitle: None,
            description: description.into(),
            inputs: vec!["main".to_string()],
            outputs: vec!["main".to_string()],
            credentials: Vec::new(),
            properties: Vec::new(),
        }
    }

    #[must_use]
    pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    /// Require credentials of `name`.
    #[must_use]
    pub fn credential(mut self, name: impl Into<String>) -> Self {
        self.credentials.push(CredentialRequirement {
            name: name.into(),
            required: true,
        });
        self
    }

    #[must_use]
    pub fn properties(mut self, properties: Vec<NodeProperty>) -> Self {
        self.properties = properties;
        self
    }

    /// Look up every property called `name` (a name may be declared once per
    /// visibility condition).
    pub fn properties_named<'a, 'n>(
        &'a self,
        name: &'n str,
    ) -> impl Iterator<Item = &'a NodeProperty> {
        self.properties.iter().filter(move |p| p.name == name)
    }

    /// The first property called `name`.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&NodeProperty> {
        self.properties.iter().find(|p| p.name == name)
    }
}
