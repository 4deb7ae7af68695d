//! Building blocks shared by the connectors: operation enums, list
//! parameters, filter bags and schema helpers.

use sapo_core::{DEFAULT_LIMIT, Pagination};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use thiserror::Error;

use crate::node::{
    ConnectorError, JsonDocument, NodeProperty, ParameterSet, PropertyOption, PropertyType,
};
use crate::sapo::resources::Filters;

/// Name of the collection property holding list filters.
pub const ADDITIONAL_FIELDS: &str = "additionalFields";

/// An operation string that names no operation of the connector.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown operation: {0}")]
pub struct UnknownOperation(pub String);

/// A closed set of connector operations.
pub trait Operation: Copy + Send + Sync + 'static {
    /// Every operation, in schema order.
    const ALL: &'static [Self];

    /// Wire value (`getMany`).
    fn as_str(self) -> &'static str;

    /// Label shown in the operation picker.
    fn label(self) -> &'static str;
}

/// Define an operation enum with its wire values and labels.
///
/// Generates `FromStr` (failing with [`UnknownOperation`]), `Display` and an
/// [`Operation`] impl.
macro_rules! operation_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($variant:ident => ($value:literal, $label:literal),)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $(#[doc = $label] $variant,)+
        }

        impl $crate::connectors::common::Operation for $name {
            const ALL: &'static [Self] = &[$(Self::$variant,)+];

            fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $value,)+
                }
            }

            fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::connectors::common::UnknownOperation;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($value => Ok(Self::$variant),)+
                    other => Err($crate::connectors::common::UnknownOperation(other.to_owned())),
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::connectors::common::Operation::as_str(*self))
            }
        }
    };
}

pub(crate) use operation_enum;

/// Read the operation from `params`.
///
/// An absent or unrecognised operation is logged and yields `None`; the
/// connector then emits `{}`.
pub(crate) fn parse_operation<O>(params: &ParameterSet) -> Option<O>
where
    O: std::str::FromStr<Err = UnknownOperation>,
{
    let Some(raw) = params.operation() else {
        tracing::warn!("No operation selected");
        return None;
    };
    match raw.parse() {
        Ok(operation) => Some(operation),
        Err(UnknownOperation(operation)) => {
            tracing::warn!(%operation, "Unknown operation, emitting empty record");
            None
        }
    }
}

/// The `data` parameter of create/update style operations.
#[derive(Debug, Deserialize)]
pub(crate) struct Payload {
    pub data: JsonDocument,
}

impl Payload {
    pub(crate) fn bind(params: &ParameterSet) -> Result<Value, ConnectorError> {
        Ok(params.bind::<Self>()?.data.into_inner())
    }
}

/// Pagination plus the typed filter bag of a `getMany` operation.
#[derive(Debug)]
pub(crate) struct ListRequest<F> {
    pub pagination: Pagination,
    pub filters: F,
}

impl<F> ListRequest<F>
where
    F: DeserializeOwned + Serialize + Default,
{
    pub(crate) fn bind(params: &ParameterSet) -> Result<Self, ConnectorError> {
        Ok(Self {
            pagination: params.bind()?,
            filters: bind_filters(params)?,
        })
    }

    /// The filters, plus `limit` unless every result was requested.
    pub(crate) fn into_filters(self) -> Result<Filters, ConnectorError> {
        let mut bag = filter_bag(&self.filters)?;
        if let Some(limit) = self.pagination.effective_limit() {
            bag.insert("limit".to_string(), json!(limit));
        }
        Ok(bag)
    }
}

/// Bind `additionalFields` into a typed filter struct.
///
/// Blank entries (`""`, `null`) are dropped first; unknown keys are rejected
/// by the filter struct.
pub(crate) fn bind_filters<F>(params: &ParameterSet) -> Result<F, ConnectorError>
where
    F: DeserializeOwned + Default,
{
    match params.get(ADDITIONAL_FIELDS) {
        None | Some(Value::Null) => Ok(F::default()),
        Some(Value::Object(fields)) => {
            let fields: Map<String, Value> = fields
                .iter()
                .filter(|(_, value)| !is_blank(value))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect();
            serde_json::from_value(Value::Object(fields))
                .map_err(|e| ConnectorError::Parameter(format!("{ADDITIONAL_FIELDS}: {e}")))
        }
        Some(other) => Err(ConnectorError::Parameter(format!(
            "{ADDITIONAL_FIELDS} must be an object, got {other}"
        ))),
    }
}

/// Serialize a typed filter struct into the query bag, dropping unset fields.
pub(crate) fn filter_bag<F: Serialize>(filters: &F) -> Result<Filters, ConnectorError> {
    Ok(match serde_json::to_value(filters)? {
        Value::Object(map) => map.into_iter().filter(|(_, v)| !v.is_null()).collect(),
        _ => Filters::new(),
    })
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

// =============================================================================
// Schema helpers
// =============================================================================

fn operation_values<O: Operation>(operations: &[O]) -> Vec<&'static str> {
    operations.iter().map(|op| op.as_str()).collect()
}

/// The operation picker.
pub(crate) fn operation_property<O: Operation>(default: O) -> NodeProperty {
    NodeProperty::new("operation", "Operation", PropertyType::Options)
        .no_data_expression()
        .options(
            O::ALL
                .iter()
                .map(|op| PropertyOption::new(op.label(), op.as_str()))
                .collect(),
        )
        .default(json!(default.as_str()))
}

/// A required numeric ID shown for `operations`.
pub(crate) fn id_property<O: Operation>(
    name: &str,
    display_name: &str,
    description: &str,
    operations: &[O],
) -> NodeProperty {
    NodeProperty::new(name, display_name, PropertyType::Number)
        .default(json!(0))
        .required()
        .description(description)
        .show("operation", operation_values(operations))
}

/// `returnAll` and `limit` for `operations`.
pub(crate) fn pagination_properties<O: Operation>(operations: &[O]) -> Vec<NodeProperty> {
    vec![
        NodeProperty::new("returnAll", "Return All", PropertyType::Boolean)
            .default(json!(false))
            .no_data_expression()
            .description("Whether to return all results or only up to a given limit")
            .show("operation", operation_values(operations)),
        NodeProperty::new("limit", "Limit", PropertyType::Number)
            .default(json!(DEFAULT_LIMIT))
            .min_value(1)
            .description("Max number of results to return")
            .show("operation", operation_values(operations))
            .show("returnAll", [false]),
    ]
}

/// The `additionalFields` filter collection for `operations`.
pub(crate) fn filters_property<O: Operation>(
    operations: &[O],
    fields: Vec<NodeProperty>,
) -> NodeProperty {
    NodeProperty::new(ADDITIONAL_FIELDS, "Additional Fields", PropertyType::Collection)
        .default(json!({}))
        .placeholder("Add Field")
        .description("Filters sent with the request")
        .show("operation", operation_values(operations))
        .fields(fields)
}

/// A JSON `data` document for `operations`, pre-filled with `example`.
pub(crate) fn data_property<O: Operation>(operations: &[O], example: Value) -> NodeProperty {
    NodeProperty::new("data", "Data", PropertyType::Json)
        .default(example)
        .required()
        .description("Document sent to Sapo")
        .show("operation", operation_values(operations))
}

pub(crate) fn date_field(name: &str, display_name: &str) -> NodeProperty {
    NodeProperty::new(name, display_name, PropertyType::DateTime).default(json!(""))
}

pub(crate) fn string_field(name: &str, display_name: &str) -> NodeProperty {
    NodeProperty::new(name, display_name, PropertyType::String).default(json!(""))
}

/// An options filter from `(label, value)` pairs.
pub(crate) fn options_field(
    name: &str,
    display_name: &str,
    choices: &[(&str, &str)],
    default: &str,
) -> NodeProperty {
    NodeProperty::new(name, display_name, PropertyType::Options)
        .options(
            choices
                .iter()
                .map(|(label, value)| PropertyOption::new(*label, *value))
                .collect(),
        )
        .default(json!(default))
}

/// `created_at_min` / `created_at_max`.
pub(crate) fn created_fields() -> Vec<NodeProperty> {
    vec![
        date_field("created_at_min", "Created After"),
        date_field("created_at_max", "Created Before"),
    ]
}

/// `updated_at_min` / `updated_at_max`.
pub(crate) fn updated_fields() -> Vec<NodeProperty> {
    vec![
        date_field("updated_at_min", "Updated After"),
        date_field("updated_at_max", "Updated Before"),
    ]
}

/// Published-state filter shared by collections, pages and blogs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishedStatus {
    Published,
    Unpublished,
    Any,
}

pub(crate) fn published_status_field() -> NodeProperty {
    options_field(
        "published_status",
        "Published Status",
        &[
            ("Published", "published"),
            ("Unpublished", "unpublished"),
            ("Any", "any"),
        ],
        "any",
    )
}

#[cfg(test)]
mod tests {
    use sapo_core::FilterTimestamp;

    use super::*;

    operation_enum! {
        enum Probe {
            Get => ("get", "Get"),
            GetMany => ("getMany", "Get Many"),
        }
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(default, deny_unknown_fields)]
    struct ProbeFilters {
        created_at_min: Option<FilterTimestamp>,
        handle: Option<String>,
    }

    #[test]
    fn test_operation_enum() {
        assert_eq!("getMany".parse::<Probe>(), Ok(Probe::GetMany));
        assert_eq!(
            "explode".parse::<Probe>(),
            Err(UnknownOperation("explode".to_string()))
        );
        assert_eq!(Probe::Get.to_string(), "get");
        assert_eq!(Probe::ALL, &[Probe::Get, Probe::GetMany]);
    }

    #[test]
    fn test_parse_operation_unknown_is_none() {
        let params = ParameterSet::new().with("operation", json!("explode"));
        assert_eq!(parse_operation::<Probe>(&params), None);
        assert_eq!(parse_operation::<Probe>(&ParameterSet::new()), None);
    }

    #[test]
    fn test_list_request_merges_limit() {
        let params = ParameterSet::new()
            .with("returnAll", json!(false))
            .with("limit", json!(5))
            .with(
                ADDITIONAL_FIELDS,
                json!({"handle": "shoes", "created_at_min": ""}),
            );

        let filters = ListRequest::<ProbeFilters>::bind(&params)
            .and_then(ListRequest::into_filters)
            .expect("filters");

        assert_eq!(Value::Object(filters), json!({"handle": "shoes", "limit": 5}));
    }

    #[test]
    fn test_list_request_return_all_forwards_filters_only() {
        let params = ParameterSet::new()
            .with("returnAll", json!(true))
            .with("limit", json!(5))
            .with(ADDITIONAL_FIELDS, json!({"created_at_min": "2024-01-01T09:15:00"}));

        let filters = ListRequest::<ProbeFilters>::bind(&params)
            .and_then(ListRequest::into_filters)
            .expect("filters");

        assert_eq!(
            Value::Object(filters),
            json!({"created_at_min": "2024-01-01T09:15:00"})
        );
    }

    #[test]
    fn test_limit_floor_is_one() {
        let params = ParameterSet::new().with("limit", json!(0));
        let filters = ListRequest::<ProbeFilters>::bind(&params)
            .and_then(ListRequest::into_filters)
            .expect("filters");
        assert_eq!(filters.get("limit"), Some(&json!(1)));
    }

    #[test]
    fn test_unknown_filter_is_rejected() {
        let params = ParameterSet::new().with(ADDITIONAL_FIELDS, json!({"colour": "red"}));
        let err = bind_filters::<ProbeFilters>(&params).expect_err("unknown field");
        assert!(err.to_string().contains("colour"));
    }

    #[test]
    fn test_operation_property_lists_all_operations() {
        let property = operation_property(Probe::GetMany);
        assert_eq!(property.default, json!("getMany"));
        assert_eq!(property.options.len(), 2);
        assert_eq!(property.options[1].name, "Get Many");
    }
}
