//! `sapoMetafield`: metafields of any owner resource, bulk deletion and local
//! value validation.

use async_trait::async_trait;
use sapo_core::{FilterTimestamp, MetafieldId, OutputRecord, ResourceId};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::common::{
    ListRequest, Operation, Payload, bind_filters, created_fields, data_property, filter_bag,
    filters_property, id_property, operation_enum, operation_property, pagination_properties,
    parse_operation, string_field,
};
use crate::credentials::CREDENTIAL_TYPE;
use crate::facade::SapoApi;
use crate::node::{
    Connector, ConnectorError, JsonDocument, NodeDescription, NodeProperty, ParameterSet,
    PropertyOption, PropertyType,
};
use crate::sapo::SapoError;
use crate::sapo::resources::{MetafieldOwner, MetafieldOwnerType, MetafieldValidation};

operation_enum! {
    /// Operations of the metafield connector.
    pub enum MetafieldOperation {
        BulkDelete => ("bulkDelete", "Bulk Delete"),
        Count => ("count", "Count"),
        Create => ("create", "Create"),
        Delete => ("delete", "Delete"),
        Get => ("get", "Get"),
        GetMany => ("getMany", "Get Many"),
        Update => ("update", "Update"),
        Validate => ("validate", "Validate"),
    }
}

/// Filters of `getMany`, `count` and `bulkDelete`.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MetafieldFilters {
    pub namespace: Option<String>,
    pub key: Option<String>,
    pub created_at_min: Option<FilterTimestamp>,
    pub created_at_max: Option<FilterTimestamp>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OwnerParams {
    resource: String,
    resource_id: ResourceId,
}

impl OwnerParams {
    fn owner(&self) -> MetafieldOwner {
        MetafieldOwner::new(
            MetafieldOwnerType::from_resource(&self.resource),
            self.resource_id,
        )
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MetafieldRef {
    metafield_id: MetafieldId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ValidateParams {
    validation_data: JsonDocument,
}

fn resource_property() -> NodeProperty {
    let label = |owner: MetafieldOwnerType| match owner {
        MetafieldOwnerType::Article => "Article",
        MetafieldOwnerType::Blog => "Blog",
        MetafieldOwnerType::Collection => "Collection",
        MetafieldOwnerType::Customer => "Customer",
        MetafieldOwnerType::Order => "Order",
        MetafieldOwnerType::Page => "Page",
        MetafieldOwnerType::Product => "Product",
        MetafieldOwnerType::Variant => "Product Variant",
    };

    NodeProperty::new("resource", "Resource", PropertyType::Options)
        .no_data_expression()
        .options(
            MetafieldOwnerType::ALL
                .into_iter()
                .map(|owner| PropertyOption::new(label(owner), owner.plural()))
                .collect(),
        )
        .default(json!(MetafieldOwnerType::Product.plural()))
        .required()
}

/// The `sapoMetafield` connector.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetafieldConnector;

#[async_trait]
impl Connector for MetafieldConnector {
    fn type_name(&self) -> &'static str {
        "sapoMetafield"
    }

    fn description(&self) -> NodeDescription {
        use MetafieldOperation::{BulkDelete, Count, Create, Delete, Get, GetMany, Update, Validate};

        let mut fields = vec![
            string_field("namespace", "Namespace").description("Filter by metafield namespace"),
            string_field("key", "Key").description("Filter by metafield key"),
        ];
        fields.extend(created_fields());

        let mut properties = vec![
            operation_property(GetMany),
            resource_property(),
            NodeProperty::new("resourceId", "Resource ID", PropertyType::Number)
                .default(json!(0))
                .required()
                .description("ID of the resource owning the metafields"),
            id_property(
                "metafieldId",
                "Metafield ID",
                "ID of the metafield",
                &[Get, Update, Delete],
            ),
        ];
        properties.extend(pagination_properties(&[GetMany]));
        properties.push(filters_property(&[GetMany, BulkDelete, Count], fields));
        properties.push(
            data_property(
                &[Create, Update],
                json!({
                    "namespace": "inventory",
                    "key": "warehouse_location",
                    "value": "A-12",
                    "value_type": "string",
                    "description": "Storage location in warehouse",
                }),
            )
            .no_data_expression(),
        );
        properties.push(
            NodeProperty::new("validationData", "Validation Data", PropertyType::Json)
                .default(json!({"type": "string", "value": "test value"}))
                .required()
                .no_data_expression()
                .description("Type and value to check")
                .show("operation", [Validate.as_str()]),
        );

        NodeDescription::new(
            self.type_name(),
            "Sapo Metafield",
            "Manage metafields of products, orders, customers and other resources in Sapo",
        )
        .subtitle("={{$parameter[\"operation\"] + \": \" + $parameter[\"resource\"]}}")
        .credential(CREDENTIAL_TYPE)
        .properties(properties)
    }

    async fn run(
        &self,
        api: &SapoApi,
        params: &ParameterSet,
    ) -> Result<OutputRecord, ConnectorError> {
        let Some(operation) = parse_operation::<MetafieldOperation>(params) else {
            return Ok(OutputRecord::empty());
        };
        tracing::debug!(operation = operation.as_str(), "Running metafield operation");
        let metafields = api.metafields();
        let owner = || params.bind::<OwnerParams>().map(|p| p.owner());
        let metafield_id = || params.bind::<MetafieldRef>().map(|r| r.metafield_id);

        Ok(match operation {
            MetafieldOperation::Create => {
                OutputRecord::new(metafields.create(&owner()?, Payload::bind(params)?).await?)
            }
            MetafieldOperation::Get => {
                OutputRecord::new(metafields.get(&owner()?, metafield_id()?).await?)
            }
            MetafieldOperation::GetMany => {
                let filters = ListRequest::<MetafieldFilters>::bind(params)?.into_filters()?;
                OutputRecord::new(metafields.list(&owner()?, &filters).await?)
            }
            MetafieldOperation::Update => OutputRecord::new(
                metafields
                    .update(&owner()?, metafield_id()?, Payload::bind(params)?)
                    .await?,
            ),
            MetafieldOperation::Delete => {
                metafields.delete(&owner()?, metafield_id()?).await?;
                OutputRecord::success()
            }
            MetafieldOperation::BulkDelete => {
                let filters = filter_bag(&bind_filters::<MetafieldFilters>(params)?)?;
                OutputRecord::new(metafields.bulk_delete(&owner()?, &filters).await?)
            }
            MetafieldOperation::Count => {
                let filters = filter_bag(&bind_filters::<MetafieldFilters>(params)?)?;
                OutputRecord::count(metafields.count(&owner()?, &filters).await?)
            }
            MetafieldOperation::Validate => {
                let ValidateParams { validation_data } = params.bind()?;
                let validation: MetafieldValidation =
                    serde_json::from_value(validation_data.into_inner())?;
                match metafields.validate_value(&validation) {
                    Ok(()) => OutputRecord::new(json!({ "valid": true })),
                    Err(SapoError::Validation(message)) => {
                        return Err(ConnectorError::Validation(message));
                    }
                    Err(err) => return Err(err.into()),
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::execute;
    use crate::testing::{MockTransport, test_context};

    #[tokio::test]
    async fn test_owner_path_from_resource() {
        let transport = MockTransport::shared();
        let ctx = test_context(
            "sapoMetafield",
            json!({
                "operation": "get",
                "resource": "customers",
                "resourceId": 12,
                "metafieldId": 4,
            }),
            &transport,
        );

        execute(&MetafieldConnector, &ctx).await.expect("execute");

        assert_eq!(
            transport.last_request().expect("request").path(),
            "/admin/customers/12/metafields/4.json"
        );
    }

    #[tokio::test]
    async fn test_unknown_resource_falls_back_to_products() {
        let transport = MockTransport::shared();
        let ctx = test_context(
            "sapoMetafield",
            json!({"operation": "count", "resource": "gift_cards", "resourceId": 12}),
            &transport,
        );
        transport.respond_with(json!({"count": 2}));

        let batches = execute(&MetafieldConnector, &ctx).await.expect("execute");

        assert_eq!(batches[0][0].json, json!({"count": 2}));
        let request = transport.last_request().expect("request");
        assert_eq!(request.path(), "/admin/products/12/metafields/count.json");
    }

    #[tokio::test]
    async fn test_count_forwards_filters_without_limit() {
        let transport = MockTransport::shared();
        let ctx = test_context(
            "sapoMetafield",
            json!({
                "operation": "count",
                "resource": "orders",
                "resourceId": 1,
                "additionalFields": {"namespace": "inventory"},
            }),
            &transport,
        );
        transport.respond_with(json!({"count": 1}));

        let batches = execute(&MetafieldConnector, &ctx).await.expect("execute");

        assert_eq!(batches[0][0].json, json!({"count": 1}));
        let request = transport.last_request().expect("request");
        assert_eq!(request.query_value("namespace"), Some("inventory"));
        assert_eq!(request.query_value("limit"), None);
    }

    #[tokio::test]
    async fn test_validate_default_document_is_valid() {
        let transport = MockTransport::shared();
        let ctx = test_context("sapoMetafield", json!({"operation": "validate"}), &transport);

        let batches = execute(&MetafieldConnector, &ctx).await.expect("execute");

        assert_eq!(batches[0][0].json, json!({"valid": true}));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_validate_rejects_mismatched_value() {
        let transport = MockTransport::shared();
        let ctx = test_context(
            "sapoMetafield",
            json!({"operation": "validate", "validationData": {"type": "integer", "value": "12a"}}),
            &transport,
        )
        .with_continue_on_fail(true);

        let batches = execute(&MetafieldConnector, &ctx).await.expect("suppressed");

        let message = batches[0][0].json["error"].as_str().expect("error message");
        assert!(message.starts_with("Validation failed"));
    }
}
