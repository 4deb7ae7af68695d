//! `sapoCollection`: custom and smart collections, collection membership and
//! manual product ordering.

use async_trait::async_trait;
use sapo_core::{CollectionId, FilterTimestamp, OutputRecord, ProductId};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::common::{
    ListRequest, Operation, Payload, PublishedStatus, data_property, filters_property,
    id_property, operation_enum, operation_property, pagination_properties, parse_operation,
    published_status_field, string_field, updated_fields,
};
use crate::credentials::CREDENTIAL_TYPE;
use crate::facade::SapoApi;
use crate::node::{
    Connector, ConnectorError, NodeDescription, NodeProperty, ParameterSet, PropertyType,
};

operation_enum! {
    /// Operations of the collection connector.
    pub enum CollectionOperation {
        AddProduct => ("addProduct", "Add Product"),
        Count => ("count", "Count"),
        CreateCustom => ("createCustom", "Create Custom Collection"),
        CreateSmart => ("createSmart", "Create Smart Collection"),
        DeleteCustom => ("deleteCustom", "Delete Custom Collection"),
        DeleteSmart => ("deleteSmart", "Delete Smart Collection"),
        Get => ("get", "Get"),
        GetMany => ("getMany", "Get Many"),
        RemoveProduct => ("removeProduct", "Remove Product"),
        SetProductOrder => ("setProductOrder", "Set Product Order"),
        UpdateCustom => ("updateCustom", "Update Custom Collection"),
        UpdateSmart => ("updateSmart", "Update Smart Collection"),
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CollectionFilters {
    pub handle: Option<String>,
    pub published_status: Option<PublishedStatus>,
    pub updated_at_min: Option<FilterTimestamp>,
    pub updated_at_max: Option<FilterTimestamp>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CollectionRef {
    collection_id: CollectionId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MembershipParams {
    collection_id: CollectionId,
    product_id: ProductId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderingParams {
    collection_id: CollectionId,
    product_ids: String,
}

/// Parse a comma-separated list of product IDs (`"3, 1, 2"`), keeping order.
///
/// # Errors
///
/// Returns `ConnectorError::Parameter` naming the first entry that is not an
/// integer.
pub fn parse_product_ids(raw: &str) -> Result<Vec<ProductId>, ConnectorError> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            entry.parse::<i64>().map(ProductId::new).map_err(|_| {
                ConnectorError::Parameter(format!("productIds: '{entry}' is not a product ID"))
            })
        })
        .collect()
}

/// The `sapoCollection` connector.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollectionConnector;

#[async_trait]
impl Connector for CollectionConnector {
    fn type_name(&self) -> &'static str {
        "sapoCollection"
    }

    fn description(&self) -> NodeDescription {
        use CollectionOperation::{
            AddProduct, CreateCustom, CreateSmart, DeleteCustom, DeleteSmart, Get, GetMany,
            RemoveProduct, SetProductOrder, UpdateCustom, UpdateSmart,
        };

        let mut fields = vec![string_field("handle", "Handle"), published_status_field()];
        fields.extend(updated_fields());

        let mut properties = vec![
            operation_property(GetMany),
            id_property(
                "collectionId",
                "Collection ID",
                "ID of the collection",
                &[
                    Get,
                    UpdateCustom,
                    UpdateSmart,
                    DeleteCustom,
                    DeleteSmart,
                    AddProduct,
                    RemoveProduct,
                    SetProductOrder,
                ],
            ),
            id_property(
                "productId",
                "Product ID",
                "ID of the product to add or remove",
                &[AddProduct, RemoveProduct],
            ),
            NodeProperty::new("productIds", "Product IDs", PropertyType::String)
                .default(json!(""))
                .required()
                .placeholder("3, 1, 2")
                .description("Comma-separated product IDs in the desired order")
                .show("operation", [SetProductOrder.as_str()]),
        ];
        properties.extend(pagination_properties(&[GetMany]));
        properties.push(filters_property(&[GetMany], fields));
        properties.push(data_property(
            &[CreateCustom, UpdateCustom],
            json!({
                "title": "My Collection",
                "body_html": "<p>Collection description</p>",
                "published": true,
            }),
        ));
        properties.push(data_property(
            &[CreateSmart, UpdateSmart],
            json!({
                "title": "My Smart Collection",
                "rules": [{"column": "title", "relation": "contains", "condition": "shirt"}],
            }),
        ));

        NodeDescription::new(
            self.type_name(),
            "Sapo Collection",
            "Manage custom and smart collections in Sapo",
        )
        .subtitle("={{$parameter[\"operation\"]}}")
        .credential(CREDENTIAL_TYPE)
        .properties(properties)
    }

    async fn run(
        &self,
        api: &SapoApi,
        params: &ParameterSet,
    ) -> Result<OutputRecord, ConnectorError> {
        let Some(operation) = parse_operation::<CollectionOperation>(params) else {
            return Ok(OutputRecord::empty());
        };
        tracing::debug!(operation = operation.as_str(), "Running collection operation");
        let collections = api.collections();
        let collection_id = || params.bind::<CollectionRef>().map(|r| r.collection_id);

        Ok(match operation {
            CollectionOperation::Get => OutputRecord::new(collections.get(collection_id()?).await?),
            CollectionOperation::GetMany => {
                let filters = ListRequest::<CollectionFilters>::bind(params)?.into_filters()?;
                OutputRecord::new(collections.list(&filters).await?)
            }
            CollectionOperation::Count => OutputRecord::count(collections.count().await?),
            CollectionOperation::CreateCustom => {
                OutputRecord::new(collections.create_custom(Payload::bind(params)?).await?)
            }
            CollectionOperation::UpdateCustom => OutputRecord::new(
                collections
                    .update_custom(collection_id()?, Payload::bind(params)?)
                    .await?,
            ),
            CollectionOperation::DeleteCustom => {
                collections.delete_custom(collection_id()?).await?;
                OutputRecord::success()
            }
            CollectionOperation::CreateSmart => {
                OutputRecord::new(collections.create_smart(Payload::bind(params)?).await?)
            }
            CollectionOperation::UpdateSmart => OutputRecord::new(
                collections
                    .update_smart(collection_id()?, Payload::bind(params)?)
                    .await?,
            ),
            CollectionOperation::DeleteSmart => {
                collections.delete_smart(collection_id()?).await?;
                OutputRecord::success()
            }
            CollectionOperation::AddProduct => {
                let MembershipParams {
                    collection_id,
                    product_id,
                } = params.bind()?;
                collections.add_product(collection_id, product_id).await?;
                OutputRecord::success()
            }
            CollectionOperation::RemoveProduct => {
                let MembershipParams {
                    collection_id,
                    product_id,
                } = params.bind()?;
                collections.remove_product(collection_id, product_id).await?;
                OutputRecord::success()
            }
            CollectionOperation::SetProductOrder => {
                let OrderingParams {
                    collection_id,
                    product_ids,
                } = params.bind()?;
                let product_ids = parse_product_ids(&product_ids)?;
                OutputRecord::new(
                    collections
                        .set_product_order(collection_id, &product_ids)
                        .await?,
                )
            }
        })
    }
}
