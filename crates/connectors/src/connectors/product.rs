//! `sapoProduct`: create, read, update, delete and count products.

use async_trait::async_trait;
use sapo_core::{FilterTimestamp, OutputRecord, ProductId};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::common::{
    ListRequest, Operation, Payload, created_fields, data_property, filters_property, id_property,
    operation_enum, operation_property, pagination_properties, parse_operation, updated_fields,
};
use crate::credentials::CREDENTIAL_TYPE;
use crate::facade::SapoApi;
use crate::node::{Connector, ConnectorError, NodeDescription, ParameterSet};

operation_enum! {
    /// Operations of the product connector.
    pub enum ProductOperation {
        Create => ("create", "Create"),
        Get => ("get", "Get"),
        GetMany => ("getMany", "Get Many"),
        Update => ("update", "Update"),
        Delete => ("delete", "Delete"),
        Count => ("count", "Count"),
    }
}

/// `getMany` filters.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProductFilters {
    pub created_at_min: Option<FilterTimestamp>,
    pub created_at_max: Option<FilterTimestamp>,
    pub updated_at_min: Option<FilterTimestamp>,
    pub updated_at_max: Option<FilterTimestamp>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductRef {
    product_id: ProductId,
}

/// The `sapoProduct` connector.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProductConnector;

#[async_trait]
impl Connector for ProductConnector {
    fn type_name(&self) -> &'static str {
        "sapoProduct"
    }

    fn description(&self) -> NodeDescription {
        use ProductOperation::{Create, Delete, Get, GetMany, Update};

        let mut properties = vec![
            operation_property(GetMany),
            id_property("productId", "Product ID", "ID of the product", &[Get, Update, Delete]),
        ];
        properties.extend(pagination_properties(&[GetMany]));
        properties.push(filters_property(
            &[GetMany],
            [created_fields(), updated_fields()].concat(),
        ));
        properties.push(data_property(&[Create, Update], json!({})));

        NodeDescription::new(self.type_name(), "Sapo Product", "Manage products in Sapo")
            .subtitle("={{$parameter[\"operation\"]}}")
            .credential(CREDENTIAL_TYPE)
            .properties(properties)
    }

    async fn run(
        &self,
        api: &SapoApi,
        params: &ParameterSet,
    ) -> Result<OutputRecord, ConnectorError> {
        let Some(operation) = parse_operation::<ProductOperation>(params) else {
            return Ok(OutputRecord::empty());
        };
        tracing::debug!(operation = operation.as_str(), "Running product operation");
        let products = api.products();

        Ok(match operation {
            ProductOperation::Create => {
                OutputRecord::new(products.create(Payload::bind(params)?).await?)
            }
            ProductOperation::Get => {
                let ProductRef { product_id } = params.bind()?;
                OutputRecord::new(products.get(product_id).await?)
            }
            ProductOperation::GetMany => {
                let filters = ListRequest::<ProductFilters>::bind(params)?.into_filters()?;
                OutputRecord::new(products.list(&filters).await?)
            }
            ProductOperation::Update => {
                let ProductRef { product_id } = params.bind()?;
                OutputRecord::new(products.update(product_id, Payload::bind(params)?).await?)
            }
            ProductOperation::Delete => {
                let ProductRef { product_id } = params.bind()?;
                products.delete(product_id).await?;
                OutputRecord::success()
            }
            ProductOperation::Count => OutputRecord::count(products.count().await?),
        })
    }
}
