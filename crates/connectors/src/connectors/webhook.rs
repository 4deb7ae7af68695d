//! `sapoWebhook`: webhook subscriptions.

use async_trait::async_trait;
use sapo_core::{FilterTimestamp, OutputRecord, WebhookId};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::common::{
    ListRequest, Operation, Payload, created_fields, data_property, filters_property, id_property,
    operation_enum, operation_property, pagination_properties, parse_operation, updated_fields,
};
use crate::credentials::CREDENTIAL_TYPE;
use crate::facade::SapoApi;
use crate::node::{
    Connector, ConnectorError, NodeDescription, NodeProperty, ParameterSet, PropertyOption,
    PropertyType,
};

operation_enum! {
    pub enum WebhookOperation {
        Create => ("create", "Create"),
        Delete => ("delete", "Delete"),
        Get => ("get", "Get"),
        GetMany => ("getMany", "Get Many"),
        Update => ("update", "Update"),
    }
}

/// Event a webhook subscribes to, as `<resource>/<event>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WebhookTopic {
    #[serde(rename = "articles/create")]
    ArticlesCreate,
    #[serde(rename = "articles/delete")]
    ArticlesDelete,
    #[serde(rename = "articles/update")]
    ArticlesUpdate,
    #[serde(rename = "collections/create")]
    CollectionsCreate,
    #[serde(rename = "collections/delete")]
    CollectionsDelete,
    #[serde(rename = "collections/update")]
    CollectionsUpdate,
    #[serde(rename = "customers/create")]
    CustomersCreate,
    #[serde(rename = "customers/delete")]
    CustomersDelete,
    #[serde(rename = "customers/update")]
    CustomersUpdate,
    #[serde(rename = "orders/create")]
    OrdersCreate,
    #[serde(rename = "orders/delete")]
    OrdersDelete,
    #[serde(rename = "orders/paid")]
    OrdersPaid,
    #[serde(rename = "orders/updated")]
    OrdersUpdated,
    #[serde(rename = "products/create")]
    ProductsCreate,
    #[serde(rename = "products/delete")]
    ProductsDelete,
    #[serde(rename = "products/update")]
    ProductsUpdate,
}

impl WebhookTopic {
    pub const ALL: [Self; 16] = [
        Self::ArticlesCreate,
        Self::ArticlesDelete,
        Self::ArticlesUpdate,
        Self::CollectionsCreate,
        Self::CollectionsDelete,
        Self::CollectionsUpdate,
        Self::CustomersCreate,
        Self::CustomersDelete,
        Self::CustomersUpdate,
        Self::OrdersCreate,
        Self::OrdersDelete,
        Self::OrdersPaid,
        Self::OrdersUpdated,
        Self::ProductsCreate,
        Self::ProductsDelete,
        Self::ProductsUpdate,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ArticlesCreate => "articles/create",
            Self::ArticlesDelete => "articles/delete",
            Self::ArticlesUpdate => "articles/update",
            Self::CollectionsCreate => "collections/create",
            Self::CollectionsDelete => "collections/delete",
            Self::CollectionsUpdate => "collections/update",
            Self::CustomersCreate => "customers/create",
            Self::CustomersDelete => "customers/delete",
            Self::CustomersUpdate => "customers/update",
            Self::OrdersCreate => "orders/create",
            Self::OrdersDelete => "orders/delete",
            Self::OrdersPaid => "orders/paid",
            Self::OrdersUpdated => "orders/updated",
            Self::ProductsCreate => "products/create",
            Self::ProductsDelete => "products/delete",
            Self::ProductsUpdate => "products/update",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ArticlesCreate => "Article Created",
            Self::ArticlesDelete => "Article Deleted",
            Self::ArticlesUpdate => "Article Updated",
            Self::CollectionsCreate => "Collection Created",
            Self::CollectionsDelete => "Collection Deleted",
            Self::CollectionsUpdate => "Collection Updated",
            Self::CustomersCreate => "Customer Created",
            Self::CustomersDelete => "Customer Deleted",
            Self::CustomersUpdate => "Customer Updated",
            Self::OrdersCreate => "Order Created",
            Self::OrdersDelete => "Order Deleted",
            Self::OrdersPaid => "Order Paid",
            Self::OrdersUpdated => "Order Updated",
            Self::ProductsCreate => "Product Created",
            Self::ProductsDelete => "Product Deleted",
            Self::ProductsUpdate => "Product Updated",
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WebhookFilters {
    pub topic: Option<WebhookTopic>,
    pub created_at_min: Option<FilterTimestamp>,
    pub created_at_max: Option<FilterTimestamp>,
    pub updated_at_min: Option<FilterTimestamp>,
    pub updated_at_max: Option<FilterTimestamp>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WebhookRef {
    webhook_id: WebhookId,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WebhookConnector;

#[async_trait]
impl Connector for WebhookConnector {
    fn type_name(&self) -> &'static str {
        "sapoWebhook"
    }

    fn description(&self) -> NodeDescription {
        use WebhookOperation::{Create, Delete, Get, GetMany, Update};

        let mut fields = vec![
            NodeProperty::new("topic", "Topic", PropertyType::Options)
                .options(
                    WebhookTopic::ALL
                        .into_iter()
                        .map(|topic| PropertyOption::new(topic.label(), topic.as_str()))
                        .collect(),
                )
                .default(json!(WebhookTopic::OrdersCreate.as_str())),
        ];
        fields.extend(created_fields());
        fields.extend(updated_fields());

        let mut properties = vec![
            operation_property(GetMany),
            id_property("webhookId", "Webhook ID", "ID of the webhook", &[Get, Update, Delete]),
        ];
        properties.extend(pagination_properties(&[GetMany]));
        properties.push(filters_property(&[GetMany], fields));
        properties.push(data_property(
            &[Create, Update],
            json!({
                "topic": "orders/create",
                "address": "https://example.com/webhook",
                "format": "json",
                "fields": ["id", "total_price", "created_on"],
                "metafield_namespaces": ["inventory"],
            }),
        ));

        NodeDescription::new(
            self.type_name(),
            "Sapo Webhook",
            "Manage webhook subscriptions in Sapo",
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
        let Some(operation) = parse_operation::<WebhookOperation>(params) else {
            return Ok(OutputRecord::empty());
        };
        tracing::debug!(operation = operation.as_str(), "Running webhook operation");
        let webhooks = api.webhooks();
        let webhook_id = || params.bind::<WebhookRef>().map(|r| r.webhook_id);

        Ok(match operation {
            WebhookOperation::Create => {
                OutputRecord::new(webhooks.create(Payload::bind(params)?).await?)
            }
            WebhookOperation::Get => OutputRecord::new(webhooks.get(webhook_id()?).await?),
            WebhookOperation::GetMany => {
                let filters = ListRequest::<WebhookFilters>::bind(params)?.into_filters()?;
                OutputRecord::new(webhooks.list(&filters).await?)
            }
            WebhookOperation::Update => {
                OutputRecord::new(webhooks.update(webhook_id()?, Payload::bind(params)?).await?)
            }
            WebhookOperation::Delete => {
                webhooks.delete(webhook_id()?).await?;
                OutputRecord::success()
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::execute;
    use crate::testing::{MockTransport, test_context};

    #[test]
    fn test_topic_wire_values_match_serde() {
        for topic in WebhookTopic::ALL {
            assert_eq!(
                serde_json::to_value(topic).expect("serialize"),
                json!(topic.as_str())
            );
        }
    }

    #[tokio::test]
    async fn test_get_many_topic_filter() {
        let transport = MockTransport::shared();
        let ctx = test_context(
            "sapoWebhook",
            json!({"operation": "getMany", "additionalFields": {"topic": "orders/paid"}}),
            &transport,
        );

        execute(&WebhookConnector, &ctx).await.expect("execute");

        let request = transport.last_request().expect("request");
        assert_eq!(request.query_value("topic"), Some("orders/paid"));
    }

    #[tokio::test]
    async fn test_unknown_topic_is_rejected() {
        let transport = MockTransport::shared();
        let ctx = test_context(
            "sapoWebhook",
            json!({"operation": "getMany", "additionalFields": {"topic": "carts/create"}}),
            &transport,
        );

        assert!(execute(&WebhookConnector, &ctx).await.is_err());
        assert!(transport.requests().is_empty());
    }
}
