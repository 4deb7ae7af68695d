//! `sapoOrder`: order CRUD, counting and the cancel / paid / fulfilled
//! status transitions.

use async_trait::async_trait;
use sapo_core::{FilterTimestamp, OrderId, OutputRecord};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::common::{
    ListRequest, Operation, Payload, created_fields, data_property, filters_property, id_property,
    operation_enum, operation_property, options_field, pagination_properties, parse_operation,
};
use crate::credentials::CREDENTIAL_TYPE;
use crate::facade::SapoApi;
use crate::node::{Connector, ConnectorError, NodeDescription, NodeProperty, ParameterSet};

operation_enum! {
    /// Operations of the order connector.
    pub enum OrderOperation {
        Cancel => ("cancel", "Cancel"),
        Count => ("count", "Count"),
        Create => ("create", "Create"),
        Delete => ("delete", "Delete"),
        Get => ("get", "Get"),
        GetMany => ("getMany", "Get Many"),
        MarkAsFulfilled => ("markAsFulfilled", "Mark Fulfilled"),
        MarkAsPaid => ("markAsPaid", "Mark Paid"),
        Update => ("update", "Update"),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Open,
    Closed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinancialStatus {
    Authorized,
    Paid,
    PartiallyPaid,
    Pending,
    Refunded,
    Voided,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FulfillmentStatus {
    Fulfilled,
    Partial,
    Unfulfilled,
}

/// `getMany` filters.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OrderFilters {
    pub created_at_min: Option<FilterTimestamp>,
    pub created_at_max: Option<FilterTimestamp>,
    pub status: Option<OrderStatus>,
    pub financial_status: Option<FinancialStatus>,
    pub fulfillment_status: Option<FulfillmentStatus>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderRef {
    order_id: OrderId,
}

fn filter_fields() -> Vec<NodeProperty> {
    let mut fields = created_fields();
    fields.push(options_field(
        "status",
        "Status",
        &[("Open", "open"), ("Closed", "closed"), ("Cancelled", "cancelled")],
        "open",
    ));
    fields.push(options_field(
        "financial_status",
        "Financial Status",
        &[
            ("Authorized", "authorized"),
            ("Paid", "paid"),
            ("Partially Paid", "partially_paid"),
            ("Pending", "pending"),
            ("Refunded", "refunded"),
            ("Voided", "voided"),
        ],
        "pending",
    ));
    fields.push(options_field(
        "fulfillment_status",
        "Fulfillment Status",
        &[
            ("Fulfilled", "fulfilled"),
            ("Partial", "partial"),
            ("Unfulfilled", "unfulfilled"),
        ],
        "unfulfilled",
    ));
    fields
}

/// The `sapoOrder` connector.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderConnector;

#[async_trait]
impl Connector for OrderConnector {
    fn type_name(&self) -> &'static str {
        "sapoOrder"
    }

    fn description(&self) -> NodeDescription {
        use OrderOperation::{
            Cancel, Create, Delete, Get, GetMany, MarkAsFulfilled, MarkAsPaid, Update,
        };

        let mut properties = vec![
            operation_property(GetMany),
            id_property(
                "orderId",
                "Order ID",
                "ID of the order",
                &[Get, Update, Delete, Cancel, MarkAsPaid, MarkAsFulfilled],
            ),
        ];
        properties.extend(pagination_properties(&[GetMany]));
        properties.push(filters_property(&[GetMany], filter_fields()));
        properties.push(data_property(&[Create, Update], json!({})));

        NodeDescription::new(self.type_name(), "Sapo Order", "Manage orders in Sapo")
            .subtitle("={{$parameter[\"operation\"]}}")
            .credential(CREDENTIAL_TYPE)
            .properties(properties)
    }

    async fn run(
        &self,
        api: &SapoApi,
        params: &ParameterSet,
    ) -> Result<OutputRecord, ConnectorError> {
        let Some(operation) = parse_operation::<OrderOperation>(params) else {
            return Ok(OutputRecord::empty());
        };
        tracing::debug!(operation = operation.as_str(), "Running order operation");
        let orders = api.orders();
        let order_id = || params.bind::<OrderRef>().map(|r| r.order_id);

        Ok(match operation {
            OrderOperation::Create => {
                OutputRecord::new(orders.create(Payload::bind(params)?).await?)
            }
            OrderOperation::Get => OutputRecord::new(orders.get(order_id()?).await?),
            OrderOperation::GetMany => {
                let filters = ListRequest::<OrderFilters>::bind(params)?.into_filters()?;
                OutputRecord::new(orders.list(&filters).await?)
            }
            OrderOperation::Update => {
                OutputRecord::new(orders.update(order_id()?, Payload::bind(params)?).await?)
            }
            OrderOperation::Delete => {
                orders.delete(order_id()?).await?;
                OutputRecord::success()
            }
            OrderOperation::Count => OutputRecord::count(orders.count().await?),
            OrderOperation::Cancel => OutputRecord::new(orders.cancel(order_id()?).await?),
            OrderOperation::MarkAsPaid => {
                OutputRecord::new(orders.mark_as_paid(order_id()?).await?)
            }
            OrderOperation::MarkAsFulfilled => {
                OutputRecord::new(orders.mark_as_fulfilled(order_id()?).await?)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::execute;
    use crate::sapo::SapoError;
    use crate::testing::{MockTransport, test_context};

    #[tokio::test]
    async fn test_get_many_forwards_status_filters() {
        let transport = MockTransport::shared();
        let ctx = test_context(
            "sapoOrder",
            json!({
                "operation": "getMany",
                "returnAll": true,
                "additionalFields": {"financial_status": "partially_paid", "status": "open"},
            }),
            &transport,
        );

        execute(&OrderConnector, &ctx).await.expect("execute");

        let request = transport.last_request().expect("request");
        assert_eq!(request.query_value("financial_status"), Some("partially_paid"));
        assert_eq!(request.query_value("status"), Some("open"));
        assert_eq!(request.query_value("limit"), None);
    }

    #[tokio::test]
    async fn test_unknown_status_is_a_parameter_error() {
        let transport = MockTransport::shared();
        let ctx = test_context(
            "sapoOrder",
            json!({"operation": "getMany", "additionalFields": {"status": "lost"}}),
            &transport,
        );

        let err = execute(&OrderConnector, &ctx).await.expect_err("bad status");
        assert!(err.message.contains("additionalFields"));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_mark_as_paid() {
        let transport = MockTransport::shared();
        transport.respond_with(json!({"order": {"id": 5, "financial_status": "paid"}}));
        let ctx = test_context(
            "sapoOrder",
            json!({"operation": "markAsPaid", "orderId": 5}),
            &transport,
        );

        let batches = execute(&OrderConnector, &ctx).await.expect("execute");

        assert_eq!(batches[0][0].json["financial_status"], "paid");
        assert_eq!(
            transport.last_request().expect("request").path(),
            "/admin/orders/5/mark_as_paid.json"
        );
    }

    #[tokio::test]
    async fn test_remote_failure_with_continue_on_fail() {
        let transport = MockTransport::shared();
        transport.fail_with(SapoError::NotFound("Order 9 not found".to_string()));
        let ctx = test_context(
            "sapoOrder",
            json!({"operation": "get", "orderId": 9}),
            &transport,
        )
        .with_continue_on_fail(true);

        let batches = execute(&OrderConnector, &ctx).await.expect("suppressed");

        assert!(batches[0][0].is_error());
    }
}
