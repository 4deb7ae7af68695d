//! `sapoFulfillment`: fulfillments of an order, their tracking and shipment
//! events, and the store's carrier services.

use async_trait::async_trait;
use sapo_core::{FilterTimestamp, FulfillmentEventId, FulfillmentId, OrderId, OutputRecord};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::common::{
    ListRequest, Operation, Payload, created_fields, data_property, filters_property, id_property,
    operation_enum, operation_property, options_field, pagination_properties, parse_operation,
    updated_fields,
};
use crate::credentials::CREDENTIAL_TYPE;
use crate::facade::SapoApi;
use crate::node::{Connector, ConnectorError, NodeDescription, ParameterSet};

operation_enum! {
    /// Operations of the fulfillment connector.
    pub enum FulfillmentOperation {
        Cancel => ("cancel", "Cancel"),
        Create => ("create", "Create"),
        CreateEvent => ("createEvent", "Create Event"),
        DeleteEvent => ("deleteEvent", "Delete Event"),
        Get => ("get", "Get"),
        GetCarriers => ("getCarriers", "Get Carriers"),
        GetMany => ("getMany", "Get Many"),
        ListEvents => ("listEvents", "List Events"),
        UpdateTracking => ("updateTracking", "Update Tracking"),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FulfillmentState {
    Cancelled,
    Error,
    Failure,
    Open,
    Pending,
    Success,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FulfillmentFilters {
    pub status: Option<FulfillmentState>,
    pub created_at_min: Option<FilterTimestamp>,
    pub created_at_max: Option<FilterTimestamp>,
    pub updated_at_min: Option<FilterTimestamp>,
    pub updated_at_max: Option<FilterTimestamp>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderRef {
    order_id: OrderId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FulfillmentRef {
    order_id: OrderId,
    fulfillment_id: FulfillmentId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventRef {
    order_id: OrderId,
    fulfillment_id: FulfillmentId,
    event_id: FulfillmentEventId,
}

/// The `sapoFulfillment` connector.
#[derive(Debug, Clone, Copy, Default)]
pub struct FulfillmentConnector;

#[async_trait]
impl Connector for FulfillmentConnector {
    fn type_name(&self) -> &'static str {
        "sapoFulfillment"
    }

    fn description(&self) -> NodeDescription {
        use FulfillmentOperation::{
            Cancel, Create, CreateEvent, DeleteEvent, Get, GetMany, ListEvents, UpdateTracking,
        };

        let mut fields = vec![options_field(
            "status",
            "Status",
            &[
                ("Cancelled", "cancelled"),
                ("Error", "error"),
                ("Failure", "failure"),
                ("Open", "open"),
                ("Pending", "pending"),
                ("Success", "success"),
            ],
            "pending",
        )];
        fields.extend(created_fields());
        fields.extend(updated_fields());

        let mut properties = vec![
            operation_property(GetMany),
            id_property(
                "orderId",
                "Order ID",
                "ID of the order the fulfillment belongs to",
                &[
                    Create,
                    Get,
                    GetMany,
                    Cancel,
                    UpdateTracking,
                    CreateEvent,
                    ListEvents,
                    DeleteEvent,
                ],
            ),
            id_property(
                "fulfillmentId",
                "Fulfillment ID",
                "ID of the fulfillment",
                &[Get, UpdateTracking, Cancel, CreateEvent, ListEvents, DeleteEvent],
            ),
        ];
        properties.extend(pagination_properties(&[GetMany]));
        properties.push(filters_property(&[GetMany], fields));
        properties.push(id_property(
            "eventId",
            "Event ID",
            "ID of the fulfillment event",
            &[DeleteEvent],
        ));
        properties.push(data_property(
            &[Create],
            json!({
                "location_id": "123",
                "tracking_number": "1Z999AA1234567890",
                "tracking_company": "UPS",
                "shipping_method": "Standard",
                "notify_customer": true,
            }),
        ));
        properties.push(data_property(
            &[UpdateTracking],
            json!({
                "tracking_number": "1Z999AA1234567890",
                "tracking_company": "UPS",
                "tracking_url": "https://www.ups.com/track?tracknum=1Z999AA1234567890",
            }),
        ));
        properties.push(data_property(
            &[CreateEvent],
            json!({
                "status": "in_transit",
                "message": "Package has left the facility",
                "location": "Distribution Center",
            }),
        ));

        NodeDescription::new(
            self.type_name(),
            "Sapo Fulfillment",
            "Manage order fulfillments and shipment tracking in Sapo",
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
        let Some(operation) = parse_operation::<FulfillmentOperation>(params) else {
            return Ok(OutputRecord::empty());
        };
        tracing::debug!(operation = operation.as_str(), "Running fulfillment operation");
        let fulfillments = api.fulfillments();

        Ok(match operation {
            FulfillmentOperation::Create => {
                let OrderRef { order_id } = params.bind()?;
                OutputRecord::new(fulfillments.create(order_id, Payload::bind(params)?).await?)
            }
            FulfillmentOperation::Get => {
                let r: FulfillmentRef = params.bind()?;
                OutputRecord::new(fulfillments.get(r.order_id, r.fulfillment_id).await?)
            }
            FulfillmentOperation::GetMany => {
                let OrderRef { order_id } = params.bind()?;
                let filters = ListRequest::<FulfillmentFilters>::bind(params)?.into_filters()?;
                OutputRecord::new(fulfillments.list(order_id, &filters).await?)
            }
            FulfillmentOperation::UpdateTracking => {
                let r: FulfillmentRef = params.bind()?;
                OutputRecord::new(
                    fulfillments
                        .update_tracking(r.order_id, r.fulfillment_id, Payload::bind(params)?)
                        .await?,
                )
            }
            FulfillmentOperation::Cancel => {
                let r: FulfillmentRef = params.bind()?;
                OutputRecord::new(fulfillments.cancel(r.order_id, r.fulfillment_id).await?)
            }
            FulfillmentOperation::CreateEvent => {
                let r: FulfillmentRef = params.bind()?;
                OutputRecord::new(
                    fulfillments
                        .create_event(r.order_id, r.fulfillment_id, Payload::bind(params)?)
                        .await?,
                )
            }
            FulfillmentOperation::ListEvents => {
                let r: FulfillmentRef = params.bind()?;
                let events = fulfillments.list_events(r.order_id, r.fulfillment_id).await?;
                OutputRecord::new(json!({ "events": events }))
            }
            FulfillmentOperation::DeleteEvent => {
                let r: EventRef = params.bind()?;
                fulfillments
                    .delete_event(r.order_id, r.fulfillment_id, r.event_id)
                    .await?;
                OutputRecord::success()
            }
            FulfillmentOperation::GetCarriers => {
                OutputRecord::new(json!({ "carriers": fulfillments.carriers().await? }))
            }
        })
    }
}
