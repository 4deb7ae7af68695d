//! Fulfillment operations on an order, tracking updates and shipment events.

use sapo_core::{FulfillmentEventId, FulfillmentId, OrderId};
use serde_json::{Value, json};
use tracing::instrument;

use super::{Filters, Rest, unwrap_root, wrap};
use crate::sapo::{SapoClient, SapoError};

/// Fulfillments sub-client.
#[derive(Debug, Clone, Copy)]
pub struct Fulfillments<'a> {
    client: &'a SapoClient,
}

impl<'a> Fulfillments<'a> {
    pub(crate) const fn new(client: &'a SapoClient) -> Self {
        Self { client }
    }

    fn rest(&self, order: OrderId) -> Rest<'a> {
        Rest::new(
            self.client,
            format!("orders/{order}/fulfillments"),
            "fulfillment",
            "fulfillments",
        )
    }

    fn events(&self, order: OrderId, fulfillment: FulfillmentId) -> Rest<'a> {
        Rest::new(
            self.client,
            format!("orders/{order}/fulfillments/{fulfillment}/events"),
            "fulfillment_event",
            "fulfillment_events",
        )
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails or the document is rejected.
    #[instrument(skip(self, data), fields(order_id = %order))]
    pub async fn create(&self, order: OrderId, data: Value) -> Result<Value, SapoError> {
        self.rest(order).create(data).await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails or the fulfillment does not exist.
    #[instrument(skip(self), fields(order_id = %order, fulfillment_id = %id))]
    pub async fn get(&self, order: OrderId, id: FulfillmentId) -> Result<Value, SapoError> {
        self.rest(order).get(id.as_i64()).await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, filters), fields(order_id = %order))]
    pub async fn list(&self, order: OrderId, filters: &Filters) -> Result<Value, SapoError> {
        self.rest(order).list(filters).await
    }

    /// Replace the tracking information of a fulfillment.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the document is rejected.
    #[instrument(skip(self, data), fields(order_id = %order, fulfillment_id = %id))]
    pub async fn update_tracking(
        &self,
        order: OrderId,
        id: FulfillmentId,
        data: Value,
    ) -> Result<Value, SapoError> {
        self.rest(order)
            .action(id.as_i64(), "update_tracking", wrap("fulfillment", data))
            .await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(order_id = %order, fulfillment_id = %id))]
    pub async fn cancel(&self, order: OrderId, id: FulfillmentId) -> Result<Value, SapoError> {
        self.rest(order).action(id.as_i64(), "cancel", json!({})).await
    }

    /// Record a shipment event (in transit, delivered, ...).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the document is rejected.
    #[instrument(skip(self, data), fields(order_id = %order, fulfillment_id = %id))]
    pub async fn create_event(
        &self,
        order: OrderId,
        id: FulfillmentId,
        data: Value,
    ) -> Result<Value, SapoError> {
        let response = self
            .client
            .post(
                &format!("orders/{order}/fulfillments/{id}/events.json"),
                wrap("event", data),
            )
            .await?;
        Ok(unwrap_root(
            unwrap_root(response, "fulfillment_event"),
            "event",
        ))
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(order_id = %order, fulfillment_id = %id))]
    pub async fn list_events(&self, order: OrderId, id: FulfillmentId) -> Result<Value, SapoError> {
        let events = self.events(order, id).list(&Filters::new()).await?;
        Ok(unwrap_root(events, "events"))
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(order_id = %order, fulfillment_id = %id, event_id = %event))]
    pub async fn delete_event(
        &self,
        order: OrderId,
        id: FulfillmentId,
        event: FulfillmentEventId,
    ) -> Result<(), SapoError> {
        self.events(order, id).delete(event.as_i64()).await
    }

    /// List carrier services available to the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn carriers(&self) -> Result<Value, SapoError> {
        let response = self.client.get("carrier_services.json", Vec::new()).await?;
        Ok(unwrap_root(response, "carrier_services"))
    }
}
