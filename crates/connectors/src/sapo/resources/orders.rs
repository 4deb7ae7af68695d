//! Order operations, including the cancel/pay/fulfil state transitions.

use sapo_core::OrderId;
use serde_json::{Value, json};
use tracing::instrument;

use super::{Filters, Rest};
use crate::sapo::{SapoClient, SapoError};

/// Orders sub-client.
#[derive(Debug, Clone, Copy)]
pub struct Orders<'a> {
    client: &'a SapoClient,
}

impl<'a> Orders<'a> {
    pub(crate) const fn new(client: &'a SapoClient) -> Self {
        Self { client }
    }

    fn rest(&self) -> Rest<'a> {
        Rest::new(self.client, "orders", "order", "orders")
    }

    /// List orders matching `filters` (`status`, `financial_status`,
    /// `fulfillment_status`, creation bounds, `limit`).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, filters))]
    pub async fn list(&self, filters: &Filters) -> Result<Value, SapoError> {
        self.rest().list(filters).await
    }

    /// Get an order by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the order does not exist.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn get(&self, id: OrderId) -> Result<Value, SapoError> {
        self.rest().get(id.as_i64()).await
    }

    /// Create an order.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the document is rejected.
    #[instrument(skip(self, data))]
    pub async fn create(&self, data: Value) -> Result<Value, SapoError> {
        self.rest().create(data).await
    }

    /// Update an order.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the document is rejected.
    #[instrument(skip(self, data), fields(order_id = %id))]
    pub async fn update(&self, id: OrderId, data: Value) -> Result<Value, SapoError> {
        self.rest().update(id.as_i64(), data).await
    }

    /// Delete an order.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn delete(&self, id: OrderId) -> Result<(), SapoError> {
        self.rest().delete(id.as_i64()).await
    }

    /// Count all orders.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the response has no count.
    #[instrument(skip(self))]
    pub async fn count(&self) -> Result<u64, SapoError> {
        self.rest().count(&Filters::new()).await
    }

    /// Cancel an order.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the order cannot be cancelled.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn cancel(&self, id: OrderId) -> Result<Value, SapoError> {
        self.rest().action(id.as_i64(), "cancel", json!({})).await
    }

    /// Record full payment of an order.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn mark_as_paid(&self, id: OrderId) -> Result<Value, SapoError> {
        self.rest().action(id.as_i64(), "mark_as_paid", json!({})).await
    }

    /// Fulfil every remaining line item of an order.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn mark_as_fulfilled(&self, id: OrderId) -> Result<Value, SapoError> {
        self.rest().action(id.as_i64(), "fulfill", json!({})).await
    }
}
