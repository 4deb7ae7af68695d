//! Customer operations.

use sapo_core::CustomerId;
use serde_json::Value;
use tracing::instrument;

use super::{Filters, Rest};
use crate::sapo::{SapoClient, SapoError};

/// Customers sub-client.
#[derive(Debug, Clone, Copy)]
pub struct Customers<'a> {
    client: &'a SapoClient,
}

impl<'a> Customers<'a> {
    pub(crate) const fn new(client: &'a SapoClient) -> Self {
        Self { client }
    }

    fn rest(&self) -> Rest<'a> {
        Rest::new(self.client, "customers", "customer", "customers")
    }

    /// List customers matching `filters` (`email`, `phone`, date bounds).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, filters))]
    pub async fn list(&self, filters: &Filters) -> Result<Value, SapoError> {
        self.rest().list(filters).await
    }

    /// Get a customer by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the customer does not exist.
    #[instrument(skip(self), fields(customer_id = %id))]
    pub async fn get(&self, id: CustomerId) -> Result<Value, SapoError> {
        self.rest().get(id.as_i64()).await
    }

    /// Create a customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the document is rejected.
    #[instrument(skip(self, data))]
    pub async fn create(&self, data: Value) -> Result<Value, SapoError> {
        self.rest().create(data).await
    }

    /// Update a customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the document is rejected.
    #[instrument(skip(self, data), fields(customer_id = %id))]
    pub async fn update(&self, id: CustomerId, data: Value) -> Result<Value, SapoError> {
        self.rest().update(id.as_i64(), data).await
    }

    /// Delete a customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(customer_id = %id))]
    pub async fn delete(&self, id: CustomerId) -> Result<(), SapoError> {
        self.rest().delete(id.as_i64()).await
    }

    /// Count all customers.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the response has no count.
    #[instrument(skip(self))]
    pub async fn count(&self) -> Result<u64, SapoError> {
        self.rest().count(&Filters::new()).await
    }
}
