//! Price rule (discount) operations.

use sapo_core::PriceRuleId;
use serde_json::Value;
use tracing::instrument;

use super::{Filters, Rest};
use crate::sapo::{SapoClient, SapoError};

/// Price rules sub-client.
#[derive(Debug, Clone, Copy)]
pub struct PriceRules<'a> {
    client: &'a SapoClient,
}

impl<'a> PriceRules<'a> {
    pub(crate) const fn new(client: &'a SapoClient) -> Self {
        Self { client }
    }

    fn rest(&self) -> Rest<'a> {
        Rest::new(self.client, "price_rules", "price_rule", "price_rules")
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, filters))]
    pub async fn list(&self, filters: &Filters) -> Result<Value, SapoError> {
        self.rest().list(filters).await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails or the rule does not exist.
    #[instrument(skip(self), fields(price_rule_id = %id))]
    pub async fn get(&self, id: PriceRuleId) -> Result<Value, SapoError> {
        self.rest().get(id.as_i64()).await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails or the document is rejected.
    #[instrument(skip(self, data))]
    pub async fn create(&self, data: Value) -> Result<Value, SapoError> {
        self.rest().create(data).await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails or the document is rejected.
    #[instrument(skip(self, data), fields(price_rule_id = %id))]
    pub async fn update(&self, id: PriceRuleId, data: Value) -> Result<Value, SapoError> {
        self.rest().update(id.as_i64(), data).await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(price_rule_id = %id))]
    pub async fn delete(&self, id: PriceRuleId) -> Result<(), SapoError> {
        self.rest().delete(id.as_i64()).await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails or the response has no count.
    #[instrument(skip(self))]
    pub async fn count(&self) -> Result<u64, SapoError> {
        self.rest().count(&Filters::new()).await
    }
}
