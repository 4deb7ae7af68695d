//! Webhook subscription operations.

use sapo_core::WebhookId;
use serde_json::Value;
use tracing::instrument;

use super::{Filters, Rest};
use crate::sapo::{SapoClient, SapoError};

/// Webhooks sub-client.
#[derive(Debug, Clone, Copy)]
pub struct Webhooks<'a> {
    client: &'a SapoClient,
}

impl<'a> Webhooks<'a> {
    pub(crate) const fn new(client: &'a SapoClient) -> Self {
        Self { client }
    }

    fn rest(&self) -> Rest<'a> {
        Rest::new(self.client, "webhooks", "webhook", "webhooks")
    }

    /// List subscriptions, optionally narrowed to one `topic`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, filters))]
    pub async fn list(&self, filters: &Filters) -> Result<Value, SapoError> {
        self.rest().list(filters).await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails or the webhook does not exist.
    #[instrument(skip(self), fields(webhook_id = %id))]
    pub async fn get(&self, id: WebhookId) -> Result<Value, SapoError> {
        self.rest().get(id.as_i64()).await
    }

    /// Subscribe `address` to `topic`.
    ///
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
    #[instrument(skip(self, data), fields(webhook_id = %id))]
    pub async fn update(&self, id: WebhookId, data: Value) -> Result<Value, SapoError> {
        self.rest().update(id.as_i64(), data).await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(webhook_id = %id))]
    pub async fn delete(&self, id: WebhookId) -> Result<(), SapoError> {
        self.rest().delete(id.as_i64()).await
    }
}
