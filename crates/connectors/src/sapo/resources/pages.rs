//! Static page operations.

use sapo_core::PageId;
use serde_json::Value;
use tracing::instrument;

use super::{Filters, Rest};
use crate::sapo::{SapoClient, SapoError};

/// Pages sub-client.
#[derive(Debug, Clone, Copy)]
pub struct Pages<'a> {
    client: &'a SapoClient,
}

impl<'a> Pages<'a> {
    pub(crate) const fn new(client: &'a SapoClient) -> Self {
        Self { client }
    }

    fn rest(&self) -> Rest<'a> {
        Rest::new(self.client, "pages", "page", "pages")
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
    /// Returns an error if the API request fails or the page does not exist.
    #[instrument(skip(self), fields(page_id = %id))]
    pub async fn get(&self, id: PageId) -> Result<Value, SapoError> {
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
    #[instrument(skip(self, data), fields(page_id = %id))]
    pub async fn update(&self, id: PageId, data: Value) -> Result<Value, SapoError> {
        self.rest().update(id.as_i64(), data).await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(page_id = %id))]
    pub async fn delete(&self, id: PageId) -> Result<(), SapoError> {
        self.rest().delete(id.as_i64()).await
    }

    /// Count pages matching `filters`. Unlike most counts, this one is filtered.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the response has no count.
    #[instrument(skip(self, filters))]
    pub async fn count(&self, filters: &Filters) -> Result<u64, SapoError> {
        self.rest().count(filters).await
    }
}
