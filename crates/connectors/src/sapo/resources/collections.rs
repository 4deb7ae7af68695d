//! Collection operations.
//!
//! Custom and smart collections are created, updated and deleted through
//! their own endpoints; reads, counts and membership go through the shared
//! `/collections` endpoints.

use sapo_core::{CollectionId, ProductId};
use serde_json::{Value, json};
use tracing::instrument;

use super::{Filters, Rest, unwrap_root};
use crate::sapo::{SapoClient, SapoError};

/// Collections sub-client.
#[derive(Debug, Clone, Copy)]
pub struct Collections<'a> {
    client: &'a SapoClient,
}

impl<'a> Collections<'a> {
    pub(crate) const fn new(client: &'a SapoClient) -> Self {
        Self { client }
    }

    fn shared(&self) -> Rest<'a> {
        Rest::new(self.client, "collections", "collection", "collections")
    }

    fn custom(&self) -> Rest<'a> {
        Rest::new(
            self.client,
            "custom_collections",
            "custom_collection",
            "custom_collections",
        )
    }

    fn smart(&self) -> Rest<'a> {
        Rest::new(
            self.client,
            "smart_collections",
            "smart_collection",
            "smart_collections",
        )
    }

    /// List collections of both kinds.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, filters))]
    pub async fn list(&self, filters: &Filters) -> Result<Value, SapoError> {
        self.shared().list(filters).await
    }

    /// Get a collection of either kind.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the collection does not exist.
    #[instrument(skip(self), fields(collection_id = %id))]
    pub async fn get(&self, id: CollectionId) -> Result<Value, SapoError> {
        self.shared().get(id.as_i64()).await
    }

    /// Count all collections.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the response has no count.
    #[instrument(skip(self))]
    pub async fn count(&self) -> Result<u64, SapoError> {
        self.shared().count(&Filters::new()).await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails or the document is rejected.
    #[instrument(skip(self, data))]
    pub async fn create_custom(&self, data: Value) -> Result<Value, SapoError> {
        self.custom().create(data).await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails or the document is rejected.
    #[instrument(skip(self, data), fields(collection_id = %id))]
    pub async fn update_custom(&self, id: CollectionId, data: Value) -> Result<Value, SapoError> {
        self.custom().update(id.as_i64(), data).await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(collection_id = %id))]
    pub async fn delete_custom(&self, id: CollectionId) -> Result<(), SapoError> {
        self.custom().delete(id.as_i64()).await
    }

    /// Create a smart collection; membership follows its `rules`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the document is rejected.
    #[instrument(skip(self, data))]
    pub async fn create_smart(&self, data: Value) -> Result<Value, SapoError> {
        self.smart().create(data).await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails or the document is rejected.
    #[instrument(skip(self, data), fields(collection_id = %id))]
    pub async fn update_smart(&self, id: CollectionId, data: Value) -> Result<Value, SapoError> {
        self.smart().update(id.as_i64(), data).await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(collection_id = %id))]
    pub async fn delete_smart(&self, id: CollectionId) -> Result<(), SapoError> {
        self.smart().delete(id.as_i64()).await
    }

    /// Add a product to a custom collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(collection_id = %id, product_id = %product_id))]
    pub async fn add_product(
        &self,
        id: CollectionId,
        product_id: ProductId,
    ) -> Result<(), SapoError> {
        self.client
            .post(
                "collects.json",
                json!({"collect": {"collection_id": id, "product_id": product_id}}),
            )
            .await?;
        Ok(())
    }

    /// Remove a product from a collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(collection_id = %id, product_id = %product_id))]
    pub async fn remove_product(
        &self,
        id: CollectionId,
        product_id: ProductId,
    ) -> Result<(), SapoError> {
        self.client
            .delete(&format!("collections/{id}/products/{product_id}.json"))
            .await?;
        Ok(())
    }

    /// Set the manual sort order of a collection's products.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, product_ids), fields(collection_id = %id, count = product_ids.len()))]
    pub async fn set_product_order(
        &self,
        id: CollectionId,
        product_ids: &[ProductId],
    ) -> Result<Value, SapoError> {
        let response = self
            .client
            .put(
                &format!("collections/{id}/order.json"),
                json!({"products": product_ids}),
            )
            .await?;
        Ok(unwrap_root(response, "collection"))
    }
}
