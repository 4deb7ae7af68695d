//! Product operations.

use sapo_core::ProductId;
use serde_json::Value;
use tracing::instrument;

use super::{Filters, Rest};
use crate::sapo::{SapoClient, SapoError};

/// Products sub-client.
#[derive(Debug, Clone, Copy)]
pub struct Products<'a> {
    client: &'a SapoClient,
}

impl<'a> Products<'a> {
    pub(crate) const fn new(client: &'a SapoClient) -> Self {
        Self { client }
    }

    fn rest(&self) -> Rest<'a> {
        Rest::new(self.client, "products", "product", "products")
    }

    /// List products matching `filters`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, filters))]
    pub async fn list(&self, filters: &Filters) -> Result<Value, SapoError> {
        self.rest().list(filters).await
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the product does not exist.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get(&self, id: ProductId) -> Result<Value, SapoError> {
        self.rest().get(id.as_i64()).await
    }

    /// Create a product from a product document.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the document is rejected.
    #[instrument(skip(self, data))]
    pub async fn create(&self, data: Value) -> Result<Value, SapoError> {
        self.rest().create(data).await
    }

    /// Update a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the document is rejected.
    #[instrument(skip(self, data), fields(product_id = %id))]
    pub async fn update(&self, id: ProductId, data: Value) -> Result<Value, SapoError> {
        self.rest().update(id.as_i64(), data).await
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete(&self, id: ProductId) -> Result<(), SapoError> {
        self.rest().delete(id.as_i64()).await
    }

    /// Count all products.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the response has no count.
    #[instrument(skip(self))]
    pub async fn count(&self) -> Result<u64, SapoError> {
        self.rest().count(&Filters::new()).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::testing::{MockTransport, test_client};

    #[tokio::test]
    async fn test_create_wraps_and_unwraps_product() {
        let transport = MockTransport::shared();
        transport.respond_with(json!({"product": {"id": 9, "title": "Tee"}}));
        let client = test_client(&transport);

        let product = client
            .products()
            .create(json!({"title": "Tee"}))
            .await
            .expect("create");

        assert_eq!(product, json!({"id": 9, "title": "Tee"}));
        let request = transport.last_request().expect("request");
        assert_eq!(request.path(), "/admin/products.json");
        assert_eq!(request.body, Some(json!({"product": {"title": "Tee"}})));
    }

    #[tokio::test]
    async fn test_count() {
        let transport = MockTransport::shared();
        transport.respond_with(json!({"count": 12}));
        let client = test_client(&transport);

        assert_eq!(client.products().count().await.expect("count"), 12);
        assert_eq!(
            transport.last_request().expect("request").path(),
            "/admin/products/count.json"
        );
    }
}
