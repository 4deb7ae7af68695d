//! Resource sub-clients, one per Sapo resource family.
//!
//! Each sub-client borrows the [`SapoClient`] and maps its methods onto REST
//! endpoints under `/admin`. Responses are unwrapped from their root key
//! (`{"order": {...}}` becomes the order object) when that key is present.

mod blogs;
mod collections;
mod customers;
mod fulfillments;
mod inventory;
mod metafields;
mod orders;
mod pages;
mod price_rules;
mod products;
mod webhooks;

pub use blogs::Blogs;
pub use collections::Collections;
pub use customers::Customers;
pub use fulfillments::Fulfillments;
pub use inventory::{AdjustmentAction, Inventory, InventoryAdjustment, InventoryTransfer};
pub use metafields::{MetafieldOwner, MetafieldOwnerType, MetafieldValidation, Metafields};
pub use orders::Orders;
pub use pages::Pages;
pub use price_rules::PriceRules;
pub use products::Products;
pub use webhooks::Webhooks;

use serde_json::{Map, Value};

use super::{SapoClient, SapoError};

/// Filter bag for list and count endpoints, sent as query parameters.
pub type Filters = Map<String, Value>;

/// Convert a filter bag into query pairs.
///
/// `null` entries are skipped; arrays are comma-joined.
pub(crate) fn query_pairs(filters: &Filters) -> Vec<(String, String)> {
    filters
        .iter()
        .filter_map(|(key, value)| query_value(value).map(|v| (key.clone(), v)))
        .collect()
}

fn query_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(query_value)
                .collect::<Vec<_>>()
                .join(","),
        ),
        other => Some(other.to_string()),
    }
}

/// Take the value under `key` if the response is wrapped in it.
pub(crate) fn unwrap_root(response: Value, key: &str) -> Value {
    match response {
        Value::Object(mut map) if map.contains_key(key) => map.remove(key).unwrap_or(Value::Null),
        other => other,
    }
}

/// `{key: data}`.
pub(crate) fn wrap(key: &str, data: Value) -> Value {
    let mut map = Map::new();
    map.insert(key.to_owned(), data);
    Value::Object(map)
}

/// Read `{"count": n}`.
pub(crate) fn extract_count(response: &Value) -> Result<u64, SapoError> {
    response
        .get("count")
        .and_then(Value::as_u64)
        .ok_or_else(|| SapoError::UnexpectedResponse(format!("missing count in {response}")))
}

/// A conventional REST collection: `{path}.json`, `{path}/{id}.json` and
/// `{path}/count.json`, with bodies wrapped in the singular root key.
pub(crate) struct Rest<'a> {
    client: &'a SapoClient,
    path: String,
    singular: &'static str,
    plural: &'static str,
}

impl<'a> Rest<'a> {
    pub(crate) fn new(
        client: &'a SapoClient,
        path: impl Into<String>,
        singular: &'static str,
        plural: &'static str,
    ) -> Self {
        Self {
            client,
            path: path.into(),
            singular,
            plural,
        }
    }

    pub(crate) async fn list(&self, filters: &Filters) -> Result<Value, SapoError> {
        let response = self
            .client
            .get(&format!("{}.json", self.path), query_pairs(filters))
            .await?;
        Ok(unwrap_root(response, self.plural))
    }

    pub(crate) async fn get(&self, id: i64) -> Result<Value, SapoError> {
        let response = self
            .client
            .get(&format!("{}/{id}.json", self.path), Vec::new())
            .await?;
        Ok(unwrap_root(response, self.singular))
    }

    pub(crate) async fn create(&self, data: Value) -> Result<Value, SapoError> {
        let response = self
            .client
            .post(&format!("{}.json", self.path), wrap(self.singular, data))
            .await?;
        Ok(unwrap_root(response, self.singular))
    }

    pub(crate) async fn update(&self, id: i64, data: Value) -> Result<Value, SapoError> {
        let response = self
            .client
            .put(&format!("{}/{id}.json", self.path), wrap(self.singular, data))
            .await?;
        Ok(unwrap_root(response, self.singular))
    }

    pub(crate) async fn delete(&self, id: i64) -> Result<(), SapoError> {
        self.client
            .delete(&format!("{}/{id}.json", self.path))
            .await?;
        Ok(())
    }

    pub(crate) async fn count(&self, filters: &Filters) -> Result<u64, SapoError> {
        let response = self
            .client
            .get(&format!("{}/count.json", self.path), query_pairs(filters))
            .await?;
        extract_count(&response)
    }

    /// `POST {path}/{id}/{action}.json`, unwrapped from the singular key.
    pub(crate) async fn action(
        &self,
        id: i64,
        action: &str,
        body: Value,
    ) -> Result<Value, SapoError> {
        let response = self
            .client
            .post(&format!("{}/{id}/{action}.json", self.path), body)
            .await?;
        Ok(unwrap_root(response, self.singular))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_query_pairs() {
        let filters = json!({
            "limit": 5,
            "status": "open",
            "published": true,
            "ids": [1, 2],
            "skip": null,
        });
        let pairs = query_pairs(filters.as_object().expect("object"));
        assert!(pairs.contains(&("limit".to_string(), "5".to_string())));
        assert!(pairs.contains(&("status".to_string(), "open".to_string())));
        assert!(pairs.contains(&("published".to_string(), "true".to_string())));
        assert!(pairs.contains(&("ids".to_string(), "1,2".to_string())));
        assert!(!pairs.iter().any(|(k, _)| k == "skip"));
    }

    #[test]
    fn test_unwrap_root() {
        assert_eq!(
            unwrap_root(json!({"order": {"id": 1}}), "order"),
            json!({"id": 1})
        );
        assert_eq!(unwrap_root(json!({"id": 1}), "order"), json!({"id": 1}));
        assert_eq!(unwrap_root(json!([1, 2]), "orders"), json!([1, 2]));
    }

    #[test]
    fn test_extract_count() {
        assert_eq!(extract_count(&json!({"count": 7})).ok(), Some(7));
        assert!(matches!(
            extract_count(&json!({"total": 7})),
            Err(SapoError::UnexpectedResponse(_))
        ));
    }
}
