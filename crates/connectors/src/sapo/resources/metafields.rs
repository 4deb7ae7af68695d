//! Metafield operations on any owner resource, plus local value validation.

use std::fmt;

use sapo_core::{MetafieldId, ResourceId};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use super::{Filters, Rest};
use crate::sapo::{SapoClient, SapoError};

/// Resource kinds that can own metafields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetafieldOwnerType {
    Article,
    Blog,
    Collection,
    Customer,
    Order,
    Page,
    Product,
    Variant,
}

impl MetafieldOwnerType {
    /// Every owner type.
    pub const ALL: [Self; 8] = [
        Self::Article,
        Self::Blog,
        Self::Collection,
        Self::Customer,
        Self::Order,
        Self::Page,
        Self::Product,
        Self::Variant,
    ];

    /// Map a plural resource selector (`customers`) to its owner type.
    ///
    /// Unrecognised selectors fall back to [`Self::Product`].
    #[must_use]
    pub fn from_resource(resource: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|owner| owner.plural() == resource)
            .unwrap_or(Self::Product)
    }

    /// Singular API name (`customer`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Article => "article",
            Self::Blog => "blog",
            Self::Collection => "collection",
            Self::Customer => "customer",
            Self::Order => "order",
            Self::Page => "page",
            Self::Product => "product",
            Self::Variant => "variant",
        }
    }

    /// Plural path segment (`customers`).
    #[must_use]
    pub const fn plural(self) -> &'static str {
        match self {
            Self::Article => "articles",
            Self::Blog => "blogs",
            Self::Collection => "collections",
            Self::Customer => "customers",
            Self::Order => "orders",
            Self::Page => "pages",
            Self::Product => "products",
            Self::Variant => "variants",
        }
    }
}

impl fmt::Display for MetafieldOwnerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The resource a metafield hangs off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetafieldOwner {
    pub owner_type: MetafieldOwnerType,
    pub owner_id: ResourceId,
}

impl MetafieldOwner {
    #[must_use]
    pub const fn new(owner_type: MetafieldOwnerType, owner_id: ResourceId) -> Self {
        Self {
            owner_type,
            owner_id,
        }
    }

    fn path(&self) -> String {
        format!("{}/{}/metafields", self.owner_type.plural(), self.owner_id)
    }
}

/// A metafield value to check against its declared type.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MetafieldValidation {
    /// `string`, `integer`, `json_string` or `boolean`.
    #[serde(rename = "type")]
    pub value_type: String,
    pub value: Value,
}

impl MetafieldValidation {
    /// Check the value against its type.
    ///
    /// # Errors
    ///
    /// Returns `SapoError::Validation` if the value does not match the type
    /// or the type is not supported.
    pub fn validate(&self) -> Result<(), SapoError> {
        let valid = match self.value_type.as_str() {
            "string" => self.value.is_string(),
            "integer" => match &self.value {
                Value::Number(n) => n.is_i64() || n.is_u64(),
                Value::String(s) => s.trim().parse::<i64>().is_ok(),
                _ => false,
            },
            "json_string" => match &self.value {
                Value::String(s) => serde_json::from_str::<Value>(s).is_ok(),
                Value::Object(_) | Value::Array(_) => true,
                _ => false,
            },
            "boolean" => match &self.value {
                Value::Bool(_) => true,
                Value::String(s) => matches!(s.as_str(), "true" | "false"),
                _ => false,
            },
            other => {
                return Err(SapoError::Validation(format!(
                    "unsupported metafield type: {other}"
                )));
            }
        };

        if valid {
            Ok(())
        } else {
            Err(SapoError::Validation(format!(
                "value {} is not a valid {}",
                self.value, self.value_type
            )))
        }
    }
}

/// Metafields sub-client.
#[derive(Debug, Clone, Copy)]
pub struct Metafields<'a> {
    client: &'a SapoClient,
}

impl<'a> Metafields<'a> {
    pub(crate) const fn new(client: &'a SapoClient) -> Self {
        Self { client }
    }

    fn rest(&self, owner: &MetafieldOwner) -> Rest<'a> {
        Rest::new(self.client, owner.path(), "metafield", "metafields")
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails or the document is rejected.
    #[instrument(skip(self, data), fields(owner = %owner.owner_type, owner_id = %owner.owner_id))]
    pub async fn create(&self, owner: &MetafieldOwner, data: Value) -> Result<Value, SapoError> {
        self.rest(owner).create(data).await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails or the metafield does not exist.
    #[instrument(
        skip(self),
        fields(owner = %owner.owner_type, owner_id = %owner.owner_id, metafield_id = %id)
    )]
    pub async fn get(&self, owner: &MetafieldOwner, id: MetafieldId) -> Result<Value, SapoError> {
        self.rest(owner).get(id.as_i64()).await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(
        skip(self, filters),
        fields(owner = %owner.owner_type, owner_id = %owner.owner_id)
    )]
    pub async fn list(
        &self,
        owner: &MetafieldOwner,
        filters: &Filters,
    ) -> Result<Value, SapoError> {
        self.rest(owner).list(filters).await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails or the document is rejected.
    #[instrument(
        skip(self, data),
        fields(owner = %owner.owner_type, owner_id = %owner.owner_id, metafield_id = %id)
    )]
    pub async fn update(
        &self,
        owner: &MetafieldOwner,
        id: MetafieldId,
        data: Value,
    ) -> Result<Value, SapoError> {
        self.rest(owner).update(id.as_i64(), data).await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(
        skip(self),
        fields(owner = %owner.owner_type, owner_id = %owner.owner_id, metafield_id = %id)
    )]
    pub async fn delete(&self, owner: &MetafieldOwner, id: MetafieldId) -> Result<(), SapoError> {
        self.rest(owner).delete(id.as_i64()).await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails or the response has no count.
    #[instrument(
        skip(self, filters),
        fields(owner = %owner.owner_type, owner_id = %owner.owner_id)
    )]
    pub async fn count(&self, owner: &MetafieldOwner, filters: &Filters) -> Result<u64, SapoError> {
        self.rest(owner).count(filters).await
    }

    /// Delete every metafield of `owner` matching `filters`.
    ///
    /// Matches are deleted one at a time; the first failure stops the run.
    /// Returns `{"deleted": [ids]}`.
    ///
    /// # Errors
    ///
    /// Returns an error if listing or any deletion fails.
    #[instrument(
        skip(self, filters),
        fields(owner = %owner.owner_type, owner_id = %owner.owner_id)
    )]
    pub async fn bulk_delete(
        &self,
        owner: &MetafieldOwner,
        filters: &Filters,
    ) -> Result<Value, SapoError> {
        let rest = self.rest(owner);
        let matches = rest.list(filters).await?;
        let ids: Vec<i64> = matches
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|m| m.get("id").and_then(Value::as_i64))
                    .collect()
            })
            .unwrap_or_default();

        for id in &ids {
            rest.delete(*id).await?;
        }

        tracing::info!(deleted = ids.len(), "Bulk-deleted metafields");
        Ok(json!({ "deleted": ids }))
    }

    /// Check a value against its metafield type without calling the API.
    ///
    /// # Errors
    ///
    /// Returns `SapoError::Validation` if the value is invalid.
    #[allow(clippy::unused_self)]
    pub fn validate_value(&self, validation: &MetafieldValidation) -> Result<(), SapoError> {
        validation.validate()
    }
}
