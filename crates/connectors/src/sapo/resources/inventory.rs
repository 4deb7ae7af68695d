//! Inventory levels, stock transfers and locations.

use std::fmt;

use sapo_core::{LocationId, ProductId, TransferId};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::instrument;

use super::{Filters, query_pairs, unwrap_root, wrap};
use crate::sapo::{SapoClient, SapoError};

/// How an adjustment applies its quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjustmentAction {
    /// Replace the available quantity.
    #[default]
    Set,
    /// Add to the available quantity.
    Add,
    /// Subtract from the available quantity.
    Remove,
}

impl fmt::Display for AdjustmentAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Set => "set",
            Self::Add => "add",
            Self::Remove => "remove",
        })
    }
}

/// Stock adjustment at one location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryAdjustment {
    pub location_id: LocationId,
    pub quantity: i64,
    pub action: AdjustmentAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Stock movement between two locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryTransfer {
    pub from_location_id: LocationId,
    pub to_location_id: LocationId,
    pub quantity: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_number: Option<String>,
}

/// Inventory sub-client.
///
/// Inventory items are addressed by the product ID they track.
#[derive(Debug, Clone, Copy)]
pub struct Inventory<'a> {
    client: &'a SapoClient,
}

impl<'a> Inventory<'a> {
    pub(crate) const fn new(client: &'a SapoClient) -> Self {
        Self { client }
    }

    /// Get the inventory item for a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the item does not exist.
    #[instrument(skip(self), fields(item_id = %item))]
    pub async fn get(&self, item: ProductId) -> Result<Value, SapoError> {
        let response = self
            .client
            .get(&format!("inventory_items/{item}.json"), Vec::new())
            .await?;
        Ok(unwrap_root(response, "inventory_item"))
    }

    /// List inventory levels matching `filters` (`location_id`, update bounds).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, filters))]
    pub async fn list(&self, filters: &Filters) -> Result<Value, SapoError> {
        let response = self
            .client
            .get("inventory_levels.json", query_pairs(filters))
            .await?;
        Ok(unwrap_root(response, "inventory_levels"))
    }

    /// Adjust the stock of an item at one location.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, adjustment), fields(item_id = %item, action = %adjustment.action))]
    pub async fn adjust_quantity(
        &self,
        item: ProductId,
        adjustment: &InventoryAdjustment,
    ) -> Result<Value, SapoError> {
        let mut body = serde_json::to_value(adjustment)?;
        if let Some(map) = body.as_object_mut() {
            map.insert("inventory_item_id".to_string(), json!(item));
        }
        let response = self
            .client
            .post("inventory_levels/adjust.json", body)
            .await?;
        Ok(unwrap_root(response, "inventory_level"))
    }

    /// Set the available quantity of an item at one location.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(item_id = %item, location_id = %location))]
    pub async fn set_level(
        &self,
        item: ProductId,
        location: LocationId,
        available: i64,
    ) -> Result<Value, SapoError> {
        let response = self
            .client
            .post(
                "inventory_levels/set.json",
                json!({
                    "inventory_item_id": item,
                    "location_id": location,
                    "available": available,
                }),
            )
            .await?;
        Ok(unwrap_root(response, "inventory_level"))
    }

    /// Move stock of an item between locations.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, transfer), fields(item_id = %item))]
    pub async fn transfer(
        &self,
        item: ProductId,
        transfer: &InventoryTransfer,
    ) -> Result<Value, SapoError> {
        let response = self
            .client
            .post(
                &format!("inventory_items/{item}/transfers.json"),
                wrap("transfer", serde_json::to_value(transfer)?),
            )
            .await?;
        Ok(unwrap_root(response, "transfer"))
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails or the transfer does not exist.
    #[instrument(skip(self), fields(item_id = %item, transfer_id = %transfer))]
    pub async fn get_transfer(
        &self,
        item: ProductId,
        transfer: TransferId,
    ) -> Result<Value, SapoError> {
        let response = self
            .client
            .get(
                &format!("inventory_items/{item}/transfers/{transfer}.json"),
                Vec::new(),
            )
            .await?;
        Ok(unwrap_root(response, "transfer"))
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails or the transfer cannot be cancelled.
    #[instrument(skip(self), fields(item_id = %item, transfer_id = %transfer))]
    pub async fn cancel_transfer(
        &self,
        item: ProductId,
        transfer: TransferId,
    ) -> Result<Value, SapoError> {
        let response = self
            .client
            .post(
                &format!("inventory_items/{item}/transfers/{transfer}/cancel.json"),
                json!({}),
            )
            .await?;
        Ok(unwrap_root(response, "transfer"))
    }

    /// List all stock locations.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_locations(&self) -> Result<Value, SapoError> {
        let response = self.client.get("locations.json", Vec::new()).await?;
        Ok(unwrap_root(response, "locations"))
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails or the location does not exist.
    #[instrument(skip(self), fields(location_id = %id))]
    pub async fn get_location(&self, id: LocationId) -> Result<Value, SapoError> {
        let response = self
            .client
            .get(&format!("locations/{id}.json"), Vec::new())
            .await?;
        Ok(unwrap_root(response, "location"))
    }
}

#[cfg(test)]
mod tests {
    use crate::testing::{MockTransport, test_client};

    use super::*;

    #[tokio::test]
    async fn test_adjust_quantity_body() {
        let transport = MockTransport::shared();
        let client = test_client(&transport);
        let adjustment = InventoryAdjustment {
            location_id: LocationId::new(2),
            quantity: 5,
            action: AdjustmentAction::Add,
            reason: Some("restock".to_string()),
        };

        client
            .inventory()
            .adjust_quantity(ProductId::new(10), &adjustment)
            .await
            .expect("adjust");

        let request = transport.last_request().expect("request");
        assert_eq!(request.path(), "/admin/inventory_levels/adjust.json");
        assert_eq!(
            request.body,
            Some(json!({
                "inventory_item_id": 10,
                "location_id": 2,
                "quantity": 5,
                "action": "add",
                "reason": "restock",
            }))
        );
    }

    #[tokio::test]
    async fn test_transfer_body_omits_missing_notes() {
        let transport = MockTransport::shared();
        let client = test_client(&transport);
        let transfer = InventoryTransfer {
            from_location_id: LocationId::new(1),
            to_location_id: LocationId::new(2),
            quantity: 3,
            notes: None,
            reference_number: Some("PO-1".to_string()),
        };

        client
            .inventory()
            .transfer(ProductId::new(10), &transfer)
            .await
            .expect("transfer");

        let request = transport.last_request().expect("request");
        assert_eq!(request.path(), "/admin/inventory_items/10/transfers.json");
        assert_eq!(
            request.body,
            Some(json!({"transfer": {
                "from_location_id": 1,
                "to_location_id": 2,
                "quantity": 3,
                "reference_number": "PO-1",
            }}))
        );
    }

    #[test]
    fn test_adjustment_action_serde() {
        assert_eq!(
            serde_json::to_value(AdjustmentAction::Remove).expect("serialize"),
            json!("remove")
        );
        assert_eq!(AdjustmentAction::Set.to_string(), "set");
    }
}
