//! `sapoInventory`: inventory items and levels, stock adjustments, transfers
//! between locations and the location list.

use async_trait::async_trait;
use sapo_core::{FilterTimestamp, LocationId, OutputRecord, ProductId, TransferId};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::common::{
    ListRequest, Operation, filters_property, id_property, operation_enum, operation_property,
    pagination_properties, parse_operation, string_field, updated_fields,
};
use crate::credentials::CREDENTIAL_TYPE;
use crate::facade::SapoApi;
use crate::node::{
    Connector, ConnectorError, NodeDescription, NodeProperty, ParameterSet, PropertyOption,
    PropertyType,
};
use crate::sapo::resources::{AdjustmentAction, InventoryAdjustment, InventoryTransfer};

operation_enum! {
    /// Operations of the inventory connector.
    pub enum InventoryOperation {
        AdjustQuantity => ("adjustQuantity", "Adjust Quantity"),
        CancelTransfer => ("cancelTransfer", "Cancel Transfer"),
        Get => ("get", "Get"),
        GetLocation => ("getLocation", "Get Location"),
        GetMany => ("getMany", "Get Many"),
        GetTransfer => ("getTransfer", "Get Transfer"),
        ListLocations => ("listLocations", "List Locations"),
        SetLevel => ("setLevel", "Set Level"),
        Transfer => ("transfer", "Transfer"),
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InventoryFilters {
    pub location_id: Option<LocationId>,
    pub updated_at_min: Option<FilterTimestamp>,
    pub updated_at_max: Option<FilterTimestamp>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemRef {
    product_id: ProductId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LocationRef {
    location_id: LocationId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransferRef {
    product_id: ProductId,
    transfer_id: TransferId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AdjustParams {
    product_id: ProductId,
    location_id: LocationId,
    quantity: i64,
    #[serde(default)]
    action: AdjustmentAction,
    #[serde(default)]
    reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SetLevelParams {
    product_id: ProductId,
    location_id: LocationId,
    quantity: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransferParams {
    product_id: ProductId,
    location_id: LocationId,
    target_location_id: LocationId,
    quantity: i64,
    #[serde(default)]
    reason: Option<String>,
    #[serde(default)]
    reference_number: Option<String>,
}

/// `Some` only for non-blank text.
fn non_blank(text: Option<String>) -> Option<String> {
    text.filter(|t| !t.trim().is_empty())
}

/// The `sapoInventory` connector.
#[derive(Debug, Clone, Copy, Default)]
pub struct InventoryConnector;

#[async_trait]
impl Connector for InventoryConnector {
    fn type_name(&self) -> &'static str {
        "sapoInventory"
    }

    fn description(&self) -> NodeDescription {
        use InventoryOperation::{
            AdjustQuantity, CancelTransfer, Get, GetLocation, GetMany, GetTransfer, SetLevel,
            Transfer,
        };

        let mut fields = vec![
            NodeProperty::new("location_id", "Location ID", PropertyType::Number).default(json!(0)),
        ];
        fields.extend(updated_fields());

        let mut properties = vec![
            operation_property(GetMany),
            id_property(
                "productId",
                "Product ID",
                "ID of the product whose inventory item is addressed",
                &[Get, AdjustQuantity, SetLevel, Transfer, GetTransfer, CancelTransfer],
            ),
            NodeProperty::new("action", "Action", PropertyType::Options)
                .options(vec![
                    PropertyOption::new("Set", "set"),
                    PropertyOption::new("Add", "add"),
                    PropertyOption::new("Remove", "remove"),
                ])
                .default(json!("set"))
                .show("operation", [AdjustQuantity.as_str()]),
            id_property(
                "locationId",
                "Location ID",
                "ID of the location (source location for transfers)",
                &[AdjustQuantity, SetLevel, Transfer, GetLocation],
            ),
            id_property(
                "targetLocationId",
                "Target Location ID",
                "ID of the destination location",
                &[Transfer],
            ),
            id_property(
                "transferId",
                "Transfer ID",
                "ID of the transfer",
                &[GetTransfer, CancelTransfer],
            ),
            id_property(
                "quantity",
                "Quantity",
                "Number of units",
                &[AdjustQuantity, SetLevel, Transfer],
            ),
            string_field("referenceNumber", "Reference Number")
                .show("operation", [Transfer.as_str()]),
        ];
        properties.extend(pagination_properties(&[GetMany]));
        properties.push(filters_property(&[GetMany], fields));
        properties.push(
            string_field("reason", "Reason")
                .description("Reason for the change; sent as notes on transfers")
                .show("operation", [AdjustQuantity, SetLevel, Transfer].map(Operation::as_str)),
        );

        NodeDescription::new(
            self.type_name(),
            "Sapo Inventory",
            "Manage inventory levels, transfers and locations in Sapo",
        )
        .subtitle("={{$parameter[\"operation\"]}}")
        .credential(CREDENTIAL_TYPE)
        .properties(properties)
    }

    async fn run(
        &self,
        api: &SapoApi,
        params: &ParameterSet,
    ) -> Result<OutputRecord, ConnectorError> {
        let Some(operation) = parse_operation::<InventoryOperation>(params) else {
            return Ok(OutputRecord::empty());
        };
        tracing::debug!(operation = operation.as_str(), "Running inventory operation");
        let inventory = api.inventory();

        Ok(match operation {
            InventoryOperation::Get => {
                let ItemRef { product_id } = params.bind()?;
                OutputRecord::new(inventory.get(product_id).await?)
            }
            InventoryOperation::GetMany => {
                let filters = ListRequest::<InventoryFilters>::bind(params)?.into_filters()?;
                OutputRecord::new(inventory.list(&filters).await?)
            }
            InventoryOperation::AdjustQuantity => {
                let p: AdjustParams = params.bind()?;
                let adjustment = InventoryAdjustment {
                    location_id: p.location_id,
                    quantity: p.quantity,
                    action: p.action,
                    reason: non_blank(p.reason),
                };
                OutputRecord::new(inventory.adjust_quantity(p.product_id, &adjustment).await?)
            }
            InventoryOperation::SetLevel => {
                let p: SetLevelParams = params.bind()?;
                OutputRecord::new(
                    inventory
                        .set_level(p.product_id, p.location_id, p.quantity)
                        .await?,
                )
            }
            InventoryOperation::Transfer => {
                let p: TransferParams = params.bind()?;
                let transfer = InventoryTransfer {
                    from_location_id: p.location_id,
                    to_location_id: p.target_location_id,
                    quantity: p.quantity,
                    notes: non_blank(p.reason),
                    reference_number: non_blank(p.reference_number),
                };
                OutputRecord::new(inventory.transfer(p.product_id, &transfer).await?)
            }
            InventoryOperation::GetTransfer => {
                let TransferRef {
                    product_id,
                    transfer_id,
                } = params.bind()?;
                OutputRecord::new(inventory.get_transfer(product_id, transfer_id).await?)
            }
            InventoryOperation::CancelTransfer => {
                let TransferRef {
                    product_id,
                    transfer_id,
                } = params.bind()?;
                OutputRecord::new(inventory.cancel_transfer(product_id, transfer_id).await?)
            }
            InventoryOperation::ListLocations => {
                OutputRecord::new(json!({ "locations": inventory.list_locations().await? }))
            }
            InventoryOperation::GetLocation => {
                let LocationRef { location_id } = params.bind()?;
                OutputRecord::new(inventory.get_location(location_id).await?)
            }
        })
    }
}
