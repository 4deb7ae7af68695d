//! The eleven Sapo connectors, one per resource family.
//!
//! Each connector declares its parameter form and dispatches the selected
//! operation to one API call through [`SapoApi`](crate::facade::SapoApi).

pub(crate) mod common;

pub mod blog;
pub mod collection;
pub mod customer;
pub mod fulfillment;
pub mod inventory;
pub mod metafield;
pub mod order;
pub mod page;
pub mod price_rule;
pub mod product;
pub mod webhook;

pub use blog::BlogConnector;
pub use collection::CollectionConnector;
pub use common::{Operation, PublishedStatus, UnknownOperation};
pub use customer::CustomerConnector;
pub use fulfillment::FulfillmentConnector;
pub use inventory::InventoryConnector;
pub use metafield::MetafieldConnector;
pub use order::OrderConnector;
pub use page::PageConnector;
pub use price_rule::PriceRuleConnector;
pub use product::ProductConnector;
pub use webhook::WebhookConnector;

use crate::node::Connector;

/// Every connector, in manifest order.
pub static ALL: [&dyn Connector; 11] = [
    &BlogConnector,
    &CollectionConnector,
    &CustomerConnector,
    &FulfillmentConnector,
    &InventoryConnector,
    &MetafieldConnector,
    &OrderConnector,
    &PageConnector,
    &PriceRuleConnector,
    &ProductConnector,
    &WebhookConnector,
];
