//! Every declared operation of every connector, routed to its endpoint.
//!
//! Each connector's route table must cover exactly the operations its schema
//! declares, so a new operation without a test fails here.

use reqwest::Method;
use sapo_integration_tests::{Route, assert_routes, covered_operations, declared_operations};
use serde_json::json;

async fn check(type_name: &str, routes: &[Route]) {
    assert_eq!(
        covered_operations(routes),
        declared_operations(type_name),
        "{type_name}: route table out of sync with the schema"
    );
    assert_routes(type_name, routes).await;
}

#[tokio::test]
async fn test_product_operations() {
    let id = json!({"productId": 8});
    let data = json!({"productId": 8, "data": {"name": "Áo thun"}});
    check(
        "sapoProduct",
        &[
            Route::new("create", json!({"data": {"name": "Áo thun"}}))
                .expect(Method::POST, "/admin/products.json"),
            Route::new("get", id.clone()).expect(Method::GET, "/admin/products/8.json"),
            Route::new("getMany", json!({})).expect(Method::GET, "/admin/products.json"),
            Route::new("update", data).expect(Method::PUT, "/admin/products/8.json"),
            Route::new("delete", id).expect(Method::DELETE, "/admin/products/8.json"),
            Route::new("count", json!({}))
                .respond(json!({"count": 3}))
                .expect(Method::GET, "/admin/products/count.json"),
        ],
    )
    .await;
}

#[tokio::test]
async fn test_order_operations() {
    let id = json!({"orderId": 4});
    check(
        "sapoOrder",
        &[
            Route::new("create", json!({"data": {"email": "a@b.vn"}}))
                .expect(Method::POST, "/admin/orders.json"),
            Route::new("get", id.clone()).expect(Method::GET, "/admin/orders/4.json"),
            Route::new("getMany", json!({})).expect(Method::GET, "/admin/orders.json"),
            Route::new("update", json!({"orderId": 4, "data": {"note": "gift"}}))
                .expect(Method::PUT, "/admin/orders/4.json"),
            Route::new("delete", id.clone()).expect(Method::DELETE, "/admin/orders/4.json"),
            Route::new("count", json!({}))
                .respond(json!({"count": 12}))
                .expect(Method::GET, "/admin/orders/count.json"),
            Route::new("cancel", id.clone()).expect(Method::POST, "/admin/orders/4/cancel.json"),
            Route::new("markAsPaid", id.clone())
                .expect(Method::POST, "/admin/orders/4/mark_as_paid.json"),
            Route::new("markAsFulfilled", id).expect(Method::POST, "/admin/orders/4/fulfill.json"),
        ],
    )
    .await;
}

#[tokio::test]
async fn test_customer_operations() {
    let id = json!({"customerId": 21});
    check(
        "sapoCustomer",
        &[
            Route::new("create", json!({"data": {"email": "lan@example.vn"}}))
                .expect(Method::POST, "/admin/customers.json"),
            Route::new("get", id.clone()).expect(Method::GET, "/admin/customers/21.json"),
            Route::new("getMany", json!({})).expect(Method::GET, "/admin/customers.json"),
            Route::new("update", json!({"customerId": 21, "data": {"note": "vip"}}))
                .expect(Method::PUT, "/admin/customers/21.json"),
            Route::new("delete", id).expect(Method::DELETE, "/admin/customers/21.json"),
            Route::new("count", json!({}))
                .respond(json!({"count": 0}))
                .expect(Method::GET, "/admin/customers/count.json"),
        ],
    )
    .await;
}

#[tokio::test]
async fn test_collection_operations() {
    let id = json!({"collectionId": 3});
    let membership = json!({"collectionId": 3, "productId": 5});
    check(
        "sapoCollection",
        &[
            Route::new("get", id.clone()).expect(Method::GET, "/admin/collections/3.json"),
            Route::new("getMany", json!({})).expect(Method::GET, "/admin/collections.json"),
            Route::new("count", json!({}))
                .respond(json!({"count": 2}))
                .expect(Method::GET, "/admin/collections/count.json"),
            Route::new("createCustom", json!({"data": {"title": "Hè"}}))
                .expect(Method::POST, "/admin/custom_collections.json"),
            Route::new("updateCustom", json!({"collectionId": 3, "data": {"title": "Đông"}}))
                .expect(Method::PUT, "/admin/custom_collections/3.json"),
            Route::new("deleteCustom", id.clone())
                .expect(Method::DELETE, "/admin/custom_collections/3.json"),
            Route::new("createSmart", json!({"data": {"title": "Sale", "rules": []}}))
                .expect(Method::POST, "/admin/smart_collections.json"),
            Route::new("updateSmart", json!({"collectionId": 3, "data": {"disjunctive": true}}))
                .expect(Method::PUT, "/admin/smart_collections/3.json"),
            Route::new("deleteSmart", id).expect(Method::DELETE, "/admin/smart_collections/3.json"),
            Route::new("addProduct", membership.clone())
                .expect(Method::POST, "/admin/collects.json"),
            Route::new("removeProduct", membership)
                .expect(Method::DELETE, "/admin/collections/3/products/5.json"),
            Route::new("setProductOrder", json!({"collectionId": 3, "productIds": "5, 6"}))
                .expect(Method::PUT, "/admin/collections/3/order.json"),
        ],
    )
    .await;
}

#[tokio::test]
async fn test_inventory_operations() {
    let transfer = json!({"productId": 10, "transferId": 4});
    check(
        "sapoInventory",
        &[
            Route::new("get", json!({"productId": 10}))
                .expect(Method::GET, "/admin/inventory_items/10.json"),
            Route::new("getMany", json!({})).expect(Method::GET, "/admin/inventory_levels.json"),
            Route::new(
                "adjustQuantity",
                json!({"productId": 10, "locationId": 2, "quantity": 5, "action": "add"}),
            )
            .expect(Method::POST, "/admin/inventory_levels/adjust.json"),
            Route::new("setLevel", json!({"productId": 10, "locationId": 2, "quantity": 40}))
                .expect(Method::POST, "/admin/inventory_levels/set.json"),
            Route::new(
                "transfer",
                json!({"productId": 10, "locationId": 2, "targetLocationId": 3, "quantity": 6}),
            )
            .expect(Method::POST, "/admin/inventory_items/10/transfers.json"),
            Route::new("getTransfer", transfer.clone())
                .expect(Method::GET, "/admin/inventory_items/10/transfers/4.json"),
            Route::new("cancelTransfer", transfer)
                .expect(Method::POST, "/admin/inventory_items/10/transfers/4/cancel.json"),
            Route::new("listLocations", json!({})).expect(Method::GET, "/admin/locations.json"),
            Route::new("getLocation", json!({"locationId": 2}))
                .expect(Method::GET, "/admin/locations/2.json"),
        ],
    )
    .await;
}

#[tokio::test]
async fn test_price_rule_operations() {
    let id = json!({"priceRuleId": 6});
    check(
        "sapoPriceRule",
        &[
            Route::new("create", json!({"data": {"title": "Summer Sale"}}))
                .expect(Method::POST, "/admin/price_rules.json"),
            Route::new("get", id.clone()).expect(Method::GET, "/admin/price_rules/6.json"),
            Route::new("getMany", json!({})).expect(Method::GET, "/admin/price_rules.json"),
            Route::new("update", json!({"priceRuleId": 6, "data": {"value": "-15.0"}}))
                .expect(Method::PUT, "/admin/price_rules/6.json"),
            Route::new("delete", id).expect(Method::DELETE, "/admin/price_rules/6.json"),
            Route::new("count", json!({}))
                .respond(json!({"count": 1}))
                .expect(Method::GET, "/admin/price_rules/count.json"),
        ],
    )
    .await;
}

#[tokio::test]
async fn test_fulfillment_operations() {
    let order = json!({"orderId": 1});
    let fulfillment = json!({"orderId": 1, "fulfillmentId": 2});
    check(
        "sapoFulfillment",
        &[
            Route::new("create", json!({"orderId": 1, "data": {"tracking_number": "VN1"}}))
                .expect(Method::POST, "/admin/orders/1/fulfillments.json"),
            Route::new("get", fulfillment.clone())
                .expect(Method::GET, "/admin/orders/1/fulfillments/2.json"),
            Route::new("getMany", order).expect(Method::GET, "/admin/orders/1/fulfillments.json"),
            Route::new(
                "updateTracking",
                json!({"orderId": 1, "fulfillmentId": 2, "data": {"tracking_number": "VN2"}}),
            )
            .expect(Method::POST, "/admin/orders/1/fulfillments/2/update_tracking.json"),
            Route::new("cancel", fulfillment.clone())
                .expect(Method::POST, "/admin/orders/1/fulfillments/2/cancel.json"),
            Route::new(
                "createEvent",
                json!({"orderId": 1, "fulfillmentId": 2, "data": {"status": "in_transit"}}),
            )
            .expect(Method::POST, "/admin/orders/1/fulfillments/2/events.json"),
            Route::new("listEvents", fulfillment)
                .expect(Method::GET, "/admin/orders/1/fulfillments/2/events.json"),
            Route::new("deleteEvent", json!({"orderId": 1, "fulfillmentId": 2, "eventId": 3}))
                .expect(Method::DELETE, "/admin/orders/1/fulfillments/2/events/3.json"),
            Route::new("getCarriers", json!({}))
                .expect(Method::GET, "/admin/carrier_services.json"),
        ],
    )
    .await;
}

#[tokio::test]
async fn test_metafield_operations() {
    let owner = json!({"resource": "customers", "resourceId": 5});
    let metafield = json!({"resource": "customers", "resourceId": 5, "metafieldId": 11});
    check(
        "sapoMetafield",
        &[
            Route::new(
                "create",
                json!({"resource": "customers", "resourceId": 5, "data": {"key": "tier"}}),
            )
            .expect(Method::POST, "/admin/customers/5/metafields.json"),
            Route::new("get", metafield.clone())
                .expect(Method::GET, "/admin/customers/5/metafields/11.json"),
            Route::new("getMany", owner.clone())
                .expect(Method::GET, "/admin/customers/5/metafields.json"),
            Route::new(
                "update",
                json!({
                    "resource": "customers",
                    "resourceId": 5,
                    "metafieldId": 11,
                    "data": {"value": "gold"},
                }),
            )
            .expect(Method::PUT, "/admin/customers/5/metafields/11.json"),
            Route::new("delete", metafield)
                .expect(Method::DELETE, "/admin/customers/5/metafields/11.json"),
            Route::new("bulkDelete", owner.clone())
                .respond(json!({"metafields": [{"id": 11}]}))
                .expect(Method::DELETE, "/admin/customers/5/metafields/11.json"),
            Route::new("count", owner)
                .respond(json!({"count": 4}))
                .expect(Method::GET, "/admin/customers/5/metafields/count.json"),
            Route::new(
                "validate",
                json!({
                    "resource": "customers",
                    "resourceId": 5,
                    "validationData": {"type": "integer", "value": "42"},
                }),
            ),
        ],
    )
    .await;
}

#[tokio::test]
async fn test_page_operations() {
    let id = json!({"pageId": 9});
    check(
        "sapoPage",
        &[
            Route::new("create", json!({"data": {"title": "Giới thiệu"}}))
                .expect(Method::POST, "/admin/pages.json"),
            Route::new("get", id.clone()).expect(Method::GET, "/admin/pages/9.json"),
            Route::new("getMany", json!({})).expect(Method::GET, "/admin/pages.json"),
            Route::new("update", json!({"pageId": 9, "data": {"published": false}}))
                .expect(Method::PUT, "/admin/pages/9.json"),
            Route::new("delete", id).expect(Method::DELETE, "/admin/pages/9.json"),
            Route::new("count", json!({}))
                .respond(json!({"count": 7}))
                .expect(Method::GET, "/admin/pages/count.json"),
        ],
    )
    .await;
}

#[tokio::test]
async fn test_blog_operations() {
    let blog = |extra: serde_json::Value| {
        let mut params = json!({"resource": "blog", "blogId": 1});
        if let (Some(target), Some(extra)) = (params.as_object_mut(), extra.as_object()) {
            target.extend(extra.clone());
        }
        params
    };
    let article = |extra: serde_json::Value| {
        let mut params = json!({"resource": "article", "blogId": 1, "articleId": 2});
        if let (Some(target), Some(extra)) = (params.as_object_mut(), extra.as_object()) {
            target.extend(extra.clone());
        }
        params
    };
    let data = json!({"data": {"title": "Tin mới"}});
    let comment = json!({"commentId": 3});

    check(
        "sapoBlog",
        &[
            Route::new("create", blog(data.clone())).expect(Method::POST, "/admin/blogs.json"),
            Route::new("get", blog(json!({}))).expect(Method::GET, "/admin/blogs/1.json"),
            Route::new("getMany", blog(json!({}))).expect(Method::GET, "/admin/blogs.json"),
            Route::new("update", blog(data.clone())).expect(Method::PUT, "/admin/blogs/1.json"),
            Route::new("delete", blog(json!({}))).expect(Method::DELETE, "/admin/blogs/1.json"),
            Route::new("create", article(data.clone()))
                .expect(Method::POST, "/admin/blogs/1/articles.json"),
            Route::new("get", article(json!({})))
                .expect(Method::GET, "/admin/blogs/1/articles/2.json"),
            Route::new("getMany", article(json!({})))
                .expect(Method::GET, "/admin/blogs/1/articles.json"),
            Route::new("update", article(data.clone()))
                .expect(Method::PUT, "/admin/blogs/1/articles/2.json"),
            Route::new("delete", article(json!({})))
                .expect(Method::DELETE, "/admin/blogs/1/articles/2.json"),
            Route::new("createComment", article(json!({"data": {"body": "Hay quá"}})))
                .expect(Method::POST, "/admin/blogs/1/articles/2/comments.json"),
            Route::new("getComments", article(json!({})))
                .expect(Method::GET, "/admin/blogs/1/articles/2/comments.json"),
            Route::new("getComment", article(comment.clone()))
                .expect(Method::GET, "/admin/blogs/1/articles/2/comments/3.json"),
            Route::new(
                "updateComment",
                article(json!({"commentId": 3, "data": {"body": "Đã sửa"}})),
            )
            .expect(Method::PUT, "/admin/blogs/1/articles/2/comments/3.json"),
            Route::new("deleteComment", article(comment.clone()))
                .expect(Method::DELETE, "/admin/blogs/1/articles/2/comments/3.json"),
            Route::new("spamCheck", article(comment))
                .expect(Method::POST, "/admin/blogs/1/articles/2/comments/3/spam_check.json"),
        ],
    )
    .await;
}

#[tokio::test]
async fn test_webhook_operations() {
    let id = json!({"webhookId": 15});
    check(
        "sapoWebhook",
        &[
            Route::new(
                "create",
                json!({
                    "data": {"topic": "orders/create", "address": "https://hooks.example.vn/sapo"}
                }),
            )
            .expect(Method::POST, "/admin/webhooks.json"),
            Route::new("get", id.clone()).expect(Method::GET, "/admin/webhooks/15.json"),
            Route::new("getMany", json!({})).expect(Method::GET, "/admin/webhooks.json"),
            Route::new("update", json!({"webhookId": 15, "data": {"format": "json"}}))
                .expect(Method::PUT, "/admin/webhooks/15.json"),
            Route::new("delete", id).expect(Method::DELETE, "/admin/webhooks/15.json"),
        ],
    )
    .await;
}
