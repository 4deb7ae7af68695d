//! Execution behaviour shared by the connectors: pagination, filters,
//! failure handling and the shape of emitted records.

use sapo_connectors::INIT_FAILURE_MESSAGE;
use sapo_connectors::sapo::SapoError;
use sapo_core::SapoCredentials;
use sapo_integration_tests::{CredentialVault, Harness, NODE_NAME, STORE};
use serde_json::json;

#[tokio::test]
async fn test_get_many_forwards_limit() {
    let harness = Harness::new();
    harness
        .transport
        .respond_with(json!({"orders": [{"id": 1}, {"id": 2}]}));

    let output = harness
        .output("sapoOrder", json!({"operation": "getMany", "limit": 2}))
        .await;

    assert_eq!(output, json!([{"id": 1}, {"id": 2}]));
    let request = harness.transport.last_request().expect("request");
    assert_eq!(request.query_value("limit"), Some("2"));
}

#[tokio::test]
async fn test_get_many_defaults_to_fifty() {
    let harness = Harness::new();
    harness
        .output("sapoCustomer", json!({"operation": "getMany"}))
        .await;

    let request = harness.transport.last_request().expect("request");
    assert_eq!(request.query_value("limit"), Some("50"));
}

#[tokio::test]
async fn test_return_all_omits_limit() {
    let harness = Harness::new();
    harness
        .output(
            "sapoProduct",
            json!({"operation": "getMany", "returnAll": true, "limit": 5}),
        )
        .await;

    let request = harness.transport.last_request().expect("request");
    assert_eq!(request.query_value("limit"), None);
}

#[tokio::test]
async fn test_limit_below_one_is_raised_to_one() {
    let harness = Harness::new();
    harness
        .output("sapoPage", json!({"operation": "getMany", "limit": 0}))
        .await;

    let request = harness.transport.last_request().expect("request");
    assert_eq!(request.query_value("limit"), Some("1"));
}

#[tokio::test]
async fn test_filters_reach_the_query() {
    let harness = Harness::new();
    harness
        .output(
            "sapoOrder",
            json!({
                "operation": "getMany",
                "additionalFields": {
                    "status": "open",
                    "financial_status": "paid",
                    "created_at_min": "2024-03-01T08:00:00+07:00",
                    "created_at_max": "2024-03-31T18:00:00",
                    "fulfillment_status": "",
                },
            }),
        )
        .await;

    let request = harness.transport.last_request().expect("request");
    assert_eq!(request.query_value("status"), Some("open"));
    assert_eq!(request.query_value("financial_status"), Some("paid"));
    assert_eq!(
        request.query_value("created_at_min"),
        Some("2024-03-01T08:00:00+07:00")
    );
    assert_eq!(
        request.query_value("created_at_max"),
        Some("2024-03-31T18:00:00")
    );
    assert_eq!(request.query_value("fulfillment_status"), None);
}

#[tokio::test]
async fn test_unknown_filter_is_a_parameter_error() {
    let harness = Harness::new();
    let err = harness
        .run(
            "sapoProduct",
            json!({"operation": "getMany", "additionalFields": {"vendor": "Nike"}}),
        )
        .await
        .expect_err("unknown filter");

    assert!(err.message.contains("additionalFields"), "{}", err.message);
    assert!(harness.transport.requests().is_empty());
}

#[tokio::test]
async fn test_count_emits_count_record() {
    let harness = Harness::new();
    harness.transport.respond_with(json!({"count": 42}));

    let output = harness
        .output("sapoOrder", json!({"operation": "count"}))
        .await;

    assert_eq!(output, json!({"count": 42}));
}

#[tokio::test]
async fn test_delete_emits_success_record() {
    let harness = Harness::new();
    let output = harness
        .output("sapoWebhook", json!({"operation": "delete", "webhookId": 3}))
        .await;

    assert_eq!(output, json!({"success": true}));
}

#[tokio::test]
async fn test_create_wraps_data_in_resource_root() {
    let harness = Harness::new();
    harness
        .transport
        .respond_with(json!({"customer": {"id": 77, "email": "lan@example.vn"}}));

    let output = harness
        .output(
            "sapoCustomer",
            json!({"operation": "create", "data": "{\"email\": \"lan@example.vn\"}"}),
        )
        .await;

    assert_eq!(output, json!({"id": 77, "email": "lan@example.vn"}));
    let request = harness.transport.last_request().expect("request");
    assert_eq!(
        request.body,
        Some(json!({"customer": {"email": "lan@example.vn"}}))
    );
}

#[tokio::test]
async fn test_invalid_json_data_is_a_parameter_error() {
    let harness = Harness::new();
    let err = harness
        .run("sapoProduct", json!({"operation": "create", "data": "{oops"}))
        .await
        .expect_err("bad JSON");

    assert!(err.message.starts_with("Invalid parameter"), "{}", err.message);
}

#[tokio::test]
async fn test_set_product_order_sends_ids_in_order() {
    let harness = Harness::new();
    harness
        .transport
        .respond_with(json!({"collection": {"id": 4, "sort_order": "manual"}}));

    let output = harness
        .output(
            "sapoCollection",
            json!({"operation": "setProductOrder", "collectionId": 4, "productIds": " 3,1 ,, 2 "}),
        )
        .await;

    assert_eq!(output, json!({"id": 4, "sort_order": "manual"}));
    let request = harness.transport.last_request().expect("request");
    assert_eq!(request.body, Some(json!({"products": [3, 1, 2]})));
}

#[tokio::test]
async fn test_set_product_order_rejects_non_numeric_ids() {
    let harness = Harness::new();
    let err = harness
        .run(
            "sapoCollection",
            json!({"operation": "setProductOrder", "collectionId": 4, "productIds": "3, abc"}),
        )
        .await
        .expect_err("bad id");

    assert!(err.message.contains("'abc'"), "{}", err.message);
    assert!(harness.transport.requests().is_empty());
}

#[tokio::test]
async fn test_inventory_adjust_body() {
    let harness = Harness::new();
    harness
        .output(
            "sapoInventory",
            json!({
                "operation": "adjustQuantity",
                "productId": 10,
                "locationId": 2,
                "quantity": -3,
                "action": "remove",
                "reason": "  ",
            }),
        )
        .await;

    let request = harness.transport.last_request().expect("request");
    let body = request.body.expect("body");
    assert_eq!(body["inventory_item_id"], 10);
    assert_eq!(body["location_id"], 2);
    assert_eq!(body["quantity"], -3);
    assert_eq!(body["action"], "remove");
    assert!(body.get("reason").is_none_or(serde_json::Value::is_null));
}

#[tokio::test]
async fn test_list_locations_is_wrapped() {
    let harness = Harness::new();
    harness
        .transport
        .respond_with(json!({"locations": [{"id": 1, "name": "Kho Hà Nội"}]}));

    let output = harness
        .output("sapoInventory", json!({"operation": "listLocations"}))
        .await;

    assert_eq!(output, json!({"locations": [{"id": 1, "name": "Kho Hà Nội"}]}));
}

#[tokio::test]
async fn test_metafield_bulk_delete_removes_every_match() {
    let harness = Harness::new();
    harness
        .transport
        .respond_with(json!({"metafields": [{"id": 11}, {"id": 12}]}));

    let output = harness
        .output(
            "sapoMetafield",
            json!({
                "operation": "bulkDelete",
                "resource": "products",
                "resourceId": 8,
                "additionalFields": {"namespace": "custom"},
            }),
        )
        .await;

    assert_eq!(output, json!({"deleted": [11, 12]}));
    let requests = harness.transport.requests();
    assert_eq!(requests.len(), 3);
    assert_eq!(requests[0].query_value("namespace"), Some("custom"));
    assert_eq!(requests[0].query_value("limit"), None);
    assert_eq!(requests[2].path(), "/admin/products/8/metafields/12.json");
}

#[tokio::test]
async fn test_metafield_validation_failure() {
    let harness = Harness::new();
    let err = harness
        .run(
            "sapoMetafield",
            json!({
                "operation": "validate",
                "resourceId": 8,
                "validationData": {"type": "integer", "value": "mười"},
            }),
        )
        .await
        .expect_err("invalid integer");

    assert!(err.message.starts_with("Validation failed"), "{}", err.message);
    assert!(harness.transport.requests().is_empty());
}

#[tokio::test]
async fn test_metafield_validation_success() {
    let harness = Harness::new();
    let output = harness
        .output(
            "sapoMetafield",
            json!({
                "operation": "validate",
                "resourceId": 8,
                "validationData": "{\"type\": \"boolean\", \"value\": \"true\"}",
            }),
        )
        .await;

    assert_eq!(output, json!({"valid": true}));
}

#[tokio::test]
async fn test_unknown_operation_emits_empty_record() {
    let harness = Harness::new();
    let output = harness
        .output("sapoProduct", json!({"operation": "archive"}))
        .await;

    assert_eq!(output, json!({}));
    assert!(harness.transport.requests().is_empty());
}

#[tokio::test]
async fn test_comment_operation_on_blog_resource_emits_empty_record() {
    let harness = Harness::new();
    let output = harness
        .output(
            "sapoBlog",
            json!({"operation": "getComments", "resource": "blog", "blogId": 1}),
        )
        .await;

    assert_eq!(output, json!({}));
    assert!(harness.transport.requests().is_empty());
}

#[tokio::test]
async fn test_unknown_blog_resource_emits_empty_record() {
    let harness = Harness::new();
    let output = harness
        .output(
            "sapoBlog",
            json!({"operation": "get", "resource": "comment", "blogId": 1}),
        )
        .await;

    assert_eq!(output, json!({}));
}

#[tokio::test]
async fn test_missing_id_falls_back_to_schema_default() {
    let harness = Harness::new();
    harness
        .output("sapoOrder", json!({"operation": "cancel"}))
        .await;

    let request = harness.transport.last_request().expect("request");
    assert_eq!(request.path(), "/admin/orders/0/cancel.json");
}

#[tokio::test]
async fn test_non_numeric_id_is_a_parameter_error() {
    let harness = Harness::new();
    let err = harness
        .run("sapoOrder", json!({"operation": "cancel", "orderId": "#1001"}))
        .await
        .expect_err("string orderId");

    assert_eq!(err.node, NODE_NAME);
    assert!(err.message.starts_with("Invalid parameter"), "{}", err.message);
    assert!(harness.transport.requests().is_empty());
}

#[tokio::test]
async fn test_api_failure_raises_node_error() {
    let harness = Harness::new();
    harness
        .transport
        .fail_with(SapoError::NotFound("/admin/products/404.json".to_string()));

    let err = harness
        .run("sapoProduct", json!({"operation": "get", "productId": 404}))
        .await
        .expect_err("not found");

    assert_eq!(err.node, NODE_NAME);
    assert_eq!(err.message, "Not found: /admin/products/404.json");
}

#[tokio::test]
async fn test_continue_on_fail_emits_error_record() {
    let harness = Harness::new().continue_on_fail();
    harness.transport.fail_with(SapoError::Api {
        status: 422,
        message: "title: can't be blank".to_string(),
    });

    let output = harness
        .output("sapoPage", json!({"operation": "create", "data": {}}))
        .await;

    assert_eq!(
        output,
        json!({"error": "API error (422): title: can't be blank"})
    );
}

#[tokio::test]
async fn test_continue_on_fail_covers_parameter_errors() {
    let harness = Harness::new().continue_on_fail();
    let output = harness
        .output(
            "sapoFulfillment",
            json!({"operation": "get", "orderId": 1, "fulfillmentId": "F-2"}),
        )
        .await;

    let message = output["error"].as_str().expect("error record");
    assert!(message.starts_with("Invalid parameter"), "{message}");
}

#[tokio::test]
async fn test_missing_credentials_fail_initialisation() {
    let harness = Harness::with_vault(CredentialVault::default()).continue_on_fail();
    let err = harness
        .run("sapoOrder", json!({"operation": "count"}))
        .await
        .expect_err("init failure is never suppressed");

    assert_eq!(err.node, NODE_NAME);
    assert_eq!(err.message, INIT_FAILURE_MESSAGE);
    assert!(
        err.description
            .as_deref()
            .is_some_and(|d| d.contains("sapoApi"))
    );
    assert!(harness.transport.requests().is_empty());
}

#[tokio::test]
async fn test_malformed_store_fails_initialisation() {
    let vault = CredentialVault::default().insert(
        "sapoApi",
        SapoCredentials::new(format!("https://{STORE}/admin"), "k", "s"),
    );
    let harness = Harness::with_vault(vault);

    let err = harness
        .run("sapoProduct", json!({"operation": "count"}))
        .await
        .expect_err("bad store");

    assert_eq!(err.message, INIT_FAILURE_MESSAGE);
}

#[tokio::test]
async fn test_access_token_is_sent_when_configured() {
    let vault = CredentialVault::default().insert(
        "sapoApi",
        SapoCredentials::new(STORE, "0f3a9c2be71d4a58", "8d6e1f04b2c94a7e")
            .with_access_token("shpat-token"),
    );
    let harness = Harness::with_vault(vault);
    harness.transport.respond_with(json!({"count": 1}));

    harness
        .output("sapoProduct", json!({"operation": "count"}))
        .await;

    let request = harness.transport.last_request().expect("request");
    assert!(matches!(
        request.auth,
        sapo_connectors::sapo::Auth::AccessToken(_)
    ));
    assert_eq!(
        request.url.as_str(),
        format!("https://{STORE}/admin/products/count.json")
    );
}
