//! `sapoPriceRule`: discount price rules.

use async_trait::async_trait;
use sapo_core::{FilterTimestamp, OutputRecord, PriceRuleId};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::common::{
    ListRequest, Operation, Payload, created_fields, data_property, filters_property, id_property,
    operation_enum, operation_property, options_field, pagination_properties, parse_operation,
    string_field,
};
use crate::credentials::CREDENTIAL_TYPE;
use crate::facade::SapoApi;
use crate::node::{Connector, ConnectorError, NodeDescription, ParameterSet};

operation_enum! {
    pub enum PriceRuleOperation {
        Count => ("count", "Count"),
        Create => ("create", "Create"),
        Delete => ("delete", "Delete"),
        Get => ("get", "Get"),
        GetMany => ("getMany", "Get Many"),
        Update => ("update", "Update"),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceRuleStatus {
    Active,
    Disabled,
    Expired,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PriceRuleFilters {
    pub status: Option<PriceRuleStatus>,
    pub title: Option<String>,
    pub created_at_min: Option<FilterTimestamp>,
    pub created_at_max: Option<FilterTimestamp>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PriceRuleRef {
    price_rule_id: PriceRuleId,
}

fn example_rule() -> serde_json::Value {
    json!({
        "title": "Summer Sale",
        "value_type": "percentage",
        "value": "-20.0",
        "starts_at": "2024-06-01T00:00:00Z",
        "ends_at": "2024-08-31T23:59:59Z",
        "customer_selection": "all",
        "target_type": "line_item",
        "target_selection": "all",
    })
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PriceRuleConnector;

#[async_trait]
impl Connector for PriceRuleConnector {
    fn type_name(&self) -> &'static str {
        "sapoPriceRule"
    }

    fn description(&self) -> NodeDescription {
        use PriceRuleOperation::{Create, Delete, Get, GetMany, Update};

        let mut fields = vec![
            options_field(
                "status",
                "Status",
                &[("Active", "active"), ("Disabled", "disabled"), ("Expired", "expired")],
                "active",
            ),
            string_field("title", "Title"),
        ];
        fields.extend(created_fields());

        let mut properties = vec![
            operation_property(GetMany),
            id_property(
                "priceRuleId",
                "Price Rule ID",
                "ID of the price rule",
                &[Get, Update, Delete],
            ),
        ];
        properties.extend(pagination_properties(&[GetMany]));
        properties.push(filters_property(&[GetMany], fields));
        properties.push(data_property(&[Create, Update], example_rule()));

        NodeDescription::new(
            self.type_name(),
            "Sapo Price Rule",
            "Manage discount price rules in Sapo",
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
        let Some(operation) = parse_operation::<PriceRuleOperation>(params) else {
            return Ok(OutputRecord::empty());
        };
        tracing::debug!(operation = operation.as_str(), "Running price rule operation");
        let rules = api.price_rules();
        let rule_id = || params.bind::<PriceRuleRef>().map(|r| r.price_rule_id);

        Ok(match operation {
            PriceRuleOperation::Create => {
                OutputRecord::new(rules.create(Payload::bind(params)?).await?)
            }
            PriceRuleOperation::Get => OutputRecord::new(rules.get(rule_id()?).await?),
            PriceRuleOperation::GetMany => {
                let filters = ListRequest::<PriceRuleFilters>::bind(params)?.into_filters()?;
                OutputRecord::new(rules.list(&filters).await?)
            }
            PriceRuleOperation::Update => {
                OutputRecord::new(rules.update(rule_id()?, Payload::bind(params)?).await?)
            }
            PriceRuleOperation::Delete => {
                rules.delete(rule_id()?).await?;
                OutputRecord::success()
            }
            PriceRuleOperation::Count => OutputRecord::count(rules.count().await?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::execute;
    use crate::testing::{MockTransport, test_context};

    #[tokio::test]
    async fn test_create_uses_example_document_by_default() {
        let transport = MockTransport::shared();
        let ctx = test_context("sapoPriceRule", json!({"operation": "create"}), &transport);

        execute(&PriceRuleConnector, &ctx).await.expect("execute");

        let request = transport.last_request().expect("request");
        assert_eq!(request.path(), "/admin/price_rules.json");
        assert_eq!(request.body, Some(json!({"price_rule": example_rule()})));
    }

    #[tokio::test]
    async fn test_count() {
        let transport = MockTransport::shared();
        transport.respond_with(json!({"count": 3}));
        let ctx = test_context("sapoPriceRule", json!({"operation": "count"}), &transport);

        let batches = execute(&PriceRuleConnector, &ctx).await.expect("execute");

        assert_eq!(batches[0][0].json, json!({"count": 3}));
    }
}
