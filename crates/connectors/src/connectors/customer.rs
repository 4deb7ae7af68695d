//! `sapoCustomer`: customer CRUD and counting.

use async_trait::async_trait;
use sapo_core::{CustomerId, FilterTimestamp, OutputRecord};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::common::{
    ListRequest, Operation, Payload, created_fields, data_property, filters_property, id_property,
    operation_enum, operation_property, pagination_properties, parse_operation, string_field,
    updated_fields,
};
use crate::credentials::CREDENTIAL_TYPE;
use crate::facade::SapoApi;
use crate::node::{Connector, ConnectorError, NodeDescription, ParameterSet};

operation_enum! {
    pub enum CustomerOperation {
        Create => ("create", "Create"),
        Get => ("get", "Get"),
        GetMany => ("getMany", "Get Many"),
        Update => ("update", "Update"),
        Delete => ("delete", "Delete"),
        Count => ("count", "Count"),
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CustomerFilters {
    pub created_at_min: Option<FilterTimestamp>,
    pub created_at_max: Option<FilterTimestamp>,
    pub updated_at_min: Option<FilterTimestamp>,
    pub updated_at_max: Option<FilterTimestamp>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CustomerRef {
    customer_id: CustomerId,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CustomerConnector;

#[async_trait]
impl Connector for CustomerConnector {
    fn type_name(&self) -> &'static str {
        "sapoCustomer"
    }

    fn description(&self) -> NodeDescription {
        use CustomerOperation::{Create, Delete, Get, GetMany, Update};

        let mut fields = [created_fields(), updated_fields()].concat();
        fields.push(string_field("email", "Email"));
        fields.push(string_field("phone", "Phone"));

        let mut properties = vec![
            operation_property(GetMany),
            id_property("customerId", "Customer ID", "ID of the customer", &[Get, Update, Delete]),
        ];
        properties.extend(pagination_properties(&[GetMany]));
        properties.push(filters_property(&[GetMany], fields));
        properties.push(data_property(&[Create, Update], json!({})));

        NodeDescription::new(self.type_name(), "Sapo Customer", "Manage customers in Sapo")
            .subtitle("={{$parameter[\"operation\"]}}")
            .credential(CREDENTIAL_TYPE)
            .properties(properties)
    }

    async fn run(
        &self,
        api: &SapoApi,
        params: &ParameterSet,
    ) -> Result<OutputRecord, ConnectorError> {
        let Some(operation) = parse_operation::<CustomerOperation>(params) else {
            return Ok(OutputRecord::empty());
        };
        tracing::debug!(operation = operation.as_str(), "Running customer operation");
        let customers = api.customers();
        let customer_id = || params.bind::<CustomerRef>().map(|r| r.customer_id);

        Ok(match operation {
            CustomerOperation::Create => {
                OutputRecord::new(customers.create(Payload::bind(params)?).await?)
            }
            CustomerOperation::Get => OutputRecord::new(customers.get(customer_id()?).await?),
            CustomerOperation::GetMany => {
                let filters = ListRequest::<CustomerFilters>::bind(params)?.into_filters()?;
                OutputRecord::new(customers.list(&filters).await?)
            }
            CustomerOperation::Update => OutputRecord::new(
                customers
                    .update(customer_id()?, Payload::bind(params)?)
                    .await?,
            ),
            CustomerOperation::Delete => {
                customers.delete(customer_id()?).await?;
                OutputRecord::success()
            }
            CustomerOperation::Count => OutputRecord::count(customers.count().await?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::execute;
    use crate::testing::{MockTransport, test_context};

    #[tokio::test]
    async fn test_get_many_drops_blank_filters() {
        let transport = MockTransport::shared();
        let ctx = test_context(
            "sapoCustomer",
            json!({
                "operation": "getMany",
                "limit": 10,
                "additionalFields": {"email": "a@example.com", "phone": ""},
            }),
            &transport,
        );

        execute(&CustomerConnector, &ctx).await.expect("execute");

        let request = transport.last_request().expect("request");
        assert_eq!(request.query_value("email"), Some("a@example.com"));
        assert_eq!(request.query_value("phone"), None);
        assert_eq!(request.query_value("limit"), Some("10"));
    }

    #[tokio::test]
    async fn test_update_accepts_json_text() {
        let transport = MockTransport::shared();
        let ctx = test_context(
            "sapoCustomer",
            json!({"operation": "update", "customerId": 3, "data": "{\"note\": \"vip\"}"}),
            &transport,
        );

        execute(&CustomerConnector, &ctx).await.expect("execute");

        let request = transport.last_request().expect("request");
        assert_eq!(request.body, Some(json!({"customer": {"note": "vip"}})));
    }
}
