//! `sapoPage`: static storefront pages.

use async_trait::async_trait;
use sapo_core::{FilterTimestamp, OutputRecord, PageId};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::common::{
    ListRequest, Operation, Payload, PublishedStatus, bind_filters, created_fields, data_property,
    filter_bag, filters_property, id_property, operation_enum, operation_property,
    pagination_properties, parse_operation, published_status_field, string_field, updated_fields,
};
use crate::credentials::CREDENTIAL_TYPE;
use crate::facade::SapoApi;
use crate::node::{Connector, ConnectorError, NodeDescription, ParameterSet};

operation_enum! {
    pub enum PageOperation {
        Count => ("count", "Count"),
        Create => ("create", "Create"),
        Delete => ("delete", "Delete"),
        Get => ("get", "Get"),
        GetMany => ("getMany", "Get Many"),
        Update => ("update", "Update"),
    }
}

/// Filters of `getMany` and `count`.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PageFilters {
    pub published_status: Option<PublishedStatus>,
    pub handle: Option<String>,
    pub created_at_min: Option<FilterTimestamp>,
    pub created_at_max: Option<FilterTimestamp>,
    pub updated_at_min: Option<FilterTimestamp>,
    pub updated_at_max: Option<FilterTimestamp>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageRef {
    page_id: PageId,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PageConnector;

#[async_trait]
impl Connector for PageConnector {
    fn type_name(&self) -> &'static str {
        "sapoPage"
    }

    fn description(&self) -> NodeDescription {
        use PageOperation::{Count, Create, Delete, Get, GetMany, Update};

        let mut fields = vec![published_status_field(), string_field("handle", "Handle")];
        fields.extend(created_fields());
        fields.extend(updated_fields());

        let mut properties = vec![
            operation_property(GetMany),
            id_property("pageId", "Page ID", "ID of the page", &[Get, Update, Delete]),
        ];
        properties.extend(pagination_properties(&[GetMany]));
        properties.push(filters_property(&[GetMany, Count], fields));
        properties.push(data_property(
            &[Create, Update],
            json!({
                "title": "About Us",
                "body_html": "<p>Our company story...</p>",
                "handle": "about-us",
                "published": true,
                "template_suffix": "alternate",
                "author": "John Doe",
            }),
        ));

        NodeDescription::new(self.type_name(), "Sapo Page", "Manage storefront pages in Sapo")
            .subtitle("={{$parameter[\"operation\"]}}")
            .credential(CREDENTIAL_TYPE)
            .properties(properties)
    }

    async fn run(
        &self,
        api: &SapoApi,
        params: &ParameterSet,
    ) -> Result<OutputRecord, ConnectorError> {
        let Some(operation) = parse_operation::<PageOperation>(params) else {
            return Ok(OutputRecord::empty());
        };
        tracing::debug!(operation = operation.as_str(), "Running page operation");
        let pages = api.pages();
        let page_id = || params.bind::<PageRef>().map(|r| r.page_id);

        Ok(match operation {
            PageOperation::Create => OutputRecord::new(pages.create(Payload::bind(params)?).await?),
            PageOperation::Get => OutputRecord::new(pages.get(page_id()?).await?),
            PageOperation::GetMany => {
                let filters = ListRequest::<PageFilters>::bind(params)?.into_filters()?;
                OutputRecord::new(pages.list(&filters).await?)
            }
            PageOperation::Update => {
                OutputRecord::new(pages.update(page_id()?, Payload::bind(params)?).await?)
            }
            PageOperation::Delete => {
                pages.delete(page_id()?).await?;
                OutputRecord::success()
            }
            PageOperation::Count => {
                let filters = filter_bag(&bind_filters::<PageFilters>(params)?)?;
                OutputRecord::count(pages.count(&filters).await?)
            }
        })
    }
}
