//! `sapoBlog`: blogs, their articles and article comments.
//!
//! The `resource` parameter picks blogs or articles; comment operations live
//! under articles. A resource/operation pair outside that table emits `{}`
//! the same way an unknown operation does.

use async_trait::async_trait;
use sapo_core::{ArticleId, BlogId, CommentId, FilterTimestamp, OutputRecord};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::common::{
    ListRequest, Operation, Payload, PublishedStatus, created_fields, data_property,
    filters_property, id_property, operation_enum, operation_property, pagination_properties,
    parse_operation, published_status_field, string_field,
};
use crate::credentials::CREDENTIAL_TYPE;
use crate::facade::SapoApi;
use crate::node::{
    Connector, ConnectorError, NodeDescription, NodeProperty, ParameterSet, PropertyOption,
    PropertyType,
};

operation_enum! {
    /// Operations of the blog connector, across both resources.
    pub enum BlogOperation {
        Create => ("create", "Create"),
        CreateComment => ("createComment", "Create Comment"),
        Delete => ("delete", "Delete"),
        DeleteComment => ("deleteComment", "Delete Comment"),
        Get => ("get", "Get"),
        GetComment => ("getComment", "Get Comment"),
        GetComments => ("getComments", "Get Comments"),
        GetMany => ("getMany", "Get Many"),
        SpamCheck => ("spamCheck", "Spam Check"),
        Update => ("update", "Update"),
        UpdateComment => ("updateComment", "Update Comment"),
    }
}

/// What a blog operation acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlogResource {
    Article,
    Blog,
}

impl BlogResource {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Article => "article",
            Self::Blog => "blog",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "article" => Some(Self::Article),
            "blog" => Some(Self::Blog),
            _ => None,
        }
    }
}

/// Filters of blog, article and comment listings.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BlogFilters {
    pub published_status: Option<PublishedStatus>,
    pub handle: Option<String>,
    pub created_at_min: Option<FilterTimestamp>,
    pub created_at_max: Option<FilterTimestamp>,
    pub author: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BlogRef {
    blog_id: BlogId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ArticleRef {
    blog_id: BlogId,
    article_id: ArticleId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentRef {
    blog_id: BlogId,
    article_id: ArticleId,
    comment_id: CommentId,
}

/// The `sapoBlog` connector.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlogConnector;

impl BlogConnector {
    async fn run_blog(
        api: &SapoApi,
        operation: BlogOperation,
        params: &ParameterSet,
    ) -> Result<OutputRecord, ConnectorError> {
        let blogs = api.blogs();
        let blog_id = || params.bind::<BlogRef>().map(|r| r.blog_id);

        Ok(match operation {
            BlogOperation::Create => OutputRecord::new(blogs.create(Payload::bind(params)?).await?),
            BlogOperation::Get => OutputRecord::new(blogs.get(blog_id()?).await?),
            BlogOperation::GetMany => {
                let filters = ListRequest::<BlogFilters>::bind(params)?.into_filters()?;
                OutputRecord::new(blogs.list(&filters).await?)
            }
            BlogOperation::Update => {
                OutputRecord::new(blogs.update(blog_id()?, Payload::bind(params)?).await?)
            }
            BlogOperation::Delete => {
                blogs.delete(blog_id()?).await?;
                OutputRecord::success()
            }
            BlogOperation::CreateComment
            | BlogOperation::DeleteComment
            | BlogOperation::GetComment
            | BlogOperation::GetComments
            | BlogOperation::SpamCheck
            | BlogOperation::UpdateComment => {
                tracing::warn!(
                    operation = operation.as_str(),
                    "Comment operations apply to articles, emitting empty record"
                );
                OutputRecord::empty()
            }
        })
    }

    async fn run_article(
        api: &SapoApi,
        operation: BlogOperation,
        params: &ParameterSet,
    ) -> Result<OutputRecord, ConnectorError> {
        let blogs = api.blogs();
        let article = || params.bind::<ArticleRef>();
        let comment = || params.bind::<CommentRef>();

        Ok(match operation {
            BlogOperation::Create => {
                let BlogRef { blog_id } = params.bind()?;
                OutputRecord::new(blogs.create_article(blog_id, Payload::bind(params)?).await?)
            }
            BlogOperation::Get => {
                let r = article()?;
                OutputRecord::new(blogs.get_article(r.blog_id, r.article_id).await?)
            }
            BlogOperation::GetMany => {
                let BlogRef { blog_id } = params.bind()?;
                let filters = ListRequest::<BlogFilters>::bind(params)?.into_filters()?;
                OutputRecord::new(blogs.list_articles(blog_id, &filters).await?)
            }
            BlogOperation::Update => {
                let r = article()?;
                OutputRecord::new(
                    blogs
                        .update_article(r.blog_id, r.article_id, Payload::bind(params)?)
                        .await?,
                )
            }
            BlogOperation::Delete => {
                let r = article()?;
                blogs.delete_article(r.blog_id, r.article_id).await?;
                OutputRecord::success()
            }
            BlogOperation::CreateComment => {
                let r = article()?;
                OutputRecord::new(
                    blogs
                        .create_comment(r.blog_id, r.article_id, Payload::bind(params)?)
                        .await?,
                )
            }
            BlogOperation::GetComment => {
                let r = comment()?;
                OutputRecord::new(blogs.get_comment(r.blog_id, r.article_id, r.comment_id).await?)
            }
            BlogOperation::GetComments => {
                let r = article()?;
                let filters = ListRequest::<BlogFilters>::bind(params)?.into_filters()?;
                OutputRecord::new(blogs.list_comments(r.blog_id, r.article_id, &filters).await?)
            }
            BlogOperation::UpdateComment => {
                let r = comment()?;
                let data = Payload::bind(params)?;
                OutputRecord::new(
                    blogs
                        .update_comment(r.blog_id, r.article_id, r.comment_id, data)
                        .await?,
                )
            }
            BlogOperation::DeleteComment => {
                let r = comment()?;
                blogs
                    .delete_comment(r.blog_id, r.article_id, r.comment_id)
                    .await?;
                OutputRecord::success()
            }
            BlogOperation::SpamCheck => {
                let r = comment()?;
                OutputRecord::new(blogs.spam_check(r.blog_id, r.article_id, r.comment_id).await?)
            }
        })
    }
}

#[async_trait]
impl Connector for BlogConnector {
    fn type_name(&self) -> &'static str {
        "sapoBlog"
    }

    fn description(&self) -> NodeDescription {
        use BlogOperation::{
            Create, CreateComment, Delete, DeleteComment, Get, GetComment, GetComments, GetMany,
            SpamCheck, Update, UpdateComment,
        };

        let mut fields = vec![published_status_field(), string_field("handle", "Handle")];
        fields.extend(created_fields());
        fields.push(string_field("author", "Author"));

        let mut properties = vec![
            NodeProperty::new("resource", "Resource", PropertyType::Options)
                .no_data_expression()
                .options(vec![
                    PropertyOption::new("Article", BlogResource::Article.as_str()),
                    PropertyOption::new("Blog", BlogResource::Blog.as_str()),
                ])
                .default(json!(BlogResource::Blog.as_str())),
            operation_property(GetMany),
            NodeProperty::new("blogId", "Blog ID", PropertyType::Number)
                .default(json!(0))
                .required()
                .description("ID of the blog"),
            id_property(
                "articleId",
                "Article ID",
                "ID of the article",
                &[
                    Get,
                    Update,
                    Delete,
                    GetComment,
                    GetComments,
                    CreateComment,
                    UpdateComment,
                    DeleteComment,
                    SpamCheck,
                ],
            )
            .show("resource", [BlogResource::Article.as_str()]),
            id_property(
                "commentId",
                "Comment ID",
                "ID of the comment",
                &[GetComment, UpdateComment, DeleteComment, SpamCheck],
            ),
        ];
        properties.extend(pagination_properties(&[GetMany, GetComments]));
        properties.push(filters_property(&[GetMany, GetComments], fields));
        properties.push(
            data_property(
                &[Create, Update],
                json!({
                    "title": "Company News",
                    "handle": "news",
                    "commentable": true,
                    "template_suffix": "alternate",
                }),
            )
            .show("resource", [BlogResource::Blog.as_str()]),
        );
        properties.push(
            data_property(
                &[Create, Update],
                json!({
                    "title": "New Product Launch",
                    "author": "John Doe",
                    "body_html": "<p>Exciting announcement...</p>",
                    "tags": "news, products",
                    "published": true,
                }),
            )
            .show("resource", [BlogResource::Article.as_str()]),
        );
        properties.push(data_property(
            &[CreateComment, UpdateComment],
            json!({
                "author": "John Doe",
                "email": "john@example.com",
                "body": "Great article!",
                "ip": "127.0.0.1",
            }),
        ));

        NodeDescription::new(
            self.type_name(),
            "Sapo Blog",
            "Manage blogs, articles and comments in Sapo",
        )
        .subtitle("={{$parameter[\"operation\"] + \": \" + $parameter[\"resource\"]}}")
        .credential(CREDENTIAL_TYPE)
        .properties(properties)
    }

    async fn run(
        &self,
        api: &SapoApi,
        params: &ParameterSet,
    ) -> Result<OutputRecord, ConnectorError> {
        let Some(operation) = parse_operation::<BlogOperation>(params) else {
            return Ok(OutputRecord::empty());
        };
        let Some(resource) = params.string("resource").and_then(BlogResource::parse) else {
            tracing::warn!(
                resource = ?params.get("resource"),
                "Unknown blog resource, emitting empty record"
            );
            return Ok(OutputRecord::empty());
        };
        tracing::debug!(
            resource = resource.as_str(),
            operation = operation.as_str(),
            "Running blog operation"
        );

        match resource {
            BlogResource::Blog => Self::run_blog(api, operation, params).await,
            BlogResource::Article => Self::run_article(api, operation, params).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use reqwest::Method;

    use super::*;
    use crate::node::execute;
    use crate::testing::{MockTransport, test_context};

    #[tokio::test]
    async fn test_blog_get_many_by_default() {
        let transport = MockTransport::shared();
        transport.respond_with(json!({"blogs": []}));
        let ctx = test_context("sapoBlog", json!({}), &transport);

        let batches = execute(&BlogConnector, &ctx).await.expect("execute");

        assert_eq!(batches[0][0].json, json!([]));
        let request = transport.last_request().expect("request");
        assert_eq!(request.path(), "/admin/blogs.json");
        assert_eq!(request.query_value("limit"), Some("50"));
    }

    #[tokio::test]
    async fn test_article_comments_listing() {
        let transport = MockTransport::shared();
        let ctx = test_context(
            "sapoBlog",
            json!({
                "resource": "article",
                "operation": "getComments",
                "blogId": 1,
                "articleId": 2,
                "returnAll": true,
                "additionalFields": {"author": "Lan"},
            }),
            &transport,
        );

        execute(&BlogConnector, &ctx).await.expect("execute");

        let request = transport.last_request().expect("request");
        assert_eq!(request.path(), "/admin/blogs/1/articles/2/comments.json");
        assert_eq!(request.query_value("author"), Some("Lan"));
        assert_eq!(request.query_value("limit"), None);
    }

    #[tokio::test]
    async fn test_spam_check() {
        let transport = MockTransport::shared();
        transport.respond_with(json!({"comment": {"id": 3, "status": "spam"}}));
        let ctx = test_context(
            "sapoBlog",
            json!({
                "resource": "article",
                "operation": "spamCheck",
                "blogId": 1,
                "articleId": 2,
                "commentId": 3,
            }),
            &transport,
        );

        let batches = execute(&BlogConnector, &ctx).await.expect("execute");

        assert_eq!(batches[0][0].json["status"], "spam");
        let request = transport.last_request().expect("request");
        assert_eq!(request.method, Method::POST);
        assert_eq!(
            request.path(),
            "/admin/blogs/1/articles/2/comments/3/spam_check.json"
        );
    }

    #[tokio::test]
    async fn test_comment_operation_on_blog_resource_is_empty() {
        let transport = MockTransport::shared();
        let ctx = test_context(
            "sapoBlog",
            json!({"resource": "blog", "operation": "createComment", "blogId": 1}),
            &transport,
        );

        let batches = execute(&BlogConnector, &ctx).await.expect("execute");

        assert_eq!(batches[0][0].json, json!({}));
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn test_article_id_needs_article_resource() {
        let description = BlogConnector.description();
        let article_id = description.property("articleId").expect("articleId");
        let blog_get = ParameterSet::new()
            .with("resource", json!("blog"))
            .with("operation", json!("get"));
        let article_get = ParameterSet::new()
            .with("resource", json!("article"))
            .with("operation", json!("get"));
        assert!(!article_id.is_visible(&blog_get));
        assert!(article_id.is_visible(&article_get));
    }
}
