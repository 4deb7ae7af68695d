//! Blogs, their articles and article comments.

use sapo_core::{ArticleId, BlogId, CommentId};
use serde_json::{Value, json};
use tracing::instrument;

use super::{Filters, Rest, unwrap_root};
use crate::sapo::{SapoClient, SapoError};

/// Blogs sub-client.
#[derive(Debug, Clone, Copy)]
pub struct Blogs<'a> {
    client: &'a SapoClient,
}

impl<'a> Blogs<'a> {
    pub(crate) const fn new(client: &'a SapoClient) -> Self {
        Self { client }
    }

    fn blogs(&self) -> Rest<'a> {
        Rest::new(self.client, "blogs", "blog", "blogs")
    }

    fn articles(&self, blog: BlogId) -> Rest<'a> {
        Rest::new(
            self.client,
            format!("blogs/{blog}/articles"),
            "article",
            "articles",
        )
    }

    fn comments(&self, blog: BlogId, article: ArticleId) -> Rest<'a> {
        Rest::new(
            self.client,
            format!("blogs/{blog}/articles/{article}/comments"),
            "comment",
            "comments",
        )
    }

    // -------------------------------------------------------------------------
    // Blogs
    // -------------------------------------------------------------------------

    /// # Errors
    ///
    /// Returns an error if the API request fails or the document is rejected.
    #[instrument(skip(self, data))]
    pub async fn create(&self, data: Value) -> Result<Value, SapoError> {
        self.blogs().create(data).await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails or the blog does not exist.
    #[instrument(skip(self), fields(blog_id = %id))]
    pub async fn get(&self, id: BlogId) -> Result<Value, SapoError> {
        self.blogs().get(id.as_i64()).await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, filters))]
    pub async fn list(&self, filters: &Filters) -> Result<Value, SapoError> {
        self.blogs().list(filters).await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails or the document is rejected.
    #[instrument(skip(self, data), fields(blog_id = %id))]
    pub async fn update(&self, id: BlogId, data: Value) -> Result<Value, SapoError> {
        self.blogs().update(id.as_i64(), data).await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(blog_id = %id))]
    pub async fn delete(&self, id: BlogId) -> Result<(), SapoError> {
        self.blogs().delete(id.as_i64()).await
    }

    // -------------------------------------------------------------------------
    // Articles
    // -------------------------------------------------------------------------

    /// # Errors
    ///
    /// Returns an error if the API request fails or the document is rejected.
    #[instrument(skip(self, data), fields(blog_id = %blog))]
    pub async fn create_article(&self, blog: BlogId, data: Value) -> Result<Value, SapoError> {
        self.articles(blog).create(data).await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails or the article does not exist.
    #[instrument(skip(self), fields(blog_id = %blog, article_id = %id))]
    pub async fn get_article(&self, blog: BlogId, id: ArticleId) -> Result<Value, SapoError> {
        self.articles(blog).get(id.as_i64()).await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, filters), fields(blog_id = %blog))]
    pub async fn list_articles(&self, blog: BlogId, filters: &Filters) -> Result<Value, SapoError> {
        self.articles(blog).list(filters).await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails or the document is rejected.
    #[instrument(skip(self, data), fields(blog_id = %blog, article_id = %id))]
    pub async fn update_article(
        &self,
        blog: BlogId,
        id: ArticleId,
        data: Value,
    ) -> Result<Value, SapoError> {
        self.articles(blog).update(id.as_i64(), data).await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(blog_id = %blog, article_id = %id))]
    pub async fn delete_article(&self, blog: BlogId, id: ArticleId) -> Result<(), SapoError> {
        self.articles(blog).delete(id.as_i64()).await
    }

    // -------------------------------------------------------------------------
    // Comments
    // -------------------------------------------------------------------------

    /// # Errors
    ///
    /// Returns an error if the API request fails or the document is rejected.
    #[instrument(skip(self, data), fields(blog_id = %blog, article_id = %article))]
    pub async fn create_comment(
        &self,
        blog: BlogId,
        article: ArticleId,
        data: Value,
    ) -> Result<Value, SapoError> {
        self.comments(blog, article).create(data).await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails or the comment does not exist.
    #[instrument(skip(self), fields(blog_id = %blog, article_id = %article, comment_id = %id))]
    pub async fn get_comment(
        &self,
        blog: BlogId,
        article: ArticleId,
        id: CommentId,
    ) -> Result<Value, SapoError> {
        self.comments(blog, article).get(id.as_i64()).await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, filters), fields(blog_id = %blog, article_id = %article))]
    pub async fn list_comments(
        &self,
        blog: BlogId,
        article: ArticleId,
        filters: &Filters,
    ) -> Result<Value, SapoError> {
        self.comments(blog, article).list(filters).await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails or the document is rejected.
    #[instrument(
        skip(self, data),
        fields(blog_id = %blog, article_id = %article, comment_id = %id)
    )]
    pub async fn update_comment(
        &self,
        blog: BlogId,
        article: ArticleId,
        id: CommentId,
        data: Value,
    ) -> Result<Value, SapoError> {
        self.comments(blog, article).update(id.as_i64(), data).await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(blog_id = %blog, article_id = %article, comment_id = %id))]
    pub async fn delete_comment(
        &self,
        blog: BlogId,
        article: ArticleId,
        id: CommentId,
    ) -> Result<(), SapoError> {
        self.comments(blog, article).delete(id.as_i64()).await
    }

    /// Ask the store's spam filter to classify a comment.
    ///
    /// The raw verdict document is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(blog_id = %blog, article_id = %article, comment_id = %id))]
    pub async fn spam_check(
        &self,
        blog: BlogId,
        article: ArticleId,
        id: CommentId,
    ) -> Result<Value, SapoError> {
        let response = self
            .client
            .post(
                &format!("blogs/{blog}/articles/{article}/comments/{id}/spam_check.json"),
                json!({}),
            )
            .await?;
        Ok(unwrap_root(response, "comment"))
    }
}
