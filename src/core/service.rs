//! Service traits for article persistence and user lookup
//!
//! Handlers only talk to these traits; the storage backend behind them is
//! picked when the server is built.

use crate::core::error::BlogResult;
use crate::entities::{Article, NewArticle, User, UserId};
use async_trait::async_trait;

/// Storage of articles
///
/// Reads go by slug. Writes go by id, so a write checked against one row
/// never lands on another row that took over its slug.
///
/// Implementations own the consistency rules the API relies on:
/// - slugs are unique; `create` and `update` fail with
///   `ArticleError::SlugTaken` instead of renaming
/// - `created` is fixed at insertion, `updated` is refreshed by every write
/// - listings are ordered by creation date, then insertion order
#[async_trait]
pub trait ArticleService: Send + Sync {
    /// Insert a new article
    async fn create(&self, article: NewArticle) -> BlogResult<Article>;

    /// Get an article by slug
    async fn get(&self, slug: &str) -> BlogResult<Option<Article>>;

    /// List all articles
    async fn list(&self) -> BlogResult<Vec<Article>>;

    /// List the articles owned by one user
    async fn list_by_owner(&self, owner_id: UserId) -> BlogResult<Vec<Article>>;

    /// Replace the stored row `article.id` with `article`.
    ///
    /// The row must still belong to `article.owner_id`, otherwise this fails
    /// with `ArticleError::NotFound`. `created` and `owner_id` are kept from
    /// the stored row; `article.slug` may rename it.
    async fn update(&self, article: Article) -> BlogResult<Article>;

    /// Delete the row `article.id`, under the same ownership rule as `update`
    async fn delete(&self, article: &Article) -> BlogResult<()>;
}

/// Read access to the user accounts managed by the auth subsystem
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn get(&self, id: UserId) -> BlogResult<Option<User>>;

    /// All users, ascending id
    async fn list(&self) -> BlogResult<Vec<User>>;

    /// Return the user if the credentials match
    async fn verify_password(&self, username: &str, password: &str) -> BlogResult<Option<User>>;
}
