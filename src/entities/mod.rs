//! Domain entities: articles and their owners

pub mod article;
pub mod user;

pub use article::{Article, ArticleChanges, ArticleId, NewArticle};
pub use user::{User, UserId};
