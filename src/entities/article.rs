//! Article entity
//!
//! An article is addressed publicly by its slug. The slug is unique across
//! all articles and is derived from the title when the author does not pick
//! one at creation time.

use crate::core::entity::Entity;
use crate::core::error::{BlogError, BlogResult};
use crate::core::slug::derive_slug;
use crate::entities::user::UserId;
use chrono::{NaiveDate, Utc};

pub type ArticleId = i64;

pub const TITLE_MAX_LENGTH: usize = 100;
pub const SUMMARY_MAX_LENGTH: usize = 250;

/// A persisted article
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub id: ArticleId,
    pub title: String,
    pub summary: String,
    /// Body text
    pub article: String,
    /// Set once on insertion
    pub created: NaiveDate,
    /// Set on every write
    pub updated: NaiveDate,
    pub slug: String,
    pub owner_id: UserId,
}

impl Article {
    /// Mark the article as written today
    pub fn touch(&mut self) {
        self.updated = today();
    }

    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.owner_id == user_id
    }
}

impl Entity for Article {
    fn resource_name() -> &'static str {
        "articles"
    }

    fn lookup_key(&self) -> String {
        self.slug.clone()
    }
}

/// An article that has not been stored yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewArticle {
    pub title: String,
    pub summary: String,
    pub article: String,
    pub slug: String,
    pub owner_id: UserId,
}

impl NewArticle {
    /// Build a new article, deriving the slug from the title when `slug`
    /// is `None` or empty.
    pub fn new(
        title: impl Into<String>,
        summary: impl Into<String>,
        article: impl Into<String>,
        slug: Option<String>,
        owner_id: UserId,
    ) -> BlogResult<Self> {
        let title = title.into();
        let slug = match slug.filter(|s| !s.is_empty()) {
            Some(slug) => slug,
            None => derive_slug(&title).ok_or_else(|| {
                BlogError::field("slug", "Could not derive a slug from the title.")
            })?,
        };

        Ok(Self {
            title,
            summary: summary.into(),
            article: article.into(),
            slug,
            owner_id,
        })
    }

    /// Attach the store-assigned id and creation date
    pub fn into_article(self, id: ArticleId, created: NaiveDate) -> Article {
        Article {
            id,
            title: self.title,
            summary: self.summary,
            article: self.article,
            created,
            updated: created,
            slug: self.slug,
            owner_id: self.owner_id,
        }
    }
}

/// Field changes requested by an update; `None` leaves a field untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleChanges {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub article: Option<String>,
    pub slug: Option<String>,
}

impl ArticleChanges {
    pub fn apply(self, target: &mut Article) {
        if let Some(title) = self.title {
            target.title = title;
        }
        if let Some(summary) = self.summary {
            target.summary = summary;
        }
        if let Some(article) = self.article {
            target.article = article;
        }
        if let Some(slug) = self.slug.filter(|s| !s.is_empty()) {
            target.slug = slug;
        }
    }
}

/// Current UTC date
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}
