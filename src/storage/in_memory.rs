//! In-memory implementations of ArticleService and UserDirectory
//!
//! Useful for testing and development. Uses RwLock for thread-safe access;
//! every uniqueness check happens under the write lock so concurrent
//! creates cannot both claim the same slug.

use crate::config::UserSeed;
use crate::core::error::{ArticleError, BlogResult, StorageError};
use crate::core::service::{ArticleService, UserDirectory};
use crate::entities::article::today;
use crate::entities::user::hash_password;
use crate::entities::{Article, ArticleId, NewArticle, User, UserId};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

fn poisoned<E: std::fmt::Display>(e: E) -> StorageError {
    StorageError::LockPoisoned {
        message: e.to_string(),
    }
}

#[derive(Default)]
struct ArticleTable {
    next_id: ArticleId,
    rows: BTreeMap<ArticleId, Article>,
}

impl ArticleTable {
    fn id_for_slug(&self, slug: &str) -> Option<ArticleId> {
        self.rows
            .values()
            .find(|article| article.slug == slug)
            .map(|article| article.id)
    }

    /// The row `id`, if it still belongs to `owner_id`
    fn owned_row(&self, id: ArticleId, owner_id: UserId) -> Option<&Article> {
        self.rows.get(&id).filter(|row| row.is_owned_by(owner_id))
    }
}

/// In-memory article service implementation
#[derive(Clone, Default)]
pub struct InMemoryArticleService {
    table: Arc<RwLock<ArticleTable>>,
}

impl InMemoryArticleService {
    /// Create a new in-memory article service
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> BlogResult<RwLockReadGuard<'_, ArticleTable>> {
        Ok(self.table.read().map_err(poisoned)?)
    }

    fn write(&self) -> BlogResult<RwLockWriteGuard<'_, ArticleTable>> {
        Ok(self.table.write().map_err(poisoned)?)
    }
}

/// Creation date first, insertion order second
fn sorted(mut articles: Vec<Article>) -> Vec<Article> {
    articles.sort_by(|a, b| a.created.cmp(&b.created).then(a.id.cmp(&b.id)));
    articles
}

#[async_trait]
impl ArticleService for InMemoryArticleService {
    async fn create(&self, article: NewArticle) -> BlogResult<Article> {
        let mut table = self.write()?;

        if table.id_for_slug(&article.slug).is_some() {
            return Err(ArticleError::SlugTaken { slug: article.slug }.into());
        }

        table.next_id += 1;
        let article = article.into_article(table.next_id, today());
        table.rows.insert(article.id, article.clone());

        Ok(article)
    }

    async fn get(&self, slug: &str) -> BlogResult<Option<Article>> {
        let table = self.read()?;
        Ok(table
            .id_for_slug(slug)
            .and_then(|id| table.rows.get(&id).cloned()))
    }

    async fn list(&self) -> BlogResult<Vec<Article>> {
        let table = self.read()?;
        Ok(sorted(table.rows.values().cloned().collect()))
    }

    async fn list_by_owner(&self, owner_id: UserId) -> BlogResult<Vec<Article>> {
        let table = self.read()?;
        Ok(sorted(
            table
                .rows
                .values()
                .filter(|article| article.owner_id == owner_id)
                .cloned()
                .collect(),
        ))
    }

    async fn update(&self, mut article: Article) -> BlogResult<Article> {
        let mut table = self.write()?;

        let created = table
            .owned_row(article.id, article.owner_id)
            .map(|row| row.created)
            .ok_or_else(|| ArticleError::NotFound {
                slug: article.slug.clone(),
            })?;

        if let Some(other) = table.id_for_slug(&article.slug) {
            if other != article.id {
                return Err(ArticleError::SlugTaken { slug: article.slug }.into());
            }
        }

        article.created = created;
        article.touch();

        table.rows.insert(article.id, article.clone());
        Ok(article)
    }

    async fn delete(&self, article: &Article) -> BlogResult<()> {
        let mut table = self.write()?;

        if table.owned_row(article.id, article.owner_id).is_none() {
            return Err(ArticleError::NotFound {
                slug: article.slug.clone(),
            }
            .into());
        }
        table.rows.remove(&article.id);

        Ok(())
    }
}

/// In-memory user directory, seeded from configuration
#[derive(Clone, Default)]
pub struct InMemoryUserDirectory {
    users: Arc<RwLock<BTreeMap<UserId, User>>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a directory holding the configured accounts, in order
    pub fn from_seeds(seeds: &[UserSeed]) -> BlogResult<Self> {
        let directory = Self::new();
        for seed in seeds {
            directory.add_user_with_digest(&seed.username, &seed.password_digest()?)?;
        }
        Ok(directory)
    }

    /// Register a user with a plaintext password
    pub fn add_user(&self, username: &str, password: &str) -> BlogResult<User> {
        self.add_user_with_digest(username, &hash_password(password))
    }

    /// Register a user with an already hashed password.
    ///
    /// Ids are assigned sequentially from 1. Re-adding a username replaces
    /// its password and keeps its id.
    pub fn add_user_with_digest(&self, username: &str, password_sha256: &str) -> BlogResult<User> {
        let mut users = self.users.write().map_err(poisoned)?;

        if let Some(existing) = users.values_mut().find(|u| u.username == username) {
            existing.password_sha256 = password_sha256.to_string();
            return Ok(existing.clone());
        }

        let id = users.keys().next_back().copied().unwrap_or(0) + 1;
        let user = User::new(id, username, password_sha256);
        users.insert(id, user.clone());
        Ok(user)
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn get(&self, id: UserId) -> BlogResult<Option<User>> {
        let users = self.users.read().map_err(poisoned)?;
        Ok(users.get(&id).cloned())
    }

    async fn list(&self) -> BlogResult<Vec<User>> {
        let users = self.users.read().map_err(poisoned)?;
        Ok(users.values().cloned().collect())
    }

    async fn verify_password(&self, username: &str, password: &str) -> BlogResult<Option<User>> {
        let users = self.users.read().map_err(poisoned)?;
        Ok(users
            .values()
            .find(|u| u.username == username && u.check_password(password))
            .cloned())
    }
}
