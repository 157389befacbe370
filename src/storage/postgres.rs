//! PostgreSQL storage backend using sqlx.
//!
//! Provides `PostgresStore`, which implements both `ArticleService` and
//! `UserDirectory` on top of a `sqlx::PgPool`.
//!
//! # Feature flag
//!
//! This module is gated behind the `postgres` feature flag:
//! ```toml
//! [dependencies]
//! blog-api = { version = "0.1", features = ["postgres"] }
//! ```
//!
//! # Schema
//!
//! - `blog_users` holds the accounts seeded from configuration
//! - `blog_articles` holds articles; `slug` carries a `UNIQUE` constraint
//!   and `owner_id` cascades on user deletion

use crate::config::UserSeed;
use crate::core::error::{ArticleError, BlogError, BlogResult, StorageError};
use crate::core::service::{ArticleService, UserDirectory};
use crate::entities::article::today;
use crate::entities::{Article, NewArticle, User, UserId};
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

const BACKEND: &str = "postgres";

const ARTICLE_COLUMNS: &str = "id, title, summary, article, created, updated, slug, owner_id";

type ArticleTuple = (i64, String, String, String, NaiveDate, NaiveDate, String, i64);
type UserTuple = (i64, String, String);

fn query_error(context: &str, e: sqlx::Error) -> BlogError {
    StorageError::QueryError {
        backend: BACKEND.to_string(),
        message: format!("{}: {}", context, e),
    }
    .into()
}

/// Map a write error, turning slug uniqueness violations into `SlugTaken`
fn write_error(context: &str, slug: &str, e: sqlx::Error) -> BlogError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => ArticleError::SlugTaken {
            slug: slug.to_string(),
        }
        .into(),
        _ => query_error(context, e),
    }
}

fn row_to_article(row: ArticleTuple) -> Article {
    let (id, title, summary, article, created, updated, slug, owner_id) = row;
    Article {
        id,
        title,
        summary,
        article,
        created,
        updated,
        slug,
        owner_id,
    }
}

fn row_to_user(row: UserTuple) -> User {
    let (id, username, password_sha256) = row;
    User::new(id, username, password_sha256)
}

// ---------------------------------------------------------------------------
// Schema management
// ---------------------------------------------------------------------------

/// Apply the required tables (idempotent).
///
/// Safe to call on every startup.
pub async fn ensure_schema(pool: &PgPool) -> BlogResult<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS blog_users (
            id BIGSERIAL PRIMARY KEY,
            username TEXT NOT NULL UNIQUE,
            password_sha256 TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await
    .map_err(|e| query_error("Failed to create blog_users table", e))?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS blog_articles (
            id BIGSERIAL PRIMARY KEY,
            title VARCHAR(100) NOT NULL,
            summary VARCHAR(250) NOT NULL,
            article TEXT NOT NULL,
            created DATE NOT NULL,
            updated DATE NOT NULL,
            slug VARCHAR(50) NOT NULL UNIQUE,
            owner_id BIGINT NOT NULL REFERENCES blog_users(id) ON DELETE CASCADE
        )",
    )
    .execute(pool)
    .await
    .map_err(|e| query_error("Failed to create blog_articles table", e))?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_blog_articles_created ON blog_articles (created, id)",
    )
    .execute(pool)
    .await
    .map_err(|e| query_error("Failed to create created index", e))?;

    Ok(())
}

/// Article and user storage backed by PostgreSQL.
#[derive(Clone, Debug)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new `PostgresStore` with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect, then make sure the schema exists
    pub async fn connect(database_url: &str) -> BlogResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .map_err(|e| StorageError::ConnectionError {
                backend: BACKEND.to_string(),
                message: e.to_string(),
            })?;

        ensure_schema(&pool).await?;
        tracing::info!("connected to postgres");
        Ok(Self::new(pool))
    }

    /// Insert or refresh the configured accounts
    pub async fn seed_users(&self, seeds: &[UserSeed]) -> BlogResult<()> {
        for seed in seeds {
            let digest = seed.password_digest()?;
            sqlx::query(
                "INSERT INTO blog_users (username, password_sha256) VALUES ($1, $2)
                 ON CONFLICT (username) DO UPDATE SET password_sha256 = EXCLUDED.password_sha256",
            )
            .bind(&seed.username)
            .bind(&digest)
            .execute(&self.pool)
            .await
            .map_err(|e| query_error("Failed to seed user", e))?;
        }
        tracing::info!(count = seeds.len(), "seeded users");
        Ok(())
    }
}

#[async_trait]
impl ArticleService for PostgresStore {
    async fn create(&self, article: NewArticle) -> BlogResult<Article> {
        let sql = format!(
            "INSERT INTO blog_articles (title, summary, article, created, updated, slug, owner_id)
             VALUES ($1, $2, $3, $4, $4, $5, $6)
             RETURNING {}",
            ARTICLE_COLUMNS
        );
        let row = sqlx::query_as::<_, ArticleTuple>(&sql)
            .bind(&article.title)
            .bind(&article.summary)
            .bind(&article.article)
            .bind(today())
            .bind(&article.slug)
            .bind(article.owner_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| write_error("Failed to create article", &article.slug, e))?;

        Ok(row_to_article(row))
    }

    async fn get(&self, slug: &str) -> BlogResult<Option<Article>> {
        let sql = format!("SELECT {} FROM blog_articles WHERE slug = $1", ARTICLE_COLUMNS);
        let row = sqlx::query_as::<_, ArticleTuple>(&sql)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| query_error("Failed to get article", e))?;

        Ok(row.map(row_to_article))
    }

    async fn list(&self) -> BlogResult<Vec<Article>> {
        let sql = format!(
            "SELECT {} FROM blog_articles ORDER BY created, id",
            ARTICLE_COLUMNS
        );
        let rows = sqlx::query_as::<_, ArticleTuple>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| query_error("Failed to list articles", e))?;

        Ok(rows.into_iter().map(row_to_article).collect())
    }

    async fn list_by_owner(&self, owner_id: UserId) -> BlogResult<Vec<Article>> {
        let sql = format!(
            "SELECT {} FROM blog_articles WHERE owner_id = $1 ORDER BY created, id",
            ARTICLE_COLUMNS
        );
        let rows = sqlx::query_as::<_, ArticleTuple>(&sql)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| query_error("Failed to list articles by owner", e))?;

        Ok(rows.into_iter().map(row_to_article).collect())
    }

    async fn update(&self, article: Article) -> BlogResult<Article> {
        let sql = format!(
            "UPDATE blog_articles
             SET title = $1, summary = $2, article = $3, slug = $4, updated = $5
             WHERE id = $6 AND owner_id = $7
             RETURNING {}",
            ARTICLE_COLUMNS
        );
        let row = sqlx::query_as::<_, ArticleTuple>(&sql)
            .bind(&article.title)
            .bind(&article.summary)
            .bind(&article.article)
            .bind(&article.slug)
            .bind(today())
            .bind(article.id)
            .bind(article.owner_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| write_error("Failed to update article", &article.slug, e))?;

        row.map(row_to_article).ok_or_else(|| {
            ArticleError::NotFound {
                slug: article.slug.clone(),
            }
            .into()
        })
    }

    async fn delete(&self, article: &Article) -> BlogResult<()> {
        let result = sqlx::query("DELETE FROM blog_articles WHERE id = $1 AND owner_id = $2")
            .bind(article.id)
            .bind(article.owner_id)
            .execute(&self.pool)
            .await
            .map_err(|e| query_error("Failed to delete article", e))?;

        if result.rows_affected() == 0 {
            return Err(ArticleError::NotFound {
                slug: article.slug.clone(),
            }
            .into());
        }
        Ok(())
    }
}

#[async_trait]
impl UserDirectory for PostgresStore {
    async fn get(&self, id: UserId) -> BlogResult<Option<User>> {
        let row = sqlx::query_as::<_, UserTuple>(
            "SELECT id, username, password_sha256 FROM blog_users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| query_error("Failed to get user", e))?;

        Ok(row.map(row_to_user))
    }

    async fn list(&self) -> BlogResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserTuple>(
            "SELECT id, username, password_sha256 FROM blog_users ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| query_error("Failed to list users", e))?;

        Ok(rows.into_iter().map(row_to_user).collect())
    }

    async fn verify_password(&self, username: &str, password: &str) -> BlogResult<Option<User>> {
        let row = sqlx::query_as::<_, UserTuple>(
            "SELECT id, username, password_sha256 FROM blog_users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| query_error("Failed to look up user", e))?;

        Ok(row.map(row_to_user).filter(|user| user.check_password(password)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_to_article() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let article = row_to_article((
            4,
            "Title".to_string(),
            "Summary".to_string(),
            "Body".to_string(),
            date,
            date,
            "title".to_string(),
            2,
        ));
        assert_eq!(article.id, 4);
        assert_eq!(article.slug, "title");
        assert!(article.is_owned_by(2));
    }

    #[test]
    fn test_query_error_is_storage_error() {
        let err = query_error("Failed to list articles", sqlx::Error::RowNotFound);
        assert_eq!(err.error_code(), "STORAGE_ERROR");
        assert!(err.to_string().contains("Failed to list articles"));
    }

    #[test]
    fn test_write_error_passes_through_non_unique_errors() {
        let err = write_error("Failed to create article", "x", sqlx::Error::PoolTimedOut);
        assert_eq!(err.error_code(), "STORAGE_ERROR");
    }
}
